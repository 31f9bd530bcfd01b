use crate::config::DirectoryConfig;
use crate::model::User;
use crate::validate::ValidationIssue;

pub mod add;
pub mod config;
pub mod delete;
pub mod edit;
pub mod list;
pub mod refresh;
pub mod view;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_users: Vec<User>,
    pub listed_users: Vec<User>,
    pub config: Option<DirectoryConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_users(mut self, users: Vec<User>) -> Self {
        self.affected_users = users;
        self
    }

    pub fn with_listed_users(mut self, users: Vec<User>) -> Self {
        self.listed_users = users;
        self
    }

    pub fn with_config(mut self, config: DirectoryConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn has_errors(&self) -> bool {
        self.messages
            .iter()
            .any(|m| m.level == MessageLevel::Error)
    }
}

/// Turn advisory form issues into messages. Returns true when the submit
/// should be blocked.
pub(crate) fn report_issues(result: &mut CmdResult, issues: &[ValidationIssue], force: bool) -> bool {
    if issues.is_empty() {
        return false;
    }
    for issue in issues {
        if force {
            result.add_message(CmdMessage::warning(issue.to_string()));
        } else {
            result.add_message(CmdMessage::error(issue.to_string()));
        }
    }
    if !force {
        result.add_message(CmdMessage::info("Nothing saved. Use --force to save anyway."));
    }
    !force
}
