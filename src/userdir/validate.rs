//! Advisory checks for the add/edit forms. The store never calls these.

use crate::model::User;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl ValidationIssue {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

pub fn validate_user(user: &User) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if user.name.trim().is_empty() {
        issues.push(ValidationIssue::new("name", "is required"));
    }

    let email = user.email.trim();
    if email.is_empty() {
        issues.push(ValidationIssue::new("email", "is required"));
    } else if !looks_like_email(email) {
        issues.push(ValidationIssue::new(
            "email",
            format!("{:?} is not a valid email address", email),
        ));
    }

    if user.website.chars().any(char::is_whitespace) {
        issues.push(ValidationIssue::new("website", "must not contain spaces"));
    }

    issues
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}
