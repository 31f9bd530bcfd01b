use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use userdir::model::{NewUser, UserId, UserPatch};
use userdir::query::SortKey;

#[derive(Parser, Debug)]
#[command(name = "userdir", version)]
#[command(about = "Browse and edit a user directory backed by a remote API", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory holding users.json and config.json
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Never contact the remote API
    #[arg(long, global = true)]
    pub offline: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum SortField {
    Name,
    Email,
    Company,
}

impl From<SortField> for SortKey {
    fn from(field: SortField) -> Self {
        match field {
            SortField::Name => SortKey::Name,
            SortField::Email => SortKey::Email,
            SortField::Company => SortKey::Company,
        }
    }
}

/// Form fields shared by `add` and `edit`.
#[derive(Args, Debug, Default)]
pub struct UserFields {
    /// Full name
    #[arg(long)]
    pub name: Option<String>,

    /// Email address
    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub username: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub website: Option<String>,

    /// Company name
    #[arg(long)]
    pub company: Option<String>,

    #[arg(long)]
    pub street: Option<String>,

    #[arg(long)]
    pub city: Option<String>,

    #[arg(long)]
    pub zipcode: Option<String>,
}

impl UserFields {
    pub fn into_new_user(self, id: Option<UserId>) -> NewUser {
        NewUser {
            id,
            name: self.name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            username: self.username,
            phone: self.phone,
            website: self.website,
            company_name: self.company,
            street: self.street,
            city: self.city,
            zipcode: self.zipcode,
        }
    }

    pub fn into_patch(self) -> UserPatch {
        UserPatch {
            name: self.name,
            username: self.username,
            email: self.email,
            phone: self.phone,
            website: self.website,
            company_name: self.company,
            street: self.street,
            city: self.city,
            zipcode: self.zipcode,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List users
    #[command(alias = "ls")]
    List {
        /// Only users whose name or email contains this text
        #[arg(short, long)]
        search: Option<String>,

        /// Sort by field
        #[arg(long, value_enum)]
        sort: Option<SortField>,

        /// Reverse the sort order
        #[arg(long, requires = "sort")]
        desc: bool,
    },

    /// Show one user
    #[command(alias = "v")]
    View { id: UserId },

    /// Add a user
    #[command(alias = "n")]
    Add {
        #[command(flatten)]
        fields: UserFields,

        /// Preferred id (a fresh one is used if it is taken)
        #[arg(long)]
        id: Option<UserId>,

        /// Save even if the form has problems
        #[arg(long)]
        force: bool,
    },

    /// Edit a user's fields
    #[command(alias = "e")]
    Edit {
        id: UserId,

        #[command(flatten)]
        fields: UserFields,

        /// Save even if the form has problems
        #[arg(long)]
        force: bool,
    },

    /// Delete one or more users
    #[command(alias = "rm")]
    Delete {
        #[arg(required = true, num_args = 1..)]
        ids: Vec<UserId>,
    },

    /// Fetch users from the remote API and merge them in
    Refresh,

    /// Get or set configuration
    Config {
        /// Configuration key (api-url, timeout, storage-key, auto-refresh)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_add_form() {
        let cli = Cli::try_parse_from([
            "userdir", "add", "--name", "Ann", "--email", "ann@x.com", "--city", "Porto",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Add { fields, id, force }) => {
                let input = fields.into_new_user(id);
                assert_eq!(input.name, "Ann");
                assert_eq!(input.city.as_deref(), Some("Porto"));
                assert_eq!(input.id, None);
                assert!(!force);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn desc_requires_sort() {
        assert!(Cli::try_parse_from(["userdir", "list", "--desc"]).is_err());
        assert!(Cli::try_parse_from(["userdir", "list", "--sort", "email", "--desc"]).is_ok());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["userdir", "list", "--offline", "--data-dir", "/tmp/x"])
            .unwrap();
        assert!(cli.offline);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/x")));
    }
}
