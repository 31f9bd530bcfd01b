use crate::model::User;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Name,
    Email,
    Company,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// A derived view over the collection: optional search, optional sort.
#[derive(Debug, Clone, Default)]
pub struct UserQuery {
    /// Case-insensitive substring matched against name and email.
    pub search: Option<String>,
    pub sort: Option<SortKey>,
    pub order: SortOrder,
}

impl UserQuery {
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn sort_by(mut self, key: SortKey, order: SortOrder) -> Self {
        self.sort = Some(key);
        self.order = order;
        self
    }

    pub fn matches(&self, user: &User) -> bool {
        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                user.name.to_lowercase().contains(&term)
                    || user.email.to_lowercase().contains(&term)
            }
        }
    }

    /// Apply the query. Ties keep collection order.
    pub fn apply<'a, I>(&self, users: I) -> Vec<User>
    where
        I: IntoIterator<Item = &'a User>,
    {
        let mut view: Vec<User> = users
            .into_iter()
            .filter(|u| self.matches(u))
            .cloned()
            .collect();

        if let Some(key) = self.sort {
            view.sort_by(|a, b| {
                let ord = compare(a, b, key);
                match self.order {
                    SortOrder::Ascending => ord,
                    SortOrder::Descending => ord.reverse(),
                }
            });
        }
        view
    }
}

fn compare(a: &User, b: &User, key: SortKey) -> Ordering {
    let (left, right) = match key {
        SortKey::Name => (&a.name, &b.name),
        SortKey::Email => (&a.email, &b.email),
        SortKey::Company => (&a.company.name, &b.company.name),
    };
    left.to_lowercase().cmp(&right.to_lowercase())
}
