use serde::{Deserialize, Serialize};

pub type UserId = u64;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub zipcode: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub name: String,
}

/// A directory entry. Field names match the remote API and the persisted blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub username: String,
    pub email: String,
    pub address: Address,
    pub phone: String,
    pub website: String,
    pub company: Company,
}

/// Input for the add path. Only `name` and `email` are required.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewUser {
    /// Preferred id, used only when no existing user holds it.
    pub id: Option<UserId>,
    pub name: String,
    pub email: String,
    pub username: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub company_name: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub zipcode: Option<String>,
}

impl NewUser {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: UserId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn into_user(self, id: UserId) -> User {
        User {
            id,
            name: self.name,
            username: self.username.unwrap_or_default(),
            email: self.email,
            address: Address {
                street: self.street.unwrap_or_default(),
                city: self.city.unwrap_or_default(),
                zipcode: self.zipcode.unwrap_or_default(),
            },
            phone: self.phone.unwrap_or_default(),
            website: self.website.unwrap_or_default(),
            company: Company {
                name: self.company_name.unwrap_or_default(),
            },
        }
    }
}

/// Field-wise replacement for the edit path. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub company_name: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub zipcode: Option<String>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(&self, user: &mut User) {
        fn set(slot: &mut String, value: &Option<String>) {
            if let Some(v) = value {
                slot.clone_from(v);
            }
        }

        set(&mut user.name, &self.name);
        set(&mut user.username, &self.username);
        set(&mut user.email, &self.email);
        set(&mut user.phone, &self.phone);
        set(&mut user.website, &self.website);
        set(&mut user.company.name, &self.company_name);
        set(&mut user.address.street, &self.street);
        set(&mut user.address.city, &self.city);
        set(&mut user.address.zipcode, &self.zipcode);
    }
}
