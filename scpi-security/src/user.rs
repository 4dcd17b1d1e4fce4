//! User accounts and roles.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Numeric user identifier, assigned sequentially on registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(u64);

impl UserId {
    /// Creates a user id.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Authorization role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Regular account. Every user has it.
    #[serde(rename = "ROLE_USER")]
    User,
    /// Administrator.
    #[serde(rename = "ROLE_ADMIN")]
    Admin,
}

impl Role {
    /// Wire name of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "ROLE_USER",
            Self::Admin => "ROLE_ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered account.
#[derive(Debug, Clone)]
pub struct User {
    id: UserId,
    email: String,
    password_hash: String,
    roles: BTreeSet<Role>,
    created_at: DateTime<Utc>,
    last_login: Option<DateTime<Utc>>,
}

impl User {
    /// Creates a user. [`Role::User`] is always granted.
    #[must_use]
    pub fn new(
        id: UserId,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        roles: impl IntoIterator<Item = Role>,
    ) -> Self {
        let mut roles: BTreeSet<Role> = roles.into_iter().collect();
        roles.insert(Role::User);
        Self {
            id,
            email: email.into(),
            password_hash: password_hash.into(),
            roles,
            created_at: Utc::now(),
            last_login: None,
        }
    }

    /// Returns the user id.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the e-mail address as registered.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the stored PHC hash.
    #[must_use]
    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    /// Returns the roles in a stable order.
    #[must_use]
    pub fn roles(&self) -> Vec<Role> {
        self.roles.iter().copied().collect()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last login timestamp.
    #[must_use]
    pub const fn last_login(&self) -> Option<DateTime<Utc>> {
        self.last_login
    }

    /// Records a login.
    pub fn record_login(&mut self) {
        self.last_login = Some(Utc::now());
    }

    /// Public view of the account.
    #[must_use]
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            email: self.email.clone(),
            roles: self.roles(),
        }
    }
}

/// Account fields safe to return to clients: `{"id", "email", "roles"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// User id.
    pub id: UserId,
    /// E-mail address.
    pub email: String,
    /// Granted roles.
    pub roles: Vec<Role>,
}
