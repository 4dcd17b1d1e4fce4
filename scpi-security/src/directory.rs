//! In-memory user directory.

use std::sync::{LazyLock, OnceLock};
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use regex::Regex;
use tracing::{debug, info};

use crate::error::{Result, SecurityError};
use crate::password::PasswordHasher;
use crate::user::{Role, User, UserId, UserProfile};

/// Verified on unknown addresses so they cost as much as a wrong password.
const DECOY_PASSWORD: &str = "decoy-password";

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s.]+$").unwrap());

/// Registered accounts, indexed by id and by e-mail.
///
/// E-mail uniqueness is case-insensitive; the address is stored as typed.
pub struct UserDirectory {
    users: DashMap<UserId, User>,
    emails: DashMap<String, UserId>,
    next_id: AtomicU64,
    hasher: PasswordHasher,
    decoy_hash: OnceLock<String>,
}

impl std::fmt::Debug for UserDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserDirectory")
            .field("users", &self.users.len())
            .finish_non_exhaustive()
    }
}

impl UserDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new(hasher: PasswordHasher) -> Self {
        Self {
            users: DashMap::new(),
            emails: DashMap::new(),
            next_id: AtomicU64::new(1),
            hasher,
            decoy_hash: OnceLock::new(),
        }
    }

    /// Registers a regular user.
    pub fn register(&self, email: &str, password: &str) -> Result<UserProfile> {
        self.register_with_roles(email, password, [Role::User])
    }

    /// Registers a user with extra roles.
    ///
    /// # Errors
    ///
    /// - [`SecurityError::MissingField`] for a blank e-mail or empty password
    /// - [`SecurityError::InvalidEmail`] for a malformed address
    /// - [`SecurityError::EmailTaken`] if the address is already registered
    pub fn register_with_roles(
        &self,
        email: &str,
        password: &str,
        roles: impl IntoIterator<Item = Role>,
    ) -> Result<UserProfile> {
        let email = email.trim();
        require_credentials(email, password)?;
        if !EMAIL.is_match(email) {
            return Err(SecurityError::InvalidEmail {
                email: email.to_string(),
            });
        }

        let key = email.to_lowercase();
        if self.emails.contains_key(&key) {
            return Err(SecurityError::EmailTaken);
        }

        let password_hash = self.hasher.hash(password)?;

        let id = match self.emails.entry(key) {
            Entry::Occupied(_) => return Err(SecurityError::EmailTaken),
            Entry::Vacant(slot) => {
                let id = UserId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
                slot.insert(id);
                id
            }
        };

        let user = User::new(id, email, password_hash, roles);
        let profile = user.profile();
        self.users.insert(id, user);

        info!(user_id = %id, "User registered");
        Ok(profile)
    }

    /// Checks credentials and records the login.
    ///
    /// Unknown addresses and wrong passwords both yield
    /// [`SecurityError::InvalidCredentials`].
    pub fn authenticate(&self, email: &str, password: &str) -> Result<UserProfile> {
        let email = email.trim();
        require_credentials(email, password)?;

        let Some(id) = self.emails.get(&email.to_lowercase()).map(|entry| *entry.value()) else {
            // Same Argon2 cost as a wrong password, same error.
            self.hasher.verify(password, self.decoy_hash()?)?;
            debug!("Login attempt for unknown e-mail");
            return Err(SecurityError::InvalidCredentials);
        };
        let stored_hash = self
            .users
            .get(&id)
            .map(|user| user.password_hash().to_string())
            .ok_or(SecurityError::InvalidCredentials)?;

        if !self.hasher.verify(password, &stored_hash)? {
            debug!(user_id = %id, "Password mismatch");
            return Err(SecurityError::InvalidCredentials);
        }

        let mut user = self
            .users
            .get_mut(&id)
            .ok_or(SecurityError::InvalidCredentials)?;
        user.record_login();
        Ok(user.profile())
    }

    /// Looks up a user by id.
    #[must_use]
    pub fn find_by_id(&self, id: UserId) -> Option<UserProfile> {
        self.users.get(&id).map(|user| user.profile())
    }

    /// Number of registered users.
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Returns true if nobody is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Hash of [`DECOY_PASSWORD`] under the configured parameters, built on first use.
    fn decoy_hash(&self) -> Result<&str> {
        if let Some(hash) = self.decoy_hash.get() {
            return Ok(hash);
        }
        let hash = self.hasher.hash(DECOY_PASSWORD)?;
        Ok(self.decoy_hash.get_or_init(|| hash))
    }
}

fn require_credentials(email: &str, password: &str) -> Result<()> {
    if email.is_empty() {
        return Err(SecurityError::missing_field("email"));
    }
    if password.is_empty() {
        return Err(SecurityError::missing_field("password"));
    }
    Ok(())
}
