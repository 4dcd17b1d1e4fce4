//! # SCPI Security
//!
//! Account and session handling for the SCPI portfolio simulator.
//!
//! This crate provides:
//! - Argon2id password hashing with salts from the system CSPRNG
//! - An in-memory user directory with e-mail validation
//! - Role definitions (`ROLE_USER`, `ROLE_ADMIN`)
//! - Revocable sessions backing the API's bearer tokens
//!
//! # Example
//!
//! ```
//! use scpi_security::{PasswordHasher, PasswordParams, UserDirectory};
//!
//! let hasher = PasswordHasher::new(&PasswordParams::minimal()).unwrap();
//! let directory = UserDirectory::new(hasher);
//!
//! let user = directory.register("alice@example.com", "s3cret").unwrap();
//! let logged_in = directory.authenticate("alice@example.com", "s3cret").unwrap();
//! assert_eq!(user.id, logged_in.id);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]

pub mod directory;
pub mod error;
pub mod password;
pub mod session;
pub mod user;

pub use directory::UserDirectory;
pub use error::{Result, SecurityError};
pub use password::{PasswordHasher, PasswordParams};
pub use session::{Session, SessionManager};
pub use user::{Role, User, UserId, UserProfile};
