//! Authentication flow.
//!
//! ## Module Organization
//!
//! - `account`: Registration, login and provisioning of accounts
//! - `authenticate`: Per-request authentication (single user, basic auth, proxy)
//! - `depot`: Helpers for reading the authenticated account from a Salvo depot
//! - `password`: Password hashing and verification with Argon2

pub mod account;
pub mod authenticate;
pub mod depot;
pub mod password;

pub use account::{login, provision_account, register};
pub use authenticate::authenticate;
pub use depot::{get_account_from_depot, is_authenticated};
