//! Domain models for the account client.

mod address;
mod credential;
mod forms;
mod user;

pub use address::Address;
pub use credential::{OFFLINE_TOKEN, PasswordHashError, StoredCredential};
pub use forms::{IdCard, LoginRequest, RegisterForm};
pub use user::User;
