//! Validated value types.

mod account_type;
mod email;
mod phone;

pub use account_type::{AccountType, AccountTypeError};
pub use email::{Email, EmailError};
pub use phone::{PhoneNumber, PhoneNumberError};
