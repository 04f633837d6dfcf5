//! Submitted form values for login and registration.

use secrecy::SecretString;

use bazaar_core::{AccountType, Email, PhoneNumber};

/// Values submitted by the login form.
#[derive(Debug)]
pub struct LoginRequest {
    pub email: Email,
    pub password: SecretString,
    pub account_type: AccountType,
}

/// Values submitted by the registration form.
///
/// The id-card photo is only meaningful for worker registrations; the
/// customer form has no such field and the client ignores it for customers.
#[derive(Debug)]
pub struct RegisterForm {
    pub display_name: String,
    pub email: Email,
    pub phone_number: PhoneNumber,
    pub password: SecretString,
    pub account_type: AccountType,
    pub id_card: Option<IdCard>,
}

/// An uploaded identity document, attached to worker registrations as a
/// multipart file part.
#[derive(Debug, Clone)]
pub struct IdCard {
    pub file_name: String,
    pub bytes: Vec<u8>,
}
