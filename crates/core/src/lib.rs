//! Shared domain types for the Bazaar account client.
//!
//! This crate holds the validated value types that flow between the account
//! client, its credential mirror, and the presentation layer. Construction
//! goes through `parse` so that an instance in hand is always well-formed.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::{
    AccountType, AccountTypeError, Email, EmailError, PhoneNumber, PhoneNumberError,
};
