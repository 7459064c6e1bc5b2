//! Business logic helpers used by the handlers.

pub mod account;
