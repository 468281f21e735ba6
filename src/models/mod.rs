//! Wire models shared across the enquiry repository.

pub mod config;
pub mod customer;
pub mod enquiry;
