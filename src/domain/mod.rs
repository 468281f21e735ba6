//! Domain aggregates exposed by the enquiry layer.

pub mod customer;
pub mod enquiry;
pub mod types;
