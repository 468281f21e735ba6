//! DTOs that bridge the controllers with whatever renders them.

pub mod notification;
pub mod table;
