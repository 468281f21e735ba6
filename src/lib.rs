#[cfg(feature = "data")]
pub mod domain;
#[cfg(feature = "data")]
pub mod dto;
#[cfg(feature = "data")]
pub mod forms;
#[cfg(feature = "data")]
pub mod models;
#[cfg(feature = "data")]
pub mod pagination;

#[cfg(feature = "client")]
pub mod error_conversions;
#[cfg(feature = "client")]
pub mod repository;
#[cfg(feature = "client")]
pub mod services;
#[cfg(feature = "client")]
pub mod shell;

/// Backend used when no `api_base_url` is configured.
pub const DEFAULT_API_BASE_URL: &str = "https://order-management-api-knhi.onrender.com";
