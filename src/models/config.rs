//! Configuration model loaded from external sources.

use serde::Deserialize;

use crate::DEFAULT_API_BASE_URL;
use crate::pagination::DEFAULT_PAGE_SIZE;

#[derive(Clone, Debug, Deserialize)]
/// Settings for the enquiry API client and the table view.
pub struct ClientConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,
    /// Replaces the bundled fallback dataset when set.
    #[serde(default)]
    pub fallback_path: Option<String>,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            default_page_size: default_page_size(),
            fallback_path: None,
        }
    }
}
