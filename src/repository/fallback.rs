//! Static enquiry dataset served when the backend is unusable.

use std::path::PathBuf;

use crate::models::enquiry::EnquiryRecord;
use crate::repository::errors::{RepositoryError, RepositoryResult};

const BUNDLED_ENQUIRIES: &str = include_str!("../../assets/data/enquiries.json");

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FallbackSource {
    /// Dataset compiled into the binary.
    #[default]
    Bundled,
    File(PathBuf),
    Disabled,
}

impl FallbackSource {
    pub fn from_config(path: Option<&str>) -> Self {
        match path.map(str::trim) {
            Some(path) if !path.is_empty() => FallbackSource::File(PathBuf::from(path)),
            _ => FallbackSource::Bundled,
        }
    }

    pub fn load(&self) -> RepositoryResult<Vec<EnquiryRecord>> {
        let records = match self {
            FallbackSource::Bundled => serde_json::from_str(BUNDLED_ENQUIRIES)?,
            FallbackSource::File(path) => {
                let raw = std::fs::read_to_string(path).map_err(|err| {
                    log::error!("Failed to read fallback dataset {}: {err}", path.display());
                    err
                })?;
                serde_json::from_str(&raw)?
            }
            FallbackSource::Disabled => {
                return Err(RepositoryError::Fallback(
                    "no fallback dataset configured".to_string(),
                ));
            }
        };
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_dataset_parses() {
        let records = FallbackSource::Bundled.load().unwrap();
        assert!(!records.is_empty());
        assert!(records.iter().all(|r| !r.products.is_empty()));
    }

    #[test]
    fn blank_path_means_bundled() {
        assert_eq!(FallbackSource::from_config(Some("  ")), FallbackSource::Bundled);
        assert_eq!(FallbackSource::from_config(None), FallbackSource::Bundled);
        assert_eq!(
            FallbackSource::from_config(Some("data.json")),
            FallbackSource::File(PathBuf::from("data.json"))
        );
    }

    #[test]
    fn missing_file_is_a_fallback_error() {
        let source = FallbackSource::File(PathBuf::from("/nonexistent/enquiries.json"));
        assert!(matches!(source.load(), Err(RepositoryError::Fallback(_))));
        assert!(matches!(
            FallbackSource::Disabled.load(),
            Err(RepositoryError::Fallback(_))
        ));
    }
}
