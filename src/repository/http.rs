//! reqwest-backed repository talking to the order management API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};

use crate::domain::customer::{Customer, NewCustomer};
use crate::domain::enquiry::{Enquiry, NewEnquiry};
use crate::domain::types::EnquiryId;
use crate::models::config::ClientConfig;
use crate::models::customer::{CustomerRecord, NewCustomerRecord};
use crate::models::enquiry::{CreatedEnquiryRecord, EnquiryRecord, NewEnquiryRecord};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::fallback::FallbackSource;
use crate::repository::{CustomerWriter, EnquiryListQuery, EnquiryReader, EnquiryWriter};

const ENQUIRIES_PATH: &str = "/v1/enquiries/";
const CUSTOMERS_PATH: &str = "/v1/customers/";

#[derive(Clone, Debug)]
pub struct HttpRepository {
    client: Client,
    base_url: String,
    fallback: FallbackSource,
}

impl HttpRepository {
    /// Builds a repository with the configured base URL, timeout and fallback.
    pub fn new(config: &ClientConfig) -> RepositoryResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self::with_client(
            client,
            &config.api_base_url,
            FallbackSource::from_config(config.fallback_path.as_deref()),
        ))
    }

    pub fn with_client(client: Client, base_url: &str, fallback: FallbackSource) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            fallback,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn fetch_enquiries(&self, query: &EnquiryListQuery) -> RepositoryResult<Vec<EnquiryRecord>> {
        let response = self
            .client
            .get(self.url(ENQUIRIES_PATH))
            .query(&[
                ("page", query.pagination.page),
                ("limit", query.pagination.per_page),
            ])
            .send()
            .await?;

        let body = ensure_success(response).await?.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    fn load_fallback(&self) -> RepositoryResult<Vec<EnquiryRecord>> {
        self.fallback.load().map_err(|err| {
            log::error!("Failed to load fallback enquiries: {err}");
            err
        })
    }
}

async fn ensure_success(response: Response) -> RepositoryResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(RepositoryError::Status {
        status: status.as_u16(),
        body,
    })
}

/// Converts wire records, skipping the ones that violate domain rules.
fn into_enquiries(records: Vec<EnquiryRecord>) -> Vec<Enquiry> {
    records
        .into_iter()
        .filter_map(|record| {
            let id = record.enquiry_id.clone();
            match Enquiry::try_from(record) {
                Ok(enquiry) => Some(enquiry),
                Err(err) => {
                    log::warn!("Skipping enquiry {id:?}: {err}");
                    None
                }
            }
        })
        .collect()
}

#[async_trait]
impl EnquiryReader for HttpRepository {
    async fn list_enquiries(&self, query: EnquiryListQuery) -> RepositoryResult<Vec<Enquiry>> {
        let records = match self.fetch_enquiries(&query).await {
            Ok(records) if !records.is_empty() => records,
            Ok(_) => {
                log::info!("Enquiry API returned no records, using fallback dataset");
                self.load_fallback()?
            }
            Err(err) => {
                log::warn!("Enquiry API unavailable ({err}), using fallback dataset");
                self.load_fallback()?
            }
        };

        Ok(into_enquiries(records))
    }
}

#[async_trait]
impl EnquiryWriter for HttpRepository {
    async fn create_enquiry(
        &self,
        new_enquiry: &NewEnquiry,
    ) -> RepositoryResult<Option<EnquiryId>> {
        let payload = NewEnquiryRecord::from(new_enquiry);
        let response = self
            .client
            .post(self.url(ENQUIRIES_PATH))
            .json(&payload)
            .send()
            .await
            .map_err(|err| {
                log::error!("Failed to create enquiry: {err}");
                err
            })?;

        let body = ensure_success(response).await?.text().await?;
        if body.trim().is_empty() {
            return Ok(None);
        }

        match serde_json::from_str::<CreatedEnquiryRecord>(&body) {
            Ok(created) => Ok(created.into_enquiry_id()),
            Err(err) => {
                log::warn!("Enquiry created but response was not understood: {err}");
                Ok(None)
            }
        }
    }

    async fn update_enquiry(&self, enquiry: &Enquiry) -> RepositoryResult<()> {
        let payload = EnquiryRecord::from(enquiry);
        let url = self.url(&format!("{ENQUIRIES_PATH}{}/", enquiry.enquiry_id));
        let response = self
            .client
            .put(url)
            .json(&payload)
            .send()
            .await
            .map_err(|err| {
                log::error!("Failed to update enquiry {}: {err}", enquiry.enquiry_id);
                err
            })?;

        ensure_success(response).await?;
        Ok(())
    }
}

#[async_trait]
impl CustomerWriter for HttpRepository {
    async fn create_customer(&self, new_customer: &NewCustomer) -> RepositoryResult<Customer> {
        let payload = NewCustomerRecord::from(new_customer);
        let response = self
            .client
            .post(self.url(CUSTOMERS_PATH))
            .json(&payload)
            .send()
            .await
            .map_err(|err| {
                log::error!("Failed to create customer: {err}");
                err
            })?;

        let body = ensure_success(response).await?.text().await?;
        let record: CustomerRecord = serde_json::from_str(&body)?;
        Ok(record.into_domain(new_customer)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed_from_base_url() {
        let repo = HttpRepository::with_client(
            Client::new(),
            "http://localhost:8000/",
            FallbackSource::Bundled,
        );
        assert_eq!(repo.url(ENQUIRIES_PATH), "http://localhost:8000/v1/enquiries/");
    }

    #[test]
    fn invalid_records_are_skipped() {
        let records: Vec<EnquiryRecord> = serde_json::from_value(serde_json::json!([
            {
                "enquiry_id": 1,
                "customer_name": "Acme",
                "enquiry_datetime": "2024-05-01T10:30:00",
                "status": "Open",
                "products": [{ "quantity": 2 }]
            },
            {
                "enquiry_id": 2,
                "customer_name": "Broken",
                "enquiry_datetime": "2024-05-01T10:30:00",
                "status": "Pending",
                "products": [{ "quantity": 1 }]
            }
        ]))
        .unwrap();

        let enquiries = into_enquiries(records);
        assert_eq!(enquiries.len(), 1);
        assert_eq!(enquiries[0].customer_name, "Acme");
    }
}
