use async_trait::async_trait;

use crate::{
    domain::{
        customer::{Customer, NewCustomer},
        enquiry::{Enquiry, NewEnquiry},
        types::EnquiryId,
    },
    repository::errors::RepositoryResult,
};

pub mod errors;
pub mod fallback;
pub mod http;
pub mod memory;
#[cfg(feature = "test-mocks")]
pub mod mock;
pub mod store;

pub use fallback::FallbackSource;
pub use http::HttpRepository;
pub use memory::InMemoryRepository;
pub use store::{EnquiryStore, StoreHandle};

/// Page requested from the enquiry listing endpoint.
pub const DEFAULT_LIST_PAGE: usize = 1;
pub const DEFAULT_LIST_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnquiryListQuery {
    pub pagination: Pagination,
}

impl Default for EnquiryListQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl EnquiryListQuery {
    pub fn new() -> Self {
        Self {
            pagination: Pagination {
                page: DEFAULT_LIST_PAGE,
                per_page: DEFAULT_LIST_LIMIT,
            },
        }
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Pagination { page, per_page };
        self
    }
}

#[async_trait]
pub trait EnquiryReader: Send + Sync {
    async fn list_enquiries(&self, query: EnquiryListQuery) -> RepositoryResult<Vec<Enquiry>>;
}

#[async_trait]
pub trait EnquiryWriter: Send + Sync {
    /// Creates the enquiry. The backend does not always echo the new id.
    async fn create_enquiry(&self, new_enquiry: &NewEnquiry)
    -> RepositoryResult<Option<EnquiryId>>;
    async fn update_enquiry(&self, enquiry: &Enquiry) -> RepositoryResult<()>;
}

#[async_trait]
pub trait CustomerWriter: Send + Sync {
    async fn create_customer(&self, new_customer: &NewCustomer) -> RepositoryResult<Customer>;
}
