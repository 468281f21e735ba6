//! Mock repository implementations for isolating services in tests.

use async_trait::async_trait;
use mockall::mock;

use crate::domain::customer::{Customer, NewCustomer};
use crate::domain::enquiry::{Enquiry, NewEnquiry};
use crate::domain::types::EnquiryId;
use crate::repository::errors::RepositoryResult;
use crate::repository::{CustomerWriter, EnquiryListQuery, EnquiryReader, EnquiryWriter};

mock! {
    pub Repository {}

    #[async_trait]
    impl EnquiryReader for Repository {
        async fn list_enquiries(&self, query: EnquiryListQuery) -> RepositoryResult<Vec<Enquiry>>;
    }

    #[async_trait]
    impl EnquiryWriter for Repository {
        async fn create_enquiry(
            &self,
            new_enquiry: &NewEnquiry,
        ) -> RepositoryResult<Option<EnquiryId>>;
        async fn update_enquiry(&self, enquiry: &Enquiry) -> RepositoryResult<()>;
    }

    #[async_trait]
    impl CustomerWriter for Repository {
        async fn create_customer(&self, new_customer: &NewCustomer) -> RepositoryResult<Customer>;
    }
}
