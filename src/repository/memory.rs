//! In-process repository used by tests and offline runs.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::domain::customer::{Customer, NewCustomer};
use crate::domain::enquiry::{Enquiry, NewEnquiry};
use crate::domain::types::{CustomerId, EnquiryId};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{CustomerWriter, EnquiryListQuery, EnquiryReader, EnquiryWriter};

#[derive(Debug, Default)]
struct State {
    enquiries: Vec<Enquiry>,
    customers: Vec<Customer>,
    next_enquiry_id: i64,
    next_customer_id: i64,
    fail_reads: bool,
    fail_writes: bool,
}

#[derive(Debug, Default)]
pub struct InMemoryRepository {
    state: Mutex<State>,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::with_enquiries(Vec::new())
    }

    pub fn with_enquiries(enquiries: Vec<Enquiry>) -> Self {
        let next_enquiry_id = enquiries
            .iter()
            .filter_map(|e| e.enquiry_id.as_number())
            .max()
            .unwrap_or(0)
            + 1;

        Self {
            state: Mutex::new(State {
                enquiries,
                next_enquiry_id,
                next_customer_id: 1,
                ..State::default()
            }),
            reads: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
        }
    }

    fn lock(&self) -> RepositoryResult<std::sync::MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|_| RepositoryError::Unexpected("repository state poisoned".to_string()))
    }

    pub fn set_fail_reads(&self, fail: bool) -> RepositoryResult<()> {
        self.lock()?.fail_reads = fail;
        Ok(())
    }

    pub fn set_fail_writes(&self, fail: bool) -> RepositoryResult<()> {
        self.lock()?.fail_writes = fail;
        Ok(())
    }

    /// Number of list calls served so far.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of create/update calls received so far, failed ones included.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn enquiries(&self) -> RepositoryResult<Vec<Enquiry>> {
        Ok(self.lock()?.enquiries.clone())
    }

    pub fn customers(&self) -> RepositoryResult<Vec<Customer>> {
        Ok(self.lock()?.customers.clone())
    }

    fn begin_write(&self) -> RepositoryResult<std::sync::MutexGuard<'_, State>> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let state = self.lock()?;
        if state.fail_writes {
            return Err(RepositoryError::Transport("connection refused".to_string()));
        }
        Ok(state)
    }
}

#[async_trait]
impl EnquiryReader for InMemoryRepository {
    async fn list_enquiries(&self, query: EnquiryListQuery) -> RepositoryResult<Vec<Enquiry>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let state = self.lock()?;
        if state.fail_reads {
            return Err(RepositoryError::Transport("connection refused".to_string()));
        }

        let per_page = query.pagination.per_page;
        let skip = query.pagination.page.saturating_sub(1) * per_page;
        Ok(state
            .enquiries
            .iter()
            .skip(skip)
            .take(per_page)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl EnquiryWriter for InMemoryRepository {
    async fn create_enquiry(
        &self,
        new_enquiry: &NewEnquiry,
    ) -> RepositoryResult<Option<EnquiryId>> {
        let mut state = self.begin_write()?;

        let customer_name = state
            .customers
            .iter()
            .find(|c| c.customer_id == new_enquiry.customer_id)
            .map(|c| c.name.clone())
            .ok_or(RepositoryError::NotFound)?;

        let enquiry_id = EnquiryId::numeric(state.next_enquiry_id)?;
        state.next_enquiry_id += 1;

        state.enquiries.push(Enquiry {
            enquiry_id: enquiry_id.clone(),
            customer_id: Some(new_enquiry.customer_id.clone()),
            customer_name,
            enquiry_datetime: new_enquiry.enquiry_datetime,
            status: new_enquiry.status,
            products: new_enquiry.products.clone(),
        });

        Ok(Some(enquiry_id))
    }

    async fn update_enquiry(&self, enquiry: &Enquiry) -> RepositoryResult<()> {
        let mut state = self.begin_write()?;
        let existing = state
            .enquiries
            .iter_mut()
            .find(|e| e.enquiry_id == enquiry.enquiry_id)
            .ok_or(RepositoryError::NotFound)?;
        *existing = enquiry.clone();
        Ok(())
    }
}

#[async_trait]
impl CustomerWriter for InMemoryRepository {
    async fn create_customer(&self, new_customer: &NewCustomer) -> RepositoryResult<Customer> {
        let mut state = self.begin_write()?;

        let customer_id = CustomerId::numeric(state.next_customer_id)?;
        state.next_customer_id += 1;

        let customer = Customer {
            customer_id,
            name: new_customer.name.as_str().to_string(),
            address: None,
            contact_owner: None,
            department: None,
            email: new_customer.email.as_ref().map(|e| e.as_str().to_string()),
            flag: None,
            landline: None,
            mobile: None,
            organization: new_customer.organization.clone(),
            phone: new_customer.phone.as_ref().map(|p| p.as_str().to_string()),
            tag: None,
            title: None,
        };
        state.customers.push(customer.clone());

        Ok(customer)
    }
}
