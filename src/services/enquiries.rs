use crate::domain::customer::{Customer, NewCustomer};
use crate::domain::enquiry::{Enquiry, NewEnquiry};
use crate::domain::types::EnquiryId;
use crate::repository::{CustomerWriter, EnquiryListQuery, EnquiryReader, EnquiryWriter};
use crate::services::{ServiceError, ServiceResult};

/// Fetches the enquiry collection shown by the table.
pub async fn list_enquiries<R>(repo: &R) -> ServiceResult<Vec<Enquiry>>
where
    R: EnquiryReader + ?Sized,
{
    repo.list_enquiries(EnquiryListQuery::new())
        .await
        .map_err(|err| {
            log::error!("Failed to list enquiries: {err}");
            ServiceError::from(err)
        })
}

/// Looks an enquiry up by id in the fetched collection.
pub async fn find_enquiry<R>(repo: &R, enquiry_id: &EnquiryId) -> ServiceResult<Option<Enquiry>>
where
    R: EnquiryReader + ?Sized,
{
    let enquiries = list_enquiries(repo).await?;
    Ok(enquiries
        .into_iter()
        .find(|enquiry| &enquiry.enquiry_id == enquiry_id))
}

/// Case-insensitive filter over id, customer name and status. The term is
/// matched as typed, surrounding whitespace included.
pub fn search_enquiries(enquiries: &[Enquiry], term: &str) -> Vec<Enquiry> {
    enquiries
        .iter()
        .filter(|enquiry| enquiry.matches_search(term))
        .cloned()
        .collect()
}

/// Creates the customer an enquiry will be attached to.
pub async fn provision_customer<R>(repo: &R, new_customer: &NewCustomer) -> ServiceResult<Customer>
where
    R: CustomerWriter + ?Sized,
{
    let customer = repo.create_customer(new_customer).await.map_err(|err| {
        log::error!("Failed to create customer {}: {err}", new_customer.name);
        ServiceError::from(err)
    })?;
    log::info!("Provisioned customer {}", customer.customer_id);
    Ok(customer)
}

pub async fn create_enquiry<R>(repo: &R, new_enquiry: &NewEnquiry) -> ServiceResult<Option<EnquiryId>>
where
    R: EnquiryWriter + ?Sized,
{
    let enquiry_id = repo.create_enquiry(new_enquiry).await.map_err(|err| {
        log::error!(
            "Failed to create enquiry for customer {}: {err}",
            new_enquiry.customer_id
        );
        ServiceError::from(err)
    })?;

    match &enquiry_id {
        Some(id) => log::info!("Created enquiry {id}"),
        None => log::info!("Created enquiry for customer {}", new_enquiry.customer_id),
    }
    Ok(enquiry_id)
}

pub async fn update_enquiry<R>(repo: &R, enquiry: &Enquiry) -> ServiceResult<()>
where
    R: EnquiryWriter + ?Sized,
{
    repo.update_enquiry(enquiry).await.map_err(|err| {
        log::error!("Failed to update enquiry {}: {err}", enquiry.enquiry_id);
        ServiceError::from(err)
    })?;
    log::info!("Updated enquiry {}", enquiry.enquiry_id);
    Ok(())
}
