//! Wire records for the customer endpoint.

use serde::{Deserialize, Serialize};

use crate::domain::customer::{Customer as DomainCustomer, NewCustomer as DomainNewCustomer};
use crate::domain::types::{CustomerId, IdentifierValue, TypeConstraintError};

/// Body of `POST /v1/customers/`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewCustomerRecord {
    pub customer_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
}

/// Customer returned by the backend. Only the identifier is guaranteed;
/// older revisions answer with `id` instead of `customer_id`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerRecord {
    #[serde(default)]
    pub customer_id: Option<IdentifierValue>,
    #[serde(default)]
    pub id: Option<IdentifierValue>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub contact_owner: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub flag: Option<String>,
    #[serde(default)]
    pub landline: Option<String>,
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl From<&DomainNewCustomer> for NewCustomerRecord {
    fn from(customer: &DomainNewCustomer) -> Self {
        Self {
            customer_name: customer.name.as_str().to_string(),
            email: customer.email.as_ref().map(|e| e.as_str().to_string()),
            phone: customer.phone.as_ref().map(|p| p.as_str().to_string()),
            organization: customer.organization.clone(),
        }
    }
}

impl CustomerRecord {
    /// Converts the response into a domain customer, filling the fields the
    /// backend did not echo back from the submitted request.
    pub fn into_domain(
        self,
        requested: &DomainNewCustomer,
    ) -> Result<DomainCustomer, TypeConstraintError> {
        let customer_id = self
            .customer_id
            .or(self.id)
            .ok_or(TypeConstraintError::MissingId)
            .and_then(CustomerId::try_from)?;

        Ok(DomainCustomer {
            customer_id,
            name: self
                .name
                .or(self.customer_name)
                .unwrap_or_else(|| requested.name.as_str().to_string()),
            address: self.address,
            contact_owner: self.contact_owner,
            department: self.department,
            email: self
                .email
                .or_else(|| requested.email.as_ref().map(|e| e.as_str().to_string())),
            flag: self.flag,
            landline: self.landline,
            mobile: self.mobile,
            organization: self.organization.or_else(|| requested.organization.clone()),
            phone: self
                .phone
                .or_else(|| requested.phone.as_ref().map(|p| p.as_str().to_string())),
            tag: self.tag,
            title: self.title,
        })
    }
}
