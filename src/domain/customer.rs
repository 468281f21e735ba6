use serde::{Deserialize, Serialize};

use crate::domain::types::{CustomerEmail, CustomerId, CustomerName, PhoneNumber};

/// Customer record as known to the backend.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Customer {
    pub customer_id: CustomerId,
    pub name: String,
    pub address: Option<String>,
    pub contact_owner: Option<String>,
    pub department: Option<String>,
    pub email: Option<String>,
    pub flag: Option<String>,
    pub landline: Option<String>,
    pub mobile: Option<String>,
    pub organization: Option<String>,
    pub phone: Option<String>,
    pub tag: Option<String>,
    pub title: Option<String>,
}

/// Customer provisioned as a side effect of enquiry creation.
#[derive(Clone, Debug, PartialEq)]
pub struct NewCustomer {
    pub name: CustomerName,
    pub email: Option<CustomerEmail>,
    pub phone: Option<PhoneNumber>,
    pub organization: Option<String>,
}

impl NewCustomer {
    #[must_use]
    pub fn new(name: CustomerName) -> Self {
        Self {
            name,
            email: None,
            phone: None,
            organization: None,
        }
    }

    pub fn email(mut self, email: CustomerEmail) -> Self {
        self.email = Some(email);
        self
    }

    pub fn phone(mut self, phone: PhoneNumber) -> Self {
        self.phone = Some(phone);
        self
    }

    pub fn organization(mut self, organization: impl Into<String>) -> Self {
        let organization = organization.into().trim().to_string();
        self.organization = (!organization.is_empty()).then_some(organization);
        self
    }
}
