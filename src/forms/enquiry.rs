//! Enquiry and product forms with their validation rules and the mapping
//! between form values and domain values.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::domain::customer::NewCustomer;
use crate::domain::enquiry::{
    Enquiry, EnquiryChanges, EnquiryProduct, NewEnquiry, format_form_datetime,
    parse_local_datetime,
};
use crate::domain::types::{
    AttachmentRef, CAS_NUMBER_RE, CATALOG_NUMBER_RE, CasNumber, CatalogNumber, CustomerEmail,
    CustomerId, CustomerName, EnquiryStatus, Flag, PhoneNumber, Quantity, non_negative,
    normalize_phone_to_e164,
};
use crate::forms::FormError;

/// Operating mode of the enquiry modal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormMode {
    Create,
    Edit,
    View,
}

impl FormMode {
    pub fn is_read_only(self) -> bool {
        self == FormMode::View
    }

    pub fn title(self) -> &'static str {
        match self {
            FormMode::Create => "Create Enquiry",
            FormMode::Edit => "Edit Enquiry",
            FormMode::View => "Enquiry Details",
        }
    }

    pub fn subtitle(self) -> &'static str {
        match self {
            FormMode::Create => "Fill in the information below to create a new enquiry",
            FormMode::Edit => "Update the enquiry information below",
            FormMode::View => "View detailed enquiry information",
        }
    }
}

impl Display for FormMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FormMode::Create => write!(f, "create"),
            FormMode::Edit => write!(f, "edit"),
            FormMode::View => write!(f, "view"),
        }
    }
}

fn validate_customer_name(value: &str) -> Result<(), ValidationError> {
    let length = value.trim().chars().count();
    if length == 0 {
        return Err(ValidationError::new("required").with_message("Customer name is required".into()));
    }
    if length < 3 {
        return Err(ValidationError::new("length")
            .with_message("Customer name must be at least 3 characters".into()));
    }
    Ok(())
}

fn validate_form_datetime(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required").with_message("Date and time are required".into()));
    }
    parse_local_datetime(value)
        .map(|_| ())
        .map_err(|_| ValidationError::new("datetime").with_message("Invalid date and time".into()))
}

fn validate_customer_phone(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Ok(());
    }
    normalize_phone_to_e164(value)
        .map(|_| ())
        .map_err(|_| ValidationError::new("phone").with_message("Invalid phone number".into()))
}

/// Editable fields of a product row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProductField {
    Quantity,
    ChemicalName,
    Price,
    CasNumber,
    CatNumber,
    MolecularWeight,
    Variant,
    Flag,
    AttachmentRef,
}

impl ProductField {
    pub const ALL: [ProductField; 9] = [
        Self::Quantity,
        Self::ChemicalName,
        Self::Price,
        Self::CasNumber,
        Self::CatNumber,
        Self::MolecularWeight,
        Self::Variant,
        Self::Flag,
        Self::AttachmentRef,
    ];

    /// Name under which validation errors are reported.
    pub fn as_str(self) -> &'static str {
        match self {
            ProductField::Quantity => "quantity",
            ProductField::ChemicalName => "chemical_name",
            ProductField::Price => "price",
            ProductField::CasNumber => "cas_number",
            ProductField::CatNumber => "cat_number",
            ProductField::MolecularWeight => "molecular_weight",
            ProductField::Variant => "variant",
            ProductField::Flag => "flag",
            ProductField::AttachmentRef => "attachment_ref",
        }
    }
}

/// Top-level fields of the enquiry form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EnquiryField {
    CustomerName,
    EnquiryDateTime,
    Status,
    CustomerEmail,
    CustomerPhone,
    CustomerOrganization,
    Products,
}

impl EnquiryField {
    pub const ALL: [EnquiryField; 7] = [
        Self::CustomerName,
        Self::EnquiryDateTime,
        Self::Status,
        Self::CustomerEmail,
        Self::CustomerPhone,
        Self::CustomerOrganization,
        Self::Products,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EnquiryField::CustomerName => "customer_name",
            EnquiryField::EnquiryDateTime => "enquiry_datetime",
            EnquiryField::Status => "status",
            EnquiryField::CustomerEmail => "customer_email",
            EnquiryField::CustomerPhone => "customer_phone",
            EnquiryField::CustomerOrganization => "customer_organization",
            EnquiryField::Products => "products",
        }
    }
}

fn blank_to_none(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_finite(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Error reported for numeric input that could not be stored.
fn rejected_input_error(field: ProductField, raw: &str) -> ValidationError {
    let (code, message) = match field {
        ProductField::Quantity => match raw.parse::<i128>() {
            Ok(value) if value < 1 => ("range", "Quantity must be at least 1"),
            Ok(_) => ("range", "Quantity is too large"),
            Err(_) => ("number", "Quantity must be a whole number"),
        },
        ProductField::Price => ("number", "Price must be a number"),
        ProductField::MolecularWeight => ("number", "Molecular weight must be a number"),
        _ => ("invalid", "Invalid value"),
    };
    let mut error = ValidationError::new(code).with_message(message.into());
    error.add_param("value".into(), &raw);
    error
}

/// Values of one product row as entered in the form.
#[derive(Clone, Debug, Default, Serialize, Deserialize, Validate, PartialEq)]
pub struct ProductForm {
    #[serde(default)]
    pub product_id: Option<String>,
    #[validate(
        required(message = "Quantity is required"),
        range(min = 1, message = "Quantity must be at least 1")
    )]
    pub quantity: Option<u32>,
    pub chemical_name: Option<String>,
    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: Option<f64>,
    #[validate(regex(path = *CAS_NUMBER_RE, message = "CAS number must look like 1234567-89-0"))]
    pub cas_number: Option<String>,
    #[validate(regex(path = *CATALOG_NUMBER_RE, message = "Catalog number must look like ISP-A123456"))]
    pub cat_number: Option<String>,
    #[validate(range(min = 0.0, message = "Molecular weight cannot be negative"))]
    pub molecular_weight: Option<f64>,
    pub variant: Option<String>,
    #[serde(default)]
    pub flag: Flag,
    pub attachment_ref: Option<String>,
    /// Raw numeric input that did not parse, reported by `validate_row`.
    #[serde(skip)]
    pub rejected: BTreeMap<ProductField, String>,
}

impl ProductForm {
    /// Applies raw input to a field. Blank input clears the field. Numeric
    /// input that does not parse leaves the field empty and is remembered
    /// so `validate_row` can report it.
    pub fn set(&mut self, field: ProductField, raw: &str) -> Result<(), FormError> {
        let value = blank_to_none(raw);
        self.rejected.remove(&field);
        match field {
            ProductField::Quantity => {
                self.quantity = self.parse_numeric(field, value, |v| v.parse::<u32>().ok());
            }
            ProductField::ChemicalName => self.chemical_name = value,
            ProductField::Price => self.price = self.parse_numeric(field, value, parse_finite),
            ProductField::CasNumber => self.cas_number = value,
            ProductField::CatNumber => self.cat_number = value,
            ProductField::MolecularWeight => {
                self.molecular_weight = self.parse_numeric(field, value, parse_finite);
            }
            ProductField::Variant => self.variant = value,
            ProductField::Flag => {
                self.flag = match value {
                    Some(flag) => flag.parse()?,
                    None => Flag::default(),
                };
            }
            ProductField::AttachmentRef => self.attachment_ref = value,
        }
        Ok(())
    }

    fn parse_numeric<T>(
        &mut self,
        field: ProductField,
        value: Option<String>,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Option<T> {
        let raw = value?;
        let parsed = parse(&raw);
        if parsed.is_none() {
            self.rejected.insert(field, raw);
        }
        parsed
    }

    /// Runs the derived rules, then replaces the errors of fields whose
    /// input was rejected by `set` with a message about that input.
    pub fn validate_row(&self) -> Result<(), ValidationErrors> {
        let mut errors = self.validate().err().unwrap_or_default();
        for (field, raw) in &self.rejected {
            errors.errors_mut().insert(
                Cow::Borrowed(field.as_str()),
                ValidationErrorsKind::Field(vec![rejected_input_error(*field, raw)]),
            );
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl From<&EnquiryProduct> for ProductForm {
    fn from(product: &EnquiryProduct) -> Self {
        Self {
            product_id: product.product_id.clone(),
            quantity: Some(product.quantity.get()),
            chemical_name: product.chemical_name.clone(),
            price: product.price,
            cas_number: product.cas_number.as_ref().map(|c| c.as_str().to_string()),
            cat_number: product.cat_number.as_ref().map(|c| c.as_str().to_string()),
            molecular_weight: product.molecular_weight,
            variant: product.variant.clone(),
            flag: product.flag,
            attachment_ref: product
                .attachment_ref
                .as_ref()
                .map(|a| a.as_str().to_string()),
            rejected: BTreeMap::new(),
        }
    }
}

impl TryFrom<&ProductForm> for EnquiryProduct {
    type Error = FormError;

    fn try_from(form: &ProductForm) -> Result<Self, Self::Error> {
        form.validate_row()?;

        let quantity = Quantity::new(form.quantity.unwrap_or_default())?;
        Ok(Self {
            product_id: form.product_id.as_deref().and_then(blank_to_none),
            quantity,
            chemical_name: form.chemical_name.as_deref().and_then(blank_to_none),
            price: form.price.map(non_negative).transpose()?,
            cas_number: form
                .cas_number
                .as_deref()
                .and_then(blank_to_none)
                .map(CasNumber::new)
                .transpose()?,
            cat_number: form
                .cat_number
                .as_deref()
                .and_then(blank_to_none)
                .map(CatalogNumber::new)
                .transpose()?,
            molecular_weight: form.molecular_weight.map(non_negative).transpose()?,
            variant: form.variant.as_deref().and_then(blank_to_none),
            flag: form.flag,
            attachment_ref: form
                .attachment_ref
                .as_deref()
                .and_then(blank_to_none)
                .map(AttachmentRef::new)
                .transpose()?,
        })
    }
}

/// Values of the enquiry form.
#[derive(Clone, Debug, Serialize, Deserialize, Validate, PartialEq)]
pub struct EnquiryForm {
    #[validate(custom(function = "validate_customer_name"))]
    pub customer_name: String,
    /// Local date/time as `YYYY-MM-DDTHH:MM`.
    #[validate(custom(function = "validate_form_datetime"))]
    pub enquiry_datetime: String,
    pub status: EnquiryStatus,
    #[validate(email(message = "Invalid email address"))]
    pub customer_email: Option<String>,
    #[validate(custom(function = "validate_customer_phone"))]
    pub customer_phone: Option<String>,
    pub customer_organization: Option<String>,
    #[validate(length(min = 1, message = "At least one product is required"))]
    pub products: Vec<ProductForm>,
}

/// Validation failures of the whole form, keyed by product row.
#[derive(Debug, Clone, Default)]
pub struct FormErrors {
    pub form: Option<ValidationErrors>,
    pub products: BTreeMap<usize, ValidationErrors>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.form.is_none() && self.products.is_empty()
    }

    /// Number of fields with at least one failure.
    pub fn field_count(&self) -> usize {
        self.form
            .as_ref()
            .map(|errors| errors.field_errors().len())
            .unwrap_or_default()
            + self
                .products
                .values()
                .map(|errors| errors.field_errors().len())
                .sum::<usize>()
    }
}

/// First message reported for `field`, falling back to the error code.
pub fn first_message(errors: &ValidationErrors, field: &str) -> Option<String> {
    let field_errors = errors.field_errors();
    let error = field_errors.get(field)?.first()?;
    Some(
        error
            .message
            .as_ref()
            .map(|message| message.to_string())
            .unwrap_or_else(|| error.code.to_string()),
    )
}

impl EnquiryForm {
    /// Empty form for a new enquiry dated `now`.
    pub fn new_at(now: NaiveDateTime) -> Self {
        Self {
            customer_name: String::new(),
            enquiry_datetime: format_form_datetime(&now),
            status: EnquiryStatus::Open,
            customer_email: None,
            customer_phone: None,
            customer_organization: None,
            products: Vec::new(),
        }
    }

    /// Validates top-level fields and every product row.
    pub fn validate_all(&self) -> Result<(), FormErrors> {
        let errors = FormErrors {
            form: self.validate().err(),
            products: self
                .products
                .iter()
                .enumerate()
                .filter_map(|(index, product)| product.validate_row().err().map(|e| (index, e)))
                .collect(),
        };
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn parsed_datetime(&self) -> Result<NaiveDateTime, FormError> {
        parse_local_datetime(&self.enquiry_datetime).map_err(|_| FormError::InvalidDateTime)
    }

    pub fn customer_name(&self) -> Result<CustomerName, FormError> {
        CustomerName::new(self.customer_name.as_str()).map_err(|_| FormError::InvalidName)
    }

    pub fn to_products(&self) -> Result<Vec<EnquiryProduct>, FormError> {
        self.products.iter().map(EnquiryProduct::try_from).collect()
    }

    /// Customer to provision before the enquiry is created.
    pub fn to_new_customer(&self) -> Result<NewCustomer, FormError> {
        let mut customer = NewCustomer::new(self.customer_name()?);

        if let Some(email) = self.customer_email.as_deref().and_then(blank_to_none) {
            customer = customer.email(CustomerEmail::new(email).map_err(|_| FormError::InvalidEmail)?);
        }
        if let Some(phone) = self.customer_phone.as_deref().and_then(blank_to_none) {
            customer =
                customer.phone(PhoneNumber::new(phone).map_err(|_| FormError::InvalidPhoneNumber)?);
        }
        if let Some(organization) = self.customer_organization.as_deref() {
            customer = customer.organization(organization);
        }

        Ok(customer)
    }

    pub fn to_new_enquiry(&self, customer_id: CustomerId) -> Result<NewEnquiry, FormError> {
        Ok(NewEnquiry::try_new(
            customer_id,
            self.parsed_datetime()?,
            self.status,
            self.to_products()?,
        )?)
    }

    pub fn to_changes(&self) -> Result<EnquiryChanges, FormError> {
        Ok(EnquiryChanges {
            customer_name: self.customer_name()?,
            enquiry_datetime: self.parsed_datetime()?,
            status: self.status,
            products: self.to_products()?,
        })
    }
}

impl From<&Enquiry> for EnquiryForm {
    fn from(enquiry: &Enquiry) -> Self {
        Self {
            customer_name: enquiry.customer_name.clone(),
            enquiry_datetime: format_form_datetime(&enquiry.enquiry_datetime),
            status: enquiry.status,
            customer_email: None,
            customer_phone: None,
            customer_organization: None,
            products: enquiry.products.iter().map(ProductForm::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(9, 15, 42)
            .unwrap()
    }

    fn valid_product() -> ProductForm {
        ProductForm {
            quantity: Some(2),
            cas_number: Some("1234567-89-0".to_string()),
            ..ProductForm::default()
        }
    }

    #[test]
    fn quantity_zero_or_blank_is_rejected() {
        let mut product = valid_product();
        product.quantity = Some(0);
        assert!(product.validate().is_err());

        product.set(ProductField::Quantity, "  ").unwrap();
        assert_eq!(product.quantity, None);
        let errors = product.validate().unwrap_err();
        assert_eq!(
            first_message(&errors, "quantity").as_deref(),
            Some("Quantity is required")
        );

        product.set(ProductField::Quantity, "1").unwrap();
        assert!(product.validate().is_ok());
    }

    #[test]
    fn cas_number_grouping_is_checked() {
        let mut product = valid_product();
        product.set(ProductField::CasNumber, "7732-18-5").unwrap();
        assert!(product.validate().is_err());

        product.set(ProductField::CasNumber, "7732018-18-5").unwrap();
        assert!(product.validate().is_ok());

        product.set(ProductField::CasNumber, "").unwrap();
        assert!(product.validate().is_ok());
    }

    #[test]
    fn catalog_number_and_amounts_are_checked() {
        let mut product = valid_product();
        product.set(ProductField::CatNumber, "ISP-A12345").unwrap();
        assert!(product.validate().is_err());
        product.set(ProductField::CatNumber, "ISP-A123456").unwrap();
        assert!(product.validate().is_ok());

        product.set(ProductField::Price, "-1").unwrap();
        assert!(product.validate().is_err());
        product.set(ProductField::Price, "0").unwrap();
        product.set(ProductField::MolecularWeight, "-0.1").unwrap();
        assert!(product.validate().is_err());
        product.set(ProductField::MolecularWeight, "18.015").unwrap();
        assert!(product.validate().is_ok());
    }

    #[test]
    fn new_form_defaults_to_now_without_products() {
        let form = EnquiryForm::new_at(now());
        assert_eq!(form.enquiry_datetime, "2024-05-01T09:15");
        assert_eq!(form.status, EnquiryStatus::Open);
        assert!(form.products.is_empty());

        let errors = form.validate_all().unwrap_err();
        let form_errors = errors.form.unwrap();
        assert!(first_message(&form_errors, "products").is_some());
        assert!(first_message(&form_errors, "customer_name").is_some());
    }

    #[test]
    fn valid_form_maps_to_domain_values() {
        let mut form = EnquiryForm::new_at(now());
        form.customer_name = "  Acme Chemicals ".to_string();
        form.customer_phone = Some("+1 650 253 0000".to_string());
        form.products.push(valid_product());
        assert!(form.validate_all().is_ok());

        let customer = form.to_new_customer().unwrap();
        assert_eq!(customer.name.as_str(), "Acme Chemicals");
        assert_eq!(customer.phone.unwrap().as_str(), "+16502530000");

        let new_enquiry = form
            .to_new_enquiry(CustomerId::numeric(5).unwrap())
            .unwrap();
        assert_eq!(new_enquiry.products.len(), 1);
        assert_eq!(new_enquiry.products[0].quantity.get(), 2);
        assert_eq!(
            new_enquiry.products[0].cas_number.as_ref().unwrap().as_str(),
            "1234567-89-0"
        );
    }

    #[test]
    fn invalid_product_rows_are_keyed_by_index() {
        let mut form = EnquiryForm::new_at(now());
        form.customer_name = "Acme".to_string();
        form.products.push(valid_product());
        form.products.push(ProductForm::default());

        let errors = form.validate_all().unwrap_err();
        assert!(errors.form.is_none());
        assert_eq!(errors.products.keys().copied().collect::<Vec<_>>(), vec![1]);
        assert_eq!(errors.field_count(), 1);
    }

    #[test]
    fn unparsable_datetime_is_rejected() {
        let mut form = EnquiryForm::new_at(now());
        form.enquiry_datetime = "tomorrow".to_string();
        let errors = form.validate().unwrap_err();
        assert_eq!(
            first_message(&errors, "enquiry_datetime").as_deref(),
            Some("Invalid date and time")
        );
    }

    #[test]
    fn malformed_quantity_explains_the_problem() {
        let mut product = valid_product();
        for (raw, expected) in [
            ("-3", "Quantity must be at least 1"),
            ("2.5", "Quantity must be a whole number"),
            ("99999999999", "Quantity is too large"),
        ] {
            product.set(ProductField::Quantity, raw).unwrap();
            assert_eq!(product.quantity, None);
            let errors = product.validate_row().unwrap_err();
            assert_eq!(first_message(&errors, "quantity").as_deref(), Some(expected));
        }

        product.set(ProductField::Quantity, "4").unwrap();
        assert!(product.rejected.is_empty());
        assert!(product.validate_row().is_ok());
    }

    #[test]
    fn non_finite_numbers_are_not_stored() {
        let mut product = valid_product();
        product.set(ProductField::Price, "NaN").unwrap();
        product.set(ProductField::MolecularWeight, "inf").unwrap();
        assert_eq!(product.price, None);
        assert_eq!(product.molecular_weight, None);

        let errors = product.validate_row().unwrap_err();
        assert_eq!(
            first_message(&errors, "price").as_deref(),
            Some("Price must be a number")
        );
        assert_eq!(
            first_message(&errors, "molecular_weight").as_deref(),
            Some("Molecular weight must be a number")
        );
        assert!(EnquiryProduct::try_from(&product).is_err());

        product.set(ProductField::Price, "12.5").unwrap();
        product.set(ProductField::MolecularWeight, "").unwrap();
        assert_eq!(product.price, Some(12.5));
        assert!(product.validate_row().is_ok());
    }

    #[test]
    fn phone_is_checked_with_the_other_fields() {
        let mut form = EnquiryForm::new_at(now());
        form.customer_name = "Acme".to_string();
        form.products.push(valid_product());
        form.customer_phone = Some("not a phone".to_string());

        let errors = form.validate_all().unwrap_err();
        assert_eq!(
            first_message(errors.form.as_ref().unwrap(), "customer_phone").as_deref(),
            Some("Invalid phone number")
        );

        form.customer_phone = Some("+1 650 253 0000".to_string());
        assert!(form.validate_all().is_ok());
    }
}
