//! snake_case wire records exchanged with the enquiry endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::enquiry::{
    Enquiry as DomainEnquiry, EnquiryProduct as DomainEnquiryProduct,
    NewEnquiry as DomainNewEnquiry, WIRE_DATETIME_FORMAT, format_form_datetime,
    parse_local_datetime,
};
use crate::domain::types::{
    AttachmentRef, CasNumber, CatalogNumber, CustomerId, EnquiryId, EnquiryStatus, Flag,
    IdentifierValue, Quantity, TypeConstraintError, non_negative,
};

/// Enquiry as returned by `GET /v1/enquiries/` and sent by `PUT`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnquiryRecord {
    pub enquiry_id: IdentifierValue,
    #[serde(default)]
    pub customer_id: Option<IdentifierValue>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enquiry_datetime: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enquiry_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enquiry_time: Option<String>,
    pub status: String,
    #[serde(default)]
    pub products: Vec<ProductRecord>,
}

/// Product line inside an [`EnquiryRecord`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductRecord {
    #[serde(default)]
    pub product_id: Option<IdentifierValue>,
    pub quantity: f64,
    #[serde(default)]
    pub chemical_name: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub cas_number: Option<String>,
    #[serde(default)]
    pub cat_number: Option<String>,
    #[serde(default)]
    pub molecular_weight: Option<f64>,
    #[serde(default)]
    pub variant: Option<String>,
    #[serde(default)]
    pub flag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment_ref: Option<String>,
}

/// Body of `POST /v1/enquiries/`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewEnquiryRecord {
    pub customer_id: IdentifierValue,
    pub enquiry_date: String,
    pub enquiry_time: String,
    pub status: EnquiryStatus,
    pub products: Vec<NewProductRecord>,
}

/// Product line inside a [`NewEnquiryRecord`].
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewProductRecord {
    /// Empty until the backend assigns catalog products.
    pub product_id: String,
    pub quantity: u32,
    pub chemical_name: Option<String>,
    pub price: Option<f64>,
    pub cas_number: Option<String>,
    pub cat_number: Option<String>,
    pub molecular_weight: Option<f64>,
    pub variant: Option<String>,
    pub flag: Flag,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment_ref: Option<String>,
}

/// Response of `POST /v1/enquiries/`; older revisions answer with `id`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatedEnquiryRecord {
    #[serde(default)]
    pub enquiry_id: Option<IdentifierValue>,
    #[serde(default)]
    pub id: Option<IdentifierValue>,
}

impl CreatedEnquiryRecord {
    pub fn into_enquiry_id(self) -> Option<EnquiryId> {
        self.enquiry_id
            .or(self.id)
            .and_then(|value| EnquiryId::try_from(value).ok())
    }
}

/// Splits a `YYYY-MM-DDTHH:MM` value into its date and time halves.
pub fn split_form_datetime(value: &str) -> (String, String) {
    match value.split_once('T') {
        Some((date, time)) => (date.to_string(), time.to_string()),
        None => (value.to_string(), String::new()),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn identifier_to_string(value: IdentifierValue) -> Option<String> {
    match value {
        IdentifierValue::Number(number) => Some(number.to_string()),
        IdentifierValue::Text(text) => non_blank(Some(text)),
    }
}

impl TryFrom<ProductRecord> for DomainEnquiryProduct {
    type Error = TypeConstraintError;

    fn try_from(record: ProductRecord) -> Result<Self, Self::Error> {
        if record.quantity.fract() != 0.0 || record.quantity < 1.0 {
            return Err(TypeConstraintError::NonPositiveQuantity);
        }
        if record.quantity > f64::from(u32::MAX) {
            return Err(TypeConstraintError::QuantityTooLarge(record.quantity.to_string()));
        }
        let quantity = Quantity::new(record.quantity as u32)?;

        Ok(Self {
            product_id: record.product_id.and_then(identifier_to_string),
            quantity,
            chemical_name: non_blank(record.chemical_name),
            price: record.price.map(non_negative).transpose()?,
            cas_number: non_blank(record.cas_number)
                .map(CasNumber::new)
                .transpose()?,
            cat_number: non_blank(record.cat_number)
                .map(CatalogNumber::new)
                .transpose()?,
            molecular_weight: record.molecular_weight.map(non_negative).transpose()?,
            variant: non_blank(record.variant),
            flag: match non_blank(record.flag) {
                Some(flag) => flag.parse()?,
                None => Flag::default(),
            },
            attachment_ref: non_blank(record.attachment_ref)
                .map(AttachmentRef::new)
                .transpose()?,
        })
    }
}

impl TryFrom<EnquiryRecord> for DomainEnquiry {
    type Error = TypeConstraintError;

    fn try_from(record: EnquiryRecord) -> Result<Self, Self::Error> {
        let enquiry_datetime = match (
            non_blank(record.enquiry_datetime),
            non_blank(record.enquiry_date),
            non_blank(record.enquiry_time),
        ) {
            (Some(datetime), _, _) => parse_local_datetime(&datetime)?,
            (None, Some(date), Some(time)) => parse_local_datetime(&format!("{date}T{time}"))?,
            (None, Some(date), None) => parse_local_datetime(&format!("{date}T00:00"))?,
            (None, None, _) => {
                return Err(TypeConstraintError::InvalidDateTime(String::new()));
            }
        };

        Ok(Self {
            enquiry_id: EnquiryId::try_from(record.enquiry_id)?,
            customer_id: record
                .customer_id
                .map(CustomerId::try_from)
                .transpose()?,
            customer_name: record.customer_name.unwrap_or_default().trim().to_string(),
            enquiry_datetime,
            status: record.status.parse()?,
            products: record
                .products
                .into_iter()
                .map(DomainEnquiryProduct::try_from)
                .collect::<Result<Vec<_>, _>>()?,
        })
    }
}

impl From<&DomainEnquiryProduct> for ProductRecord {
    fn from(product: &DomainEnquiryProduct) -> Self {
        Self {
            product_id: product.product_id.clone().map(IdentifierValue::Text),
            quantity: f64::from(product.quantity.get()),
            chemical_name: product.chemical_name.clone(),
            price: product.price,
            cas_number: product.cas_number.as_ref().map(|c| c.as_str().to_string()),
            cat_number: product.cat_number.as_ref().map(|c| c.as_str().to_string()),
            molecular_weight: product.molecular_weight,
            variant: product.variant.clone(),
            flag: Some(product.flag.as_str().to_string()),
            attachment_ref: product
                .attachment_ref
                .as_ref()
                .map(|a| a.as_str().to_string()),
        }
    }
}

impl From<&DomainEnquiry> for EnquiryRecord {
    fn from(enquiry: &DomainEnquiry) -> Self {
        let (enquiry_date, enquiry_time) =
            split_form_datetime(&format_form_datetime(&enquiry.enquiry_datetime));

        Self {
            enquiry_id: enquiry.enquiry_id.clone().into(),
            customer_id: enquiry.customer_id.clone().map(Into::into),
            customer_name: Some(enquiry.customer_name.clone()),
            enquiry_datetime: Some(
                enquiry
                    .enquiry_datetime
                    .format(WIRE_DATETIME_FORMAT)
                    .to_string(),
            ),
            enquiry_date: Some(enquiry_date),
            enquiry_time: Some(enquiry_time),
            status: enquiry.status.as_str().to_string(),
            products: enquiry.products.iter().map(ProductRecord::from).collect(),
        }
    }
}

impl From<&DomainEnquiryProduct> for NewProductRecord {
    fn from(product: &DomainEnquiryProduct) -> Self {
        Self {
            product_id: product.product_id.clone().unwrap_or_default(),
            quantity: product.quantity.get(),
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
        }
    }
}

impl From<&DomainNewEnquiry> for NewEnquiryRecord {
    fn from(enquiry: &DomainNewEnquiry) -> Self {
        let (enquiry_date, enquiry_time) =
            split_form_datetime(&format_form_datetime(&enquiry.enquiry_datetime));

        Self {
            customer_id: enquiry.customer_id.clone().into(),
            enquiry_date,
            enquiry_time,
            status: enquiry.status,
            products: enquiry.products.iter().map(NewProductRecord::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;

    use super::*;

    fn record_json() -> serde_json::Value {
        json!({
            "enquiry_id": 10234,
            "customer_id": "cust-001",
            "customer_name": "Acme Chemicals",
            "enquiry_datetime": "2024-05-01T10:30:00",
            "status": "open",
            "products": [{
                "product_id": "",
                "quantity": 2,
                "chemical_name": "Acetone",
                "price": 12.5,
                "cas_number": "1234567-89-0",
                "cat_number": "ISP-A123456",
                "molecular_weight": 58.08,
                "variant": "25kg Drum",
                "flag": "Y",
                "attachment_ref": "datasheet.pdf"
            }]
        })
    }

    #[test]
    fn record_into_domain() {
        let record: EnquiryRecord = serde_json::from_value(record_json()).unwrap();
        let enquiry = DomainEnquiry::try_from(record).unwrap();

        assert_eq!(enquiry.enquiry_id.as_number(), Some(10234));
        assert_eq!(enquiry.customer_id.unwrap().to_string(), "cust-001");
        assert_eq!(enquiry.status, EnquiryStatus::Open);
        assert_eq!(enquiry.products.len(), 1);
        let product = &enquiry.products[0];
        assert_eq!(product.product_id, None);
        assert_eq!(product.quantity.get(), 2);
        assert_eq!(product.cas_number.as_ref().unwrap().as_str(), "1234567-89-0");
        assert_eq!(product.flag, Flag::Y);
        assert_eq!(product.attachment_ref.as_ref().unwrap().as_str(), "datasheet.pdf");
    }

    #[test]
    fn record_with_split_date_and_time() {
        let mut value = record_json();
        value["enquiry_datetime"] = serde_json::Value::Null;
        value["enquiry_date"] = json!("2024-05-01");
        value["enquiry_time"] = json!("10:30");
        let record: EnquiryRecord = serde_json::from_value(value).unwrap();
        let enquiry = DomainEnquiry::try_from(record).unwrap();

        let expected = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        assert_eq!(enquiry.enquiry_datetime, expected);
    }

    #[test]
    fn record_with_invalid_cas_is_rejected() {
        let mut value = record_json();
        value["products"][0]["cas_number"] = json!("7732-18-5");
        let record: EnquiryRecord = serde_json::from_value(value).unwrap();
        assert!(matches!(
            DomainEnquiry::try_from(record),
            Err(TypeConstraintError::InvalidCasNumber(_))
        ));
    }

    #[test]
    fn record_with_fractional_quantity_is_rejected() {
        let mut value = record_json();
        value["products"][0]["quantity"] = json!(1.5);
        let record: EnquiryRecord = serde_json::from_value(value).unwrap();
        assert_eq!(
            DomainEnquiry::try_from(record),
            Err(TypeConstraintError::NonPositiveQuantity)
        );
    }

    #[test]
    fn record_with_oversized_quantity_is_rejected() {
        let mut value = record_json();
        value["products"][0]["quantity"] = json!(5_000_000_000_u64);
        let record: EnquiryRecord = serde_json::from_value(value).unwrap();
        assert_eq!(
            DomainEnquiry::try_from(record),
            Err(TypeConstraintError::QuantityTooLarge("5000000000".to_string()))
        );

        let mut value = record_json();
        value["products"][0]["quantity"] = json!(u32::MAX);
        let record: EnquiryRecord = serde_json::from_value(value).unwrap();
        let enquiry = DomainEnquiry::try_from(record).unwrap();
        assert_eq!(enquiry.products[0].quantity.get(), u32::MAX);
    }

    #[test]
    fn new_enquiry_record_splits_datetime() {
        let product = DomainEnquiryProduct::new(Quantity::new(3).unwrap());
        let new_enquiry = DomainNewEnquiry::try_new(
            CustomerId::numeric(9).unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 24)
                .unwrap()
                .and_hms_opt(8, 5, 0)
                .unwrap(),
            EnquiryStatus::Open,
            vec![product],
        )
        .unwrap();

        let body = serde_json::to_value(NewEnquiryRecord::from(&new_enquiry)).unwrap();
        assert_eq!(body["customer_id"], json!(9));
        assert_eq!(body["enquiry_date"], json!("2024-12-24"));
        assert_eq!(body["enquiry_time"], json!("08:05"));
        assert_eq!(body["status"], json!("Open"));
        assert_eq!(body["products"][0]["product_id"], json!(""));
        assert_eq!(body["products"][0]["flag"], json!("N"));
        assert!(body["products"][0].get("attachment_ref").is_none());
    }

    #[test]
    fn split_without_separator_keeps_date() {
        assert_eq!(
            split_form_datetime("2024-01-02"),
            ("2024-01-02".to_string(), String::new())
        );
    }

    #[test]
    fn created_record_prefers_enquiry_id() {
        let created: CreatedEnquiryRecord =
            serde_json::from_value(json!({"id": 1, "enquiry_id": "enq-7"})).unwrap();
        assert_eq!(created.into_enquiry_id().unwrap().to_string(), "enq-7");

        let created: CreatedEnquiryRecord = serde_json::from_value(json!({})).unwrap();
        assert!(created.into_enquiry_id().is_none());
    }
}
