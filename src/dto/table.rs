//! DTOs shaped for the enquiry table view.

use serde::Serialize;

use crate::domain::enquiry::Enquiry;
use crate::domain::types::EnquiryStatus;
use crate::forms::FormMode;
use crate::pagination::Paginated;

const STATUS_BADGE_BASE: &str = "px-3 py-1 inline-flex text-xs leading-5 font-semibold rounded-full ";

/// Display format of the date column.
pub const TABLE_DATETIME_FORMAT: &str = "%b %-d, %Y %H:%M";

/// CSS classes of the status badge.
pub fn status_badge_class(status: EnquiryStatus) -> String {
    let colors = match status {
        EnquiryStatus::Open => "bg-blue-100 text-blue-800",
        EnquiryStatus::Processed => "bg-yellow-100 text-yellow-800",
        EnquiryStatus::Closed => "bg-green-100 text-green-800",
    };
    format!("{STATUS_BADGE_BASE}{colors}")
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EnquiryRow {
    pub enquiry_id: String,
    pub customer_name: String,
    pub enquiry_datetime: String,
    pub status: EnquiryStatus,
    pub status_class: String,
    pub product_count: usize,
}

impl From<&Enquiry> for EnquiryRow {
    fn from(enquiry: &Enquiry) -> Self {
        Self {
            enquiry_id: enquiry.enquiry_id.to_string(),
            customer_name: enquiry.customer_name.clone(),
            enquiry_datetime: enquiry
                .enquiry_datetime
                .format(TABLE_DATETIME_FORMAT)
                .to_string(),
            status: enquiry.status,
            status_class: status_badge_class(enquiry.status),
            product_count: enquiry.products.len(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ModalView {
    pub mode: FormMode,
    pub title: &'static str,
    pub subtitle: &'static str,
}

impl From<FormMode> for ModalView {
    fn from(mode: FormMode) -> Self {
        Self {
            mode,
            title: mode.title(),
            subtitle: mode.subtitle(),
        }
    }
}

/// Everything needed to draw the table and its controls.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TablePageData {
    pub loading: bool,
    pub search_text: String,
    pub page_size: usize,
    pub page_size_options: Vec<usize>,
    pub page: Paginated<EnquiryRow>,
    pub modal: Option<ModalView>,
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::enquiry::EnquiryProduct;
    use crate::domain::types::{EnquiryId, Quantity};

    #[test]
    fn badge_classes_follow_status() {
        assert!(status_badge_class(EnquiryStatus::Open).ends_with("bg-blue-100 text-blue-800"));
        assert!(
            status_badge_class(EnquiryStatus::Processed).ends_with("bg-yellow-100 text-yellow-800")
        );
        assert!(status_badge_class(EnquiryStatus::Closed).starts_with(STATUS_BADGE_BASE));
    }

    #[test]
    fn row_renders_identifier_and_date() {
        let enquiry = Enquiry {
            enquiry_id: EnquiryId::text("ENQ-7").unwrap(),
            customer_id: None,
            customer_name: "Acme".to_string(),
            enquiry_datetime: NaiveDate::from_ymd_opt(2024, 5, 1)
                .unwrap()
                .and_hms_opt(9, 5, 0)
                .unwrap(),
            status: EnquiryStatus::Closed,
            products: vec![EnquiryProduct::new(Quantity::new(1).unwrap())],
        };

        let row = EnquiryRow::from(&enquiry);
        assert_eq!(row.enquiry_id, "ENQ-7");
        assert_eq!(row.enquiry_datetime, "May 1, 2024 09:05");
        assert_eq!(row.product_count, 1);
    }
}
