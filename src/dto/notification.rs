//! Email notification payload built from a submitted enquiry form.

use std::path::Path;

use serde::Serialize;

use crate::domain::types::{EnquiryStatus, Flag};
use crate::forms::FormError;
use crate::forms::enquiry::EnquiryForm;
use crate::models::enquiry::split_form_datetime;

/// File attached to one product line.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AttachmentDescriptor {
    pub product_index: usize,
    pub file_name: String,
    pub content_type: &'static str,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NotificationLine {
    pub quantity: u32,
    pub chemical_name: Option<String>,
    pub cas_number: Option<String>,
    pub cat_number: Option<String>,
    pub variant: Option<String>,
    pub flag: Flag,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EnquiryNotification {
    pub subject: String,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub enquiry_date: String,
    pub enquiry_time: String,
    pub status: EnquiryStatus,
    pub products: Vec<NotificationLine>,
    pub attachments: Vec<AttachmentDescriptor>,
}

/// Guesses a MIME type from the file extension.
pub fn guess_content_type(file_name: &str) -> &'static str {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("pdf") => "application/pdf",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("csv") => "text/csv",
        Some("txt") => "text/plain",
        Some("doc") => "application/msword",
        Some("docx") => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        Some("xls") => "application/vnd.ms-excel",
        Some("xlsx") => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        _ => "application/octet-stream",
    }
}

fn clean(value: &str) -> String {
    ammonia::clean(value.trim())
}

fn clean_optional(value: Option<&String>) -> Option<String> {
    value
        .map(String::as_str)
        .map(clean)
        .filter(|v| !v.is_empty())
}

impl TryFrom<&EnquiryForm> for EnquiryNotification {
    type Error = FormError;

    fn try_from(form: &EnquiryForm) -> Result<Self, Self::Error> {
        let customer_name = clean(form.customer_name()?.as_str());
        let (enquiry_date, enquiry_time) = split_form_datetime(form.enquiry_datetime.trim());
        let products = form.to_products()?;

        let attachments = products
            .iter()
            .enumerate()
            .filter_map(|(index, product)| {
                product.attachment_ref.as_ref().map(|attachment| {
                    let file_name = clean(attachment.as_str());
                    AttachmentDescriptor {
                        product_index: index,
                        content_type: guess_content_type(&file_name),
                        file_name,
                    }
                })
            })
            .collect();

        Ok(Self {
            subject: format!("New enquiry from {customer_name}"),
            customer_name,
            customer_email: clean_optional(form.customer_email.as_ref()),
            enquiry_date,
            enquiry_time,
            status: form.status,
            products: products
                .iter()
                .map(|product| NotificationLine {
                    quantity: product.quantity.get(),
                    chemical_name: clean_optional(product.chemical_name.as_ref()),
                    cas_number: product.cas_number.as_ref().map(|c| c.as_str().to_string()),
                    cat_number: product.cat_number.as_ref().map(|c| c.as_str().to_string()),
                    variant: clean_optional(product.variant.as_ref()),
                    flag: product.flag,
                })
                .collect(),
            attachments,
        })
    }
}
