//! State of the enquiry modal form: values, touched fields, mode and submit.

use std::collections::BTreeSet;
use std::path::Path;

use chrono::{Local, NaiveDateTime};
use validator::Validate;

use crate::domain::customer::Customer;
use crate::domain::enquiry::{Enquiry, EnquiryChanges, EnquiryProduct, NewEnquiry};
use crate::domain::types::{EnquiryId, EnquiryStatus};
use crate::dto::notification::EnquiryNotification;
use crate::forms::FormError;
use crate::forms::enquiry::{
    EnquiryField, EnquiryForm, FormErrors, FormMode, ProductField, ProductForm, first_message,
};
use crate::repository::{CustomerWriter, EnquiryWriter};
use crate::services::enquiries::{create_enquiry, provision_customer};
use crate::services::ServiceResult;

/// What a successful submit produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmitStrategy {
    /// Provision a customer, then create the enquiry.
    #[default]
    CreateRecords,
    /// Build an email payload instead of writing records.
    EmailNotification,
}

/// Events the form raises towards the table.
#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    ModeChanged(FormMode),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SavedEnquiry {
    Created {
        customer: Customer,
        enquiry_id: Option<EnquiryId>,
    },
    /// Edits to merge onto the selected enquiry.
    Updated(EnquiryChanges),
    Notified(EnquiryNotification),
}

#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// Validation failed; nothing was sent.
    Invalid(FormErrors),
    Saved(SavedEnquiry),
}

#[derive(Debug, Clone)]
pub struct EnquiryFormController {
    mode: FormMode,
    form: EnquiryForm,
    strategy: SubmitStrategy,
    touched: BTreeSet<EnquiryField>,
    product_touched: Vec<BTreeSet<ProductField>>,
    submitting: bool,
}

impl EnquiryFormController {
    pub fn new(mode: FormMode, existing: Option<&Enquiry>) -> Self {
        Self::new_at(mode, existing, Local::now().naive_local())
    }

    /// Builds the form. Without an existing enquiry the date defaults to
    /// `now` and there are no product rows.
    pub fn new_at(mode: FormMode, existing: Option<&Enquiry>, now: NaiveDateTime) -> Self {
        let form = match existing {
            Some(enquiry) => EnquiryForm::from(enquiry),
            None => EnquiryForm::new_at(now),
        };
        let product_touched = vec![BTreeSet::new(); form.products.len()];

        Self {
            mode,
            form,
            strategy: SubmitStrategy::default(),
            touched: BTreeSet::new(),
            product_touched,
            submitting: false,
        }
    }

    #[must_use]
    pub fn with_strategy(mut self, strategy: SubmitStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn form(&self) -> &EnquiryForm {
        &self.form
    }

    pub fn strategy(&self) -> SubmitStrategy {
        self.strategy
    }

    /// All inputs are disabled in view mode.
    pub fn is_disabled(&self) -> bool {
        self.mode.is_read_only()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn title(&self) -> &'static str {
        self.mode.title()
    }

    pub fn subtitle(&self) -> &'static str {
        self.mode.subtitle()
    }

    pub fn save_button_text(&self) -> &'static str {
        if self.submitting {
            "Saving..."
        } else if self.mode == FormMode::Create {
            "Create Enquiry"
        } else {
            "Save Changes"
        }
    }

    pub fn product_count(&self) -> usize {
        self.form.products.len()
    }

    fn ensure_editable(&self) -> Result<(), FormError> {
        if self.is_disabled() {
            Err(FormError::ReadOnly)
        } else {
            Ok(())
        }
    }

    fn ensure_row(&self, index: usize) -> Result<(), FormError> {
        if index < self.form.products.len() {
            Ok(())
        } else {
            Err(FormError::ProductIndexOutOfRange(index))
        }
    }

    pub fn set_customer_name(&mut self, value: &str) -> Result<(), FormError> {
        self.ensure_editable()?;
        self.form.customer_name = value.to_string();
        self.touched.insert(EnquiryField::CustomerName);
        Ok(())
    }

    pub fn set_enquiry_datetime(&mut self, value: &str) -> Result<(), FormError> {
        self.ensure_editable()?;
        self.form.enquiry_datetime = value.trim().to_string();
        self.touched.insert(EnquiryField::EnquiryDateTime);
        Ok(())
    }

    pub fn set_status(&mut self, status: EnquiryStatus) -> Result<(), FormError> {
        self.ensure_editable()?;
        self.form.status = status;
        self.touched.insert(EnquiryField::Status);
        Ok(())
    }

    pub fn set_customer_email(&mut self, value: &str) -> Result<(), FormError> {
        self.ensure_editable()?;
        self.form.customer_email = non_blank(value);
        self.touched.insert(EnquiryField::CustomerEmail);
        Ok(())
    }

    pub fn set_customer_phone(&mut self, value: &str) -> Result<(), FormError> {
        self.ensure_editable()?;
        self.form.customer_phone = non_blank(value);
        self.touched.insert(EnquiryField::CustomerPhone);
        Ok(())
    }

    pub fn set_customer_organization(&mut self, value: &str) -> Result<(), FormError> {
        self.ensure_editable()?;
        self.form.customer_organization = non_blank(value);
        self.touched.insert(EnquiryField::CustomerOrganization);
        Ok(())
    }

    pub fn set_product_field(
        &mut self,
        index: usize,
        field: ProductField,
        raw: &str,
    ) -> Result<(), FormError> {
        self.ensure_editable()?;
        self.ensure_row(index)?;
        self.form.products[index].set(field, raw)?;
        self.product_touched[index].insert(field);
        Ok(())
    }

    /// Marks a field as visited without changing it.
    pub fn touch(&mut self, field: EnquiryField) {
        self.touched.insert(field);
    }

    pub fn touch_product(&mut self, index: usize, field: ProductField) -> Result<(), FormError> {
        self.ensure_row(index)?;
        self.product_touched[index].insert(field);
        Ok(())
    }

    /// Appends a product row, pre-filled from `existing` when given.
    /// Returns the index of the new row.
    pub fn add_product(&mut self, existing: Option<&EnquiryProduct>) -> Result<usize, FormError> {
        self.ensure_editable()?;
        let row = existing.map(ProductForm::from).unwrap_or_default();
        self.form.products.push(row);
        self.product_touched.push(BTreeSet::new());
        Ok(self.form.products.len() - 1)
    }

    pub fn remove_product(&mut self, index: usize) -> Result<ProductForm, FormError> {
        self.ensure_editable()?;
        self.ensure_row(index)?;
        self.product_touched.remove(index);
        Ok(self.form.products.remove(index))
    }

    /// Stores the selected file's name as the row's attachment reference.
    pub fn file_selected(&mut self, index: usize, file_name: &str) -> Result<(), FormError> {
        let name = Path::new(file_name)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(file_name);
        self.set_product_field(index, ProductField::AttachmentRef, name)
    }

    /// Enables the fields of a form opened for viewing.
    pub fn switch_to_edit(&mut self) -> Result<FormEvent, FormError> {
        if self.mode != FormMode::View {
            return Err(FormError::InvalidModeTransition {
                from: self.mode,
                to: FormMode::Edit,
            });
        }
        self.mode = FormMode::Edit;
        Ok(FormEvent::ModeChanged(FormMode::Edit))
    }

    pub fn is_touched(&self, field: EnquiryField) -> bool {
        self.touched.contains(&field)
    }

    pub fn is_product_touched(&self, index: usize, field: ProductField) -> bool {
        self.product_touched
            .get(index)
            .is_some_and(|touched| touched.contains(&field))
    }

    pub fn mark_all_touched(&mut self) {
        self.touched.extend(EnquiryField::ALL);
        for touched in &mut self.product_touched {
            touched.extend(ProductField::ALL);
        }
    }

    pub fn is_valid(&self) -> bool {
        self.form.validate_all().is_ok()
    }

    /// Message for `field` once it is both invalid and touched.
    pub fn field_error(&self, field: EnquiryField) -> Option<String> {
        if !self.is_touched(field) {
            return None;
        }
        let errors = self.form.validate().err()?;
        first_message(&errors, field.as_str())
    }

    pub fn product_field_error(&self, index: usize, field: ProductField) -> Option<String> {
        if !self.is_product_touched(index, field) {
            return None;
        }
        let errors = self.form.products.get(index)?.validate_row().err()?;
        first_message(&errors, field.as_str())
    }

    /// Validates and, when valid, persists or packages the form.
    ///
    /// An invalid form marks every field touched and makes no repository
    /// call. The submitting flag is cleared whatever the result.
    pub async fn submit<R>(&mut self, repo: &R) -> ServiceResult<SubmitOutcome>
    where
        R: CustomerWriter + EnquiryWriter + ?Sized,
    {
        self.ensure_editable()?;

        if let Err(errors) = self.form.validate_all() {
            log::info!(
                "Enquiry form has {} invalid field(s), not submitting",
                errors.field_count()
            );
            self.mark_all_touched();
            return Ok(SubmitOutcome::Invalid(errors));
        }

        self.submitting = true;
        let result = self.dispatch(repo).await;
        self.submitting = false;

        result.map(SubmitOutcome::Saved)
    }

    async fn dispatch<R>(&self, repo: &R) -> ServiceResult<SavedEnquiry>
    where
        R: CustomerWriter + EnquiryWriter + ?Sized,
    {
        match (self.strategy, self.mode) {
            (_, FormMode::View) => Err(FormError::ReadOnly.into()),
            (SubmitStrategy::EmailNotification, _) => Ok(SavedEnquiry::Notified(
                EnquiryNotification::try_from(&self.form)?,
            )),
            (SubmitStrategy::CreateRecords, FormMode::Create) => {
                // Every conversion that can fail runs before the first write.
                let new_customer = self.form.to_new_customer()?;
                let draft = self.form.to_changes()?;
                let customer = provision_customer(repo, &new_customer).await?;
                let new_enquiry = NewEnquiry::try_new(
                    customer.customer_id.clone(),
                    draft.enquiry_datetime,
                    draft.status,
                    draft.products,
                )?;
                let enquiry_id = create_enquiry(repo, &new_enquiry).await?;
                Ok(SavedEnquiry::Created {
                    customer,
                    enquiry_id,
                })
            }
            (SubmitStrategy::CreateRecords, FormMode::Edit) => {
                Ok(SavedEnquiry::Updated(self.form.to_changes()?))
            }
        }
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
