//! Enquiry table: master and filtered lists, search, pagination and the
//! modal that creates, shows and edits enquiries.

use std::sync::Arc;

use crate::domain::enquiry::Enquiry;
use crate::dto::table::{EnquiryRow, ModalView, TablePageData};
use crate::forms::FormMode;
use crate::models::config::ClientConfig;
use crate::pagination::{PAGE_SIZE_OPTIONS, Pager, PaginationError};
use crate::repository::{CustomerWriter, EnquiryReader, EnquiryStore, EnquiryWriter, StoreHandle};
use crate::services::enquiries::{list_enquiries, search_enquiries, update_enquiry};
use crate::services::enquiry_form::{
    EnquiryFormController, FormEvent, SavedEnquiry, SubmitOutcome, SubmitStrategy,
};
use crate::services::{ServiceError, ServiceResult};

/// Identifies one list request. Only the most recent ticket may apply its
/// result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoadTicket(u64);

#[derive(Debug)]
struct Modal {
    form: EnquiryFormController,
    selected: Option<Enquiry>,
}

#[derive(Debug)]
pub struct EnquiryTableController {
    store: EnquiryStore,
    filtered: Vec<Enquiry>,
    search_text: String,
    pager: Pager,
    loading: bool,
    modal: Option<Modal>,
    latest_ticket: u64,
    torn_down: bool,
    stale: bool,
    strategy: SubmitStrategy,
}

impl Default for EnquiryTableController {
    fn default() -> Self {
        Self {
            store: EnquiryStore::new(),
            filtered: Vec::new(),
            search_text: String::new(),
            pager: Pager::default(),
            loading: false,
            modal: None,
            latest_ticket: 0,
            torn_down: false,
            stale: false,
            strategy: SubmitStrategy::default(),
        }
    }
}

impl EnquiryTableController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page_size(page_size: usize) -> Result<Self, PaginationError> {
        Ok(Self {
            pager: Pager::new(page_size)?,
            ..Self::default()
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, PaginationError> {
        Self::with_page_size(config.default_page_size)
    }

    /// Strategy handed to every form the table opens.
    #[must_use]
    pub fn with_strategy(mut self, strategy: SubmitStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Read-only view of the master list for other components.
    pub fn handle(&self) -> StoreHandle {
        self.store.handle()
    }

    pub fn enquiries(&self) -> Arc<Vec<Enquiry>> {
        self.store.snapshot()
    }

    pub fn filtered(&self) -> &[Enquiry] {
        &self.filtered
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// True when a write succeeded but the reload after it failed.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Starts a list request. Any ticket handed out earlier becomes stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.latest_ticket += 1;
        self.loading = true;
        LoadTicket(self.latest_ticket)
    }

    /// Applies the result of the request identified by `ticket`.
    ///
    /// Returns `Ok(false)` when the ticket is stale or the table was torn
    /// down. A failed request keeps the current lists.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: ServiceResult<Vec<Enquiry>>,
    ) -> ServiceResult<bool> {
        if self.torn_down || ticket.0 != self.latest_ticket {
            log::debug!("Ignoring superseded enquiry load {}", ticket.0);
            return Ok(false);
        }
        self.loading = false;

        let enquiries = result?;
        log::info!("Loaded {} enquiries", enquiries.len());
        self.filtered = search_enquiries(&enquiries, &self.search_text);
        self.store.replace(enquiries);
        self.pager.update(self.filtered.len());
        self.stale = false;
        Ok(true)
    }

    /// Fetches the enquiry collection and refreshes the view.
    pub async fn load<R>(&mut self, repo: &R) -> ServiceResult<()>
    where
        R: EnquiryReader + ?Sized,
    {
        let ticket = self.begin_load();
        let result = list_enquiries(repo).await;
        self.finish_load(ticket, result).map(|_| ())
    }

    /// Filters the master list and goes back to the first page.
    pub fn search(&mut self, term: &str) {
        self.search_text = term.to_string();
        self.filtered = search_enquiries(&self.store.snapshot(), term);
        self.pager.reset();
        self.pager.update(self.filtered.len());
    }

    /// Drops the search term and shows the master list in load order.
    pub fn clear(&mut self) {
        self.search_text.clear();
        self.filtered = self.store.snapshot().as_ref().clone();
        self.pager.reset();
        self.pager.update(self.filtered.len());
    }

    pub fn set_page_size(&mut self, page_size: usize) -> Result<(), PaginationError> {
        self.pager.set_page_size(page_size)
    }

    pub fn go_to_page(&mut self, page: usize) -> bool {
        self.pager.go_to(page)
    }

    pub fn next_page(&mut self) -> bool {
        self.pager.next()
    }

    pub fn previous_page(&mut self) -> bool {
        self.pager.previous()
    }

    fn open(&mut self, mode: FormMode, selected: Option<Enquiry>) {
        let form = EnquiryFormController::new(mode, selected.as_ref()).with_strategy(self.strategy);
        self.modal = Some(Modal { form, selected });
    }

    pub fn open_create(&mut self) {
        self.open(FormMode::Create, None);
    }

    pub fn open_view(&mut self, enquiry: &Enquiry) {
        self.open(FormMode::View, Some(enquiry.clone()));
    }

    pub fn open_edit(&mut self, enquiry: &Enquiry) {
        self.open(FormMode::Edit, Some(enquiry.clone()));
    }

    pub fn close(&mut self) {
        self.modal = None;
    }

    pub fn is_modal_open(&self) -> bool {
        self.modal.is_some()
    }

    pub fn modal_mode(&self) -> Option<FormMode> {
        self.modal.as_ref().map(|modal| modal.form.mode())
    }

    pub fn form(&self) -> Option<&EnquiryFormController> {
        self.modal.as_ref().map(|modal| &modal.form)
    }

    pub fn form_mut(&mut self) -> Option<&mut EnquiryFormController> {
        self.modal.as_mut().map(|modal| &mut modal.form)
    }

    pub fn selected(&self) -> Option<&Enquiry> {
        self.modal.as_ref().and_then(|modal| modal.selected.as_ref())
    }

    /// Moves an open view modal into edit mode.
    pub fn switch_to_edit(&mut self) -> ServiceResult<FormEvent> {
        let modal = self.modal.as_mut().ok_or(ServiceError::ModalClosed)?;
        Ok(modal.form.switch_to_edit()?)
    }

    /// Submits the open form and, on success, saves and reloads.
    pub async fn submit<R>(&mut self, repo: &R) -> ServiceResult<SubmitOutcome>
    where
        R: EnquiryReader + EnquiryWriter + CustomerWriter + ?Sized,
    {
        let modal = self.modal.as_mut().ok_or(ServiceError::ModalClosed)?;
        let outcome = modal.form.submit(repo).await?;

        if let SubmitOutcome::Saved(saved) = &outcome {
            self.save(repo, saved).await?;
        }
        Ok(outcome)
    }

    /// Finishes a successful submit: edits are merged onto the selected
    /// enquiry and sent, the modal closes and the list is fetched again
    /// after any write. A failed reload does not fail the save; the table
    /// is marked stale instead.
    pub async fn save<R>(&mut self, repo: &R, saved: &SavedEnquiry) -> ServiceResult<()>
    where
        R: EnquiryReader + EnquiryWriter + ?Sized,
    {
        let wrote = match saved {
            SavedEnquiry::Updated(changes) => {
                let selected = self.selected().ok_or(ServiceError::ModalClosed)?;
                let updated = selected.apply(changes);
                update_enquiry(repo, &updated).await?;
                true
            }
            SavedEnquiry::Created { .. } => true,
            SavedEnquiry::Notified(_) => false,
        };

        self.close();
        if !wrote {
            return Ok(());
        }
        if let Err(err) = self.load(repo).await {
            log::warn!("Enquiry saved but the list could not be reloaded: {}", err);
            self.stale = true;
        }
        Ok(())
    }

    /// Stops the table from accepting results of requests still in flight.
    pub fn teardown(&mut self) {
        self.torn_down = true;
        self.latest_ticket += 1;
        self.loading = false;
        self.modal = None;
    }

    /// Data needed to draw the current page.
    pub fn page(&self) -> TablePageData {
        TablePageData {
            loading: self.loading,
            search_text: self.search_text.clone(),
            page_size: self.pager.page_size(),
            page_size_options: PAGE_SIZE_OPTIONS.to_vec(),
            page: self
                .pager
                .paginate(&self.filtered)
                .map(|enquiry| EnquiryRow::from(&enquiry)),
            modal: self.modal_mode().map(ModalView::from),
        }
    }
}
