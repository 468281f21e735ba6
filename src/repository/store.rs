//! Shared enquiry collection with a single writer and many readers.

use std::sync::Arc;

use tokio::sync::watch;

use crate::domain::enquiry::Enquiry;

/// Owns the loaded enquiry collection. Only the owner can replace it.
#[derive(Debug)]
pub struct EnquiryStore {
    sender: watch::Sender<Arc<Vec<Enquiry>>>,
}

/// Read-only view of an [`EnquiryStore`].
#[derive(Debug, Clone)]
pub struct StoreHandle {
    receiver: watch::Receiver<Arc<Vec<Enquiry>>>,
}

impl Default for EnquiryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EnquiryStore {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(Arc::new(Vec::new()));
        Self { sender }
    }

    pub fn replace(&self, enquiries: Vec<Enquiry>) {
        self.sender.send_replace(Arc::new(enquiries));
    }

    pub fn snapshot(&self) -> Arc<Vec<Enquiry>> {
        self.sender.borrow().clone()
    }

    pub fn handle(&self) -> StoreHandle {
        StoreHandle {
            receiver: self.sender.subscribe(),
        }
    }
}

impl StoreHandle {
    pub fn snapshot(&self) -> Arc<Vec<Enquiry>> {
        self.receiver.borrow().clone()
    }

    /// Waits for the next replacement. Returns `false` once the store is gone.
    pub async fn changed(&mut self) -> bool {
        self.receiver.changed().await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::enquiry::EnquiryProduct;
    use crate::domain::types::{EnquiryId, EnquiryStatus, Quantity};

    fn enquiry(id: i64) -> Enquiry {
        Enquiry {
            enquiry_id: EnquiryId::numeric(id).unwrap(),
            customer_id: None,
            customer_name: "Acme".to_string(),
            enquiry_datetime: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            status: EnquiryStatus::Open,
            products: vec![EnquiryProduct::new(Quantity::new(1).unwrap())],
        }
    }

    #[tokio::test]
    async fn handles_observe_replacements() {
        let store = EnquiryStore::new();
        let mut handle = store.handle();
        assert!(handle.snapshot().is_empty());

        store.replace(vec![enquiry(1), enquiry(2)]);
        assert!(handle.changed().await);
        assert_eq!(handle.snapshot().len(), 2);
        assert_eq!(store.snapshot().len(), 2);

        drop(store);
        assert!(!handle.changed().await);
    }
}
