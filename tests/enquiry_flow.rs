use enquiry_desk::domain::types::EnquiryStatus;
use enquiry_desk::forms::FormMode;
use enquiry_desk::forms::enquiry::{EnquiryField, ProductField};
use enquiry_desk::repository::{FallbackSource, HttpRepository, InMemoryRepository};
use enquiry_desk::services::enquiry_form::{SavedEnquiry, SubmitOutcome};
use enquiry_desk::services::enquiry_table::EnquiryTableController;
use serde_json::json;

mod common;

use common::{Canned, serve};

fn fill_create_form(table: &mut EnquiryTableController) {
    table.open_create();
    let form = table.form_mut().expect("create modal is open");
    form.set_customer_name("Acme Chemicals").unwrap();
    let row = form.add_product(None).unwrap();
    form.set_product_field(row, ProductField::Quantity, "2").unwrap();
    form.set_product_field(row, ProductField::CasNumber, "1234567-89-0")
        .unwrap();
}

#[tokio::test]
async fn created_enquiry_appears_after_reload() {
    let repo = InMemoryRepository::new();
    let mut table = EnquiryTableController::new();
    table.load(&repo).await.unwrap();
    assert!(table.filtered().is_empty());

    fill_create_form(&mut table);
    let outcome = table.submit(&repo).await.unwrap();
    assert!(matches!(
        outcome,
        SubmitOutcome::Saved(SavedEnquiry::Created { .. })
    ));
    assert!(!table.is_modal_open());

    let enquiries = table.filtered();
    assert_eq!(enquiries.len(), 1);
    assert_eq!(enquiries[0].customer_name, "Acme Chemicals");
    assert_eq!(enquiries[0].status, EnquiryStatus::Open);
    assert_eq!(enquiries[0].products.len(), 1);
    assert_eq!(enquiries[0].products[0].quantity.get(), 2);
    assert_eq!(
        enquiries[0].products[0]
            .cas_number
            .as_ref()
            .map(|c| c.as_str()),
        Some("1234567-89-0")
    );

    let page = table.page();
    assert_eq!(page.page.total_items, 1);
    assert!(page.page.items[0].status_class.contains("bg-blue-100"));
}

#[tokio::test]
async fn invalid_quantity_blocks_submission() {
    let repo = InMemoryRepository::new();
    let mut table = EnquiryTableController::new();
    fill_create_form(&mut table);
    table
        .form_mut()
        .unwrap()
        .set_product_field(0, ProductField::Quantity, "0")
        .unwrap();

    let outcome = table.submit(&repo).await.unwrap();
    let SubmitOutcome::Invalid(errors) = outcome else {
        panic!("expected validation failure");
    };
    assert!(errors.products.contains_key(&0));
    assert_eq!(repo.write_count(), 0);

    let form = table.form().unwrap();
    assert_eq!(form.mode(), FormMode::Create);
    assert!(form.is_touched(EnquiryField::Status));
    assert_eq!(
        form.product_field_error(0, ProductField::Quantity).as_deref(),
        Some("Quantity must be at least 1")
    );
}

#[tokio::test]
async fn view_then_edit_keeps_values_and_saves() {
    let repo = InMemoryRepository::new();
    let mut table = EnquiryTableController::new();
    fill_create_form(&mut table);
    table.submit(&repo).await.unwrap();

    let created = table.filtered()[0].clone();
    table.open_view(&created);
    assert!(table.form().unwrap().is_disabled());

    table.switch_to_edit().unwrap();
    let form = table.form_mut().unwrap();
    assert!(!form.is_disabled());
    assert_eq!(form.form().customer_name, "Acme Chemicals");
    assert_eq!(form.form().products[0].quantity, Some(2));
    form.set_status(EnquiryStatus::Processed).unwrap();

    table.submit(&repo).await.unwrap();
    assert_eq!(table.filtered()[0].status, EnquiryStatus::Processed);
    assert_eq!(table.filtered()[0].enquiry_id, created.enquiry_id);
}

#[tokio::test]
async fn create_flow_over_http() {
    let reloaded = json!([
        {
            "enquiry_id": 900,
            "customer_id": 31,
            "customer_name": "Acme Chemicals",
            "enquiry_date": "2024-07-03",
            "enquiry_time": "16:45",
            "status": "Open",
            "products": [{ "quantity": 2, "cas_number": "1234567-89-0", "product_id": "" }]
        }
    ]);
    let (base_url, server) = serve(vec![
        Canned::created(r#"{"customer_id": 31}"#),
        Canned::created(r#"{"id": 900}"#),
        Canned::ok(reloaded.to_string()),
    ])
    .await;
    let repo =
        HttpRepository::with_client(reqwest::Client::new(), &base_url, FallbackSource::Disabled);

    let mut table = EnquiryTableController::new();
    fill_create_form(&mut table);
    table.submit(&repo).await.unwrap();

    assert_eq!(table.filtered().len(), 1);
    assert_eq!(table.filtered()[0].status, EnquiryStatus::Open);
    assert_eq!(table.filtered()[0].products.len(), 1);

    let captured = server.await.unwrap();
    assert_eq!(captured[0].request_line, "POST /v1/customers/ HTTP/1.1");
    assert_eq!(captured[1].request_line, "POST /v1/enquiries/ HTTP/1.1");
    assert_eq!(captured[1].json()["customer_id"], 31);
    assert_eq!(captured[1].json()["products"][0]["quantity"], 2);
    assert!(captured[2].request_line.starts_with("GET /v1/enquiries/"));
}
