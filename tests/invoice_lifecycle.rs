mod common;

use chrono::NaiveDate;
use coachlytic::{
    config::CoachlyticConfig,
    entities::{
        ClientId, InvoiceId, InvoiceItemInput, InvoicePatch, InvoiceStatus, NewInvoice,
        PaymentDatePolicy,
    },
    usecases::InvoiceUsecase,
};

use common::{
    ctx, invoice_usecase, invoice_usecase_with, now, other_ctx, session_item, Op, CLIENT,
    OTHER_CLIENT,
};

fn new_invoice() -> NewInvoice {
    NewInvoice::new(ClientId::new(CLIENT), vec![session_item()])
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// -- Create.

#[tokio::test]
async fn test_create_computes_exclusive_tax_and_items() {
    let (usecase, _, store) = invoice_usecase().await;

    let invoice = usecase.create_invoice(&ctx(), new_invoice()).await.unwrap();

    assert!((invoice.amount - 110.0).abs() < 1e-9);
    assert_eq!(invoice.tax_rate, 10.0);
    assert_eq!(invoice.status, InvoiceStatus::Pending);
    assert_eq!(invoice.issue_date, now().date_naive());
    assert_eq!(invoice.paid_at, None);
    assert_eq!(invoice.items.len(), 1);
    assert_eq!(invoice.items[0].amount, 100.0);
    assert_eq!(store.invoice_count().await, 1);
    assert_eq!(store.invoice_item_count().await, 1);

    let fetched = usecase.get_invoice(&ctx(), &invoice.id).await.unwrap();
    assert_eq!(fetched, invoice);
}

#[tokio::test]
async fn test_create_inclusive_tax_keeps_gross() {
    let (usecase, _, _) = invoice_usecase().await;
    let mut input = new_invoice();
    input.includes_tax = true;

    let invoice = usecase.create_invoice(&ctx(), input).await.unwrap();

    assert!((invoice.amount - 100.0).abs() < 1e-9);
    assert!(invoice.includes_tax);
}

#[tokio::test]
async fn test_create_uses_configured_default_rate() {
    let config = CoachlyticConfig {
        default_tax_rate: 8.0,
        ..Default::default()
    };
    let (usecase, _, _) = invoice_usecase_with(config).await;

    let invoice = usecase.create_invoice(&ctx(), new_invoice()).await.unwrap();

    assert_eq!(invoice.tax_rate, 8.0);
    assert!((invoice.amount - 108.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_create_paid_stamps_payment_date() {
    let (usecase, _, _) = invoice_usecase().await;
    let mut input = new_invoice();
    input.status = InvoiceStatus::Paid;

    let invoice = usecase.create_invoice(&ctx(), input).await.unwrap();

    assert_eq!(invoice.paid_at, Some(now()));
}

#[tokio::test]
async fn test_create_rejects_invalid_input_before_writing() {
    let (usecase, _, store) = invoice_usecase().await;

    let missing_client = NewInvoice::new(ClientId::new("  "), vec![session_item()]);
    assert!(usecase.create_invoice(&ctx(), missing_client).await.is_err());

    let placeholder = NewInvoice::new(ClientId::new("select"), vec![session_item()]);
    assert!(usecase.create_invoice(&ctx(), placeholder).await.is_err());

    let no_items = NewInvoice::new(ClientId::new(CLIENT), vec![]);
    let err = usecase.create_invoice(&ctx(), no_items).await.unwrap_err();
    assert!(err.to_string().contains("at least one line item"));

    let bad_item = NewInvoice::new(
        ClientId::new(CLIENT),
        vec![session_item(), InvoiceItemInput::new("", 1, 10.0)],
    );
    let err = usecase.create_invoice(&ctx(), bad_item).await.unwrap_err();
    assert!(err.to_string().contains("#2"));

    let mut bad_rate = new_invoice();
    bad_rate.tax_rate = Some(-5.0);
    assert!(usecase.create_invoice(&ctx(), bad_rate).await.is_err());

    assert_eq!(store.invoice_count().await, 0);
}

#[tokio::test]
async fn test_create_surfaces_invoice_insert_failure() {
    let (usecase, repository, store) = invoice_usecase().await;
    repository.fail_next(Op::InsertInvoice, 1).await;

    let err = usecase.create_invoice(&ctx(), new_invoice()).await.unwrap_err();

    assert!(err.to_string().contains("Failed to insert invoice row"));
    assert_eq!(store.invoice_count().await, 0);
}

#[tokio::test]
async fn test_create_rolls_back_invoice_when_items_fail() {
    let (usecase, repository, store) = invoice_usecase().await;
    repository.fail_next(Op::InsertItems, 1).await;

    let err = usecase.create_invoice(&ctx(), new_invoice()).await.unwrap_err();

    assert!(err.to_string().contains("Failed to insert line items"));
    assert_eq!(store.invoice_count().await, 0);
    assert_eq!(store.invoice_item_count().await, 0);
    assert!(usecase.list_invoices(&ctx()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_reports_failed_rollback() {
    let (usecase, repository, store) = invoice_usecase().await;
    repository.fail_next(Op::InsertItems, 1).await;
    repository.fail_next(Op::DeleteInvoice, 1).await;

    let err = usecase.create_invoice(&ctx(), new_invoice()).await.unwrap_err();

    assert!(err
        .to_string()
        .contains("rolling back 'insert_invoice' also failed"));
    // The orphaned row is still there for manual cleanup.
    assert_eq!(store.invoice_count().await, 1);
    assert_eq!(store.invoice_item_count().await, 0);
}

// -- Update.

#[tokio::test]
async fn test_update_replaces_items_and_recomputes_amount() {
    let (usecase, _, store) = invoice_usecase().await;
    let invoice = usecase.create_invoice(&ctx(), new_invoice()).await.unwrap();

    let items = vec![
        InvoiceItemInput::new("Session", 3, 50.0),
        InvoiceItemInput::new("Meal plan", 1, 30.0),
    ];
    let patch = InvoicePatch {
        notes: Some(Some("March block".to_string())),
        ..Default::default()
    };
    let updated = usecase
        .update_invoice(&ctx(), &invoice.id, patch, Some(items))
        .await
        .unwrap();

    assert!((updated.amount - 198.0).abs() < 1e-9);
    assert_eq!(updated.notes.as_deref(), Some("March block"));
    assert_eq!(updated.items.len(), 2);
    assert_eq!(updated.items[1].description, "Meal plan");
    assert_eq!(store.invoice_item_count().await, 2);

    let fetched = usecase.get_invoice(&ctx(), &invoice.id).await.unwrap();
    assert_eq!(fetched.items, updated.items);
    assert_eq!(fetched.amount, updated.amount);
}

#[tokio::test]
async fn test_update_tax_settings_recomputes_from_existing_items() {
    let (usecase, _, store) = invoice_usecase().await;
    let invoice = usecase.create_invoice(&ctx(), new_invoice()).await.unwrap();

    let patch = InvoicePatch {
        tax_rate: Some(20.0),
        ..Default::default()
    };
    let updated = usecase
        .update_invoice(&ctx(), &invoice.id, patch, None)
        .await
        .unwrap();

    assert!((updated.amount - 120.0).abs() < 1e-9);
    assert_eq!(updated.items, invoice.items);
    assert_eq!(store.invoice_item_count().await, 1);
}

#[tokio::test]
async fn test_update_fields_only_keeps_amount() {
    let (usecase, _, _) = invoice_usecase().await;
    let invoice = usecase.create_invoice(&ctx(), new_invoice()).await.unwrap();

    let patch = InvoicePatch {
        due_date: Some(Some(date(2024, 4, 1))),
        ..Default::default()
    };
    let updated = usecase
        .update_invoice(&ctx(), &invoice.id, patch, None)
        .await
        .unwrap();

    assert_eq!(updated.due_date, Some(date(2024, 4, 1)));
    assert_eq!(updated.amount, invoice.amount);
}

#[tokio::test]
async fn test_update_rolls_back_when_new_items_fail() {
    let (usecase, repository, store) = invoice_usecase().await;
    let invoice = usecase.create_invoice(&ctx(), new_invoice()).await.unwrap();
    repository.fail_next(Op::InsertItems, 1).await;

    let patch = InvoicePatch {
        notes: Some(Some("changed".to_string())),
        ..Default::default()
    };
    let err = usecase
        .update_invoice(
            &ctx(),
            &invoice.id,
            patch,
            Some(vec![InvoiceItemInput::new("Session", 5, 50.0)]),
        )
        .await
        .unwrap_err();

    assert!(err.to_string().contains("rolled back"));
    let restored = usecase.get_invoice(&ctx(), &invoice.id).await.unwrap();
    assert_eq!(restored.notes, None);
    assert_eq!(restored.amount, invoice.amount);
    assert_eq!(restored.items.len(), 1);
    assert_eq!(restored.items[0].quantity, 2);
    assert_eq!(store.invoice_item_count().await, 1);
}

#[tokio::test]
async fn test_update_rolls_back_fields_when_item_delete_fails() {
    let (usecase, repository, _) = invoice_usecase().await;
    let invoice = usecase.create_invoice(&ctx(), new_invoice()).await.unwrap();
    repository.fail_next(Op::DeleteItems, 1).await;

    let patch = InvoicePatch {
        tax_rate: Some(0.0),
        ..Default::default()
    };
    let err = usecase
        .update_invoice(&ctx(), &invoice.id, patch, Some(vec![session_item()]))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("delete_items"));
    let restored = usecase.get_invoice(&ctx(), &invoice.id).await.unwrap();
    assert_eq!(restored.tax_rate, 10.0);
    assert_eq!(restored.amount, invoice.amount);
}

#[tokio::test]
async fn test_update_reports_failed_rollback() {
    let (usecase, repository, store) = invoice_usecase().await;
    let invoice = usecase.create_invoice(&ctx(), new_invoice()).await.unwrap();
    // The new items and the re-insert of the old ones both fail.
    repository.fail_next(Op::InsertItems, 2).await;

    let err = usecase
        .update_invoice(
            &ctx(),
            &invoice.id,
            InvoicePatch::default(),
            Some(vec![session_item()]),
        )
        .await
        .unwrap_err();

    assert!(err
        .to_string()
        .contains("rolling back 'delete_items' also failed"));
    assert_eq!(store.invoice_item_count().await, 0);
}

#[tokio::test]
async fn test_update_validates_before_writing() {
    let (usecase, _, _) = invoice_usecase().await;
    let invoice = usecase.create_invoice(&ctx(), new_invoice()).await.unwrap();

    let err = usecase
        .update_invoice(&ctx(), &invoice.id, InvoicePatch::default(), Some(vec![]))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("at least one line item"));

    let unchanged = usecase.get_invoice(&ctx(), &invoice.id).await.unwrap();
    assert_eq!(unchanged, invoice);
}

#[tokio::test]
async fn test_create_rejects_unknown_client() {
    let (usecase, _, store) = invoice_usecase().await;

    let input = NewInvoice::new(ClientId::new("deleted-client"), vec![session_item()]);
    let err = usecase.create_invoice(&ctx(), input).await.unwrap_err();

    assert!(err.to_string().contains("Invalid client reference: 'deleted-client'"));
    assert_eq!(store.invoice_count().await, 0);
    assert_eq!(store.invoice_item_count().await, 0);
}

#[tokio::test]
async fn test_create_rejects_client_of_another_user() {
    let (usecase, _, store) = invoice_usecase().await;

    let input = NewInvoice::new(ClientId::new(OTHER_CLIENT), vec![session_item()]);
    let err = usecase.create_invoice(&ctx(), input).await.unwrap_err();

    assert!(err.to_string().contains("Invalid client reference"));
    assert_eq!(store.invoice_count().await, 0);
}

#[tokio::test]
async fn test_update_rejects_unknown_client() {
    let (usecase, _, _) = invoice_usecase().await;
    let invoice = usecase.create_invoice(&ctx(), new_invoice()).await.unwrap();

    let patch = InvoicePatch {
        client_id: Some(ClientId::new("deleted-client")),
        ..Default::default()
    };
    let err = usecase
        .update_invoice(&ctx(), &invoice.id, patch, None)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("Invalid client reference: 'deleted-client'"));
    let unchanged = usecase.get_invoice(&ctx(), &invoice.id).await.unwrap();
    assert_eq!(unchanged, invoice);
}

#[tokio::test]
async fn test_update_rejects_client_of_another_user() {
    let (usecase, _, _) = invoice_usecase().await;
    let invoice = usecase.create_invoice(&ctx(), new_invoice()).await.unwrap();

    let patch = InvoicePatch {
        client_id: Some(ClientId::new(OTHER_CLIENT)),
        notes: Some(Some("moved".to_string())),
        ..Default::default()
    };
    let err = usecase
        .update_invoice(&ctx(), &invoice.id, patch, Some(vec![session_item()]))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("Invalid client reference"));
    let unchanged = usecase.get_invoice(&ctx(), &invoice.id).await.unwrap();
    assert_eq!(unchanged, invoice);
}

// -- Status, delete, ownership.

#[tokio::test]
async fn test_status_transitions_and_payment_date() {
    let (usecase, _, _) = invoice_usecase().await;
    let invoice = usecase.create_invoice(&ctx(), new_invoice()).await.unwrap();

    let paid = usecase
        .set_invoice_status(&ctx(), &invoice.id, InvoiceStatus::Paid)
        .await
        .unwrap();
    assert_eq!(paid.status, InvoiceStatus::Paid);
    assert_eq!(paid.paid_at, Some(now()));

    let overdue = usecase
        .set_invoice_status(&ctx(), &invoice.id, InvoiceStatus::Overdue)
        .await
        .unwrap();
    assert_eq!(overdue.status, InvoiceStatus::Overdue);
    assert_eq!(overdue.paid_at, Some(now()));

    let pending = usecase
        .set_invoice_status(&ctx(), &invoice.id, InvoiceStatus::Pending)
        .await
        .unwrap();
    assert_eq!(pending.status, InvoiceStatus::Pending);
    assert_eq!(pending.paid_at, Some(now()));
}

#[tokio::test]
async fn test_clear_on_unpaid_policy() {
    let config = CoachlyticConfig {
        payment_date_policy: PaymentDatePolicy::ClearOnUnpaid,
        ..Default::default()
    };
    let (usecase, _, _) = invoice_usecase_with(config).await;
    let invoice = usecase.create_invoice(&ctx(), new_invoice()).await.unwrap();

    usecase
        .set_invoice_status(&ctx(), &invoice.id, InvoiceStatus::Paid)
        .await
        .unwrap();
    let pending = usecase
        .set_invoice_status(&ctx(), &invoice.id, InvoiceStatus::Pending)
        .await
        .unwrap();

    assert_eq!(pending.paid_at, None);
}

#[tokio::test]
async fn test_delete_cascades_items() {
    let (usecase, _, store) = invoice_usecase().await;
    let invoice = usecase.create_invoice(&ctx(), new_invoice()).await.unwrap();
    usecase.create_invoice(&ctx(), new_invoice()).await.unwrap();

    usecase.delete_invoice(&ctx(), &invoice.id).await.unwrap();

    assert_eq!(store.invoice_count().await, 1);
    assert_eq!(store.invoice_item_count().await, 1);
    assert!(usecase.get_invoice(&ctx(), &invoice.id).await.is_err());
}

#[tokio::test]
async fn test_invoices_are_scoped_to_their_user() {
    let (usecase, _, store) = invoice_usecase().await;
    let invoice = usecase.create_invoice(&ctx(), new_invoice()).await.unwrap();

    assert!(usecase.list_invoices(&other_ctx()).await.unwrap().is_empty());
    assert!(usecase.get_invoice(&other_ctx(), &invoice.id).await.is_err());
    assert!(usecase
        .set_invoice_status(&other_ctx(), &invoice.id, InvoiceStatus::Paid)
        .await
        .is_err());
    assert!(usecase.delete_invoice(&other_ctx(), &invoice.id).await.is_err());
    assert_eq!(store.invoice_count().await, 1);
}

#[tokio::test]
async fn test_get_missing_invoice() {
    let (usecase, _, _) = invoice_usecase().await;

    let err = usecase
        .get_invoice(&ctx(), &InvoiceId::new("missing"))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("missing"));
}

#[tokio::test]
async fn test_list_is_newest_issue_date_first() {
    let (usecase, _, _) = invoice_usecase().await;
    for day in [3, 20, 11] {
        let mut input = new_invoice();
        input.issue_date = Some(date(2024, 2, day));
        usecase.create_invoice(&ctx(), input).await.unwrap();
    }

    let days: Vec<_> = usecase
        .list_invoices(&ctx())
        .await
        .unwrap()
        .into_iter()
        .map(|i| i.issue_date)
        .collect();

    assert_eq!(days, vec![date(2024, 2, 20), date(2024, 2, 11), date(2024, 2, 3)]);
}

#[tokio::test]
async fn test_stats_over_stored_invoices() {
    let (usecase, _, _) = invoice_usecase().await;
    let mut late = new_invoice();
    late.due_date = Some(date(2024, 3, 1));
    usecase.create_invoice(&ctx(), late).await.unwrap();
    let paid = usecase.create_invoice(&ctx(), new_invoice()).await.unwrap();
    usecase
        .set_invoice_status(&ctx(), &paid.id, InvoiceStatus::Paid)
        .await
        .unwrap();

    let stats = usecase.invoice_stats(&ctx(), now().date_naive()).await.unwrap();

    assert_eq!(stats.invoice_count, 2);
    assert!((stats.total_billed - 220.0).abs() < 1e-9);
    assert!((stats.total_paid - 110.0).abs() < 1e-9);
    assert!((stats.total_outstanding - 110.0).abs() < 1e-9);
    assert_eq!(stats.past_due_pending, 1);
    assert_eq!(stats.count_by_status[&InvoiceStatus::Pending], 1);

    // Reported, not transitioned.
    let still_pending = usecase.list_invoices(&ctx()).await.unwrap();
    assert!(still_pending
        .iter()
        .all(|i| i.status != InvoiceStatus::Overdue));
}

#[tokio::test]
async fn test_preview_matches_saved_amount() {
    let (usecase, _, _) = invoice_usecase().await;
    let items = vec![session_item(), InvoiceItemInput::new("Check-in", 1, 25.0)];

    let preview = usecase.preview(&items, None, false);
    let saved = usecase
        .create_invoice(&ctx(), NewInvoice::new(ClientId::new(CLIENT), items))
        .await
        .unwrap();

    assert_eq!(preview.gross, saved.amount);
    assert!((preview.net - 125.0).abs() < 1e-9);
}
