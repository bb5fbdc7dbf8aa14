#![allow(dead_code)]

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone as _, Utc};
use coachlytic::{
    clock::FixedClock,
    config::CoachlyticConfig,
    datasources::{ClientRowModel, InMemoryStoreDatasource, StoreDatasource as _},
    entities::{
        Client, ClientDraft, ClientId, Invoice, InvoiceDraft, InvoiceId, InvoiceItem,
        InvoiceItemInput, LanguageTag, NoteDraft, NoteId, NoteRecord, SessionContext, UserId,
    },
    errors::StoreConstraintViolation,
    repositories::{
        ClientRepository, ClientRepositoryImpl, InvoiceRepository, InvoiceRepositoryImpl,
    },
    usecases::{ClientUsecaseImpl, InvoiceUsecaseImpl},
};
use fractic_server_error::ServerError;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    InsertInvoice,
    UpdateInvoice,
    DeleteInvoice,
    InsertItems,
    DeleteItems,
    InsertNoteRecord,
    DeleteNoteRecord,
    UpdateClientNotes,
}

/// Scheduled failures, shared by the failing repositories below. Each entry
/// lets `skip` calls through, then fails the next `times`.
#[derive(Default)]
pub struct FailurePlan {
    failures: Mutex<HashMap<Op, (usize, usize)>>,
}

impl FailurePlan {
    async fn set(&self, op: Op, skip: usize, times: usize) {
        self.failures.lock().await.insert(op, (skip, times));
    }

    async fn check(&self, op: Op) -> Result<(), ServerError> {
        let mut failures = self.failures.lock().await;
        match failures.get_mut(&op) {
            Some((skip, _)) if *skip > 0 => {
                *skip -= 1;
                Ok(())
            }
            Some((_, times)) if *times > 0 => {
                *times -= 1;
                Err(StoreConstraintViolation::new("test", "injected failure"))
            }
            _ => Ok(()),
        }
    }
}

pub struct FlakyInvoiceRepository {
    inner: InvoiceRepositoryImpl<InMemoryStoreDatasource>,
    plan: FailurePlan,
}

impl FlakyInvoiceRepository {
    pub fn new(store: Arc<InMemoryStoreDatasource>) -> Self {
        Self {
            inner: InvoiceRepositoryImpl::new(store),
            plan: FailurePlan::default(),
        }
    }

    /// Makes the next `times` calls of `op` fail.
    pub async fn fail_next(&self, op: Op, times: usize) {
        self.plan.set(op, 0, times).await;
    }

    async fn check(&self, op: Op) -> Result<(), ServerError> {
        self.plan.check(op).await
    }
}

#[async_trait]
impl InvoiceRepository for FlakyInvoiceRepository {
    async fn list_invoices(&self, user_id: &UserId) -> Result<Vec<Invoice>, ServerError> {
        self.inner.list_invoices(user_id).await
    }

    async fn find_invoice(
        &self,
        user_id: &UserId,
        id: &InvoiceId,
    ) -> Result<Option<Invoice>, ServerError> {
        self.inner.find_invoice(user_id, id).await
    }

    async fn insert_invoice(&self, draft: InvoiceDraft) -> Result<Invoice, ServerError> {
        self.check(Op::InsertInvoice).await?;
        self.inner.insert_invoice(draft).await
    }

    async fn update_invoice(&self, invoice: &Invoice) -> Result<Invoice, ServerError> {
        self.check(Op::UpdateInvoice).await?;
        self.inner.update_invoice(invoice).await
    }

    async fn delete_invoice(&self, id: &InvoiceId) -> Result<(), ServerError> {
        self.check(Op::DeleteInvoice).await?;
        self.inner.delete_invoice(id).await
    }

    async fn insert_items(
        &self,
        invoice_id: &InvoiceId,
        items: &[InvoiceItemInput],
    ) -> Result<Vec<InvoiceItem>, ServerError> {
        self.check(Op::InsertItems).await?;
        self.inner.insert_items(invoice_id, items).await
    }

    async fn delete_items(&self, invoice_id: &InvoiceId) -> Result<(), ServerError> {
        self.check(Op::DeleteItems).await?;
        self.inner.delete_items(invoice_id).await
    }

    async fn client_exists(
        &self,
        user_id: &UserId,
        client_id: &ClientId,
    ) -> Result<bool, ServerError> {
        self.inner.client_exists(user_id, client_id).await
    }
}

pub struct FlakyClientRepository {
    inner: ClientRepositoryImpl<InMemoryStoreDatasource>,
    plan: FailurePlan,
}

impl FlakyClientRepository {
    pub fn new(store: Arc<InMemoryStoreDatasource>) -> Self {
        Self {
            inner: ClientRepositoryImpl::new(store),
            plan: FailurePlan::default(),
        }
    }

    /// Makes the next `times` calls of `op` fail.
    pub async fn fail_next(&self, op: Op, times: usize) {
        self.plan.set(op, 0, times).await;
    }

    /// Lets `skip` calls of `op` succeed, then fails the next one.
    pub async fn fail_after(&self, op: Op, skip: usize) {
        self.plan.set(op, skip, 1).await;
    }
}

#[async_trait]
impl ClientRepository for FlakyClientRepository {
    async fn list_clients(&self, user_id: &UserId) -> Result<Vec<Client>, ServerError> {
        self.inner.list_clients(user_id).await
    }

    async fn find_client(
        &self,
        user_id: &UserId,
        id: &ClientId,
    ) -> Result<Option<Client>, ServerError> {
        self.inner.find_client(user_id, id).await
    }

    async fn insert_client(&self, draft: ClientDraft) -> Result<Client, ServerError> {
        self.inner.insert_client(draft).await
    }

    async fn update_client(&self, client: &Client) -> Result<Client, ServerError> {
        self.inner.update_client(client).await
    }

    async fn update_client_notes(&self, id: &ClientId, notes: &str) -> Result<(), ServerError> {
        self.plan.check(Op::UpdateClientNotes).await?;
        self.inner.update_client_notes(id, notes).await
    }

    async fn delete_client(&self, id: &ClientId) -> Result<(), ServerError> {
        self.inner.delete_client(id).await
    }

    async fn list_note_records(
        &self,
        client_id: &ClientId,
    ) -> Result<Vec<NoteRecord>, ServerError> {
        self.inner.list_note_records(client_id).await
    }

    async fn insert_note_record(&self, draft: NoteDraft) -> Result<NoteRecord, ServerError> {
        self.plan.check(Op::InsertNoteRecord).await?;
        self.inner.insert_note_record(draft).await
    }

    async fn update_note_record(&self, record: &NoteRecord) -> Result<NoteRecord, ServerError> {
        self.inner.update_note_record(record).await
    }

    async fn delete_note_record(&self, id: &NoteId) -> Result<(), ServerError> {
        self.plan.check(Op::DeleteNoteRecord).await?;
        self.inner.delete_note_record(id).await
    }
}

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 0).unwrap()
}

pub fn ctx() -> SessionContext {
    SessionContext::new(UserId::new("coach-1"), LanguageTag::En)
}

pub fn other_ctx() -> SessionContext {
    SessionContext::new(UserId::new("coach-2"), LanguageTag::Ja)
}

/// Client of `ctx()` that invoices are billed to.
pub const CLIENT: &str = "client-1";
/// Client of `other_ctx()`.
pub const OTHER_CLIENT: &str = "client-2";

pub fn client_row(id: &str, user_id: &str) -> ClientRowModel {
    ClientRowModel {
        id: id.to_string(),
        user_id: user_id.to_string(),
        name: format!("Client {id}"),
        email: None,
        phone: None,
        program: None,
        notes: String::new(),
        status: "active".to_string(),
        progress: 0,
        session_count: 0,
        next_session: None,
        created_at: now(),
    }
}

/// Store holding `CLIENT` (owned by `ctx()`) and `OTHER_CLIENT` (owned by
/// `other_ctx()`).
pub async fn seeded_store() -> Arc<InMemoryStoreDatasource> {
    let store = Arc::new(InMemoryStoreDatasource::new());
    store
        .insert_client(client_row(CLIENT, ctx().user_id.as_str()))
        .await
        .unwrap();
    store
        .insert_client(client_row(OTHER_CLIENT, other_ctx().user_id.as_str()))
        .await
        .unwrap();
    store
}

pub fn session_item() -> InvoiceItemInput {
    InvoiceItemInput::new("Session", 2, 50.0)
}

pub type TestInvoiceUsecase = InvoiceUsecaseImpl<Arc<FlakyInvoiceRepository>, FixedClock>;

pub async fn invoice_usecase_with(
    config: CoachlyticConfig,
) -> (
    TestInvoiceUsecase,
    Arc<FlakyInvoiceRepository>,
    Arc<InMemoryStoreDatasource>,
) {
    let store = seeded_store().await;
    let repository = Arc::new(FlakyInvoiceRepository::new(store.clone()));
    let usecase = InvoiceUsecaseImpl::with_clock(repository.clone(), config, FixedClock(now()));
    (usecase, repository, store)
}

pub async fn invoice_usecase() -> (
    TestInvoiceUsecase,
    Arc<FlakyInvoiceRepository>,
    Arc<InMemoryStoreDatasource>,
) {
    invoice_usecase_with(CoachlyticConfig::default()).await
}

pub type TestClientUsecase = ClientUsecaseImpl<Arc<FlakyClientRepository>, FixedClock>;

pub async fn client_usecase() -> (TestClientUsecase, Arc<FlakyClientRepository>) {
    let store = seeded_store().await;
    let repository = Arc::new(FlakyClientRepository::new(store));
    let usecase = ClientUsecaseImpl::with_clock(
        repository.clone(),
        CoachlyticConfig::default(),
        FixedClock(now()),
    );
    (usecase, repository)
}
