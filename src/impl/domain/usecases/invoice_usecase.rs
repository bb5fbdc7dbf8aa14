use async_trait::async_trait;
use chrono::NaiveDate;
use fractic_server_error::ServerError;
use futures::FutureExt as _;
use tracing::{debug, info};

use crate::{
    billing::{compute_invoice_amounts, summarize_invoices},
    clock::{Clock, SystemClock},
    config::CoachlyticConfig,
    domain::logic::{invoice_validator::InvoiceValidator, saga::Saga},
    entities::{
        ClientId, Invoice, InvoiceDraft, InvoiceId, InvoiceItemInput, InvoicePatch, InvoiceStats,
        InvoiceStatus, NewInvoice, SessionContext, TaxBreakdown,
    },
    errors::{
        InvalidClientReference, InvoiceDeleteFailed, InvoiceInsertFailed, InvoiceItemsInsertFailed,
        InvoiceItemsReplaceFailed, InvoiceNotFound, InvoiceStatusUpdateFailed, InvoiceUpdateFailed,
    },
    repositories::InvoiceRepository,
};

#[async_trait]
pub trait InvoiceUsecase: Send + Sync {
    async fn list_invoices(&self, ctx: &SessionContext) -> Result<Vec<Invoice>, ServerError>;

    async fn get_invoice(
        &self,
        ctx: &SessionContext,
        id: &InvoiceId,
    ) -> Result<Invoice, ServerError>;

    /// Validates, then writes the invoice row and its item rows. If the items
    /// can't be written the invoice row is deleted again before the error is
    /// returned.
    async fn create_invoice(
        &self,
        ctx: &SessionContext,
        new_invoice: NewInvoice,
    ) -> Result<Invoice, ServerError>;

    /// Applies `patch`, and replaces the whole item set when `items` is
    /// given. The gross amount is recomputed whenever items or tax settings
    /// change.
    async fn update_invoice(
        &self,
        ctx: &SessionContext,
        id: &InvoiceId,
        patch: InvoicePatch,
        items: Option<Vec<InvoiceItemInput>>,
    ) -> Result<Invoice, ServerError>;

    async fn delete_invoice(&self, ctx: &SessionContext, id: &InvoiceId)
        -> Result<(), ServerError>;

    async fn set_invoice_status(
        &self,
        ctx: &SessionContext,
        id: &InvoiceId,
        status: InvoiceStatus,
    ) -> Result<Invoice, ServerError>;

    async fn invoice_stats(
        &self,
        ctx: &SessionContext,
        as_of: NaiveDate,
    ) -> Result<InvoiceStats, ServerError>;
}

pub struct InvoiceUsecaseImpl<R, C = SystemClock>
where
    R: InvoiceRepository,
    C: Clock,
{
    repository: R,
    clock: C,
    config: CoachlyticConfig,
}

impl<R: InvoiceRepository> InvoiceUsecaseImpl<R> {
    pub fn new(repository: R, config: CoachlyticConfig) -> Self {
        Self::with_clock(repository, config, SystemClock)
    }
}

impl<R: InvoiceRepository, C: Clock> InvoiceUsecaseImpl<R, C> {
    pub fn with_clock(repository: R, config: CoachlyticConfig, clock: C) -> Self {
        Self {
            repository,
            clock,
            config,
        }
    }

    /// Form preview; same computation the save path uses.
    pub fn preview(
        &self,
        items: &[InvoiceItemInput],
        tax_rate: Option<f64>,
        includes_tax: bool,
    ) -> TaxBreakdown {
        compute_invoice_amounts(
            items,
            tax_rate.unwrap_or(self.config.default_tax_rate),
            includes_tax,
        )
    }

    /// The client must exist and belong to the caller.
    async fn ensure_client(
        &self,
        ctx: &SessionContext,
        client_id: &ClientId,
    ) -> Result<(), ServerError> {
        if !self
            .repository
            .client_exists(&ctx.user_id, client_id)
            .await?
        {
            return Err(InvalidClientReference::new(client_id.as_str()));
        }
        Ok(())
    }

    async fn find_owned(
        &self,
        ctx: &SessionContext,
        id: &InvoiceId,
    ) -> Result<Invoice, ServerError> {
        self.repository
            .find_invoice(&ctx.user_id, id)
            .await?
            .ok_or_else(|| InvoiceNotFound::new(id.as_str()))
    }
}

#[async_trait]
impl<R, C> InvoiceUsecase for InvoiceUsecaseImpl<R, C>
where
    R: InvoiceRepository,
    C: Clock,
{
    async fn list_invoices(&self, ctx: &SessionContext) -> Result<Vec<Invoice>, ServerError> {
        self.repository.list_invoices(&ctx.user_id).await
    }

    async fn get_invoice(
        &self,
        ctx: &SessionContext,
        id: &InvoiceId,
    ) -> Result<Invoice, ServerError> {
        self.find_owned(ctx, id).await
    }

    async fn create_invoice(
        &self,
        ctx: &SessionContext,
        new_invoice: NewInvoice,
    ) -> Result<Invoice, ServerError> {
        let NewInvoice {
            client_id,
            items,
            due_date,
            status,
            notes,
            tax_rate,
            includes_tax,
            issue_date,
        } = new_invoice;
        let tax_rate = tax_rate.unwrap_or(self.config.default_tax_rate);
        InvoiceValidator::validate_new(&client_id, &items, tax_rate)?;
        self.ensure_client(ctx, &client_id).await?;

        let amounts = compute_invoice_amounts(&items, tax_rate, includes_tax);
        let now = self.clock.now();
        let draft = InvoiceDraft {
            user_id: ctx.user_id.clone(),
            client_id,
            amount: amounts.gross,
            issue_date: issue_date.unwrap_or_else(|| now.date_naive()),
            due_date,
            status,
            notes,
            tax_rate,
            includes_tax,
            paid_at: (status == InvoiceStatus::Paid).then_some(now),
            created_at: now,
        };

        let invoice = self
            .repository
            .insert_invoice(draft)
            .await
            .map_err(|e| InvoiceInsertFailed::with_debug(&e))?;

        let mut saga = Saga::new("create_invoice");
        let created_id = invoice.id.clone();
        saga.record(
            "insert_invoice",
            async move { self.repository.delete_invoice(&created_id).await }.boxed(),
        );

        match self.repository.insert_items(&invoice.id, &items).await {
            Ok(items) => {
                saga.commit();
                info!(
                    invoice_id = %invoice.id,
                    net = amounts.net,
                    tax = amounts.tax,
                    gross = amounts.gross,
                    "created invoice"
                );
                Ok(Invoice { items, ..invoice })
            }
            Err(e) => Err(saga
                .abort(
                    "insert_items",
                    InvoiceItemsInsertFailed::with_debug(invoice.id.as_str(), &e),
                )
                .await),
        }
    }

    async fn update_invoice(
        &self,
        ctx: &SessionContext,
        id: &InvoiceId,
        patch: InvoicePatch,
        items: Option<Vec<InvoiceItemInput>>,
    ) -> Result<Invoice, ServerError> {
        if let Some(client_id) = &patch.client_id {
            InvoiceValidator::validate_client(client_id)?;
        }
        if let Some(tax_rate) = patch.tax_rate {
            InvoiceValidator::validate_tax_rate(tax_rate)?;
        }
        if let Some(items) = &items {
            InvoiceValidator::validate_items(items)?;
        }
        if let Some(client_id) = &patch.client_id {
            self.ensure_client(ctx, client_id).await?;
        }

        let previous = self.find_owned(ctx, id).await?;
        let mut updated = previous.clone();
        updated.apply_patch(&patch, self.clock.now(), self.config.payment_date_policy);
        if items.is_some() || patch.changes_tax() {
            let lines = items.clone().unwrap_or_else(|| previous.item_inputs());
            updated.amount =
                compute_invoice_amounts(&lines, updated.tax_rate, updated.includes_tax).gross;
        }

        let saved = self
            .repository
            .update_invoice(&updated)
            .await
            .map_err(|e| InvoiceUpdateFailed::with_debug(id.as_str(), &e))?;

        let Some(items) = items else {
            debug!(invoice_id = %id, "updated invoice fields");
            return Ok(saved);
        };

        let mut saga = Saga::new("update_invoice");
        let restore = previous.clone();
        saga.record(
            "update_invoice",
            async move { self.repository.update_invoice(&restore).await.map(|_| ()) }.boxed(),
        );

        if let Err(e) = self.repository.delete_items(id).await {
            return Err(saga
                .abort(
                    "delete_items",
                    InvoiceItemsReplaceFailed::with_debug(id.as_str(), "delete_items", &e),
                )
                .await);
        }
        let previous_items = previous.item_inputs();
        let restore_id = id.clone();
        saga.record(
            "delete_items",
            async move {
                self.repository
                    .insert_items(&restore_id, &previous_items)
                    .await
                    .map(|_| ())
            }
            .boxed(),
        );

        match self.repository.insert_items(id, &items).await {
            Ok(new_items) => {
                saga.commit();
                info!(
                    invoice_id = %id,
                    items = new_items.len(),
                    gross = saved.amount,
                    "updated invoice and replaced items"
                );
                Ok(Invoice {
                    items: new_items,
                    ..saved
                })
            }
            Err(e) => Err(saga
                .abort(
                    "insert_items",
                    InvoiceItemsReplaceFailed::with_debug(id.as_str(), "insert_items", &e),
                )
                .await),
        }
    }

    async fn delete_invoice(
        &self,
        ctx: &SessionContext,
        id: &InvoiceId,
    ) -> Result<(), ServerError> {
        self.find_owned(ctx, id).await?;
        self.repository
            .delete_invoice(id)
            .await
            .map_err(|e| InvoiceDeleteFailed::with_debug(id.as_str(), &e))?;
        info!(invoice_id = %id, "deleted invoice");
        Ok(())
    }

    async fn set_invoice_status(
        &self,
        ctx: &SessionContext,
        id: &InvoiceId,
        status: InvoiceStatus,
    ) -> Result<Invoice, ServerError> {
        let mut invoice = self.find_owned(ctx, id).await?;
        let from = invoice.status;
        invoice.transition_to(status, self.clock.now(), self.config.payment_date_policy);
        let saved = self
            .repository
            .update_invoice(&invoice)
            .await
            .map_err(|e| InvoiceStatusUpdateFailed::with_debug(id.as_str(), &e))?;
        info!(invoice_id = %id, %from, to = %status, "invoice status changed");
        Ok(saved)
    }

    async fn invoice_stats(
        &self,
        ctx: &SessionContext,
        as_of: NaiveDate,
    ) -> Result<InvoiceStats, ServerError> {
        let invoices = self.repository.list_invoices(&ctx.user_id).await?;
        Ok(summarize_invoices(&invoices, as_of))
    }
}
