use std::sync::Arc;

use fractic_server_error::ServerError;

use crate::{
    clock::{Clock, SystemClock},
    config::CoachlyticConfig,
    datasources::{InMemoryStoreDatasource, StoreDatasource},
    repositories::{ClientRepositoryImpl, InvoiceRepositoryImpl},
    usecases::{ClientUsecaseImpl, InvoiceUsecaseImpl},
};

/// Wires the usecases to one store.
pub struct CoachlyticUtil<DS, C = SystemClock>
where
    DS: StoreDatasource,
    C: Clock + Clone,
{
    pub invoices: InvoiceUsecaseImpl<InvoiceRepositoryImpl<DS>, C>,
    pub clients: ClientUsecaseImpl<ClientRepositoryImpl<DS>, C>,
    config: CoachlyticConfig,
}

impl<DS: StoreDatasource> CoachlyticUtil<DS> {
    pub fn new(datasource: Arc<DS>, config: CoachlyticConfig) -> Result<Self, ServerError> {
        Self::with_clock(datasource, config, SystemClock)
    }
}

impl CoachlyticUtil<InMemoryStoreDatasource> {
    pub fn in_memory(config: CoachlyticConfig) -> Result<Self, ServerError> {
        Self::new(Arc::new(InMemoryStoreDatasource::new()), config)
    }
}

impl<DS, C> CoachlyticUtil<DS, C>
where
    DS: StoreDatasource,
    C: Clock + Clone,
{
    pub fn with_clock(
        datasource: Arc<DS>,
        config: CoachlyticConfig,
        clock: C,
    ) -> Result<Self, ServerError> {
        config.validate()?;
        Ok(Self {
            invoices: InvoiceUsecaseImpl::with_clock(
                InvoiceRepositoryImpl::new(datasource.clone()),
                config.clone(),
                clock.clone(),
            ),
            clients: ClientUsecaseImpl::with_clock(
                ClientRepositoryImpl::new(datasource),
                config.clone(),
                clock,
            ),
            config,
        })
    }

    pub fn config(&self) -> &CoachlyticConfig {
        &self.config
    }
}
