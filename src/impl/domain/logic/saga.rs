use fractic_server_error::ServerError;
use futures::future::BoxFuture;
use tracing::{error, warn};

use crate::errors::CompensationFailed;

struct Compensation<'a> {
    step: &'static str,
    undo: BoxFuture<'a, Result<(), ServerError>>,
}

/// Rollback log for a write that spans several store calls.
///
/// After each successful step, the caller records the action that undoes it.
/// If a later step fails, [`Saga::abort`] runs the recorded actions newest
/// first. Undo futures are not polled until then.
pub(crate) struct Saga<'a> {
    operation: &'static str,
    rollback_log: Vec<Compensation<'a>>,
}

impl<'a> Saga<'a> {
    pub(crate) fn new(operation: &'static str) -> Self {
        Self {
            operation,
            rollback_log: Vec::new(),
        }
    }

    pub(crate) fn record(
        &mut self,
        step: &'static str,
        undo: BoxFuture<'a, Result<(), ServerError>>,
    ) {
        self.rollback_log.push(Compensation { step, undo });
    }

    /// Discards the rollback log.
    pub(crate) fn commit(self) {}

    /// Rolls back every recorded step and returns the error to surface.
    ///
    /// On a clean rollback this is `cause`. If an undo action fails, the
    /// remaining ones are skipped and a `CompensationFailed` error carrying
    /// both failures is returned instead.
    pub(crate) async fn abort(self, failed_step: &'static str, cause: ServerError) -> ServerError {
        warn!(
            operation = self.operation,
            failed_step,
            steps = self.rollback_log.len(),
            "rolling back"
        );
        let mut log = self.rollback_log;
        while let Some(Compensation { step, undo }) = log.pop() {
            if let Err(undo_error) = undo.await {
                error!(
                    operation = self.operation,
                    failed_step,
                    compensated_step = step,
                    "rollback failed; write left partially applied"
                );
                return CompensationFailed::with_debug(
                    self.operation,
                    failed_step,
                    step,
                    &(cause, undo_error),
                );
            }
        }
        cause
    }
}
