use fractic_server_error::{define_client_error, define_internal_error};

// Config-related.
define_client_error!(InvalidRon, "Invalid {ron_type} (invalid RON format).", { ron_type: &str });
define_client_error!(
    InvalidNoteStampFormat,
    "Invalid note stamp format '{format}': {details}.",
    { format: &str, details: &str }
);

// Invoice validation.
define_client_error!(
    InvalidClientReference,
    "Invalid client reference: '{client_id}'. Select an existing client.",
    { client_id: &str }
);
define_client_error!(EmptyInvoiceItems, "An invoice requires at least one line item.");
define_client_error!(
    InvalidInvoiceItem,
    "Invalid line item #{position}: {details}.",
    { position: usize, details: &str }
);
define_client_error!(
    InvalidTaxRate,
    "Invalid tax rate ({tax_rate}). Must be a finite, non-negative percentage.",
    { tax_rate: f64 }
);
define_client_error!(
    InvalidInvoiceStatus,
    "Invalid invoice status: '{status}'.",
    { status: &str }
);

// Client validation.
define_client_error!(InvalidClientName, "A client requires a non-empty name.");
define_client_error!(
    InvalidProgress,
    "Invalid progress ({progress}%). Must be between 0 and 100.",
    { progress: u8 }
);
define_client_error!(InvalidClientStatus, "Invalid client status: '{status}'.", { status: &str });
define_client_error!(EmptyNoteContent, "A note cannot be empty.");

// Lookup.
define_client_error!(InvoiceNotFound, "Invoice '{invoice_id}' not found.", { invoice_id: &str });
define_client_error!(ClientNotFound, "Client '{client_id}' not found.", { client_id: &str });
define_client_error!(
    NoteNotFound,
    "No note at position {index} (journal has {len} entries).",
    { index: usize, len: usize }
);
define_client_error!(
    NoteRecordNotFound,
    "Note '{note_id}' not found for client '{client_id}'.",
    { note_id: &str, client_id: &str }
);

// Persistence stages.
define_internal_error!(InvoiceInsertFailed, "Failed to insert invoice row.");
define_internal_error!(
    InvoiceItemsInsertFailed,
    "Failed to insert line items for invoice '{invoice_id}'.",
    { invoice_id: &str }
);
define_internal_error!(
    InvoiceUpdateFailed,
    "Failed to update invoice '{invoice_id}'.",
    { invoice_id: &str }
);
define_internal_error!(
    InvoiceItemsReplaceFailed,
    "Failed to replace line items for invoice '{invoice_id}' (stage: {stage}). Field changes were rolled back.",
    { invoice_id: &str, stage: &str }
);
define_internal_error!(
    InvoiceDeleteFailed,
    "Failed to delete invoice '{invoice_id}'.",
    { invoice_id: &str }
);
define_internal_error!(
    InvoiceStatusUpdateFailed,
    "Failed to set status of invoice '{invoice_id}'.",
    { invoice_id: &str }
);
define_internal_error!(
    ClientWriteFailed,
    "Failed to {operation} client '{client_id}'.",
    { operation: &str, client_id: &str }
);
define_internal_error!(
    NoteMigrationFailed,
    "Failed to migrate notes of client '{client_id}' (stage: {stage}). Inserted records were rolled back.",
    { client_id: &str, stage: &str }
);

// Compensation.
define_internal_error!(
    CompensationFailed,
    "'{operation}' failed at '{failed_step}' and rolling back '{compensated_step}' also failed. The write is partially applied and needs manual cleanup.",
    { operation: &str, failed_step: &str, compensated_step: &str }
);

// Store-related.
define_internal_error!(
    StoreRowNotFound,
    "No row '{id}' in table '{table}'.",
    { table: &str, id: &str }
);
define_internal_error!(
    StoreConstraintViolation,
    "Constraint violation on table '{table}': {details}.",
    { table: &str, details: &str }
);
