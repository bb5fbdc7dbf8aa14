// Crate-internal.
// ---

pub(crate) mod data {
    pub(crate) mod datasources {
        pub(crate) mod in_memory_store_datasource;
        pub(crate) mod store_datasource;
    }
    pub(crate) mod models {
        pub(crate) mod client_note_row_model;
        pub(crate) mod client_row_model;
        pub(crate) mod invoice_row_model;
    }
    pub(crate) mod repositories {
        pub(crate) mod client_repository_impl;
        pub(crate) mod invoice_repository_impl;
    }
}

pub(crate) mod domain {
    pub(crate) mod entities {
        pub(crate) mod client;
        pub(crate) mod context;
        pub(crate) mod ids;
        pub(crate) mod invoice;
        pub(crate) mod invoice_stats;
        pub(crate) mod note;
        pub(crate) mod tax;
    }
    pub(crate) mod logic {
        pub(crate) mod clock;
        pub(crate) mod invoice_validator;
        pub(crate) mod line_item_aggregator;
        pub(crate) mod note_journal_codec;
        pub(crate) mod saga;
        pub(crate) mod stats_calculator;
        pub(crate) mod tax_engine;
    }
    pub(crate) mod repositories {
        pub(crate) mod client_repository;
        pub(crate) mod invoice_repository;
    }
    pub(crate) mod usecases {
        pub(crate) mod client_usecase;
        pub(crate) mod invoice_usecase;
    }
}

pub(crate) mod presentation {
    pub(crate) mod currency_fmt;
}

// Public exports.
// ---

#[doc(hidden)]
#[allow(unused_imports)]
pub mod exports {
    // This mod represents how clients see the library, and can differ from the
    // internal structure.
    //
    // The contents of this mod are re-exported in the root of the crate.

    pub mod entities {
        pub use crate::domain::entities::client::*;
        pub use crate::domain::entities::context::*;
        pub use crate::domain::entities::ids::*;
        pub use crate::domain::entities::invoice::*;
        pub use crate::domain::entities::invoice_stats::*;
        pub use crate::domain::entities::note::*;
        pub use crate::domain::entities::tax::*;
    }

    pub mod billing {
        pub use crate::domain::logic::line_item_aggregator::*;
        pub use crate::domain::logic::stats_calculator::summarize_invoices;
        pub use crate::domain::logic::tax_engine::*;
        pub use crate::presentation::currency_fmt::*;
    }

    pub mod notes {
        pub use crate::domain::logic::note_journal_codec::*;
    }

    pub mod clock {
        pub use crate::domain::logic::clock::*;
    }

    pub mod repositories {
        pub use crate::data::repositories::client_repository_impl::ClientRepositoryImpl;
        pub use crate::data::repositories::invoice_repository_impl::InvoiceRepositoryImpl;
        pub use crate::domain::repositories::client_repository::*;
        pub use crate::domain::repositories::invoice_repository::*;
    }

    pub mod datasources {
        pub use crate::data::datasources::in_memory_store_datasource::InMemoryStoreDatasource;
        pub use crate::data::datasources::store_datasource::*;
        pub use crate::data::models::client_note_row_model::*;
        pub use crate::data::models::client_row_model::*;
        pub use crate::data::models::invoice_row_model::*;
    }

    pub mod usecases {
        pub use crate::domain::usecases::client_usecase::*;
        pub use crate::domain::usecases::invoice_usecase::*;
    }
}
