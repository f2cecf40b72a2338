//! `salesrecon-report`: order/invoice reconciliation and commission engine.
//!
//! Pure engine crate: receives pre-loaded orders and invoices, returns report
//! tables. No CLI or file IO; loaders take already-read text.

pub mod aggregate;
pub mod commission;
pub mod config;
pub mod contact;
pub mod engine;
pub mod error;
pub mod loader;
pub mod model;
pub mod roster;

pub use config::ReportConfig;
pub use engine::run;
pub use error::ReportError;
pub use model::{InvoiceRow, OrderRow, ReportInput, ReportResult};
