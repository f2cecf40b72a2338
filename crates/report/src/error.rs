use std::fmt;

use thiserror::Error;

/// Identifies one invoice inside the invoicing document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceRef {
    /// Position in the flattened invoice list.
    pub index: usize,
    pub invoice_id: Option<String>,
    pub order_id: String,
}

impl fmt::Display for InvoiceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invoice #{}", self.index)?;
        if let Some(ref id) = self.invoice_id {
            write!(f, " ('{id}')")?;
        }
        write!(f, " for order '{}'", self.order_id)
    }
}

#[derive(Debug, Error)]
pub enum ReportError {
    /// TOML parse / deserialization error.
    #[error("config parse error: {0}")]
    ConfigParse(String),
    /// Config validation error (empty name, bad delimiter, etc.).
    #[error("config validation error: {0}")]
    ConfigValidation(String),
    /// Missing required column in the orders header.
    #[error("orders: missing column '{column}'")]
    MissingColumn { column: String },
    /// Malformed orders CSV.
    #[error("orders: CSV error: {0}")]
    Csv(String),
    /// Invoicing document is not valid JSON.
    #[error("invoices: JSON error: {0}")]
    InvoiceJson(String),
    /// Invoicing document has the wrong shape (path missing, not an array, ...).
    #[error("invoices: {0}")]
    InvoiceShape(String),
    /// Monetary field absent or null.
    #[error("{invoice}: missing amount field '{field}'")]
    MissingAmount { invoice: InvoiceRef, field: String },
    /// Monetary field present but not a finite number.
    #[error("{invoice}: cannot parse amount field '{field}' value '{value}'")]
    AmountParse { invoice: InvoiceRef, field: String, value: String },
}

impl From<csv::Error> for ReportError {
    fn from(e: csv::Error) -> Self {
        Self::Csv(e.to_string())
    }
}
