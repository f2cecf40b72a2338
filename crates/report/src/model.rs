use serde::Serialize;

use crate::config::RoundingMode;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A single order from the orders table. Empty cells are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderRow {
    pub order_id: String,
    pub crate_type: Option<String>,
    pub company_id: Option<String>,
    pub company_name: Option<String>,
    /// Raw contact payload, still encoded.
    pub contact_data: Option<String>,
    pub salesowners: Option<String>,
}

/// A single invoice flattened from the invoicing document.
///
/// Amounts stay as raw text until the commission engine coerces them, so a
/// bad value can be reported against the invoice it came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvoiceRow {
    /// Position in the invoice list.
    pub record_index: usize,
    pub invoice_id: Option<String>,
    pub order_id: String,
    pub company_id: Option<String>,
    /// Minor units (cents).
    pub gross_value: Option<String>,
    /// Minor units (cents).
    pub vat: Option<String>,
}

/// Pre-loaded orders and invoices for one run.
#[derive(Debug, Clone, Default)]
pub struct ReportInput {
    pub orders: Vec<OrderRow>,
    pub invoices: Vec<InvoiceRow>,
}

// ---------------------------------------------------------------------------
// Output tables
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrateCompanyCount {
    pub crate_type: Option<String>,
    pub company_id: Option<String>,
    pub order_id_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactFullname {
    pub order_id: String,
    pub contact_fullname: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactAddress {
    pub order_id: String,
    pub contact_address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommissionRow {
    pub salesowner: String,
    pub commission: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompanyRoster {
    pub company_id: String,
    pub list_salesowners: String,
}

/// Net value of one invoice in major units.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceNetValue {
    pub record_index: usize,
    pub order_id: String,
    pub net_value_euros: f64,
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub orders: usize,
    pub invoices: usize,
    pub joined_rows: usize,
    pub orders_without_invoice: usize,
    pub invoices_without_order: usize,
    pub defaulted_contacts: usize,
    pub companies: usize,
    /// Owners with a commission row, not every owner named on an order.
    pub commissioned_salesowners: usize,
    pub total_commission: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportMeta {
    pub report_name: String,
    pub engine_version: String,
    pub run_at: String,
    pub rounding: RoundingMode,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportResult {
    pub meta: ReportMeta,
    pub summary: ReportSummary,
    pub crate_company: Vec<CrateCompanyCount>,
    pub contact_fullnames: Vec<ContactFullname>,
    pub contact_addresses: Vec<ContactAddress>,
    pub commissions: Vec<CommissionRow>,
    pub roster: Vec<CompanyRoster>,
}
