//! Tiered sales commissions.
//!
//! Each invoice's net value is split across the sales owners of its order by
//! position: the main owner, then up to two co-owners. Owners past the last
//! tier earn nothing. Totals are summed per owner across every invoice and
//! rounded once, after aggregation.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;

use crate::config::RoundingMode;
use crate::error::{InvoiceRef, ReportError};
use crate::model::{CommissionRow, InvoiceNetValue, InvoiceRow, OrderRow};

/// Separator between names in an order's `salesowners`.
pub const SALESOWNER_DELIMITER: &str = ", ";

pub const GROSS_VALUE_FIELD: &str = "grossValue";
pub const VAT_FIELD: &str = "vat";

/// Commission rate for one owner position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CommissionTier {
    pub position: usize,
    pub label: &'static str,
    pub rate: f64,
}

/// Position 0 = main owner, 1 = first co-owner, 2 = second co-owner.
pub const COMMISSION_TIERS: [CommissionTier; 3] = [
    CommissionTier { position: 0, label: "main_owner", rate: 0.06 },
    CommissionTier { position: 1, label: "co_owner_1", rate: 0.025 },
    CommissionTier { position: 2, label: "co_owner_2", rate: 0.0095 },
];

/// One owner's unrounded share of one invoice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommissionEntry {
    pub salesowner: String,
    pub order_id: String,
    pub invoice_index: usize,
    pub tier: CommissionTier,
    pub commission: f64,
}

/// An order paired with one of its invoices.
#[derive(Debug, Clone, Copy)]
pub struct JoinedRow<'a> {
    pub order: &'a OrderRow,
    pub invoice: &'a InvoiceNetValue,
}

#[derive(Debug)]
pub struct JoinOutput<'a> {
    pub rows: Vec<JoinedRow<'a>>,
    pub orders_without_invoice: usize,
    pub invoices_without_order: usize,
}

// ---------------------------------------------------------------------------
// Net value
// ---------------------------------------------------------------------------

/// Coerce one raw amount. Absent, non-numeric and non-finite values fail.
pub fn coerce_amount(invoice: &InvoiceRow, field: &str, raw: Option<&str>) -> Result<f64, ReportError> {
    let invoice_ref = || InvoiceRef {
        index: invoice.record_index,
        invoice_id: invoice.invoice_id.clone(),
        order_id: invoice.order_id.clone(),
    };

    let raw = raw.ok_or_else(|| ReportError::MissingAmount {
        invoice: invoice_ref(),
        field: field.into(),
    })?;

    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ReportError::AmountParse {
            invoice: invoice_ref(),
            field: field.into(),
            value: raw.into(),
        }),
    }
}

/// `(grossValue - vat) / 100` for every invoice. Fails on the first bad amount.
pub fn net_values(invoices: &[InvoiceRow]) -> Result<Vec<InvoiceNetValue>, ReportError> {
    invoices
        .iter()
        .map(|inv| {
            let gross = coerce_amount(inv, GROSS_VALUE_FIELD, inv.gross_value.as_deref())?;
            let vat = coerce_amount(inv, VAT_FIELD, inv.vat.as_deref())?;
            Ok(InvoiceNetValue {
                record_index: inv.record_index,
                order_id: inv.order_id.clone(),
                net_value_euros: (gross - vat) / 100.0,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Join
// ---------------------------------------------------------------------------

/// Inner join on `order_id`, in order sequence. An order with several
/// invoices yields one row per invoice.
pub fn join_orders<'a>(orders: &'a [OrderRow], invoices: &'a [InvoiceNetValue]) -> JoinOutput<'a> {
    let mut by_order: HashMap<&str, Vec<&InvoiceNetValue>> = HashMap::new();
    for inv in invoices {
        by_order.entry(inv.order_id.as_str()).or_default().push(inv);
    }

    let mut rows = Vec::new();
    let mut orders_without_invoice = 0;
    for order in orders {
        match by_order.get(order.order_id.as_str()) {
            Some(matched) => rows.extend(matched.iter().map(|inv| JoinedRow { order, invoice: *inv })),
            None => orders_without_invoice += 1,
        }
    }

    let order_ids: HashSet<&str> =
        orders.iter().map(|o| o.order_id.as_str()).collect();
    let invoices_without_order = invoices
        .iter()
        .filter(|inv| !order_ids.contains(inv.order_id.as_str()))
        .count();

    log::debug!(
        "joined {} row(s); {} order(s) without invoice, {} invoice(s) without order",
        rows.len(),
        orders_without_invoice,
        invoices_without_order
    );

    JoinOutput { rows, orders_without_invoice, invoices_without_order }
}

// ---------------------------------------------------------------------------
// Tiering + Aggregation
// ---------------------------------------------------------------------------

/// Split an order's owners in commission order. Every fragment keeps its
/// position, empty ones included.
pub fn split_salesowners(salesowners: &str) -> Vec<&str> {
    salesowners.split(SALESOWNER_DELIMITER).collect()
}

/// Per-position entries for every joined row.
pub fn commission_entries(rows: &[JoinedRow<'_>]) -> Vec<CommissionEntry> {
    let mut entries = Vec::new();

    for row in rows {
        let Some(owners) = row.order.salesowners.as_deref() else {
            continue;
        };
        let owners = split_salesowners(owners);
        if owners.len() > COMMISSION_TIERS.len() {
            log::debug!(
                "order '{}': {} owner(s) beyond the last commission tier earn nothing",
                row.order.order_id,
                owners.len() - COMMISSION_TIERS.len()
            );
        }

        // An empty fragment holds its tier but earns nothing.
        for (name, tier) in owners
            .into_iter()
            .zip(COMMISSION_TIERS)
            .filter(|(name, _)| !name.trim().is_empty())
        {
            entries.push(CommissionEntry {
                salesowner: name.to_string(),
                order_id: row.order.order_id.clone(),
                invoice_index: row.invoice.record_index,
                tier,
                commission: row.invoice.net_value_euros * tier.rate,
            });
        }
    }

    entries
}

/// Sum per owner, round, sort descending. Ties keep owner-name order.
pub fn commission_ledger(entries: &[CommissionEntry], rounding: RoundingMode) -> Vec<CommissionRow> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for entry in entries {
        *totals.entry(entry.salesowner.as_str()).or_insert(0.0) += entry.commission;
    }

    let mut ledger: Vec<CommissionRow> = totals
        .into_iter()
        .map(|(name, total)| CommissionRow {
            salesowner: name.to_string(),
            commission: rounding.round_cents(total),
        })
        .collect();

    ledger.sort_by(|a, b| b.commission.total_cmp(&a.commission));
    ledger
}

/// Full commission pipeline with the default rounding mode.
pub fn compute_commissions(
    orders: &[OrderRow],
    invoices: &[InvoiceRow],
) -> Result<Vec<CommissionRow>, ReportError> {
    compute_commissions_with(orders, invoices, RoundingMode::default())
}

pub fn compute_commissions_with(
    orders: &[OrderRow],
    invoices: &[InvoiceRow],
    rounding: RoundingMode,
) -> Result<Vec<CommissionRow>, ReportError> {
    Ok(commission_report(orders, invoices, rounding)?.ledger)
}

/// The ledger together with the join counts it was computed from.
#[derive(Debug, Clone, PartialEq)]
pub struct CommissionReport {
    pub ledger: Vec<CommissionRow>,
    pub joined_rows: usize,
    pub orders_without_invoice: usize,
    pub invoices_without_order: usize,
}

/// Coerce, join, tier and aggregate in one pass.
pub fn commission_report(
    orders: &[OrderRow],
    invoices: &[InvoiceRow],
    rounding: RoundingMode,
) -> Result<CommissionReport, ReportError> {
    let net = net_values(invoices)?;
    let joined = join_orders(orders, &net);
    let entries = commission_entries(&joined.rows);
    Ok(CommissionReport {
        ledger: commission_ledger(&entries, rounding),
        joined_rows: joined.rows.len(),
        orders_without_invoice: joined.orders_without_invoice,
        invoices_without_order: joined.invoices_without_order,
    })
}
