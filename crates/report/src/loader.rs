//! Row loaders for the two input sources.
//!
//! Both take already-read text so the engine never touches the filesystem.

use serde_json::Value;

use crate::config::{InvoicesConfig, OrdersConfig};
use crate::error::ReportError;
use crate::model::{InvoiceRow, OrderRow};

// ---------------------------------------------------------------------------
// Orders (CSV)
// ---------------------------------------------------------------------------

/// Load order rows, applying the column mapping. Empty cells become `None`.
pub fn load_orders(csv_data: &str, config: &OrdersConfig) -> Result<Vec<OrderRow>, ReportError> {
    let delimiter = config
        .delimiter_byte()
        .unwrap_or_else(|| sniff_delimiter(csv_data));

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_reader(csv_data.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let col = &config.columns;

    let idx = |name: &str| -> Result<usize, ReportError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ReportError::MissingColumn { column: name.into() })
    };

    let order_id_idx = idx(&col.order_id)?;
    let crate_type_idx = idx(&col.crate_type)?;
    let company_id_idx = idx(&col.company_id)?;
    let contact_data_idx = idx(&col.contact_data)?;
    let salesowners_idx = idx(&col.salesowners)?;
    let company_name_idx = headers.iter().position(|h| h == &col.company_name);

    let mut rows = Vec::new();

    for record in reader.records() {
        let record = record?;
        let cell = |i: usize| -> Option<String> {
            record
                .get(i)
                .filter(|v| !v.trim().is_empty())
                .map(str::to_string)
        };

        rows.push(OrderRow {
            order_id: record.get(order_id_idx).unwrap_or("").trim().to_string(),
            crate_type: cell(crate_type_idx),
            company_id: cell(company_id_idx),
            company_name: company_name_idx.and_then(cell),
            contact_data: cell(contact_data_idx),
            salesowners: cell(salesowners_idx),
        });
    }

    log::info!(
        "loaded {} order(s) (delimiter {:?})",
        rows.len(),
        delimiter as char
    );
    Ok(rows)
}

/// Detect the most likely field delimiter from the first few lines.
///
/// Each candidate is scored by how many lines share the first line's field
/// count, weighted by that count. Falls back to `;`.
pub fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b';', b'\t', b',', b'|'];
    let sample_lines: Vec<&str> = content.lines().take(10).collect();

    let mut best = b';';
    let mut best_score = 0u64;

    for &delim in candidates {
        let counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| {
                csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        let Some(&target) = counts.first() else {
            continue;
        };
        if target <= 1 {
            continue;
        }

        let consistent = counts.iter().filter(|&&c| c == target).count() as u64;
        let score = consistent * target as u64;

        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

// ---------------------------------------------------------------------------
// Invoices (JSON)
// ---------------------------------------------------------------------------

/// Parse the invoicing document and flatten the invoice list.
pub fn load_invoices(json_data: &str, config: &InvoicesConfig) -> Result<Vec<InvoiceRow>, ReportError> {
    let doc: Value =
        serde_json::from_str(json_data).map_err(|e| ReportError::InvoiceJson(e.to_string()))?;
    let rows = flatten_invoices(&doc, config)?;
    log::info!("loaded {} invoice(s) from '{}'", rows.len(), config.path);
    Ok(rows)
}

/// Walk `config.path` to the invoice array and flatten each object.
pub fn flatten_invoices(doc: &Value, config: &InvoicesConfig) -> Result<Vec<InvoiceRow>, ReportError> {
    let path = &config.path;
    let mut node = doc;
    for segment in path.split('.') {
        node = node.get(segment).ok_or_else(|| {
            ReportError::InvoiceShape(format!("path '{path}' not found (no key '{segment}')"))
        })?;
    }

    let items = node
        .as_array()
        .ok_or_else(|| ReportError::InvoiceShape(format!("'{path}' is not an array")))?;

    let f = &config.fields;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let obj = item.as_object().ok_or_else(|| {
                ReportError::InvoiceShape(format!("element #{index} of '{path}' is not an object"))
            })?;

            // Trimmed like the orders-side key so the join sees the same text.
            let order_id = obj
                .get(&f.order_id)
                .and_then(key_text)
                .map(|id| id.trim().to_string())
                .ok_or_else(|| {
                    ReportError::InvoiceShape(format!("invoice #{index}: missing key '{}'", f.order_id))
                })?;

            Ok(InvoiceRow {
                record_index: index,
                invoice_id: obj.get(&f.invoice_id).and_then(key_text),
                order_id,
                company_id: obj.get(&f.company_id).and_then(key_text),
                gross_value: obj.get(&f.gross_value).and_then(amount_text),
                vat: obj.get(&f.vat).and_then(amount_text),
            })
        })
        .collect()
}

/// Identifier text: strings and numbers only.
fn key_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Amount text for later coercion. Null counts as absent; anything else is
/// kept so a bad value shows up in the coercion error.
fn amount_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
