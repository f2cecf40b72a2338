//! CSV export of the report tables, one file per table.
//!
//! Files are deterministic: fixed header, rows in engine order, `\n`
//! line endings. An empty table still gets its header row.

use std::path::{Path, PathBuf};

use serde::Serialize;

use salesrecon_report::ReportResult;

use crate::CliError;

pub const CRATE_COMPANY_CSV: &str = "crate_company.csv";
pub const CONTACT_FULLNAMES_CSV: &str = "contact_fullnames.csv";
pub const CONTACT_ADDRESSES_CSV: &str = "contact_addresses.csv";
pub const COMMISSIONS_CSV: &str = "commissions.csv";
pub const ROSTER_CSV: &str = "roster.csv";

/// Write all five tables into `out_dir`, creating it if needed.
/// Returns the paths written, in a fixed order.
pub fn write_tables(result: &ReportResult, out_dir: &Path) -> Result<Vec<PathBuf>, CliError> {
    std::fs::create_dir_all(out_dir)
        .map_err(|e| CliError::output(format!("cannot create {}: {e}", out_dir.display())))?;

    let mut written = Vec::with_capacity(5);
    let mut emit = |name: &str, bytes: Vec<u8>| -> Result<(), CliError> {
        let path = out_dir.join(name);
        std::fs::write(&path, &bytes)
            .map_err(|e| CliError::output(format!("cannot write {}: {e}", path.display())))?;
        log::debug!("wrote {} ({} bytes)", path.display(), bytes.len());
        written.push(path);
        Ok(())
    };

    let header = ["crate_type", "company_id", "order_id_count"];
    emit(CRATE_COMPANY_CSV, table_csv(&header, &result.crate_company)?)?;

    let header = ["order_id", "contact_fullname"];
    emit(CONTACT_FULLNAMES_CSV, table_csv(&header, &result.contact_fullnames)?)?;

    let header = ["order_id", "contact_address"];
    emit(CONTACT_ADDRESSES_CSV, table_csv(&header, &result.contact_addresses)?)?;

    let header = ["salesowner", "commission"];
    emit(COMMISSIONS_CSV, table_csv(&header, &result.commissions)?)?;

    let header = ["company_id", "list_salesowners"];
    emit(ROSTER_CSV, table_csv(&header, &result.roster)?)?;

    Ok(written)
}

/// Serialize one table. Absent values become empty cells.
pub fn table_csv<T: Serialize>(header: &[&str], rows: &[T]) -> Result<Vec<u8>, CliError> {
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    csv.write_record(header)
        .map_err(|e| CliError::output(format!("CSV write error: {e}")))?;
    for row in rows {
        csv.serialize(row)
            .map_err(|e| CliError::output(format!("CSV write error: {e}")))?;
    }

    csv.into_inner()
        .map_err(|e| CliError::output(format!("CSV write error: {e}")))
}
