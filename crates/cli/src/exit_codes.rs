//! CLI Exit Code Registry
//!
//! Single source of truth for every `salesrecon` exit code. Scripts and
//! schedulers branch on these, so a code never changes meaning once shipped.
//!
//! | Code | Meaning                                              |
//! |------|------------------------------------------------------|
//! | 0    | Success                                              |
//! | 1    | General error (unspecified)                          |
//! | 2    | Usage error (bad args, config file not found)        |
//! | 3    | Report config does not parse or validate             |
//! | 4    | Orders or invoices could not be read or parsed       |
//! | 5    | An invoice amount is missing or not numeric          |
//! | 6    | A JSON or CSV output could not be written            |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant with the next free number
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Map it in [`report_exit_code`] if it comes from the engine

use salesrecon_report::ReportError;

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, config file missing or unreadable.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Report (3-9)
// =============================================================================

/// Config TOML failed to parse or validate.
pub const EXIT_INVALID_CONFIG: u8 = 3;

/// Input file unreadable, malformed CSV/JSON, missing column, wrong shape.
pub const EXIT_INPUT: u8 = 4;

/// Invoice amount absent, null, or not a finite number. No table is emitted.
pub const EXIT_AMOUNT: u8 = 5;

/// Cannot create or write an output file.
pub const EXIT_OUTPUT: u8 = 6;

/// Map an engine error to its exit code.
pub fn report_exit_code(err: &ReportError) -> u8 {
    match err {
        ReportError::ConfigParse(_) | ReportError::ConfigValidation(_) => EXIT_INVALID_CONFIG,
        ReportError::MissingColumn { .. }
        | ReportError::Csv(_)
        | ReportError::InvoiceJson(_)
        | ReportError::InvoiceShape(_) => EXIT_INPUT,
        ReportError::MissingAmount { .. } | ReportError::AmountParse { .. } => EXIT_AMOUNT,
    }
}
