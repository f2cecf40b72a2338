use serde::{Deserialize, Serialize};

use crate::error::ReportError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    pub name: String,
    pub orders: OrdersConfig,
    pub invoices: InvoicesConfig,
    #[serde(default)]
    pub commission: CommissionConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

/// Delimiter value that asks the loader to detect the separator.
pub const AUTO_DELIMITER: &str = "auto";

#[derive(Debug, Clone, Deserialize)]
pub struct OrdersConfig {
    pub file: String,
    /// Single ASCII character, or `"auto"`.
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    #[serde(default)]
    pub columns: OrderColumns,
}

impl Default for OrdersConfig {
    fn default() -> Self {
        Self {
            file: String::new(),
            delimiter: default_delimiter(),
            columns: OrderColumns::default(),
        }
    }
}

impl OrdersConfig {
    /// The configured delimiter byte, or `None` when it should be sniffed.
    pub fn delimiter_byte(&self) -> Option<u8> {
        if self.delimiter == AUTO_DELIMITER {
            return None;
        }
        self.delimiter.bytes().next()
    }
}

fn default_delimiter() -> String {
    ";".into()
}

/// Header names in the orders file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OrderColumns {
    pub order_id: String,
    pub crate_type: String,
    pub company_id: String,
    /// Optional column; loaded when present.
    pub company_name: String,
    pub contact_data: String,
    pub salesowners: String,
}

impl Default for OrderColumns {
    fn default() -> Self {
        Self {
            order_id: "order_id".into(),
            crate_type: "crate_type".into(),
            company_id: "company_id".into(),
            company_name: "company_name".into(),
            contact_data: "contact_data".into(),
            salesowners: "salesowners".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Invoices
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct InvoicesConfig {
    pub file: String,
    /// Dotted path to the invoice array inside the document.
    #[serde(default = "default_invoice_path")]
    pub path: String,
    #[serde(default)]
    pub fields: InvoiceFields,
}

impl Default for InvoicesConfig {
    fn default() -> Self {
        Self {
            file: String::new(),
            path: default_invoice_path(),
            fields: InvoiceFields::default(),
        }
    }
}

fn default_invoice_path() -> String {
    "data.invoices".into()
}

/// Key names inside each invoice object.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InvoiceFields {
    pub invoice_id: String,
    pub order_id: String,
    pub company_id: String,
    pub gross_value: String,
    pub vat: String,
}

impl Default for InvoiceFields {
    fn default() -> Self {
        Self {
            invoice_id: "id".into(),
            order_id: "orderId".into(),
            company_id: "companyId".into(),
            gross_value: "grossValue".into(),
            vat: "vat".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Commission + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommissionConfig {
    #[serde(default)]
    pub rounding: RoundingMode,
}

/// How per-owner totals are rounded to cents.
///
/// Both modes scale by 100, round to an integer, and scale back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// Ties to the even cent.
    #[default]
    HalfEven,
    /// Ties away from zero.
    HalfUp,
}

impl RoundingMode {
    pub fn round_cents(self, value: f64) -> f64 {
        let scaled = value * 100.0;
        let rounded = match self {
            Self::HalfEven => scaled.round_ties_even(),
            Self::HalfUp => scaled.round(),
        };
        rounded / 100.0
    }
}

impl std::fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HalfEven => write!(f, "half_even"),
            Self::HalfUp => write!(f, "half_up"),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub json: Option<String>,
    #[serde(default)]
    pub csv_dir: Option<String>,
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReportConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReportError> {
        let config: ReportConfig =
            toml::from_str(input).map_err(|e| ReportError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReportError> {
        if self.name.trim().is_empty() {
            return Err(ReportError::ConfigValidation("name must not be empty".into()));
        }

        if self.orders.file.trim().is_empty() {
            return Err(ReportError::ConfigValidation("orders.file must not be empty".into()));
        }

        if self.invoices.file.trim().is_empty() {
            return Err(ReportError::ConfigValidation("invoices.file must not be empty".into()));
        }

        let delim = &self.orders.delimiter;
        if delim != AUTO_DELIMITER && !(delim.len() == 1 && delim.is_ascii()) {
            return Err(ReportError::ConfigValidation(format!(
                "orders.delimiter must be a single ASCII character or \"auto\", got \"{delim}\""
            )));
        }

        if self.invoices.path.split('.').any(|segment| segment.is_empty()) {
            return Err(ReportError::ConfigValidation(format!(
                "invoices.path has an empty segment: \"{}\"",
                self.invoices.path
            )));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
