//! `salesrecon run` and `salesrecon validate`: config-driven sales report.

use std::path::{Path, PathBuf};

use clap::Subcommand;

use salesrecon_report::loader::{load_invoices, load_orders};
use salesrecon_report::{ReportConfig, ReportInput, ReportResult};

use crate::export;
use crate::util::{render_table, Align};
use crate::CliError;

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Run the report from a TOML config file
    #[command(after_help = "\
Examples:
  salesrecon run report.toml
  salesrecon run report.toml --json
  salesrecon run report.toml --output report.json --csv-dir out/
  salesrecon run report.toml --quiet -v")]
    Run {
        /// Path to the report .toml config file
        config: PathBuf,

        /// Print the JSON result to stdout
        #[arg(long)]
        json: bool,

        /// Write the JSON result to a file (overrides [output].json)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Write one CSV per table into this directory (overrides [output].csv_dir)
        #[arg(long)]
        csv_dir: Option<PathBuf>,

        /// Skip the human-readable tables on stderr
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Validate a report config without running
    #[command(after_help = "\
Examples:
  salesrecon validate report.toml")]
    Validate {
        /// Path to the report .toml config file
        config: PathBuf,
    },
}

pub fn cmd_report(cmd: ReportCommands) -> Result<(), CliError> {
    match cmd {
        ReportCommands::Run { config, json, output, csv_dir, quiet } => {
            cmd_report_run(config, json, output, csv_dir, quiet)
        }
        ReportCommands::Validate { config } => cmd_report_validate(config),
    }
}

/// Read and validate the config. Returns it with the directory its relative
/// paths resolve against.
fn read_config(config_path: &Path) -> Result<(ReportConfig, PathBuf), CliError> {
    let config_str = std::fs::read_to_string(config_path).map_err(|e| {
        CliError::args(format!("cannot read config {}: {e}", config_path.display()))
    })?;

    let config = ReportConfig::from_toml(&config_str).map_err(CliError::report)?;

    let base_dir = config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    Ok((config, base_dir))
}

fn read_input(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|e| {
        CliError::input(format!("cannot read {}: {e}", path.display()))
            .with_hint("input paths resolve relative to the config file's directory")
    })
}

fn load_input(config: &ReportConfig, base_dir: &Path) -> Result<ReportInput, CliError> {
    let orders_path = base_dir.join(&config.orders.file);
    let orders = load_orders(&read_input(&orders_path)?, &config.orders).map_err(CliError::report)?;

    let invoices_path = base_dir.join(&config.invoices.file);
    let invoices = load_invoices(&read_input(&invoices_path)?, &config.invoices).map_err(CliError::report)?;

    Ok(ReportInput { orders, invoices })
}

fn cmd_report_run(
    config_path: PathBuf,
    json_output: bool,
    output_file: Option<PathBuf>,
    csv_dir: Option<PathBuf>,
    quiet: bool,
) -> Result<(), CliError> {
    let (config, base_dir) = read_config(&config_path)?;
    let input = load_input(&config, &base_dir)?;

    // Engine
    let result = salesrecon_report::run(&config, &input).map_err(CliError::report)?;

    // Flags win over [output]; config paths resolve like the inputs do.
    let output_file = output_file.or_else(|| config.output.json.as_ref().map(|p| base_dir.join(p)));
    let csv_dir = csv_dir.or_else(|| config.output.csv_dir.as_ref().map(|p| base_dir.join(p)));

    let json_str = serde_json::to_string_pretty(&result)
        .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;

    if let Some(ref path) = output_file {
        std::fs::write(path, &json_str)
            .map_err(|e| CliError::output(format!("cannot write {}: {e}", path.display())))?;
        if !quiet {
            eprintln!("wrote {}", path.display());
        }
    }

    if let Some(ref dir) = csv_dir {
        let written = export::write_tables(&result, dir)?;
        if !quiet {
            eprintln!("wrote {} CSV file(s) to {}", written.len(), dir.display());
        }
    }

    if json_output {
        println!("{json_str}");
    }

    if !quiet {
        eprint!("{}", render_report(&result));
    }

    let s = &result.summary;
    log::info!(
        "report '{}': {} order(s), {} invoice(s) ({} joined), {} commissioned salesowner(s), total commission {:.2}",
        result.meta.report_name,
        s.orders,
        s.invoices,
        s.joined_rows,
        s.commissioned_salesowners,
        s.total_commission,
    );

    Ok(())
}

fn cmd_report_validate(config_path: PathBuf) -> Result<(), CliError> {
    let (config, _) = read_config(&config_path)?;
    eprintln!(
        "valid: report '{}' (orders: {}, invoices: {} at '{}', rounding: {})",
        config.name,
        config.orders.file,
        config.invoices.file,
        config.invoices.path,
        config.commission.rounding,
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Human output
// ---------------------------------------------------------------------------

/// The five tables followed by a one-line summary.
fn render_report(result: &ReportResult) -> String {
    let opt = |v: &Option<String>| v.clone().unwrap_or_default();

    let mut out = String::new();

    out.push_str("\nOrders per crate type and company\n");
    let rows: Vec<Vec<String>> = result
        .crate_company
        .iter()
        .map(|r| vec![opt(&r.crate_type), opt(&r.company_id), r.order_id_count.to_string()])
        .collect();
    out.push_str(&render_table(
        &[("crate_type", Align::Left), ("company_id", Align::Left), ("order_id_count", Align::Right)],
        &rows,
    ));

    out.push_str("\nContact full names\n");
    let rows: Vec<Vec<String>> = result
        .contact_fullnames
        .iter()
        .map(|r| vec![r.order_id.clone(), r.contact_fullname.clone()])
        .collect();
    out.push_str(&render_table(&[("order_id", Align::Left), ("contact_fullname", Align::Left)], &rows));

    out.push_str("\nContact addresses\n");
    let rows: Vec<Vec<String>> = result
        .contact_addresses
        .iter()
        .map(|r| vec![r.order_id.clone(), r.contact_address.clone()])
        .collect();
    out.push_str(&render_table(&[("order_id", Align::Left), ("contact_address", Align::Left)], &rows));

    out.push_str("\nSales commissions\n");
    let rows: Vec<Vec<String>> = result
        .commissions
        .iter()
        .map(|r| vec![r.salesowner.clone(), format!("{:.2}", r.commission)])
        .collect();
    out.push_str(&render_table(&[("salesowner", Align::Left), ("commission", Align::Right)], &rows));

    out.push_str("\nSales owners per company\n");
    let rows: Vec<Vec<String>> = result
        .roster
        .iter()
        .map(|r| vec![r.company_id.clone(), r.list_salesowners.clone()])
        .collect();
    out.push_str(&render_table(&[("company_id", Align::Left), ("list_salesowners", Align::Left)], &rows));

    let s = &result.summary;
    out.push_str(&format!(
        "\n{} orders, {} invoices: {} joined, {} orders without invoice, {} invoices without order; \
         {} contacts defaulted; {} salesowners earn {:.2} total\n",
        s.orders,
        s.invoices,
        s.joined_rows,
        s.orders_without_invoice,
        s.invoices_without_order,
        s.defaulted_contacts,
        s.commissioned_salesowners,
        s.total_commission,
    ));

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use salesrecon_report::model::{InvoiceRow, OrderRow};

    fn sample_result() -> ReportResult {
        let config = ReportConfig::from_toml(
            "name = \"t\"\n[orders]\nfile = \"o.csv\"\n[invoices]\nfile = \"i.json\"\n",
        )
        .unwrap();
        let input = ReportInput {
            orders: vec![OrderRow {
                order_id: "o1".into(),
                company_id: Some("c1".into()),
                crate_type: Some("Plastic".into()),
                salesowners: Some("Alice, Bob".into()),
                ..Default::default()
            }],
            invoices: vec![InvoiceRow {
                record_index: 0,
                order_id: "o1".into(),
                gross_value: Some("100000".into()),
                vat: Some("20000".into()),
                ..Default::default()
            }],
        };
        salesrecon_report::run(&config, &input).unwrap()
    }

    #[test]
    fn human_report_lists_every_table() {
        let text = render_report(&sample_result());
        for heading in [
            "Orders per crate type and company",
            "Contact full names",
            "Contact addresses",
            "Sales commissions",
            "Sales owners per company",
        ] {
            assert!(text.contains(heading), "missing heading {heading}");
        }
        assert!(text.contains("Alice"));
        assert!(text.contains("48.00"));
        assert!(text.contains("Unknown, UNK00"));
        assert!(text.contains("1 orders, 1 invoices: 1 joined"));
    }
}
