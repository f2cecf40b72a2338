use crate::aggregate::aggregate_crate_company;
use crate::commission::commission_report;
use crate::config::ReportConfig;
use crate::contact::{contact_addresses, contact_fullnames, count_defaulted};
use crate::error::ReportError;
use crate::model::{ReportInput, ReportMeta, ReportResult, ReportSummary};
use crate::roster::build_roster;

/// Run every derivation over one input snapshot.
///
/// Fails only if an invoice amount cannot be coerced; in that case no table
/// is produced.
pub fn run(config: &ReportConfig, input: &ReportInput) -> Result<ReportResult, ReportError> {
    let rounding = config.commission.rounding;

    // Commissions first: the only derivation that can fail.
    let report = commission_report(&input.orders, &input.invoices, rounding)?;
    let commissions = report.ledger;

    let crate_company = aggregate_crate_company(&input.orders);
    let fullnames = contact_fullnames(&input.orders);
    let addresses = contact_addresses(&input.orders);
    let roster = build_roster(&input.orders);

    let summary = ReportSummary {
        orders: input.orders.len(),
        invoices: input.invoices.len(),
        joined_rows: report.joined_rows,
        orders_without_invoice: report.orders_without_invoice,
        invoices_without_order: report.invoices_without_order,
        defaulted_contacts: count_defaulted(&input.orders),
        companies: roster.len(),
        commissioned_salesowners: commissions.len(),
        total_commission: rounding.round_cents(commissions.iter().map(|r| r.commission).sum()),
    };

    log::info!(
        "report '{}': {} order(s), {} invoice(s), {} commission row(s)",
        config.name,
        summary.orders,
        summary.invoices,
        commissions.len()
    );

    Ok(ReportResult {
        meta: ReportMeta {
            report_name: config.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            rounding,
        },
        summary,
        crate_company,
        contact_fullnames: fullnames,
        contact_addresses: addresses,
        commissions,
        roster,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{load_invoices, load_orders};
    use crate::model::{InvoiceRow, OrderRow};

    fn config() -> ReportConfig {
        ReportConfig::from_toml(
            r#"
name = "Engine Test"
[orders]
file = "orders.csv"
[invoices]
file = "invoices.json"
"#,
        )
        .unwrap()
    }

    #[test]
    fn integration_end_to_end() {
        let orders_csv = "\
order_id;company_id;company_name;crate_type;contact_data;salesowners
o1;c1;Fresh Fruits Co;Plastic;\"[{\"\"contact_name\"\": \"\"Curtis\"\", \"\"contact_surname\"\": \"\"Jackson\"\", \"\"city\"\": \"\"Chicago\"\", \"\"cp\"\": \"\"12345\"\"}]\";Alice, Bob, Charlie
o2;c1;Fresh Fruits Co;Plastic;;Bob
o3;c2;Veggies Inc;Wood;not a payload;Dana, Alice
o4;;;Metal;\"{\"\"city\"\": \"\"Lyon\"\"}\";Eve
";
        let invoices_json = r#"{"data": {"invoices": [
            {"id": "i1", "orderId": "o1", "grossValue": "100000", "vat": "20000"},
            {"id": "i2", "orderId": "o3", "grossValue": "50000", "vat": "0"},
            {"id": "i3", "orderId": "o9", "grossValue": "1000", "vat": "0"}
        ]}}"#;

        let config = config();
        let input = ReportInput {
            orders: load_orders(orders_csv, &config.orders).unwrap(),
            invoices: load_invoices(invoices_json, &config.invoices).unwrap(),
        };

        let result = run(&config, &input).unwrap();
        assert_eq!(result.meta.report_name, "Engine Test");

        let s = &result.summary;
        assert_eq!(s.orders, 4);
        assert_eq!(s.invoices, 3);
        assert_eq!(s.joined_rows, 2);
        assert_eq!(s.orders_without_invoice, 2);
        assert_eq!(s.invoices_without_order, 1);
        assert_eq!(s.defaulted_contacts, 2);
        assert_eq!(s.companies, 2);
        assert_eq!(s.commissioned_salesowners, 4);

        // o1 net 800: Alice 48, Bob 20, Charlie 7.6. o3 net 500: Dana 30, Alice 12.5
        let ledger: Vec<(&str, f64)> =
            result.commissions.iter().map(|r| (r.salesowner.as_str(), r.commission)).collect();
        assert_eq!(
            ledger,
            vec![("Alice", 60.5), ("Dana", 30.0), ("Bob", 20.0), ("Charlie", 7.6)]
        );
        assert_eq!(s.total_commission, 118.1);

        assert_eq!(result.contact_fullnames[0].contact_fullname, "Curtis Jackson");
        assert_eq!(result.contact_fullnames[1].contact_fullname, "John Doe");
        assert_eq!(result.contact_addresses[0].contact_address, "Chicago, 12345");
        assert_eq!(result.contact_addresses[3].contact_address, "Lyon, UNK00");

        assert_eq!(result.roster[0].company_id, "c1");
        assert_eq!(result.roster[0].list_salesowners, "Alice, Bob, Charlie");
        assert_eq!(result.roster[1].list_salesowners, "Alice, Dana");

        assert_eq!(result.crate_company.len(), 3);
    }

    #[test]
    fn bad_amount_fails_whole_run() {
        let input = ReportInput {
            orders: vec![OrderRow { order_id: "o1".into(), ..Default::default() }],
            invoices: vec![InvoiceRow {
                record_index: 0,
                order_id: "o1".into(),
                gross_value: Some("ten".into()),
                vat: Some("0".into()),
                ..Default::default()
            }],
        };
        let err = run(&config(), &input).unwrap_err();
        assert!(matches!(err, ReportError::AmountParse { .. }));
    }

    #[test]
    fn empty_input_is_well_formed() {
        let result = run(&config(), &ReportInput::default()).unwrap();
        assert_eq!(result.summary.orders, 0);
        assert!(result.commissions.is_empty());
        assert!(result.roster.is_empty());
        assert_eq!(result.summary.total_commission, 0.0);
    }

    #[test]
    fn result_serializes_to_json() {
        let input = ReportInput {
            orders: vec![OrderRow {
                order_id: "o1".into(),
                company_id: Some("c1".into()),
                salesowners: Some("Alice".into()),
                ..Default::default()
            }],
            invoices: vec![InvoiceRow {
                record_index: 0,
                order_id: "o1".into(),
                gross_value: Some("10000".into()),
                vat: Some("0".into()),
                ..Default::default()
            }],
        };
        let result = run(&config(), &input).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["meta"]["rounding"], "half_even");
        assert_eq!(json["commissions"][0]["salesowner"], "Alice");
        assert_eq!(json["commissions"][0]["commission"], 6.0);
        assert_eq!(json["crate_company"][0]["crate_type"], serde_json::Value::Null);
        assert_eq!(json["roster"][0]["list_salesowners"], "Alice");
    }
}
