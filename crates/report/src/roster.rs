use std::collections::{BTreeMap, BTreeSet};

use crate::model::{CompanyRoster, OrderRow};

/// Separator between names in the roster input.
pub const ROSTER_INPUT_DELIMITER: char = ',';

/// Separator between names in `list_salesowners`.
pub const ROSTER_OUTPUT_SEPARATOR: &str = ", ";

/// One row per company: distinct sales owners across its orders, sorted.
///
/// Names are split on a bare comma and trimmed, so `"Alice,Bob"` and
/// `"Alice, Bob"` yield the same names. Orders without a company are skipped;
/// empty name fragments are dropped.
pub fn build_roster(orders: &[OrderRow]) -> Vec<CompanyRoster> {
    let mut companies: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();

    for order in orders {
        let Some(company_id) = order.company_id.as_deref() else {
            continue;
        };
        let names = companies.entry(company_id).or_default();
        if let Some(owners) = order.salesowners.as_deref() {
            names.extend(
                owners
                    .split(ROSTER_INPUT_DELIMITER)
                    .map(str::trim)
                    .filter(|n| !n.is_empty()),
            );
        }
    }

    companies
        .into_iter()
        .map(|(company_id, names)| CompanyRoster {
            company_id: company_id.to_string(),
            list_salesowners: names.into_iter().collect::<Vec<_>>().join(ROSTER_OUTPUT_SEPARATOR),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(company_id: Option<&str>, salesowners: Option<&str>) -> OrderRow {
        OrderRow {
            order_id: "o".into(),
            company_id: company_id.map(str::to_string),
            salesowners: salesowners.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn dedups_and_sorts_per_company() {
        let orders = vec![
            order(Some("c1"), Some("Alice,Bob")),
            order(Some("c1"), Some("Alice,Charlie")),
            order(Some("c2"), Some("David")),
            order(Some("c2"), Some("Eve,David")),
            order(Some("c3"), Some("Frank")),
        ];
        let roster = build_roster(&orders);
        assert_eq!(
            roster,
            vec![
                CompanyRoster { company_id: "c1".into(), list_salesowners: "Alice, Bob, Charlie".into() },
                CompanyRoster { company_id: "c2".into(), list_salesowners: "David, Eve".into() },
                CompanyRoster { company_id: "c3".into(), list_salesowners: "Frank".into() },
            ]
        );
    }

    #[test]
    fn accepts_comma_space_input() {
        let orders = vec![
            order(Some("c1"), Some("Leonard Cohen, Luke Skywalker")),
            order(Some("c1"), Some("Luke Skywalker,Ammy Winehouse")),
        ];
        let roster = build_roster(&orders);
        assert_eq!(roster[0].list_salesowners, "Ammy Winehouse, Leonard Cohen, Luke Skywalker");
    }

    #[test]
    fn skips_orders_without_company() {
        let orders = vec![order(None, Some("Alice")), order(Some("c1"), Some("Bob"))];
        let roster = build_roster(&orders);
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].list_salesowners, "Bob");
    }

    #[test]
    fn company_without_owners_has_empty_list() {
        let orders = vec![order(Some("c1"), None), order(Some("c1"), Some(""))];
        let roster = build_roster(&orders);
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].list_salesowners, "");
    }
}
