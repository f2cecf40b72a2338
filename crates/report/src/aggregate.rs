use std::collections::BTreeMap;

use crate::model::{CrateCompanyCount, OrderRow};

/// Group key = (crate_type, company_id). Absent values form their own group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CrateCompanyKey {
    pub crate_type: Option<String>,
    pub company_id: Option<String>,
}

/// Count orders per (crate_type, company_id).
///
/// Rows come out in key order, absent values first.
pub fn aggregate_crate_company(orders: &[OrderRow]) -> Vec<CrateCompanyCount> {
    let mut groups: BTreeMap<CrateCompanyKey, usize> = BTreeMap::new();

    for order in orders {
        let key = CrateCompanyKey {
            crate_type: order.crate_type.clone(),
            company_id: order.company_id.clone(),
        };
        *groups.entry(key).or_insert(0) += 1;
    }

    groups
        .into_iter()
        .map(|(key, count)| CrateCompanyCount {
            crate_type: key.crate_type,
            company_id: key.company_id,
            order_id_count: count,
        })
        .collect()
}
