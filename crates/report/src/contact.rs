//! Contact payload decoding.
//!
//! Every order carries its contact as encoded text: a list of contact
//! objects (first one wins) or a single object. Payloads are decoded with a
//! strict JSON parser; anything that does not decode to a reachable object
//! falls back to the defaults below. Nothing here returns an error.

use serde_json::{Map, Value};

use crate::model::{ContactAddress, ContactFullname, OrderRow};

pub const DEFAULT_FULLNAME: &str = "John Doe";
pub const DEFAULT_CITY: &str = "Unknown";
pub const DEFAULT_POSTAL_CODE: &str = "UNK00";
pub const DEFAULT_ADDRESS: &str = "Unknown, UNK00";

/// Rendered in place of a field that is absent or null.
pub const ABSENT_VALUE: &str = "None";

/// Decode a payload to its effective contact record.
///
/// Returns `None` for absent input, undecodable text, an empty list, a list
/// whose first element is not an object, or any non-container value.
pub fn decode_contact(contact_data: Option<&str>) -> Option<Map<String, Value>> {
    let raw = contact_data?;
    match serde_json::from_str::<Value>(raw).ok()? {
        Value::Array(items) => match items.into_iter().next()? {
            Value::Object(contact) => Some(contact),
            _ => None,
        },
        Value::Object(contact) => Some(contact),
        _ => None,
    }
}

/// `"{contact_name} {contact_surname}"`, or [`DEFAULT_FULLNAME`].
pub fn resolve_identity(contact_data: Option<&str>) -> String {
    let Some(contact) = decode_contact(contact_data) else {
        log::trace!("contact identity defaulted");
        return DEFAULT_FULLNAME.to_string();
    };

    let name = field_or(&contact, "contact_name", ABSENT_VALUE);
    let surname = field_or(&contact, "contact_surname", ABSENT_VALUE);
    format!("{name} {surname}")
}

/// `"{city}, {cp}"` with per-field defaults, or [`DEFAULT_ADDRESS`].
pub fn resolve_address(contact_data: Option<&str>) -> String {
    let Some(contact) = decode_contact(contact_data) else {
        log::trace!("contact address defaulted");
        return DEFAULT_ADDRESS.to_string();
    };

    let city = field_or(&contact, "city", DEFAULT_CITY);
    let cp = field_or(&contact, "cp", DEFAULT_POSTAL_CODE);
    format!("{city}, {cp}")
}

/// `(order_id, contact_fullname)` for every order, in input order.
pub fn contact_fullnames(orders: &[OrderRow]) -> Vec<ContactFullname> {
    orders
        .iter()
        .map(|o| ContactFullname {
            order_id: o.order_id.clone(),
            contact_fullname: resolve_identity(o.contact_data.as_deref()),
        })
        .collect()
}

/// `(order_id, contact_address)` for every order, in input order.
pub fn contact_addresses(orders: &[OrderRow]) -> Vec<ContactAddress> {
    orders
        .iter()
        .map(|o| ContactAddress {
            order_id: o.order_id.clone(),
            contact_address: resolve_address(o.contact_data.as_deref()),
        })
        .collect()
}

/// Number of orders whose payload has no reachable contact record.
pub fn count_defaulted(orders: &[OrderRow]) -> usize {
    orders
        .iter()
        .filter(|o| decode_contact(o.contact_data.as_deref()).is_none())
        .count()
}

/// Missing key -> `default`. Present key (even null) -> rendered value.
fn field_or(contact: &Map<String, Value>, key: &str, default: &str) -> String {
    contact
        .get(key)
        .map(render_value)
        .unwrap_or_else(|| default.to_string())
}

fn render_value(value: &Value) -> String {
    match value {
        Value::Null => ABSENT_VALUE.to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        nested => nested.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str =
        r#"[{"contact_name": "John", "contact_surname": "Smith", "city": "New York", "cp": "10001"}]"#;

    fn order(id: &str, contact_data: Option<&str>) -> OrderRow {
        OrderRow {
            order_id: id.into(),
            contact_data: contact_data.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn identity_from_list() {
        assert_eq!(resolve_identity(Some(FULL)), "John Smith");
    }

    #[test]
    fn identity_from_single_object() {
        let data = r#"{"contact_name": "Curtis", "contact_surname": "Jackson"}"#;
        assert_eq!(resolve_identity(Some(data)), "Curtis Jackson");
    }

    #[test]
    fn identity_defaults() {
        assert_eq!(resolve_identity(None), DEFAULT_FULLNAME);
        assert_eq!(resolve_identity(Some("[]")), DEFAULT_FULLNAME);
        assert_eq!(resolve_identity(Some("")), DEFAULT_FULLNAME);
        assert_eq!(resolve_identity(Some("[{\"contact_name\": ")), DEFAULT_FULLNAME);
        assert_eq!(resolve_identity(Some("42")), DEFAULT_FULLNAME);
        assert_eq!(resolve_identity(Some("\"John\"")), DEFAULT_FULLNAME);
        assert_eq!(resolve_identity(Some("[1, 2]")), DEFAULT_FULLNAME);
        assert_eq!(resolve_identity(Some("__import__('os')")), DEFAULT_FULLNAME);
    }

    #[test]
    fn identity_missing_surname_renders_absent_token() {
        let data = r#"[{"contact_name": "Jane"}]"#;
        assert_eq!(resolve_identity(Some(data)), "Jane None");

        let data = r#"[{"contact_name": "Jane", "contact_surname": null}]"#;
        assert_eq!(resolve_identity(Some(data)), "Jane None");
    }

    #[test]
    fn identity_uses_first_contact_only() {
        let data = r#"[{"contact_name": "A", "contact_surname": "One"},
                       {"contact_name": "B", "contact_surname": "Two"}]"#;
        assert_eq!(resolve_identity(Some(data)), "A One");
    }

    #[test]
    fn address_full_and_defaults() {
        assert_eq!(resolve_address(Some(FULL)), "New York, 10001");
        assert_eq!(resolve_address(None), DEFAULT_ADDRESS);
        assert_eq!(resolve_address(Some("[]")), DEFAULT_ADDRESS);
        assert_eq!(resolve_address(Some("{not json")), DEFAULT_ADDRESS);
    }

    #[test]
    fn address_defaults_per_field() {
        let data = r#"[{"contact_name": "Jane", "contact_surname": "Doe"}]"#;
        assert_eq!(resolve_address(Some(data)), "Unknown, UNK00");

        let data = r#"[{"city": "Chicago"}]"#;
        assert_eq!(resolve_address(Some(data)), "Chicago, UNK00");

        let data = r#"{"cp": "12345"}"#;
        assert_eq!(resolve_address(Some(data)), "Unknown, 12345");
    }

    #[test]
    fn address_numeric_postal_code() {
        let data = r#"[{"city": "Chicago", "cp": 3933}]"#;
        assert_eq!(resolve_address(Some(data)), "Chicago, 3933");
    }

    #[test]
    fn address_null_city_is_not_defaulted() {
        let data = r#"[{"city": null, "cp": "10001"}]"#;
        assert_eq!(resolve_address(Some(data)), "None, 10001");
    }

    #[test]
    fn fullname_table() {
        let orders = vec![order("1", Some(FULL)), order("2", Some("[]")), order("3", None)];
        let result = contact_fullnames(&orders);
        assert_eq!(result.len(), 3);
        assert_eq!(result[0].order_id, "1");
        assert_eq!(result[0].contact_fullname, "John Smith");
        assert_eq!(result[1].contact_fullname, "John Doe");
        assert_eq!(result[2].contact_fullname, "John Doe");
    }

    #[test]
    fn address_table() {
        let orders = vec![
            order("1", Some(r#"[{"contact_name": "John", "contact_surname": "Doe", "city": "New York", "cp": "10001"}]"#)),
            order("2", Some(r#"[{"contact_name": "Jane", "contact_surname": "Doe"}]"#)),
            order("3", None),
        ];
        let result = contact_addresses(&orders);
        assert_eq!(result[0].contact_address, "New York, 10001");
        assert_eq!(result[1].contact_address, "Unknown, UNK00");
        assert_eq!(result[2].contact_address, "Unknown, UNK00");
    }

    #[test]
    fn defaulted_count() {
        let orders = vec![
            order("1", Some(FULL)),
            order("2", Some("[]")),
            order("3", None),
            order("4", Some("{}")),
        ];
        // An empty object is still a reachable record.
        assert_eq!(count_defaulted(&orders), 2);
    }
}
