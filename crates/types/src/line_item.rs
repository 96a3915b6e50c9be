use serde::{Deserialize, Deserializer, Serialize};

/// One row of a quotation as entered by the operator.
///
/// Numeric fields never fail to load: anything that is not a usable non-negative
/// number coerces to `0`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub quantity: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub unit_price: f64,
}

impl LineItem {
    pub fn new(description: impl Into<String>, quantity: f64, unit_price: f64) -> Self {
        Self {
            description: description.into(),
            quantity: sanitize(quantity),
            unit_price: sanitize(unit_price),
        }
    }

    /// Builds an item from raw form/table cells, coercing the numeric columns.
    pub fn from_text_fields(description: &str, quantity: &str, unit_price: &str) -> Self {
        Self {
            description: description.to_string(),
            quantity: coerce_number(quantity),
            unit_price: coerce_number(unit_price),
        }
    }

    pub fn line_total(&self) -> f64 {
        self.quantity * self.unit_price
    }

    /// A row the operator left untouched: blank description and both amounts zero.
    pub fn is_empty(&self) -> bool {
        self.description.trim().is_empty() && self.quantity == 0.0 && self.unit_price == 0.0
    }
}

/// Coerces free text to a non-negative amount.
///
/// Surrounding whitespace and `,` thousands separators are ignored. Text that does not
/// parse, negative values and non-finite values all become `0.0`.
pub fn coerce_number(raw: &str) -> f64 {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    cleaned.parse::<f64>().map(sanitize).unwrap_or(0.0)
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 { value } else { 0.0 }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCell {
    Number(f64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawCell::deserialize(deserializer)? {
        RawCell::Number(n) => sanitize(n),
        RawCell::Text(s) => coerce_number(&s),
        RawCell::Other(_) => 0.0,
    })
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawCell::deserialize(deserializer)? {
        RawCell::Text(s) => s,
        RawCell::Number(n) => n.to_string(),
        RawCell::Other(_) => String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_total() {
        let item = LineItem::new("Widget", 3.0, 12.5);
        assert_eq!(item.line_total(), 37.5);
    }

    #[test]
    fn test_empty_requires_all_three_fields_blank() {
        assert!(LineItem::new("   ", 0.0, 0.0).is_empty());
        assert!(!LineItem::new("Free sample", 0.0, 0.0).is_empty());
        assert!(!LineItem::new("", 1.0, 0.0).is_empty());
        assert!(!LineItem::new("", 0.0, 5.0).is_empty());
    }

    #[test]
    fn test_coerce_number() {
        assert_eq!(coerce_number("1,500"), 1500.0);
        assert_eq!(coerce_number("  2.5 "), 2.5);
        assert_eq!(coerce_number("abc"), 0.0);
        assert_eq!(coerce_number(""), 0.0);
        assert_eq!(coerce_number("-3"), 0.0);
        assert_eq!(coerce_number("NaN"), 0.0);
        assert_eq!(coerce_number("inf"), 0.0);
    }

    #[test]
    fn test_from_text_fields() {
        let item = LineItem::from_text_fields("Cable", "2", "x");
        assert_eq!(item.quantity, 2.0);
        assert_eq!(item.unit_price, 0.0);
    }

    #[test]
    fn test_lenient_deserialization() {
        let json = r#"[
            {"description": "A", "quantity": "2", "unit_price": 1500},
            {"description": null, "quantity": true, "unit_price": "oops"},
            {"description": 42}
        ]"#;
        let items: Vec<LineItem> = serde_json::from_str(json).unwrap();
        assert_eq!(items[0], LineItem::new("A", 2.0, 1500.0));
        assert_eq!(items[1], LineItem::new("", 0.0, 0.0));
        assert!(items[1].is_empty());
        assert_eq!(items[2].description, "42");
        assert_eq!(items[2].quantity, 0.0);
    }

    #[test]
    fn test_negative_constructor_input_clamps_to_zero() {
        let item = LineItem::new("Refund", -1.0, 10.0);
        assert_eq!(item.quantity, 0.0);
    }
}
