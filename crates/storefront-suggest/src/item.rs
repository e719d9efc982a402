//! Normalised suggestion entries.
//!
//! Listing records in the index were written by several generations of the
//! seller tools and disagree on field names (`objectID` vs `_id`, `name` vs
//! `title`, `image` vs `images[0].url`). Everything the dropdown renders goes
//! through [`to_suggestion_item`] first.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use storefront_search::money::parse_amount;
use storefront_search::Currency;

const ID_FIELDS: &[&str] = &["objectID", "id", "_id", "productId"];
const NAME_FIELDS: &[&str] = &["name", "title", "productName"];
const PRICE_FIELDS: &[&str] = &["price", "salePrice", "amount"];
const IMAGE_FIELDS: &[&str] = &["image", "imageUrl", "thumbnail", "images"];
const CATEGORY_FIELDS: &[&str] = &["category", "categoryName"];

/// A product suggestion in the shape the dropdown renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionItem {
    pub id: String,
    pub name: String,
    /// Price in whole currency units.
    pub price: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl SuggestionItem {
    /// Price label, e.g. "₦12,500".
    pub fn display_price(&self, currency: Currency) -> String {
        currency.display(self.price)
    }
}

/// Normalise a raw index hit. Returns `None` for hits without an id or name.
pub fn to_suggestion_item(raw: &Value) -> Option<SuggestionItem> {
    let record = raw.as_object()?;

    let id = first(record, ID_FIELDS, as_id)?;
    let name = first(record, NAME_FIELDS, as_text)?;
    let price = first(record, PRICE_FIELDS, as_price).unwrap_or(0);
    let image = first(record, IMAGE_FIELDS, as_image);
    let category = first(record, CATEGORY_FIELDS, as_named);

    Some(SuggestionItem {
        id,
        name,
        price,
        image,
        category,
    })
}

fn first<T>(record: &Map<String, Value>, fields: &[&str], read: fn(&Value) -> Option<T>) -> Option<T> {
    fields
        .iter()
        .filter_map(|field| record.get(*field))
        .find_map(read)
}

fn as_text(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn as_id(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        other => as_text(other),
    }
}

fn as_price(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .filter(|p| p.is_finite() && *p >= 0.0)
            .map(|p| p.round() as u64),
        Value::String(s) => parse_amount(s),
        _ => None,
    }
}

/// A string, or an object carrying `name`.
fn as_named(value: &Value) -> Option<String> {
    match value {
        Value::Object(map) => map.get("name").and_then(as_text),
        other => as_text(other),
    }
}

/// A URL string, an object carrying `url`, or the first usable array entry.
fn as_image(value: &Value) -> Option<String> {
    match value {
        Value::Array(items) => items.iter().find_map(as_image),
        Value::Object(map) => map.get("url").and_then(as_text),
        other => as_text(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_index_record_shape() {
        let item = to_suggestion_item(&json!({
            "objectID": "p-17",
            "name": "Rechargeable Lamp",
            "price": 8500,
            "image": "https://cdn.test/lamp.jpg",
            "category": "Electronics"
        }))
        .unwrap();

        assert_eq!(
            item,
            SuggestionItem {
                id: "p-17".to_string(),
                name: "Rechargeable Lamp".to_string(),
                price: 8500,
                image: Some("https://cdn.test/lamp.jpg".to_string()),
                category: Some("Electronics".to_string()),
            }
        );
    }

    #[test]
    fn test_legacy_record_shape() {
        let item = to_suggestion_item(&json!({
            "_id": 42,
            "title": "  Engineering Maths  ",
            "salePrice": "\u{20a6}3,200",
            "images": [{"url": ""}, {"url": "https://cdn.test/b.png"}],
            "category": {"name": "Books"}
        }))
        .unwrap();

        assert_eq!(item.id, "42");
        assert_eq!(item.name, "Engineering Maths");
        assert_eq!(item.price, 3200);
        assert_eq!(item.image.as_deref(), Some("https://cdn.test/b.png"));
        assert_eq!(item.category.as_deref(), Some("Books"));
    }

    #[test]
    fn test_missing_identity_is_rejected() {
        assert_eq!(to_suggestion_item(&json!({"name": "No id"})), None);
        assert_eq!(to_suggestion_item(&json!({"id": "1", "name": ""})), None);
        assert_eq!(to_suggestion_item(&json!("just a string")), None);
    }

    #[test]
    fn test_bad_price_defaults_to_zero() {
        let item = to_suggestion_item(&json!({"id": "1", "name": "Pen", "price": -4})).unwrap();
        assert_eq!(item.price, 0);
        assert_eq!(item.display_price(Currency::NGN), "\u{20a6}0");
    }

    #[test]
    fn test_fallthrough_to_later_field() {
        let item = to_suggestion_item(&json!({"id": null, "productId": "x9", "name": "Mug"})).unwrap();
        assert_eq!(item.id, "x9");
    }
}
