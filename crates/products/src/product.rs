use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::{json, Map, Value};

use catalog_core::{DomainError, DomainResult};

/// Product category.
///
/// A closed set of symbolic variants; wire names are the uppercase member
/// names. Unrecognized input is a validation error, never silently coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Unknown,
    Cloths,
    Food,
    Housewares,
    Automotive,
    Tools,
}

impl Category {
    /// Every member, in declaration order.
    pub const ALL: [Category; 6] = [
        Category::Unknown,
        Category::Cloths,
        Category::Food,
        Category::Housewares,
        Category::Automotive,
        Category::Tools,
    ];

    /// Wire name of the member (uppercase).
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Unknown => "UNKNOWN",
            Category::Cloths => "CLOTHS",
            Category::Food => "FOOD",
            Category::Housewares => "HOUSEWARES",
            Category::Automotive => "AUTOMOTIVE",
            Category::Tools => "TOOLS",
        }
    }

    /// Case-insensitive name match against the member set.
    pub fn parse(s: &str) -> DomainResult<Category> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| DomainError::validation(format!("invalid category: {s}")))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A catalog product record.
///
/// `id` is `None` until the store assigns one on create, and immutable after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: Option<i32>,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub available: bool,
    pub category: Category,
}

impl Product {
    /// Build a Product from a JSON key-value payload.
    ///
    /// `name` is required and must be a non-empty string. `description`,
    /// `price`, `available`, and `category` are optional; a present key with
    /// the wrong type or an unrecognized category fails with a validation
    /// error naming the offending attribute. An `id` key in the payload is
    /// ignored: ids are assigned by the store and preserved by handlers.
    pub fn deserialize(payload: &Value) -> DomainResult<Product> {
        let obj = payload
            .as_object()
            .ok_or_else(|| DomainError::validation("payload must be a JSON object"))?;

        let name = match obj.get("name") {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            Some(Value::String(_)) => {
                return Err(DomainError::validation("attribute [name] must not be empty"))
            }
            Some(_) => return Err(DomainError::validation("invalid type for string [name]")),
            None => return Err(DomainError::validation("missing required attribute: name")),
        };

        Ok(Product {
            id: None,
            name,
            description: opt_string(obj, "description")?.unwrap_or_default(),
            price: opt_decimal(obj, "price")?.unwrap_or(Decimal::ZERO),
            available: opt_bool(obj, "available")?.unwrap_or(false),
            category: match opt_string(obj, "category")? {
                Some(s) => Category::parse(&s)?,
                None => Category::Unknown,
            },
        })
    }

    /// Produce the JSON key-value payload for this record.
    ///
    /// `price` is emitted as a decimal string to avoid floating-point drift;
    /// `category` as the member name. Exact inverse of [`Product::deserialize`]
    /// for all valid inputs, excluding an unset `id`.
    pub fn serialize(&self) -> Value {
        json!({
            "id": self.id,
            "name": self.name,
            "description": self.description,
            "price": self.price.to_string(),
            "available": self.available,
            "category": self.category.as_str(),
        })
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "<Product {} id=[{}]>", self.name, id),
            None => write!(f, "<Product {} id=[None]>", self.name),
        }
    }
}

fn opt_string(obj: &Map<String, Value>, key: &str) -> DomainResult<Option<String>> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(DomainError::validation(format!(
            "invalid type for string [{key}]"
        ))),
    }
}

fn opt_bool(obj: &Map<String, Value>, key: &str) -> DomainResult<Option<bool>> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(_) => Err(DomainError::validation(format!(
            "invalid type for boolean [{key}]"
        ))),
    }
}

// Accepts a JSON string ("12.50") or number (12.5). Numbers go through their
// decimal text form so binary floats never touch the value.
fn opt_decimal(obj: &Map<String, Value>, key: &str) -> DomainResult<Option<Decimal>> {
    let raw = match obj.get(key) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(_) => {
            return Err(DomainError::validation(format!(
                "invalid type for decimal [{key}]"
            )))
        }
    };
    Decimal::from_str(raw.trim())
        .map(Some)
        .map_err(|_| DomainError::validation(format!("invalid value for decimal [{key}]: {raw}")))
}
