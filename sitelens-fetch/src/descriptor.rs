use crate::error::{FetchError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A parsed and shape-checked `site.json` document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteDescriptor {
    pub metadata: SiteMetadata,
    pub items: Vec<ContentItem>,
}

/// Free-form site metadata. Only a handful of keys are ever displayed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteMetadata(Map<String, Value>);

/// One entry of the descriptor's `items` array.
///
/// Items are kept as raw JSON: an entry that is not an object simply has
/// no recognized fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentItem(Value);

impl SiteDescriptor {
    /// Validate a JSON value as a site descriptor.
    ///
    /// `metadata` must be a non-null object and `items` must be an array.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(mut root) = value else {
            return Err(FetchError::InvalidDescriptor(
                "top-level value is not an object".to_string(),
            ));
        };

        let metadata = match root.remove("metadata") {
            Some(Value::Object(map)) => SiteMetadata(map),
            Some(Value::Null) | None => {
                return Err(FetchError::InvalidDescriptor(
                    "missing metadata".to_string(),
                ));
            }
            Some(other) => {
                return Err(FetchError::InvalidDescriptor(format!(
                    "metadata is not an object: {}",
                    other
                )));
            }
        };

        let items = match root.remove("items") {
            Some(Value::Array(items)) => items.into_iter().map(ContentItem).collect(),
            Some(_) => {
                return Err(FetchError::InvalidDescriptor(
                    "items is not an array".to_string(),
                ));
            }
            None => {
                return Err(FetchError::InvalidDescriptor("missing items".to_string()));
            }
        };

        Ok(Self { metadata, items })
    }
}

impl SiteMetadata {
    pub fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Display text for `key`, or `None` when the field is absent or falsy.
    pub fn text(&self, key: &str) -> Option<String> {
        self.get(key).and_then(display_text)
    }

    pub fn name(&self) -> Option<String> {
        self.text("name")
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl ContentItem {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.as_object().and_then(|map| map.get(key))
    }

    pub fn text(&self, key: &str) -> Option<String> {
        self.get(key).and_then(display_text)
    }

    pub fn title(&self) -> Option<String> {
        self.text("title")
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

/// Render a JSON field the way a template would show `value || default`.
///
/// Missing, `null`, `false`, zero and empty strings count as absent.
pub fn display_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::Bool(true) => Some("true".to_string()),
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Number(n) => Some(n.to_string()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
    }
}
