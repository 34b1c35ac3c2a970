//! Tool definition types sent to the model
//!
//! These mirror the JSON Schema subset the model providers understand:
//! an object schema whose properties are strings, numbers, booleans,
//! arrays or nested objects, each with an optional description, default
//! and item schema.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// JSON type of a schema property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    String,
    Number,
    Boolean,
    Array,
    Object,
}

/// Schema of a single parameter
///
/// # Example
///
/// ```
/// use mapkit_tools::Property;
/// use serde_json::json;
///
/// let zoom = Property::number("Zoom level (0-22)").with_default(json!(12));
/// assert_eq!(
///     serde_json::to_value(&zoom).unwrap(),
///     json!({"type": "number", "description": "Zoom level (0-22)", "default": 12})
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    /// JSON type
    #[serde(rename = "type")]
    pub kind: PropertyType,

    /// What the parameter means
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Value used when the parameter is omitted, in the parameter's own type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    /// Schema of array elements
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Property>>,

    /// Fields of a nested object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, Property>>,

    /// Required fields of a nested object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
}

impl Property {
    fn of(kind: PropertyType, description: &str) -> Self {
        Self {
            kind,
            description: Some(description.to_string()),
            default: None,
            items: None,
            properties: None,
            required: None,
        }
    }

    /// String property
    pub fn string(description: &str) -> Self {
        Self::of(PropertyType::String, description)
    }

    /// Number property
    pub fn number(description: &str) -> Self {
        Self::of(PropertyType::Number, description)
    }

    /// Boolean property
    pub fn boolean(description: &str) -> Self {
        Self::of(PropertyType::Boolean, description)
    }

    /// Array property with the given item schema
    pub fn array(description: &str, items: Property) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::of(PropertyType::Array, description)
        }
    }

    /// Object property with nested fields
    pub fn object<I, K>(description: &str, properties: I, required: &[&str]) -> Self
    where
        I: IntoIterator<Item = (K, Property)>,
        K: Into<String>,
    {
        Self {
            properties: Some(
                properties
                    .into_iter()
                    .map(|(name, prop)| (name.into(), prop))
                    .collect(),
            ),
            required: Some(required.iter().map(|s| (*s).to_string()).collect()),
            ..Self::of(PropertyType::Object, description)
        }
    }

    /// Attach a default value
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Drop the description (used for bare item schemas)
    pub fn without_description(mut self) -> Self {
        self.description = None;
        self
    }

    /// Whether every required field of this property (and its children)
    /// is declared
    pub fn is_consistent(&self) -> bool {
        let own = match (&self.properties, &self.required) {
            (Some(props), Some(required)) => required.iter().all(|r| props.contains_key(r)),
            (None, Some(required)) => required.is_empty(),
            _ => true,
        };

        own && self.items.as_deref().is_none_or(Property::is_consistent)
            && self
                .properties
                .as_ref()
                .is_none_or(|props| props.values().all(Property::is_consistent))
    }
}

/// Input schema of a tool; always an object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSchema {
    /// Always `"object"`
    #[serde(rename = "type")]
    pub kind: PropertyType,

    /// Parameters by name
    pub properties: BTreeMap<String, Property>,

    /// Names of parameters that must be present
    pub required: Vec<String>,
}

impl InputSchema {
    /// Create an object schema
    ///
    /// # Example
    ///
    /// ```
    /// use mapkit_tools::{InputSchema, Property};
    ///
    /// let schema = InputSchema::object(
    ///     [("styleUrl", Property::string("Style URL"))],
    ///     &["styleUrl"],
    /// );
    /// assert!(schema.is_consistent());
    /// ```
    pub fn object<I, K>(properties: I, required: &[&str]) -> Self
    where
        I: IntoIterator<Item = (K, Property)>,
        K: Into<String>,
    {
        Self {
            kind: PropertyType::Object,
            properties: properties
                .into_iter()
                .map(|(name, prop)| (name.into(), prop))
                .collect(),
            required: required.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    /// Whether `required` only names declared properties, recursively
    pub fn is_consistent(&self) -> bool {
        self.required.iter().all(|r| self.properties.contains_key(r))
            && self.properties.values().all(Property::is_consistent)
    }

    /// Whether a parameter is required
    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }
}

/// Tool definition for the model provider
///
/// This describes a tool the model can call, including its name,
/// description, and input schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name, unique within the catalog
    pub name: String,

    /// Description of what the tool does
    pub description: String,

    /// Schema for the tool's input parameters
    pub input_schema: InputSchema,
}

impl ToolDefinition {
    /// Create a new tool definition
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: InputSchema,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }

    /// JSON form of the definition, as sent to the provider
    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}
