//! Loosely-typed tool parameters
//!
//! Tool arguments arrive as whatever JSON the model produced. [`Params`]
//! wraps such an object and exposes typed accessors that either yield a
//! value, apply a default, or report the offending field as a
//! [`ParamError`]. Nested objects (e.g. the items of `points`) are wrapped
//! with [`Params::nested`] so errors carry the full path, `points[0].lat`.
//!
//! An explicit JSON `null` is treated exactly like an absent key.

use crate::color::Color;
use crate::error::ParamError;
use crate::geo::LngLat;
use serde_json::{Map, Value};
use std::sync::LazyLock;

static EMPTY: LazyLock<Map<String, Value>> = LazyLock::new(Map::new);

/// Name of the JSON type of a value, for error messages
pub fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Typed view over an untyped parameter object
///
/// # Example
///
/// ```
/// use mapkit_core::Params;
/// use serde_json::json;
///
/// let raw = json!({"latitude": 40, "animated": false});
/// let params = Params::from_value(&raw).unwrap();
///
/// assert_eq!(params.required_f64("latitude").unwrap(), 40.0);
/// assert!(!params.bool_or("animated", true).unwrap());
/// assert_eq!(params.f64_or("duration", 1000.0).unwrap(), 1000.0);
/// assert!(params.required_f64("longitude").is_err());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Params<'a> {
    data: &'a Map<String, Value>,
    path: Option<&'a str>,
}

impl<'a> Params<'a> {
    /// Wrap a top-level payload
    ///
    /// `null` is accepted as an empty object; any other non-object is
    /// rejected.
    pub fn from_value(value: &'a Value) -> Result<Self, ParamError> {
        match value {
            Value::Object(map) => Ok(Self::new(map)),
            Value::Null => Ok(Self::new(&EMPTY)),
            other => Err(ParamError::WrongType {
                field: "params".to_string(),
                expected: "object",
                found: json_type(other),
            }),
        }
    }

    /// Wrap an object map
    pub fn new(data: &'a Map<String, Value>) -> Self {
        Self { data, path: None }
    }

    /// Wrap a nested object whose errors are reported under `path`
    pub fn nested(data: &'a Map<String, Value>, path: &'a str) -> Self {
        Self {
            data,
            path: Some(path),
        }
    }

    /// Full path of a key, for error reporting
    pub fn field(&self, key: &str) -> String {
        match self.path {
            Some(path) => format!("{path}.{key}"),
            None => key.to_string(),
        }
    }

    // =========== Raw Access ===========

    /// Get a value, treating `null` as absent
    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.data.get(key).filter(|v| !v.is_null())
    }

    /// Check if a non-null value exists for the key
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    fn require(&self, key: &str) -> Result<&'a Value, ParamError> {
        self.get(key).ok_or_else(|| ParamError::Missing {
            field: self.field(key),
        })
    }

    fn wrong_type(&self, key: &str, expected: &'static str, found: &Value) -> ParamError {
        ParamError::WrongType {
            field: self.field(key),
            expected,
            found: json_type(found),
        }
    }

    // =========== Numbers ===========

    /// Get an optional number; integers and floats are both accepted
    pub fn optional_f64(&self, key: &str) -> Result<Option<f64>, ParamError> {
        self.get(key)
            .map(|value| {
                value
                    .as_f64()
                    .ok_or_else(|| self.wrong_type(key, "number", value))
            })
            .transpose()
    }

    /// Get a required number
    pub fn required_f64(&self, key: &str) -> Result<f64, ParamError> {
        let value = self.require(key)?;
        value
            .as_f64()
            .ok_or_else(|| self.wrong_type(key, "number", value))
    }

    /// Get a number or its default
    pub fn f64_or(&self, key: &str, default: f64) -> Result<f64, ParamError> {
        Ok(self.optional_f64(key)?.unwrap_or(default))
    }

    /// Get a number or its default, rejecting negative values
    pub fn non_negative_f64_or(&self, key: &str, default: f64) -> Result<f64, ParamError> {
        let value = self.f64_or(key, default)?;
        if value < 0.0 {
            return Err(ParamError::invalid(self.field(key), "must not be negative"));
        }
        Ok(value)
    }

    /// Get an opacity or its default, clamped into `[0, 1]`
    pub fn opacity_or(&self, key: &str, default: f64) -> Result<f64, ParamError> {
        Ok(self.f64_or(key, default)?.clamp(0.0, 1.0))
    }

    // =========== Strings ===========

    /// Get an optional string
    pub fn optional_str(&self, key: &str) -> Result<Option<&'a str>, ParamError> {
        self.get(key)
            .map(|value| {
                value
                    .as_str()
                    .ok_or_else(|| self.wrong_type(key, "string", value))
            })
            .transpose()
    }

    /// Get a required string
    pub fn required_str(&self, key: &str) -> Result<&'a str, ParamError> {
        let value = self.require(key)?;
        value
            .as_str()
            .ok_or_else(|| self.wrong_type(key, "string", value))
    }

    /// Get a string or its default; an empty string also yields the default
    pub fn str_or(&self, key: &str, default: &'a str) -> Result<&'a str, ParamError> {
        Ok(self
            .optional_str(key)?
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(default))
    }

    // =========== Booleans ===========

    /// Get a boolean or its default
    pub fn bool_or(&self, key: &str, default: bool) -> Result<bool, ParamError> {
        match self.get(key) {
            None => Ok(default),
            Some(value) => value
                .as_bool()
                .ok_or_else(|| self.wrong_type(key, "boolean", value)),
        }
    }

    // =========== Arrays ===========

    /// Get an optional array
    pub fn optional_array(&self, key: &str) -> Result<Option<&'a [Value]>, ParamError> {
        self.get(key)
            .map(|value| {
                value
                    .as_array()
                    .map(Vec::as_slice)
                    .ok_or_else(|| self.wrong_type(key, "array", value))
            })
            .transpose()
    }

    /// Get a required array
    pub fn required_array(&self, key: &str) -> Result<&'a [Value], ParamError> {
        let value = self.require(key)?;
        value
            .as_array()
            .map(Vec::as_slice)
            .ok_or_else(|| self.wrong_type(key, "array", value))
    }

    /// Get an optional list of strings
    pub fn optional_string_list(&self, key: &str) -> Result<Option<Vec<String>>, ParamError> {
        let Some(items) = self.optional_array(key)? else {
            return Ok(None);
        };

        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                item.as_str().map(str::to_string).ok_or_else(|| ParamError::WrongType {
                    field: format!("{}[{i}]", self.field(key)),
                    expected: "string",
                    found: json_type(item),
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }

    /// Get a required list of `[lng, lat]` pairs
    ///
    /// Every pair needs at least two numbers; anything after index 1 (such
    /// as an altitude) is ignored.
    pub fn required_lng_lat_list(&self, key: &str) -> Result<Vec<LngLat>, ParamError> {
        let field = self.field(key);
        self.required_array(key)?
            .iter()
            .enumerate()
            .map(|(i, pair)| lng_lat_pair(pair, &format!("{field}[{i}]")))
            .collect()
    }

    // =========== Colors ===========

    /// Get a color, falling back silently on anything unparseable
    ///
    /// Absent values, non-strings and unknown color strings all yield
    /// `fallback`; a bad color never fails the call.
    pub fn color_or(&self, key: &str, fallback: Color) -> Color {
        match self.get(key) {
            Some(Value::String(s)) => Color::parse(s).unwrap_or_else(|_| {
                tracing::debug!(field = %self.field(key), value = %s, "Unrecognized color, using fallback");
                fallback
            }),
            _ => fallback,
        }
    }
}

fn lng_lat_pair(value: &Value, field: &str) -> Result<LngLat, ParamError> {
    let Some(items) = value.as_array() else {
        return Err(ParamError::WrongType {
            field: field.to_string(),
            expected: "array",
            found: json_type(value),
        });
    };

    match (items.first().and_then(Value::as_f64), items.get(1).and_then(Value::as_f64)) {
        (Some(lng), Some(lat)) => Ok(LngLat::new(lng, lat)),
        _ => Err(ParamError::invalid(
            field,
            "expected a [longitude, latitude] pair of numbers",
        )),
    }
}
