//! In-memory entity data exchanged with the codecs.
//!
//! A field is in exactly one of three states: absent (never set, or unset), explicitly
//! null, or holding a value. Both codecs omit absent and null fields on the way out; only
//! the JSON codec can produce an explicit null on the way in, because only documents can
//! store one.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

static POINT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?\d+(\.\d*)?,-?\d+(\.\d*)?$").expect("point pattern is valid"));

/// Geographic point stored as `"<longitude>,<latitude>"`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub longitude: f64,
    pub latitude: f64,
}

impl Point {
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self { longitude, latitude }
    }

    /// Parse the stored `"lon,lat"` form. Returns `None` for anything else.
    pub fn parse(raw: &str) -> Option<Self> {
        if !POINT_PATTERN.is_match(raw) {
            return None;
        }
        let (longitude, latitude) = raw.split_once(',')?;
        Some(Self {
            longitude: longitude.parse().ok()?,
            latitude: latitude.parse().ok()?,
        })
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.longitude, self.latitude)
    }
}

/// A semantic field value.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityValue {
    String(String),
    Number(f64),
    Boolean(bool),
    Date(DateTime<Utc>),
    Point(Point),
    Strings(Vec<String>),
}

impl EntityValue {
    /// Short name of the value's kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            EntityValue::String(_) => "string",
            EntityValue::Number(_) => "number",
            EntityValue::Boolean(_) => "boolean",
            EntityValue::Date(_) => "date",
            EntityValue::Point(_) => "point",
            EntityValue::Strings(_) => "string[]",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            EntityValue::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            EntityValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            EntityValue::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            EntityValue::Date(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_point(&self) -> Option<Point> {
        match self {
            EntityValue::Point(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_strings(&self) -> Option<&[String]> {
        match self {
            EntityValue::Strings(values) => Some(values),
            _ => None,
        }
    }
}

impl fmt::Display for EntityValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityValue::String(value) => write!(f, "{value:?}"),
            EntityValue::Number(value) => write!(f, "{value}"),
            EntityValue::Boolean(value) => write!(f, "{value}"),
            EntityValue::Date(value) => write!(f, "{}", value.to_rfc3339()),
            EntityValue::Point(value) => write!(f, "{value}"),
            EntityValue::Strings(values) => write!(f, "{values:?}"),
        }
    }
}

impl From<String> for EntityValue {
    fn from(value: String) -> Self {
        EntityValue::String(value)
    }
}

impl From<&str> for EntityValue {
    fn from(value: &str) -> Self {
        EntityValue::String(value.to_string())
    }
}

impl From<f64> for EntityValue {
    fn from(value: f64) -> Self {
        EntityValue::Number(value)
    }
}

impl From<i32> for EntityValue {
    fn from(value: i32) -> Self {
        EntityValue::Number(f64::from(value))
    }
}

impl From<i64> for EntityValue {
    fn from(value: i64) -> Self {
        EntityValue::Number(value as f64)
    }
}

impl From<bool> for EntityValue {
    fn from(value: bool) -> Self {
        EntityValue::Boolean(value)
    }
}

impl From<DateTime<Utc>> for EntityValue {
    fn from(value: DateTime<Utc>) -> Self {
        EntityValue::Date(value)
    }
}

impl From<Point> for EntityValue {
    fn from(value: Point) -> Self {
        EntityValue::Point(value)
    }
}

impl From<Vec<String>> for EntityValue {
    fn from(values: Vec<String>) -> Self {
        EntityValue::Strings(values)
    }
}

impl From<Vec<&str>> for EntityValue {
    fn from(values: Vec<&str>) -> Self {
        EntityValue::Strings(values.into_iter().map(str::to_string).collect())
    }
}

/// State of a single field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldState<'a> {
    Absent,
    Null,
    Value(&'a EntityValue),
}

/// Field name to value mapping for one entity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityData {
    fields: BTreeMap<String, Option<EntityValue>>,
}

impl EntityData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`EntityData::set`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<EntityValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Builder form of [`EntityData::set_null`].
    pub fn with_null(mut self, name: impl Into<String>) -> Self {
        self.set_null(name);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<EntityValue>) {
        self.fields.insert(name.into(), Some(value.into()));
    }

    pub fn set_null(&mut self, name: impl Into<String>) {
        self.fields.insert(name.into(), None);
    }

    /// Make the field absent again. Returns the previous value, if any.
    pub fn unset(&mut self, name: &str) -> Option<EntityValue> {
        self.fields.remove(name).flatten()
    }

    pub fn get(&self, name: &str) -> Option<&EntityValue> {
        self.fields.get(name).and_then(Option::as_ref)
    }

    pub fn state(&self, name: &str) -> FieldState<'_> {
        match self.fields.get(name) {
            None => FieldState::Absent,
            Some(None) => FieldState::Null,
            Some(Some(value)) => FieldState::Value(value),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn is_null(&self, name: &str) -> bool {
        matches!(self.fields.get(name), Some(None))
    }

    /// Iterate over every present field (null or valued) in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&EntityValue>)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// True when no field holds a value.
    pub fn is_blank(&self) -> bool {
        self.fields.values().all(Option::is_none)
    }
}

impl<K, V> FromIterator<(K, V)> for EntityData
where
    K: Into<String>,
    V: Into<EntityValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut data = EntityData::new();
        for (name, value) in iter {
            data.set(name, value);
        }
        data
    }
}
