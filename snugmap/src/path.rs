//! JSON path handling for document-stored fields.
//!
//! Supports the subset of JSONPath that RediSearch accepts for index locators and that
//! can be written back deterministically:
//!
//! | Syntax        | Meaning                          |
//! |---------------|----------------------------------|
//! | `$`           | document root (must be followed) |
//! | `.name`       | object member                    |
//! | `['na me']`   | object member, bracket form      |
//! | `[3]`         | array element                    |
//! | `[*]` / `.*`  | every element or member          |
//!
//! Resolution returns [`Location`] handles (container path + slot) instead of values, so
//! callers can read, replace, or count matches without holding borrows on the document.

use std::fmt;

use serde_json::{Map, Value};
use thiserror::Error;

/// Largest array index a path may name. Assigning through an index pads the array
/// with nulls up to it.
pub const MAX_ARRAY_INDEX: usize = 65_535;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
    Wildcard,
}

/// One concrete step taken while resolving a path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Step {
    Key(String),
    Index(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason} at offset {offset}")]
pub struct PathSyntaxError {
    pub offset: usize,
    pub reason: &'static str,
}

impl PathSyntaxError {
    fn at(offset: usize, reason: &'static str) -> Self {
        Self { offset, reason }
    }
}

/// A parsed JSON path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonPath {
    raw: String,
    segments: Vec<PathSegment>,
}

impl JsonPath {
    pub fn parse(raw: &str) -> Result<Self, PathSyntaxError> {
        let bytes = raw.as_bytes();
        if bytes.first() != Some(&b'$') {
            return Err(PathSyntaxError::at(0, "path must start with '$'"));
        }

        let mut segments = Vec::new();
        let mut pos = 1;
        while pos < bytes.len() {
            match bytes[pos] {
                b'.' => {
                    pos += 1;
                    match bytes.get(pos) {
                        None => return Err(PathSyntaxError::at(pos, "expected a member name after '.'")),
                        Some(b'.') => return Err(PathSyntaxError::at(pos, "recursive descent is not supported")),
                        Some(b'*') => {
                            segments.push(PathSegment::Wildcard);
                            pos += 1;
                        }
                        Some(_) => {
                            let start = pos;
                            while pos < bytes.len() && bytes[pos] != b'.' && bytes[pos] != b'[' {
                                pos += 1;
                            }
                            if pos == start {
                                return Err(PathSyntaxError::at(pos, "expected a member name after '.'"));
                            }
                            segments.push(PathSegment::Key(raw[start..pos].to_string()));
                        }
                    }
                }
                b'[' => {
                    let (segment, next) = parse_bracket(raw, pos)?;
                    segments.push(segment);
                    pos = next;
                }
                _ => return Err(PathSyntaxError::at(pos, "expected '.' or '['")),
            }
        }

        if segments.is_empty() {
            return Err(PathSyntaxError::at(raw.len(), "path must select a member of the document"));
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    /// Default locator for a field stored under its own name at the document root.
    /// Element-wise paths (`$.tags[*]`) are used for string lists so RediSearch indexes
    /// every element as its own tag.
    pub fn for_member(name: &str, element_wise: bool) -> Self {
        let is_identifier = name
            .chars()
            .enumerate()
            .all(|(i, c)| c == '_' || c == '$' || c.is_ascii_alphabetic() || (i > 0 && c.is_ascii_digit()));
        let mut raw = if is_identifier && !name.is_empty() {
            format!("$.{name}")
        } else {
            format!("$['{name}']")
        };
        let mut segments = vec![PathSegment::Key(name.to_string())];
        if element_wise {
            raw.push_str("[*]");
            segments.push(PathSegment::Wildcard);
        }
        Self { raw, segments }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// True when the final segment is a wildcard, i.e. the path addresses list elements.
    pub fn is_element_wise(&self) -> bool {
        matches!(self.segments.last(), Some(PathSegment::Wildcard))
    }

    /// True when a wildcard appears anywhere but the final segment.
    pub fn has_inner_wildcard(&self) -> bool {
        let inner = &self.segments[..self.segments.len() - 1];
        inner.iter().any(|segment| matches!(segment, PathSegment::Wildcard))
    }

    /// Top-level member this path starts from, if it starts with a member name.
    pub fn root_key(&self) -> Option<&str> {
        match self.segments.first() {
            Some(PathSegment::Key(key)) => Some(key),
            _ => None,
        }
    }

    /// Path of the container an element-wise path iterates over.
    pub fn container(&self) -> Option<JsonPath> {
        if !self.is_element_wise() || self.segments.len() < 2 {
            return None;
        }
        let segments = self.segments[..self.segments.len() - 1].to_vec();
        let raw = self.raw.strip_suffix("[*]").or_else(|| self.raw.strip_suffix(".*"))?.to_string();
        Some(Self { raw, segments })
    }

    /// Find every location in `document` matching this path, in document order.
    pub fn resolve(&self, document: &Value) -> Vec<Location> {
        let mut frontier: Vec<(Vec<Step>, &Value)> = vec![(Vec::new(), document)];

        for segment in &self.segments {
            let mut next = Vec::new();
            for (steps, value) in frontier {
                match (segment, value) {
                    (PathSegment::Key(key), Value::Object(map)) => {
                        if let Some(child) = map.get(key) {
                            next.push((extend(&steps, Step::Key(key.clone())), child));
                        }
                    }
                    (PathSegment::Index(index), Value::Array(items)) => {
                        if let Some(child) = items.get(*index) {
                            next.push((extend(&steps, Step::Index(*index)), child));
                        }
                    }
                    (PathSegment::Wildcard, Value::Array(items)) => {
                        for (index, child) in items.iter().enumerate() {
                            next.push((extend(&steps, Step::Index(index)), child));
                        }
                    }
                    (PathSegment::Wildcard, Value::Object(map)) => {
                        for (key, child) in map {
                            next.push((extend(&steps, Step::Key(key.clone())), child));
                        }
                    }
                    _ => {}
                }
            }
            frontier = next;
        }

        frontier
            .into_iter()
            .filter_map(|(steps, _)| Location::from_steps(steps))
            .collect()
    }

    /// Write `value` at this path, creating intermediate objects and arrays as needed.
    ///
    /// An element-wise path writes the whole list at its container. Arrays are padded
    /// with nulls when an index lies past the end.
    pub fn assign(&self, document: &mut Value, value: Value) -> Result<(), &'static str> {
        let segments = if self.is_element_wise() {
            &self.segments[..self.segments.len() - 1]
        } else {
            &self.segments[..]
        };
        if segments.is_empty() {
            return Err("cannot replace the document root");
        }

        let mut current = document;
        for segment in segments {
            current = child_slot(current, segment)?;
        }
        *current = value;
        Ok(())
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn parse_bracket(raw: &str, open: usize) -> Result<(PathSegment, usize), PathSyntaxError> {
    let bytes = raw.as_bytes();
    let start = open + 1;
    match bytes.get(start) {
        Some(b'*') => {
            if bytes.get(start + 1) != Some(&b']') {
                return Err(PathSyntaxError::at(start + 1, "expected ']' after '*'"));
            }
            Ok((PathSegment::Wildcard, start + 2))
        }
        Some(quote @ (b'\'' | b'"')) => {
            let body = start + 1;
            let close = raw[body..]
                .find(*quote as char)
                .map(|offset| body + offset)
                .ok_or_else(|| PathSyntaxError::at(start, "unterminated quoted member name"))?;
            if bytes.get(close + 1) != Some(&b']') {
                return Err(PathSyntaxError::at(close + 1, "expected ']' after quoted member name"));
            }
            Ok((PathSegment::Key(raw[body..close].to_string()), close + 2))
        }
        Some(b'0'..=b'9') => {
            let mut end = start;
            while end < bytes.len() && bytes[end].is_ascii_digit() {
                end += 1;
            }
            if bytes.get(end) != Some(&b']') {
                return Err(PathSyntaxError::at(end, "expected ']' after array index"));
            }
            let index = raw[start..end]
                .parse::<usize>()
                .ok()
                .filter(|index| *index <= MAX_ARRAY_INDEX)
                .ok_or_else(|| PathSyntaxError::at(start, "array index out of range"))?;
            Ok((PathSegment::Index(index), end + 1))
        }
        _ => Err(PathSyntaxError::at(start, "expected '*', an index, or a quoted member name")),
    }
}

fn extend(steps: &[Step], step: Step) -> Vec<Step> {
    let mut next = Vec::with_capacity(steps.len() + 1);
    next.extend_from_slice(steps);
    next.push(step);
    next
}

fn child_slot<'a>(current: &'a mut Value, segment: &PathSegment) -> Result<&'a mut Value, &'static str> {
    match segment {
        PathSegment::Key(key) => {
            if current.is_null() {
                *current = Value::Object(Map::new());
            }
            match current {
                Value::Object(map) => Ok(map.entry(key.clone()).or_insert(Value::Null)),
                _ => Err("expected an object while traversing the path"),
            }
        }
        PathSegment::Index(index) => {
            if current.is_null() {
                *current = Value::Array(Vec::new());
            }
            match current {
                Value::Array(items) => {
                    if items.len() <= *index {
                        items.resize(*index + 1, Value::Null);
                    }
                    Ok(&mut items[*index])
                }
                _ => Err("expected an array while traversing the path"),
            }
        }
        PathSegment::Wildcard => Err("wildcards can only be written as the final segment"),
    }
}

/// A resolved location: the steps to the containing object or array plus the slot in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    container: Vec<Step>,
    slot: Step,
}

impl Location {
    fn from_steps(mut steps: Vec<Step>) -> Option<Self> {
        let slot = steps.pop()?;
        Some(Self { container: steps, slot })
    }

    pub fn container(&self) -> &[Step] {
        &self.container
    }

    pub fn slot(&self) -> &Step {
        &self.slot
    }

    /// The object or array holding this location's slot.
    pub fn parent<'a>(&self, document: &'a Value) -> Option<&'a Value> {
        let mut current = document;
        for step in &self.container {
            current = match (step, current) {
                (Step::Key(key), Value::Object(map)) => map.get(key)?,
                (Step::Index(index), Value::Array(items)) => items.get(*index)?,
                _ => return None,
            };
        }
        Some(current)
    }

    pub fn get<'a>(&self, document: &'a Value) -> Option<&'a Value> {
        let mut current = document;
        for step in self.container.iter().chain(std::iter::once(&self.slot)) {
            current = match (step, current) {
                (Step::Key(key), Value::Object(map)) => map.get(key)?,
                (Step::Index(index), Value::Array(items)) => items.get(*index)?,
                _ => return None,
            };
        }
        Some(current)
    }

    pub fn get_mut<'a>(&self, document: &'a mut Value) -> Option<&'a mut Value> {
        let mut current = document;
        for step in self.container.iter().chain(std::iter::once(&self.slot)) {
            current = match (step, current) {
                (Step::Key(key), Value::Object(map)) => map.get_mut(key)?,
                (Step::Index(index), Value::Array(items)) => items.get_mut(*index)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Replace the value at this location, returning the previous one.
    pub fn replace(&self, document: &mut Value, value: Value) -> Option<Value> {
        self.get_mut(document).map(|slot| std::mem::replace(slot, value))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for step in self.container.iter().chain(std::iter::once(&self.slot)) {
            match step {
                Step::Key(key) => write!(f, "['{key}']")?,
                Step::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}
