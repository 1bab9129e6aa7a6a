// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Structured decode results.
//!
//! A [`Data`] record is an ordered list of named, typed fields. Field order
//! is preserved when serialized so output matches the order a decoder built
//! the record in.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// A typed field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Double(f64),
    String(String),
    Array(Vec<Value>),
    Data(Data),
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Int(v) => serializer.serialize_i64(*v),
            Value::Double(v) => serializer.serialize_f64(*v),
            Value::String(v) => serializer.serialize_str(v),
            Value::Array(values) => {
                let mut seq = serializer.serialize_seq(Some(values.len()))?;
                for value in values {
                    seq.serialize_element(value)?;
                }
                seq.end()
            }
            Value::Data(data) => data.serialize(serializer),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Data> for Value {
    fn from(value: Data) -> Self {
        Value::Data(value)
    }
}

/// One named field of a record.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Machine key, used as the JSON key.
    pub key: String,
    /// Human readable label for pretty outputs. May be empty.
    pub pretty: String,
    pub value: Value,
}

/// An ordered record of named fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Data {
    fields: Vec<Field>,
}

impl Data {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field, builder style.
    pub fn with(mut self, key: &str, pretty: &str, value: impl Into<Value>) -> Self {
        self.push(key, pretty, value);
        self
    }

    pub fn push(&mut self, key: &str, pretty: &str, value: impl Into<Value>) {
        self.fields.push(Field {
            key: key.to_string(),
            pretty: pretty.to_string(),
            value: value.into(),
        });
    }

    /// Insert fields ahead of the existing ones, keeping their order.
    pub fn prepend(&mut self, mut other: Data) {
        other.fields.append(&mut self.fields);
        self.fields = other.fields;
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.iter().find(|f| f.key == key).map(|f| &f.value)
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Data {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for field in &self.fields {
            map.serialize_entry(&field.key, &field.value)?;
        }
        map.end()
    }
}
