//! Result objects populated by a parse.
//!
//! A [`Record`] is the dynamic stand-in for a command's result object. Each
//! field is addressed by an access path: a single field name for top-level
//! parameters, or `[group, …, field]` for parameters declared inside
//! parameter groups. Intermediate groups are created on first write.

use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::value::Value;

/// A field of a [`Record`].
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    /// A parsed value.
    Value(Value),
    /// A nested parameter group.
    Group(Record),
}

/// A command's result object.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    type_name: String,
    fields: BTreeMap<String, Field>,
}

impl Record {
    /// Creates an empty record for the named command type.
    #[must_use]
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Returns the command type this record belongs to.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Returns every field keyed by name.
    #[must_use]
    pub const fn fields(&self) -> &BTreeMap<String, Field> {
        &self.fields
    }

    /// Returns `true` when no field has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the value of a top-level field.
    #[must_use]
    pub fn value(&self, field: &str) -> Option<&Value> {
        match self.fields.get(field) {
            Some(Field::Value(value)) => Some(value),
            _ => None,
        }
    }

    /// Returns a nested group.
    #[must_use]
    pub fn group(&self, field: &str) -> Option<&Self> {
        match self.fields.get(field) {
            Some(Field::Group(group)) => Some(group),
            _ => None,
        }
    }

    /// Returns the value at `path`.
    #[must_use]
    pub fn get<S: AsRef<str>>(&self, path: &[S]) -> Option<&Value> {
        let (field, groups) = path.split_last()?;
        let mut record = self;
        for group in groups {
            record = record.group(group.as_ref())?;
        }
        record.value(field.as_ref())
    }

    /// Writes `value` at `path`, replacing any previous value.
    pub fn assign<S: AsRef<str>>(&mut self, path: &[S], value: Value) {
        if let Some(slot) = self.slot(path) {
            *slot = Field::Value(value);
        }
    }

    /// Appends `value` to the list at `path`, creating the list on first use.
    pub fn append<S: AsRef<str>>(&mut self, path: &[S], value: Value) {
        if let Some(slot) = self.slot(path) {
            match slot {
                Field::Value(Value::List(values)) => values.push(value),
                other => *other = Field::Value(Value::List(vec![value])),
            }
        }
    }

    /// Inserts a map entry at `path`, creating the map on first use.
    ///
    /// A later entry with the same key overwrites the earlier one.
    pub fn put_entry<S: AsRef<str>>(&mut self, path: &[S], key: String, value: Option<String>) {
        if let Some(slot) = self.slot(path) {
            match slot {
                Field::Value(Value::Map(entries)) => {
                    entries.insert(key, value);
                }
                other => {
                    *other = Field::Value(Value::Map(BTreeMap::from([(key, value)])));
                }
            }
        }
    }

    /// Returns the field slot at `path`, creating intermediate groups.
    ///
    /// A freshly created leaf slot holds an empty list, which every writer
    /// overwrites or extends. Returns `None` for an empty path.
    fn slot<S: AsRef<str>>(&mut self, path: &[S]) -> Option<&mut Field> {
        let (field, groups) = path.split_last()?;
        let mut record = self;
        for group in groups {
            let entry = record
                .fields
                .entry(group.as_ref().to_owned())
                .or_insert_with(|| Field::Group(Self::new(group.as_ref())));
            if !matches!(entry, Field::Group(_)) {
                *entry = Field::Group(Self::new(group.as_ref()));
            }
            let Field::Group(nested) = entry else {
                return None;
            };
            record = nested;
        }
        Some(
            record
                .fields
                .entry(field.as_ref().to_owned())
                .or_insert_with(|| Field::Value(Value::List(Vec::new()))),
        )
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Value(value) => value.serialize(serializer),
            Self::Group(group) => group.serialize(serializer),
        }
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, field) in &self.fields {
            map.serialize_entry(name, field)?;
        }
        map.end()
    }
}
