//! Search criteria
//!
//! A [`Search`] maps property names to match criteria. Keys usually name
//! properties of the searched type, but engines may accept extra keys for
//! their own search extensions. How a criterion matches is up to the engine;
//! a plain value conventionally means equality.

use crate::entity::Record;
use crate::error::{Result, StorageError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Search {
    criteria: Record,
}

impl Search {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty criteria: every record of the type matches
    pub fn all() -> Self {
        Self::default()
    }

    /// Build criteria from a partial value. `null` fields are skipped so
    /// `Option` fields left at `None` do not constrain the search.
    pub fn matching<P: Serialize>(partial: &P) -> Result<Self> {
        match serde_json::to_value(partial)? {
            Value::Object(fields) => Ok(Self {
                criteria: fields
                    .into_iter()
                    .filter(|(_, value)| !value.is_null())
                    .collect(),
            }),
            other => Err(StorageError::InvalidData(format!(
                "search criteria must serialize to an object, got {}",
                other
            ))),
        }
    }

    pub fn with(mut self, property: impl Into<String>, criterion: impl Into<Value>) -> Self {
        self.criteria.insert(property.into(), criterion.into());
        self
    }

    pub fn insert(&mut self, property: impl Into<String>, criterion: impl Into<Value>) {
        self.criteria.insert(property.into(), criterion.into());
    }

    pub fn get(&self, property: &str) -> Option<&Value> {
        self.criteria.get(property)
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.criteria.iter()
    }

    pub fn criteria(&self) -> &Record {
        &self.criteria
    }

    pub fn into_criteria(self) -> Record {
        self.criteria
    }
}

impl From<Record> for Search {
    fn from(criteria: Record) -> Self {
        Self { criteria }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Search {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            criteria: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}
