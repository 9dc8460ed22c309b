//! Connected and unconnected domain values
//!
//! A plain domain value becomes an [`Entity`] once storage has given it an
//! [`Identifier`]. [`MayEntity`] is accepted wherever a caller may hand over
//! either a new value or one that is already stored, e.g. `save`.

use crate::identifier::Identifier;
use serde::{Deserialize, Serialize};
use std::ops::{Deref, DerefMut};

/// Dynamic shape of a domain value as engines see it
pub type Record = serde_json::Map<String, serde_json::Value>;

/// A domain value connected to a stored record
///
/// Serializes as the value's own fields plus `id`, so `T` must not declare
/// an `id` field of its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity<T> {
    pub id: Identifier,
    #[serde(flatten)]
    pub value: T,
}

impl<T> Entity<T> {
    pub fn new(id: impl Into<Identifier>, value: T) -> Self {
        Self {
            id: id.into(),
            value,
        }
    }

    pub fn id(&self) -> &Identifier {
        &self.id
    }

    pub fn into_inner(self) -> T {
        self.value
    }

    pub fn into_parts(self) -> (Identifier, T) {
        (self.id, self.value)
    }

    /// Transform the value, keeping the identifier
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Entity<U> {
        Entity {
            id: self.id,
            value: f(self.value),
        }
    }

    pub fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<Entity<U>, E> {
        Ok(Entity {
            id: self.id,
            value: f(self.value)?,
        })
    }
}

impl<T> Deref for Entity<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T> DerefMut for Entity<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.value
    }
}

/// Either a value not yet stored, or a stored one
#[derive(Debug, Clone, PartialEq)]
pub enum MayEntity<T> {
    Unconnected(T),
    Connected(Entity<T>),
}

impl<T> MayEntity<T> {
    pub fn unconnected(value: T) -> Self {
        MayEntity::Unconnected(value)
    }

    pub fn id(&self) -> Option<&Identifier> {
        match self {
            MayEntity::Unconnected(_) => None,
            MayEntity::Connected(entity) => Some(&entity.id),
        }
    }

    pub fn value(&self) -> &T {
        match self {
            MayEntity::Unconnected(value) => value,
            MayEntity::Connected(entity) => &entity.value,
        }
    }

    pub fn into_value(self) -> T {
        self.into_parts().0
    }

    pub fn into_parts(self) -> (T, Option<Identifier>) {
        match self {
            MayEntity::Unconnected(value) => (value, None),
            MayEntity::Connected(entity) => (entity.value, Some(entity.id)),
        }
    }

    pub fn is_connected(&self) -> bool {
        is_object_connected(self)
    }

    /// The stored entity, if this value is connected
    pub fn as_entity(&self) -> Option<&Entity<T>> {
        match self {
            MayEntity::Connected(entity) if !entity.id.is_empty() => Some(entity),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> MayEntity<U> {
        match self {
            MayEntity::Unconnected(value) => MayEntity::Unconnected(f(value)),
            MayEntity::Connected(entity) => MayEntity::Connected(entity.map(f)),
        }
    }

    pub fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<MayEntity<U>, E> {
        Ok(match self {
            MayEntity::Unconnected(value) => MayEntity::Unconnected(f(value)?),
            MayEntity::Connected(entity) => MayEntity::Connected(entity.try_map(f)?),
        })
    }
}

impl<T> From<Entity<T>> for MayEntity<T> {
    fn from(entity: Entity<T>) -> Self {
        MayEntity::Connected(entity)
    }
}

/// Attach `id` to `object`. A connected object gets its identifier replaced.
pub fn connect_object<T>(object: MayEntity<T>, id: impl Into<Identifier>) -> Entity<T> {
    Entity::new(id, object.into_value())
}

/// Drop the identifier, leaving the plain value
pub fn disconnect_object<T>(object: Entity<T>) -> T {
    object.value
}

/// True iff `object` carries a non-empty identifier
pub fn is_object_connected<T>(object: &MayEntity<T>) -> bool {
    match object {
        MayEntity::Unconnected(_) => false,
        MayEntity::Connected(entity) => !entity.id.is_empty(),
    }
}
