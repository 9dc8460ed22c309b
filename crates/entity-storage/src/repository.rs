//! Typed access to a data source
//!
//! [`Repository`] wraps any [`DataSource`] and converts between a
//! [`Storable`] type and the [`Record`]s engines work on.
//!
//! ```rust,no_run
//! use entity_storage::{DataSourceExt, DataSourceRegistry, MayEntity, Search, Storable};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct User {
//!     name: String,
//! }
//!
//! impl Storable for User {
//!     const TYPE_NAME: &'static str = "user";
//! }
//!
//! # async fn example(registry: &DataSourceRegistry) -> entity_storage::Result<()> {
//! let source = registry.data_source(None).await?;
//! let users = source.repository::<User>();
//!
//! let ada = users
//!     .save(MayEntity::unconnected(User { name: "Ada".into() }))
//!     .await?;
//! let found = users.search_one(Search::new().with("name", "Ada")).await?;
//! assert_eq!(found.map(|user| user.id), Some(ada.id));
//! # Ok(())
//! # }
//! ```

use crate::entity::{Entity, MayEntity, Record};
use crate::error::{Result, StorageError};
use crate::identifier::Identifier;
use crate::option::Options;
use crate::search::Search;
use crate::traits::{DataSource, Storable, TypeRef};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::marker::PhantomData;
use tracing::debug;

/// Convert a value into the record shape engines receive
pub fn to_record<T: Serialize>(value: &T) -> Result<Record> {
    match serde_json::to_value(value)? {
        Value::Object(record) => Ok(record),
        other => Err(StorageError::InvalidData(format!(
            "stored values must serialize to an object, got {}",
            other
        ))),
    }
}

/// Convert a record returned by an engine back into a value
pub fn from_record<T: DeserializeOwned>(record: Record) -> Result<T> {
    serde_json::from_value(Value::Object(record)).map_err(|e| {
        debug!("Failed to convert record: {}", e);
        StorageError::Serialization(e)
    })
}

/// Typed facade over a data source, bound to one stored type
pub struct Repository<'a, T, S: ?Sized = dyn DataSource> {
    source: &'a S,
    type_ref: TypeRef,
    _marker: PhantomData<fn() -> T>,
}

impl<'a, T: Storable, S: DataSource + ?Sized> Repository<'a, T, S> {
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            type_ref: TypeRef::of::<T>(),
            _marker: PhantomData,
        }
    }

    pub fn type_ref(&self) -> &TypeRef {
        &self.type_ref
    }

    pub fn source(&self) -> &'a S {
        self.source
    }

    pub async fn read(&self, id: impl Into<Identifier>) -> Result<Entity<T>> {
        let entity = self.source.read(&self.type_ref, &id.into()).await?;
        entity.try_map(from_record)
    }

    pub async fn read_multiple(&self, ids: &[Identifier]) -> Result<Vec<Entity<T>>> {
        let entities = self.source.read_multiple(&self.type_ref, ids).await?;
        entities
            .into_iter()
            .map(|entity| entity.try_map(from_record))
            .collect()
    }

    /// Related records of the to-many `property`, as `PT`
    pub async fn read_collection<PT: Storable>(
        &self,
        object: &Entity<T>,
        property: &str,
    ) -> Result<Vec<Entity<PT>>> {
        let owner = to_entity_record(object)?;
        let related = TypeRef::of::<PT>();
        let entities = self
            .source
            .read_collection(&self.type_ref, &owner, property, Some(&related))
            .await?;
        entities
            .into_iter()
            .map(|entity| entity.try_map(from_record))
            .collect()
    }

    pub async fn read_collection_ids(
        &self,
        object: &Entity<T>,
        property: &str,
        related: Option<&TypeRef>,
    ) -> Result<Vec<Identifier>> {
        let owner = to_entity_record(object)?;
        self.source
            .read_collection_ids(&self.type_ref, &owner, property, related)
            .await
    }

    pub async fn search(&self, search: impl Into<Option<Search>>) -> Result<Vec<Entity<T>>> {
        self.search_with(search, &Options::new()).await
    }

    pub async fn search_with(
        &self,
        search: impl Into<Option<Search>>,
        options: &Options,
    ) -> Result<Vec<Entity<T>>> {
        let search = search.into().unwrap_or_default();
        let entities = self.source.search(&self.type_ref, &search, options).await?;
        entities
            .into_iter()
            .map(|entity| entity.try_map(from_record))
            .collect()
    }

    pub async fn search_one(&self, search: impl Into<Option<Search>>) -> Result<Option<Entity<T>>> {
        let search = search.into().unwrap_or_default();
        let entity = self
            .source
            .search_one(&self.type_ref, &search, &Options::new())
            .await?;
        entity.map(|entity| entity.try_map(from_record)).transpose()
    }

    pub async fn save(&self, object: MayEntity<T>) -> Result<Entity<T>> {
        let record = object.try_map(|value| to_record(&value))?;
        let saved = self.source.save(&self.type_ref, record).await?;
        saved.try_map(from_record)
    }

    /// Remove the record, or only `property` of it. A property removal that
    /// would leave a value `T` cannot be read back from is rejected before
    /// the engine is called.
    pub async fn delete(&self, object: Entity<T>, property: Option<&str>) -> Result<T> {
        let record = object.try_map(|value| to_record(&value))?;
        if let Some(property) = property {
            let mut remaining = record.value.clone();
            remaining.remove(property);
            from_record::<T>(remaining).map_err(|e| {
                StorageError::InvalidData(format!(
                    "removing {} would leave an unreadable {}: {}",
                    property, self.type_ref, e
                ))
            })?;
        }
        let deleted = self.source.delete(&self.type_ref, record, property).await?;
        from_record(deleted)
    }

    pub async fn delete_id(&self, id: impl Into<Identifier>, property: Option<&str>) -> Result<()> {
        self.source
            .delete_id(&self.type_ref, &id.into(), property)
            .await
    }

    pub fn insert_link(
        &self,
        object: &Entity<T>,
        property: &str,
        id: impl Into<Identifier>,
    ) -> Result<()> {
        let owner = to_entity_record(object)?;
        self.source
            .insert_link(&self.type_ref, &owner, property, &id.into())
    }

    pub fn delete_link(
        &self,
        object: &Entity<T>,
        property: &str,
        id: impl Into<Identifier>,
    ) -> Result<()> {
        let owner = to_entity_record(object)?;
        self.source
            .delete_link(&self.type_ref, &owner, property, &id.into())
    }
}

fn to_entity_record<T: Serialize>(object: &Entity<T>) -> Result<Entity<Record>> {
    Ok(Entity::new(object.id.clone(), to_record(&object.value)?))
}

/// Typed entry points on any data source
pub trait DataSourceExt: DataSource {
    fn repository<T: Storable>(&self) -> Repository<'_, T, Self> {
        Repository::new(self)
    }
}

impl<S: DataSource + ?Sized> DataSourceExt for S {}
