use crate::entity::{self, Entity, MayEntity, Record};
use crate::error::Result;
use crate::identifier::Identifier;
use crate::option::Options;
use crate::search::Search;
use async_trait::async_trait;
use downcast_rs::{impl_downcast, Downcast};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Runtime name of a stored type (table, collection, key prefix, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeRef {
    name: String,
}

impl TypeRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn of<T: Storable>() -> Self {
        Self::new(T::TYPE_NAME)
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A domain type that can be stored through a [`DataSource`]
///
/// Values travel to engines as JSON objects, so implementors must serialize
/// to a map and must not declare their own `id` field.
pub trait Storable: Serialize + DeserializeOwned + Send + Sync {
    const TYPE_NAME: &'static str;
}

/// Contract every storage engine implements
///
/// Engines work on [`Record`]s; typed access goes through
/// [`crate::Repository`]. Failure kinds (not found, conflicts, lost
/// connections) are the engine's to choose among [`crate::StorageError`]
/// variants.
#[async_trait]
pub trait DataSource: Send + Sync + Downcast {
    /// Name of the engine behind this source
    fn engine(&self) -> &'static str;

    /// Attach `id` to `object`
    fn connect_object(&self, object: MayEntity<Record>, id: Identifier) -> Entity<Record> {
        entity::connect_object(object, id)
    }

    /// Detach the identifier from `object`
    fn disconnect_object(&self, object: Entity<Record>) -> Record {
        entity::disconnect_object(object)
    }

    fn is_object_connected(&self, object: &MayEntity<Record>) -> bool {
        entity::is_object_connected(object)
    }

    /// Fetch one record. Fails with `NotFound` when absent.
    async fn read(&self, type_ref: &TypeRef, id: &Identifier) -> Result<Entity<Record>>;

    /// Fetch several records by identifier. Ordering and handling of
    /// missing identifiers must be documented by each engine.
    async fn read_multiple(
        &self,
        type_ref: &TypeRef,
        ids: &[Identifier],
    ) -> Result<Vec<Entity<Record>>>;

    /// Fetch the records of a to-many relationship `property` of `object`
    async fn read_collection(
        &self,
        type_ref: &TypeRef,
        object: &Entity<Record>,
        property: &str,
        related: Option<&TypeRef>,
    ) -> Result<Vec<Entity<Record>>>;

    /// Identifiers of a to-many relationship, without loading the records
    async fn read_collection_ids(
        &self,
        type_ref: &TypeRef,
        object: &Entity<Record>,
        property: &str,
        related: Option<&TypeRef>,
    ) -> Result<Vec<Identifier>>;

    /// All records of `type_ref` matching `search`. An empty search matches all.
    async fn search(
        &self,
        type_ref: &TypeRef,
        search: &Search,
        options: &Options,
    ) -> Result<Vec<Entity<Record>>>;

    /// First record `search` would return
    async fn search_one(
        &self,
        type_ref: &TypeRef,
        search: &Search,
        options: &Options,
    ) -> Result<Option<Entity<Record>>> {
        Ok(self.search(type_ref, search, options).await?.into_iter().next())
    }

    /// Insert when unconnected, update when connected
    async fn save(&self, type_ref: &TypeRef, object: MayEntity<Record>) -> Result<Entity<Record>>;

    /// Remove the record, or only `property` of it when given.
    /// Returns the value, disconnected.
    async fn delete(
        &self,
        type_ref: &TypeRef,
        object: Entity<Record>,
        property: Option<&str>,
    ) -> Result<Record>;

    /// Like [`DataSource::delete`] without a loaded object
    async fn delete_id(
        &self,
        type_ref: &TypeRef,
        id: &Identifier,
        property: Option<&str>,
    ) -> Result<()>;

    /// Add one related identifier to a to-many relationship. Engines may
    /// stage links until the next save.
    fn insert_link(
        &self,
        type_ref: &TypeRef,
        object: &Entity<Record>,
        property: &str,
        id: &Identifier,
    ) -> Result<()>;

    /// Remove one related identifier from a to-many relationship
    fn delete_link(
        &self,
        type_ref: &TypeRef,
        object: &Entity<Record>,
        property: &str,
        id: &Identifier,
    ) -> Result<()>;

    /// Release connections and other engine resources
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

impl_downcast!(DataSource);
