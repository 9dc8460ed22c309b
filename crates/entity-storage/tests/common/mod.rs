//! HashMap-backed engine shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use entity_storage::{
    DataSource, Entity, EngineOptions, Identifier, Limit, MayEntity, Options, Record, Search,
    Sort, StorageError, TypeRef,
};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex};

type LinkKey = (String, Identifier, String);

pub struct MemoryEngine {
    pub options: EngineOptions,
    next_id: AtomicU64,
    tables: Mutex<HashMap<String, Vec<Entity<Record>>>>,
    links: Mutex<HashMap<LinkKey, Vec<Identifier>>>,
    pub searches: AtomicUsize,
    closed: AtomicBool,
}

impl MemoryEngine {
    pub fn new(options: EngineOptions) -> Self {
        Self {
            options,
            next_id: AtomicU64::new(1),
            tables: Mutex::new(HashMap::new()),
            links: Mutex::new(HashMap::new()),
            searches: AtomicUsize::new(0),
            closed: AtomicBool::new(false),
        }
    }

    pub fn shared(options: EngineOptions) -> Arc<dyn DataSource> {
        Arc::new(Self::new(options))
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(AtomicOrdering::SeqCst)
    }

    pub fn search_count(&self) -> usize {
        self.searches.load(AtomicOrdering::SeqCst)
    }

    fn link_key(type_ref: &TypeRef, object: &Entity<Record>, property: &str) -> LinkKey {
        (
            type_ref.name().to_string(),
            object.id.clone(),
            property.to_string(),
        )
    }

    fn find(&self, type_ref: &TypeRef, id: &Identifier) -> Option<Entity<Record>> {
        let tables = self.tables.lock().unwrap();
        tables
            .get(type_ref.name())
            .and_then(|rows| rows.iter().find(|row| &row.id == id).cloned())
    }

    fn remove_links(&self, type_name: &str, id: &Identifier, property: Option<&str>) {
        self.links.lock().unwrap().retain(|(t, i, p), _| {
            !(t == type_name && i == id && property.map_or(true, |property| property == p))
        });
    }
}

fn matches_search(record: &Record, search: &Search) -> bool {
    search
        .iter()
        .all(|(property, criterion)| record.get(property) == Some(criterion))
}

fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

#[async_trait]
impl DataSource for MemoryEngine {
    fn engine(&self) -> &'static str {
        "memory"
    }

    async fn read(
        &self,
        type_ref: &TypeRef,
        id: &Identifier,
    ) -> entity_storage::Result<Entity<Record>> {
        self.find(type_ref, id)
            .ok_or_else(|| StorageError::not_found(type_ref.name(), id))
    }

    /// Keeps the requested order and skips missing identifiers
    async fn read_multiple(
        &self,
        type_ref: &TypeRef,
        ids: &[Identifier],
    ) -> entity_storage::Result<Vec<Entity<Record>>> {
        Ok(ids.iter().filter_map(|id| self.find(type_ref, id)).collect())
    }

    async fn read_collection(
        &self,
        type_ref: &TypeRef,
        object: &Entity<Record>,
        property: &str,
        related: Option<&TypeRef>,
    ) -> entity_storage::Result<Vec<Entity<Record>>> {
        let ids = self
            .read_collection_ids(type_ref, object, property, related)
            .await?;
        let related = related.cloned().unwrap_or_else(|| TypeRef::new(property));
        self.read_multiple(&related, &ids).await
    }

    async fn read_collection_ids(
        &self,
        type_ref: &TypeRef,
        object: &Entity<Record>,
        property: &str,
        _related: Option<&TypeRef>,
    ) -> entity_storage::Result<Vec<Identifier>> {
        let links = self.links.lock().unwrap();
        Ok(links
            .get(&Self::link_key(type_ref, object, property))
            .cloned()
            .unwrap_or_default())
    }

    async fn search(
        &self,
        type_ref: &TypeRef,
        search: &Search,
        options: &Options,
    ) -> entity_storage::Result<Vec<Entity<Record>>> {
        self.searches.fetch_add(1, AtomicOrdering::SeqCst);

        let mut found: Vec<Entity<Record>> = {
            let tables = self.tables.lock().unwrap();
            tables
                .get(type_ref.name())
                .map(|rows| {
                    rows.iter()
                        .filter(|row| matches_search(&row.value, search))
                        .cloned()
                        .collect()
                })
                .unwrap_or_default()
        };

        if let Some(sort) = options.get::<Sort>() {
            found.sort_by(|a, b| {
                sort.properties
                    .iter()
                    .map(|path| {
                        let ordering =
                            compare(a.value.get(path.property()), b.value.get(path.property()));
                        if path.is_reverse() {
                            ordering.reverse()
                        } else {
                            ordering
                        }
                    })
                    .find(|ordering| *ordering != Ordering::Equal)
                    .unwrap_or(Ordering::Equal)
            });
        }

        if let Some(limit) = options.get::<Limit>() {
            found = limit.apply(found);
        }

        Ok(found)
    }

    async fn save(
        &self,
        type_ref: &TypeRef,
        object: MayEntity<Record>,
    ) -> entity_storage::Result<Entity<Record>> {
        let entity = match object {
            MayEntity::Connected(entity) if !entity.id.is_empty() => entity,
            unconnected => {
                let id = self.next_id.fetch_add(1, AtomicOrdering::SeqCst);
                self.connect_object(unconnected, Identifier::from(id))
            }
        };

        let mut tables = self.tables.lock().unwrap();
        let rows = tables.entry(type_ref.name().to_string()).or_default();
        match rows.iter_mut().find(|row| row.id == entity.id) {
            Some(row) => *row = entity.clone(),
            None => rows.push(entity.clone()),
        }

        Ok(entity)
    }

    async fn delete(
        &self,
        type_ref: &TypeRef,
        object: Entity<Record>,
        property: Option<&str>,
    ) -> entity_storage::Result<Record> {
        self.delete_id(type_ref, &object.id, property).await?;

        let mut value = self.disconnect_object(object);
        if let Some(property) = property {
            value.remove(property);
        }
        Ok(value)
    }

    async fn delete_id(
        &self,
        type_ref: &TypeRef,
        id: &Identifier,
        property: Option<&str>,
    ) -> entity_storage::Result<()> {
        {
            let mut tables = self.tables.lock().unwrap();
            let rows = tables
                .get_mut(type_ref.name())
                .ok_or_else(|| StorageError::not_found(type_ref.name(), id))?;
            let position = rows
                .iter()
                .position(|row| &row.id == id)
                .ok_or_else(|| StorageError::not_found(type_ref.name(), id))?;

            match property {
                Some(property) => {
                    rows[position].value.remove(property);
                }
                None => {
                    rows.remove(position);
                }
            }
        }

        self.remove_links(type_ref.name(), id, property);
        Ok(())
    }

    fn insert_link(
        &self,
        type_ref: &TypeRef,
        object: &Entity<Record>,
        property: &str,
        id: &Identifier,
    ) -> entity_storage::Result<()> {
        let mut links = self.links.lock().unwrap();
        let ids = links
            .entry(Self::link_key(type_ref, object, property))
            .or_default();
        if !ids.contains(id) {
            ids.push(id.clone());
        }
        Ok(())
    }

    fn delete_link(
        &self,
        type_ref: &TypeRef,
        object: &Entity<Record>,
        property: &str,
        id: &Identifier,
    ) -> entity_storage::Result<()> {
        let mut links = self.links.lock().unwrap();
        if let Some(ids) = links.get_mut(&Self::link_key(type_ref, object, property)) {
            ids.retain(|linked| linked != id);
        }
        Ok(())
    }

    async fn close(&self) -> entity_storage::Result<()> {
        self.closed.store(true, AtomicOrdering::SeqCst);
        Ok(())
    }
}

/// Route `tracing` output to the test harness; `RUST_LOG=debug` shows registry activity
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn record(value: Value) -> Record {
    match value {
        Value::Object(record) => record,
        other => panic!("expected an object, got {}", other),
    }
}
