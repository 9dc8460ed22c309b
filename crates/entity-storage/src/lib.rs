//! # entity-storage
//!
//! Storage-engine agnostic entity access.
//!
//! Application code reads, saves, searches and deletes entities through the
//! [`DataSource`] contract without knowing which engine stores them. Engines
//! (SQL, document stores, key-value stores, ...) live in their own crates and
//! plug in through an [`EngineFactory`] registered on a [`DataSourceRegistry`].
//!
//! ## Architecture
//!
//! - **Identifier / Entity / MayEntity**: a domain value is *connected* once
//!   storage has given it an identifier
//! - **DataSource**: object-safe contract every engine implements, on
//!   JSON [`Record`]s
//! - **Repository**: typed facade converting [`Storable`] values to records
//! - **Search / Options**: criteria and open-ended query modifiers
//!   ([`Sort`], [`Limit`])
//! - **DataSourceRegistry**: engine factories plus named data source instances
//!
//! ## Example
//!
//! ```rust,no_run
//! use entity_storage::{DataSourceConfig, DataSourceRegistry};
//!
//! # async fn example(engine: std::sync::Arc<dyn entity_storage::EngineFactory>)
//! #     -> entity_storage::Result<()> {
//! let registry = DataSourceRegistry::new();
//! registry.register_engine(engine).await;
//!
//! let config = DataSourceConfig::from_json_str(
//!     r#"{"engine": "postgres", "url": "postgres://localhost/app"}"#,
//! )?;
//! registry.create_data_source(config, None).await?;
//!
//! let source = registry.ds(None).await?;
//! println!("using {}", source.engine());
//! # Ok(())
//! # }
//! ```
//!
//! ## Engine Implementation
//!
//! To implement a new engine:
//!
//! 1. Create a struct that implements `DataSource`
//! 2. Parse its settings with [`config::parse_options`]
//! 3. Create an `EngineFactory` (or a closure via `register_engine_fn`)
//! 4. Register the factory with `DataSourceRegistry` at start-up

pub mod config;
pub mod entity;
pub mod error;
pub mod identifier;
pub mod option;
pub mod registry;
pub mod repository;
pub mod search;
pub mod traits;

// Re-export commonly used items
pub use config::{DataSourceConfig, DataSourcesConfig, EngineOptions, DEFAULT_DATA_SOURCE};
pub use entity::{
    connect_object, disconnect_object, is_object_connected, Entity, MayEntity, Record,
};
pub use error::{Result, StorageError};
pub use identifier::Identifier;
pub use option::{Limit, Options, PropertyPath, QueryOption, Sort};
pub use registry::{DataSourceRegistry, EngineFactory, FnEngineFactory};
pub use repository::{DataSourceExt, Repository};
pub use search::Search;
pub use traits::{DataSource, Storable, TypeRef};
