use crate::config::{DataSourceConfig, DataSourcesConfig, EngineOptions, DEFAULT_DATA_SOURCE};
use crate::error::{Result, StorageError};
use crate::traits::DataSource;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Factory trait for creating data sources of one engine
pub trait EngineFactory: Send + Sync {
    /// Engine identifier matched against `DataSourceConfig::engine`
    fn engine(&self) -> &str;

    /// Create a data source from the engine's options
    fn create(&self, options: EngineOptions) -> Result<Arc<dyn DataSource>>;
}

/// Engine factory backed by a closure
pub struct FnEngineFactory<F> {
    engine: String,
    create: F,
}

impl<F> FnEngineFactory<F>
where
    F: Fn(EngineOptions) -> Result<Arc<dyn DataSource>> + Send + Sync,
{
    pub fn new(engine: impl Into<String>, create: F) -> Self {
        Self {
            engine: engine.into(),
            create,
        }
    }
}

impl<F> EngineFactory for FnEngineFactory<F>
where
    F: Fn(EngineOptions) -> Result<Arc<dyn DataSource>> + Send + Sync,
{
    fn engine(&self) -> &str {
        &self.engine
    }

    fn create(&self, options: EngineOptions) -> Result<Arc<dyn DataSource>> {
        (self.create)(options)
    }
}

/// Registry of engine factories and the named data sources built from them
#[derive(Clone)]
pub struct DataSourceRegistry {
    engines: Arc<RwLock<HashMap<String, Arc<dyn EngineFactory>>>>,
    sources: Arc<RwLock<HashMap<String, Arc<dyn DataSource>>>>,
}

impl DataSourceRegistry {
    pub fn new() -> Self {
        Self {
            engines: Arc::new(RwLock::new(HashMap::new())),
            sources: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Register a factory for an engine
    pub async fn register_engine(&self, factory: Arc<dyn EngineFactory>) {
        let engine = factory.engine().to_string();
        let mut engines = self.engines.write().await;

        if engines.contains_key(&engine) {
            warn!("Overwriting existing factory for engine: {}", engine);
        }

        debug!("Registered factory for engine: {}", engine);
        engines.insert(engine, factory);
    }

    /// Register a closure as the factory for `engine`
    pub async fn register_engine_fn<F>(&self, engine: impl Into<String>, create: F)
    where
        F: Fn(EngineOptions) -> Result<Arc<dyn DataSource>> + Send + Sync + 'static,
    {
        self.register_engine(Arc::new(FnEngineFactory::new(engine, create)))
            .await
    }

    /// Check if an engine is registered
    pub async fn has_engine(&self, engine: &str) -> bool {
        self.engines.read().await.contains_key(engine)
    }

    /// List registered engines, sorted
    pub async fn list_engines(&self) -> Vec<String> {
        let engines = self.engines.read().await;
        let mut names: Vec<String> = engines.keys().cloned().collect();
        names.sort();
        names
    }

    /// Build a data source and store it under `name` (default `"main"`).
    ///
    /// An existing source with the same name is replaced without being closed.
    pub async fn create_data_source(
        &self,
        config: DataSourceConfig,
        name: Option<&str>,
    ) -> Result<Arc<dyn DataSource>> {
        let name = name.unwrap_or(DEFAULT_DATA_SOURCE);
        let (engine, options) = config.into_parts();

        let engines = self.engines.read().await;
        let factory = engines
            .get(&engine)
            .ok_or_else(|| StorageError::UnknownEngine(engine.clone()))?
            .clone();
        drop(engines);

        debug!("Creating data source {} for engine: {}", name, engine);

        let source = factory.create(options)?;

        let mut sources = self.sources.write().await;
        if sources.insert(name.to_string(), source.clone()).is_some() {
            warn!("Replaced existing data source: {}", name);
        }

        Ok(source)
    }

    /// Build every configured data source, in name order. Stops at the first failure.
    pub async fn create_data_sources(&self, config: DataSourcesConfig) -> Result<Vec<String>> {
        let mut created = Vec::with_capacity(config.sources.len());

        for (name, source_config) in config.sources {
            self.create_data_source(source_config, Some(&name)).await?;
            created.push(name);
        }

        Ok(created)
    }

    /// Look up a data source (default `"main"`)
    pub async fn data_source(&self, name: Option<&str>) -> Result<Arc<dyn DataSource>> {
        let name = name.unwrap_or(DEFAULT_DATA_SOURCE);
        let sources = self.sources.read().await;
        sources
            .get(name)
            .cloned()
            .ok_or_else(|| StorageError::UnknownDataSource(name.to_string()))
    }

    /// Short alias of [`DataSourceRegistry::data_source`]
    pub async fn ds(&self, name: Option<&str>) -> Result<Arc<dyn DataSource>> {
        self.data_source(name).await
    }

    pub async fn contains(&self, name: &str) -> bool {
        self.sources.read().await.contains_key(name)
    }

    /// List registered data source names, sorted
    pub async fn list_data_sources(&self) -> Vec<String> {
        let sources = self.sources.read().await;
        let mut names: Vec<String> = sources.keys().cloned().collect();
        names.sort();
        names
    }

    /// Unregister a data source and close it
    pub async fn remove_data_source(&self, name: &str) -> Result<()> {
        let removed = self.sources.write().await.remove(name);

        match removed {
            Some(source) => {
                debug!("Closing data source: {}", name);
                source.close().await
            }
            None => Err(StorageError::UnknownDataSource(name.to_string())),
        }
    }

    /// Unregister and close every data source, reporting the first close failure
    pub async fn close_all(&self) -> Result<()> {
        let drained: Vec<(String, Arc<dyn DataSource>)> =
            self.sources.write().await.drain().collect();

        let mut first_error = None;
        for (name, source) in drained {
            debug!("Closing data source: {}", name);
            if let Err(e) = source.close().await {
                warn!("Failed to close data source {}: {}", name, e);
                first_error.get_or_insert(e);
            }
        }

        first_error.map_or(Ok(()), Err)
    }
}

impl Default for DataSourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
