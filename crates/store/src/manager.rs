use crate::cache::ListingCache;
use crate::client::{ParameterStore, PutRequest, PutResult};
use crate::config::StoreConfig;
use crate::error::{Result, StoreError};
use crate::lister::PaginatedLister;
use crate::param::{normalize_all, NormalizedParam, ParamMap, ParamType, RawParameter};
use crate::path::PathBuilder;
use crate::tree::{build_frequency, build_tree, FrequencyMap, ParamTree};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A single parameter to write under `<env>/<service>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamWrite {
    pub key: String,
    pub value: String,
    pub param_type: ParamType,
    pub overwrite: bool,
}

/// Reads and writes parameters under one base path.
///
/// Owns the path builder and the listing cache, so every cached listing is
/// keyed by paths built from the same base.
pub struct ParamManager<S: ?Sized> {
    store: Arc<S>,
    paths: PathBuilder,
    cache: ListingCache,
    page_size: Option<usize>,
}

impl<S: ParameterStore + ?Sized + 'static> ParamManager<S> {
    pub fn new(store: Arc<S>, config: StoreConfig) -> Self {
        Self {
            store,
            paths: PathBuilder::new(config.base_path),
            cache: ListingCache::new(config.cache_capacity),
            page_size: config.page_size,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn paths(&self) -> &PathBuilder {
        &self.paths
    }

    pub fn cache(&self) -> &ListingCache {
        &self.cache
    }

    pub fn path(&self, env: Option<&str>, service: Option<&str>, name: Option<&str>) -> String {
        self.paths.build(env, service, name)
    }

    /// Recursive listing of everything under `path`.
    pub async fn list(&self, path: &str, decrypt: bool) -> Result<Vec<RawParameter>> {
        PaginatedLister::new(self.store.as_ref())
            .with_page_size(self.page_size)
            .list_all(path, true, decrypt)
            .await
    }

    pub async fn get_parameter(
        &self,
        env: &str,
        service: &str,
        name: &str,
        decrypt: bool,
    ) -> Result<Option<NormalizedParam>> {
        let path = self.path(Some(env), Some(service), Some(name));
        log::debug!("Getting parameter {path}");
        let raw = self
            .store
            .get_parameter(&path, decrypt)
            .await
            .map_err(|err| StoreError::list_failure(&path, err))?;
        let Some(raw) = raw else {
            return Ok(None);
        };
        match NormalizedParam::from_raw(&raw) {
            Ok(param) => Ok(Some(param)),
            Err(err) => {
                log::warn!("Skipping store entry for {path}: {err}");
                Ok(None)
            }
        }
    }

    /// Every parameter under `<env>/<service>`, keyed by short name.
    ///
    /// The first call per path hits the store; later calls are served from the cache.
    pub async fn get_parameters_by_service(
        &self,
        env: &str,
        service: &str,
        decrypt: bool,
    ) -> Result<Arc<ParamMap>> {
        let path = self.path(Some(env), Some(service), None);
        log::info!("Getting parameters from {path}");
        let listing_path = path.as_str();
        self.cache
            .get_or_fetch(&cache_key(&path, decrypt), move || async move {
                let entries = self.list(listing_path, decrypt).await?;
                Ok(normalize_all(&entries))
            })
            .await
    }

    pub async fn set_parameter(
        &self,
        write: &ParamWrite,
        env: &str,
        service: &str,
    ) -> Result<PutResult> {
        let name = self.path(Some(env), Some(service), Some(&write.key));
        put_one(self.store.as_ref(), &name, write).await
    }

    /// Put every write concurrently; results come back in input order.
    ///
    /// A failed put does not roll back the ones that succeeded.
    pub async fn set_parameters_by_service(
        &self,
        writes: Vec<ParamWrite>,
        env: &str,
        service: &str,
    ) -> Vec<Result<PutResult>> {
        log::info!(
            "Saving {} parameters to {}",
            writes.len(),
            self.path(Some(env), Some(service), None)
        );
        let handles: Vec<_> = writes
            .into_iter()
            .map(|write| {
                let store = Arc::clone(&self.store);
                let name = self.path(Some(env), Some(service), Some(&write.key));
                tokio::spawn(async move { put_one(store.as_ref(), &name, &write).await })
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            results.push(match handle.await {
                Ok(result) => result,
                Err(err) => Err(StoreError::Other(format!("Put task failed: {err}"))),
            });
        }
        results
    }

    /// Parameter count per environment under the base path.
    pub async fn get_environments(&self) -> Result<FrequencyMap> {
        let root = self.paths.root();
        log::info!("Getting environments descending from {root}");
        let entries = self.list(&root, false).await?;
        Ok(build_frequency(&entries, self.paths.layout().environment_index()))
    }

    /// Parameter count per service inside `env`.
    pub async fn get_services_for_environment(&self, env: &str) -> Result<FrequencyMap> {
        let path = self.path(Some(env), None, None);
        log::info!("Getting services descending from the environment {path}");
        let entries = self.list(&path, false).await?;
        Ok(build_frequency(&entries, self.paths.layout().service_index()))
    }

    /// Every parameter under the base path, grouped by environment and service.
    pub async fn get_all_params(&self, decrypt: bool) -> Result<ParamTree> {
        let root = self.paths.root();
        log::info!("Getting all parameters under {root}");
        let entries = self.list(&root, decrypt).await?;
        Ok(build_tree(&entries, &self.paths.layout()))
    }
}

fn cache_key(path: &str, decrypt: bool) -> String {
    if decrypt {
        format!("{path}#decrypted")
    } else {
        path.to_string()
    }
}

async fn put_one<S: ParameterStore + ?Sized>(
    store: &S,
    name: &str,
    write: &ParamWrite,
) -> Result<PutResult> {
    let request = PutRequest {
        name: name.to_string(),
        value: write.value.clone(),
        param_type: write.param_type,
        overwrite: write.overwrite,
    };
    let result = store
        .put_parameter(&request)
        .await
        .map_err(|err| StoreError::write_failure(name, err))?;
    log::debug!("Put {name} (version {}, tier {})", result.version, result.tier);
    Ok(result)
}
