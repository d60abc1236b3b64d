use crate::client::{ListPage, ListRequest, ParameterStore, PutRequest, PutResult};
use crate::config::DEFAULT_PAGE_SIZE;
use crate::error::BackendError;
use crate::param::RawParameter;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Error, Debug)]
pub enum MemoryStoreError {
    #[error("Parameter already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid continuation token: {0}")]
    InvalidToken(String),
}

/// Ordered in-process parameter store.
///
/// Pages are `page_size` entries long and the continuation token is the
/// offset of the next page. The decryption flag is accepted and ignored.
#[derive(Debug)]
pub struct MemoryStore {
    params: RwLock<BTreeMap<String, RawParameter>>,
    page_size: usize,
    list_calls: AtomicUsize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_parameters(Vec::new())
    }

    pub fn with_parameters(params: impl IntoIterator<Item = RawParameter>) -> Self {
        Self {
            params: RwLock::new(params.into_iter().map(|p| (p.name.clone(), p)).collect()),
            page_size: DEFAULT_PAGE_SIZE,
            list_calls: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Number of `list_by_path` calls served so far.
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::Relaxed)
    }

    /// All parameters ordered by name.
    pub async fn snapshot(&self) -> Vec<RawParameter> {
        self.params.read().await.values().cloned().collect()
    }

    /// Put `name` back to `previous`, removing it when there was none.
    pub(crate) async fn restore(&self, name: &str, previous: Option<RawParameter>) {
        let mut params = self.params.write().await;
        match previous {
            Some(param) => params.insert(name.to_string(), param),
            None => params.remove(name),
        };
    }

    pub async fn len(&self) -> usize {
        self.params.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.params.read().await.is_empty()
    }
}

#[async_trait]
impl ParameterStore for MemoryStore {
    async fn list_by_path(&self, request: &ListRequest) -> Result<ListPage, BackendError> {
        self.list_calls.fetch_add(1, Ordering::Relaxed);

        let offset = match request.next_token.as_deref() {
            None => 0,
            Some(token) => token
                .parse::<usize>()
                .map_err(|_| MemoryStoreError::InvalidToken(token.to_string()))?,
        };

        let prefix = format!("{}/", request.path.trim_end_matches('/'));
        let params = self.params.read().await;
        let matching: Vec<&RawParameter> = params
            .range(prefix.clone()..)
            .take_while(|(name, _)| name.starts_with(&prefix))
            .filter(|(name, _)| request.recursive || !name[prefix.len()..].contains('/'))
            .map(|(_, param)| param)
            .collect();

        let page = request.max_results.unwrap_or(self.page_size).max(1);
        let end = offset.saturating_add(page).min(matching.len());
        let parameters = matching
            .get(offset.min(end)..end)
            .unwrap_or_default()
            .iter()
            .map(|p| (*p).clone())
            .collect();
        let next_token = (end < matching.len()).then(|| end.to_string());

        Ok(ListPage {
            parameters,
            next_token,
        })
    }

    async fn get_parameter(
        &self,
        name: &str,
        _with_decryption: bool,
    ) -> Result<Option<RawParameter>, BackendError> {
        Ok(self.params.read().await.get(name).cloned())
    }

    async fn put_parameter(&self, request: &PutRequest) -> Result<PutResult, BackendError> {
        let mut params = self.params.write().await;
        let version = match params.get(&request.name) {
            Some(_) if !request.overwrite => {
                return Err(MemoryStoreError::AlreadyExists(request.name.clone()).into());
            }
            Some(existing) => existing.version + 1,
            None => 1,
        };
        params.insert(
            request.name.clone(),
            RawParameter {
                name: request.name.clone(),
                value: request.value.clone(),
                version,
                last_modified_ms: unix_ms_now(),
                type_tag: request.param_type.tag().to_string(),
            },
        );
        Ok(PutResult {
            version,
            tier: "Standard".to_string(),
        })
    }
}

fn unix_ms_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param::{ParamType, PLAIN_TAG};

    fn raw(name: &str) -> RawParameter {
        RawParameter {
            name: name.to_string(),
            value: format!("value of {name}"),
            version: 1,
            last_modified_ms: 0,
            type_tag: PLAIN_TAG.to_string(),
        }
    }

    fn request(path: &str, recursive: bool) -> ListRequest {
        ListRequest {
            path: path.to_string(),
            recursive,
            with_decryption: false,
            next_token: None,
            max_results: None,
        }
    }

    fn names(page: &ListPage) -> Vec<&str> {
        page.parameters.iter().map(|p| p.name.as_str()).collect()
    }

    #[tokio::test]
    async fn non_recursive_lists_direct_children_only() {
        let store = MemoryStore::with_parameters([
            raw("/org/prod/api/A"),
            raw("/org/prod/B"),
            raw("/org/prodx/C"),
        ]);
        let page = store.list_by_path(&request("/org/prod", false)).await.unwrap();
        assert_eq!(names(&page), vec!["/org/prod/B"]);

        let page = store.list_by_path(&request("/org/prod", true)).await.unwrap();
        assert_eq!(names(&page), vec!["/org/prod/B", "/org/prod/api/A"]);
    }

    #[tokio::test]
    async fn root_path_lists_everything() {
        let store = MemoryStore::with_parameters([raw("/a/b"), raw("/c/d/e")]);
        let page = store.list_by_path(&request("/", true)).await.unwrap();
        assert_eq!(page.parameters.len(), 2);
        assert_eq!(store.list_calls(), 1);
    }

    #[tokio::test]
    async fn pages_carry_offset_tokens() {
        let store = MemoryStore::with_parameters((0..5).map(|i| raw(&format!("/x/K{i}"))))
            .with_page_size(2);
        let first = store.list_by_path(&request("/x", true)).await.unwrap();
        assert_eq!(first.next_token.as_deref(), Some("2"));

        let mut next = request("/x", true);
        next.next_token = Some("4".to_string());
        let last = store.list_by_path(&next).await.unwrap();
        assert_eq!(names(&last), vec!["/x/K4"]);
        assert!(last.next_token.is_none());

        next.next_token = Some("bogus".to_string());
        assert!(store.list_by_path(&next).await.is_err());
    }

    #[tokio::test]
    async fn put_respects_overwrite_flag() {
        let store = MemoryStore::new();
        let mut put = PutRequest {
            name: "/org/dev/web/PORT".to_string(),
            value: "80".to_string(),
            param_type: ParamType::Plain,
            overwrite: false,
        };
        assert_eq!(store.put_parameter(&put).await.unwrap().version, 1);
        assert!(store.put_parameter(&put).await.is_err());

        put.overwrite = true;
        put.value = "8080".to_string();
        put.param_type = ParamType::Secret;
        let result = store.put_parameter(&put).await.unwrap();
        assert_eq!(result.version, 2);
        assert_eq!(result.tier, "Standard");

        let stored = store.get_parameter("/org/dev/web/PORT", true).await.unwrap().unwrap();
        assert_eq!(stored.value, "8080");
        assert_eq!(stored.type_tag, "SecureString");
    }
}
