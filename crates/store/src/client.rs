use crate::error::BackendError;
use crate::param::{ParamType, RawParameter};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One "list by path prefix" call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    pub path: String,
    pub recursive: bool,
    pub with_decryption: bool,
    /// Opaque continuation token from the previous page
    pub next_token: Option<String>,
    pub max_results: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPage {
    pub parameters: Vec<RawParameter>,
    /// Present while more pages remain
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutRequest {
    pub name: String,
    pub value: String,
    pub param_type: ParamType,
    pub overwrite: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PutResult {
    pub version: i64,
    pub tier: String,
}

/// Remote hierarchical parameter store.
///
/// Timeouts, retries, credentials and encryption belong to the implementation.
#[async_trait]
pub trait ParameterStore: Send + Sync {
    async fn list_by_path(&self, request: &ListRequest) -> Result<ListPage, BackendError>;

    async fn get_parameter(
        &self,
        name: &str,
        with_decryption: bool,
    ) -> Result<Option<RawParameter>, BackendError>;

    async fn put_parameter(&self, request: &PutRequest) -> Result<PutResult, BackendError>;
}
