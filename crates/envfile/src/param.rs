use envsync_store::{NormalizedParam, ParamType, ParamWrite};
use serde::{Deserialize, Serialize};

/// One `KEY=VALUE` entry of an env file or the process environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvParam {
    pub key: String,
    pub value: String,
    pub is_encrypted: bool,
}

impl EnvParam {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            is_encrypted: false,
        }
    }

    #[must_use]
    pub fn encrypted(mut self, is_encrypted: bool) -> Self {
        self.is_encrypted = is_encrypted;
        self
    }

    /// Turn into a store write; the secret type follows the entry's own marker.
    pub fn into_write(self, overwrite: bool) -> ParamWrite {
        ParamWrite {
            key: self.key,
            value: self.value,
            param_type: ParamType::from_encrypted(self.is_encrypted),
            overwrite,
        }
    }
}

impl From<&NormalizedParam> for EnvParam {
    fn from(param: &NormalizedParam) -> Self {
        Self {
            key: param.name.clone(),
            value: param.value.clone(),
            is_encrypted: param.is_encrypted,
        }
    }
}
