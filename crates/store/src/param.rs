use crate::error::{Result, StoreError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Store tag for plain string parameters.
pub const PLAIN_TAG: &str = "String";
/// Store tag for plain list parameters; treated as plain text.
pub const LIST_TAG: &str = "StringList";
/// Store tag for encrypted parameters.
pub const SECRET_TAG: &str = "SecureString";

/// Normalized parameters of one listing, keyed by short name.
pub type ParamMap = BTreeMap<String, NormalizedParam>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParamType {
    Plain,
    Secret,
}

impl ParamType {
    /// Map a store type tag. Unknown tags are read as plain rather than rejected.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            SECRET_TAG => Self::Secret,
            PLAIN_TAG | LIST_TAG => Self::Plain,
            other => {
                log::debug!("Unrecognized parameter type tag {other:?}, treating as plain");
                Self::Plain
            }
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Self::Plain => PLAIN_TAG,
            Self::Secret => SECRET_TAG,
        }
    }

    pub fn from_encrypted(is_encrypted: bool) -> Self {
        if is_encrypted {
            Self::Secret
        } else {
            Self::Plain
        }
    }
}

/// One entry exactly as the store returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawParameter {
    /// Full slash-delimited path
    pub name: String,
    pub value: String,
    pub version: i64,
    /// Last modification, milliseconds since the Unix epoch
    pub last_modified_ms: u64,
    pub type_tag: String,
}

/// A store entry reshaped for callers. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedParam {
    /// Last path segment
    pub name: String,
    pub full_name: String,
    pub value: String,
    pub version: i64,
    pub last_modified_ms: u64,
    pub param_type: ParamType,
    pub is_encrypted: bool,
}

impl NormalizedParam {
    pub fn from_raw(raw: &RawParameter) -> Result<Self> {
        let name = raw
            .name
            .rsplit('/')
            .find(|s| !s.is_empty())
            .ok_or_else(|| StoreError::malformed(format!("no name segment in {:?}", raw.name)))?;
        let param_type = ParamType::from_tag(&raw.type_tag);
        Ok(Self {
            name: name.to_string(),
            full_name: raw.name.clone(),
            value: raw.value.clone(),
            version: raw.version,
            last_modified_ms: raw.last_modified_ms,
            param_type,
            is_encrypted: param_type == ParamType::Secret,
        })
    }
}

/// Normalize a listing into a map keyed by short name.
///
/// Malformed entries are skipped with a warning. When two entries share a
/// short name the later one wins.
pub fn normalize_all(entries: &[RawParameter]) -> ParamMap {
    let mut out = ParamMap::new();
    for raw in entries {
        match NormalizedParam::from_raw(raw) {
            Ok(param) => {
                out.insert(param.name.clone(), param);
            }
            Err(err) => log::warn!("Skipping store entry: {err}"),
        }
    }
    out
}
