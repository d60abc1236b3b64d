use crate::param::{NormalizedParam, ParamMap, RawParameter};
use crate::path::{segment, PathLayout};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Parameter occurrences per path segment value.
pub type FrequencyMap = BTreeMap<String, usize>;

/// Parameters grouped environment → service → key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamTree {
    envs: BTreeMap<String, BTreeMap<String, ParamMap>>,
}

impl ParamTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place `param` under its slot, creating intermediate levels on first sight.
    pub fn insert(&mut self, environment: &str, service: &str, key: &str, param: NormalizedParam) {
        self.envs
            .entry(environment.to_string())
            .or_default()
            .entry(service.to_string())
            .or_default()
            .insert(key.to_string(), param);
    }

    pub fn environments(&self) -> impl Iterator<Item = &str> {
        self.envs.keys().map(String::as_str)
    }

    pub fn services(&self, environment: &str) -> Option<&BTreeMap<String, ParamMap>> {
        self.envs.get(environment)
    }

    pub fn get(&self, environment: &str, service: &str, key: &str) -> Option<&NormalizedParam> {
        self.envs.get(environment)?.get(service)?.get(key)
    }

    /// Keep only `environment`; an unknown name yields an empty tree.
    #[must_use]
    pub fn filter_environment(mut self, environment: &str) -> Self {
        self.envs.retain(|env, _| env == environment);
        self
    }

    /// Iterate `(environment, service, params)` groups.
    pub fn groups(&self) -> impl Iterator<Item = (&str, &str, &ParamMap)> {
        self.envs.iter().flat_map(|(env, services)| {
            services
                .iter()
                .map(move |(svc, params)| (env.as_str(), svc.as_str(), params))
        })
    }

    pub fn env_count(&self) -> usize {
        self.envs.len()
    }

    /// Total number of parameters across every group.
    pub fn len(&self) -> usize {
        self.groups().map(|(_, _, params)| params.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.envs.is_empty()
    }
}

/// Group raw entries by environment and service.
///
/// Entries that do not normalize, or whose names are too shallow for the
/// layout, are skipped with a warning.
pub fn build_tree(entries: &[RawParameter], layout: &PathLayout) -> ParamTree {
    let mut tree = ParamTree::new();
    for raw in entries {
        let param = match NormalizedParam::from_raw(raw) {
            Ok(param) => param,
            Err(err) => {
                log::warn!("Skipping store entry: {err}");
                continue;
            }
        };
        let Some(location) = layout.locate(&raw.name) else {
            log::warn!("Skipping {}: not an <env>/<service>/<key> path", raw.name);
            continue;
        };
        tree.insert(location.environment, location.service, location.key, param);
    }
    tree
}

/// Count entries per value of the segment at `segment_index`.
///
/// Every entry counts, so the result reflects parameter occurrences rather
/// than distinct environments or services.
pub fn build_frequency(entries: &[RawParameter], segment_index: usize) -> FrequencyMap {
    let mut counts = FrequencyMap::new();
    for raw in entries {
        match segment(&raw.name, segment_index) {
            Some(segment) => *counts.entry(segment.to_string()).or_insert(0) += 1,
            None => log::warn!("Skipping {}: no segment at index {segment_index}", raw.name),
        }
    }
    counts
}
