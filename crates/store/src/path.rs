use crate::config::BasePath;

/// Composes canonical store paths: `/<base>/<env>/<service>/<name>`.
#[derive(Debug, Clone, Default)]
pub struct PathBuilder {
    base: Option<BasePath>,
}

impl PathBuilder {
    pub fn new(base: Option<BasePath>) -> Self {
        Self { base }
    }

    pub fn base(&self) -> Option<&BasePath> {
        self.base.as_ref()
    }

    /// Join the present segments in fixed order behind a leading `/`.
    ///
    /// `None` and empty segments are omitted. Segments are not validated, so
    /// a `/` inside one ends up in the path as-is.
    pub fn build(&self, env: Option<&str>, service: Option<&str>, name: Option<&str>) -> String {
        let segments: Vec<&str> = [self.base.as_ref().map(BasePath::as_str), env, service, name]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect();
        format!("/{}", segments.join("/"))
    }

    /// Path covering every environment under the base.
    pub fn root(&self) -> String {
        self.build(None, None, None)
    }

    pub fn layout(&self) -> PathLayout {
        PathLayout::new(self.base.as_ref().map_or(0, BasePath::segment_count))
    }
}

/// Segment at `index` of a full name, if present and non-empty.
///
/// Index 0 is the empty segment before the leading `/`.
pub fn segment(full_name: &str, index: usize) -> Option<&str> {
    full_name.split('/').nth(index).filter(|s| !s.is_empty())
}

/// Where environment and service sit inside a full parameter name.
///
/// Indexes count the empty segment before the leading `/` as 0, so with a
/// one-segment base the environment is at 2 and the service at 3.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PathLayout {
    base_segments: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamLocation<'a> {
    pub environment: &'a str,
    pub service: &'a str,
    pub key: &'a str,
}

impl PathLayout {
    pub fn new(base_segments: usize) -> Self {
        Self { base_segments }
    }

    pub fn environment_index(&self) -> usize {
        1 + self.base_segments
    }

    pub fn service_index(&self) -> usize {
        2 + self.base_segments
    }

    /// Split a full name into environment, service and key.
    ///
    /// Returns `None` for names too shallow to carry all three.
    pub fn locate<'a>(&self, full_name: &'a str) -> Option<ParamLocation<'a>> {
        let parts: Vec<&str> = full_name.split('/').collect();
        let svc_idx = self.service_index();
        if parts.len() <= svc_idx + 1 {
            return None;
        }
        let environment = parts[self.environment_index()];
        let service = parts[svc_idx];
        let key = *parts.last()?;
        if environment.is_empty() || service.is_empty() || key.is_empty() {
            return None;
        }
        Some(ParamLocation {
            environment,
            service,
            key,
        })
    }
}
