use crate::param::EnvParam;

/// Replace `prefix` with `new_prefix` on every key that starts with it.
///
/// Other keys pass through unchanged and order is preserved.
pub fn remap_keys(params: &[EnvParam], prefix: &str, new_prefix: &str) -> Vec<EnvParam> {
    params
        .iter()
        .map(|param| {
            let key = match param.key.strip_prefix(prefix) {
                Some(rest) => format!("{new_prefix}{rest}"),
                None => param.key.clone(),
            };
            EnvParam {
                key,
                ..param.clone()
            }
        })
        .collect()
}

/// Current process environment, sorted by key. Non-UTF-8 entries are skipped.
pub fn params_from_process_env() -> Vec<EnvParam> {
    let mut params: Vec<EnvParam> = std::env::vars_os()
        .filter_map(|(key, value)| {
            Some(EnvParam::new(
                key.into_string().ok()?,
                value.into_string().ok()?,
            ))
        })
        .collect();
    params.sort_by(|a, b| a.key.cmp(&b.key));
    params
}

/// Export params into the process environment.
///
/// Entries the OS cannot hold (empty keys, `=` in a key, NUL bytes) are skipped.
pub fn load_into_env(params: &[EnvParam]) {
    for param in params {
        if param.key.is_empty()
            || param.key.contains(['=', '\0'])
            || param.value.contains('\0')
        {
            log::warn!("Skipping env var {:?}: not representable", param.key);
            continue;
        }
        std::env::set_var(&param.key, &param.value);
    }
}

/// Remap keys of `params` (or of the process environment when `None`) and
/// load the result into the process environment.
pub fn remap_keys_in_env(
    prefix: &str,
    new_prefix: &str,
    params: Option<Vec<EnvParam>>,
) -> Vec<EnvParam> {
    let params = params.unwrap_or_else(|| {
        log::info!("Loading params from current env");
        params_from_process_env()
    });
    let remapped = remap_keys(&params, prefix, new_prefix);
    load_into_env(&remapped);
    remapped
}
