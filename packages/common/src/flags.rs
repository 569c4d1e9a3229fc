use std::collections::BTreeMap;
use std::fmt::Display;

use tracing::{debug, warn};

/// Resolved feature flags, keyed by flag name.
pub type FlagMap = BTreeMap<String, bool>;

/// Flags the storefront knows about even before the server has answered.
pub const KNOWN_FLAGS: &[&str] = &[
    "UNBORKED_V2",
    "EXPERIMENTAL_CHECKOUT",
    "DARK_MODE",
    "ADVANCED_FILTERING",
    "STOREQUERY_V2",
    "GOODS_PRODUCTQUERY",
    "CARTAPI_V2",
];

/// Every known flag set to `false`.
pub fn baseline() -> FlagMap {
    KNOWN_FLAGS.iter().map(|name| (name.to_string(), false)).collect()
}

/// `true` (any case) and `1` enable a flag; every other value disables it.
pub fn parse_flag_value(raw: &str) -> bool {
    raw.eq_ignore_ascii_case("true") || raw == "1"
}

/// Split a `?A=1&B=true` query string into key/value pairs.
///
/// A key without `=` gets an empty value. Empty segments are skipped.
pub fn parse_query(query: &str) -> Vec<(String, String)> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter(|segment| !segment.is_empty())
        .map(|segment| match segment.split_once('=') {
            Some((key, value)) => (key.to_string(), value.to_string()),
            None => (segment.to_string(), String::new()),
        })
        .collect()
}

/// Extract flag overrides from query parameters.
///
/// Only flags present in `defaults` or listed in [`KNOWN_FLAGS`] are
/// considered. Names match case-sensitively and the first occurrence wins.
pub fn query_overrides(defaults: &FlagMap, params: &[(String, String)]) -> FlagMap {
    let mut overrides = FlagMap::new();
    for (key, value) in params {
        let known = defaults.contains_key(key) || KNOWN_FLAGS.contains(&key.as_str());
        if known && !overrides.contains_key(key) {
            overrides.insert(key.clone(), parse_flag_value(value));
        }
    }
    overrides
}

/// Merge the three flag sources. Later layers win:
/// query params > local overrides > server defaults.
pub fn merge(defaults: &FlagMap, local: &FlagMap, params: &[(String, String)]) -> FlagMap {
    let url = query_overrides(defaults, params);
    let mut merged = defaults.clone();
    merged.extend(local.iter().map(|(k, v)| (k.clone(), *v)));
    merged.extend(url);
    merged
}

/// Caches server defaults and the resolved flag map for the lifetime of a
/// client session.
///
/// The server is asked for defaults at most once. If that request fails the
/// resolver keeps working from the last map it knew about, which starts out as
/// [`baseline`].
#[derive(Debug)]
pub struct FlagResolver {
    defaults: Option<FlagMap>,
    resolved: Option<FlagMap>,
    last_known: FlagMap,
}

impl Default for FlagResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl FlagResolver {
    pub fn new() -> Self {
        Self {
            defaults: None,
            resolved: None,
            last_known: baseline(),
        }
    }

    /// Fetch server defaults once. Failures are logged and yield whatever
    /// defaults were cached before (possibly none).
    pub fn defaults<F, E>(&mut self, fetch: F) -> Option<&FlagMap>
    where
        F: FnOnce() -> Result<FlagMap, E>,
        E: Display,
    {
        if self.defaults.is_none() {
            match fetch() {
                Ok(defaults) => {
                    debug!(count = defaults.len(), "Fetched server default flags");
                    self.defaults = Some(defaults);
                }
                Err(e) => warn!("Failed to fetch server default flags: {e}"),
            }
        }
        self.defaults.as_ref()
    }

    /// Resolve the flag map, initializing it on the first call.
    ///
    /// Subsequent calls return the cached map without touching any source.
    pub fn resolve<F, E>(
        &mut self,
        fetch: F,
        local: &FlagMap,
        params: &[(String, String)],
    ) -> &FlagMap
    where
        F: FnOnce() -> Result<FlagMap, E>,
        E: Display,
    {
        if self.resolved.is_none() {
            let fetched = self.defaults(fetch).cloned();
            let layer = fetched.unwrap_or_else(|| self.last_known.clone());
            let merged = merge(&layer, local, params);
            self.last_known = merged.clone();
            self.resolved = Some(merged);
        }
        self.resolved.get_or_insert_with(baseline)
    }

    /// The resolved map, or the last known one if nothing has been resolved.
    pub fn current(&self) -> &FlagMap {
        self.resolved.as_ref().unwrap_or(&self.last_known)
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.current().get(name).copied().unwrap_or(false)
    }

    /// Update a single flag in place without re-fetching.
    pub fn update_flag(&mut self, name: &str, value: bool) {
        if let Some(resolved) = self.resolved.as_mut() {
            resolved.insert(name.to_string(), value);
        }
        self.last_known.insert(name.to_string(), value);
    }

    /// Reset every flag that has a server default back to that default.
    pub fn reset_to_defaults(&mut self) {
        let Some(defaults) = self.defaults.clone() else {
            return;
        };
        for (name, value) in defaults {
            self.update_flag(&name, value);
        }
    }
}
