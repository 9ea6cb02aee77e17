use std::collections::HashMap;

/// Where a runner reads environment variables from.
pub trait EnvSource {
    fn var(&self, key: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// A fixed in-memory table of variables.
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: HashMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }
}

impl From<HashMap<String, String>> for MapEnv {
    fn from(vars: HashMap<String, String>) -> Self {
        Self { vars }
    }
}

impl EnvSource for MapEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

/// Overrides first, then the fallback source.
pub struct LayeredEnv<E: EnvSource> {
    overrides: MapEnv,
    fallback: E,
}

impl<E: EnvSource> LayeredEnv<E> {
    pub fn new(overrides: MapEnv, fallback: E) -> Self {
        Self {
            overrides,
            fallback,
        }
    }
}

impl<E: EnvSource> EnvSource for LayeredEnv<E> {
    fn var(&self, key: &str) -> Option<String> {
        self.overrides.var(key).or_else(|| self.fallback.var(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_env_lookup() {
        let env = MapEnv::new().with_var("ENV", "DEV");
        assert_eq!(env.var("ENV").as_deref(), Some("DEV"));
        assert_eq!(env.var("MISSING"), None);
    }

    #[test]
    fn test_layered_env_prefers_overrides() {
        let fallback = MapEnv::new().with_var("ENV", "PROD").with_var("REGION", "eu");
        let env = LayeredEnv::new(MapEnv::new().with_var("ENV", "DEV"), fallback);
        assert_eq!(env.var("ENV").as_deref(), Some("DEV"));
        assert_eq!(env.var("REGION").as_deref(), Some("eu"));
        assert_eq!(env.var("MISSING"), None);
    }
}
