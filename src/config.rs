use std::path::PathBuf;

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Runtime settings read from the environment (after `.env` is loaded).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Config {
    /// Overrides the directory holding persisted sessions and user data.
    pub data_dir: Option<PathBuf>,
    pub model: String,
    /// Generic JSON chat endpoint; takes priority over Gemini when set.
    pub endpoint: Option<String>,
    /// Bearer token for `endpoint`.
    pub endpoint_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        Self {
            data_dir: non_empty("TONY_DATA_DIR").map(PathBuf::from),
            model: non_empty("TONY_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            endpoint: non_empty("LLM_ENDPOINT"),
            endpoint_api_key: non_empty("LLM_API_KEY"),
            gemini_api_key: non_empty("GEMINI_API_KEY").or_else(|| non_empty("API_KEY")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert!(config.endpoint.is_none());
        assert!(config.gemini_api_key.is_none());
        assert!(config.data_dir.is_none());
    }

    #[test]
    fn test_api_key_fallback() {
        let config = config_from(&[("API_KEY", "legacy")]);
        assert_eq!(config.gemini_api_key.as_deref(), Some("legacy"));

        let config = config_from(&[("API_KEY", "legacy"), ("GEMINI_API_KEY", "primary")]);
        assert_eq!(config.gemini_api_key.as_deref(), Some("primary"));
    }

    #[test]
    fn test_blank_values_are_ignored() {
        let config = config_from(&[("TONY_MODEL", "  "), ("LLM_ENDPOINT", "")]);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert!(config.endpoint.is_none());
    }
}
