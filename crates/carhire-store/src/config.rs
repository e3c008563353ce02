//! # Store Configuration
//!
//! Read once when the store is built. Values come from the environment with
//! development defaults.

/// Default backlog size before the writer starts warning.
pub const DEFAULT_PERSIST_QUEUE_DEPTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Queued writes above this count log a warning. Writes are never
    /// dropped, so a growing backlog means the backend is too slow.
    pub persist_queue_depth: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            persist_queue_depth: DEFAULT_PERSIST_QUEUE_DEPTH,
        }
    }
}

impl StoreConfig {
    /// ## Environment Variables
    /// - `CARHIRE_PERSIST_QUEUE_DEPTH`: backlog warning threshold
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = StoreConfig::default();

        if let Some(depth) = lookup("CARHIRE_PERSIST_QUEUE_DEPTH") {
            if let Ok(depth) = depth.trim().parse::<usize>() {
                if depth > 0 {
                    config.persist_queue_depth = depth;
                }
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_env() {
        let config = StoreConfig::from_lookup(|_| None);
        assert_eq!(config.persist_queue_depth, 64);
    }

    #[test]
    fn test_override_and_garbage() {
        let config = StoreConfig::from_lookup(|_| Some(" 8 ".to_string()));
        assert_eq!(config.persist_queue_depth, 8);

        let config = StoreConfig::from_lookup(|_| Some("lots".to_string()));
        assert_eq!(config, StoreConfig::default());

        let config = StoreConfig::from_lookup(|_| Some("0".to_string()));
        assert_eq!(config, StoreConfig::default());
    }
}
