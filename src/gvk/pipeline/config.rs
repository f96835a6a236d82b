//! Named scan configurations
//!
//! Each configuration names a way to run extraction over an input: one strategy
//! on its own, or both strategies checked against each other. Front ends refer to
//! configurations by name.

use std::collections::HashMap;

use super::Strategy;

/// A named configuration
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub name: String,
    pub description: String,
    pub mode: ScanMode,
}

/// What a configuration runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    /// A single strategy
    Single(Strategy),
    /// Every strategy, results compared
    CrossCheck,
}

/// Registry of scan configurations
pub struct ConfigRegistry {
    configs: HashMap<String, ScanConfig>,
}

impl ConfigRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        ConfigRegistry {
            configs: HashMap::new(),
        }
    }

    pub fn register(&mut self, config: ScanConfig) {
        self.configs.insert(config.name.clone(), config);
    }

    pub fn get(&self, name: &str) -> Option<&ScanConfig> {
        self.configs.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.configs.contains_key(name)
    }

    /// List all configurations (sorted by name)
    pub fn list_all(&self) -> Vec<&ScanConfig> {
        let mut configs: Vec<_> = self.configs.values().collect();
        configs.sort_by(|a, b| a.name.cmp(&b.name));
        configs
    }

    /// Registry with one configuration per strategy plus `both`
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        for strategy in Strategy::ALL {
            registry.register(ScanConfig {
                name: strategy.name().into(),
                description: strategy.description().into(),
                mode: ScanMode::Single(strategy),
            });
        }

        registry.register(ScanConfig {
            name: "both".into(),
            description: "Run every strategy and fail if they disagree".into(),
            mode: ScanMode::CrossCheck,
        });

        registry
    }
}

impl Default for ConfigRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_creation() {
        let registry = ConfigRegistry::new();
        assert_eq!(registry.configs.len(), 0);
    }

    #[test]
    fn test_registry_register() {
        let mut registry = ConfigRegistry::new();
        registry.register(ScanConfig {
            name: "test".into(),
            description: "Test config".into(),
            mode: ScanMode::Single(Strategy::Reader),
        });
        assert!(registry.has("test"));
        assert!(!registry.has("reader"));
    }

    #[test]
    fn test_defaults() {
        let registry = ConfigRegistry::with_defaults();
        assert_eq!(
            registry.get("decoder").map(|config| config.mode),
            Some(ScanMode::Single(Strategy::Decoder))
        );
        assert_eq!(
            registry.get("both").map(|config| config.mode),
            Some(ScanMode::CrossCheck)
        );
        assert!(registry.get("frame").is_none());
    }

    #[test]
    fn test_list_all_sorted() {
        let registry = ConfigRegistry::default();
        let names: Vec<_> = registry
            .list_all()
            .into_iter()
            .map(|config| config.name.as_str())
            .collect();
        assert_eq!(names, vec!["both", "decoder", "reader"]);
    }
}
