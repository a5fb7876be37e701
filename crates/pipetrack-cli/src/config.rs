//! CLI configuration.

/// Environment variable overriding the API server address.
pub const SERVER_ENV: &str = "PIPETRACK_SERVER";

/// Environment variable overriding the namespace.
pub const NAMESPACE_ENV: &str = "PIPETRACK_NAMESPACE";

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Cluster API server address.
    pub server: String,

    /// Namespace of the resources.
    pub namespace: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: "http://127.0.0.1:8001".to_string(),
            namespace: "default".to_string(),
        }
    }
}

impl Config {
    /// Defaults, overridden by `PIPETRACK_*` environment variables.
    pub fn from_env() -> Self {
        Self::default().with_overrides(
            std::env::var(SERVER_ENV).ok(),
            std::env::var(NAMESPACE_ENV).ok(),
        )
    }

    /// Apply overrides; empty values are ignored.
    pub fn with_overrides(mut self, server: Option<String>, namespace: Option<String>) -> Self {
        if let Some(server) = server.filter(|s| !s.is_empty()) {
            self.server = server;
        }
        if let Some(namespace) = namespace.filter(|n| !n.is_empty()) {
            self.namespace = namespace;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides() {
        let config = Config::default()
            .with_overrides(Some("http://cluster:6443".into()), None)
            .with_overrides(None, Some("ci".into()));

        assert_eq!(config.server, "http://cluster:6443");
        assert_eq!(config.namespace, "ci");
    }

    #[test]
    fn test_empty_overrides_are_ignored() {
        let config = Config::default().with_overrides(Some(String::new()), Some(String::new()));
        assert_eq!(config, Config::default());
    }
}
