use std::path::PathBuf;

/// Default server URL (the Electron shell spawns the Django server here)
const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";

/// Path prefix under which the backend mounts its REST API
const API_PREFIX: &str = "/api";

/// Client configuration: server location and session-file override.
#[derive(Debug, Clone)]
pub struct Config {
    server_url: String,
    session_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        let server_url = std::env::var("CLIENT_API_URL")
            .unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string());
        Self {
            server_url,
            session_path: None,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration pointing at the given server
    pub fn with_server_url(url: impl Into<String>) -> Self {
        Self {
            server_url: trim_trailing_slash(url.into()),
            session_path: None,
        }
    }

    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Get the full URL for an API endpoint
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}{}", self.server_url, API_PREFIX, path)
    }

    /// Where the session file lives, if overridden
    pub fn session_path(&self) -> Option<&PathBuf> {
        self.session_path.as_ref()
    }
}

/// Builder for `Config`
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    server_url: Option<String>,
    session_path: Option<PathBuf>,
}

impl ConfigBuilder {
    /// Set the server URL
    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = Some(url.into());
        self
    }

    /// Override where the persisted session file lives
    pub fn session_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_path = Some(path.into());
        self
    }

    /// Build the configuration
    pub fn build(self) -> Config {
        let mut config = match self.server_url {
            Some(url) => Config::with_server_url(url),
            None => Config::default(),
        };
        config.session_path = self.session_path;
        config
    }
}

fn trim_trailing_slash(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_config_new() {
        std::env::remove_var("CLIENT_API_URL");
        let config = Config::new();
        assert_eq!(config.server_url(), "http://127.0.0.1:8000");
        assert!(config.session_path().is_none());
    }

    #[test]
    #[serial]
    fn test_env_override() {
        std::env::set_var("CLIENT_API_URL", "http://10.0.0.5:9000");
        let config = Config::new();
        assert_eq!(config.server_url(), "http://10.0.0.5:9000");
        std::env::remove_var("CLIENT_API_URL");
    }

    #[test]
    fn test_api_url() {
        let config = Config::with_server_url("http://127.0.0.1:8000");
        assert_eq!(
            config.api_url("/token/"),
            "http://127.0.0.1:8000/api/token/"
        );
        assert_eq!(
            config.api_url("/items/3/"),
            "http://127.0.0.1:8000/api/items/3/"
        );
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let config = Config::with_server_url("http://127.0.0.1:8000/");
        assert_eq!(config.api_url("/items/"), "http://127.0.0.1:8000/api/items/");
    }

    #[test]
    fn test_builder() {
        let config = Config::builder()
            .server_url("http://localhost:8000")
            .session_path("/tmp/session.json")
            .build();
        assert_eq!(config.server_url(), "http://localhost:8000");
        assert_eq!(
            config.session_path(),
            Some(&PathBuf::from("/tmp/session.json"))
        );
    }
}
