use std::time::Duration;

/// Default hosting API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Environment variables consulted for a token, in order.
pub const TOKEN_ENV_VARS: [&str; 2] = ["GITHUB_TOKEN", "GITHUB_PERSONAL_ACCESS_TOKEN"];

/// Lifetime of a cached remote response.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Runtime configuration for the hosting API client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub token: Option<String>,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: None,
            user_agent: format!("repo-scout/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Default configuration with the token picked up from the environment.
    pub fn from_env() -> Self {
        Self {
            token: token_from_env(),
            ..Default::default()
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    /// API root without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.api_url.trim().trim_end_matches('/')
    }
}

fn token_from_env() -> Option<String> {
    TOKEN_ENV_VARS
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_points_at_public_api() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url(), "https://api.github.com");
        assert!(config.token.is_none());
        assert!(config.user_agent.starts_with("repo-scout/"));
    }

    #[test]
    fn test_base_url_strips_trailing_slash() {
        let config = ClientConfig::default().with_api_url("http://127.0.0.1:9000/");
        assert_eq!(config.base_url(), "http://127.0.0.1:9000");
    }

    #[test]
    fn test_blank_token_is_ignored() {
        let config = ClientConfig::default().with_token(Some("   ".to_string()));
        assert!(config.token.is_none());

        let config = ClientConfig::default().with_token(Some("ghp_abc".to_string()));
        assert_eq!(config.token.as_deref(), Some("ghp_abc"));
    }
}
