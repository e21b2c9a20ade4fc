//! Gate configuration

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// Address the gate listens on
    #[serde(default = "default_bind")]
    pub bind: SocketAddr,

    /// Atlas TOML file; the bundled documentary is served without one
    #[serde(default)]
    pub atlas: Option<PathBuf>,

    #[serde(default)]
    pub auth: AuthConfig,
}

/// Credentials for the site-wide password wall.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_username")]
    pub username: String,

    #[serde(default = "default_password")]
    pub password: String,

    /// Realm announced in the `WWW-Authenticate` challenge
    #[serde(default = "default_realm")]
    pub realm: String,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            atlas: None,
            auth: AuthConfig::default(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            username: default_username(),
            password: default_password(),
            realm: default_realm(),
        }
    }
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 3000))
}

fn default_username() -> String {
    "webdoc".to_string()
}

fn default_password() -> String {
    "MMIS3".to_string()
}

fn default_realm() -> String {
    "Espace Securise Webdoc".to_string()
}

impl AuthConfig {
    /// Reject a realm that cannot travel in a `WWW-Authenticate` header.
    ///
    /// Checked at load time, which keeps the challenge builder infallible.
    pub fn validate(&self) -> anyhow::Result<()> {
        let challenge = format!("Basic realm=\"{}\"", self.realm);
        if HeaderValue::from_str(&challenge).is_err() {
            anyhow::bail!("realm contains bytes a header value cannot carry");
        }
        Ok(())
    }
}

impl GateConfig {
    /// Load from a TOML file, falling back to defaults when it is missing.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.auth.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_credentials_and_realm() {
        let config = GateConfig::default();

        assert_eq!(config.auth.username, "webdoc");
        assert_eq!(config.auth.password, "MMIS3");
        assert_eq!(config.auth.realm, "Espace Securise Webdoc");
        assert!(config.atlas.is_none());
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let config: GateConfig = toml::from_str(r#"bind = "0.0.0.0:8080""#).unwrap();

        assert_eq!(config.bind, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.auth.username, "webdoc");
        assert_eq!(config.auth.realm, "Espace Securise Webdoc");
    }

    #[test]
    fn test_nested_auth_overrides() {
        let doc = r#"
            [auth]
            username = "curator"
            password = "s3cret"
        "#;
        let config: GateConfig = toml::from_str(doc).unwrap();

        assert_eq!(config.auth.username, "curator");
        assert_eq!(config.auth.password, "s3cret");
        assert_eq!(config.auth.realm, "Espace Securise Webdoc");
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let config = GateConfig::load(Path::new("/nonexistent/gate.toml")).unwrap();
        assert_eq!(config.bind, default_bind());
    }

    #[test]
    fn test_realm_must_fit_in_a_header() {
        assert!(AuthConfig::default().validate().is_ok());

        let auth = AuthConfig {
            realm: "Espace\nSecurise".to_string(),
            ..AuthConfig::default()
        };
        assert!(auth.validate().is_err());
    }

    #[test]
    fn test_header_breaking_realm_fails_at_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gate.toml");
        std::fs::write(&path, "[auth]\nrealm = \"Espace\\nSecurise\"\n").unwrap();

        assert!(GateConfig::load(&path).is_err());
    }
}
