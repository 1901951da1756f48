//! Worker configuration and scope resolution.

use anyhow::{Context, Result};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use url::{Origin, Url};

use crate::error::ConfigError;

/// Worker configuration.
///
/// Bumping `version` on each deployment produces new partition names, which
/// orphans the previous partitions until activation removes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Deployment version tag.
    #[serde(default = "default_version")]
    pub version: String,

    /// Application prefix for partition names.
    #[serde(default = "default_cache_prefix")]
    pub cache_prefix: String,

    /// Shell assets, relative to the registration scope.
    #[serde(default = "default_precache")]
    pub precache: Vec<String>,

    /// Root document served when a navigation fails with nothing cached.
    #[serde(default = "default_offline_document")]
    pub offline_document: String,

    /// Status a revalidation response must carry to be written back.
    #[serde(default = "default_revalidate_status")]
    pub revalidate_status: u16,
}

fn default_version() -> String {
    "v5".to_string()
}

fn default_cache_prefix() -> String {
    "chat".to_string()
}

fn default_precache() -> Vec<String> {
    [
        "./",
        "./index.html",
        "./manifest.json",
        "./assets/icon-192.png",
        "./assets/icon-512.png",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_offline_document() -> String {
    "./index.html".to_string()
}

fn default_revalidate_status() -> u16 {
    200
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            cache_prefix: default_cache_prefix(),
            precache: default_precache(),
            offline_document: default_offline_document(),
            revalidate_status: default_revalidate_status(),
        }
    }
}

impl WorkerConfig {
    /// Create a configuration for the given version with default assets.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            ..Default::default()
        }
    }

    /// Set the partition name prefix.
    pub fn with_cache_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.cache_prefix = prefix.into();
        self
    }

    /// Replace the precache list.
    pub fn with_precache(mut self, entries: Vec<&str>) -> Self {
        self.precache = entries.into_iter().map(String::from).collect();
        self
    }

    /// Set the root document used as last navigation fallback.
    pub fn with_offline_document(mut self, path: impl Into<String>) -> Self {
        self.offline_document = path.into();
        self
    }

    /// Load config from a file (TOML, or JSON by extension).
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config = if path.ends_with(".json") {
            Self::from_json_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))?
        } else {
            Self::from_toml_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))?
        };

        Ok(config)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the fields that cannot be caught by deserialization.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version.trim().is_empty() {
            return Err(ConfigError::Invalid("version must not be empty".into()));
        }
        if self.cache_prefix.trim().is_empty() {
            return Err(ConfigError::Invalid("cache_prefix must not be empty".into()));
        }
        if self.offline_document.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "offline_document must not be empty".into(),
            ));
        }
        StatusCode::from_u16(self.revalidate_status).map_err(|_| {
            ConfigError::Invalid(format!(
                "revalidate_status {} is not an HTTP status",
                self.revalidate_status
            ))
        })?;
        Ok(())
    }

    /// Partition names for this version.
    pub fn cache_names(&self) -> CacheNames {
        CacheNames::new(&self.cache_prefix, &self.version)
    }

    /// Resolve the precache list against a scope, preserving order.
    pub fn precache_set(&self, scope: &Scope) -> Result<Vec<Url>, ConfigError> {
        self.precache.iter().map(|p| scope.resolve(p)).collect()
    }

    /// Absolute URL of the offline root document.
    pub fn offline_document_url(&self, scope: &Scope) -> Result<Url, ConfigError> {
        scope.resolve(&self.offline_document)
    }

    /// Revalidation status as a typed status code.
    pub fn revalidate_status(&self) -> StatusCode {
        StatusCode::from_u16(self.revalidate_status).unwrap_or(StatusCode::OK)
    }
}

/// Names of the two partitions owned by one worker version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheNames {
    /// Precached shell assets.
    pub static_cache: String,
    /// Responses observed at runtime.
    pub runtime_cache: String,
}

impl CacheNames {
    pub fn new(prefix: &str, version: &str) -> Self {
        Self {
            static_cache: format!("{}-static-{}", prefix, version),
            runtime_cache: format!("{}-runtime-{}", prefix, version),
        }
    }

    /// Whether a partition name belongs to this version.
    pub fn is_current(&self, name: &str) -> bool {
        name == self.static_cache || name == self.runtime_cache
    }
}

/// The URL prefix under which the worker is registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope(Url);

impl Scope {
    pub fn new(url: Url) -> Self {
        Self(url)
    }

    /// Parse a scope URL.
    pub fn parse(input: &str) -> Result<Self, ConfigError> {
        Url::parse(input)
            .map(Self)
            .map_err(|e| ConfigError::invalid_url(input, e))
    }

    /// Scope of the registration, or the worker script location when the
    /// worker runs without one.
    pub fn from_registration(registration: Option<&str>, location: &str) -> Result<Self, ConfigError> {
        Self::parse(registration.unwrap_or(location))
    }

    /// Resolve a relative path against the scope.
    pub fn resolve(&self, path: &str) -> Result<Url, ConfigError> {
        self.0
            .join(path)
            .map_err(|e| ConfigError::invalid_url(path, e))
    }

    pub fn origin(&self) -> Origin {
        self.0.origin()
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cache_names() {
        let names = WorkerConfig::default().cache_names();
        assert_eq!(names.static_cache, "chat-static-v5");
        assert_eq!(names.runtime_cache, "chat-runtime-v5");
        assert!(names.is_current("chat-runtime-v5"));
        assert!(!names.is_current("chat-static-v4"));
    }

    #[test]
    fn test_precache_resolves_under_subpath_scope() {
        let scope = Scope::parse("https://user.github.io/chat/").unwrap();
        let urls = WorkerConfig::default().precache_set(&scope).unwrap();

        let urls: Vec<&str> = urls.iter().map(Url::as_str).collect();
        assert_eq!(
            urls,
            vec![
                "https://user.github.io/chat/",
                "https://user.github.io/chat/index.html",
                "https://user.github.io/chat/manifest.json",
                "https://user.github.io/chat/assets/icon-192.png",
                "https://user.github.io/chat/assets/icon-512.png",
            ]
        );
    }

    #[test]
    fn test_scope_falls_back_to_location() {
        let scope =
            Scope::from_registration(None, "https://app.example/chat/sw.js").unwrap();
        assert_eq!(
            scope.resolve("./index.html").unwrap().as_str(),
            "https://app.example/chat/index.html"
        );

        let scope = Scope::from_registration(
            Some("https://app.example/chat/"),
            "https://app.example/chat/sw.js",
        )
        .unwrap();
        assert_eq!(scope.to_string(), "https://app.example/chat/");
    }

    #[test]
    fn test_from_toml_with_defaults() {
        let config = WorkerConfig::from_toml_str(
            r#"
            version = "v6"
            precache = ["./", "./app.js"]
            "#,
        )
        .unwrap();

        assert_eq!(config.version, "v6");
        assert_eq!(config.cache_prefix, "chat");
        assert_eq!(config.precache, vec!["./", "./app.js"]);
        assert_eq!(config.offline_document, "./index.html");
        assert_eq!(config.revalidate_status(), StatusCode::OK);
    }

    #[test]
    fn test_from_json() {
        let config =
            WorkerConfig::from_json_str(r#"{"version": "v7", "cache_prefix": "notes"}"#).unwrap();
        assert_eq!(config.cache_names().static_cache, "notes-static-v7");
    }

    #[test]
    fn test_validation_rejects_empty_version() {
        let err = WorkerConfig::from_toml_str(r#"version = "  ""#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_validation_rejects_bad_status() {
        let config = WorkerConfig {
            revalidate_status: 42,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_scope() {
        let err = Scope::parse("chat/").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));
    }
}
