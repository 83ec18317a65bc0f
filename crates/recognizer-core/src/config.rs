//! Configuration loader.
//!
//! Uses Figment to merge compiled defaults + `config.toml` + `config.<env>.toml`
//! + `APP_*` env vars (nested keys split on `__`) + caller overrides.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::env;
use std::path::Path;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::types::{Category, RefreshPolicy};

pub struct Config {
    figment: Figment,
    env_name: String,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::load_in(Path::new("."), &env_name)
    }

    /// Merge defaults, `config.toml`, `config.<env>.toml` and `APP_*` env vars
    /// found relative to `dir`. Missing files are skipped.
    pub fn load_in(dir: &Path, env_name: &str) -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(dir.join("config.toml")));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file(dir.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(dir.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(dir.join("config.test.toml"))),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));
        Ok(Self { figment, env_name: env_name.to_string() })
    }

    /// Layer caller-supplied values (typically command-line flags) on top.
    #[must_use]
    pub fn with_overrides<T: Serialize>(self, overrides: T) -> Self {
        Self { figment: self.figment.merge(Serialized::defaults(overrides)), env_name: self.env_name }
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    /// Extract and validate the typed settings.
    pub fn settings(&self) -> anyhow::Result<Settings> {
        let settings: Settings = self
            .figment
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to read settings: {}", e))?;
        settings.validate()?;
        self.validate_for_env(&settings)?;
        Ok(settings)
    }

    fn validate_for_env(&self, settings: &Settings) -> anyhow::Result<()> {
        if matches!(self.env_name.as_str(), "prod" | "production") && settings.backend.refresh == RefreshPolicy::False {
            return Err(anyhow::anyhow!("Prod config must not disable refresh: lookups right after indexing would miss"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub backend: BackendSettings,
    pub service: ServiceSettings,
    pub log: LogSettings,
    pub vocabulary: Vocabulary,
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        validate_backend_url(&self.backend.url)?;
        validate_index_name(&self.backend.index)?;
        if self.backend.timeout_secs == 0 {
            return Err(Error::InvalidConfig("backend.timeout_secs must be positive".into()));
        }
        let mut seen = HashSet::new();
        for c in &self.vocabulary.0 {
            if c.id.is_empty() {
                return Err(Error::InvalidConfig(format!("vocabulary entry '{}' has an empty id", c.name)));
            }
            if !seen.insert(c.id.as_str()) {
                return Err(Error::InvalidConfig(format!("duplicate vocabulary id '{}'", c.id)));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendSettings {
    pub url: String,
    pub index: String,
    pub timeout_secs: u64,
    pub refresh: RefreshPolicy,
}

impl BackendSettings {
    pub fn timeout(&self) -> Duration { Duration::from_secs(self.timeout_secs) }
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            url: "http://localhost:9200".to_string(),
            index: "categories".to_string(),
            timeout_secs: 10,
            refresh: RefreshPolicy::True,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServiceSettings {
    fn default() -> Self { Self { host: "0.0.0.0".to_string(), port: 5030 } }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub level: String,
}

impl Default for LogSettings {
    fn default() -> Self { Self { level: "info".to_string() } }
}

/// Categories loaded into the index at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vocabulary(pub Vec<Category>);

impl Default for Vocabulary {
    fn default() -> Self {
        Self(vec![
            Category::new("foo", "Продукты"),
            Category::new("bar", "Подписка"),
            Category::new("baz", "Такси"),
        ])
    }
}

impl Vocabulary {
    pub fn iter(&self) -> std::slice::Iter<'_, Category> { self.0.iter() }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

pub fn validate_backend_url(raw: &str) -> Result<url::Url> {
    let url = url::Url::parse(raw).map_err(|e| Error::InvalidConfig(format!("backend url '{}': {}", raw, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(Error::InvalidConfig(format!("backend url '{}': unsupported scheme '{}'", raw, other))),
    }
}

/// Index names must be lowercase, non-empty, free of path and wildcard
/// characters, and must not start with `-`, `_` or `+`.
pub fn validate_index_name(name: &str) -> Result<()> {
    const FORBIDDEN: &[char] = &['/', '\\', '*', '?', '"', '<', '>', '|', ',', '#', ' ', ':'];
    if name.is_empty() {
        return Err(Error::InvalidConfig("index name is empty".into()));
    }
    if name == "." || name == ".." {
        return Err(Error::InvalidConfig(format!("index name '{}' is reserved", name)));
    }
    if name.starts_with(['-', '_', '+']) {
        return Err(Error::InvalidConfig(format!("index name '{}' starts with a reserved character", name)));
    }
    if name.chars().any(|c| c.is_uppercase() || FORBIDDEN.contains(&c)) {
        return Err(Error::InvalidConfig(format!("index name '{}' contains uppercase or forbidden characters", name)));
    }
    Ok(())
}
