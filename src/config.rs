use crate::core::Result;
use crate::proxy::AutogenerateMode;
use std::env;
use std::path::{Path, PathBuf};

pub const ENV_PROXY_DIR: &str = "LAZYPROXY_DIR";
pub const ENV_PROXY_NAMESPACE: &str = "LAZYPROXY_NAMESPACE";
pub const ENV_AUTOGENERATE: &str = "LAZYPROXY_AUTOGENERATE";

/// Proxy factory configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    /// Directory holding generated proxy artifacts
    pub proxy_dir: PathBuf,

    /// Namespace generated proxy class names live under
    pub proxy_namespace: String,

    /// When artifacts are (re)generated
    pub autogenerate: AutogenerateMode,
}

impl ProxyConfig {
    pub fn new<P: AsRef<Path>>(proxy_dir: P, proxy_namespace: &str) -> Self {
        Self {
            proxy_dir: proxy_dir.as_ref().to_path_buf(),
            proxy_namespace: proxy_namespace.to_string(),
            autogenerate: AutogenerateMode::default(),
        }
    }

    /// Set the artifact directory
    pub fn proxy_dir<P: AsRef<Path>>(mut self, proxy_dir: P) -> Self {
        self.proxy_dir = proxy_dir.as_ref().to_path_buf();
        self
    }

    /// Set the proxy namespace
    pub fn proxy_namespace(mut self, namespace: &str) -> Self {
        self.proxy_namespace = namespace.to_string();
        self
    }

    /// Set the autogeneration mode
    pub fn autogenerate(mut self, mode: AutogenerateMode) -> Self {
        self.autogenerate = mode;
        self
    }

    /// Applies `LAZYPROXY_DIR`, `LAZYPROXY_NAMESPACE` and
    /// `LAZYPROXY_AUTOGENERATE` on top of the defaults.
    pub fn from_env() -> Result<Self> {
        Self::default().with_overrides(|key| env::var(key).ok())
    }

    fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ENV_PROXY_DIR) {
            self.proxy_dir = PathBuf::from(dir);
        }
        if let Some(namespace) = lookup(ENV_PROXY_NAMESPACE) {
            self.proxy_namespace = namespace;
        }
        if let Some(mode) = lookup(ENV_AUTOGENERATE) {
            self.autogenerate = mode.parse()?;
        }
        Ok(self)
    }
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self::new(env::temp_dir().join("lazyproxy"), "Proxies")
    }
}
