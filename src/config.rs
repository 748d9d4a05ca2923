//! Centralized configuration for PinKV.
//!
//! Goals:
//! - Single place for tunables instead of scattering env lookups.
//! - PinConfig::from_env() reads PINKV_* variables; fluent with_* setters
//!   override specific fields.
//!
//! Tunables:
//! - pin_root: root of the pin namespace (a mounted bpffs in the kernel case).
//! - module: module name for local-scope tables; None means only global
//!   scope is available.

use std::fmt;
use std::path::PathBuf;

use crate::consts::DEFAULT_PIN_ROOT;

#[derive(Clone, Debug)]
pub struct PinConfig {
    /// Root of the pin namespace.
    /// Env: PINKV_ROOT (default "/sys/fs/bpf/pinkv")
    pub pin_root: PathBuf,

    /// Module name for local-scope tables.
    /// Env: PINKV_MODULE (default unset)
    pub module: Option<String>,
}

impl Default for PinConfig {
    fn default() -> Self {
        Self {
            pin_root: PathBuf::from(DEFAULT_PIN_ROOT),
            module: None,
        }
    }
}

impl PinConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("PINKV_ROOT") {
            let s = v.trim();
            if !s.is_empty() {
                cfg.pin_root = PathBuf::from(s);
            }
        }

        if let Ok(v) = std::env::var("PINKV_MODULE") {
            let s = v.trim();
            if !s.is_empty() {
                cfg.module = Some(s.to_string());
            }
        }

        cfg
    }

    /// Fluent setters (builder-style) to override specific fields.

    pub fn with_pin_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.pin_root = root.into();
        self
    }

    pub fn with_module<S: Into<String>>(mut self, module: Option<S>) -> Self {
        self.module = module.map(Into::into);
        self
    }

    /// Finish the builder and obtain the configuration.
    pub fn build(self) -> Self {
        self
    }
}

impl fmt::Display for PinConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PinConfig {{ pin_root: {}, module: {} }}",
            self.pin_root.display(),
            self.module.as_deref().unwrap_or("none"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_and_builder() {
        let cfg = PinConfig::default();
        assert_eq!(cfg.pin_root, PathBuf::from(DEFAULT_PIN_ROOT));
        assert!(cfg.module.is_none());

        let cfg = PinConfig::default()
            .with_pin_root("/tmp/pins")
            .with_module(Some("fw0"))
            .build();
        assert_eq!(cfg.pin_root, PathBuf::from("/tmp/pins"));
        assert_eq!(cfg.module.as_deref(), Some("fw0"));

        let s = cfg.to_string();
        assert!(s.contains("/tmp/pins"));
        assert!(s.contains("fw0"));
    }
}
