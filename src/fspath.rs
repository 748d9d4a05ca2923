//! Раскладка pin-путей.
//!
//! <root>/globals/tables/<name>            — глобальные таблицы
//! <root>/modules/<module>/tables/<name>   — таблицы одного модуля
//!
//! Карта метаданных закрепляется рядом с картой данных: <name> + "_metadata".
//! Построение путей — чистая операция; каталоги создаёт сервис при pin.

use std::path::{Path, PathBuf};

use crate::config::PinConfig;
use crate::consts::{GLOBALS_DIR, META_SUFFIX, MODULES_DIR, TABLES_DIR};
use crate::errors::TabError;

#[derive(Debug, Clone)]
pub struct PinNamespace {
    root: PathBuf,
    module: Option<String>,
}

impl PinNamespace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            module: None,
        }
    }

    pub fn from_config(cfg: &PinConfig) -> Self {
        Self {
            root: cfg.pin_root.clone(),
            module: cfg.module.clone(),
        }
    }

    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn module(&self) -> Option<&str> {
        self.module.as_deref()
    }

    /// Каталог таблиц для области видимости.
    pub fn tables_dir(&self, global: bool) -> Result<PathBuf, TabError> {
        if global {
            return Ok(self.root.join(GLOBALS_DIR).join(TABLES_DIR));
        }
        match self.module.as_deref() {
            Some(m) => {
                check_component("module", m)?;
                Ok(self.root.join(MODULES_DIR).join(m).join(TABLES_DIR))
            }
            None => Err(TabError::PathConstruction(
                "local scope requires a module name".to_string(),
            )),
        }
    }

    /// Pin-путь карты данных таблицы.
    pub fn data_path(&self, name: &str, global: bool) -> Result<PathBuf, TabError> {
        check_component("table name", name)?;
        Ok(self.tables_dir(global)?.join(name))
    }

    /// Pin-путь карты метаданных таблицы.
    pub fn meta_path(&self, name: &str, global: bool) -> Result<PathBuf, TabError> {
        check_component("table name", name)?;
        Ok(self
            .tables_dir(global)?
            .join(format!("{}{}", name, META_SUFFIX)))
    }
}

/// Имя компонента пути: непустое, без разделителей и NUL.
fn check_component(what: &str, s: &str) -> Result<(), TabError> {
    if s.is_empty() {
        return Err(TabError::PathConstruction(format!("empty {}", what)));
    }
    if s.contains('/') || s.contains('\0') || s == "." || s == ".." {
        return Err(TabError::PathConstruction(format!(
            "bad {} '{}'",
            what, s
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_and_module_shapes() {
        let ns = PinNamespace::new("/sys/fs/bpf/pinkv");
        assert_eq!(
            ns.data_path("counts", true).unwrap(),
            PathBuf::from("/sys/fs/bpf/pinkv/globals/tables/counts")
        );
        assert_eq!(
            ns.meta_path("counts", true).unwrap(),
            PathBuf::from("/sys/fs/bpf/pinkv/globals/tables/counts_metadata")
        );

        let ns = ns.with_module("fw0");
        assert_eq!(
            ns.data_path("counts", false).unwrap(),
            PathBuf::from("/sys/fs/bpf/pinkv/modules/fw0/tables/counts")
        );
        assert_eq!(
            ns.meta_path("counts", false).unwrap(),
            PathBuf::from("/sys/fs/bpf/pinkv/modules/fw0/tables/counts_metadata")
        );
    }

    #[test]
    fn local_scope_without_module_fails() {
        let ns = PinNamespace::new("/sys/fs/bpf/pinkv");
        let err = ns.data_path("counts", false).unwrap_err();
        assert!(matches!(err, TabError::PathConstruction(_)));
    }

    #[test]
    fn bad_names_rejected() {
        let ns = PinNamespace::new("/x");
        assert!(ns.data_path("", true).is_err());
        assert!(ns.data_path("a/b", true).is_err());
        assert!(ns.data_path("..", true).is_err());
        assert!(ns.clone().with_module("a/b").tables_dir(false).is_err());
    }
}
