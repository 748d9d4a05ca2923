//! Дескрипторы таблиц скомпилированной программы.
//!
//! ProgramTables — узкий интерфейс запросов: сколько таблиц в программе и
//! какова схема каждой (вид карты, размеры, имя, текстовые описания типов).
//! ProgramSpec — конкретная serde-реализация: JSON-артефакт со списком таблиц,
//! который компилятор программы кладёт рядом с объектником.
//!
//! JSON формат:
//! {
//!   "name": "counter-prog",
//!   "tables": [
//!     {"name": "counts", "kind": 1, "key_size": 4, "leaf_size": 16,
//!      "max_entries": 1, "key_desc": "u32", "leaf_desc": "struct counters"}
//!   ]
//! }
//! kind по умолчанию — hash; key_desc/leaf_desc опциональны.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::MAP_KIND_HASH;
use crate::errors::TabError;

pub trait ProgramTables {
    fn table_count(&self) -> usize;
    fn table_name(&self, index: usize) -> Result<&str, TabError>;
    fn table_kind(&self, index: usize) -> Result<u32, TabError>;
    fn table_key_size(&self, index: usize) -> Result<u32, TabError>;
    fn table_leaf_size(&self, index: usize) -> Result<u32, TabError>;
    fn table_max_entries(&self, index: usize) -> Result<u32, TabError>;
    fn table_key_desc(&self, index: usize) -> Result<Option<&str>, TabError>;
    fn table_leaf_desc(&self, index: usize) -> Result<Option<&str>, TabError>;
}

fn default_kind() -> u32 {
    MAP_KIND_HASH
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSpec {
    pub name: String,
    #[serde(default = "default_kind")]
    pub kind: u32,
    pub key_size: u32,
    pub leaf_size: u32,
    pub max_entries: u32,
    #[serde(default)]
    pub key_desc: Option<String>,
    #[serde(default)]
    pub leaf_desc: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramSpec {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tables: Vec<TableSpec>,
}

impl ProgramSpec {
    pub fn from_json_str(s: &str) -> Result<Self, TabError> {
        serde_json::from_str(s).map_err(|e| TabError::Program(format!("parse spec json: {}", e)))
    }

    pub fn from_json_file(path: &Path) -> Result<Self, TabError> {
        let raw = fs::read_to_string(path)
            .map_err(|e| TabError::Program(format!("read {}: {}", path.display(), e)))?;
        Self::from_json_str(&raw)
    }

    fn table(&self, index: usize) -> Result<&TableSpec, TabError> {
        self.tables.get(index).ok_or_else(|| {
            TabError::Program(format!(
                "table index {} out of range ({} tables)",
                index,
                self.tables.len()
            ))
        })
    }
}

impl ProgramTables for ProgramSpec {
    fn table_count(&self) -> usize {
        self.tables.len()
    }

    fn table_name(&self, index: usize) -> Result<&str, TabError> {
        Ok(&self.table(index)?.name)
    }

    fn table_kind(&self, index: usize) -> Result<u32, TabError> {
        Ok(self.table(index)?.kind)
    }

    fn table_key_size(&self, index: usize) -> Result<u32, TabError> {
        Ok(self.table(index)?.key_size)
    }

    fn table_leaf_size(&self, index: usize) -> Result<u32, TabError> {
        Ok(self.table(index)?.leaf_size)
    }

    fn table_max_entries(&self, index: usize) -> Result<u32, TabError> {
        Ok(self.table(index)?.max_entries)
    }

    fn table_key_desc(&self, index: usize) -> Result<Option<&str>, TabError> {
        Ok(self.table(index)?.key_desc.as_deref())
    }

    fn table_leaf_desc(&self, index: usize) -> Result<Option<&str>, TabError> {
        Ok(self.table(index)?.leaf_desc.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_with_defaults() {
        let spec = ProgramSpec::from_json_str(
            r#"{"tables":[{"name":"t0","key_size":4,"leaf_size":16,"max_entries":1}]}"#,
        )
        .unwrap();
        assert_eq!(spec.table_count(), 1);
        assert_eq!(spec.table_name(0).unwrap(), "t0");
        assert_eq!(spec.table_kind(0).unwrap(), MAP_KIND_HASH);
        assert_eq!(spec.table_key_desc(0).unwrap(), None);
    }

    #[test]
    fn out_of_range_index() {
        let spec = ProgramSpec::from_json_str(r#"{"tables":[]}"#).unwrap();
        assert!(matches!(spec.table_name(0), Err(TabError::Program(_))));
    }

    #[test]
    fn bad_json_is_program_error() {
        assert!(matches!(
            ProgramSpec::from_json_str("{nope"),
            Err(TabError::Program(_))
        ));
    }
}
