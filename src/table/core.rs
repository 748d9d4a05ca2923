//! table/core — структура Table и цель диспетчеризации MapRole.
//!
//! Инварианты:
//! - Сконструированная Table всегда «готова»: ровно один валидный хэндл карты
//!   данных и один — карты метаданных (неготового состояния в типе нет).
//! - Пути pin запоминаются только на пути создания; при повторном подключении
//!   по явным путям они не записываются.
//! - Сырые коды вида объекта входят только через TryFrom<u32>/FromStr и
//!   отвергаются до какого-либо обращения к сервису.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use crate::errors::TabError;
use crate::handle::ResourceHandle;
use crate::kernel::{MapFd, MapService};

/// Цель операции над таблицей: карта данных или карта метаданных.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapRole {
    Data,
    Meta,
}

impl MapRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MapRole::Data => "data",
            MapRole::Meta => "meta",
        }
    }
}

impl TryFrom<u32> for MapRole {
    type Error = TabError;

    fn try_from(kind: u32) -> Result<Self, TabError> {
        match kind {
            0 => Ok(MapRole::Data),
            1 => Ok(MapRole::Meta),
            other => Err(TabError::InvalidObjectType {
                kind: other.to_string(),
            }),
        }
    }
}

impl FromStr for MapRole {
    type Err = TabError;

    fn from_str(s: &str) -> Result<Self, TabError> {
        match s {
            "data" => Ok(MapRole::Data),
            "meta" | "metadata" => Ok(MapRole::Meta),
            other => Err(TabError::InvalidObjectType {
                kind: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for MapRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct Table {
    pub(crate) service: Arc<dyn MapService>,
    pub(crate) name: String,
    pub(crate) global: bool,
    pub(crate) key_size: u32,
    pub(crate) leaf_size: u32,
    pub(crate) data: ResourceHandle,
    pub(crate) meta: ResourceHandle,
    pub(crate) data_path: Option<PathBuf>,
    pub(crate) meta_path: Option<PathBuf>,
}

impl Table {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_global(&self) -> bool {
        self.global
    }

    pub fn key_size(&self) -> u32 {
        self.key_size
    }

    pub fn leaf_size(&self) -> u32 {
        self.leaf_size
    }

    pub fn data_fd(&self) -> MapFd {
        self.data.raw()
    }

    pub fn meta_fd(&self) -> MapFd {
        self.meta.raw()
    }

    /// Путь pin карты данных (известен только созданной таблице).
    pub fn data_path(&self) -> Option<&Path> {
        self.data_path.as_deref()
    }

    /// Путь pin карты метаданных (известен только созданной таблице).
    pub fn meta_path(&self) -> Option<&Path> {
        self.meta_path.as_deref()
    }

    pub(crate) fn handle(&self, role: MapRole) -> &ResourceHandle {
        match role {
            MapRole::Data => &self.data,
            MapRole::Meta => &self.meta,
        }
    }
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("name", &self.name)
            .field("global", &self.global)
            .field("key_size", &self.key_size)
            .field("leaf_size", &self.leaf_size)
            .field("data_fd", &self.data.raw())
            .field("meta_fd", &self.meta.raw())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_conversions() {
        assert_eq!(MapRole::try_from(0).unwrap(), MapRole::Data);
        assert_eq!(MapRole::try_from(1).unwrap(), MapRole::Meta);
        assert!(matches!(
            MapRole::try_from(2),
            Err(TabError::InvalidObjectType { .. })
        ));
        assert!(matches!(
            MapRole::try_from(u32::MAX),
            Err(TabError::InvalidObjectType { .. })
        ));

        assert_eq!("data".parse::<MapRole>().unwrap(), MapRole::Data);
        assert_eq!("meta".parse::<MapRole>().unwrap(), MapRole::Meta);
        assert_eq!("metadata".parse::<MapRole>().unwrap(), MapRole::Meta);
        assert!("tables".parse::<MapRole>().is_err());
    }
}
