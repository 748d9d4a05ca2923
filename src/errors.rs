//! Типизированные ошибки таблиц и сервиса карт.
//!
//! Закрытый набор: всё, что может пойти не так на пути
//! создание → pin → CRUD → обход. "Не найдено" и "конец обхода"
//! ошибками не являются (Option/bool на соответствующих операциях).

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TabError {
    /// Creation or open yielded a negative map handle.
    #[error("invalid map handle (fd {fd})")]
    InvalidHandle { fd: i32 },

    /// Raw object kind not recognized at the dispatch boundary.
    #[error("invalid object kind '{kind}'")]
    InvalidObjectType { kind: String },

    /// Pin path could not be built for the table's scope.
    #[error("pin path construction failed: {0}")]
    PathConstruction(String),

    /// Pinning the map into the filesystem failed.
    #[error("persist failed for table '{name}' at {path}: {source}")]
    Persist {
        name: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Map operation rejected by the kernel/service.
    #[error("map {op} failed: {source}")]
    Kernel {
        op: &'static str,
        #[source]
        source: io::Error,
    },

    /// Update with UPDATE_EXIST hit an absent key, or a value vanished mid-walk.
    #[error("key not found")]
    NotFound,

    /// Update with UPDATE_NOEXIST hit a present key.
    #[error("key already exists")]
    AlreadyExists,

    /// Table descriptor index out of range or malformed.
    #[error("program descriptor: {0}")]
    Program(String),
}

impl TabError {
    #[inline]
    pub fn kernel(op: &'static str, source: io::Error) -> Self {
        Self::Kernel { op, source }
    }

    /// Размерность ключа/значения не совпала со схемой карты.
    #[inline]
    pub fn invalid_input(op: &'static str, msg: impl Into<String>) -> Self {
        Self::Kernel {
            op,
            source: io::Error::new(io::ErrorKind::InvalidInput, msg.into()),
        }
    }

    #[inline]
    pub fn invalid_handle(fd: i32) -> Self {
        Self::InvalidHandle { fd }
    }
}
