//! kernel — сервис карт ядра (контракт + бэкенды)
//!
//! Разделение:
//! - mod.rs — трейт MapService (узкий контракт: create/open/pin/unpin + CRUD + next_key).
//! - mem.rs — MemMapService: внутрипроцессная эмуляция (fd-таблица, pin-реестр, BTreeMap).
//! - bpf.rs — BpfMapService: сырой bpf(2) syscall-бэкенд (только Linux).
//!
//! Семантика, общая для бэкендов:
//! - Хэндл — небольшой неотрицательный i32; живой хэндл никогда не выдаётся дважды.
//! - "Не найдено" — не ошибка: lookup/next_key возвращают Option, delete — bool.
//! - next_key(None) — первый ключ в порядке обхода; Ok(None) — конец обхода.
//!   Порядок обхода — деталь бэкенда, снаружи на него полагаться нельзя.
//! - Флаги update (UPDATE_ANY/NOEXIST/EXIST) передаются без перекодирования.

use std::path::Path;

use crate::errors::TabError;

/// Сырой хэндл карты (в духе файлового дескриптора).
pub type MapFd = i32;

pub trait MapService: Send + Sync {
    /// Создать карту заданного вида и схемы, вернуть хэндл.
    fn create_map(
        &self,
        kind: u32,
        key_size: u32,
        leaf_size: u32,
        max_entries: u32,
    ) -> Result<MapFd, TabError>;

    /// Открыть ранее закреплённую карту по pin-пути.
    fn open_pinned(&self, path: &Path) -> Result<MapFd, TabError>;

    /// Закрепить карту по pin-пути (родительские каталоги создаются).
    fn pin(&self, fd: MapFd, path: &Path) -> Result<(), TabError>;

    /// Снять закрепление. Открытые хэндлы продолжают действовать.
    fn unpin(&self, path: &Path) -> Result<(), TabError>;

    fn update(&self, fd: MapFd, key: &[u8], value: &[u8], flags: u64) -> Result<(), TabError>;

    fn lookup(&self, fd: MapFd, key: &[u8]) -> Result<Option<Vec<u8>>, TabError>;

    /// true — ключ существовал и удалён; false — ключа не было.
    fn delete(&self, fd: MapFd, key: &[u8]) -> Result<bool, TabError>;

    /// Ключ, следующий за `key`; None на входе — начать с первого.
    fn next_key(&self, fd: MapFd, key: Option<&[u8]>) -> Result<Option<Vec<u8>>, TabError>;

    /// Закрыть хэндл. Ошибки закрытия поглощаются.
    fn close(&self, fd: MapFd);
}

pub mod mem;

#[cfg(target_os = "linux")]
pub mod bpf;

pub use mem::MemMapService;

#[cfg(target_os = "linux")]
pub use bpf::BpfMapService;
