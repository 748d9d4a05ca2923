//! Общие константы (виды карт, флаги update, метаданные, pin-раскладка).

// -------- Map kinds (нумерация ядра) --------
pub const MAP_KIND_UNSPEC: u32 = 0;
pub const MAP_KIND_HASH: u32 = 1;
pub const MAP_KIND_ARRAY: u32 = 2;

// -------- Update flags (семантика ядра, передаются как есть) --------
pub const UPDATE_ANY: u64 = 0; // insert-or-update
pub const UPDATE_NOEXIST: u64 = 1; // только вставка
pub const UPDATE_EXIST: u64 = 2; // только обновление

// -------- Metadata record --------
// Формат записи (LE, 16 байт):
// [key_size u32][key_desc_len u32][leaf_size u32][leaf_desc_len u32]
pub const DESCR_SIZE: usize = 16;

// Карта метаданных: hash, ключ u32, ровно одна запись под ключом 0.
pub const META_KEY: u32 = 0;
pub const META_KEY_SIZE: u32 = 4;
pub const META_MAX_ENTRIES: u32 = 1;
pub const META_MAP_KIND: u32 = MAP_KIND_HASH;

// Суффикс pin-пути карты метаданных: <dir>/<name>_metadata
pub const META_SUFFIX: &str = "_metadata";

// -------- Pin namespace --------
// <root>/globals/tables/<name>            — глобальная область
// <root>/modules/<module>/tables/<name>   — область модуля
pub const GLOBALS_DIR: &str = "globals";
pub const MODULES_DIR: &str = "modules";
pub const TABLES_DIR: &str = "tables";

pub const DEFAULT_PIN_ROOT: &str = "/sys/fs/bpf/pinkv";
