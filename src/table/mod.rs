//! table — таблицы на картах ядра (пара данные + метаданные)
//!
//! Разделение по подмодулям:
//! - core.rs — структура Table, цель диспетчеризации MapRole, аксессоры
//! - open.rs — два пути инициализации (attach_pinned / create_from_program), unpin
//! - ops.rs  — CRUD с диспетчеризацией по MapRole
//! - scan.rs — полный обход (протокол курсора поверх next_key)
//! - dump.rs — hex-дамп элементов в подставленный sink

pub mod core;
pub mod dump;
pub mod open;
pub mod ops;
pub mod scan;

pub use core::{MapRole, Table};
