//! table/ops — CRUD с диспетчеризацией по MapRole.
//!
//! Аргументы и результаты проходят к сервису без перекодирования: флаги
//! update, сырые байты ключей/значений, Option/bool-семантика ответов.
//! Неизвестные виды объектов до этих методов не доходят — их отсекает
//! конверсия в MapRole.

use crate::errors::TabError;
use crate::metrics::{record_delete, record_lookup, record_update};

use super::core::{MapRole, Table};

impl Table {
    pub fn update(
        &self,
        role: MapRole,
        key: &[u8],
        value: &[u8],
        flags: u64,
    ) -> Result<(), TabError> {
        record_update();
        self.service
            .update(self.handle(role).raw(), key, value, flags)
    }

    /// None — ключа нет; различать «нет» и прочие ошибки — дело вызывающего.
    pub fn lookup(&self, role: MapRole, key: &[u8]) -> Result<Option<Vec<u8>>, TabError> {
        record_lookup();
        self.service.lookup(self.handle(role).raw(), key)
    }

    /// true — ключ существовал и удалён.
    pub fn delete(&self, role: MapRole, key: &[u8]) -> Result<bool, TabError> {
        record_delete();
        self.service.delete(self.handle(role).raw(), key)
    }

    /// Ключ, следующий за key; None на входе — начать с первого ключа.
    /// Ok(None) — обход дошёл до конца.
    pub fn next_key(
        &self,
        role: MapRole,
        key: Option<&[u8]>,
    ) -> Result<Option<Vec<u8>>, TabError> {
        self.service.next_key(self.handle(role).raw(), key)
    }
}
