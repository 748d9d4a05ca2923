//! table/scan — полный обход элементов таблицы.
//!
//! Протокол:
//! - сперва читается запись метаданных (ключ 0); её отсутствие или ошибка
//!   чтения прерывает обход той же ошибкой;
//! - курсор: None → первый ключ; дальше next_key(последний отданный ключ);
//!   Ok(None) от next_key — нормальное завершение (пустая таблица — успех
//!   с пустым результатом);
//! - каждый полученный ключ добирается lookup'ом; исчезнувшее между
//!   next_key и lookup значение — жёсткая ошибка обхода (NotFound), как и
//!   любая другая ошибка lookup;
//! - обход не изолирован от конкурентных писателей: возможны пропуски и
//!   повторы ключей — документированное свойство, не дефект.

use std::collections::BTreeMap;

use log::debug;

use crate::errors::TabError;
use crate::meta::{meta_key_bytes, TableDescr};
use crate::metrics::{record_walk, record_walk_entries};

use super::core::{MapRole, Table};

impl Table {
    /// Все пары (ключ, значение) карты данных на момент обхода.
    pub fn elements(&self) -> Result<BTreeMap<Vec<u8>, Vec<u8>>, TabError> {
        record_walk();

        let raw = self
            .lookup(MapRole::Meta, &meta_key_bytes())?
            .ok_or(TabError::NotFound)?;
        let descr = TableDescr::decode(&raw)?;
        debug!(
            "walk '{}': key_size={} leaf_size={}",
            self.name, descr.key_size, descr.leaf_size
        );

        let mut out: BTreeMap<Vec<u8>, Vec<u8>> = BTreeMap::new();
        let mut cursor: Option<Vec<u8>> = None;
        while let Some(key) = self.next_key(MapRole::Data, cursor.as_deref())? {
            let value = self.lookup(MapRole::Data, &key)?.ok_or(TabError::NotFound)?;
            out.insert(key.clone(), value);
            cursor = Some(key);
        }

        record_walk_entries(out.len() as u64);
        Ok(out)
    }
}
