// src/meta.rs — запись метаданных таблицы (descr)
//
// Формат значения в карте метаданных (LE, 16 байт):
// u32 key_size
// u32 key_desc_len
// u32 leaf_size
// u32 leaf_desc_len
//
// Политика:
// - На таблицу ровно одна запись, под ключом META_KEY (u32 LE).
// - Пишется при создании таблицы флагом UPDATE_ANY (insert-or-update).
// - *_desc_len — длины текстовых описаний типов из дескриптора программы;
//   сами строки в карту не попадают.
// - Любой открывший pin карты метаданных читатель восстанавливает размеры
//   ключа/значения без внешней конфигурации.

use byteorder::{ByteOrder, LittleEndian};

use crate::consts::{DESCR_SIZE, META_KEY};
use crate::errors::TabError;
use crate::program::ProgramTables;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableDescr {
    pub key_size: u32,
    pub key_desc_len: u32,
    pub leaf_size: u32,
    pub leaf_desc_len: u32,
}

impl TableDescr {
    /// Запись без текстовых описаний типов.
    pub fn new(key_size: u32, leaf_size: u32) -> Self {
        Self {
            key_size,
            key_desc_len: 0,
            leaf_size,
            leaf_desc_len: 0,
        }
    }

    /// Собрать запись из дескриптора таблицы программы по индексу.
    pub fn from_program(prog: &dyn ProgramTables, index: usize) -> Result<Self, TabError> {
        let key_desc_len = prog
            .table_key_desc(index)?
            .map(|s| s.len() as u32)
            .unwrap_or(0);
        let leaf_desc_len = prog
            .table_leaf_desc(index)?
            .map(|s| s.len() as u32)
            .unwrap_or(0);
        Ok(Self {
            key_size: prog.table_key_size(index)?,
            key_desc_len,
            leaf_size: prog.table_leaf_size(index)?,
            leaf_desc_len,
        })
    }

    pub fn encode(&self) -> [u8; DESCR_SIZE] {
        let mut buf = [0u8; DESCR_SIZE];
        LittleEndian::write_u32(&mut buf[0..4], self.key_size);
        LittleEndian::write_u32(&mut buf[4..8], self.key_desc_len);
        LittleEndian::write_u32(&mut buf[8..12], self.leaf_size);
        LittleEndian::write_u32(&mut buf[12..16], self.leaf_desc_len);
        buf
    }

    pub fn decode(buf: &[u8]) -> Result<Self, TabError> {
        if buf.len() != DESCR_SIZE {
            return Err(TabError::invalid_input(
                "descr decode",
                format!("metadata record has {} bytes, want {}", buf.len(), DESCR_SIZE),
            ));
        }
        Ok(Self {
            key_size: LittleEndian::read_u32(&buf[0..4]),
            key_desc_len: LittleEndian::read_u32(&buf[4..8]),
            leaf_size: LittleEndian::read_u32(&buf[8..12]),
            leaf_desc_len: LittleEndian::read_u32(&buf[12..16]),
        })
    }
}

/// Ключ записи метаданных в байтовом виде (u32 LE).
#[inline]
pub fn meta_key_bytes() -> [u8; 4] {
    let mut k = [0u8; 4];
    LittleEndian::write_u32(&mut k, META_KEY);
    k
}
