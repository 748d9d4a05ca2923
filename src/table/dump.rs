//! table/dump — диагностический дамп элементов.
//!
//! Формат: на элемент — строка ключа и строка значения (байты «%02x» через
//! пробел), затем пустая строка. Ошибки обхода поднимаются наверх; ошибки
//! записи в sink игнорируются — дамп наблюдателен и не должен ронять
//! вызывающего из-за сломанного вывода.

use std::io::Write;

use crate::errors::TabError;
use crate::util::hex_line;

use super::core::Table;

impl Table {
    pub fn dump_elements(&self, out: &mut dyn Write) -> Result<(), TabError> {
        let elems = self.elements()?;
        for (key, value) in &elems {
            let _ = writeln!(out, "{}", hex_line(key));
            let _ = writeln!(out, "{}", hex_line(value));
            let _ = writeln!(out);
        }
        Ok(())
    }
}
