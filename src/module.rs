//! module — загрузка всех таблиц скомпилированной программы.
//!
//! Module строит по одному Table на каждый дескриптор таблицы программы и
//! индексирует их по имени. Дескрипторы событий/функций программы этим
//! слоем не обрабатываются.

use std::collections::BTreeMap;
use std::sync::Arc;

use log::info;

use crate::errors::TabError;
use crate::fspath::PinNamespace;
use crate::kernel::MapService;
use crate::program::ProgramTables;
use crate::table::Table;

pub struct Module {
    name: String,
    global: bool,
    tables: BTreeMap<String, Table>,
}

impl Module {
    /// Создать и закрепить все таблицы программы в заданном неймспейсе.
    pub fn load(
        service: Arc<dyn MapService>,
        ns: &PinNamespace,
        name: impl Into<String>,
        prog: &dyn ProgramTables,
        global: bool,
    ) -> Result<Module, TabError> {
        let name = name.into();
        let mut tables = BTreeMap::new();
        for index in 0..prog.table_count() {
            let table = Table::create_from_program(service.clone(), ns, prog, index, global)?;
            tables.insert(table.name().to_string(), table);
        }
        info!("module '{}' loaded: {} table(s)", name, tables.len());
        Ok(Module {
            name,
            global,
            tables,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_global(&self) -> bool {
        self.global
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    pub fn table_mut(&mut self, name: &str) -> Option<&mut Table> {
        self.tables.get_mut(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(|s| s.as_str())
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }

    /// Снять пины всех таблиц модуля. Карты без открытых хэндлов будут
    /// освобождены сервисом.
    pub fn unpin_all(self) -> Result<(), TabError> {
        for (_, table) in self.tables {
            table.unpin()?;
        }
        Ok(())
    }
}
