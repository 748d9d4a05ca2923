//! table/open — два пути инициализации таблицы.
//!
//! attach_pinned: открыть обе ранее закреплённые карты по явным путям.
//! Размеры ключа/значения обязан знать вызывающий — на этом пути они
//! ниоткуда не выводятся (самоописание читается из карты метаданных теми,
//! кому оно нужно, до вызова).
//!
//! create_from_program: создать карту данных по дескриптору программы,
//! закрепить её, создать и закрепить карту метаданных, записать descr.
//!
//! Политика удаления: Drop таблицы закрывает хэндлы и не трогает пины —
//! закрепление и есть механизм переживания процесса. Снятие пинов только
//! явное: unpin().

use std::path::Path;
use std::sync::Arc;

use log::{debug, info};

use crate::consts::{DESCR_SIZE, META_KEY_SIZE, META_MAP_KIND, META_MAX_ENTRIES, UPDATE_ANY};
use crate::errors::TabError;
use crate::fspath::PinNamespace;
use crate::handle::ResourceHandle;
use crate::kernel::MapService;
use crate::meta::{meta_key_bytes, TableDescr};
use crate::metrics::{record_map_created, record_map_opened, record_pin, record_unpin};
use crate::program::ProgramTables;

use super::core::Table;

impl Table {
    /// Повторное подключение к ранее закреплённой паре карт.
    pub fn attach_pinned(
        service: Arc<dyn MapService>,
        name: impl Into<String>,
        global: bool,
        key_size: u32,
        leaf_size: u32,
        data_path: &Path,
        meta_path: &Path,
    ) -> Result<Table, TabError> {
        let name = name.into();

        let data = ResourceHandle::adopt(service.clone(), service.open_pinned(data_path)?)?;
        record_map_opened();
        let meta = ResourceHandle::adopt(service.clone(), service.open_pinned(meta_path)?)?;
        record_map_opened();

        debug!(
            "table attached: name={} data_fd={} meta_fd={} from {} + {}",
            name,
            data.raw(),
            meta.raw(),
            data_path.display(),
            meta_path.display()
        );

        Ok(Table {
            service,
            name,
            global,
            key_size,
            leaf_size,
            data,
            meta,
            data_path: None,
            meta_path: None,
        })
    }

    /// Создать таблицу по дескриптору программы (index) и закрепить обе карты.
    pub fn create_from_program(
        service: Arc<dyn MapService>,
        ns: &PinNamespace,
        prog: &dyn ProgramTables,
        index: usize,
        global: bool,
    ) -> Result<Table, TabError> {
        // 1) схема из дескриптора программы
        let name = prog.table_name(index)?.to_string();
        let kind = prog.table_kind(index)?;
        let key_size = prog.table_key_size(index)?;
        let leaf_size = prog.table_leaf_size(index)?;
        let max_entries = prog.table_max_entries(index)?;

        // 2) карта данных
        let data = ResourceHandle::adopt(
            service.clone(),
            service.create_map(kind, key_size, leaf_size, max_entries)?,
        )?;
        record_map_created();

        // 3) оба pin-пути строятся до первого закрепления
        let data_path = ns.data_path(&name, global)?;
        let meta_path = ns.meta_path(&name, global)?;

        // 4) закрепить карту данных
        pin_as(&*service, &data, &data_path, &name)?;
        record_pin();

        // 5) запись метаданных из дескриптора программы
        let descr = TableDescr::from_program(prog, index)?;

        // 6) карта метаданных: hash, ключ u32, ровно одна запись
        let meta = ResourceHandle::adopt(
            service.clone(),
            service.create_map(
                META_MAP_KIND,
                META_KEY_SIZE,
                DESCR_SIZE as u32,
                META_MAX_ENTRIES,
            )?,
        )?;
        record_map_created();

        // 7) закрепить карту метаданных
        pin_as(&*service, &meta, &meta_path, &name)?;
        record_pin();

        // 8) descr под ключом 0, insert-or-update
        service.update(meta.raw(), &meta_key_bytes(), &descr.encode(), UPDATE_ANY)?;

        info!(
            "table created: name={} global={} key_size={} leaf_size={} max_entries={} pinned at {}",
            name,
            global,
            key_size,
            leaf_size,
            max_entries,
            data_path.display()
        );

        Ok(Table {
            service,
            name,
            global,
            key_size,
            leaf_size,
            data,
            meta,
            data_path: Some(data_path),
            meta_path: Some(meta_path),
        })
    }

    /// Снять оба пина и закрыть хэндлы. Работает только для таблицы, созданной
    /// в этом процессе: у подключённой по явным путям пины не записаны, для неё
    /// снимайте закрепление по путям через сервис.
    pub fn unpin(self) -> Result<(), TabError> {
        let (data_path, meta_path) = match (&self.data_path, &self.meta_path) {
            (Some(d), Some(m)) => (d.clone(), m.clone()),
            _ => {
                return Err(TabError::PathConstruction(
                    "pin paths were not recorded for this table".to_string(),
                ))
            }
        };
        self.service.unpin(&data_path)?;
        record_unpin();
        self.service.unpin(&meta_path)?;
        record_unpin();
        info!(
            "table unpinned: name={} ({} + {})",
            self.name,
            data_path.display(),
            meta_path.display()
        );
        // self дропается здесь — хэндлы закрываются, карты освобождает ядро/сервис
        Ok(())
    }
}

fn pin_as(
    service: &dyn MapService,
    handle: &ResourceHandle,
    path: &Path,
    table: &str,
) -> Result<(), TabError> {
    service.pin(handle.raw(), path).map_err(|e| match e {
        TabError::Kernel { source, .. } => TabError::Persist {
            name: table.to_string(),
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })
}
