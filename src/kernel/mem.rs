//! kernel/mem — внутрипроцессная эмуляция сервиса карт.
//!
//! Что внутри:
//! - fd-таблица: счётчик next_fd (с 3, как у файловых дескрипторов) + map открытых fd.
//! - pin-реестр: PathBuf → id карты; pin/open_pinned работают без файловой системы.
//! - Объект карты живёт, пока на него ссылается хотя бы один открытый fd или pin;
//!   последний close/unpin освобождает его.
//! - Записи в BTreeMap: next_key(Some(k)) — первый ключ строго больше k (определён и
//!   для уже удалённого k), next_key(None) — первый ключ. Байтовый порядок обхода —
//!   деталь эмуляции.
//! - Вид карты (kind) сохраняется в схеме, но семантику эмуляции не меняет.

use std::collections::{BTreeMap, HashMap};
use std::ops::Bound::{Excluded, Unbounded};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::warn;

use crate::consts::{UPDATE_ANY, UPDATE_EXIST, UPDATE_NOEXIST};
use crate::errors::TabError;

use super::{MapFd, MapService};

struct MapObject {
    kind: u32,
    key_size: u32,
    leaf_size: u32,
    max_entries: u32,
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
}

struct MemState {
    next_fd: MapFd,
    next_map_id: u64,
    open: HashMap<MapFd, u64>,
    maps: HashMap<u64, MapObject>,
    pins: HashMap<PathBuf, u64>,
}

impl MemState {
    fn resolve(&self, fd: MapFd) -> Result<u64, TabError> {
        self.open
            .get(&fd)
            .copied()
            .ok_or(TabError::InvalidHandle { fd })
    }

    fn map_mut(&mut self, fd: MapFd) -> Result<&mut MapObject, TabError> {
        let id = self.resolve(fd)?;
        // id из open всегда присутствует в maps (освобождение идёт через release_if_orphan)
        self.maps
            .get_mut(&id)
            .ok_or(TabError::InvalidHandle { fd })
    }

    fn alloc_fd(&mut self, id: u64) -> MapFd {
        let fd = self.next_fd;
        self.next_fd += 1;
        self.open.insert(fd, id);
        fd
    }

    fn release_if_orphan(&mut self, id: u64) {
        let referenced =
            self.open.values().any(|&v| v == id) || self.pins.values().any(|&v| v == id);
        if !referenced {
            self.maps.remove(&id);
        }
    }
}

pub struct MemMapService {
    state: Mutex<MemState>,
}

impl MemMapService {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MemState {
                next_fd: 3,
                next_map_id: 1,
                open: HashMap::new(),
                maps: HashMap::new(),
                pins: HashMap::new(),
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemState> {
        // Отравленный Mutex здесь означает панику под замком в этом же модуле;
        // продолжаем с внутренним состоянием, оно согласовано между операциями.
        match self.state.lock() {
            Ok(g) => g,
            Err(p) => p.into_inner(),
        }
    }
}

impl Default for MemMapService {
    fn default() -> Self {
        Self::new()
    }
}

impl MapService for MemMapService {
    fn create_map(
        &self,
        kind: u32,
        key_size: u32,
        leaf_size: u32,
        max_entries: u32,
    ) -> Result<MapFd, TabError> {
        if key_size == 0 || leaf_size == 0 || max_entries == 0 {
            warn!(
                "map create rejected: kind={} key_size={} leaf_size={} max_entries={}",
                kind, key_size, leaf_size, max_entries
            );
            return Err(TabError::invalid_handle(-1));
        }
        let mut st = self.lock();
        let id = st.next_map_id;
        st.next_map_id += 1;
        st.maps.insert(
            id,
            MapObject {
                kind,
                key_size,
                leaf_size,
                max_entries,
                entries: BTreeMap::new(),
            },
        );
        Ok(st.alloc_fd(id))
    }

    fn open_pinned(&self, path: &Path) -> Result<MapFd, TabError> {
        let mut st = self.lock();
        let id = match st.pins.get(path) {
            Some(&id) => id,
            None => {
                warn!("map open failed: no pin at {}", path.display());
                return Err(TabError::invalid_handle(-1));
            }
        };
        Ok(st.alloc_fd(id))
    }

    fn pin(&self, fd: MapFd, path: &Path) -> Result<(), TabError> {
        let mut st = self.lock();
        let id = st.resolve(fd)?;
        if st.pins.contains_key(path) {
            return Err(TabError::kernel(
                "pin",
                std::io::Error::new(
                    std::io::ErrorKind::AlreadyExists,
                    format!("pin already exists at {}", path.display()),
                ),
            ));
        }
        st.pins.insert(path.to_path_buf(), id);
        Ok(())
    }

    fn unpin(&self, path: &Path) -> Result<(), TabError> {
        let mut st = self.lock();
        let id = match st.pins.remove(path) {
            Some(id) => id,
            None => {
                return Err(TabError::kernel(
                    "unpin",
                    std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        format!("no pin at {}", path.display()),
                    ),
                ))
            }
        };
        st.release_if_orphan(id);
        Ok(())
    }

    fn update(&self, fd: MapFd, key: &[u8], value: &[u8], flags: u64) -> Result<(), TabError> {
        let mut st = self.lock();
        let map = st.map_mut(fd)?;
        if key.len() != map.key_size as usize {
            return Err(TabError::invalid_input(
                "update",
                format!("key is {} B, map wants {}", key.len(), map.key_size),
            ));
        }
        if value.len() != map.leaf_size as usize {
            return Err(TabError::invalid_input(
                "update",
                format!("value is {} B, map wants {}", value.len(), map.leaf_size),
            ));
        }
        let present = map.entries.contains_key(key);
        match flags {
            UPDATE_ANY => {}
            UPDATE_NOEXIST => {
                if present {
                    return Err(TabError::AlreadyExists);
                }
            }
            UPDATE_EXIST => {
                if !present {
                    return Err(TabError::NotFound);
                }
            }
            other => {
                return Err(TabError::invalid_input(
                    "update",
                    format!("unknown update flags {}", other),
                ))
            }
        }
        if !present && map.entries.len() >= map.max_entries as usize {
            return Err(TabError::kernel(
                "update",
                std::io::Error::new(std::io::ErrorKind::OutOfMemory, "map is full"),
            ));
        }
        map.entries.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn lookup(&self, fd: MapFd, key: &[u8]) -> Result<Option<Vec<u8>>, TabError> {
        let mut st = self.lock();
        let map = st.map_mut(fd)?;
        if key.len() != map.key_size as usize {
            return Err(TabError::invalid_input(
                "lookup",
                format!("key is {} B, map wants {}", key.len(), map.key_size),
            ));
        }
        Ok(map.entries.get(key).cloned())
    }

    fn delete(&self, fd: MapFd, key: &[u8]) -> Result<bool, TabError> {
        let mut st = self.lock();
        let map = st.map_mut(fd)?;
        if key.len() != map.key_size as usize {
            return Err(TabError::invalid_input(
                "delete",
                format!("key is {} B, map wants {}", key.len(), map.key_size),
            ));
        }
        Ok(map.entries.remove(key).is_some())
    }

    fn next_key(&self, fd: MapFd, key: Option<&[u8]>) -> Result<Option<Vec<u8>>, TabError> {
        let mut st = self.lock();
        let map = st.map_mut(fd)?;
        match key {
            None => Ok(map.entries.keys().next().cloned()),
            Some(k) => {
                if k.len() != map.key_size as usize {
                    return Err(TabError::invalid_input(
                        "next_key",
                        format!("key is {} B, map wants {}", k.len(), map.key_size),
                    ));
                }
                Ok(map
                    .entries
                    .range::<[u8], _>((Excluded(k), Unbounded))
                    .next()
                    .map(|(nk, _)| nk.clone()))
            }
        }
    }

    fn close(&self, fd: MapFd) {
        let mut st = self.lock();
        if let Some(id) = st.open.remove(&fd) {
            st.release_if_orphan(id);
        }
    }
}

impl MemMapService {
    /// Схема карты по хэндлу: (kind, key_size, leaf_size, max_entries).
    pub fn map_schema(&self, fd: MapFd) -> Result<(u32, u32, u32, u32), TabError> {
        let mut st = self.lock();
        let map = st.map_mut(fd)?;
        Ok((map.kind, map.key_size, map.leaf_size, map.max_entries))
    }

    /// Количество живых карт (для тестов освобождения).
    pub fn live_maps(&self) -> usize {
        self.lock().maps.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crud_and_flags() {
        let svc = MemMapService::new();
        let fd = svc.create_map(1, 4, 8, 16).unwrap();
        assert!(fd >= 3);

        // UPDATE_NOEXIST: вставка, повтор — AlreadyExists
        svc.update(fd, &[1, 0, 0, 0], &[0xAA; 8], UPDATE_NOEXIST).unwrap();
        let err = svc
            .update(fd, &[1, 0, 0, 0], &[0xBB; 8], UPDATE_NOEXIST)
            .unwrap_err();
        assert!(matches!(err, TabError::AlreadyExists));
        // старое значение на месте
        assert_eq!(svc.lookup(fd, &[1, 0, 0, 0]).unwrap(), Some(vec![0xAA; 8]));

        // UPDATE_EXIST: по отсутствующему ключу — NotFound
        let err = svc
            .update(fd, &[2, 0, 0, 0], &[0xCC; 8], UPDATE_EXIST)
            .unwrap_err();
        assert!(matches!(err, TabError::NotFound));

        // UPDATE_ANY: insert-or-update
        svc.update(fd, &[2, 0, 0, 0], &[0xCC; 8], UPDATE_ANY).unwrap();
        svc.update(fd, &[2, 0, 0, 0], &[0xDD; 8], UPDATE_ANY).unwrap();
        assert_eq!(svc.lookup(fd, &[2, 0, 0, 0]).unwrap(), Some(vec![0xDD; 8]));

        // delete: true, затем false
        assert!(svc.delete(fd, &[1, 0, 0, 0]).unwrap());
        assert!(!svc.delete(fd, &[1, 0, 0, 0]).unwrap());
        assert_eq!(svc.lookup(fd, &[1, 0, 0, 0]).unwrap(), None);
    }

    #[test]
    fn size_checks() {
        let svc = MemMapService::new();
        let fd = svc.create_map(1, 4, 8, 16).unwrap();
        assert!(svc.update(fd, &[1, 2, 3], &[0u8; 8], UPDATE_ANY).is_err());
        assert!(svc.update(fd, &[1, 2, 3, 4], &[0u8; 7], UPDATE_ANY).is_err());
        assert!(svc.lookup(fd, &[1, 2]).is_err());
        // нулевые размеры схемы отвергаются на создании
        assert!(matches!(
            svc.create_map(1, 0, 8, 16),
            Err(TabError::InvalidHandle { .. })
        ));
    }

    #[test]
    fn next_key_walks_in_byte_order() {
        let svc = MemMapService::new();
        let fd = svc.create_map(1, 2, 1, 16).unwrap();
        assert_eq!(svc.next_key(fd, None).unwrap(), None);

        for k in [[0u8, 5], [0, 1], [1, 0]] {
            svc.update(fd, &k, &[0], UPDATE_ANY).unwrap();
        }
        assert_eq!(svc.next_key(fd, None).unwrap(), Some(vec![0, 1]));
        assert_eq!(svc.next_key(fd, Some(&[0, 1])).unwrap(), Some(vec![0, 5]));
        assert_eq!(svc.next_key(fd, Some(&[0, 5])).unwrap(), Some(vec![1, 0]));
        assert_eq!(svc.next_key(fd, Some(&[1, 0])).unwrap(), None);

        // предшественник может быть уже удалён — курсор всё равно движется
        svc.delete(fd, &[0, 5]).unwrap();
        assert_eq!(svc.next_key(fd, Some(&[0, 5])).unwrap(), Some(vec![1, 0]));
    }

    #[test]
    fn pin_open_close_refcount() {
        let svc = MemMapService::new();
        let fd = svc.create_map(1, 4, 4, 8).unwrap();
        svc.update(fd, &[9, 0, 0, 0], &[7, 7, 7, 7], UPDATE_ANY).unwrap();

        let path = Path::new("/virt/globals/tables/t0");
        svc.pin(fd, path).unwrap();
        // повторный pin того же пути — ошибка
        assert!(svc.pin(fd, path).is_err());

        // Последний fd закрыт, но pin держит карту живой.
        svc.close(fd);
        assert_eq!(svc.live_maps(), 1);
        assert!(matches!(
            svc.lookup(fd, &[9, 0, 0, 0]),
            Err(TabError::InvalidHandle { .. })
        ));

        let fd2 = svc.open_pinned(path).unwrap();
        assert_ne!(fd, fd2);
        assert_eq!(svc.lookup(fd2, &[9, 0, 0, 0]).unwrap(), Some(vec![7, 7, 7, 7]));

        // unpin + close последней ссылки освобождает карту
        svc.unpin(path).unwrap();
        assert_eq!(svc.live_maps(), 1);
        svc.close(fd2);
        assert_eq!(svc.live_maps(), 0);
        assert!(matches!(
            svc.open_pinned(path),
            Err(TabError::InvalidHandle { .. })
        ));
    }
}
