//! kernel/bpf — сырой bpf(2) syscall-бэкенд (только Linux).
//!
//! Что внутри:
//! - syscall(SYS_bpf, cmd, &attr, size) с укороченными #[repr(C)] attr-структурами:
//!   недосланный хвост union bpf_attr ядро дозаполняет нулями.
//! - ENOENT → Ok(None)/Ok(false), EEXIST под UPDATE_NOEXIST → AlreadyExists,
//!   остальное — TabError::Kernel с errno.
//! - Размеры ключа/значения берутся через BPF_OBJ_GET_INFO_BY_FD, чтобы правильно
//!   отмерять буферы lookup/next_key и отклонять несоразмерные аргументы до syscall.
//! - pin создаёт родительские каталоги на bpffs; unpin — обычный unlink pin-пути.

use std::ffi::CString;
use std::fs;
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

use log::{debug, warn};

use crate::consts::{UPDATE_EXIST, UPDATE_NOEXIST};
use crate::errors::TabError;

use super::{MapFd, MapService};

// Команды bpf(2)
const BPF_MAP_CREATE: libc::c_int = 0;
const BPF_MAP_LOOKUP_ELEM: libc::c_int = 1;
const BPF_MAP_UPDATE_ELEM: libc::c_int = 2;
const BPF_MAP_DELETE_ELEM: libc::c_int = 3;
const BPF_MAP_GET_NEXT_KEY: libc::c_int = 4;
const BPF_OBJ_PIN: libc::c_int = 6;
const BPF_OBJ_GET: libc::c_int = 7;
const BPF_OBJ_GET_INFO_BY_FD: libc::c_int = 15;

// Секции union bpf_attr, только используемые поля.
// Выравнивание u64-полей в UAPI — __aligned_u64, отсюда явный _pad.

#[repr(C)]
struct MapCreateAttr {
    map_type: u32,
    key_size: u32,
    value_size: u32,
    max_entries: u32,
    map_flags: u32,
}

#[repr(C)]
struct MapElemAttr {
    map_fd: u32,
    _pad: u32,
    key: u64,
    value_or_next: u64, // value у lookup/update, next_key у get_next_key
    flags: u64,
}

#[repr(C)]
struct ObjAttr {
    pathname: u64,
    bpf_fd: u32,
    file_flags: u32,
}

#[repr(C)]
struct InfoAttr {
    bpf_fd: u32,
    info_len: u32,
    info: u64,
}

#[repr(C)]
#[derive(Default)]
struct MapInfo {
    map_type: u32,
    id: u32,
    key_size: u32,
    value_size: u32,
    max_entries: u32,
    map_flags: u32,
}

fn sys_bpf<T>(cmd: libc::c_int, attr: &T) -> io::Result<i64> {
    let ret = unsafe {
        libc::syscall(
            libc::SYS_bpf,
            cmd,
            attr as *const T as *const libc::c_void,
            std::mem::size_of::<T>(),
        )
    };
    if ret < 0 {
        Err(io::Error::last_os_error())
    } else {
        Ok(ret as i64)
    }
}

#[inline]
fn is_errno(e: &io::Error, code: libc::c_int) -> bool {
    e.raw_os_error() == Some(code)
}

fn path_cstring(op: &'static str, path: &Path) -> Result<CString, TabError> {
    CString::new(path.as_os_str().as_bytes())
        .map_err(|_| TabError::invalid_input(op, format!("NUL byte in path {}", path.display())))
}

pub struct BpfMapService;

impl BpfMapService {
    pub fn new() -> Self {
        Self
    }

    fn map_info(&self, fd: MapFd, op: &'static str) -> Result<MapInfo, TabError> {
        let mut info = MapInfo::default();
        let attr = InfoAttr {
            bpf_fd: fd as u32,
            info_len: std::mem::size_of::<MapInfo>() as u32,
            info: &mut info as *mut MapInfo as usize as u64,
        };
        sys_bpf(BPF_OBJ_GET_INFO_BY_FD, &attr).map_err(|e| TabError::kernel(op, e))?;
        Ok(info)
    }

    fn check_key(&self, info: &MapInfo, op: &'static str, key: &[u8]) -> Result<(), TabError> {
        if key.len() != info.key_size as usize {
            return Err(TabError::invalid_input(
                op,
                format!("key is {} B, map wants {}", key.len(), info.key_size),
            ));
        }
        Ok(())
    }
}

impl Default for BpfMapService {
    fn default() -> Self {
        Self::new()
    }
}

impl MapService for BpfMapService {
    fn create_map(
        &self,
        kind: u32,
        key_size: u32,
        leaf_size: u32,
        max_entries: u32,
    ) -> Result<MapFd, TabError> {
        let attr = MapCreateAttr {
            map_type: kind,
            key_size,
            value_size: leaf_size,
            max_entries,
            map_flags: 0,
        };
        match sys_bpf(BPF_MAP_CREATE, &attr) {
            Ok(fd) => {
                debug!(
                    "map created: fd={} kind={} key_size={} leaf_size={} max_entries={}",
                    fd, kind, key_size, leaf_size, max_entries
                );
                Ok(fd as MapFd)
            }
            Err(e) => {
                warn!("map create failed (kind={}): {}", kind, e);
                Err(TabError::invalid_handle(-1))
            }
        }
    }

    fn open_pinned(&self, path: &Path) -> Result<MapFd, TabError> {
        let cpath = path_cstring("open", path)?;
        let attr = ObjAttr {
            pathname: cpath.as_ptr() as usize as u64,
            bpf_fd: 0,
            file_flags: 0,
        };
        match sys_bpf(BPF_OBJ_GET, &attr) {
            Ok(fd) => {
                debug!("map opened: fd={} path={}", fd, path.display());
                Ok(fd as MapFd)
            }
            Err(e) => {
                warn!("map open failed at {}: {}", path.display(), e);
                Err(TabError::invalid_handle(-1))
            }
        }
    }

    fn pin(&self, fd: MapFd, path: &Path) -> Result<(), TabError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| TabError::kernel("pin", e))?;
            }
        }
        let cpath = path_cstring("pin", path)?;
        let attr = ObjAttr {
            pathname: cpath.as_ptr() as usize as u64,
            bpf_fd: fd as u32,
            file_flags: 0,
        };
        sys_bpf(BPF_OBJ_PIN, &attr).map_err(|e| TabError::kernel("pin", e))?;
        debug!("map pinned: fd={} path={}", fd, path.display());
        Ok(())
    }

    fn unpin(&self, path: &Path) -> Result<(), TabError> {
        fs::remove_file(path).map_err(|e| TabError::kernel("unpin", e))
    }

    fn update(&self, fd: MapFd, key: &[u8], value: &[u8], flags: u64) -> Result<(), TabError> {
        let info = self.map_info(fd, "update")?;
        self.check_key(&info, "update", key)?;
        if value.len() != info.value_size as usize {
            return Err(TabError::invalid_input(
                "update",
                format!("value is {} B, map wants {}", value.len(), info.value_size),
            ));
        }
        let attr = MapElemAttr {
            map_fd: fd as u32,
            _pad: 0,
            key: key.as_ptr() as usize as u64,
            value_or_next: value.as_ptr() as usize as u64,
            flags,
        };
        match sys_bpf(BPF_MAP_UPDATE_ELEM, &attr) {
            Ok(_) => Ok(()),
            Err(e) if flags == UPDATE_NOEXIST && is_errno(&e, libc::EEXIST) => {
                Err(TabError::AlreadyExists)
            }
            Err(e) if flags == UPDATE_EXIST && is_errno(&e, libc::ENOENT) => {
                Err(TabError::NotFound)
            }
            Err(e) => Err(TabError::kernel("update", e)),
        }
    }

    fn lookup(&self, fd: MapFd, key: &[u8]) -> Result<Option<Vec<u8>>, TabError> {
        let info = self.map_info(fd, "lookup")?;
        self.check_key(&info, "lookup", key)?;
        let mut value = vec![0u8; info.value_size as usize];
        let attr = MapElemAttr {
            map_fd: fd as u32,
            _pad: 0,
            key: key.as_ptr() as usize as u64,
            value_or_next: value.as_mut_ptr() as usize as u64,
            flags: 0,
        };
        match sys_bpf(BPF_MAP_LOOKUP_ELEM, &attr) {
            Ok(_) => Ok(Some(value)),
            Err(e) if is_errno(&e, libc::ENOENT) => Ok(None),
            Err(e) => Err(TabError::kernel("lookup", e)),
        }
    }

    fn delete(&self, fd: MapFd, key: &[u8]) -> Result<bool, TabError> {
        let info = self.map_info(fd, "delete")?;
        self.check_key(&info, "delete", key)?;
        let attr = MapElemAttr {
            map_fd: fd as u32,
            _pad: 0,
            key: key.as_ptr() as usize as u64,
            value_or_next: 0,
            flags: 0,
        };
        match sys_bpf(BPF_MAP_DELETE_ELEM, &attr) {
            Ok(_) => Ok(true),
            Err(e) if is_errno(&e, libc::ENOENT) => Ok(false),
            Err(e) => Err(TabError::kernel("delete", e)),
        }
    }

    fn next_key(&self, fd: MapFd, key: Option<&[u8]>) -> Result<Option<Vec<u8>>, TabError> {
        let info = self.map_info(fd, "next_key")?;
        let key_ptr = match key {
            // NULL вместо ключа — «начать с первого» (ядро ≥ 4.12).
            None => 0u64,
            Some(k) => {
                self.check_key(&info, "next_key", k)?;
                k.as_ptr() as usize as u64
            }
        };
        let mut next = vec![0u8; info.key_size as usize];
        let attr = MapElemAttr {
            map_fd: fd as u32,
            _pad: 0,
            key: key_ptr,
            value_or_next: next.as_mut_ptr() as usize as u64,
            flags: 0,
        };
        match sys_bpf(BPF_MAP_GET_NEXT_KEY, &attr) {
            Ok(_) => Ok(Some(next)),
            Err(e) if is_errno(&e, libc::ENOENT) => Ok(None),
            Err(e) => Err(TabError::kernel("next_key", e)),
        }
    }

    fn close(&self, fd: MapFd) {
        unsafe {
            libc::close(fd);
        }
    }
}
