//! Владение хэндлом карты.
//!
//! ResourceHandle держит пару (сервис, fd) и гарантирует ровно одно закрытие:
//! на Drop либо при явном reset(). Тип только перемещаемый (Clone нет),
//! так что двух живых владельцев одного fd не бывает; уникальность самих fd
//! обеспечивают сервисы.

use std::fmt;
use std::sync::Arc;

use crate::errors::TabError;
use crate::kernel::{MapFd, MapService};

pub struct ResourceHandle {
    service: Arc<dyn MapService>,
    fd: MapFd,
}

impl ResourceHandle {
    /// Принять во владение fd, выданный сервисом. Отрицательный fd — ошибка.
    pub fn adopt(service: Arc<dyn MapService>, fd: MapFd) -> Result<Self, TabError> {
        if fd < 0 {
            return Err(TabError::invalid_handle(fd));
        }
        Ok(Self { service, fd })
    }

    pub fn raw(&self) -> MapFd {
        self.fd
    }

    pub fn is_valid(&self) -> bool {
        self.fd >= 0
    }

    /// Явное закрытие. После reset() хэндл невалиден, повторных закрытий не будет.
    pub fn reset(&mut self) {
        if self.fd >= 0 {
            self.service.close(self.fd);
            self.fd = -1;
        }
    }
}

impl Drop for ResourceHandle {
    fn drop(&mut self) {
        self.reset();
    }
}

impl fmt::Debug for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceHandle").field("fd", &self.fd).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingService {
        closes: AtomicUsize,
    }

    impl MapService for CountingService {
        fn create_map(&self, _: u32, _: u32, _: u32, _: u32) -> Result<MapFd, TabError> {
            unimplemented!()
        }
        fn open_pinned(&self, _: &Path) -> Result<MapFd, TabError> {
            unimplemented!()
        }
        fn pin(&self, _: MapFd, _: &Path) -> Result<(), TabError> {
            unimplemented!()
        }
        fn unpin(&self, _: &Path) -> Result<(), TabError> {
            unimplemented!()
        }
        fn update(&self, _: MapFd, _: &[u8], _: &[u8], _: u64) -> Result<(), TabError> {
            unimplemented!()
        }
        fn lookup(&self, _: MapFd, _: &[u8]) -> Result<Option<Vec<u8>>, TabError> {
            unimplemented!()
        }
        fn delete(&self, _: MapFd, _: &[u8]) -> Result<bool, TabError> {
            unimplemented!()
        }
        fn next_key(&self, _: MapFd, _: Option<&[u8]>) -> Result<Option<Vec<u8>>, TabError> {
            unimplemented!()
        }
        fn close(&self, _: MapFd) {
            self.closes.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[test]
    fn adopt_rejects_negative_fd() {
        let svc = Arc::new(CountingService {
            closes: AtomicUsize::new(0),
        });
        let err = ResourceHandle::adopt(svc, -1).unwrap_err();
        assert!(matches!(err, TabError::InvalidHandle { fd: -1 }));
    }

    #[test]
    fn drop_closes_exactly_once() {
        let svc = Arc::new(CountingService {
            closes: AtomicUsize::new(0),
        });
        {
            let h = ResourceHandle::adopt(svc.clone(), 7).unwrap();
            assert!(h.is_valid());
            assert_eq!(h.raw(), 7);
        }
        assert_eq!(svc.closes.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn reset_then_drop_is_single_close() {
        let svc = Arc::new(CountingService {
            closes: AtomicUsize::new(0),
        });
        let mut h = ResourceHandle::adopt(svc.clone(), 9).unwrap();
        h.reset();
        assert!(!h.is_valid());
        h.reset(); // повторный reset — no-op
        drop(h);
        assert_eq!(svc.closes.load(Ordering::Relaxed), 1);
    }
}
