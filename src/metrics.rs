//! Lightweight global metrics for PinKV.
//!
//! Потокобезопасные атомарные счётчики для подсистем:
//! - Maps (создание/открытие карт)
//! - Pins (закрепление/снятие в bpffs)
//! - CRUD (lookup/update/delete)
//! - Walks (полные обходы и отданные элементы)

use std::sync::atomic::{AtomicU64, Ordering};

// ----- Maps -----
static MAPS_CREATED: AtomicU64 = AtomicU64::new(0);
static MAPS_OPENED: AtomicU64 = AtomicU64::new(0);

// ----- Pins -----
static PINS_TOTAL: AtomicU64 = AtomicU64::new(0);
static UNPINS_TOTAL: AtomicU64 = AtomicU64::new(0);

// ----- CRUD -----
static LOOKUPS_TOTAL: AtomicU64 = AtomicU64::new(0);
static UPDATES_TOTAL: AtomicU64 = AtomicU64::new(0);
static DELETES_TOTAL: AtomicU64 = AtomicU64::new(0);

// ----- Walks -----
static WALKS_TOTAL: AtomicU64 = AtomicU64::new(0);
static WALK_ENTRIES_TOTAL: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Default)]
pub struct MetricsSnapshot {
    // Maps
    pub maps_created: u64,
    pub maps_opened: u64,

    // Pins
    pub pins_total: u64,
    pub unpins_total: u64,

    // CRUD
    pub lookups_total: u64,
    pub updates_total: u64,
    pub deletes_total: u64,

    // Walks
    pub walks_total: u64,
    pub walk_entries_total: u64,
}

impl MetricsSnapshot {
    pub fn avg_walk_entries(&self) -> f64 {
        if self.walks_total == 0 {
            0.0
        } else {
            self.walk_entries_total as f64 / self.walks_total as f64
        }
    }
}

// ----- Recorders (Maps) -----
pub fn record_map_created() {
    MAPS_CREATED.fetch_add(1, Ordering::Relaxed);
}
pub fn record_map_opened() {
    MAPS_OPENED.fetch_add(1, Ordering::Relaxed);
}

// ----- Recorders (Pins) -----
pub fn record_pin() {
    PINS_TOTAL.fetch_add(1, Ordering::Relaxed);
}
pub fn record_unpin() {
    UNPINS_TOTAL.fetch_add(1, Ordering::Relaxed);
}

// ----- Recorders (CRUD) -----
pub fn record_lookup() {
    LOOKUPS_TOTAL.fetch_add(1, Ordering::Relaxed);
}
pub fn record_update() {
    UPDATES_TOTAL.fetch_add(1, Ordering::Relaxed);
}
pub fn record_delete() {
    DELETES_TOTAL.fetch_add(1, Ordering::Relaxed);
}

// ----- Recorders (Walks) -----
pub fn record_walk() {
    WALKS_TOTAL.fetch_add(1, Ordering::Relaxed);
}
pub fn record_walk_entries(entries: u64) {
    WALK_ENTRIES_TOTAL.fetch_add(entries, Ordering::Relaxed);
}

// ----- Snapshot / Reset -----
pub fn snapshot() -> MetricsSnapshot {
    MetricsSnapshot {
        maps_created: MAPS_CREATED.load(Ordering::Relaxed),
        maps_opened: MAPS_OPENED.load(Ordering::Relaxed),

        pins_total: PINS_TOTAL.load(Ordering::Relaxed),
        unpins_total: UNPINS_TOTAL.load(Ordering::Relaxed),

        lookups_total: LOOKUPS_TOTAL.load(Ordering::Relaxed),
        updates_total: UPDATES_TOTAL.load(Ordering::Relaxed),
        deletes_total: DELETES_TOTAL.load(Ordering::Relaxed),

        walks_total: WALKS_TOTAL.load(Ordering::Relaxed),
        walk_entries_total: WALK_ENTRIES_TOTAL.load(Ordering::Relaxed),
    }
}

pub fn reset() {
    MAPS_CREATED.store(0, Ordering::Relaxed);
    MAPS_OPENED.store(0, Ordering::Relaxed);

    PINS_TOTAL.store(0, Ordering::Relaxed);
    UNPINS_TOTAL.store(0, Ordering::Relaxed);

    LOOKUPS_TOTAL.store(0, Ordering::Relaxed);
    UPDATES_TOTAL.store(0, Ordering::Relaxed);
    DELETES_TOTAL.store(0, Ordering::Relaxed);

    WALKS_TOTAL.store(0, Ordering::Relaxed);
    WALK_ENTRIES_TOTAL.store(0, Ordering::Relaxed);
}
