#![allow(non_snake_case)]

// Базовые модули
pub mod consts;
pub mod errors;
pub mod config;
pub mod meta;
pub mod metrics;

// Слой ядра и ресурсы
pub mod kernel; // src/kernel/{mod,mem,bpf}.rs
pub mod handle;
pub mod fspath;

// Таблицы и модули программ
pub mod program;
pub mod table; // src/table/{mod,core,open,ops,scan,dump}.rs
pub mod module;

// Утилиты (hex_line, display_text, ...)
pub mod util;

// Удобные реэкспорты
pub use config::PinConfig;
pub use errors::TabError;
pub use fspath::PinNamespace;
pub use handle::ResourceHandle;
pub use kernel::{MapFd, MapService, MemMapService};
#[cfg(target_os = "linux")]
pub use kernel::BpfMapService;
pub use meta::TableDescr;
pub use module::Module;
pub use program::{ProgramSpec, ProgramTables, TableSpec};
pub use table::{MapRole, Table};
