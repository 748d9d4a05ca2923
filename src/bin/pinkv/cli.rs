use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI для PinKV: таблицы в ядре, закреплённые в bpffs
#[derive(Parser, Debug)]
#[command(name = "pinkv", version, about = "PinKV CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Load a program spec: create and pin all its tables
    ///
    /// JSON формат спеки (см. PinKV::program):
    /// {
    ///   "name": "counters",
    ///   "tables": [
    ///     {"name":"flows","key_size":4,"leaf_size":16,"max_entries":1024}
    ///   ]
    /// }
    Load {
        /// Pin root (default: PINKV_ROOT or /sys/fs/bpf/pinkv)
        #[arg(long)]
        root: Option<PathBuf>,
        /// Module name for local scope (default: PINKV_MODULE)
        #[arg(long)]
        module: Option<String>,
        /// Pin under the shared globals namespace
        #[arg(long, default_value_t = false)]
        global: bool,
        /// JSON-файл со спекой программы
        #[arg(long)]
        spec: Option<PathBuf>,
        /// JSON-строка со спекой (если spec не задан)
        #[arg(long)]
        spec_json: Option<String>,
    },
    /// Put key/value into a pinned table
    Put {
        #[arg(long)]
        root: Option<PathBuf>,
        #[arg(long)]
        module: Option<String>,
        #[arg(long, default_value_t = false)]
        global: bool,
        #[arg(long)]
        table: String,
        /// Key bytes: literal, hex:<hex>, @file or "-" for stdin
        #[arg(long)]
        key: String,
        /// Value bytes: literal, hex:<hex>, @file or "-" for stdin
        #[arg(long)]
        value: String,
        /// Update mode: any | noexist | exist
        #[arg(long, default_value = "any")]
        mode: String,
    },
    /// Get key from a pinned table
    Get {
        #[arg(long)]
        root: Option<PathBuf>,
        #[arg(long)]
        module: Option<String>,
        #[arg(long, default_value_t = false)]
        global: bool,
        #[arg(long)]
        table: String,
        /// Key bytes: literal, hex:<hex>, @file or "-" for stdin
        #[arg(long)]
        key: String,
        /// Optional file to write raw value into
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Delete key from a pinned table
    Del {
        #[arg(long)]
        root: Option<PathBuf>,
        #[arg(long)]
        module: Option<String>,
        #[arg(long, default_value_t = false)]
        global: bool,
        #[arg(long)]
        table: String,
        /// Key bytes: literal, hex:<hex>, @file or "-" for stdin
        #[arg(long)]
        key: String,
    },
    /// Show all elements of a pinned table (hex dump, or --json)
    Show {
        #[arg(long)]
        root: Option<PathBuf>,
        #[arg(long)]
        module: Option<String>,
        #[arg(long, default_value_t = false)]
        global: bool,
        #[arg(long)]
        table: String,
        /// JSON output (array of objects)
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print the self-describing metadata record of a pinned table
    Descr {
        #[arg(long)]
        root: Option<PathBuf>,
        #[arg(long)]
        module: Option<String>,
        #[arg(long, default_value_t = false)]
        global: bool,
        #[arg(long)]
        table: String,
        /// JSON output (single object)
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Remove both pins of a table (the kernel frees the maps once unreferenced)
    Unpin {
        #[arg(long)]
        root: Option<PathBuf>,
        #[arg(long)]
        module: Option<String>,
        #[arg(long, default_value_t = false)]
        global: bool,
        #[arg(long)]
        table: String,
    },
    /// Full lifecycle demo against the in-memory service (no privileges needed)
    Demo {},
}

impl Cli {
    pub fn parse() -> Self {
        <Cli as Parser>::parse()
    }
}
