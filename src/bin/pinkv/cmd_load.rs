use anyhow::{Context, Result};
use std::path::PathBuf;

use PinKV::module::Module;
use PinKV::program::ProgramSpec;

use super::util::{kernel_service, namespace, read_spec_arg};

pub fn exec(
    root: Option<PathBuf>,
    module: Option<String>,
    global: bool,
    spec: Option<PathBuf>,
    spec_json: Option<String>,
) -> Result<()> {
    let raw = read_spec_arg(spec, spec_json)?;
    let prog = ProgramSpec::from_json_str(&raw).context("parse program spec json")?;

    let service = kernel_service()?;
    let ns = namespace(root, module);

    let name = if prog.name.is_empty() {
        "program".to_string()
    } else {
        prog.name.clone()
    };
    let loaded = Module::load(service, &ns, name, &prog, global)?;

    println!(
        "OK load: module '{}' with {} table(s), scope={}",
        loaded.name(),
        loaded.len(),
        if loaded.is_global() { "global" } else { "local" }
    );
    for t in loaded.tables() {
        match (t.data_path(), t.meta_path()) {
            (Some(d), Some(m)) => println!(
                "  '{}': key={} B, leaf={} B, pinned {} + {}",
                t.name(),
                t.key_size(),
                t.leaf_size(),
                d.display(),
                m.display()
            ),
            _ => println!("  '{}': key={} B, leaf={} B", t.name(), t.key_size(), t.leaf_size()),
        }
    }
    Ok(())
}
