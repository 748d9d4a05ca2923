use anyhow::{Context, Result};
use std::path::PathBuf;

use super::util::{kernel_service, namespace};

pub fn exec(
    root: Option<PathBuf>,
    module: Option<String>,
    global: bool,
    table: String,
) -> Result<()> {
    let service = kernel_service()?;
    let ns = namespace(root, module);

    let data_path = ns.data_path(&table, global)?;
    let meta_path = ns.meta_path(&table, global)?;

    service
        .unpin(&data_path)
        .with_context(|| format!("unpin {}", data_path.display()))?;
    service
        .unpin(&meta_path)
        .with_context(|| format!("unpin {}", meta_path.display()))?;

    println!(
        "OK unpin: '{}' ({} + {})",
        table,
        data_path.display(),
        meta_path.display()
    );
    Ok(())
}
