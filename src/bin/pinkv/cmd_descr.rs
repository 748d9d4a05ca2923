use anyhow::Result;
use std::path::PathBuf;

use super::util::{kernel_service, namespace, read_pinned_descr};

pub fn exec(
    root: Option<PathBuf>,
    module: Option<String>,
    global: bool,
    table: String,
    json: bool,
) -> Result<()> {
    let service = kernel_service()?;
    let ns = namespace(root, module);
    let descr = read_pinned_descr(&service, &ns, &table, global)?;

    if json {
        print!("{{");
        print!("\"table\":\"{}\"", table);
        print!(",\"key_size\":{}", descr.key_size);
        print!(",\"key_desc_len\":{}", descr.key_desc_len);
        print!(",\"leaf_size\":{}", descr.leaf_size);
        print!(",\"leaf_desc_len\":{}", descr.leaf_desc_len);
        println!("}}");
        return Ok(());
    }

    println!("table '{}':", table);
    println!("  key_size:      {} B", descr.key_size);
    println!("  key_desc_len:  {}", descr.key_desc_len);
    println!("  leaf_size:     {} B", descr.leaf_size);
    println!("  leaf_desc_len: {}", descr.leaf_desc_len);
    Ok(())
}
