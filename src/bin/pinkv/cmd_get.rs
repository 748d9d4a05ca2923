use anyhow::Result;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use PinKV::util::{display_text, hex_line};
use PinKV::MapRole;

use super::util::{attach_table, decode_value_arg, kernel_service, namespace};

pub fn exec(
    root: Option<PathBuf>,
    module: Option<String>,
    global: bool,
    table: String,
    key: String,
    out: Option<PathBuf>,
) -> Result<()> {
    let key_bytes = decode_value_arg(&key)?.0;

    let service = kernel_service()?;
    let ns = namespace(root, module);
    let t = attach_table(service, &ns, &table, global)?;

    match t.lookup(MapRole::Data, &key_bytes)? {
        Some(v) => {
            if let Some(out_path) = out {
                if let Some(parent) = out_path.parent() {
                    if !parent.as_os_str().is_empty() {
                        std::fs::create_dir_all(parent)?;
                    }
                }
                let mut f = OpenOptions::new()
                    .create(true)
                    .truncate(true)
                    .write(true)
                    .open(&out_path)?;
                f.write_all(&v)?;
                f.sync_all()?;
                println!(
                    "FOUND in '{}': {} B -> wrote to {}",
                    table,
                    v.len(),
                    out_path.display()
                );
            } else {
                println!("FOUND in '{}': {} B", table, v.len());
                println!("text: {}", display_text(&v));
                println!("hex:  {}", hex_line(&v[..v.len().min(64)]));
            }
        }
        None => println!("NOT FOUND in '{}'", table),
    }
    Ok(())
}
