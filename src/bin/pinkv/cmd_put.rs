use anyhow::Result;
use std::path::PathBuf;

use PinKV::MapRole;

use super::util::{attach_table, decode_value_arg, kernel_service, namespace, parse_update_mode};

pub fn exec(
    root: Option<PathBuf>,
    module: Option<String>,
    global: bool,
    table: String,
    key: String,
    value: String,
    mode: String,
) -> Result<()> {
    let key_bytes = decode_value_arg(&key)?.0;
    let val_bytes = decode_value_arg(&value)?.0;
    let flags = parse_update_mode(&mode)?;

    let service = kernel_service()?;
    let ns = namespace(root, module);
    let t = attach_table(service, &ns, &table, global)?;

    t.update(MapRole::Data, &key_bytes, &val_bytes, flags)?;
    println!(
        "OK put: table='{}' key={} B value={} B mode={}",
        table,
        key_bytes.len(),
        val_bytes.len(),
        mode
    );
    Ok(())
}
