use anyhow::Result;
use std::path::PathBuf;

use PinKV::MapRole;

use super::util::{attach_table, decode_value_arg, kernel_service, namespace};

pub fn exec(
    root: Option<PathBuf>,
    module: Option<String>,
    global: bool,
    table: String,
    key: String,
) -> Result<()> {
    let key_bytes = decode_value_arg(&key)?.0;

    let service = kernel_service()?;
    let ns = namespace(root, module);
    let t = attach_table(service, &ns, &table, global)?;

    let existed = t.delete(MapRole::Data, &key_bytes)?;
    if existed {
        println!("DELETED from '{}'", table);
    } else {
        println!("DELETE requested, but key was absent in '{}'", table);
    }
    Ok(())
}
