use anyhow::Result;
use std::path::PathBuf;

use PinKV::util::to_hex;

use super::util::{attach_table, kernel_service, namespace};

pub fn exec(
    root: Option<PathBuf>,
    module: Option<String>,
    global: bool,
    table: String,
    json: bool,
) -> Result<()> {
    let service = kernel_service()?;
    let ns = namespace(root, module);
    let t = attach_table(service, &ns, &table, global)?;

    if json {
        let elems = t.elements()?;
        print!("[");
        for (i, (k, v)) in elems.iter().enumerate() {
            if i > 0 {
                print!(",");
            }
            print!(
                "{{\"key_hex\":\"{}\",\"value_hex\":\"{}\",\"key_len\":{},\"value_len\":{}}}",
                to_hex(k),
                to_hex(v),
                k.len(),
                v.len()
            );
        }
        println!("]");
        return Ok(());
    }

    let mut out = std::io::stdout();
    t.dump_elements(&mut out)?;
    Ok(())
}
