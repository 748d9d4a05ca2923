use anyhow::{anyhow, Context, Result};
use std::fs::OpenOptions;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use PinKV::consts::{UPDATE_ANY, UPDATE_EXIST, UPDATE_NOEXIST};
use PinKV::meta::meta_key_bytes;
use PinKV::{MapService, PinConfig, PinNamespace, Table, TableDescr};

pub fn decode_value_arg(arg: &str) -> Result<(Vec<u8>, &'static str)> {
    if arg == "-" {
        let mut buf = Vec::new();
        std::io::stdin().read_to_end(&mut buf)?;
        return Ok((buf, "stdin"));
    }
    if let Some(p) = arg.strip_prefix('@') {
        let path = PathBuf::from(p);
        let mut f = OpenOptions::new()
            .read(true)
            .open(&path)
            .map_err(|e| anyhow!("open value file {}: {}", path.display(), e))?;
        let mut buf = Vec::new();
        f.read_to_end(&mut buf)?;
        return Ok((buf, "file"));
    }
    if let Some(hx) = arg.strip_prefix("hex:") {
        let v = decode_hex(hx)?;
        return Ok((v, "hex"));
    }
    Ok((arg.as_bytes().to_vec(), "literal"))
}

pub fn decode_hex(s: &str) -> Result<Vec<u8>> {
    let s = s.trim();
    if s.len() % 2 != 0 {
        return Err(anyhow!("hex string must have even length"));
    }
    let mut out = Vec::with_capacity(s.len() / 2);
    let bytes = s.as_bytes();
    for i in (0..bytes.len()).step_by(2) {
        let h = (bytes[i] as char)
            .to_digit(16)
            .ok_or_else(|| anyhow!("invalid hex at pos {}", i))?;
        let l = (bytes[i + 1] as char)
            .to_digit(16)
            .ok_or_else(|| anyhow!("invalid hex at pos {}", i + 1))?;
        out.push(((h << 4) | l) as u8);
    }
    Ok(out)
}

pub fn read_spec_arg(spec: Option<PathBuf>, spec_json: Option<String>) -> Result<String> {
    match (spec, spec_json) {
        (Some(p), _) => {
            let mut f = OpenOptions::new()
                .read(true)
                .open(&p)
                .with_context(|| format!("open {}", p.display()))?;
            let mut s = String::new();
            f.read_to_string(&mut s)?;
            Ok(s)
        }
        (None, Some(s)) => Ok(s),
        (None, None) => Err(anyhow!("either --spec or --spec-json must be provided")),
    }
}

pub fn parse_update_mode(s: &str) -> Result<u64> {
    match s {
        "any" => Ok(UPDATE_ANY),
        "noexist" => Ok(UPDATE_NOEXIST),
        "exist" => Ok(UPDATE_EXIST),
        other => Err(anyhow!(
            "unknown update mode '{}' (expected any|noexist|exist)",
            other
        )),
    }
}

/// Неймспейс пинов: env-конфиг, поверх — флаги CLI.
pub fn namespace(root: Option<PathBuf>, module: Option<String>) -> PinNamespace {
    let mut cfg = PinConfig::from_env();
    if let Some(r) = root {
        cfg = cfg.with_pin_root(r);
    }
    if let Some(m) = module {
        cfg = cfg.with_module(Some(m));
    }
    PinNamespace::from_config(&cfg)
}

#[cfg(target_os = "linux")]
pub fn kernel_service() -> Result<Arc<dyn MapService>> {
    Ok(Arc::new(PinKV::BpfMapService::new()))
}

#[cfg(not(target_os = "linux"))]
pub fn kernel_service() -> Result<Arc<dyn MapService>> {
    Err(anyhow!(
        "kernel-backed commands need Linux (bpf(2) syscall); try `pinkv demo`"
    ))
}

/// Читает метазапись закреплённой таблицы, не подключая её саму.
pub fn read_pinned_descr(
    service: &Arc<dyn MapService>,
    ns: &PinNamespace,
    table: &str,
    global: bool,
) -> Result<TableDescr> {
    let meta_path = ns.meta_path(table, global)?;
    let fd = service
        .open_pinned(&meta_path)
        .with_context(|| format!("open pinned metadata {}", meta_path.display()))?;
    let raw = service.lookup(fd, &meta_key_bytes());
    service.close(fd);
    let raw = raw?.ok_or_else(|| anyhow!("metadata record missing for table '{}'", table))?;
    Ok(TableDescr::decode(&raw)?)
}

/// Подключение к закреплённой таблице: размеры берутся из её метазаписи.
pub fn attach_table(
    service: Arc<dyn MapService>,
    ns: &PinNamespace,
    table: &str,
    global: bool,
) -> Result<Table> {
    let descr = read_pinned_descr(&service, ns, table, global)?;
    let data_path = ns.data_path(table, global)?;
    let meta_path = ns.meta_path(table, global)?;
    let t = Table::attach_pinned(
        service,
        table,
        global,
        descr.key_size,
        descr.leaf_size,
        &data_path,
        &meta_path,
    )
    .with_context(|| format!("attach table '{}'", table))?;
    Ok(t)
}
