use anyhow::{anyhow, Result};
use std::sync::Arc;

use PinKV::consts::UPDATE_ANY;
use PinKV::meta::meta_key_bytes;
use PinKV::metrics;
use PinKV::module::Module;
use PinKV::program::ProgramSpec;
use PinKV::util::hex_line;
use PinKV::{MapRole, MapService, MemMapService, PinNamespace, Table, TableDescr};

const DEMO_SPEC: &str = r#"{
  "name": "demo",
  "tables": [
    {"name": "counters", "key_size": 4, "leaf_size": 8, "max_entries": 64}
  ]
}"#;

/// Полный жизненный цикл на in-memory сервисе: load, put/get, show,
/// повторное подключение по пинам, unpin. Прав и Linux не требует.
pub fn exec() -> Result<()> {
    let service: Arc<dyn MapService> = Arc::new(MemMapService::new());
    let ns = PinNamespace::new("/demo/bpf");

    // 1) load: создать и закрепить таблицы программы
    let prog = ProgramSpec::from_json_str(DEMO_SPEC)?;
    let module = Module::load(service.clone(), &ns, "demo", &prog, true)?;
    println!("loaded module '{}' with {} table(s)", module.name(), module.len());

    let data_path;
    let meta_path;
    {
        let t = module
            .table("counters")
            .ok_or_else(|| anyhow!("table 'counters' missing after load"))?;
        data_path = t
            .data_path()
            .ok_or_else(|| anyhow!("data pin path not recorded"))?
            .to_path_buf();
        meta_path = t
            .meta_path()
            .ok_or_else(|| anyhow!("meta pin path not recorded"))?
            .to_path_buf();
        println!("pinned at {} + {}", data_path.display(), meta_path.display());

        // 2) put: три счётчика
        for (k, v) in [(1u32, 100u64), (2, 200), (3, 300)] {
            t.update(MapRole::Data, &k.to_le_bytes(), &v.to_le_bytes(), UPDATE_ANY)?;
        }
        println!("put 3 counters");

        // 3) get
        let got = t
            .lookup(MapRole::Data, &2u32.to_le_bytes())?
            .ok_or_else(|| anyhow!("counter 2 missing"))?;
        println!("counter 2 = {}", u64::from_le_bytes(got.as_slice().try_into()?));

        // 4) show: канонический hex-дамп всех элементов
        println!("dump:");
        let mut out = std::io::stdout();
        t.dump_elements(&mut out)?;

        // 5) delete
        let existed = t.delete(MapRole::Data, &1u32.to_le_bytes())?;
        println!("deleted counter 1 (existed={})", existed);
    }

    // 6) дропнуть модуль: хэндлы закрыты, карты живут за счёт пинов
    drop(module);

    // 7) повторное подключение: размеры из метазаписи
    let fd = service.open_pinned(&meta_path)?;
    let raw = service
        .lookup(fd, &meta_key_bytes())?
        .ok_or_else(|| anyhow!("metadata record missing"))?;
    service.close(fd);
    let descr = TableDescr::decode(&raw)?;
    let t = Table::attach_pinned(
        service.clone(),
        "counters",
        true,
        descr.key_size,
        descr.leaf_size,
        &data_path,
        &meta_path,
    )?;
    let elems = t.elements()?;
    println!("reattached, {} element(s) survive:", elems.len());
    for (k, v) in &elems {
        println!("  {} -> {}", hex_line(k), hex_line(v));
    }
    drop(t);

    // 8) unpin: последние ссылки уходят, сервис освобождает карты
    service.unpin(&data_path)?;
    service.unpin(&meta_path)?;
    println!("unpinned both maps");

    // 9) срез метрик
    let ms = metrics::snapshot();
    println!(
        "metrics: maps_created={} maps_opened={} pins={} unpins={} lookups={} updates={} deletes={} walks={} walk_entries={}",
        ms.maps_created,
        ms.maps_opened,
        ms.pins_total,
        ms.unpins_total,
        ms.lookups_total,
        ms.updates_total,
        ms.deletes_total,
        ms.walks_total,
        ms.walk_entries_total
    );
    Ok(())
}
