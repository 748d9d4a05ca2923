// tests/table_scan.rs
//
// Полный обход таблицы: пустая таблица, точное содержимое, сценарий со
// счётчиками, рандомизированный churn против модельного BTreeMap, формат
// dump, обрыв обхода без метазаписи.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Result;
use oorandom::Rand64;

use PinKV::consts::UPDATE_ANY;
use PinKV::meta::meta_key_bytes;
use PinKV::program::ProgramSpec;
use PinKV::util::hex_line;
use PinKV::{MapRole, MapService, MemMapService, PinNamespace, TabError, Table};

fn table_with(key_size: u32, leaf_size: u32, max_entries: u32) -> Result<Table> {
    let service: Arc<dyn MapService> = Arc::new(MemMapService::new());
    let ns = PinNamespace::new("/t");
    let prog = ProgramSpec::from_json_str(&format!(
        r#"{{"name":"t","tables":[{{"name":"scan","key_size":{key_size},"leaf_size":{leaf_size},"max_entries":{max_entries}}}]}}"#,
    ))?;
    let t = Table::create_from_program(service, &ns, &prog, 0, true)?;
    Ok(t)
}

#[test]
fn empty_table_scans_ok() -> Result<()> {
    let t = table_with(4, 8, 16)?;
    assert!(t.elements()?.is_empty());

    let mut buf = Vec::new();
    t.dump_elements(&mut buf)?;
    assert!(buf.is_empty());
    Ok(())
}

#[test]
fn scan_returns_exact_contents() -> Result<()> {
    let t = table_with(2, 3, 16)?;
    t.update(MapRole::Data, &[0x00, 0x02], b"aaa", UPDATE_ANY)?;
    t.update(MapRole::Data, &[0x01, 0x00], b"bbb", UPDATE_ANY)?;
    t.update(MapRole::Data, &[0x00, 0x01], b"ccc", UPDATE_ANY)?;

    let mut expected: BTreeMap<Vec<u8>, Vec<u8>> = BTreeMap::new();
    expected.insert(vec![0x00, 0x02], b"aaa".to_vec());
    expected.insert(vec![0x01, 0x00], b"bbb".to_vec());
    expected.insert(vec![0x00, 0x01], b"ccc".to_vec());

    assert_eq!(t.elements()?, expected);
    Ok(())
}

#[test]
fn counters_scenario() -> Result<()> {
    let t = table_with(4, 8, 64)?;

    // 1) пять счётчиков
    for k in 1u32..=5 {
        t.update(MapRole::Data, &k.to_le_bytes(), &(k as u64 * 10).to_le_bytes(), UPDATE_ANY)?;
    }

    // 2) инкремент третьего: читаем, прибавляем, пишем
    let cur = t
        .lookup(MapRole::Data, &3u32.to_le_bytes())?
        .expect("counter 3");
    let cur = u64::from_le_bytes(cur.as_slice().try_into().unwrap());
    t.update(MapRole::Data, &3u32.to_le_bytes(), &(cur + 1).to_le_bytes(), UPDATE_ANY)?;

    // 3) удалить пятый
    assert!(t.delete(MapRole::Data, &5u32.to_le_bytes())?);

    // 4) обход видит ровно оставшееся
    let elems = t.elements()?;
    assert_eq!(elems.len(), 4);
    assert_eq!(
        elems.get(3u32.to_le_bytes().as_slice()).map(|v| v.as_slice()),
        Some(31u64.to_le_bytes().as_slice())
    );
    assert!(elems.get(5u32.to_le_bytes().as_slice()).is_none());
    Ok(())
}

#[test]
fn wide_leaves_come_back_byte_exact() -> Result<()> {
    // leaf на два 64-битных счётчика; проверяем побайтовое совпадение
    let t = table_with(4, 16, 16)?;

    let mut pair = [0u8; 16];
    t.update(MapRole::Data, &1u32.to_le_bytes(), &pair, UPDATE_ANY)?;
    pair[0] = 1;
    t.update(MapRole::Data, &2u32.to_le_bytes(), &pair, UPDATE_ANY)?;

    let elems = t.elements()?;
    assert_eq!(elems.len(), 2);
    assert_eq!(
        elems.get(1u32.to_le_bytes().as_slice()).map(|v| v.as_slice()),
        Some([0u8; 16].as_slice())
    );
    let mut want = [0u8; 16];
    want[0] = 1;
    assert_eq!(
        elems.get(2u32.to_le_bytes().as_slice()).map(|v| v.as_slice()),
        Some(want.as_slice())
    );
    Ok(())
}

#[test]
fn randomized_churn_matches_model() -> Result<()> {
    let t = table_with(4, 8, 256)?;
    let mut model: BTreeMap<Vec<u8>, Vec<u8>> = BTreeMap::new();

    let mut rng = Rand64::new(0x5EEDC0DE);
    for _ in 0..400 {
        let key = ((rng.rand_u64() % 64) as u32).to_le_bytes().to_vec();
        let dice = rng.rand_u64() % 10;
        if dice < 6 {
            let value = rng.rand_u64().to_le_bytes().to_vec();
            t.update(MapRole::Data, &key, &value, UPDATE_ANY)?;
            model.insert(key, value);
        } else {
            let existed = t.delete(MapRole::Data, &key)?;
            assert_eq!(existed, model.remove(&key).is_some());
        }
    }

    assert_eq!(t.elements()?, model);
    Ok(())
}

#[test]
fn dump_is_hex_lines_per_entry() -> Result<()> {
    let t = table_with(2, 2, 16)?;
    t.update(MapRole::Data, &[0x01, 0x02], &[0xAA, 0xBB], UPDATE_ANY)?;
    t.update(MapRole::Data, &[0x00, 0xFF], &[0xCC, 0xDD], UPDATE_ANY)?;

    let mut buf = Vec::new();
    t.dump_elements(&mut buf)?;
    let text = String::from_utf8(buf)?;

    // записи в байтовом порядке ключей: [00 ff] раньше [01 02]
    let expected = format!(
        "{}\n{}\n\n{}\n{}\n\n",
        hex_line(&[0x00, 0xFF]),
        hex_line(&[0xCC, 0xDD]),
        hex_line(&[0x01, 0x02]),
        hex_line(&[0xAA, 0xBB]),
    );
    assert_eq!(text, expected);
    Ok(())
}

#[test]
fn scan_without_metadata_record_fails() -> Result<()> {
    let t = table_with(4, 8, 16)?;
    t.update(MapRole::Data, &1u32.to_le_bytes(), &1u64.to_le_bytes(), UPDATE_ANY)?;

    // метазапись намеренно удаляется: обход обязан оборваться той же ошибкой
    assert!(t.delete(MapRole::Meta, &meta_key_bytes())?);
    let err = t.elements().unwrap_err();
    assert!(matches!(err, TabError::NotFound), "got {err:?}");
    Ok(())
}
