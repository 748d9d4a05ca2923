// tests/table_roundtrip.rs
//
// CRUD через Table поверх in-memory сервиса: update/lookup/delete по ролям,
// режимы update (any/noexist/exist), проверка размеров, доступ к метазаписи.

use std::sync::Arc;

use anyhow::Result;

use PinKV::consts::{UPDATE_ANY, UPDATE_EXIST, UPDATE_NOEXIST};
use PinKV::meta::meta_key_bytes;
use PinKV::program::ProgramSpec;
use PinKV::{MapRole, MapService, MemMapService, PinNamespace, Table, TabError, TableDescr};

fn counters_spec() -> Result<ProgramSpec> {
    let p = ProgramSpec::from_json_str(
        r#"{"name":"t","tables":[{"name":"counters","key_size":4,"leaf_size":8,"max_entries":64}]}"#,
    )?;
    Ok(p)
}

fn new_table() -> Result<(Arc<dyn MapService>, Table)> {
    let service: Arc<dyn MapService> = Arc::new(MemMapService::new());
    let ns = PinNamespace::new("/t");
    let prog = counters_spec()?;
    let table = Table::create_from_program(service.clone(), &ns, &prog, 0, true)?;
    Ok((service, table))
}

#[test]
fn crud_basic() -> Result<()> {
    let (_service, t) = new_table()?;

    // put + get
    t.update(MapRole::Data, &7u32.to_le_bytes(), &100u64.to_le_bytes(), UPDATE_ANY)?;
    let got = t.lookup(MapRole::Data, &7u32.to_le_bytes())?;
    assert_eq!(got.as_deref(), Some(100u64.to_le_bytes().as_slice()));

    // перезапись через any
    t.update(MapRole::Data, &7u32.to_le_bytes(), &200u64.to_le_bytes(), UPDATE_ANY)?;
    let got = t.lookup(MapRole::Data, &7u32.to_le_bytes())?;
    assert_eq!(got.as_deref(), Some(200u64.to_le_bytes().as_slice()));

    // absent key
    assert!(t.lookup(MapRole::Data, &9u32.to_le_bytes())?.is_none());

    // delete: true для существующего, false для отсутствующего
    assert!(t.delete(MapRole::Data, &7u32.to_le_bytes())?);
    assert!(!t.delete(MapRole::Data, &7u32.to_le_bytes())?);
    assert!(t.lookup(MapRole::Data, &7u32.to_le_bytes())?.is_none());

    Ok(())
}

#[test]
fn update_modes() -> Result<()> {
    let (_service, t) = new_table()?;
    let key = 1u32.to_le_bytes();

    // noexist на пустом месте проходит
    t.update(MapRole::Data, &key, &10u64.to_le_bytes(), UPDATE_NOEXIST)?;

    // noexist по занятому ключу: AlreadyExists, старое значение не тронуто
    let err = t
        .update(MapRole::Data, &key, &11u64.to_le_bytes(), UPDATE_NOEXIST)
        .unwrap_err();
    assert!(matches!(err, TabError::AlreadyExists), "got {err:?}");
    let got = t.lookup(MapRole::Data, &key)?;
    assert_eq!(got.as_deref(), Some(10u64.to_le_bytes().as_slice()));

    // exist по занятому ключу проходит
    t.update(MapRole::Data, &key, &12u64.to_le_bytes(), UPDATE_EXIST)?;
    let got = t.lookup(MapRole::Data, &key)?;
    assert_eq!(got.as_deref(), Some(12u64.to_le_bytes().as_slice()));

    // exist по отсутствующему: NotFound
    let err = t
        .update(MapRole::Data, &2u32.to_le_bytes(), &13u64.to_le_bytes(), UPDATE_EXIST)
        .unwrap_err();
    assert!(matches!(err, TabError::NotFound), "got {err:?}");
    assert!(t.lookup(MapRole::Data, &2u32.to_le_bytes())?.is_none());

    Ok(())
}

#[test]
fn wrong_sizes_rejected() -> Result<()> {
    let (_service, t) = new_table()?;

    // ключ короче key_size
    assert!(t
        .update(MapRole::Data, &[1u8, 2], &0u64.to_le_bytes(), UPDATE_ANY)
        .is_err());
    // значение длиннее leaf_size
    assert!(t
        .update(MapRole::Data, &1u32.to_le_bytes(), &[0u8; 9], UPDATE_ANY)
        .is_err());
    assert!(t.lookup(MapRole::Data, &[1u8, 2, 3]).is_err());
    assert!(t.delete(MapRole::Data, &[1u8]).is_err());

    // таблица осталась пустой
    assert_eq!(t.elements()?.len(), 0);
    Ok(())
}

#[test]
fn meta_role_reaches_descriptor() -> Result<()> {
    let (_service, t) = new_table()?;

    let raw = t
        .lookup(MapRole::Meta, &meta_key_bytes())?
        .expect("metadata record must exist after create");
    let descr = TableDescr::decode(&raw)?;
    assert_eq!(descr.key_size, 4);
    assert_eq!(descr.leaf_size, 8);
    assert_eq!(descr.key_desc_len, 0);
    assert_eq!(descr.leaf_desc_len, 0);
    Ok(())
}

#[test]
fn role_parsing_guards_dispatch() {
    // untrusted-вход отбрасывается до любого обращения к сервису
    let err = MapRole::try_from(7u32).unwrap_err();
    assert!(matches!(err, TabError::InvalidObjectType { .. }), "got {err:?}");

    let err = "bogus".parse::<MapRole>().unwrap_err();
    assert!(matches!(err, TabError::InvalidObjectType { .. }), "got {err:?}");

    assert_eq!("data".parse::<MapRole>().unwrap(), MapRole::Data);
    assert_eq!("metadata".parse::<MapRole>().unwrap(), MapRole::Meta);
}
