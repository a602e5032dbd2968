//! Persisted layout and durability across reopen for the SQLite backend.

use crate::common::*;
use rusqlite::{params, Connection};

fn open_raw(dir: &tempfile::TempDir) -> Connection {
    Connection::open(dir.path().join("notnodb.sqlite")).unwrap()
}

fn tables(conn: &Connection) -> Vec<String> {
    let mut stmt = conn
        .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
        .unwrap();
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .unwrap()
        .collect::<rusqlite::Result<Vec<_>>>()
        .unwrap();
    names
}

#[test]
fn one_table_per_root_one_row_per_record() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    {
        let store = Store::open(&file_config(&dir)).unwrap();
        store.put("users.ann.age", 31).unwrap();
        store.put("users.bob.age", 40).unwrap();
        store.add("events", "started").unwrap();
        store.add("events", "stopped").unwrap();
    }

    let conn = open_raw(&dir);
    assert_eq!(tables(&conn), vec!["notnodb_events", "notnodb_users"]);

    let rows: Vec<(String, Vec<u8>)> = conn
        .prepare("SELECT key, value FROM notnodb_users")
        .unwrap()
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
        .unwrap()
        .collect::<rusqlite::Result<Vec<_>>>()
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].0, "users");

    let stored: serde_json::Value = serde_json::from_slice(&rows[0].1).unwrap();
    assert_eq!(stored, json!({"ann": {"age": 31}, "bob": {"age": 40}}));
}

#[test]
fn record_bytes_are_json() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    {
        let store = Store::open(&file_config(&dir)).unwrap();
        store.put("flag", true).unwrap();
        store.put("nothing", Document::Null).unwrap();
    }

    let conn = open_raw(&dir);
    let read = |table: &str, key: &str| -> Vec<u8> {
        conn.query_row(
            &format!("SELECT value FROM {} WHERE key = ?1", table),
            params![key],
            |row| row.get(0),
        )
        .unwrap()
    };
    assert_eq!(read("notnodb_flag", "flag"), b"true".to_vec());
    assert_eq!(read("notnodb_nothing", "nothing"), b"null".to_vec());
}

#[test]
fn reserved_partition_table() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    {
        let store = Store::open(&file_config(&dir)).unwrap();
        store.put_record("k1", "v1").unwrap();
        store.put_record("k2", "v2").unwrap();
    }

    let conn = open_raw(&dir);
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM notnodb_notnodb_root", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 2);
}

#[test]
fn repeated_writes_keep_a_single_row() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    {
        let store = Store::open(&file_config(&dir)).unwrap();
        for i in 0..20 {
            store.put("counter.value", i).unwrap();
        }
    }

    let conn = open_raw(&dir);
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM notnodb_counter", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn data_survives_reopen() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let config = file_config(&dir);
    {
        let store = Store::open(&config).unwrap();
        store.put("one.two.three", "content").unwrap();
        store.add("list", 1).unwrap();
    }

    let store = Store::open(&config).unwrap();
    assert_eq!(
        store.get("one.two.three").unwrap(),
        Some(doc(json!("content")))
    );
    store.add("list", 2).unwrap();
    assert_eq!(store.get("list").unwrap(), Some(doc(json!([1, 2]))));
}

#[test]
fn reads_and_deletes_of_unwritten_roots_create_no_tables() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    {
        let store = Store::open(&file_config(&dir)).unwrap();
        store.put("users.ann", 1).unwrap();
        assert_eq!(store.get("ghost").unwrap(), None);
        assert_eq!(store.get("ghost.deep.path").unwrap(), None);
        store.delete("ghost").unwrap();
        store.delete("phantom.child").unwrap();
    }

    let conn = open_raw(&dir);
    assert_eq!(tables(&conn), vec!["notnodb_users"]);
}

#[test]
fn whole_record_delete_removes_the_row() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    {
        let store = Store::open(&file_config(&dir)).unwrap();
        store.put("gone.a", 1).unwrap();
        store.delete("gone").unwrap();
    }

    let conn = open_raw(&dir);
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM notnodb_gone", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn custom_table_prefix() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let mut config = file_config(&dir);
    config.sqlite.table_prefix = "app_".to_string();
    {
        let store = Store::open(&config).unwrap();
        store.put("users.ann", 1).unwrap();
    }

    let conn = open_raw(&dir);
    assert_eq!(tables(&conn), vec!["app_users"]);
}

#[test]
fn two_stores_on_one_file() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let config = file_config(&dir);
    let a = Store::open(&config).unwrap();
    let b = Store::open(&config).unwrap();

    a.put("shared.x", 1).unwrap();
    assert_eq!(b.get("shared.x").unwrap(), Some(doc(json!(1))));
    b.put("shared.y", 2).unwrap();
    assert_eq!(
        a.get("shared").unwrap(),
        Some(doc(json!({"x": 1, "y": 2})))
    );
}
