use json_db::{Error, JsonDb};
use serde_json::json;
use std::io::Write;

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("json_db_test_{}.json", name))
}

// ---- construction -----------------------------------------------------------

#[test]
fn open_missing_file_starts_empty_and_creates_nothing() {
    let path = temp_path("missing");
    let _ = std::fs::remove_file(&path);
    let db = JsonDb::open(&path).unwrap();
    assert!(db.is_empty());
    // the file only appears on the first sync
    assert!(!path.exists());
    let _ = std::fs::remove_file(&path);
}

#[test]
fn open_zero_length_file_starts_empty() {
    let path = temp_path("zero_len");
    std::fs::File::create(&path).unwrap();
    let db = JsonDb::open(&path).unwrap();
    assert!(db.is_empty());
    let _ = std::fs::remove_file(&path);
}

#[test]
fn open_empty_path_is_invalid_argument() {
    match JsonDb::open("") {
        Err(Error::InvalidArgument(_)) => {}
        other => panic!("expected InvalidArgument, got {other:?}"),
    }
}

#[test]
fn open_non_json_content_is_corrupt() {
    let path = temp_path("corrupt");
    let mut f = std::fs::File::create(&path).unwrap();
    f.write_all(b"not json").unwrap();
    drop(f);

    match JsonDb::open(&path) {
        Err(Error::Corrupt(_)) => {}
        other => panic!("expected Corrupt, got {other:?}"),
    }
    let _ = std::fs::remove_file(&path);
}

#[test]
fn open_non_object_top_level_is_corrupt() {
    for (name, content) in [
        ("top_array", b"[1, 2, 3]".as_slice()),
        ("top_number", b"42".as_slice()),
        ("top_string", b"\"hello\"".as_slice()),
    ] {
        let path = temp_path(name);
        std::fs::write(&path, content).unwrap();
        match JsonDb::open(&path) {
            Err(Error::Corrupt(_)) => {}
            other => panic!("expected Corrupt for {name}, got {other:?}"),
        }
        let _ = std::fs::remove_file(&path);
    }
}

#[cfg(unix)]
#[test]
fn open_readonly_file_is_permission_denied() {
    let path = temp_path("readonly");
    std::fs::write(&path, b"{}").unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_readonly(true);
    std::fs::set_permissions(&path, perms).unwrap();

    // root ignores permission bits; nothing to assert in that case
    if std::fs::OpenOptions::new().write(true).open(&path).is_ok() {
        let _ = std::fs::remove_file(&path);
        return;
    }

    match JsonDb::open(&path) {
        Err(Error::PermissionDenied(_)) => {}
        other => panic!("expected PermissionDenied, got {other:?}"),
    }

    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_readonly(false);
    std::fs::set_permissions(&path, perms).unwrap();
    let _ = std::fs::remove_file(&path);
}

// ---- reload -----------------------------------------------------------------

#[test]
fn persist_and_reload_roundtrip() {
    let path = temp_path("roundtrip");
    let _ = std::fs::remove_file(&path);
    {
        let mut db = JsonDb::open(&path).unwrap();
        for i in 0..20 {
            db.set(format!("k{i}"), json!({"index": i, "even": i % 2 == 0}))
                .unwrap();
        }
        db.set("k3", "overwritten").unwrap();
    }
    let db = JsonDb::open(&path).unwrap();
    assert_eq!(db.len(), 20);
    assert_eq!(db.get("k0"), Some(&json!({"index": 0, "even": true})));
    assert_eq!(db.get("k3"), Some(&json!("overwritten")));
    assert_eq!(db.get("k19"), Some(&json!({"index": 19, "even": false})));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn set_foo_bar_survives_reload() {
    let path = temp_path("foo_bar");
    let _ = std::fs::remove_file(&path);
    {
        let mut db = JsonDb::open(&path).unwrap();
        db.set("foo", "bar").unwrap();
    }
    let db = JsonDb::open(&path).unwrap();
    assert_eq!(db.get("foo"), Some(&json!("bar")));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn clear_then_reload_is_empty() {
    let path = temp_path("clear_reload");
    let _ = std::fs::remove_file(&path);
    {
        let mut db = JsonDb::open(&path).unwrap();
        db.set("a", 1).unwrap();
        db.clear().unwrap();
    }
    let db = JsonDb::open(&path).unwrap();
    assert!(db.is_empty());
    let _ = std::fs::remove_file(&path);
}

#[test]
fn on_disk_key_order_follows_insertion_order() {
    let path = temp_path("key_order");
    let _ = std::fs::remove_file(&path);
    {
        let mut db = JsonDb::open(&path).unwrap();
        db.set("zebra", 1).unwrap();
        db.set("apple", 2).unwrap();
        db.set("mango", 3).unwrap();
    }
    let raw = std::fs::read_to_string(&path).unwrap();
    let zebra = raw.find("zebra").unwrap();
    let apple = raw.find("apple").unwrap();
    let mango = raw.find("mango").unwrap();
    assert!(zebra < apple && apple < mango);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn path_accessor() {
    let path = temp_path("path_acc");
    let _ = std::fs::remove_file(&path);
    let db = JsonDb::open(&path).unwrap();
    assert_eq!(db.path(), path.as_path());
    let _ = std::fs::remove_file(&path);
}
