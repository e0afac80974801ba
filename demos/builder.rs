use json_db::JsonDb;

fn main() -> Result<(), json_db::Error> {
    let path = std::env::temp_dir().join("json_db_demo_builder.json");
    let _ = std::fs::remove_file(&path);

    // manual sync + 2-space indentation
    let mut db = JsonDb::builder(&path)
        .write_on_mutate(false)
        .indent_width(2)
        .build()?;

    db.set("name", "json-db")?;
    db.set("version", "0.1.0")?;
    db.sync()?;
    println!("On-disk JSON:\n{}", std::fs::read_to_string(db.path())?);
    drop(db);

    // deferred writes with an error hook
    let mut db = JsonDb::builder(&path)
        .deferred_write(true)
        .on_write_error(|e| eprintln!("background write failed: {e}"))
        .build()?;
    db.set("status", "awesome")?;
    if let Some(err) = db.take_write_error() {
        eprintln!("pending failure: {err}");
    }
    drop(db); // joins the writer thread, all queued snapshots land

    println!("\nFinal content:\n{}", std::fs::read_to_string(&path)?);
    let _ = std::fs::remove_file(&path);
    Ok(())
}
