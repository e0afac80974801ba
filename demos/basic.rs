use json_db::JsonDb;
use serde_json::json;

fn main() -> Result<(), json_db::Error> {
    let path = std::env::temp_dir().join("json_db_demo_basic.json");
    let _ = std::fs::remove_file(&path);
    let mut db = JsonDb::open(&path)?;

    // set / get / has / delete
    db.set("apples", 3)?;
    db.set("bananas", 5)?;
    println!("apples  = {:?}", db.get("apples"));
    println!("has pears? {}", db.has("pears"));
    println!("deleted bananas: {:?}", db.delete("bananas")?);

    // update in place
    db.update("apples", |n| *n = json!(n.as_i64().unwrap() + 1))?;
    println!("apples after update = {:?}", db.get("apples"));

    // bulk insert with a single sync
    db.extend(vec![("grapes", 12), ("lemons", 7)])?;

    // snapshots
    println!("keys   = {:?}", db.keys());
    println!("values = {:?}", db.values());
    println!("len    = {}", db.len());

    // whole-object replace, then persist it
    db.replace(json!({"reset": true}))?;
    db.sync()?;
    println!("on disk:\n{}", std::fs::read_to_string(db.path())?);

    // clear chains into the next call
    db.clear()?.set("done", true)?;
    println!("after clear: len = {}", db.len());

    let _ = std::fs::remove_file(&path);
    Ok(())
}
