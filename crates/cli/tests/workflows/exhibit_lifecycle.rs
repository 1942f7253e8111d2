//! Save, list, show and search across process restarts

use crate::common::TestData;
use crate::exhibit;
use anyhow::Result;
use serde_json::json;

fn save(data: &TestData, owner: &str, author: &str, content: &str) -> Result<()> {
    exhibit!(
        &data.data_file,
        "save",
        "--owner",
        owner,
        "--author-id",
        "42",
        "--author-name",
        author,
        "--channel-id",
        "8",
        "--message-id",
        "9",
        content
    )
    .assert_success()?;
    Ok(())
}

#[test]
fn test_save_then_show_in_new_process() -> Result<()> {
    let data = TestData::new();

    save(&data, "1", "ada", "hello")?;
    save(&data, "1", "ada", "second")?;

    let shown = exhibit!(&data.data_file, "show", "--owner", "1", "2").assert_success()?;
    assert!(shown.contains_stdout("second"));
    assert!(shown.contains_stdout("https://discord.com/channels/@me/8/9"));

    let listed = exhibit!(&data.data_file, "list", "--owner", "1").assert_success()?;
    assert!(listed.contains_stdout("hello"));
    assert!(listed.contains_stdout("2 exhibits"));

    Ok(())
}

#[test]
fn test_data_file_layout() -> Result<()> {
    let data = TestData::new();
    save(&data, "1", "ada", "hello")?;

    let on_disk = data.read();
    assert_eq!(on_disk["exhibits-1"], json!([1]));
    assert_eq!(on_disk["exhibit-1-1"]["content"], json!("hello"));
    assert_eq!(on_disk["exhibit-1-1"]["guild_id"], json!(null));

    Ok(())
}

#[test]
fn test_search_and_missing_exhibit() -> Result<()> {
    let data = TestData::new();
    save(&data, "1", "ada", "**hello** there")?;
    save(&data, "1", "grace", "unrelated")?;

    let found = exhibit!(&data.data_file, "search", "--owner", "1", "hello").assert_success()?;
    assert!(found.contains_stdout("1 - ada - hello there"));
    assert!(!found.contains_stdout("grace"));

    let missing = exhibit!(&data.data_file, "show", "--owner", "1", "99").assert_success()?;
    assert!(missing.contains_stdout("Exhibit not found."));

    Ok(())
}

#[test]
fn test_raw_set_and_get() -> Result<()> {
    let data = TestData::new();

    exhibit!(&data.data_file, "set", "greeting", "{\"text\": \"hi\"}").assert_success()?;
    let got = exhibit!(&data.data_file, "get", "greeting").assert_success()?;
    assert!(got.contains_stdout("\"text\": \"hi\""));

    let keys = exhibit!(&data.data_file, "keys").assert_success()?;
    assert_eq!(keys.stdout.trim(), "greeting");

    Ok(())
}
