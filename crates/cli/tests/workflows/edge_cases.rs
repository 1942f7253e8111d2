//! Startup failures and fallbacks

use crate::common::TestData;
use crate::exhibit;
use anyhow::Result;

#[test]
fn test_missing_key_uses_default() -> Result<()> {
    let data = TestData::new();

    let result = exhibit!(&data.data_file, "get", "absent", "--default", "[]").assert_success()?;
    assert_eq!(result.stdout.trim(), "[]");

    exhibit!(&data.data_file, "get", "absent").assert_failure()?;
    Ok(())
}

#[test]
fn test_corrupt_data_file_refuses_to_start() -> Result<()> {
    let data = TestData::new();
    std::fs::write(&data.data_file, "{ not json")?;

    let result = exhibit!(&data.data_file, "list", "--owner", "1").assert_failure()?;
    assert!(result.contains_stderr("not valid JSON"));

    // The operator's file is left untouched
    assert_eq!(std::fs::read_to_string(&data.data_file)?, "{ not json");
    Ok(())
}

#[test]
fn test_data_file_from_environment() -> Result<()> {
    let data = TestData::new();
    let other = data.data_file.with_file_name("from_env.json");

    // --data-file always wins over the environment
    exhibit!(&data.data_file, "set", "k", "v")
        .env("DATAFILE_LOCATION", other.to_str().unwrap())
        .assert_success()?;

    assert!(data.data_file.exists());
    assert!(!other.exists());
    Ok(())
}

#[test]
fn test_commands_are_fast() -> Result<()> {
    let data = TestData::new();

    // The shutdown flush means no command waits out the quiescence delay
    let result = exhibit!(&data.data_file, "set", "k", "v")
        .env("EXHIBIT_FLUSH_DELAY_MS", "60000")
        .assert_success()?;
    assert!(result.duration.as_secs() < 30);
    assert!(data.data_file.exists());
    Ok(())
}
