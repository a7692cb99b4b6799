use std::error::Error;
use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

const VALID_MANIFEST: &str = r#"
dublin_core:
  conformsto: 'rc0.2'
  contributor: ['Door43']
  creator: 'Door43 World Missions Community'
  description: ''
  format: 'text/usfm'
  identifier: 'ulb'
  issued: '2017-05-29'
  language: { direction: 'ltr', identifier: 'en', title: 'English' }
  modified: '2017-06-15'
  publisher: 'Door43'
  relation: []
  rights: 'CC BY-SA 4.0'
  source:
    - { identifier: 'ulb', language: 'en', version: 12 }
  subject: 'Bible'
  title: 'Unlocked Literal Bible'
  type: 'bundle'
  version: 12
checking:
  checking_entity: ['Wycliffe Associates']
  checking_level: '3'
projects:
  - { title: 'Genesis', versification: 'kjv', identifier: 'gen', sort: 1, path: './01-GEN.usfm', categories: ['bible-ot'] }
"#;

fn cli() -> Result<Command, Box<dyn Error>> {
    Ok(Command::cargo_bin("rceditor-cli")?)
}

#[test]
fn init_writes_manifest_with_overrides() -> Result<(), Box<dyn Error>> {
    let root = tempdir()?;
    let dir = root.path().join("en_ulb");

    cli()?
        .args([
            "init",
            dir.to_str().unwrap(),
            "--identifier",
            "ulb",
            "--language",
            "en",
            "--title",
            "Unlocked Literal Bible",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created Resource Container"));

    let written = fs::read_to_string(dir.join("manifest.yaml"))?;
    assert!(written.contains("identifier: ulb"));
    assert!(written.contains("title: Unlocked Literal Bible"));
    Ok(())
}

#[test]
fn init_refuses_existing_container() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    fs::write(dir.path().join("manifest.yaml"), VALID_MANIFEST)?;

    cli()?
        .args(["init", dir.path().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    let untouched = fs::read_to_string(dir.path().join("manifest.yaml"))?;
    assert_eq!(untouched, VALID_MANIFEST);
    Ok(())
}

#[test]
fn inspect_prints_manifest_as_json() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    fs::write(dir.path().join("manifest.yaml"), VALID_MANIFEST)?;

    let output = cli()?
        .args(["inspect", dir.path().to_str().unwrap()])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&output)?;
    assert_eq!(json["dublin_core"]["type"], "bundle");
    assert_eq!(json["dublin_core"]["version"], "12");
    assert_eq!(json["dublin_core"]["source"][0]["version"], "12");
    assert_eq!(json["projects"][0]["sort"], 1);
    Ok(())
}

#[test]
fn inspect_reports_missing_manifest() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    cli()?
        .args(["inspect", dir.path().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no manifest.yaml found"));
    Ok(())
}

#[test]
fn validate_accepts_complete_manifest() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    fs::write(dir.path().join("manifest.yaml"), VALID_MANIFEST)?;
    cli()?
        .args(["validate", dir.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("manifest is valid"));
    Ok(())
}

#[test]
fn validate_lists_issues_of_fresh_container() -> Result<(), Box<dyn Error>> {
    let root = tempdir()?;
    let dir = root.path().join("draft");
    cli()?
        .args(["init", dir.to_str().unwrap(), "--identifier", "Not Valid"])
        .assert()
        .success();

    cli()?
        .args(["validate", dir.to_str().unwrap()])
        .assert()
        .failure()
        .stdout(predicate::str::contains("dublin_core.title: must not be empty"))
        .stdout(predicate::str::contains("dublin_core.identifier"))
        .stderr(predicate::str::contains("validation issue(s)"));
    Ok(())
}
