use std::fs;

use rceditor_container::{
    is_valid, validate, Checking, DublinCore, Manifest, Project, ResourceContainer, Source,
    MANIFEST_FILE,
};
use tempfile::tempdir;

const SAMPLE_MANIFEST: &str = r#"
dublin_core:
  conformsto: 'rc0.2'
  contributor:
    - 'Wycliffe Associates'
  creator: 'Door43 World Missions Community'
  description: 'An unrestricted version of the Bible.'
  format: 'text/usfm'
  identifier: 'ulb'
  issued: '2017-05-29'
  language:
    direction: 'ltr'
    identifier: 'en'
    title: 'English'
  modified: 2017-06-15
  publisher: 'Door43'
  relation:
    - 'en/tn'
    - 'en/tq'
  rights: 'CC BY-SA 4.0'
  source:
    - identifier: 'ulb'
      language: 'en'
      version: 12
  subject: 'Bible'
  title: 'Unlocked Literal Bible'
  type: 'bundle'
  version: 12

checking:
  checking_entity:
    - 'Wycliffe Associates'
  checking_level: '3'

projects:
  - title: 'Genesis'
    versification: 'kjv'
    identifier: 'gen'
    sort: 1
    path: './01-GEN.usfm'
    categories:
      - 'bible-ot'
"#;

#[test]
fn opens_hand_written_manifest() {
    let dir = tempdir().expect("temp dir");
    fs::write(dir.path().join(MANIFEST_FILE), SAMPLE_MANIFEST).unwrap();

    let container = ResourceContainer::open(dir.path()).expect("open container");
    let dc = &container.manifest.dublin_core;
    assert_eq!(dc.identifier, "ulb");
    assert_eq!(dc.modified, "2017-06-15");
    assert_eq!(dc.version, "12");
    assert_eq!(dc.source, vec![Source::new("ulb", "en", "12")]);
    assert_eq!(dc.relation, vec!["en/tn".to_string(), "en/tq".to_string()]);
    assert_eq!(container.manifest.projects[0].categories, vec!["bible-ot"]);
    assert!(is_valid(&container), "{:?}", validate(&container).issues);
}

#[test]
fn create_write_and_reopen_round_trip() {
    let dir = tempdir().expect("temp dir");
    let root = dir.path().join("nested").join("en_ulb");

    let mut container = ResourceContainer::create(&root, |manifest| {
        *manifest = Manifest::new(DublinCore::default(), Vec::new(), Checking::default());
    })
    .expect("create container");
    assert!(root.join(MANIFEST_FILE).exists());
    assert_eq!(container.dir(), root.as_path());

    container.manifest.dublin_core.title = "Unlocked Literal Bible".into();
    container.manifest.projects.push(Project {
        title: "Exodus".into(),
        identifier: "exo".into(),
        sort: 2,
        path: "./02-EXO.usfm".into(),
        ..Project::default()
    });
    container.write().expect("write manifest");

    let reopened = ResourceContainer::open(&root).expect("reopen");
    assert_eq!(reopened.manifest, container.manifest);
    assert!(!root.join("manifest.yaml.tmp").exists());
}
