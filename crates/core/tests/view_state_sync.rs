use chrono::NaiveDate;
use rceditor_container::{Checking, DublinCore, Language, Manifest, Project, Source};
use rceditor_core::{
    FlushError, LoadError, ManifestViewState, RowConversionError, TextItem, UNKNOWN_CATEGORY,
};

fn sample_manifest() -> Manifest {
    Manifest {
        dublin_core: DublinCore {
            conformsto: "rc0.2".into(),
            contributor: vec!["Wycliffe Associates".into(), "Door43".into(), "Door43".into()],
            creator: "Door43 World Missions Community".into(),
            description: "An unrestricted version of the Bible.".into(),
            format: "text/usfm".into(),
            identifier: "ulb".into(),
            issued: "2023-05-01".into(),
            language: Language {
                direction: "ltr".into(),
                identifier: "en".into(),
                title: "English".into(),
            },
            modified: "2023-07-14".into(),
            publisher: "Door43".into(),
            relation: vec!["en/tn".into(), "en/tq".into()],
            rights: "CC BY-SA 4.0".into(),
            source: vec![Source::new("ulb", "en", "12"), Source::new("udb", "en", "4")],
            subject: "Bible".into(),
            title: "Unlocked Literal Bible".into(),
            kind: "bundle".into(),
            version: "12".into(),
        },
        projects: vec![
            Project {
                title: "Genesis".into(),
                versification: "kjv".into(),
                identifier: "gen".into(),
                sort: 1,
                path: "./01-GEN.usfm".into(),
                categories: vec!["bible-ot".into(), "law".into()],
            },
            Project {
                title: "Front Matter".into(),
                versification: String::new(),
                identifier: "front".into(),
                sort: 0,
                path: "./front".into(),
                categories: Vec::new(),
            },
        ],
        checking: Checking {
            checking_entity: vec!["Wycliffe Associates".into()],
            checking_level: "3".into(),
        },
    }
}

#[test]
fn flush_after_load_reproduces_manifest_except_extra_categories() {
    let original = sample_manifest();
    let mut state = ManifestViewState::new();
    state.clear();
    state.load(&original).expect("load");

    let mut flushed = Manifest::default();
    state.flush(&mut flushed).expect("flush");

    let mut expected = original.clone();
    expected.projects[0].categories.truncate(1);
    assert_eq!(flushed, expected);
}

#[test]
fn reload_after_clear_leaves_no_residue() {
    let mut state = ManifestViewState::new();
    state.load(&sample_manifest()).expect("first load");

    let mut second = Manifest::default();
    second.dublin_core.issued = "2020-01-01".into();
    second.dublin_core.modified = "2020-01-02".into();
    second.dublin_core.contributor = vec!["Solo".into()];

    state.clear();
    state.load(&second).expect("second load");

    assert_eq!(state.contributor_texts(), vec!["Solo".to_string()]);
    assert!(state.relations.is_empty());
    assert!(state.sources.is_empty());
    assert!(state.checking_entities.is_empty());
    assert!(state.projects.is_empty());
    assert_eq!(state.title, "");
}

#[test]
fn load_appends_when_not_cleared() {
    let mut state = ManifestViewState::new();
    let manifest = sample_manifest();
    state.load(&manifest).unwrap();
    state.load(&manifest).unwrap();
    assert_eq!(state.contributors.len(), 6);
    assert_eq!(state.projects.len(), 4);
}

#[test]
fn dates_keep_their_calendar_form() {
    let mut state = ManifestViewState::new();
    state.load(&sample_manifest()).unwrap();
    assert_eq!(state.issued, NaiveDate::from_ymd_opt(2023, 5, 1).unwrap());

    let mut out = Manifest::default();
    state.flush(&mut out).unwrap();
    assert_eq!(out.dublin_core.issued, "2023-05-01");
    assert_eq!(out.dublin_core.modified, "2023-07-14");
}

#[test]
fn uncategorized_project_maps_through_sentinel() {
    let mut state = ManifestViewState::new();
    state.load(&sample_manifest()).unwrap();
    assert_eq!(state.projects[1].category, UNKNOWN_CATEGORY);

    let mut out = Manifest::default();
    state.flush(&mut out).unwrap();
    assert!(out.projects[1].categories.is_empty());
}

#[test]
fn flush_rejects_non_numeric_sort_without_touching_manifest() {
    let mut state = ManifestViewState::new();
    state.load(&sample_manifest()).unwrap();
    state.title = "Edited".into();
    state.projects[0].sort = "one".into();

    let mut target = sample_manifest();
    let err = state.flush(&mut target).unwrap_err();
    assert!(matches!(
        err,
        FlushError::Row(RowConversionError::InvalidSort { .. })
    ));
    assert_eq!(target, sample_manifest());
}

#[test]
fn edited_rows_replace_manifest_lists() {
    let mut state = ManifestViewState::new();
    state.load(&sample_manifest()).unwrap();

    let first = state.relations[0].id();
    assert!(rceditor_core::remove_item(&mut state.relations, first));
    state.checking_entities.push(TextItem::new("unfoldingWord"));
    state.checking_entities[0].text = "WA".into();
    state.sources.pop();

    let mut out = sample_manifest();
    state.flush(&mut out).unwrap();
    assert_eq!(out.dublin_core.relation, vec!["en/tq".to_string()]);
    assert_eq!(
        out.checking.checking_entity,
        vec!["WA".to_string(), "unfoldingWord".to_string()]
    );
    assert_eq!(out.dublin_core.source, vec![Source::new("ulb", "en", "12")]);
}

#[test]
fn unpadded_manifest_date_fails_to_load() {
    let mut manifest = sample_manifest();
    manifest.dublin_core.modified = "2023-7-14".into();
    let mut state = ManifestViewState::new();

    let err = state.load(&manifest).unwrap_err();

    assert!(matches!(err, LoadError::Date { field: "modified", .. }));
    assert!(state.is_empty());
}
