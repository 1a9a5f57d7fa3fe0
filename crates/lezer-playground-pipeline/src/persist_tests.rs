use std::io::Write;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use indoc::indoc;

use crate::defaults::{DEFAULT_GRAMMAR, DEFAULT_SPECIMEN};
use crate::persist::{
    FileStore, MAX_STATE_BYTES, MemoryStore, PersistError, PersistedState, STORAGE_KEY, StateStore,
};

fn sample() -> PersistedState {
    PersistedState::new(DEFAULT_GRAMMAR, DEFAULT_SPECIMEN)
}

#[test]
fn json_layout() {
    let state = PersistedState::new("@top P { \"a\" }", "a");

    insta::assert_snapshot!(state.to_json(), @r#"{"editors":{"grammar":{"code":"@top P { \"a\" }"},"specimen":{"code":"a"}}}"#);
}

#[test]
fn unknown_fields_are_ignored() {
    let json = indoc! {r#"
        {
          "editors": {
            "grammar": { "code": "g", "cursor": 3 },
            "specimen": { "code": "s" },
            "tree": { "code": "{}" }
          },
          "version": 2
        }
    "#};

    assert_eq!(
        PersistedState::from_json(json).unwrap(),
        PersistedState::new("g", "s")
    );
}

#[test]
fn wrong_shapes_are_rejected() {
    for json in [
        r#"{}"#,
        r#"{"grammar": "g", "specimen": "s"}"#,
        r#"{"editors": {"grammar": {"code": "g"}}}"#,
        r#"{"editors": {"grammar": {"code": 1}, "specimen": {"code": "s"}}}"#,
        "not json",
    ] {
        assert!(
            matches!(PersistedState::from_json(json), Err(PersistError::Json(_))),
            "{json}"
        );
    }
}

#[test]
fn fragment_restores_exact_text() {
    let state = PersistedState::new("@top P { \"ü\" }\n\t// tabs & unicode", "ü\r\n");

    let fragment = state.to_fragment();

    assert!(
        fragment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    );
    assert_eq!(PersistedState::from_fragment(&fragment).unwrap(), state);
}

#[test]
fn fragment_is_compressed() {
    let state = sample();

    assert!(state.to_fragment().len() < state.to_json().len());
}

#[test]
fn fragment_accepts_hash_and_url() {
    let state = sample();
    let fragment = state.to_fragment();

    assert_eq!(
        PersistedState::from_fragment(&format!("#{fragment}")).unwrap(),
        state
    );
    assert_eq!(
        PersistedState::from_fragment(&state.share_url("https://example.com/play")).unwrap(),
        state
    );
}

#[test]
fn share_url_replaces_existing_fragment() {
    let state = sample();

    let url = state.share_url("https://example.com/#old");

    assert_eq!(url, format!("https://example.com/#{}", state.to_fragment()));
}

#[test]
fn corrupt_fragments() {
    assert!(matches!(
        PersistedState::from_fragment("not base64!"),
        Err(PersistError::Decode(_))
    ));
    assert!(PersistedState::from_fragment("AAAA").is_err());
}

#[test]
fn oversized_fragment_is_cut_off() {
    let mut bomb = Vec::new();
    {
        let mut writer = brotli::CompressorWriter::new(&mut bomb, 4096, 1, 22);
        writer
            .write_all(&vec![b' '; MAX_STATE_BYTES as usize + 1])
            .unwrap();
    }

    let err = PersistedState::from_fragment(&URL_SAFE_NO_PAD.encode(bomb)).unwrap_err();

    assert!(matches!(err, PersistError::Decompress(_)), "{err}");
    assert!(err.to_string().contains("expands past"), "{err}");
}

#[test]
fn memory_store_round_trip() {
    let mut store = MemoryStore::new();
    assert_eq!(store.load(), None);

    store.save(&sample()).unwrap();

    assert_eq!(store.load(), Some(sample()));
    assert_eq!(store.raw(), Some(sample().to_json().as_str()));
}

#[test]
fn memory_store_discards_foreign_payload() {
    let mut store = MemoryStore::new();
    store.set_raw(r#"{"theme": "dark"}"#);

    assert_eq!(store.load(), None);
    assert_eq!(STORAGE_KEY, "lezer-playground-state");
}

#[test]
fn file_store_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileStore::new(dir.path().join("nested/state.json"));
    assert_eq!(store.load(), None);

    let state = PersistedState::new("grammar", "specimen");
    store.save(&state).unwrap();

    assert_eq!(store.load(), Some(state));
}

#[test]
fn file_store_discards_garbage() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, "{ truncated").unwrap();

    assert_eq!(FileStore::new(path).load(), None);
}

#[test]
fn file_store_save_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileStore::new(dir.path());

    let err = store.save(&sample()).unwrap_err();

    assert!(matches!(err, PersistError::Io { .. }));
    assert!(err.to_string().starts_with("cannot access"));
}
