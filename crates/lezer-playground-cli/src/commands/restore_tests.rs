use lezer_playground_pipeline::PersistedState;

use super::restore::{GRAMMAR_FILE, SPECIMEN_FILE, format_editors, write_editors};

#[test]
fn editors_are_printed_in_sections() {
    let state = PersistedState::new("@top P { \"a\" }\n", "a");

    insta::assert_snapshot!(format_editors(&state), @r#"
    --- grammar ---
    @top P { "a" }
    --- specimen ---
    a
    "#);
}

#[test]
fn editors_are_written_to_directory() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("restored");
    let state = PersistedState::from_fragment(&PersistedState::new("G", "S").share_url("http://x/"))
        .unwrap();

    write_editors(&out, &state).unwrap();

    assert_eq!(std::fs::read_to_string(out.join(GRAMMAR_FILE)).unwrap(), "G");
    assert_eq!(std::fs::read_to_string(out.join(SPECIMEN_FILE)).unwrap(), "S");
}
