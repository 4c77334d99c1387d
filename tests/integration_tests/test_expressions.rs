// end-to-end tests for filters and modifiers over listens

use serde_json::json;

use listen_filter::expr::{
    build_filter, build_modifier, ExprError, FilterOptions, ListSource, Record, SkipReason,
};
use listen_filter::listen::Listen;

fn listen_with(skipped: i64, duration_ms: i64) -> Listen {
    Listen::new(1_700_000_000, "Artist", "Track")
        .with_info("skipped", json!(skipped))
        .with_info("duration_ms", json!(duration_ms))
}

#[test]
fn test_skipped_and_duration_filter() {
    let filter =
        build_filter(&FilterOptions::new().with_filter("skipped!=1&&duration_ms>=30e3")).unwrap();

    assert!(!filter.matches(&listen_with(1, 50_000)).unwrap());
    assert!(filter.matches(&listen_with(0, 40_000)).unwrap());
}

#[test]
fn test_artist_edit_only_touches_artist() {
    let modifier = build_modifier(&["artist_name=New Artist"]).unwrap();

    let original = listen_with(0, 40_000);
    let mut edited = original.clone();
    modifier.apply(&mut edited);

    assert_eq!(edited.track_metadata.artist_name, "New Artist");

    let mut expected = original;
    expected.track_metadata.artist_name = "New Artist".to_string();
    assert_eq!(edited, expected);
}

#[test]
fn test_edit_of_unknown_key_goes_to_additional_info() {
    let modifier = build_modifier(&["submission_client=listen-filter", "origin=a=b"]).unwrap();
    let mut listen = Listen::new(1, "A", "T");
    modifier.apply(&mut listen);

    let info = listen.track_metadata.additional_info.unwrap();
    assert_eq!(info["submission_client"], json!("listen-filter"));
    assert_eq!(info["origin"], json!("a=b"));
}

#[test]
fn test_edits_are_last_write_wins() {
    let modifier = build_modifier(&["track_name=First", "track_name=Second"]).unwrap();
    let mut listen = Listen::new(1, "A", "T");
    modifier.apply(&mut listen);
    assert_eq!(listen.track_metadata.track_name, "Second");
}

#[test]
fn test_exclude_and_include_lists() {
    let options = FilterOptions::new()
        .with_exclude(ListSource::new(
            "exclude.json",
            r#"{ "artist_name": ["Nickelback", "Creed"] }"#,
        ))
        .with_include(ListSource::new(
            "include.json",
            r#"{ "music_service": ["spotify.com", "bandcamp.com"] }"#,
        ));
    let filter = build_filter(&options).unwrap();

    let spotify = |artist: &str| {
        Listen::new(10, artist, "Song").with_info("music_service", json!("spotify.com"))
    };

    assert!(filter.matches(&spotify("Radiohead")).unwrap());
    assert!(!filter.matches(&spotify("Creed")).unwrap());
    assert!(!filter.matches(&Listen::new(10, "Radiohead", "Song")).unwrap());
}

#[test]
fn test_list_source_with_scalar_entry_is_fatal() {
    let options = FilterOptions::new().with_exclude(ListSource::new(
        "exclude.json",
        r#"{ "artist_name": "Foo" }"#,
    ));

    match build_filter(&options) {
        Err(ExprError::InvalidListEntry { source_name, key }) => {
            assert_eq!(source_name, "exclude.json");
            assert_eq!(key, "artist_name");
        }
        other => panic!("expected InvalidListEntry, got {:?}", other),
    }
}

#[test]
fn test_multi_valued_attribute_never_rejects() {
    let filter = build_filter(&FilterOptions::new().with_filter("artist_names==Nobody")).unwrap();
    let listen = Listen::new(10, "A & B", "Song").with_info("artist_names", json!(["A", "B"]));

    let verdict = filter.check(&listen).unwrap();
    assert!(verdict.accepted);
    assert_eq!(verdict.warnings.len(), 1);
    assert_eq!(verdict.warnings[0].key, "artist_names");
    assert_eq!(verdict.warnings[0].reason, SkipReason::MultiValued);
}

#[test]
fn test_time_bounds_are_exclusive() {
    let filter = build_filter(
        &FilterOptions::new()
            .with_after("2024-01-01")
            .with_before("2024-01-02"),
    )
    .unwrap();

    let at = |ts| Listen::new(ts, "A", "T");
    assert!(!filter.matches(&at(1_704_067_200)).unwrap());
    assert!(filter.matches(&at(1_704_067_201)).unwrap());
    assert!(!filter.matches(&at(1_704_153_600)).unwrap());
}

#[test]
fn test_missing_attribute_compares_as_empty() {
    let filter = build_filter(&FilterOptions::new().with_filter("release_name==")).unwrap();
    assert!(filter.matches(&Listen::new(10, "A", "T")).unwrap());

    let mut listen = Listen::new(10, "A", "T");
    listen.set("release_name", "Album");
    assert!(!filter.matches(&listen).unwrap());
}

#[test]
fn test_boolean_attributes() {
    let filter = build_filter(&FilterOptions::new().with_filter("loved==1")).unwrap();
    let loved = Listen::new(10, "A", "T").with_info("loved", json!(true));
    let not_loved = Listen::new(10, "A", "T").with_info("loved", json!(false));

    assert!(filter.matches(&loved).unwrap());
    assert!(!filter.matches(&not_loved).unwrap());
}

#[test]
fn test_boolean_attribute_against_word_literal() {
    let loved = Listen::new(10, "A", "T").with_info("loved", json!(true));

    // "true" is not a number: equality never holds
    let eq = build_filter(&FilterOptions::new().with_filter("loved==true")).unwrap();
    assert!(!eq.matches(&loved).unwrap());

    let ne = build_filter(&FilterOptions::new().with_filter("loved!=true")).unwrap();
    assert!(ne.matches(&loved).unwrap());
}

#[test]
fn test_accented_names_sort_with_their_base_letter() {
    let filter = build_filter(&FilterOptions::new().with_filter("artist_name<B")).unwrap();

    assert!(filter.matches(&Listen::new(10, "Ärger", "T")).unwrap());
    assert!(filter.matches(&Listen::new(10, "Åsa", "T")).unwrap());
    assert!(!filter.matches(&Listen::new(10, "Björk", "T")).unwrap());
    assert!(!filter.matches(&Listen::new(10, "Мумий Тролль", "T")).unwrap());
}

#[test]
fn test_xor_on_presence() {
    // keep listens that have no origin_url
    let filter = build_filter(&FilterOptions::new().with_filter("origin_url^1")).unwrap();

    let with_url = Listen::new(10, "A", "T").with_info("origin_url", json!("https://x"));
    assert!(!filter.matches(&with_url).unwrap());
    assert!(filter.matches(&Listen::new(10, "A", "T")).unwrap());
}

#[test]
fn test_nested_object_attribute_is_an_error() {
    let filter = build_filter(&FilterOptions::new().with_filter("mbid_mapping==x")).unwrap();
    let listen = Listen::new(10, "A", "T").with_info("mbid_mapping", json!({ "recording_mbid": "x" }));

    let err = filter.matches(&listen).unwrap_err();
    assert!(matches!(err, ExprError::UnsupportedValue { .. }));
    assert!(err.to_string().contains("mbid_mapping"));
}
