use chrono::NaiveDate;
use harvester_engine::{build_file_name, content_digest};
use pretty_assertions::assert_eq;
use url::Url;

fn timestamp() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 6)
        .unwrap()
        .and_hms_opt(7, 8, 9)
        .unwrap()
}

fn name_for(content_type: &str, url: &str) -> String {
    let digest = content_digest(b"abc");
    build_file_name(
        "Fresa",
        &digest,
        content_type,
        &Url::parse(url).unwrap(),
        timestamp(),
    )
}

#[test]
fn content_type_wins_over_url_suffix() {
    assert_eq!(
        name_for("image/png", "https://ex.com/photo.jpg"),
        "Fresa_20240506-070809_ba7816bf.png"
    );
}

#[test]
fn unmapped_content_type_falls_back_to_url_suffix() {
    assert_eq!(
        name_for("image/x-unknown", "https://ex.com/photo.webp"),
        "Fresa_20240506-070809_ba7816bf.webp"
    );
}

#[test]
fn neither_source_defaults_to_jpg() {
    assert_eq!(
        name_for("image/x-unknown", "https://ex.com/photo"),
        "Fresa_20240506-070809_ba7816bf.jpg"
    );
}

#[test]
fn unsafe_characters_in_label_are_replaced() {
    let digest = content_digest(b"abc");
    let name = build_file_name(
        "Red/Green: \"mix\"",
        &digest,
        "image/gif",
        &Url::parse("https://ex.com/x").unwrap(),
        timestamp(),
    );
    assert_eq!(name, "Red_Green_ _mix__20240506-070809_ba7816bf.gif");
}
