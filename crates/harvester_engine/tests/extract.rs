use harvester_engine::{ImageExtractor, MarkupImageExtractor};
use pretty_assertions::assert_eq;
use url::Url;

fn extract(html: &str, base: &str) -> Vec<String> {
    let base = Url::parse(base).unwrap();
    MarkupImageExtractor
        .extract(html, &base)
        .into_iter()
        .map(|candidate| candidate.url.to_string())
        .collect()
}

#[test]
fn img_src_is_resolved_against_page() {
    let urls = extract(r#"<img src="a.jpg">"#, "http://ex.com/p");
    assert_eq!(urls, vec!["http://ex.com/a.jpg".to_string()]);
}

#[test]
fn img_srcset_contributes_widest_candidate() {
    let html = r#"<img src="/small.jpg" srcset="s.jpg 320w, m.jpg 640w, l.jpg">"#;
    let urls = extract(html, "https://ex.com/gallery/");
    assert_eq!(
        urls,
        vec![
            "https://ex.com/small.jpg".to_string(),
            "https://ex.com/gallery/m.jpg".to_string(),
        ]
    );
}

#[test]
fn picture_sources_use_srcset_then_src() {
    let html = r#"
    <picture>
        <source srcset="/w/a.webp 300w, /w/b.webp 300w" type="image/webp">
        <source src="/v/clip.avif">
        <img src="/fallback.png">
    </picture>
    "#;
    let urls = extract(html, "https://ex.com/");
    assert_eq!(
        urls,
        vec![
            "https://ex.com/fallback.png".to_string(),
            "https://ex.com/w/b.webp".to_string(),
            "https://ex.com/v/clip.avif".to_string(),
        ]
    );
}

#[test]
fn anchors_count_only_when_path_has_image_extension() {
    let html = r#"
    <a href="/photos/full.JPG">full</a>
    <a href="/photos/page.html">page</a>
    <a href="/download?file=x.png">query only</a>
    <a href="https://cdn.ex.com/raw/pic.heic#frag">heic</a>
    "#;
    let urls = extract(html, "https://ex.com/");
    assert_eq!(
        urls,
        vec![
            "https://ex.com/photos/full.JPG".to_string(),
            "https://cdn.ex.com/raw/pic.heic#frag".to_string(),
        ]
    );
}

#[test]
fn non_http_schemes_and_empty_attributes_are_dropped() {
    let html = r#"
    <img src="">
    <img src="data:image/png;base64,AAAA">
    <img src="ftp://ex.com/a.png">
    <a href="javascript:alert('x.png')">js</a>
    <a href="mailto:someone@ex.com">mail</a>
    <img src="ok.gif">
    "#;
    let urls = extract(html, "https://ex.com/dir/");
    assert_eq!(urls, vec!["https://ex.com/dir/ok.gif".to_string()]);
}

#[test]
fn duplicates_keep_first_discovery_order() {
    let html = r#"
    <a href="/b.png">b</a>
    <img src="/a.png">
    <img src="/b.png" srcset="/a.png 10w">
    <source src="/c.png">
    "#;
    let urls = extract(html, "https://ex.com/");
    assert_eq!(
        urls,
        vec![
            "https://ex.com/a.png".to_string(),
            "https://ex.com/b.png".to_string(),
            "https://ex.com/c.png".to_string(),
        ]
    );
}

#[test]
fn page_without_images_yields_nothing() {
    assert!(extract("<html><body><p>text</p></body></html>", "https://ex.com/").is_empty());
}
