use hunter_engine::{decode_body, HtmlTitleExtractor, TitleExtractor};
use pretty_assertions::assert_eq;

#[test]
fn decode_respects_charset_header() {
    let bytes = b"caf\xe9"; // iso-8859-1
    let decoded = decode_body(bytes, Some("text/html; charset=ISO-8859-1"));
    assert_eq!(decoded.text, "café");
    assert!(!decoded.lossy);
    assert!(
        decoded.encoding_label.eq_ignore_ascii_case("ISO-8859-1")
            || decoded.encoding_label.eq_ignore_ascii_case("windows-1252")
    );
}

#[test]
fn decode_handles_utf8_bom() {
    let bytes = b"\xEF\xBB\xBFhello";
    let decoded = decode_body(bytes, Some("text/html"));
    assert_eq!(decoded.text, "hello");
    assert_eq!(decoded.encoding_label, "UTF-8");
}

#[test]
fn malformed_bytes_decode_with_replacement() {
    let bytes = b"<title>ok\xff\xfe</title>";
    let decoded = decode_body(bytes, Some("text/html; charset=utf-8"));
    assert!(decoded.lossy);
    assert!(decoded.text.contains('\u{FFFD}'));
    assert!(decoded.text.starts_with("<title>ok"));
}

#[test]
fn undeclared_encoding_is_guessed() {
    let decoded = decode_body(b"<html><title>plain ascii</title></html>", None);
    assert!(!decoded.lossy);
    assert!(decoded.text.contains("plain ascii"));
}

#[test]
fn title_is_trimmed() {
    let html = "<html><head><title>\n   Admin Panel  \n</title></head></html>";
    assert_eq!(HtmlTitleExtractor.title(html).as_deref(), Some("Admin Panel"));
}

#[test]
fn missing_or_blank_title_is_none() {
    assert_eq!(HtmlTitleExtractor.title("<html><body>x</body></html>"), None);
    assert_eq!(HtmlTitleExtractor.title("<title>   </title>"), None);
}

#[test]
fn decode_then_extract_pipeline() {
    let bytes = "<html><head><title>Überblick</title></head></html>".as_bytes();
    let decoded = decode_body(bytes, Some("text/html; charset=utf-8"));
    assert_eq!(
        HtmlTitleExtractor.title(&decoded.text).as_deref(),
        Some("Überblick")
    );
}
