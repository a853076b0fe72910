// src/extract/decode.rs
//! Page bytes → text. A BOM wins, then a `<meta>` charset near the top of the
//! document, then UTF-8. Undecodable bytes become U+FFFD.

use encoding_rs::{Encoding, UTF_8};
use tracing::{debug, warn};

/// Leading bytes searched for a `<meta>` charset declaration.
const PRESCAN_BYTES: usize = 1024;

pub fn decode_body(body: &[u8]) -> String {
    let declared = sniff_meta_charset(body).unwrap_or(UTF_8);
    let (text, used, had_errors) = declared.decode(body);
    if had_errors {
        warn!(encoding = used.name(), "page had undecodable bytes, replaced");
    } else {
        debug!(encoding = used.name(), "decoded page body");
    }
    text.into_owned()
}

/// Encoding named by the first `<meta charset>` or `<meta content="...; charset=">`.
pub fn sniff_meta_charset(body: &[u8]) -> Option<&'static Encoding> {
    let head = &body[..body.len().min(PRESCAN_BYTES)];
    let head = String::from_utf8_lossy(head).to_ascii_lowercase();

    let mut rest = head.as_str();
    while let Some(start) = rest.find("<meta") {
        let tag = &rest[start..];
        let end = tag.find('>').unwrap_or(tag.len());
        let declared = charset_label(&tag[..end]).and_then(|l| Encoding::for_label(l.as_bytes()));
        if let Some(enc) = declared {
            // a UTF-16 declaration in ASCII-compatible markup means UTF-8
            return Some(enc.output_encoding());
        }
        rest = &tag[end..];
    }
    None
}

fn charset_label(tag: &str) -> Option<&str> {
    let at = tag.find("charset")? + "charset".len();
    let value = tag[at..].trim_start().strip_prefix('=')?.trim_start();
    let value = value.trim_start_matches(|c| c == '"' || c == '\'');
    let end = value
        .find(|c: char| matches!(c, '"' | '\'' | ';' | '/' | '>') || c.is_whitespace())
        .unwrap_or(value.len());
    let label = &value[..end];
    (!label.is_empty()).then_some(label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::WINDOWS_1252;

    #[test]
    fn test_meta_charset_forms() {
        assert_eq!(
            sniff_meta_charset(b"<html><head><meta charset=\"windows-1252\"></head>"),
            Some(WINDOWS_1252)
        );
        assert_eq!(
            sniff_meta_charset(
                b"<META http-equiv=\"Content-Type\" content=\"text/html; charset=ISO-8859-1\">"
            ),
            Some(WINDOWS_1252)
        );
        assert_eq!(sniff_meta_charset(b"<meta charset=utf-16>"), Some(UTF_8));
        assert_eq!(sniff_meta_charset(b"<meta name=\"viewport\"><p>charset=koi8-r</p>"), None);
        assert_eq!(sniff_meta_charset(b"<meta charset=\"no-such-thing\">"), None);
    }

    #[test]
    fn test_decodes_declared_single_byte_charset() {
        let body = b"<meta charset=\"windows-1252\"><p>Gi\xe1</p>";
        assert_eq!(decode_body(body), "<meta charset=\"windows-1252\"><p>Giá</p>");
    }

    #[test]
    fn test_undeclared_invalid_utf8_is_replaced() {
        assert_eq!(decode_body(&[b'<', 0xff, 0xfe, b'>']), "<\u{fffd}\u{fffd}>");
    }

    #[test]
    fn test_bom_overrides_meta() {
        let mut body = vec![0xef, 0xbb, 0xbf];
        body.extend_from_slice("<meta charset=\"windows-1252\">Dầu".as_bytes());
        assert_eq!(decode_body(&body), "<meta charset=\"windows-1252\">Dầu");
    }
}
