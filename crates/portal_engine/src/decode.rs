use chardetng::EncodingDetector;
use encoding_rs::Encoding;

/// How far into the body a `<meta charset>` declaration is looked for.
const META_SNIFF_BYTES: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedBody {
    pub text: String,
    pub encoding_label: String,
    /// Some byte sequences were invalid and became U+FFFD.
    pub had_errors: bool,
}

/// Decode a response body into UTF-8, replacing malformed sequences.
///
/// Order: BOM, then the `Content-Type` charset, then a `<meta charset>` near
/// the top of the document, then chardetng. Unknown labels fall through to
/// the next source.
pub fn decode_body(bytes: &[u8], content_type: Option<&str>) -> DecodedBody {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return decode_with(bytes, encoding);
    }

    let declared = content_type
        .and_then(charset_param)
        .and_then(encoding_for)
        .or_else(|| meta_charset(bytes).and_then(encoding_for));
    if let Some(encoding) = declared {
        return decode_with(bytes, encoding);
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    decode_with(bytes, detector.guess(None, true))
}

fn encoding_for(label: String) -> Option<&'static Encoding> {
    Encoding::for_label(label.as_bytes())
}

fn charset_param(content_type: &str) -> Option<String> {
    content_type.split(';').find_map(|part| {
        let (key, value) = part.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches(['"', '\'']).to_string())
    })
}

fn meta_charset(bytes: &[u8]) -> Option<String> {
    let head = &bytes[..bytes.len().min(META_SNIFF_BYTES)];
    let head = String::from_utf8_lossy(head).to_ascii_lowercase();
    let start = head.find("charset=")? + "charset=".len();
    let label: String = head[start..]
        .trim_start_matches(['"', '\''])
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
        .collect();
    (!label.is_empty()).then_some(label)
}

fn decode_with(bytes: &[u8], encoding: &'static Encoding) -> DecodedBody {
    let (text, _, had_errors) = encoding.decode(bytes);
    DecodedBody {
        text: text.into_owned(),
        encoding_label: encoding.name().to_string(),
        had_errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_charset_is_case_insensitive() {
        assert_eq!(
            charset_param("text/html; Charset=\"ISO-8859-1\"").as_deref(),
            Some("ISO-8859-1")
        );
        assert_eq!(charset_param("text/html"), None);
    }

    #[test]
    fn meta_charset_is_sniffed() {
        let html = br#"<html><head><meta charset="windows-1252"></head>"#;
        assert_eq!(meta_charset(html).as_deref(), Some("windows-1252"));
    }

    #[test]
    fn unknown_header_label_falls_back_to_meta() {
        let html = b"<html><head><meta charset=\"windows-1252\"></head>caf\xe9</html>";
        let body = decode_body(html, Some("text/html; charset=x-bogus"));
        assert_eq!(body.encoding_label, "windows-1252");
        assert!(body.text.contains("caf\u{e9}"));
        assert!(!body.had_errors);
    }

    #[test]
    fn malformed_bytes_are_replaced() {
        let body = decode_body(b"caf\xe9 ok", Some("text/html; charset=utf-8"));
        assert_eq!(body.encoding_label, "UTF-8");
        assert_eq!(body.text, "caf\u{fffd} ok");
        assert!(body.had_errors);
    }
}
