use chardetng::EncodingDetector;
use encoding_rs::Encoding;

/// How far into the document a `<meta charset>` declaration is looked for.
const META_SNIFF_LIMIT: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedHtml {
    pub html: String,
    pub encoding_label: String,
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("failed to decode bytes with {encoding}: {message}")]
    DecodeFailure { encoding: String, message: String },
}

/// Decode raw page bytes into UTF-8.
///
/// Order of precedence: BOM, Content-Type charset, `<meta>` charset in the
/// first kilobyte, then `chardetng` detection.
pub fn decode_html(bytes: &[u8], content_type: Option<&str>) -> Result<DecodedHtml, DecodeError> {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return decode_with(bytes, encoding);
    }

    if let Some(label) = content_type.and_then(extract_charset) {
        if let Some(enc) = Encoding::for_label(label.as_bytes()) {
            return decode_with(bytes, enc);
        }
    }

    if let Some(enc) = sniff_meta_charset(bytes) {
        return decode_with(bytes, enc);
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let enc = detector.guess(None, true);
    decode_with(bytes, enc)
}

fn extract_charset(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .filter_map(|part| {
            let (key, value) = part.split_once('=')?;
            if !key.trim().eq_ignore_ascii_case("charset") {
                return None;
            }
            Some(value.trim().trim_matches(['"', '\'']).to_string())
        })
        .find(|label| !label.is_empty())
}

/// Finds `charset=` in the head, covering both `<meta charset="x">` and the
/// `http-equiv` Content-Type form.
fn sniff_meta_charset(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = &bytes[..bytes.len().min(META_SNIFF_LIMIT)];
    let head = String::from_utf8_lossy(head).to_ascii_lowercase();
    let mut rest = head.as_str();
    while let Some(meta_at) = rest.find("<meta") {
        let tag = &rest[meta_at..];
        let tag = &tag[..tag.find('>').unwrap_or(tag.len())];
        if let Some(pos) = tag.find("charset=") {
            let value = tag[pos + "charset=".len()..].trim_start_matches(['"', '\'', ' ']);
            let end = value
                .find(|c: char| c == '"' || c == '\'' || c == ';' || c == '/' || c.is_whitespace())
                .unwrap_or(value.len());
            if let Some(enc) = Encoding::for_label(value[..end].as_bytes()) {
                return Some(enc);
            }
        }
        rest = &rest[meta_at + "<meta".len()..];
    }
    None
}

fn decode_with(bytes: &[u8], enc: &'static Encoding) -> Result<DecodedHtml, DecodeError> {
    let (text, actual, had_errors) = enc.decode(bytes);
    if had_errors {
        return Err(DecodeError::DecodeFailure {
            encoding: actual.name().to_string(),
            message: "malformed byte sequence".into(),
        });
    }
    Ok(DecodedHtml {
        html: text.into_owned(),
        encoding_label: actual.name().to_string(),
    })
}
