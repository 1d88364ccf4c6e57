use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use shipsfrom_logging::filter_debug;

/// Decode a fetched page to UTF-8 using: Content-Type charset -> BOM -> chardetng guess.
///
/// Malformed sequences become U+FFFD; a stray byte must not cost a whole page of rows.
pub fn decode_page(bytes: &[u8], content_type: Option<&str>) -> String {
    let declared = content_type
        .and_then(charset_label)
        .and_then(|label| Encoding::for_label(label.as_bytes()));
    let encoding = declared.unwrap_or_else(|| sniff(bytes));

    // `decode` still honours a BOM over the declared charset, as browsers do.
    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        filter_debug!("replaced malformed {} sequences in fetched page", used.name());
    }
    text.into_owned()
}

fn sniff(bytes: &[u8]) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return encoding;
    }
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    detector.guess(None, true)
}

fn charset_label(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches(['"', '\'']))
    })
}
