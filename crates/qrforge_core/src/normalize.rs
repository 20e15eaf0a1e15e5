use crate::{ContactRecord, InputKind};

/// Trims `raw` and prefixes `https://` unless an http(s) scheme is already
/// present (case-insensitive). Blank input yields an empty payload.
pub fn format_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    if has_http_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

fn has_http_scheme(url: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        url.get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}

/// vCard 3.0 text for `record`. Empty fields still emit their line.
pub fn build_contact_card(record: &ContactRecord) -> String {
    [
        "BEGIN:VCARD".to_string(),
        "VERSION:3.0".to_string(),
        format!("FN:{} {}", record.first_name, record.last_name),
        format!("N:{};{};;;", record.last_name, record.first_name),
        format!("ORG:{}", record.organization),
        format!("TEL:{}", record.phone),
        format!("EMAIL:{}", record.email),
        format!("URL:{}", record.url),
        "END:VCARD".to_string(),
    ]
    .join("\n")
}

/// Canonical payload for the active input kind. The empty string means
/// there is nothing to render.
pub fn select_payload(
    kind: InputKind,
    url_input: &str,
    text_input: &str,
    contact: &ContactRecord,
) -> String {
    match kind {
        InputKind::Url => format_url(url_input),
        InputKind::Text => text_input.to_string(),
        InputKind::Contact if contact.identifies_someone() => build_contact_card(contact),
        InputKind::Contact => String::new(),
    }
}
