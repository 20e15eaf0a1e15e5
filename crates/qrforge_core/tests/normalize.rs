use pretty_assertions::assert_eq;
use proptest::prelude::*;
use qrforge_core::{build_contact_card, format_url, select_payload, ContactRecord, InputKind};

fn ada() -> ContactRecord {
    ContactRecord {
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        phone: "555".to_string(),
        email: "a@b.com".to_string(),
        ..ContactRecord::default()
    }
}

#[test]
fn format_url_adds_https_when_scheme_missing() {
    assert_eq!(format_url("example.com"), "https://example.com");
    assert_eq!(format_url("  example.com/path?q=1  "), "https://example.com/path?q=1");
}

#[test]
fn format_url_keeps_existing_http_schemes() {
    assert_eq!(format_url("http://a.com"), "http://a.com");
    assert_eq!(format_url("https://a.com"), "https://a.com");
    assert_eq!(format_url("HTTPS://A.COM"), "HTTPS://A.COM");
    assert_eq!(format_url("Http://mixed.case"), "Http://mixed.case");
}

#[test]
fn format_url_blank_is_empty() {
    assert_eq!(format_url(""), "");
    assert_eq!(format_url("   \t\n"), "");
}

#[test]
fn other_schemes_are_treated_as_hosts() {
    assert_eq!(format_url("ftp://files.example"), "https://ftp://files.example");
}

proptest! {
    #[test]
    fn format_url_is_idempotent(raw in ".*") {
        let once = format_url(&raw);
        prop_assert_eq!(format_url(&once), once);
    }

    #[test]
    fn format_url_output_is_blank_or_http(raw in "[ a-zA-Z0-9:/._-]{0,40}") {
        let formatted = format_url(&raw);
        let lower = formatted.to_ascii_lowercase();
        prop_assert!(
            formatted.is_empty() || lower.starts_with("http://") || lower.starts_with("https://")
        );
    }
}

#[test]
fn vcard_has_fixed_line_order() {
    let record = ContactRecord {
        organization: "Analytical Engines".to_string(),
        url: "https://ada.example".to_string(),
        ..ada()
    };

    let card = build_contact_card(&record);

    assert_eq!(
        card.lines().collect::<Vec<_>>(),
        vec![
            "BEGIN:VCARD",
            "VERSION:3.0",
            "FN:Ada Lovelace",
            "N:Lovelace;Ada;;;",
            "ORG:Analytical Engines",
            "TEL:555",
            "EMAIL:a@b.com",
            "URL:https://ada.example",
            "END:VCARD",
        ]
    );
}

#[test]
fn vcard_emits_empty_lines_for_missing_fields() {
    let card = build_contact_card(&ada());
    assert!(card.contains("\nORG:\n"));
    assert!(card.contains("\nURL:\n"));
    assert!(!card.ends_with('\n'));
}

#[test]
fn contact_without_identity_yields_no_payload() {
    let record = ContactRecord {
        organization: "Org".to_string(),
        url: "org.example".to_string(),
        ..ContactRecord::default()
    };
    assert_eq!(select_payload(InputKind::Contact, "", "", &record), "");
}

#[test]
fn any_identity_field_enables_the_card() {
    let phone_only = ContactRecord {
        phone: "123".to_string(),
        ..ContactRecord::default()
    };
    let payload = select_payload(InputKind::Contact, "", "", &phone_only);
    assert!(payload.starts_with("BEGIN:VCARD"));
    assert!(payload.contains("FN: \n"));
}

#[test]
fn select_payload_uses_only_the_active_kind() {
    let record = ada();
    assert_eq!(
        select_payload(InputKind::Url, "example.com", "hello", &record),
        "https://example.com"
    );
    assert_eq!(
        select_payload(InputKind::Text, "example.com", "  hello  ", &record),
        "  hello  "
    );
    assert_eq!(
        select_payload(InputKind::Contact, "example.com", "hello", &record),
        build_contact_card(&record)
    );
}
