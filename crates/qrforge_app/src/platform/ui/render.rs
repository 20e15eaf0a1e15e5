use std::fmt::Write as _;

use qrforge_core::{AppViewModel, ContactField, InputKind, Phase};

const CONTACT_LABELS: [(ContactField, &str); 6] = [
    (ContactField::FirstName, "first"),
    (ContactField::LastName, "last"),
    (ContactField::Phone, "phone"),
    (ContactField::Email, "email"),
    (ContactField::Organization, "org"),
    (ContactField::Url, "site"),
];

/// Short status line printed after every change.
pub fn status_line(view: &AppViewModel) -> String {
    let mut line = match view.phase {
        Phase::Idle => format!("[{}] idle", view.kind),
        Phase::Computing => format!("[{}] rendering (gen {})", view.kind, view.generation),
        Phase::Rendered => match view.rendered_by {
            Some(tier) => format!("[{}] rendered by {} (gen {})", view.kind, tier, view.generation),
            None => format!("[{}] rendered (gen {})", view.kind, view.generation),
        },
        Phase::Failed => format!("[{}] unable to render (gen {})", view.kind, view.generation),
    };
    if view.copied {
        line.push_str(" | copied!");
    }
    line
}

/// Full state dump for `show`.
pub fn render(view: &AppViewModel) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", status_line(view));
    match view.kind {
        InputKind::Url => {
            let _ = writeln!(out, "  url input: {:?}", view.url_input);
        }
        InputKind::Text => {
            let _ = writeln!(out, "  text input: {:?}", view.text_input);
        }
        InputKind::Contact => {
            for (field, label) in CONTACT_LABELS {
                let _ = writeln!(out, "  {label}: {:?}", view.contact.get(field));
            }
        }
    }
    let _ = writeln!(
        out,
        "  colors: {} on {}, size {}px, level {}",
        view.config.foreground,
        view.config.background,
        view.config.size,
        view.config.error_correction.as_str()
    );
    if view.payload.is_empty() {
        let _ = writeln!(out, "  payload: (empty)");
    } else {
        let _ = writeln!(out, "  payload:");
        for line in view.payload.lines() {
            let _ = writeln!(out, "    {line}");
        }
    }
    for note in &view.tier_notes {
        let _ = writeln!(out, "  {} failed: {}", note.tier, note.reason);
    }
    if let Some(path) = &view.last_download {
        let _ = writeln!(out, "  saved: {path}");
    }
    out
}
