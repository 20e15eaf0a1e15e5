use std::sync::Once;

use pretty_assertions::assert_eq;
use qrforge_core::{
    update, AppState, ContactField, Effect, InputKind, Msg, Phase, RenderConfig, RenderResult,
    RenderTier, Rgb, Visual,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

fn surface() -> Visual {
    Visual::Surface {
        width: 2,
        height: 2,
        pixels: vec![0; 12],
    }
}

fn rendered(tier: RenderTier) -> RenderResult {
    RenderResult::Rendered {
        visual: surface(),
        tier,
    }
}

fn render_generation(effects: &[Effect]) -> u64 {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::Render { generation, .. } => Some(*generation),
            _ => None,
        })
        .expect("render effect")
}

#[test]
fn noop_changes_nothing() {
    let state = AppState::new();
    let (next, effects) = update(state.clone(), Msg::NoOp);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}

#[test]
fn url_edit_requests_render_with_formatted_payload() {
    init_logging();
    let (mut state, effects) = update(AppState::new(), Msg::UrlChanged("example.com".into()));

    assert_eq!(
        effects,
        vec![Effect::Render {
            generation: 1,
            payload: "https://example.com".to_string(),
            config: RenderConfig::default(),
        }]
    );
    assert_eq!(state.phase(), Phase::Computing);
    assert_eq!(state.payload(), "https://example.com");
    assert!(state.consume_dirty());
    assert!(!state.consume_dirty());
}

#[test]
fn every_edit_issues_a_new_generation() {
    init_logging();
    let (state, first) = update(AppState::new(), Msg::UrlChanged("a.com".into()));
    let (state, second) = update(state, Msg::UrlChanged("ab.com".into()));
    let (state, third) = update(state, Msg::KindSelected(InputKind::Text));

    assert_eq!(render_generation(&first), 1);
    assert_eq!(render_generation(&second), 2);
    assert_eq!(third, vec![Effect::ClearDisplay]);
    assert_eq!(state.generation(), 3);
    assert_eq!(state.phase(), Phase::Idle);
}

#[test]
fn empty_payload_clears_display_and_goes_idle() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::UrlChanged("example.com".into()));
    let (state, effects) = update(state, Msg::UrlChanged("   ".into()));

    assert_eq!(effects, vec![Effect::ClearDisplay]);
    assert_eq!(state.phase(), Phase::Idle);
    assert_eq!(state.payload(), "");
    assert_eq!(state.result(), &RenderResult::Empty);
}

#[test]
fn whitespace_text_is_kept_but_not_rendered() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::KindSelected(InputKind::Text));
    let (state, effects) = update(state, Msg::TextChanged("  ".into()));

    assert_eq!(effects, vec![Effect::ClearDisplay]);
    assert_eq!(state.payload(), "  ");
    assert_eq!(state.phase(), Phase::Idle);
}

#[test]
fn contact_with_only_org_and_url_does_not_render() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::KindSelected(InputKind::Contact));
    let (state, first) = update(
        state,
        Msg::ContactChanged {
            field: ContactField::Organization,
            value: "Org".into(),
        },
    );
    let (state, second) = update(
        state,
        Msg::ContactChanged {
            field: ContactField::Url,
            value: "org.example".into(),
        },
    );

    assert_eq!(first, vec![Effect::ClearDisplay]);
    assert_eq!(second, vec![Effect::ClearDisplay]);
    assert_eq!(state.payload(), "");

    let (state, effects) = update(
        state,
        Msg::ContactChanged {
            field: ContactField::Email,
            value: "a@b.com".into(),
        },
    );
    assert_eq!(render_generation(&effects), state.generation());
    assert!(state.payload().contains("ORG:Org"));
    assert!(state.payload().contains("EMAIL:a@b.com"));
}

#[test]
fn matching_result_settles_rendered() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::UrlChanged("example.com".into()));
    let generation = render_generation(&effects);

    let (state, effects) = update(
        state,
        Msg::RenderFinished {
            generation,
            result: rendered(RenderTier::FallbackA),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state.phase(), Phase::Rendered);
    assert_eq!(state.view().rendered_by, Some(RenderTier::FallbackA));
}

#[test]
fn failed_chain_settles_failed() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::UrlChanged("example.com".into()));
    let generation = render_generation(&effects);

    let (state, _) = update(
        state,
        Msg::RenderFinished {
            generation,
            result: RenderResult::Failed,
        },
    );

    assert_eq!(state.phase(), Phase::Failed);
    assert_eq!(state.result(), &RenderResult::Failed);
    assert_eq!(state.view().rendered_by, None);
}

#[test]
fn stale_result_never_reaches_display() {
    init_logging();
    let (state, first) = update(AppState::new(), Msg::UrlChanged("slow.example".into()));
    let (state, second) = update(state, Msg::UrlChanged("fast.example".into()));
    let old = render_generation(&first);
    let new = render_generation(&second);

    // Newer render lands first, then the older one arrives late.
    let (state, _) = update(
        state,
        Msg::RenderFinished {
            generation: new,
            result: rendered(RenderTier::Primary),
        },
    );
    let (mut state, effects) = update(
        state,
        Msg::RenderFinished {
            generation: old,
            result: rendered(RenderTier::FallbackB),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state.phase(), Phase::Rendered);
    assert_eq!(state.view().rendered_by, Some(RenderTier::Primary));
    assert_eq!(state.payload(), "https://fast.example");
    state.consume_dirty();

    // Old result arriving while the newer one is still computing is dropped too.
    let (state, third) = update(state, Msg::UrlChanged("third.example".into()));
    let (state, _) = update(
        state,
        Msg::RenderFinished {
            generation: new,
            result: rendered(RenderTier::Primary),
        },
    );
    assert_eq!(state.phase(), Phase::Computing);
    assert_eq!(state.result(), &RenderResult::Empty);
    assert_eq!(render_generation(&third), state.generation());
}

#[test]
fn tier_failures_are_tracked_for_current_generation_only() {
    init_logging();
    let (state, first) = update(AppState::new(), Msg::UrlChanged("a.example".into()));
    let (state, second) = update(state, Msg::UrlChanged("b.example".into()));

    let (state, _) = update(
        state,
        Msg::TierFailed {
            generation: render_generation(&first),
            tier: RenderTier::Primary,
            reason: "stale".into(),
        },
    );
    let (state, _) = update(
        state,
        Msg::TierFailed {
            generation: render_generation(&second),
            tier: RenderTier::Primary,
            reason: "capability load failed".into(),
        },
    );

    let notes = state.view().tier_notes;
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].tier, RenderTier::Primary);
    assert_eq!(notes[0].reason, "capability load failed");

    let (state, _) = update(state, Msg::UrlChanged("c.example".into()));
    assert!(state.view().tier_notes.is_empty());
}

#[test]
fn config_change_rerenders_with_new_config() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::UrlChanged("example.com".into()));
    let config = RenderConfig {
        foreground: Rgb([0x11, 0x22, 0x33]),
        size: 10,
        ..RenderConfig::default()
    };

    let (state, effects) = update(state, Msg::RenderConfigChanged(config));

    let expected = RenderConfig {
        size: qrforge_core::MIN_SIZE,
        ..config
    };
    assert_eq!(state.config(), expected);
    assert_eq!(
        effects,
        vec![Effect::Render {
            generation: 2,
            payload: "https://example.com".to_string(),
            config: expected,
        }]
    );
}

#[test]
fn config_change_without_payload_stays_idle() {
    init_logging();
    let (state, effects) = update(
        AppState::new(),
        Msg::RenderConfigChanged(RenderConfig::default()),
    );
    assert_eq!(effects, vec![Effect::ClearDisplay]);
    assert_eq!(state.phase(), Phase::Idle);
}

#[test]
fn stale_replies_do_not_request_a_redraw() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::UrlChanged("a.com".into()));
    let (mut state, _) = update(state, Msg::UrlChanged("b.com".into()));
    assert!(state.consume_dirty());

    let (state, _) = update(
        state,
        Msg::TierFailed {
            generation: 1,
            tier: RenderTier::Primary,
            reason: "late".into(),
        },
    );
    let (mut state, _) = update(
        state,
        Msg::RenderFinished {
            generation: 1,
            result: rendered(RenderTier::Primary),
        },
    );

    assert!(!state.consume_dirty());
    assert!(state.view().tier_notes.is_empty());
    assert_eq!(state.phase(), Phase::Computing);
}
