use engine_logging::{engine_debug, engine_info, engine_warn};

use crate::{AppState, Effect, Msg, Phase, RenderResult, COPIED_FLASH};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::KindSelected(kind) => {
            state.set_kind(kind);
            recompute(&mut state)
        }
        Msg::UrlChanged(value) => {
            state.set_url_input(value);
            recompute(&mut state)
        }
        Msg::TextChanged(value) => {
            state.set_text_input(value);
            recompute(&mut state)
        }
        Msg::ContactChanged { field, value } => {
            state.set_contact_field(field, value);
            recompute(&mut state)
        }
        Msg::RenderConfigChanged(config) => {
            state.set_config(config.clamped());
            recompute(&mut state)
        }
        Msg::TierFailed {
            generation,
            tier,
            reason,
        } => {
            if generation == state.generation() {
                engine_info!("Tier {} failed for generation {}: {}", tier, generation, reason);
                state.record_tier_failure(tier, reason);
            } else {
                engine_debug!("Ignoring stale tier failure from generation {}", generation);
            }
            Vec::new()
        }
        Msg::RenderFinished { generation, result } => {
            if generation != state.generation() || state.phase() != Phase::Computing {
                engine_debug!(
                    "Discarding stale render result from generation {} (current {})",
                    generation,
                    state.generation()
                );
                return (state, Vec::new());
            }
            if matches!(result, RenderResult::Empty) {
                engine_warn!("Render for generation {} finished without a result", generation);
                state.settle(RenderResult::Failed);
            } else {
                state.settle(result);
            }
            Vec::new()
        }
        Msg::DownloadClicked => {
            if state.result().is_rendered() {
                vec![Effect::SaveImage {
                    filename: state.kind().download_filename(),
                    result: state.result().clone(),
                }]
            } else {
                engine_debug!("Download ignored: no rendered image");
                Vec::new()
            }
        }
        Msg::DownloadSaved { path } => {
            state.set_last_download(path);
            Vec::new()
        }
        Msg::CopyClicked => {
            if state.payload().is_empty() || matches!(state.result(), RenderResult::Empty) {
                engine_debug!("Copy ignored: nothing rendered");
                Vec::new()
            } else {
                vec![Effect::WriteClipboard {
                    text: state.payload().to_string(),
                }]
            }
        }
        Msg::CopySucceeded => {
            let seq = state.mark_copied();
            vec![Effect::ScheduleCopiedReset {
                seq,
                after: COPIED_FLASH,
            }]
        }
        Msg::CopyFailed { reason } => {
            engine_warn!("Copy to clipboard failed: {}", reason);
            Vec::new()
        }
        Msg::CopiedExpired { seq } => {
            state.expire_copied(seq);
            Vec::new()
        }
        Msg::ResetClicked => {
            let generation = state.reset();
            engine_info!("Reset to empty inputs (generation {})", generation);
            vec![Effect::ClearDisplay]
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

/// Starts a new generation for the current inputs and asks for a render,
/// or clears the display when there is nothing to render.
fn recompute(state: &mut AppState) -> Vec<Effect> {
    let generation = state.begin_recompute();
    if state.payload().trim().is_empty() {
        engine_debug!("Generation {}: empty payload, nothing to render", generation);
        state.enter_phase(Phase::Idle);
        return vec![Effect::ClearDisplay];
    }

    state.enter_phase(Phase::Computing);
    engine_debug!(
        "Generation {}: rendering {} byte {} payload",
        generation,
        state.payload().len(),
        state.kind()
    );
    vec![Effect::Render {
        generation,
        payload: state.payload().to_string(),
        config: state.config(),
    }]
}
