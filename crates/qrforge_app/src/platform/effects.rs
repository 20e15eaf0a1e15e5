use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;

use engine_logging::{engine_debug, engine_error, engine_info, engine_warn};
use qrforge_core::{Effect, Msg, RenderResult};
use qrforge_engine::{save_download, EngineEvent, EngineHandle};

use super::clipboard::ClipboardWriter;
use super::AppEvent;

pub struct EffectRunner {
    engine: EngineHandle,
    output_dir: PathBuf,
    clipboard: Arc<dyn ClipboardWriter>,
    event_tx: mpsc::Sender<AppEvent>,
}

impl EffectRunner {
    pub fn new(
        engine: EngineHandle,
        output_dir: PathBuf,
        clipboard: Arc<dyn ClipboardWriter>,
        event_tx: mpsc::Sender<AppEvent>,
    ) -> Self {
        Self {
            engine,
            output_dir,
            clipboard,
            event_tx,
        }
    }

    /// Carries out `effects`. Messages that follow synchronously are returned
    /// for immediate dispatch; the rest arrive later as [`AppEvent::Msg`].
    pub fn run(&self, effects: Vec<Effect>) -> Vec<Msg> {
        let mut follow_up = Vec::new();
        for effect in effects {
            match effect {
                Effect::Render {
                    generation,
                    payload,
                    config,
                } => {
                    engine_debug!(
                        "Render generation={} payload_len={} size={}",
                        generation,
                        payload.len(),
                        config.size
                    );
                    self.engine.render(generation, payload, config);
                }
                Effect::ClearDisplay => self.engine.cancel(),
                Effect::SaveImage { filename, result } => {
                    if let Some(msg) = self.save_image(&filename, &result) {
                        follow_up.push(msg);
                    }
                }
                Effect::WriteClipboard { text } => self.write_clipboard(text),
                Effect::ScheduleCopiedReset { seq, after } => {
                    let tx = self.event_tx.clone();
                    thread::spawn(move || {
                        thread::sleep(after);
                        let _ = tx.send(AppEvent::Msg(Msg::CopiedExpired { seq }));
                    });
                }
            }
        }
        follow_up
    }

    /// Engine events received so far, as messages.
    pub fn drain_engine(&self) -> Vec<Msg> {
        let mut msgs = Vec::new();
        while let Some(event) = self.engine.try_recv() {
            msgs.push(map_engine_event(event));
        }
        msgs
    }

    fn save_image(&self, filename: &str, result: &RenderResult) -> Option<Msg> {
        match save_download(&self.output_dir, filename, result) {
            Ok(path) => {
                engine_info!("Saved {}", path.display());
                Some(Msg::DownloadSaved {
                    path: path.display().to_string(),
                })
            }
            Err(err) => {
                engine_error!("Download of {} failed: {}", filename, err);
                None
            }
        }
    }

    fn write_clipboard(&self, text: String) {
        let clipboard = self.clipboard.clone();
        let tx = self.event_tx.clone();
        thread::spawn(move || {
            let msg = match clipboard.write_text(&text) {
                Ok(()) => Msg::CopySucceeded,
                Err(err) => Msg::CopyFailed {
                    reason: err.to_string(),
                },
            };
            let _ = tx.send(AppEvent::Msg(msg));
        });
    }
}

pub fn map_engine_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::TierFailed {
            generation,
            tier,
            error,
        } => Msg::TierFailed {
            generation,
            tier,
            reason: error.to_string(),
        },
        EngineEvent::RenderCompleted { generation, result } => {
            let result = match result {
                Ok(rendered) => RenderResult::Rendered {
                    visual: rendered.visual,
                    tier: rendered.tier,
                },
                Err(err) => {
                    engine_warn!("Generation {} not rendered: {}", generation, err);
                    RenderResult::Failed
                }
            };
            Msg::RenderFinished { generation, result }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qrforge_core::{RenderTier, Visual};
    use qrforge_engine::{ChainError, FailureKind, RenderedVisual, TierError};

    #[test]
    fn tier_failure_carries_readable_reason() {
        let msg = map_engine_event(EngineEvent::TierFailed {
            generation: 3,
            tier: RenderTier::Primary,
            error: TierError::new(FailureKind::CapabilityLoad, "no encoder"),
        });
        match msg {
            Msg::TierFailed {
                generation,
                tier,
                reason,
            } => {
                assert_eq!(generation, 3);
                assert_eq!(tier, RenderTier::Primary);
                assert!(reason.contains("no encoder"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn completion_maps_to_render_result() {
        let visual = Visual::Fetched {
            source_url: "http://qr/x".to_string(),
            bytes: vec![1, 2, 3],
        };
        let ok = map_engine_event(EngineEvent::RenderCompleted {
            generation: 1,
            result: Ok(RenderedVisual {
                tier: RenderTier::FallbackB,
                visual: visual.clone(),
            }),
        });
        assert_eq!(
            ok,
            Msg::RenderFinished {
                generation: 1,
                result: RenderResult::Rendered {
                    visual,
                    tier: RenderTier::FallbackB,
                },
            }
        );

        let failed = map_engine_event(EngineEvent::RenderCompleted {
            generation: 2,
            result: Err(ChainError { attempts: vec![] }),
        });
        assert_eq!(
            failed,
            Msg::RenderFinished {
                generation: 2,
                result: RenderResult::Failed,
            }
        );
    }
}
