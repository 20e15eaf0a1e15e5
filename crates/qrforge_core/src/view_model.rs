use crate::{ContactRecord, Generation, InputKind, Phase, RenderConfig, RenderTier};

/// A tier that failed during the render in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierNote {
    pub tier: RenderTier,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub kind: InputKind,
    pub url_input: String,
    pub text_input: String,
    pub contact: ContactRecord,
    pub config: RenderConfig,
    pub payload: String,
    pub generation: Generation,
    pub phase: Phase,
    pub rendered_by: Option<RenderTier>,
    pub tier_notes: Vec<TierNote>,
    pub copied: bool,
    pub last_download: Option<String>,
}
