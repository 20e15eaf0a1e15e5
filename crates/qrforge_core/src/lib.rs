//! QrForge core: input normalization and the pure recompute state machine.
mod effect;
mod input;
mod msg;
mod normalize;
mod render;
mod state;
mod update;
mod view_model;

pub use effect::{Effect, COPIED_FLASH};
pub use input::{ContactField, ContactRecord, InputKind, UnknownInputKind};
pub use msg::Msg;
pub use normalize::{build_contact_card, format_url, select_payload};
pub use render::{
    ErrorCorrection, Generation, InvalidColor, InvalidLevel, RenderConfig, RenderResult,
    RenderTier, Rgb, Visual, DEFAULT_SIZE, MAX_SIZE, MIN_SIZE,
};
pub use state::{AppState, Phase};
pub use update::update;
pub use view_model::{AppViewModel, TierNote};
