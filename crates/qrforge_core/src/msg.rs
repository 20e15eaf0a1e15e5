use crate::{ContactField, Generation, InputKind, RenderConfig, RenderResult, RenderTier};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User switched the active input form.
    KindSelected(InputKind),
    /// User edited the URL field.
    UrlChanged(String),
    /// User edited the free-text field.
    TextChanged(String),
    /// User edited one contact field.
    ContactChanged { field: ContactField, value: String },
    /// User changed colours, size or error-correction level.
    RenderConfigChanged(RenderConfig),
    /// Engine gave up on one tier and moved on to the next.
    TierFailed {
        generation: Generation,
        tier: RenderTier,
        reason: String,
    },
    /// Engine finished the tier chain for a generation.
    RenderFinished {
        generation: Generation,
        result: RenderResult,
    },
    /// User clicked Download.
    DownloadClicked,
    /// Platform wrote the downloaded image.
    DownloadSaved { path: String },
    /// User clicked Copy.
    CopyClicked,
    /// Platform confirmed the clipboard write.
    CopySucceeded,
    /// Platform could not write the clipboard.
    CopyFailed { reason: String },
    /// The "copied" feedback window elapsed.
    CopiedExpired { seq: u64 },
    /// User clicked Reset.
    ResetClicked,
    /// Fallback for placeholder wiring.
    NoOp,
}
