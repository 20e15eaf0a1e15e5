use std::time::Duration;

use crate::{Generation, RenderConfig, RenderResult};

/// How long the "copied" flag stays up after a successful copy.
pub const COPIED_FLASH: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Run the tier chain for `payload`, superseding any render in flight.
    Render {
        generation: Generation,
        payload: String,
        config: RenderConfig,
    },
    /// Drop whatever is displayed and stop any render in flight.
    ClearDisplay,
    /// Save the current rendered image as `filename`.
    SaveImage {
        filename: String,
        result: RenderResult,
    },
    /// Put the payload text on the system clipboard.
    WriteClipboard { text: String },
    /// Send `Msg::CopiedExpired { seq }` after `after`.
    ScheduleCopiedReset { seq: u64, after: Duration },
}
