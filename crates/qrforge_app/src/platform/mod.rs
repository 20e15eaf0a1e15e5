mod app;
pub mod clipboard;
mod effects;
pub mod settings;
mod ui;

pub use app::run_app;
pub use settings::Settings;

use qrforge_core::Msg;

/// Everything the main loop reacts to.
#[derive(Debug)]
pub enum AppEvent {
    /// A line from the input stream.
    Line(String),
    /// The input stream ended.
    InputClosed,
    /// A message produced off the main thread.
    Msg(Msg),
}
