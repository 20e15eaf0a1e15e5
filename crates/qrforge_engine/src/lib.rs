//! QrForge engine: the render tier chain and the IO around it.
mod capability;
mod chain;
mod engine;
mod export;
mod fetch;
mod local;
mod remote;
mod types;

pub use capability::{
    Capability, CapabilityStatus, EncoderLoader, QrEncoder, DEFAULT_LOAD_TIMEOUT,
};
pub use chain::{ChainOutcome, ChainSettings, ChainSink, NullSink, RenderStrategy, RenderTierChain};
pub use engine::{EngineHandle, EngineSettings};
pub use export::{encode_png, save_download, ExportError};
pub use fetch::{FetchSettings, FetchedImage, ImageFetcher, ReqwestFetcher};
pub use local::{LocalEncoderTier, QrcodeEncoder, QrcodeLoader};
pub use remote::{
    RemoteApi, RemoteImageTier, DEFAULT_CHART_ENDPOINT, DEFAULT_MARGIN, DEFAULT_QRSERVER_ENDPOINT,
};
pub use types::{ChainError, EngineEvent, FailureKind, RenderedVisual, TierError};
