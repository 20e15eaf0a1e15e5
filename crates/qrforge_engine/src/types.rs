use std::fmt;

use qrforge_core::{Generation, RenderTier, Visual};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// One tier failed and the chain moved on (or gave up).
    TierFailed {
        generation: Generation,
        tier: RenderTier,
        error: TierError,
    },
    /// The chain settled for `generation`. Cancelled runs emit nothing.
    RenderCompleted {
        generation: Generation,
        result: Result<RenderedVisual, ChainError>,
    },
}

/// Output of the first tier that succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedVisual {
    pub tier: RenderTier,
    pub visual: Visual,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierError {
    pub kind: FailureKind,
    pub message: String,
}

impl TierError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for TierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}: {}", self.kind, self.message)
        }
    }
}

impl std::error::Error for TierError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// The local encoder could not be loaded or initialized.
    CapabilityLoad,
    /// The local encoder rejected the payload.
    Encode,
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    UnsupportedContentType { content_type: String },
    /// The remote answered, but the body is not a loadable image.
    Decode,
    Network,
    Cancelled,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::CapabilityLoad => write!(f, "capability load failed"),
            FailureKind::Encode => write!(f, "encode failed"),
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::UnsupportedContentType { content_type } => {
                write!(f, "unsupported content type {content_type}")
            }
            FailureKind::Decode => write!(f, "image failed to load"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Every tier failed; the render is terminally `Failed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainError {
    pub attempts: Vec<(RenderTier, TierError)>,
}

impl ChainError {
    pub fn last_tier(&self) -> Option<RenderTier> {
        self.attempts.last().map(|(tier, _)| *tier)
    }
}

impl fmt::Display for ChainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "all {} render tiers failed", self.attempts.len())?;
        for (tier, error) in &self.attempts {
            write!(f, "; {tier}: {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ChainError {}
