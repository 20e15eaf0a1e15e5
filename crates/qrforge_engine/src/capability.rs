use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use engine_logging::{engine_info, engine_warn};
use qrforge_core::{RenderConfig, Visual};
use tokio::sync::{Notify, OnceCell};

use crate::{FailureKind, TierError};

/// Upper bound for loading the local encoder.
pub const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_secs(5);

/// A loaded local encoder that draws a surface for a payload.
pub trait QrEncoder: Send + Sync {
    fn encode(&self, payload: &str, config: &RenderConfig) -> Result<Visual, TierError>;
}

/// Acquires the local encoder on first use. Loading may fail.
#[async_trait::async_trait]
pub trait EncoderLoader: Send + Sync {
    async fn load(&self) -> Result<Arc<dyn QrEncoder>, TierError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CapabilityStatus {
    #[default]
    Unloaded,
    Loading,
    Ready,
    LoadFailed,
}

type LoadOutcome = Result<Arc<dyn QrEncoder>, TierError>;

struct LoadState {
    loader: Arc<dyn EncoderLoader>,
    timeout: Duration,
    status: Mutex<CapabilityStatus>,
    outcome: OnceCell<LoadOutcome>,
    settled: Notify,
}

impl LoadState {
    fn set_status(&self, status: CapabilityStatus) {
        *self.status.lock().unwrap_or_else(PoisonError::into_inner) = status;
    }

    async fn run(self: Arc<Self>) {
        self.set_status(CapabilityStatus::Loading);
        let outcome = match tokio::time::timeout(self.timeout, self.loader.load()).await {
            Ok(Ok(encoder)) => Ok(encoder),
            Ok(Err(err)) if err.kind == FailureKind::CapabilityLoad => Err(err),
            Ok(Err(err)) => Err(TierError::new(FailureKind::CapabilityLoad, err.to_string())),
            Err(_elapsed) => Err(TierError::new(
                FailureKind::CapabilityLoad,
                format!("encoder did not load within {:?}", self.timeout),
            )),
        };
        match &outcome {
            Ok(_) => {
                engine_info!("Local encoder ready");
                self.set_status(CapabilityStatus::Ready);
            }
            Err(err) => {
                engine_warn!("Local encoder failed to load: {}", err);
                self.set_status(CapabilityStatus::LoadFailed);
            }
        }
        let _ = self.outcome.set(outcome);
        self.settled.notify_waiters();
    }
}

/// The local encoder, loaded at most once and shared by every render.
///
/// The load runs as its own task, so a render that gives up on it (timeout,
/// cancellation) does not abort it; later renders wait on the same load. A
/// failed load stays failed.
pub struct Capability {
    state: Arc<LoadState>,
    started: AtomicBool,
}

impl Capability {
    pub fn new(loader: Arc<dyn EncoderLoader>) -> Self {
        Self::with_load_timeout(loader, DEFAULT_LOAD_TIMEOUT)
    }

    pub fn with_load_timeout(loader: Arc<dyn EncoderLoader>, timeout: Duration) -> Self {
        Self {
            state: Arc::new(LoadState {
                loader,
                timeout,
                status: Mutex::new(CapabilityStatus::Unloaded),
                outcome: OnceCell::new(),
                settled: Notify::new(),
            }),
            started: AtomicBool::new(false),
        }
    }

    pub fn status(&self) -> CapabilityStatus {
        *self.state.status.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub async fn acquire(&self) -> LoadOutcome {
        if let Some(outcome) = self.state.outcome.get() {
            return outcome.clone();
        }

        let mut settled = std::pin::pin!(self.state.settled.notified());
        settled.as_mut().enable();

        if !self.started.swap(true, Ordering::SeqCst) {
            tokio::spawn(self.state.clone().run());
        }
        if let Some(outcome) = self.state.outcome.get() {
            return outcome.clone();
        }

        settled.await;
        match self.state.outcome.get() {
            Some(outcome) => outcome.clone(),
            None => Err(TierError::new(
                FailureKind::CapabilityLoad,
                "encoder load ended without an outcome",
            )),
        }
    }
}
