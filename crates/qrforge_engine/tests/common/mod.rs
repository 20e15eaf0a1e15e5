#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use qrforge_core::{RenderConfig, RenderTier, Visual};
use qrforge_engine::{
    encode_png, EncoderLoader, FailureKind, QrEncoder, RenderStrategy, TierError,
};
use tokio::sync::Notify;

pub fn init_logging() {
    engine_logging::initialize_for_tests();
}

/// Records which tiers were attempted, in order.
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<RenderTier>>>);

impl CallLog {
    pub fn push(&self, tier: RenderTier) {
        self.0.lock().unwrap().push(tier);
    }

    pub fn calls(&self) -> Vec<RenderTier> {
        self.0.lock().unwrap().clone()
    }
}

pub enum Behaviour {
    Succeed,
    Fail(FailureKind),
    /// Waits for the notify before succeeding.
    Gate(Arc<Notify>),
    Hang,
}

pub struct FakeTier {
    tier: RenderTier,
    behaviour: Behaviour,
    log: CallLog,
}

impl FakeTier {
    pub fn arc(tier: RenderTier, behaviour: Behaviour, log: &CallLog) -> Arc<dyn RenderStrategy> {
        Arc::new(Self {
            tier,
            behaviour,
            log: log.clone(),
        })
    }
}

pub fn marker_visual(tier: RenderTier, payload: &str) -> Visual {
    Visual::Fetched {
        source_url: format!("fake://{tier}"),
        bytes: payload.as_bytes().to_vec(),
    }
}

#[async_trait::async_trait]
impl RenderStrategy for FakeTier {
    fn tier(&self) -> RenderTier {
        self.tier
    }

    async fn render(&self, payload: &str, _config: &RenderConfig) -> Result<Visual, TierError> {
        self.log.push(self.tier);
        match &self.behaviour {
            Behaviour::Succeed => Ok(marker_visual(self.tier, payload)),
            Behaviour::Fail(kind) => Err(TierError::new(kind.clone(), "fake failure")),
            Behaviour::Gate(notify) => {
                notify.notified().await;
                Ok(marker_visual(self.tier, payload))
            }
            Behaviour::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(marker_visual(self.tier, payload))
            }
        }
    }
}

/// Loader that always fails, counting how often it was asked.
#[derive(Clone, Default)]
pub struct BrokenLoader {
    pub loads: Arc<Mutex<u32>>,
}

#[async_trait::async_trait]
impl EncoderLoader for BrokenLoader {
    async fn load(&self) -> Result<Arc<dyn QrEncoder>, TierError> {
        *self.loads.lock().unwrap() += 1;
        tokio::task::yield_now().await;
        Err(TierError::new(FailureKind::Network, "script blocked"))
    }
}

/// A real PNG to serve from mock endpoints.
pub fn sample_png() -> Vec<u8> {
    let visual = Visual::Surface {
        width: 4,
        height: 4,
        pixels: vec![255; 4 * 4 * 3],
    };
    encode_png(&visual).expect("encode sample png")
}
