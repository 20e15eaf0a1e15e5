use std::sync::Arc;
use std::time::Duration;

use engine_logging::{engine_debug, engine_info, engine_warn};
use qrforge_core::{Generation, RenderConfig, RenderTier, Visual};
use tokio_util::sync::CancellationToken;

use crate::{ChainError, FailureKind, RenderedVisual, TierError};

/// One rendering backend. Every tier has the same contract so the chain can
/// treat them uniformly.
#[async_trait::async_trait]
pub trait RenderStrategy: Send + Sync {
    fn tier(&self) -> RenderTier;

    async fn render(&self, payload: &str, config: &RenderConfig) -> Result<Visual, TierError>;

    /// Failure reported when an attempt outlives the tier timeout.
    fn timed_out(&self, after: Duration) -> TierError {
        TierError::new(FailureKind::Timeout, format!("no answer within {after:?}"))
    }
}

/// Receives per-tier failures while the chain is still running.
pub trait ChainSink: Send + Sync {
    fn tier_failed(&self, generation: Generation, tier: RenderTier, error: &TierError);
}

/// Sink that drops everything.
pub struct NullSink;

impl ChainSink for NullSink {
    fn tier_failed(&self, _generation: Generation, _tier: RenderTier, _error: &TierError) {}
}

#[derive(Debug, Clone)]
pub struct ChainSettings {
    /// Upper bound for one tier attempt, load and fetch included.
    pub tier_timeout: Duration,
}

impl Default for ChainSettings {
    fn default() -> Self {
        Self {
            tier_timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainOutcome {
    Rendered(RenderedVisual),
    /// Every tier failed. Terminal for this generation.
    Failed(ChainError),
    /// A newer request superseded this one.
    Cancelled,
}

/// Ordered rendering strategies, tried in sequence until one succeeds.
#[derive(Clone)]
pub struct RenderTierChain {
    tiers: Vec<Arc<dyn RenderStrategy>>,
    settings: ChainSettings,
}

impl RenderTierChain {
    pub fn new(tiers: Vec<Arc<dyn RenderStrategy>>, settings: ChainSettings) -> Self {
        Self { tiers, settings }
    }

    pub fn tiers(&self) -> Vec<RenderTier> {
        self.tiers.iter().map(|strategy| strategy.tier()).collect()
    }

    /// Tries each tier in order until one renders, every tier has failed,
    /// or `cancel` fires.
    pub async fn run(
        &self,
        generation: Generation,
        payload: &str,
        config: &RenderConfig,
        sink: &dyn ChainSink,
        cancel: &CancellationToken,
    ) -> ChainOutcome {
        let mut attempts = Vec::with_capacity(self.tiers.len());

        for strategy in &self.tiers {
            let tier = strategy.tier();
            if cancel.is_cancelled() {
                engine_debug!("Generation {} cancelled before tier {}", generation, tier);
                return ChainOutcome::Cancelled;
            }

            engine_debug!("Generation {}: trying tier {}", generation, tier);
            let attempt = tokio::time::timeout(
                self.settings.tier_timeout,
                strategy.render(payload, config),
            );
            let outcome = match cancel.run_until_cancelled(attempt).await {
                None => {
                    engine_debug!("Generation {} cancelled during tier {}", generation, tier);
                    return ChainOutcome::Cancelled;
                }
                Some(Ok(result)) => result,
                Some(Err(_elapsed)) => Err(strategy.timed_out(self.settings.tier_timeout)),
            };

            match outcome {
                Ok(visual) => {
                    engine_info!("Generation {} rendered by tier {}", generation, tier);
                    return ChainOutcome::Rendered(RenderedVisual { tier, visual });
                }
                Err(error) => {
                    engine_warn!("Generation {}: tier {} failed: {}", generation, tier, error);
                    sink.tier_failed(generation, tier, &error);
                    attempts.push((tier, error));
                }
            }
        }

        ChainOutcome::Failed(ChainError { attempts })
    }
}
