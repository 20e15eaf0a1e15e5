use std::sync::{mpsc, Arc};
use std::thread;

use engine_logging::{engine_debug, engine_error};
use qrforge_core::{Generation, RenderConfig, RenderTier};
use tokio_util::sync::CancellationToken;

use crate::capability::{Capability, EncoderLoader};
use crate::chain::{ChainOutcome, ChainSettings, ChainSink, RenderStrategy, RenderTierChain};
use crate::fetch::{FetchSettings, ImageFetcher, ReqwestFetcher};
use crate::local::{LocalEncoderTier, QrcodeLoader};
use crate::remote::{
    RemoteApi, RemoteImageTier, DEFAULT_CHART_ENDPOINT, DEFAULT_MARGIN, DEFAULT_QRSERVER_ENDPOINT,
};
use crate::{EngineEvent, TierError};

#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub fetch: FetchSettings,
    pub chain: ChainSettings,
    pub chart_endpoint: String,
    pub qrserver_endpoint: String,
    pub margin: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            fetch: FetchSettings::default(),
            chain: ChainSettings::default(),
            chart_endpoint: DEFAULT_CHART_ENDPOINT.to_string(),
            qrserver_endpoint: DEFAULT_QRSERVER_ENDPOINT.to_string(),
            margin: DEFAULT_MARGIN,
        }
    }
}

impl RenderTierChain {
    /// Primary local encoder, then the chart endpoint, then qrserver.
    pub fn standard(settings: &EngineSettings, loader: Arc<dyn EncoderLoader>) -> Self {
        let capability = Arc::new(Capability::new(loader));
        let fetcher: Arc<dyn ImageFetcher> = Arc::new(ReqwestFetcher::new(settings.fetch.clone()));
        let tiers: Vec<Arc<dyn RenderStrategy>> = vec![
            Arc::new(LocalEncoderTier::new(capability)),
            Arc::new(RemoteImageTier::new(
                RenderTier::FallbackA,
                settings.chart_endpoint.clone(),
                RemoteApi::Chart,
                fetcher.clone(),
            )),
            Arc::new(RemoteImageTier::new(
                RenderTier::FallbackB,
                settings.qrserver_endpoint.clone(),
                RemoteApi::QrServer {
                    margin: settings.margin,
                },
                fetcher,
            )),
        ];
        Self::new(tiers, settings.chain.clone())
    }
}

enum EngineCommand {
    Render {
        generation: Generation,
        payload: String,
        config: RenderConfig,
    },
    Cancel,
}

/// Runs render chains on a background runtime. A new render cancels the one
/// in flight; results come back through [`EngineHandle::try_recv`].
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: &EngineSettings) -> std::io::Result<Self> {
        Self::with_chain(RenderTierChain::standard(settings, Arc::new(QrcodeLoader)))
    }

    pub fn with_chain(chain: RenderTierChain) -> std::io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("qrforge-engine")
            .enable_all()
            .build()?;
        let chain = Arc::new(chain);

        thread::Builder::new()
            .name("qrforge-engine-cmd".to_string())
            .spawn(move || {
                let mut in_flight: Option<CancellationToken> = None;
                while let Ok(command) = cmd_rx.recv() {
                    if let Some(previous) = in_flight.take() {
                        previous.cancel();
                    }
                    match command {
                        EngineCommand::Render {
                            generation,
                            payload,
                            config,
                        } => {
                            let cancel = CancellationToken::new();
                            in_flight = Some(cancel.clone());
                            let chain = chain.clone();
                            let event_tx = event_tx.clone();
                            runtime.spawn(async move {
                                run_render(&chain, generation, payload, config, event_tx, cancel)
                                    .await;
                            });
                        }
                        EngineCommand::Cancel => {
                            engine_debug!("Render in flight cancelled");
                        }
                    }
                }
                runtime.shutdown_background();
            })?;

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn render(&self, generation: Generation, payload: impl Into<String>, config: RenderConfig) {
        let sent = self.cmd_tx.send(EngineCommand::Render {
            generation,
            payload: payload.into(),
            config,
        });
        if sent.is_err() {
            engine_error!("Engine worker is gone; dropping render for generation {}", generation);
        }
    }

    pub fn cancel(&self) {
        let _ = self.cmd_tx.send(EngineCommand::Cancel);
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }
}

struct ChannelSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChainSink for ChannelSink {
    fn tier_failed(&self, generation: Generation, tier: RenderTier, error: &TierError) {
        let _ = self.tx.send(EngineEvent::TierFailed {
            generation,
            tier,
            error: error.clone(),
        });
    }
}

async fn run_render(
    chain: &RenderTierChain,
    generation: Generation,
    payload: String,
    config: RenderConfig,
    event_tx: mpsc::Sender<EngineEvent>,
    cancel: CancellationToken,
) {
    let sink = ChannelSink {
        tx: event_tx.clone(),
    };
    let result = match chain.run(generation, &payload, &config, &sink, &cancel).await {
        ChainOutcome::Rendered(rendered) => Ok(rendered),
        ChainOutcome::Failed(error) => Err(error),
        ChainOutcome::Cancelled => return,
    };
    let _ = event_tx.send(EngineEvent::RenderCompleted { generation, result });
}
