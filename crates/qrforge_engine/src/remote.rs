use std::sync::Arc;

use qrforge_core::{RenderConfig, RenderTier, Visual};

use crate::fetch::ImageFetcher;
use crate::{RenderStrategy, TierError};

pub const DEFAULT_CHART_ENDPOINT: &str = "https://chart.googleapis.com/chart";
pub const DEFAULT_QRSERVER_ENDPOINT: &str = "https://api.qrserver.com/v1/create-qr-code/";
pub const DEFAULT_MARGIN: u32 = 10;

/// Query layout of a remote image-generation endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteApi {
    /// `chs`, `cht=qr`, `chl`, `choe=UTF-8`.
    Chart,
    /// `size`, `data`, `format=png`, `margin`, plus colours.
    QrServer { margin: u32 },
}

/// A fallback tier that fetches a ready-made image over HTTP.
pub struct RemoteImageTier {
    tier: RenderTier,
    endpoint: String,
    api: RemoteApi,
    fetcher: Arc<dyn ImageFetcher>,
}

impl RemoteImageTier {
    pub fn new(
        tier: RenderTier,
        endpoint: impl Into<String>,
        api: RemoteApi,
        fetcher: Arc<dyn ImageFetcher>,
    ) -> Self {
        Self {
            tier,
            endpoint: endpoint.into(),
            api,
            fetcher,
        }
    }

    pub fn request_url(&self, payload: &str, config: &RenderConfig) -> String {
        let data = urlencoding::encode(payload);
        let size = config.size;
        let query = match self.api {
            RemoteApi::Chart => {
                format!("chs={size}x{size}&cht=qr&chl={data}&choe=UTF-8")
            }
            RemoteApi::QrServer { margin } => format!(
                "size={size}x{size}&data={data}&format=png&margin={margin}&color={fg}&bgcolor={bg}",
                fg = config.foreground.to_hex(),
                bg = config.background.to_hex(),
            ),
        };
        let separator = if self.endpoint.contains('?') { '&' } else { '?' };
        format!("{}{separator}{query}", self.endpoint)
    }
}

#[async_trait::async_trait]
impl RenderStrategy for RemoteImageTier {
    fn tier(&self) -> RenderTier {
        self.tier
    }

    async fn render(&self, payload: &str, config: &RenderConfig) -> Result<Visual, TierError> {
        let url = self.request_url(payload, config);
        let image = self.fetcher.fetch_image(&url).await?;
        Ok(Visual::Fetched {
            source_url: image.final_url,
            bytes: image.bytes,
        })
    }
}
