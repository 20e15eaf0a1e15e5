use std::sync::Arc;
use std::time::Duration;

use image::{imageops, ImageBuffer, Rgb};
use qrcode::{EcLevel, QrCode};
use qrforge_core::{ErrorCorrection, RenderConfig, RenderTier, Visual};

use crate::capability::{Capability, CapabilityStatus, EncoderLoader, QrEncoder};
use crate::{FailureKind, RenderStrategy, TierError};

/// Primary tier: draws the code with the locally loaded encoder.
pub struct LocalEncoderTier {
    capability: Arc<Capability>,
}

impl LocalEncoderTier {
    pub fn new(capability: Arc<Capability>) -> Self {
        Self { capability }
    }
}

#[async_trait::async_trait]
impl RenderStrategy for LocalEncoderTier {
    fn tier(&self) -> RenderTier {
        RenderTier::Primary
    }

    async fn render(&self, payload: &str, config: &RenderConfig) -> Result<Visual, TierError> {
        let encoder = self.capability.acquire().await?;
        encoder.encode(payload, config)
    }

    fn timed_out(&self, after: Duration) -> TierError {
        match self.capability.status() {
            CapabilityStatus::Ready => TierError::new(
                FailureKind::Timeout,
                format!("encoder gave no answer within {after:?}"),
            ),
            status => TierError::new(
                FailureKind::CapabilityLoad,
                format!("encoder not available within {after:?} ({status:?})"),
            ),
        }
    }
}

/// Loads the `qrcode`-backed encoder, checking that it can encode at all.
#[derive(Debug, Default, Clone, Copy)]
pub struct QrcodeLoader;

#[async_trait::async_trait]
impl EncoderLoader for QrcodeLoader {
    async fn load(&self) -> Result<Arc<dyn QrEncoder>, TierError> {
        let probe = tokio::task::spawn_blocking(|| QrCode::new(b"qrforge").map(|code| code.width()))
            .await
            .map_err(|err| TierError::new(FailureKind::CapabilityLoad, err.to_string()))?;
        probe.map_err(|err| TierError::new(FailureKind::CapabilityLoad, err.to_string()))?;
        Ok(Arc::new(QrcodeEncoder))
    }
}

/// Renders an RGB surface of exactly `config.size` pixels square.
#[derive(Debug, Default, Clone, Copy)]
pub struct QrcodeEncoder;

impl QrEncoder for QrcodeEncoder {
    fn encode(&self, payload: &str, config: &RenderConfig) -> Result<Visual, TierError> {
        let code = QrCode::with_error_correction_level(payload.as_bytes(), ec_level(config.error_correction))
            .map_err(|err| TierError::new(FailureKind::Encode, err.to_string()))?;

        let size = config.size;
        let dark = Rgb(config.foreground.0);
        let light = Rgb(config.background.0);
        let drawn = code
            .render::<Rgb<u8>>()
            .dark_color(dark)
            .light_color(light)
            .quiet_zone(true)
            .max_dimensions(size, size)
            .build();

        let surface = fit_to_size(drawn, size, light);
        let (width, height) = surface.dimensions();
        Ok(Visual::Surface {
            width,
            height,
            pixels: surface.into_raw(),
        })
    }
}

fn ec_level(level: ErrorCorrection) -> EcLevel {
    match level {
        ErrorCorrection::L => EcLevel::L,
        ErrorCorrection::M => EcLevel::M,
        ErrorCorrection::Q => EcLevel::Q,
        ErrorCorrection::H => EcLevel::H,
    }
}

/// Centres `drawn` on a `size` square of background colour. Codes too dense
/// to fit at one pixel per module are scaled down instead.
fn fit_to_size(
    drawn: ImageBuffer<Rgb<u8>, Vec<u8>>,
    size: u32,
    background: Rgb<u8>,
) -> ImageBuffer<Rgb<u8>, Vec<u8>> {
    let (width, height) = drawn.dimensions();
    if width == size && height == size {
        return drawn;
    }
    if width > size || height > size {
        return imageops::resize(&drawn, size, size, imageops::FilterType::Nearest);
    }
    let mut canvas = ImageBuffer::from_pixel(size, size, background);
    let x = i64::from((size - width) / 2);
    let y = i64::from((size - height) / 2);
    imageops::overlay(&mut canvas, &drawn, x, y);
    canvas
}
