use std::fmt;
use std::str::FromStr;

/// Monotonically increasing tag for one recompute cycle.
pub type Generation = u64;

pub const DEFAULT_SIZE: u32 = 300;
pub const MIN_SIZE: u32 = 64;
pub const MAX_SIZE: u32 = 2048;

/// Rendering backends, in the order the chain tries them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RenderTier {
    Primary,
    FallbackA,
    FallbackB,
}

impl fmt::Display for RenderTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RenderTier::Primary => "primary",
            RenderTier::FallbackA => "fallback-a",
            RenderTier::FallbackB => "fallback-b",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const BLACK: Rgb = Rgb([0, 0, 0]);
    pub const WHITE: Rgb = Rgb([255, 255, 255]);

    /// Lowercase `rrggbb` without the leading `#`.
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.0;
        format!("{r:02x}{g:02x}{b:02x}")
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.to_hex())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidColor(pub String);

impl fmt::Display for InvalidColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid color `{}` (expected #rrggbb, #rgb, black or white)", self.0)
    }
}

impl std::error::Error for InvalidColor {}

impl FromStr for Rgb {
    type Err = InvalidColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("black") {
            return Ok(Rgb::BLACK);
        }
        if trimmed.eq_ignore_ascii_case("white") {
            return Ok(Rgb::WHITE);
        }
        let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(InvalidColor(s.to_string()));
        }
        let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| InvalidColor(s.to_string()));
        match hex.len() {
            6 => Ok(Rgb([
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            ])),
            3 => {
                let mut out = [0u8; 3];
                for (slot, digit) in out.iter_mut().zip(hex.chars()) {
                    let doubled: String = [digit, digit].iter().collect();
                    *slot = channel(&doubled)?;
                }
                Ok(Rgb(out))
            }
            _ => Err(InvalidColor(s.to_string())),
        }
    }
}

/// Error-correction strength, passed through to the backend untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ErrorCorrection {
    L,
    #[default]
    M,
    Q,
    H,
}

impl ErrorCorrection {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCorrection::L => "L",
            ErrorCorrection::M => "M",
            ErrorCorrection::Q => "Q",
            ErrorCorrection::H => "H",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidLevel(pub String);

impl fmt::Display for InvalidLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown error-correction level `{}` (expected L, M, Q or H)", self.0)
    }
}

impl std::error::Error for InvalidLevel {}

impl FromStr for ErrorCorrection {
    type Err = InvalidLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "L" => Ok(ErrorCorrection::L),
            "M" => Ok(ErrorCorrection::M),
            "Q" => Ok(ErrorCorrection::Q),
            "H" => Ok(ErrorCorrection::H),
            _ => Err(InvalidLevel(s.trim().to_string())),
        }
    }
}

/// Options attached to a single render attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
    pub foreground: Rgb,
    pub background: Rgb,
    pub size: u32,
    pub error_correction: ErrorCorrection,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            foreground: Rgb::BLACK,
            background: Rgb::WHITE,
            size: DEFAULT_SIZE,
            error_correction: ErrorCorrection::M,
        }
    }
}

impl RenderConfig {
    /// Copy of `self` with `size` clamped to the supported range.
    pub fn clamped(self) -> Self {
        Self {
            size: self.size.clamp(MIN_SIZE, MAX_SIZE),
            ..self
        }
    }
}

/// The rendered image, as handed back by a tier.
#[derive(Clone, PartialEq, Eq)]
pub enum Visual {
    /// Raw RGB8 pixels drawn by the local encoder, row-major.
    Surface {
        width: u32,
        height: u32,
        pixels: Vec<u8>,
    },
    /// Image bytes already fetched from a remote endpoint.
    Fetched { source_url: String, bytes: Vec<u8> },
}

impl fmt::Debug for Visual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visual::Surface { width, height, .. } => f
                .debug_struct("Surface")
                .field("width", width)
                .field("height", height)
                .finish_non_exhaustive(),
            Visual::Fetched { source_url, bytes } => f
                .debug_struct("Fetched")
                .field("source_url", source_url)
                .field("len", &bytes.len())
                .finish(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RenderResult {
    #[default]
    Empty,
    Rendered { visual: Visual, tier: RenderTier },
    Failed,
}

impl RenderResult {
    pub fn is_rendered(&self) -> bool {
        matches!(self, RenderResult::Rendered { .. })
    }

    pub fn tier(&self) -> Option<RenderTier> {
        match self {
            RenderResult::Rendered { tier, .. } => Some(*tier),
            RenderResult::Empty | RenderResult::Failed => None,
        }
    }
}
