use std::fs;
use std::io::{self, Cursor, Write};
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat, RgbImage};
use qrforge_core::{RenderResult, Visual};
use tempfile::NamedTempFile;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("no rendered image to export")]
    NoResult,
    #[error("download name {0:?} must be a plain .png file name")]
    InvalidFilename(String),
    #[error("output directory unusable: {0}")]
    OutputDir(String),
    #[error("surface of {width}x{height} does not match {len} pixel bytes")]
    SurfaceSize { width: u32, height: u32, len: usize },
    #[error("png encoding failed: {0}")]
    Encode(#[from] image::ImageError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// PNG bytes for a visual. Local surfaces are encoded. Fetched images that
/// are already PNG pass through untouched; anything else is re-encoded.
pub fn encode_png(visual: &Visual) -> Result<Vec<u8>, ExportError> {
    let image = match visual {
        Visual::Fetched { bytes, .. } => {
            if matches!(image::guess_format(bytes), Ok(ImageFormat::Png)) {
                return Ok(bytes.clone());
            }
            image::load_from_memory(bytes)?
        }
        Visual::Surface {
            width,
            height,
            pixels,
        } => {
            let surface = RgbImage::from_raw(*width, *height, pixels.clone()).ok_or(
                ExportError::SurfaceSize {
                    width: *width,
                    height: *height,
                    len: pixels.len(),
                },
            )?;
            DynamicImage::ImageRgb8(surface)
        }
    };
    let mut png = Vec::new();
    image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    Ok(png)
}

/// Saves the rendered image as `{dir}/{filename}`, replacing an earlier
/// download of the same kind. The file appears complete or not at all.
pub fn save_download(
    dir: &Path,
    filename: &str,
    result: &RenderResult,
) -> Result<PathBuf, ExportError> {
    let visual = match result {
        RenderResult::Rendered { visual, .. } => visual,
        RenderResult::Empty | RenderResult::Failed => return Err(ExportError::NoResult),
    };
    check_filename(filename)?;
    let png = encode_png(visual)?;
    prepare_output_dir(dir)?;

    let target = dir.join(filename);
    let mut staged = NamedTempFile::new_in(dir)?;
    staged.write_all(&png)?;
    staged.as_file().sync_all()?;
    // persist() replaces an existing target.
    staged.persist(&target).map_err(|err| ExportError::Io(err.error))?;
    Ok(target)
}

/// Download names stay inside the output directory.
fn check_filename(filename: &str) -> Result<(), ExportError> {
    let plain = !filename.is_empty()
        && !filename.contains(['/', '\\'])
        && !filename.starts_with('.')
        && Path::new(filename)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
    if plain {
        Ok(())
    } else {
        Err(ExportError::InvalidFilename(filename.to_string()))
    }
}

fn prepare_output_dir(dir: &Path) -> Result<(), ExportError> {
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(ExportError::OutputDir(format!(
            "{} is not a directory",
            dir.display()
        ))),
        Err(err) if err.kind() == io::ErrorKind::NotFound => fs::create_dir_all(dir)
            .map_err(|err| ExportError::OutputDir(format!("{}: {err}", dir.display()))),
        Err(err) => Err(ExportError::OutputDir(format!("{}: {err}", dir.display()))),
    }
}
