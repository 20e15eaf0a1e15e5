mod common;

use std::fs;

use common::sample_png;
use pretty_assertions::assert_eq;
use qrforge_core::{RenderConfig, RenderResult, RenderTier, Visual};
use qrforge_engine::{encode_png, save_download, ExportError, QrEncoder, QrcodeEncoder};
use tempfile::TempDir;

#[test]
fn surface_is_encoded_as_png_of_same_size() {
    let config = RenderConfig {
        size: 160,
        ..RenderConfig::default()
    };
    let visual = QrcodeEncoder.encode("https://example.com", &config).unwrap();

    let png = encode_png(&visual).unwrap();

    let decoded = image::load_from_memory(&png).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (160, 160));
}

#[test]
fn fetched_bytes_are_saved_verbatim() {
    let temp = TempDir::new().unwrap();
    let png = sample_png();
    let result = RenderResult::Rendered {
        visual: Visual::Fetched {
            source_url: "https://img.example/qr.png".into(),
            bytes: png.clone(),
        },
        tier: RenderTier::FallbackA,
    };

    let path = save_download(temp.path(), "qr-code-url.png", &result).unwrap();

    assert_eq!(path.file_name().unwrap(), "qr-code-url.png");
    assert_eq!(fs::read(&path).unwrap(), png);
}

fn fetched(bytes: Vec<u8>) -> RenderResult {
    RenderResult::Rendered {
        visual: Visual::Fetched {
            source_url: String::new(),
            bytes,
        },
        tier: RenderTier::FallbackB,
    }
}

fn solid_png(side: u32, value: u8) -> Vec<u8> {
    encode_png(&Visual::Surface {
        width: side,
        height: side,
        pixels: vec![value; (side * side * 3) as usize],
    })
    .unwrap()
}

#[test]
fn saving_twice_replaces_the_file_and_leaves_no_temp_files() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("qr").join("downloads");
    let second = solid_png(8, 0);

    let a = save_download(&out, "qr-code-text.png", &fetched(solid_png(4, 255))).unwrap();
    let b = save_download(&out, "qr-code-text.png", &fetched(second.clone())).unwrap();

    assert_eq!(a, b);
    assert!(out.is_dir());
    assert_eq!(fs::read(&b).unwrap(), second);
    let names: Vec<_> = fs::read_dir(&out)
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(names, vec!["qr-code-text.png"]);
}

#[test]
fn file_in_place_of_output_dir_is_rejected() {
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("downloads");
    fs::write(&blocker, "x").unwrap();

    let err = save_download(&blocker, "qr-code-url.png", &fetched(sample_png())).unwrap_err();

    assert!(matches!(err, ExportError::OutputDir(_)));
    assert_eq!(fs::read(&blocker).unwrap(), b"x");
}

#[test]
fn download_names_must_be_plain_png_files() {
    let temp = TempDir::new().unwrap();
    let result = fetched(sample_png());

    for name in ["../qr-code-url.png", "sub/qr.png", "a\\b.png", ".png", "", "qr-code-url.txt"] {
        let err = save_download(temp.path(), name, &result).unwrap_err();
        assert!(
            matches!(&err, ExportError::InvalidFilename(bad) if bad == name),
            "{name:?} gave {err:?}"
        );
    }
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
    assert!(save_download(temp.path(), "QR-Code-Contact.PNG", &result).is_ok());
}

#[test]
fn fetched_bytes_that_are_not_an_image_cannot_be_exported() {
    let temp = TempDir::new().unwrap();

    let err = save_download(temp.path(), "qr-code-url.png", &fetched(b"<html>".to_vec()))
        .unwrap_err();

    assert!(matches!(err, ExportError::Encode(_)));
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
}

#[test]
fn nothing_to_export_without_render() {
    let temp = TempDir::new().unwrap();

    for result in [RenderResult::Empty, RenderResult::Failed] {
        let err = save_download(temp.path(), "qr-code-url.png", &result).unwrap_err();
        assert!(matches!(err, ExportError::NoResult));
    }
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
}

#[test]
fn mismatched_surface_is_rejected() {
    let visual = Visual::Surface {
        width: 10,
        height: 10,
        pixels: vec![0; 5],
    };
    assert!(matches!(
        encode_png(&visual),
        Err(ExportError::SurfaceSize { width: 10, height: 10, len: 5 })
    ));
}
