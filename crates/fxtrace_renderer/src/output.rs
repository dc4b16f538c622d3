//! Writing rendered images to disk.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use thiserror::Error;

use crate::renderer::ImageBuffer;

/// Errors raised while saving an image.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("unsupported output extension {0:?} (expected .ppm or .png)")]
    UnsupportedFormat(String),

    #[error("buffer holds {actual} pixels, expected {width}x{height}")]
    SizeMismatch {
        width: u32,
        height: u32,
        actual: usize,
    },
}

fn check_size(image: &ImageBuffer) -> Result<(), OutputError> {
    let expected = image.width as usize * image.height as usize;
    if image.pixels.len() != expected {
        return Err(OutputError::SizeMismatch {
            width: image.width,
            height: image.height,
            actual: image.pixels.len(),
        });
    }
    Ok(())
}

/// Write a plain-text (P3) PPM: one row of decimal triples per line.
pub fn write_ppm<W: Write>(image: &ImageBuffer, writer: &mut W) -> Result<(), OutputError> {
    check_size(image)?;

    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", image.width, image.height)?;
    writeln!(writer, "255")?;

    for row in image.pixels.chunks_exact(image.width.max(1) as usize) {
        for (i, px) in row.iter().enumerate() {
            if i > 0 {
                write!(writer, "  ")?;
            }
            write!(writer, "{} {} {}", px.r, px.g, px.b)?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

pub fn save_ppm(image: &ImageBuffer, path: &Path) -> Result<(), OutputError> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_ppm(image, &mut writer)?;
    writer.flush()?;
    Ok(())
}

pub fn save_png(image: &ImageBuffer, path: &Path) -> Result<(), OutputError> {
    check_size(image)?;

    let rgb = image::RgbImage::from_raw(image.width, image.height, image.as_bytes().to_vec())
        .ok_or(OutputError::SizeMismatch {
            width: image.width,
            height: image.height,
            actual: image.pixels.len(),
        })?;
    rgb.save_with_format(path, image::ImageFormat::Png)?;
    Ok(())
}

/// Save as PPM or PNG depending on the file extension.
pub fn save_image(image: &ImageBuffer, path: &Path) -> Result<(), OutputError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "ppm" => save_ppm(image, path)?,
        "png" => save_png(image, path)?,
        _ => return Err(OutputError::UnsupportedFormat(ext)),
    }

    log::info!("Saved {}x{} image to {}", image.width, image.height, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::Rgb;

    fn checker() -> ImageBuffer {
        let mut image = ImageBuffer::new(2, 2);
        image.set(0, 0, Rgb::new(255, 0, 0));
        image.set(1, 0, Rgb::new(0, 255, 0));
        image.set(0, 1, Rgb::new(0, 0, 255));
        image.set(1, 1, Rgb::new(12, 34, 56));
        image
    }

    fn scratch_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("fxtrace_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_write_ppm() {
        let mut out = Vec::new();
        write_ppm(&checker(), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "P3\n2 2\n255\n255 0 0  0 255 0\n0 0 255  12 34 56\n");
    }

    #[test]
    fn test_write_ppm_size_mismatch() {
        let mut image = checker();
        image.pixels.pop();

        let err = write_ppm(&image, &mut Vec::new()).unwrap_err();
        assert!(matches!(err, OutputError::SizeMismatch { actual: 3, .. }));
    }

    #[test]
    fn test_save_png_round_trip() {
        let path = scratch_path("checker.png");
        save_image(&checker(), &path).unwrap();

        let loaded = image::open(&path).unwrap().to_rgb8();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.dimensions(), (2, 2));
        assert_eq!(loaded.get_pixel(1, 1).0, [12, 34, 56]);
        assert_eq!(loaded.get_pixel(1, 0).0, [0, 255, 0]);
    }

    #[test]
    fn test_save_ppm_file() {
        let path = scratch_path("checker.ppm");
        save_image(&checker(), &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert!(text.starts_with("P3\n2 2\n255\n"));
        assert_eq!(text.lines().count(), 5);
    }

    #[test]
    fn test_unsupported_extension() {
        let err = save_image(&checker(), Path::new("render.exr")).unwrap_err();
        assert!(matches!(err, OutputError::UnsupportedFormat(ext) if ext == "exr"));

        let err = save_image(&checker(), Path::new("render")).unwrap_err();
        assert!(matches!(err, OutputError::UnsupportedFormat(_)));
    }
}
