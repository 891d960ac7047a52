use crate::{error::Result, models::CroppedImage};
use chrono::Utc;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

const MAX_NAME_ATTEMPTS: i64 = 1000;

pub fn download_filename(epoch_millis: i64) -> String {
    format!("generated-image-{}.png", epoch_millis)
}

/// Writes the current cropped result to disk once per call.
#[derive(Debug, Clone)]
pub struct DownloadAction {
    output_dir: PathBuf,
}

impl DownloadAction {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Returns `Ok(None)` without touching the filesystem when there is nothing to save.
    pub fn download(&self, cropped: Option<&CroppedImage>) -> Result<Option<PathBuf>> {
        let cropped = match cropped {
            Some(image) if !image.is_empty() => image,
            _ => {
                log::debug!("Download requested with no cropped image, skipping");
                return Ok(None);
            }
        };

        let bytes = cropped.png_bytes()?;
        fs::create_dir_all(&self.output_dir)?;
        let path = write_unique(&self.output_dir, Utc::now().timestamp_millis(), &bytes)?;

        log::info!("Image saved to: {}", path.display());
        Ok(Some(path))
    }
}

/// Creates `generated-image-<ms>.png` without replacing an existing file, stepping
/// the millisecond stamp forward while the name is taken.
fn write_unique(dir: &Path, epoch_millis: i64, bytes: &[u8]) -> Result<PathBuf> {
    let mut stamp = epoch_millis;
    loop {
        let path = dir.join(download_filename(stamp));
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut file) => {
                file.write_all(bytes)?;
                return Ok(path);
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists
                && stamp - epoch_millis < MAX_NAME_ATTEMPTS =>
            {
                log::debug!("{} already exists, trying the next name", path.display());
                stamp += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgba, RgbaImage};

    #[test]
    fn test_filename_format() {
        assert_eq!(
            download_filename(1_700_000_000_123),
            "generated-image-1700000000123.png"
        );
    }

    #[test]
    fn test_no_result_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out");
        let action = DownloadAction::new(&target);

        assert!(action.download(None).unwrap().is_none());

        let blank = CroppedImage {
            width: 0,
            height: 0,
            data_uri: String::new(),
        };
        assert!(action.download(Some(&blank)).unwrap().is_none());
        assert!(!target.exists());
    }

    #[test]
    fn test_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let action = DownloadAction::new(dir.path());
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(5, 5, Rgba([1, 2, 3, 255])));
        let cropped = CroppedImage::from_image(&image).unwrap();

        let path = action.download(Some(&cropped)).unwrap().unwrap();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("generated-image-"));
        assert!(name.ends_with(".png"));

        let saved = image::open(&path).unwrap();
        assert_eq!((saved.width(), saved.height()), (5, 5));
    }

    #[test]
    fn test_back_to_back_downloads_keep_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let action = DownloadAction::new(dir.path());
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(3, 3, Rgba([9, 9, 9, 255])));
        let cropped = CroppedImage::from_image(&image).unwrap();

        let first = action.download(Some(&cropped)).unwrap().unwrap();
        let second = action.download(Some(&cropped)).unwrap().unwrap();
        assert_ne!(first, second);
        assert!(first.exists());
        assert!(second.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_existing_file_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let taken = dir.path().join(download_filename(1_000));
        fs::write(&taken, b"keep me").unwrap();

        let path = write_unique(dir.path(), 1_000, b"new").unwrap();
        assert_eq!(path, dir.path().join(download_filename(1_001)));
        assert_eq!(fs::read(&taken).unwrap(), b"keep me");
        assert_eq!(fs::read(&path).unwrap(), b"new");
    }
}
