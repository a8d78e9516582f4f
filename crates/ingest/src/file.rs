//! Per-file classification and decoding.
//!
//! Each candidate file goes through a cheap extension pre-filter before any
//! bytes are read, then a full decode with content sniffing. Anything that
//! fails either stage is handed to the [`Quarantine`] rather than deleted,
//! so no data is destroyed irreversibly.

use crate::quarantine::Quarantine;
use image::{ImageError, ImageReader, RgbImage};
use std::path::{Path, PathBuf};

/// Filename extensions accepted for decoding (compared case-insensitively).
pub const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

/// The outcome of processing a single file during a clean-load run.
///
/// Each variant carries the relevant path: where the file was loaded from,
/// where it ended up inside the quarantine, or where it was left. Consumers
/// can pattern-match to report progress or reconcile counts against disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// File decoded successfully and its sample was retained.
    Loaded(PathBuf),
    /// File was relocated into the quarantine directory.
    Quarantined(PathBuf, QuarantineReason),
    /// File should have been quarantined, but the move itself failed; the
    /// file was left in place and skipped for this run.
    LeftInPlace(PathBuf),
}

/// Why a file was deemed unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuarantineReason {
    /// Extension not in [`IMAGE_EXTENSIONS`]; no decode was attempted.
    BadExtension,
    /// Whitelisted extension, but the bytes are not a valid image in any
    /// supported format.
    NotAnImage,
    /// An unexpected failure occurred mid-decode (I/O, decoder limits).
    DecodeFailure,
}

/// Distinguishes "these bytes are not an image" from operational failures.
///
/// Mirrors the two recovery paths of the failure policy: invalid images are
/// expected input and logged as warnings, everything else is logged as an
/// error with its cause attached.
pub(crate) enum DecodeFailure {
    Invalid(ImageError),
    Unexpected(ImageError),
}

/// Returns `true` when the filename carries a whitelisted image extension.
pub(crate) fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.iter().any(|allowed| ext.eq_ignore_ascii_case(allowed)))
}

/// Decode a file to an 8-bit RGB image, sniffing the actual format from the
/// file contents rather than trusting the extension.
pub(crate) fn decode_rgb(path: &Path) -> Result<RgbImage, DecodeFailure> {
    let reader = ImageReader::open(path).map_err(|e| DecodeFailure::Unexpected(ImageError::IoError(e)))?;
    // Sniff the format from magic bytes; a ".png" containing JPEG data
    // should still decode, and garbage bytes should fail as Unsupported
    // rather than as a confusing PNG parse error.
    let reader = reader.with_guessed_format().map_err(|e| DecodeFailure::Unexpected(ImageError::IoError(e)))?;
    match reader.decode() {
        Ok(image) => Ok(image.to_rgb8()),
        Err(e @ (ImageError::Decoding(_) | ImageError::Unsupported(_))) => Err(DecodeFailure::Invalid(e)),
        Err(e) => Err(DecodeFailure::Unexpected(e)),
    }
}

/// Classify, decode, and (if necessary) quarantine a single file.
///
/// Never returns an error: every per-file failure is logged and resolved
/// into a [`Disposition`] so the caller can continue with the next file.
pub(crate) fn process_file(path: &Path, quarantine: &Quarantine) -> (Disposition, Option<RgbImage>) {
    if !has_image_extension(path) {
        tracing::warn!(path = %path.display(), "non-image file moved to quarantine");
        return (quarantine.admit(path, QuarantineReason::BadExtension), None);
    }
    match decode_rgb(path) {
        Ok(image) => (Disposition::Loaded(path.to_path_buf()), Some(image)),
        Err(DecodeFailure::Invalid(cause)) => {
            tracing::warn!(path = %path.display(), %cause, "corrupted image moved to quarantine");
            (quarantine.admit(path, QuarantineReason::NotAnImage), None)
        },
        Err(DecodeFailure::Unexpected(cause)) => {
            tracing::error!(path = %path.display(), %cause, "unexpected failure while loading image");
            (quarantine.admit(path, QuarantineReason::DecodeFailure), None)
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use rstest::rstest;

    #[rstest]
    #[case("cell.png", true)]
    #[case("cell.PNG", true)]
    #[case("cell.jpg", true)]
    #[case("cell.JpEg", true)]
    #[case("cell.gif", true)]
    #[case("cell.tiff", false)]
    #[case("notes.txt", false)]
    #[case("Thumbs.db", false)]
    #[case("no_extension", false)]
    #[case(".png", false)]
    fn test_extension_whitelist(#[case] name: &str, #[case] accepted: bool) {
        assert_eq!(has_image_extension(Path::new(name)), accepted);
    }

    #[test]
    fn test_decode_valid_png() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("cell.png");
        RgbImage::from_pixel(4, 4, Rgb([120, 60, 30])).save(&path).unwrap();
        let decoded = decode_rgb(&path).unwrap_or_else(|_| panic!("valid png should decode"));
        assert_eq!(decoded.dimensions(), (4, 4));
    }

    #[test]
    fn test_decode_mislabelled_extension_still_succeeds() {
        // PNG bytes behind a ".jpg" name: content sniffing wins.
        let temp_dir = tempfile::tempdir().unwrap();
        let png = temp_dir.path().join("cell.png");
        RgbImage::from_pixel(2, 2, Rgb([0, 0, 0])).save(&png).unwrap();
        let jpg = temp_dir.path().join("cell.jpg");
        std::fs::rename(&png, &jpg).unwrap();
        assert!(decode_rgb(&jpg).is_ok());
    }

    #[test]
    fn test_decode_garbage_is_invalid() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("cell.jpg");
        std::fs::write(&path, b"these are not the bytes you are looking for").unwrap();
        assert!(matches!(decode_rgb(&path), Err(DecodeFailure::Invalid(_))));
    }

    #[test]
    fn test_decode_missing_file_is_unexpected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("gone.png");
        assert!(matches!(decode_rgb(&path), Err(DecodeFailure::Unexpected(_))));
    }
}
