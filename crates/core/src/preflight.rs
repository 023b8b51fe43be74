//! Input validation run before any worker is spawned.
//!
//! Each path must be readable and its leading bytes must match a
//! recognized image signature. A single bad input fails the whole run
//! up front; nothing is resized and no page is written.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::io::AsyncReadExt;

/// Errors raised by input validation.
#[derive(Debug, Error)]
pub enum PreflightError {
    /// The path could not be opened or read.
    #[error("cannot read input file: {path}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file content does not look like a supported image.
    #[error("not a recognized image (jpg/png/bmp/gif): {path}")]
    NotAnImage { path: PathBuf },
}

const HEADER_LEN: usize = 8;

const JPG_MAGIC: [u8; 2] = [0xff, 0xd8];
const PNG_MAGIC: [u8; 8] = [0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a];
const BMP_MAGIC: [u8; 2] = [0x42, 0x4d];
const GIF_MAGIC: [u8; 3] = [0x47, 0x49, 0x46];

/// Whether the first bytes of a file identify a supported image type.
pub fn header_is_image(bytes: &[u8]) -> bool {
    bytes.starts_with(&JPG_MAGIC)
        || bytes.starts_with(&PNG_MAGIC)
        || bytes.starts_with(&BMP_MAGIC)
        || bytes.starts_with(&GIF_MAGIC)
}

/// Checks one path for readability and an image signature.
pub async fn check_image(path: &Path) -> Result<(), PreflightError> {
    let mut file = tokio::fs::File::open(path)
        .await
        .map_err(|e| PreflightError::Unreadable {
            path: path.to_path_buf(),
            source: e,
        })?;

    let mut header = [0u8; HEADER_LEN];
    let mut filled = 0;
    while filled < HEADER_LEN {
        let n = file
            .read(&mut header[filled..])
            .await
            .map_err(|e| PreflightError::Unreadable {
                path: path.to_path_buf(),
                source: e,
            })?;
        if n == 0 {
            break;
        }
        filled += n;
    }

    if header_is_image(&header[..filled]) {
        Ok(())
    } else {
        Err(PreflightError::NotAnImage {
            path: path.to_path_buf(),
        })
    }
}

/// Validates every input, failing on the first offending path.
pub async fn check_inputs(paths: &[PathBuf]) -> Result<(), PreflightError> {
    for path in paths {
        check_image(path).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_header_jpg() {
        assert!(header_is_image(&[0xff, 0xd8, 0xff, 0xe0, 0, 0, 0, 0]));
    }

    #[test]
    fn test_header_png() {
        assert!(header_is_image(&[
            0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a
        ]));
        // A truncated PNG signature must not match.
        assert!(!header_is_image(&[0x89, 0x50, 0x4e, 0x47, 0, 0, 0, 0]));
    }

    #[test]
    fn test_header_bmp_and_gif() {
        assert!(header_is_image(b"BM\x00\x00\x00\x00\x00\x00"));
        assert!(header_is_image(b"GIF89a\x00\x00"));
    }

    #[test]
    fn test_header_rejects_text() {
        assert!(!header_is_image(b"<html>  "));
        assert!(!header_is_image(b""));
    }

    #[tokio::test]
    async fn test_check_image_accepts_jpg_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[0xff, 0xd8, 0xff, 0xe0, 1, 2, 3, 4, 5, 6])
            .unwrap();
        check_image(file.path()).await.unwrap();
    }

    #[tokio::test]
    async fn test_check_image_rejects_non_image() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"just some text").unwrap();
        let err = check_image(file.path()).await.unwrap_err();
        assert!(matches!(err, PreflightError::NotAnImage { .. }));
    }

    #[tokio::test]
    async fn test_check_image_rejects_missing_path() {
        let err = check_image(Path::new("/nonexistent/photo.jpg"))
            .await
            .unwrap_err();
        assert!(matches!(err, PreflightError::Unreadable { .. }));
    }

    #[tokio::test]
    async fn test_check_inputs_names_offender() {
        let mut good = NamedTempFile::new().unwrap();
        good.write_all(b"GIF89a\x00\x00").unwrap();
        let mut bad = NamedTempFile::new().unwrap();
        bad.write_all(b"nope").unwrap();

        let inputs = vec![good.path().to_path_buf(), bad.path().to_path_buf()];
        let err = check_inputs(&inputs).await.unwrap_err();
        match err {
            PreflightError::NotAnImage { path } => assert_eq!(path, bad.path()),
            other => panic!("unexpected error: {other}"),
        }
    }
}
