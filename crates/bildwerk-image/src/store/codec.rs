// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// File codecs — decode an image file into a pixel buffer and encode a buffer
// back to disk, choosing the output format from the file extension.

use std::io::{Cursor, Write};
use std::path::Path;

use bildwerk_core::error::{BildwerkError, Result};
use bildwerk_core::LoadMode;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, ImageReader};
use tempfile::NamedTempFile;
use tracing::{debug, instrument};

use crate::buffer::PixelBuffer;

/// Decode the image at `path`. The format is sniffed from the content, with
/// the extension as a fallback.
#[instrument(skip_all, fields(path = %path.display(), mode = ?mode))]
pub fn decode_file(path: &Path, mode: LoadMode) -> Result<PixelBuffer> {
    let decode_error = |reason: String| BildwerkError::Decode {
        path: path.to_path_buf(),
        reason,
    };

    let image = ImageReader::open(path)
        .map_err(|err| decode_error(err.to_string()))?
        .with_guessed_format()
        .map_err(|err| decode_error(err.to_string()))?
        .decode()
        .map_err(|err| decode_error(err.to_string()))?;

    debug!(
        width = image.width(),
        height = image.height(),
        color = ?image.color(),
        "Image decoded"
    );
    Ok(PixelBuffer::from_dynamic(image, mode))
}

/// Encode `buf` in the format implied by `path`'s extension and write it.
///
/// The bytes go to a temporary file beside `path`, which is renamed over
/// the target only after the whole image has been written. A failed save
/// never leaves a truncated or half-written file at `path`.
#[instrument(skip(buf, path), fields(path = %path.display()))]
pub fn encode_file(buf: &PixelBuffer, path: &Path, jpeg_quality: u8) -> Result<()> {
    let encode_error = |reason: String| BildwerkError::Encode {
        path: path.to_path_buf(),
        reason,
    };

    let format = ImageFormat::from_path(path)
        .map_err(|err| encode_error(format!("unsupported file extension: {err}")))?;
    if !format.can_write() {
        return Err(encode_error(format!(
            "unsupported file extension: no {format:?} encoder available"
        )));
    }

    let bytes = encode_to_format(buf.clone().into_dynamic(), format, jpeg_quality)
        .map_err(|err| encode_error(err.to_string()))?;
    write_replacing(path, &bytes).map_err(|err| encode_error(err.to_string()))?;

    debug!(?format, bytes = bytes.len(), "Image encoded");
    Ok(())
}

/// Write `bytes` to a sibling temporary file, then rename it onto `path`.
fn write_replacing(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    // Temporary files are created owner-only; saved images should not be.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o644))?;
    }
    file.persist(path).map_err(|err| err.error)?;
    Ok(())
}

/// Encode a `DynamicImage` into the specified format, returning the raw bytes.
fn encode_to_format(
    image: DynamicImage,
    format: ImageFormat,
    jpeg_quality: u8,
) -> image::ImageResult<Vec<u8>> {
    let mut buffer = Vec::new();
    if format == ImageFormat::Jpeg {
        let encoder = JpegEncoder::new_with_quality(&mut buffer, jpeg_quality.clamp(1, 100));
        image.write_with_encoder(encoder)?;
    } else {
        image.write_to(&mut Cursor::new(&mut buffer), format)?;
    }
    Ok(buffer)
}
