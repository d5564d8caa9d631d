//! Image file validation and format sniffing.
//!
//! Only `.jpg` and `.png` files up to 5 MiB are accepted. The extension check
//! is case-sensitive: `photo.PNG` is rejected.
//!
//! CHANGELOG:
//! - 10/17/2026 - Cap the read at the size limit
//! - 10/17/2026 - Validation rules and magic-byte sniffing

use crate::error::{PostError, Result};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Largest accepted image, in bytes (5 MiB).
pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

/// Accepted file extensions, compared exactly.
pub const ALLOWED_EXTENSIONS: [&str; 2] = ["jpg", "png"];

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";
const JPEG_SOI: &[u8] = b"\xFF\xD8\xFF";

/// Image encoding detected from leading bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Unknown,
}

impl ImageFormat {
    pub fn sniff(bytes: &[u8]) -> Self {
        if bytes.starts_with(PNG_SIGNATURE) {
            ImageFormat::Png
        } else if bytes.starts_with(JPEG_SOI) {
            ImageFormat::Jpeg
        } else {
            ImageFormat::Unknown
        }
    }

    /// File extension a viewer will recognise, if any.
    pub fn extension(self) -> Option<&'static str> {
        match self {
            ImageFormat::Png => Some("png"),
            ImageFormat::Jpeg => Some("jpg"),
            ImageFormat::Unknown => None,
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageFormat::Png => write!(f, "PNG"),
            ImageFormat::Jpeg => write!(f, "JPEG"),
            ImageFormat::Unknown => write!(f, "unknown"),
        }
    }
}

/// A validated image file, read fully into memory.
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

/// Check extension and size of `path` without reading its contents.
///
/// Returns the file size on success.
pub fn validate(path: &Path) -> Result<u64> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    if !ALLOWED_EXTENSIONS.contains(&extension) {
        return Err(PostError::Validation(format!(
            "Only images with '.png' or '.jpg' extension are supported (got {:?})",
            path.file_name().unwrap_or(path.as_os_str())
        )));
    }

    let metadata = std::fs::metadata(path).map_err(|source| PostError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if !metadata.is_file() {
        return Err(PostError::Validation(format!("{:?} is not a file", path)));
    }

    let size = metadata.len();
    if size > MAX_IMAGE_BYTES {
        return Err(too_large(size));
    }
    Ok(size)
}

fn too_large(size: u64) -> PostError {
    PostError::Validation(format!(
        "Image file size ({} bytes) exceeds the maximum limit of 5 MB",
        size
    ))
}

/// Validate `path` and read it into memory.
///
/// The file handle is scoped to the read and released on every path. The
/// read itself is capped, so a file that grows after validation is still
/// rejected.
pub fn load<P: AsRef<Path>>(path: P) -> Result<ImageFile> {
    let path = path.as_ref();
    validate(path)?;

    let io_err = |source: std::io::Error| PostError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(io_err)?;
    let bytes = read_capped(file).map_err(|e| match e {
        CappedRead::Io(source) => io_err(source),
        CappedRead::TooLarge(seen) => too_large(seen),
    })?;

    Ok(ImageFile {
        path: path.to_path_buf(),
        bytes,
    })
}

enum CappedRead {
    Io(std::io::Error),
    TooLarge(u64),
}

/// Read at most `MAX_IMAGE_BYTES`; one byte more means the source is too large.
fn read_capped<R: Read>(reader: R) -> std::result::Result<Vec<u8>, CappedRead> {
    let mut bytes = Vec::new();
    reader
        .take(MAX_IMAGE_BYTES + 1)
        .read_to_end(&mut bytes)
        .map_err(CappedRead::Io)?;
    let seen = bytes.len() as u64;
    if seen > MAX_IMAGE_BYTES {
        return Err(CappedRead::TooLarge(seen));
    }
    Ok(bytes)
}
