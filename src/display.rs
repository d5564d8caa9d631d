//! Hand stored images to an external viewer.
//!
//! CHANGELOG:
//! - 10/17/2026 - Temp files owned by the viewer and removed when it drops
//! - 10/17/2026 - System viewer via `open`, summary-only viewer for --no-display

use crate::error::{PostError, Result};
use crate::image::ImageFormat;
use std::cell::RefCell;
use std::io::Write;
use std::path::Path;
use tempfile::TempPath;
use tracing::debug;

/// Something that can present image bytes to the user.
pub trait ImageViewer {
    fn show(&self, image: &[u8]) -> Result<()>;
}

type Launcher = Box<dyn Fn(&Path) -> std::io::Result<()>>;

/// Writes the blob to a temp file and opens it with the OS default viewer.
///
/// Files handed to the viewer live until this value is dropped; a file whose
/// launch failed is removed right away.
pub struct SystemViewer {
    launch: Launcher,
    shown: RefCell<Vec<TempPath>>,
}

impl Default for SystemViewer {
    fn default() -> Self {
        Self::with_launcher(|path| open::that(path))
    }
}

impl SystemViewer {
    /// Viewer using a custom program launcher instead of the OS default.
    pub fn with_launcher<F>(launch: F) -> Self
    where
        F: Fn(&Path) -> std::io::Result<()> + 'static,
    {
        Self {
            launch: Box::new(launch),
            shown: RefCell::new(Vec::new()),
        }
    }
}

impl ImageViewer for SystemViewer {
    fn show(&self, image: &[u8]) -> Result<()> {
        let format = ImageFormat::sniff(image);
        let ext = format.extension().ok_or_else(|| {
            PostError::Validation(format!(
                "cannot decode image ({} bytes, unrecognised format)",
                image.len()
            ))
        })?;

        let temp = write_temp(image, ext)?;
        debug!(path = %temp.display(), %format, "opening image viewer");
        // On failure `temp` drops here and deletes the file
        (self.launch)(&*temp).map_err(|source| PostError::Viewer {
            path: temp.to_path_buf(),
            source,
        })?;

        self.shown.borrow_mut().push(temp);
        Ok(())
    }
}

/// Viewer used with `--no-display`: accepts everything and shows nothing.
#[derive(Debug, Default)]
pub struct NoViewer;

impl ImageViewer for NoViewer {
    fn show(&self, _image: &[u8]) -> Result<()> {
        Ok(())
    }
}

/// Write `image` to a uniquely named temp file, deleted when the path drops.
fn write_temp(image: &[u8], ext: &str) -> Result<TempPath> {
    let temp_err = |source: std::io::Error| PostError::Io {
        path: std::env::temp_dir(),
        source,
    };

    let mut file = tempfile::Builder::new()
        .prefix("post-")
        .suffix(&format!(".{}", ext))
        .tempfile()
        .map_err(temp_err)?;
    file.write_all(image).map_err(temp_err)?;
    file.flush().map_err(temp_err)?;

    Ok(file.into_temp_path())
}
