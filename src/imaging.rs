use image::imageops::{self, FilterType};
use log::debug;
use std::fs;
use std::path::Path;

use crate::conversion::ResizePlan;
use crate::error::{ConvertError, Result};

/// Write the output version of `source` to `dest`: a plain copy when the
/// plan keeps the original size, a resampled image otherwise.
pub fn export_image(source: &Path, dest: &Path, plan: &ResizePlan) -> Result<()> {
    if plan.resized {
        resize_image(source, dest, plan.width, plan.height)
    } else {
        copy_image(source, dest)
    }
}

/// Copy the image bytes unchanged
pub fn copy_image(source: &Path, dest: &Path) -> Result<()> {
    // fs::copy truncates dest before reading source
    if dest.exists() && fs::canonicalize(source)? == fs::canonicalize(dest)? {
        return Err(ConvertError::SameFile {
            path: source.to_path_buf(),
        });
    }
    fs::copy(source, dest)?;
    debug!("Copied {} to {}", source.display(), dest.display());
    Ok(())
}

/// Decode the image as 8-bit RGB, resample it to `width` x `height` and
/// encode it in the format implied by the extension of `dest`
pub fn resize_image(source: &Path, dest: &Path, width: u32, height: u32) -> Result<()> {
    let img = image::open(source)?.into_rgb8();
    let resized = imageops::resize(&img, width, height, FilterType::Triangle);
    resized.save(dest)?;
    debug!(
        "Resized {} ({} x {}) to {} ({} x {})",
        source.display(),
        img.width(),
        img.height(),
        dest.display(),
        width,
        height
    );
    Ok(())
}
