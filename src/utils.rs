use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

use crate::error::{ConvertError, Result};

/// Last component of a path written by any platform's annotation tool
pub fn basename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Derive the COCO image id from an image file name such as `42.jpg`
pub fn parse_image_id(filename: &str) -> Result<i64> {
    let stem = Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename);
    stem.parse().map_err(|_| ConvertError::InvalidFilename {
        filename: stem.to_string(),
    })
}

/// Create a progress bar with the given length and label
pub fn create_progress_bar(len: u64, label: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    let style = ProgressStyle::default_bar()
        .template(&format!(
            "{{spinner:.green}} [{}] [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} ({{eta}})",
            label
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);
    pb
}
