use glob::{glob, Pattern};
use log::info;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::coco::CocoFile;
use crate::error::Result;

/// Make sure the output directory exists; existing contents are left alone
pub fn setup_output_directory(path: &Path) -> std::io::Result<PathBuf> {
    if !path.exists() {
        info!("Creating output directory {}", path.display());
    }
    fs::create_dir_all(path)?;
    Ok(path.to_path_buf())
}

/// List the `*.xml` files directly inside `xml_dir`, in sorted path order
pub fn list_xml_files(xml_dir: &Path) -> Result<Vec<PathBuf>> {
    if !xml_dir.is_dir() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("XML directory does not exist: {}", xml_dir.display()),
        )
        .into());
    }

    let pattern = format!(
        "{}/*.xml",
        Pattern::escape(&xml_dir.to_string_lossy())
    );
    let entries = glob(&pattern)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    let mut xml_files = Vec::new();
    for entry in entries {
        let path = entry.map_err(std::io::Error::from)?;
        if path.is_file() {
            xml_files.push(path);
        }
    }
    Ok(xml_files)
}

/// Serialize the COCO document to `path` as a single JSON value
pub fn write_coco_file(path: &Path, coco: &CocoFile) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, coco)?;
    writer.flush()?;
    info!("Wrote {}", path.display());
    Ok(())
}
