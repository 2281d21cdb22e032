use clap::Parser;
use std::path::PathBuf;

/// Default bounding box that output images are scaled down to fit
pub const TARGET_WIDTH: u32 = 800;
pub const TARGET_HEIGHT: u32 = 450;

/// VOC boxes are 1-based and inclusive; this is subtracted from xmin/ymin
pub const COORDINATE_OFFSET: i64 = 1;

/// Name of the combined annotation file written into the output directory
pub const OUTPUT_FILE_NAME: &str = "output.json";

/// Command-line arguments parser for converting Pascal VOC XML to COCO format.
#[derive(Parser, Debug, Clone)]
#[command(version, long_about = None)]
pub struct Args {
    /// Directory containing the source images, named `<integer>.<ext>`
    #[arg(long = "imagedir", default_value = "./images")]
    pub imagedir: PathBuf,

    /// Directory containing one Pascal VOC XML file per image
    #[arg(long = "xmldir", default_value = "./xmldata")]
    pub xmldir: PathBuf,

    /// Directory receiving the copied/resized images and output.json
    #[arg(long = "outputdir", default_value = "./output")]
    pub outputdir: PathBuf,
}

impl Args {
    /// Path of the combined COCO document
    pub fn output_json(&self) -> PathBuf {
        self.outputdir.join(OUTPUT_FILE_NAME)
    }

    pub fn to_convert_config(&self) -> ConvertConfig {
        ConvertConfig::default()
    }
}

/// What to do when a single annotation file fails to convert
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum ErrorPolicy {
    /// Stop the whole run on the first failure
    #[default]
    Abort,
    /// Log the failure, leave the file out of the output and carry on
    Skip,
}

/// Conversion parameters that are not exposed on the command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConvertConfig {
    pub target_width: u32,
    pub target_height: u32,
    pub coordinate_offset: i64,
    pub error_policy: ErrorPolicy,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            target_width: TARGET_WIDTH,
            target_height: TARGET_HEIGHT,
            coordinate_offset: COORDINATE_OFFSET,
            error_policy: ErrorPolicy::Abort,
        }
    }
}
