//! Pascal VOC to COCO format converter
//!
//! This library converts a directory of Pascal VOC XML annotations and their
//! images into one COCO JSON document, scaling oversized images down to a
//! fixed target box and rewriting bounding boxes to match.

pub mod coco;
pub mod config;
pub mod conversion;
pub mod dataset;
pub mod error;
pub mod imaging;
pub mod io;
pub mod types;
pub mod utils;
pub mod voc;

// Re-export commonly used types and functions
pub use coco::{CategoryTable, CocoBuilder, CocoFile};
pub use config::{Args, ConvertConfig, ErrorPolicy};
pub use conversion::{plan_file, plan_resize, remap_box, FilePlan, PixelBox, ResizePlan};
pub use dataset::{convert_directory, process_voc_dataset, Converter};
pub use error::{ConvertError, Result};
pub use types::ProcessingStats;
pub use voc::VocAnnotation;
