//! Error types for the VOC to COCO conversion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort (or, under a skip policy, discard) the conversion of a file.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// A required element is missing, duplicated, or present a wrong number of times
    #[error("Structural error in {file:?}: {message}")]
    Structural {
        /// Annotation file being parsed
        file: PathBuf,
        /// Offending element name
        element: String,
        /// Human readable description
        message: String,
    },

    /// Element text that should hold an integer does not
    #[error("Invalid number in {file:?}: <{element}> contains {value:?}")]
    InvalidNumber {
        file: PathBuf,
        element: String,
        value: String,
    },

    /// The image filename stem is not a base-10 integer
    #[error("Filename {filename} is supposed to be an integer.")]
    InvalidFilename { filename: String },

    /// The rescaled bounding box has a non-positive width or height
    #[error(
        "Invalid bounding box in {file:?}: xmin={xmin}, ymin={ymin}, xmax={xmax}, ymax={ymax}"
    )]
    Geometry {
        file: PathBuf,
        xmin: i64,
        ymin: i64,
        xmax: i64,
        ymax: i64,
    },

    /// Source and destination of an image copy are the same file
    #[error("Refusing to copy {path:?} onto itself")]
    SameFile { path: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConvertError {
    /// Build a structural error for `element` inside `file`.
    pub fn structural(
        file: impl Into<PathBuf>,
        element: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Structural {
            file: file.into(),
            element: element.into(),
            message: message.into(),
        }
    }

    /// Name of the offending element, for structural and numeric errors.
    pub fn element(&self) -> Option<&str> {
        match self {
            Self::Structural { element, .. } | Self::InvalidNumber { element, .. } => {
                Some(element.as_str())
            }
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
