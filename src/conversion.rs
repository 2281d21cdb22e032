use std::path::Path;

use crate::config::ConvertConfig;
use crate::error::{ConvertError, Result};
use crate::utils::parse_image_id;
use crate::voc::{VocAnnotation, VocBox};

/// Output dimensions of an image and the factor its coordinates are divided by
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizePlan {
    pub width: u32,
    pub height: u32,
    pub ratio: f64,
    /// `false` when the image already fits and is copied unchanged
    pub resized: bool,
}

/// Decide how an image of the given size is scaled to fit the target box.
///
/// The larger of the two ratios is the binding constraint; when they are
/// equal the height branch is taken.
pub fn plan_resize(width: u32, height: u32, config: &ConvertConfig) -> ResizePlan {
    let width_ratio = width as f64 / config.target_width as f64;
    let height_ratio = height as f64 / config.target_height as f64;

    if width_ratio <= 1.0 && height_ratio <= 1.0 {
        return ResizePlan {
            width,
            height,
            ratio: 1.0,
            resized: false,
        };
    }

    if width_ratio > height_ratio {
        ResizePlan {
            width: config.target_width,
            height: (height as f64 / width_ratio) as u32,
            ratio: width_ratio,
            resized: true,
        }
    } else {
        ResizePlan {
            width: (width as f64 / height_ratio) as u32,
            height: config.target_height,
            ratio: height_ratio,
            resized: true,
        }
    }
}

/// Bounding box in 0-based output pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelBox {
    pub xmin: i64,
    pub ymin: i64,
    pub xmax: i64,
    pub ymax: i64,
}

impl PixelBox {
    pub fn width(&self) -> i64 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> i64 {
        self.ymax - self.ymin
    }

    pub fn area(&self) -> i64 {
        self.width() * self.height()
    }

    /// COCO `[x, y, width, height]`
    pub fn to_bbox(&self) -> [i64; 4] {
        [self.xmin, self.ymin, self.width(), self.height()]
    }
}

/// Rescale a raw VOC box by `ratio`, shifting the min edges by `offset`.
///
/// Boxes that end up with a non-positive width or height are rejected.
pub fn remap_box(raw: &VocBox, ratio: f64, offset: i64, file: &Path) -> Result<PixelBox> {
    let scale = |v: i64| (v as f64 / ratio).floor() as i64;
    let pixel_box = PixelBox {
        xmin: scale(raw.xmin - offset),
        ymin: scale(raw.ymin - offset),
        xmax: scale(raw.xmax),
        ymax: scale(raw.ymax),
    };

    if pixel_box.xmax <= pixel_box.xmin || pixel_box.ymax <= pixel_box.ymin {
        return Err(ConvertError::Geometry {
            file: file.to_path_buf(),
            xmin: pixel_box.xmin,
            ymin: pixel_box.ymin,
            xmax: pixel_box.xmax,
            ymax: pixel_box.ymax,
        });
    }
    Ok(pixel_box)
}

/// Everything derived from one annotation file before any output is touched.
///
/// Category names are kept as strings; ids are assigned when the plan is
/// committed to the output document.
#[derive(Debug, Clone, PartialEq)]
pub struct FilePlan {
    pub image_id: i64,
    pub file_name: String,
    pub resize: ResizePlan,
    pub objects: Vec<(String, PixelBox)>,
}

/// Compute image id, output size and remapped boxes for one annotation
pub fn plan_file(annotation: &VocAnnotation, config: &ConvertConfig, file: &Path) -> Result<FilePlan> {
    let image_id = parse_image_id(&annotation.filename)?;
    let resize = plan_resize(annotation.width, annotation.height, config);

    let objects = annotation
        .objects
        .iter()
        .map(|object| {
            remap_box(&object.bndbox, resize.ratio, config.coordinate_offset, file)
                .map(|pixel_box| (object.name.clone(), pixel_box))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(FilePlan {
        image_id,
        file_name: annotation.filename.clone(),
        resize,
        objects,
    })
}
