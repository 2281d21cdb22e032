//! COCO format data structures
//!
//! This module provides the records of the combined COCO document and the
//! builder that assigns category and annotation ids while files are converted.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::conversion::FilePlan;

/// COCO category information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub supercategory: String,
    pub id: u32,
    pub name: String,
}

/// COCO image information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub file_name: String,
    pub height: u32,
    pub width: u32,
    pub id: i64,
}

impl Image {
    pub fn new(id: i64, file_name: String, width: u32, height: u32) -> Self {
        Self {
            file_name,
            height,
            width,
            id,
        }
    }
}

/// COCO annotation information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub area: i64,
    pub iscrowd: u32,
    pub image_id: i64,
    pub bbox: [i64; 4], // [x, y, width, height]
    pub category_id: u32,
    pub id: u64,
    pub ignore: u32,
    pub segmentation: Vec<Vec<f64>>,
}

/// Complete COCO dataset structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CocoFile {
    pub images: Vec<Image>,
    #[serde(rename = "type")]
    pub kind: String,
    pub annotations: Vec<Annotation>,
    pub categories: Vec<Category>,
}

impl Default for CocoFile {
    fn default() -> Self {
        Self {
            images: Vec::new(),
            kind: "instances".to_string(),
            annotations: Vec::new(),
            categories: Vec::new(),
        }
    }
}

/// Category names mapped to ids in first-seen order, starting at 0
#[derive(Debug, Clone, Default)]
pub struct CategoryTable {
    names: Vec<String>,
    ids: HashMap<String, u32>,
}

impl CategoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of `name`, registering it if this is the first time it is seen
    pub fn get_or_insert(&mut self, name: &str) -> u32 {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = self.names.len() as u32;
        self.names.push(name.to_string());
        self.ids.insert(name.to_string(), id);
        id
    }

    /// Category records in id order
    pub fn to_categories(&self) -> Vec<Category> {
        self.names
            .iter()
            .enumerate()
            .map(|(id, name)| Category {
                supercategory: "none".to_string(),
                id: id as u32,
                name: name.clone(),
            })
            .collect()
    }
}

/// Accumulates the COCO document over a whole run
pub struct CocoBuilder {
    next_annotation_id: u64,
    categories: CategoryTable,
    images: Vec<Image>,
    annotations: Vec<Annotation>,
}

impl Default for CocoBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CocoBuilder {
    pub const START_ANNOTATION_ID: u64 = 1;

    pub fn new() -> Self {
        Self {
            next_annotation_id: Self::START_ANNOTATION_ID,
            categories: CategoryTable::new(),
            images: Vec::new(),
            annotations: Vec::new(),
        }
    }

    /// Add the image and annotations of one converted file.
    ///
    /// Returns the number of annotations added.
    pub fn commit(&mut self, plan: &FilePlan) -> usize {
        self.images.push(Image::new(
            plan.image_id,
            plan.file_name.clone(),
            plan.resize.width,
            plan.resize.height,
        ));

        for (name, pixel_box) in &plan.objects {
            let category_id = self.categories.get_or_insert(name);
            let id = self.next_annotation_id;
            self.next_annotation_id += 1;
            self.annotations.push(Annotation {
                area: pixel_box.area(),
                iscrowd: 0,
                image_id: plan.image_id,
                bbox: pixel_box.to_bbox(),
                category_id,
                id,
                ignore: 0,
                segmentation: Vec::new(),
            });
        }
        plan.objects.len()
    }

    /// Finish the run and produce the document
    pub fn build(self) -> CocoFile {
        CocoFile {
            images: self.images,
            annotations: self.annotations,
            categories: self.categories.to_categories(),
            ..CocoFile::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversion::{PixelBox, ResizePlan};

    fn plan(image_id: i64, names: &[&str]) -> FilePlan {
        FilePlan {
            image_id,
            file_name: format!("{}.jpg", image_id),
            resize: ResizePlan {
                width: 640,
                height: 480,
                ratio: 1.0,
                resized: false,
            },
            objects: names
                .iter()
                .map(|name| {
                    (
                        name.to_string(),
                        PixelBox {
                            xmin: 0,
                            ymin: 0,
                            xmax: 10,
                            ymax: 20,
                        },
                    )
                })
                .collect(),
        }
    }

    #[test]
    fn test_category_table_first_seen_order() {
        let mut table = CategoryTable::new();
        assert_eq!(table.get_or_insert("person"), 0);
        assert_eq!(table.get_or_insert("car"), 1);
        assert_eq!(table.get_or_insert("person"), 0);
        assert_eq!(table.get_or_insert("car"), 1);

        let categories = table.to_categories();
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[1].name, "car");
        assert_eq!(categories[1].supercategory, "none");
    }

    #[test]
    fn test_builder_assigns_ids() {
        let mut builder = CocoBuilder::new();
        assert_eq!(builder.commit(&plan(3, &["dog", "cat"])), 2);
        assert_eq!(builder.commit(&plan(1, &[])), 0);
        assert_eq!(builder.commit(&plan(8, &["cat", "bird", "dog"])), 3);

        let coco = builder.build();
        assert_eq!(coco.images.len(), 3);

        let ids: Vec<u64> = coco.annotations.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);

        let category_ids: Vec<u32> = coco.annotations.iter().map(|a| a.category_id).collect();
        assert_eq!(category_ids, vec![0, 1, 1, 2, 0]);

        let dense: Vec<u32> = coco.categories.iter().map(|c| c.id).collect();
        assert_eq!(dense, vec![0, 1, 2]);

        for annotation in &coco.annotations {
            assert_eq!(
                coco.images
                    .iter()
                    .filter(|image| image.id == annotation.image_id)
                    .count(),
                1
            );
            assert_eq!(annotation.area, 200);
        }
    }

    #[test]
    fn test_serialized_layout() {
        let mut builder = CocoBuilder::new();
        builder.commit(&plan(7, &["cat"]));
        let json = serde_json::to_string(&builder.build()).unwrap();

        assert!(json.starts_with(r#"{"images":[{"file_name":"7.jpg","height":480,"width":640,"id":7}],"type":"instances","annotations":"#));
        assert!(json.contains(
            r#"{"area":200,"iscrowd":0,"image_id":7,"bbox":[0,0,10,20],"category_id":0,"id":1,"ignore":0,"segmentation":[]}"#
        ));
        assert!(json.ends_with(r#""categories":[{"supercategory":"none","id":0,"name":"cat"}]}"#));
    }
}
