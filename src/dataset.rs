use log::{info, warn};
use std::path::{Path, PathBuf};

use crate::coco::{CocoBuilder, CocoFile};
use crate::config::{Args, ConvertConfig, ErrorPolicy};
use crate::conversion::plan_file;
use crate::error::Result;
use crate::imaging::export_image;
use crate::io::{list_xml_files, setup_output_directory, write_coco_file};
use crate::types::ProcessingStats;
use crate::utils::create_progress_bar;
use crate::voc::VocAnnotation;

/// Converts annotation files one at a time into a single COCO document.
///
/// Owns the category table and the annotation id counter for the whole run.
pub struct Converter {
    config: ConvertConfig,
    image_dir: PathBuf,
    output_dir: PathBuf,
    builder: CocoBuilder,
    stats: ProcessingStats,
}

impl Converter {
    pub fn new(config: ConvertConfig, image_dir: &Path, output_dir: &Path) -> Self {
        Self {
            config,
            image_dir: image_dir.to_path_buf(),
            output_dir: output_dir.to_path_buf(),
            builder: CocoBuilder::new(),
            stats: ProcessingStats::new(),
        }
    }

    /// Convert one annotation file and add it to the document.
    ///
    /// Nothing is added when an error is returned.
    pub fn convert_file(&mut self, xml_path: &Path) -> Result<usize> {
        let annotation = VocAnnotation::from_path(xml_path)?;
        let plan = plan_file(&annotation, &self.config, xml_path)?;

        let source = self.image_dir.join(&plan.file_name);
        let dest = self.output_dir.join(&plan.file_name);
        export_image(&source, &dest, &plan.resize)?;

        let count = self.builder.commit(&plan);
        self.stats.record_image(plan.resize.resized);
        self.stats.add_annotations(count);
        Ok(count)
    }

    /// Convert one file, applying the configured error policy
    pub fn process_file(&mut self, xml_path: &Path) -> Result<()> {
        self.stats.increment_total();
        match self.convert_file(xml_path) {
            Ok(_) => Ok(()),
            Err(e) if self.config.error_policy == ErrorPolicy::Skip => {
                warn!("Skipping {}: {}", xml_path.display(), e);
                self.stats.increment_skipped();
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    pub fn stats(&self) -> &ProcessingStats {
        &self.stats
    }

    /// Finish the run, emitting the categories after all images
    pub fn finish(self) -> (CocoFile, ProcessingStats) {
        (self.builder.build(), self.stats)
    }
}

/// Convert every XML file in `xml_dir`, writing images into `output_dir`
pub fn convert_directory(
    xml_dir: &Path,
    image_dir: &Path,
    output_dir: &Path,
    config: &ConvertConfig,
) -> Result<(CocoFile, ProcessingStats)> {
    setup_output_directory(output_dir)?;
    let xml_files = list_xml_files(xml_dir)?;
    info!("Found {} annotation files in {}", xml_files.len(), xml_dir.display());

    let mut converter = Converter::new(config.clone(), image_dir, output_dir);
    let pb = create_progress_bar(xml_files.len() as u64, "VOC");

    for xml_path in &xml_files {
        let name = xml_path.file_name().unwrap_or_default().to_string_lossy();
        info!("Processing {}", name);
        pb.set_message(name.to_string());

        if let Err(e) = converter.process_file(xml_path) {
            pb.abandon();
            return Err(e);
        }
        pb.inc(1);
    }
    pb.finish_with_message("VOC processing complete");

    Ok(converter.finish())
}

/// Main conversion pipeline driven by the command-line arguments
pub fn process_voc_dataset(args: &Args, config: &ConvertConfig) -> Result<ProcessingStats> {
    let (coco, stats) = convert_directory(&args.xmldir, &args.imagedir, &args.outputdir, config)?;

    info!(
        "Writing {} images, {} annotations and {} categories...",
        coco.images.len(),
        coco.annotations.len(),
        coco.categories.len()
    );
    write_coco_file(&args.output_json(), &coco)?;

    stats.print_summary();
    Ok(stats)
}
