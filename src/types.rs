// Struct to hold processing statistics
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProcessingStats {
    pub total_files_processed: usize,
    pub images_copied: usize,
    pub images_resized: usize,
    pub annotations_written: usize,
    pub skipped_files: usize,
}

impl ProcessingStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_total(&mut self) {
        self.total_files_processed += 1;
    }

    pub fn record_image(&mut self, resized: bool) {
        if resized {
            self.images_resized += 1;
        } else {
            self.images_copied += 1;
        }
    }

    pub fn add_annotations(&mut self, count: usize) {
        self.annotations_written += count;
    }

    pub fn increment_skipped(&mut self) {
        self.skipped_files += 1;
    }

    pub fn print_summary(&self) {
        log::info!("=== Processing Summary ===");
        log::info!("Total files processed: {}", self.total_files_processed);
        log::info!("Images copied unchanged: {}", self.images_copied);
        log::info!("Images resized: {}", self.images_resized);
        log::info!("Annotations written: {}", self.annotations_written);

        if self.skipped_files > 0 {
            log::warn!("Skipped annotation files: {}", self.skipped_files);
        }
    }
}
