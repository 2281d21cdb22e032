use clap::Parser;
use log::{error, info};

use voc2coco::{process_voc_dataset, Args};

fn main() {
    // Initialize the logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    info!("Starting VOC to COCO conversion process...");

    let config = args.to_convert_config();
    match process_voc_dataset(&args, &config) {
        Ok(_) => info!("Conversion process completed successfully."),
        Err(e) => {
            error!("Failed to process dataset: {}", e);
            std::process::exit(1);
        }
    }
}
