use std::path::PathBuf;

use eframe::egui;
use photo_annotate::app::AnnotateApp;
use photo_annotate::EditorConfig;

fn main() -> eframe::Result {
    let (config, config_warning) = EditorConfig::load_or_default();

    env_logger::Builder::new()
        .filter_level(config.log_level.to_level_filter())
        .parse_default_env()
        .init();
    if let Some(warning) = config_warning {
        log::warn!("{warning}");
    }

    let image_path = std::env::args().nth(1).map(PathBuf::from);
    if let Some(ref path) = image_path {
        if !path.exists() {
            eprintln!("File not found: {}", path.display());
            std::process::exit(1);
        }
    }

    let title = match &image_path {
        Some(path) => format!(
            "photo-annotate — {}",
            path.file_name().unwrap_or_default().to_str().unwrap_or("")
        ),
        None => "photo-annotate".to_string(),
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title(&title),
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| Ok(Box::new(AnnotateApp::new(config, image_path)))),
    )
}
