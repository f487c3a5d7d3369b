mod engine;
mod model;
mod ui;

use tracing_subscriber::EnvFilter;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let options = eframe::NativeOptions::default();

    eframe::run_native(
        "Interactive Story Adventure",
        options,
        Box::new(|_cc| Ok(Box::new(ui::app::StoryApp::new()))),
    )
}
