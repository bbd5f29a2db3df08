mod bootstrap;

use anyhow::{Context, Result};
use review_core::settings::Settings;
use review_data::loader;
use review_data::summary::park_summaries;
use review_export::ExportFormat;
use review_ui::app::App;

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("Park Reviews v{} starting", env!("CARGO_PKG_VERSION"));

    let data_path = bootstrap::discover_dataset(&settings.data)
        .with_context(|| format!("dataset not found at {}", settings.data.display()))?;

    // The record collection is built once here and is read-only afterwards.
    let dataset = loader::load_reviews(&data_path)?;
    tracing::info!(
        "Loaded {} reviews from {} ({} without a usable rating, {} without a usable date, {} rows skipped)",
        dataset.records.len(),
        data_path.display(),
        dataset.stats.bad_ratings,
        dataset.stats.bad_dates,
        dataset.stats.skipped_rows,
    );

    // Headless one-shot export: write the summary and exit without the menu.
    if let Some(name) = settings.export.as_deref() {
        let format = ExportFormat::from_name(name)
            .with_context(|| format!("unknown export format: {}", name))?;
        let summaries = park_summaries(&dataset.records);
        let path = format.export(&summaries, &settings.export_dir)?;
        println!("Summary saved to {}", path.display());
        return Ok(());
    }

    let app = App::new(&settings.theme, dataset, settings.export_dir.clone());
    app.run()?;

    Ok(())
}
