use anyhow::Context;
use appointment_synth::{summarise, Dataset, DatasetBatches, GeneratorConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = GeneratorConfig::default();
    tracing::info!(seed = config.seed, "starting generation");

    println!("Generating healthcare appointment dataset...");
    let dataset = Dataset::generate(&config).context("Generating dataset")?;
    let batches = DatasetBatches::from_dataset(&dataset)?;

    println!("\nSaving files...");
    let written = batches
        .write_csv_files(&config.output_dir, |path| {
            let name = path.file_name().unwrap_or(path.as_os_str());
            println!("✓ {} created", name.to_string_lossy());
        })
        .context("Writing output files")?;

    let summary = summarise(&batches).await?;
    println!("\n{summary}");

    tracing::info!(files = written.len(), "generation finished");
    Ok(())
}
