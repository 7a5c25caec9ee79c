use anyhow::Result;
use tlrscraper::{
    config::{ExportSettings, Target},
    runner::{self, Outcome},
};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tlrscraper=info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    // ─── 2) scrape, then export; only export failures end the run in error
    let outcome = runner::run(&Target::default(), &ExportSettings::default()).await?;

    if let Outcome::Exported { rows } = outcome {
        info!(rows, "all done");
    }
    Ok(())
}
