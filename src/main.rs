// Static page snapshot CLI
//
// Fetches one page, inlines its resources and writes the self-contained
// result next to the caller (or into the given directory).

use anyhow::{Context, Result, bail};
use kodegen_tools_static_page::fetcher::fetch_resource;
use kodegen_tools_static_page::{HttpFetcher, SnapshotConfig, snapshot_html};
use url::Url;

const CONFIG_ENV: &str = "STATIC_PAGE_CONFIG";

async fn load_config() -> Result<SnapshotConfig> {
    match std::env::var(CONFIG_ENV) {
        Ok(path) => SnapshotConfig::load(&path)
            .await
            .with_context(|| format!("Failed to load config from {CONFIG_ENV}={path}")),
        Err(_) => Ok(SnapshotConfig::default()),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let Some(target) = args.next() else {
        bail!("usage: kodegen-static-page <url> [output_dir]");
    };
    let output_dir = args.next().unwrap_or_else(|| ".".to_string());

    let location = Url::parse(&target).with_context(|| format!("Invalid URL: {target}"))?;
    let config = load_config().await?;
    let fetcher = HttpFetcher::new(&config).context("Failed to create HTTP client")?;

    let page = fetch_resource(&fetcher, &location, &config)
        .await
        .with_context(|| format!("Failed to fetch {location}"))?;
    // Relative references resolve against where the page actually lives.
    let location = page.url.clone();

    let output = snapshot_html(&page.text(), &location, &fetcher, &config)
        .await
        .context("Failed to render snapshot")?;

    for failure in output
        .report
        .images
        .failures
        .iter()
        .chain(&output.report.stylesheets.failures)
        .chain(&output.report.style_attributes.failures)
        .chain(&output.report.iframes.failures)
    {
        log::warn!(
            "Not inlined: {} {} ({})",
            failure.resource_type,
            failure.url,
            failure.error
        );
    }
    log::info!("{}", output.report);

    let path = output
        .artifact
        .save(&output_dir)
        .await
        .context("Failed to save snapshot")?;
    println!("{}", path.display());
    Ok(())
}
