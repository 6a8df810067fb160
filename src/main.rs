use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use receipt_ingestion::config::{CliConfig, FileConfig};
use receipt_ingestion::draft::{DraftField, LineItemField};
use receipt_ingestion::{
    AppConfig, HttpExtractionClient, HttpSubmissionClient, ImageFile, IngestionManager,
};

#[derive(Parser, Debug)]
#[command(
    name = "receipt-ingest",
    about = "Turn photographed paper receipts into structured receipt records."
)]
struct CliArgs {
    /// Paths of the receipt image(s) to ingest as one receipt.
    #[clap(required = true)]
    pub images: Vec<PathBuf>,

    /// Base URL of the receipt backend (OCR, structuring, persistence).
    #[clap(long)]
    pub api_url: Option<String>,

    /// Bearer token attached to every backend call.
    #[clap(long)]
    pub token: Option<String>,

    /// Path to a TOML config file. File values override CLI arguments.
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Request timeout in seconds.
    #[clap(long, default_value_t = 120)]
    pub timeout_sec: u64,

    /// Edit a draft field after extraction, e.g. --set total_amount=25.00
    #[clap(long = "set", value_name = "FIELD=VALUE")]
    pub set: Vec<String>,

    /// Append a line item after extraction, e.g. --add-item Milk=2.10
    #[clap(long = "add-item", value_name = "NAME=PRICE")]
    pub add_item: Vec<String>,

    /// Edit one line item, e.g. --set-item 0:price=12.50
    #[clap(long = "set-item", value_name = "INDEX:FIELD=VALUE")]
    pub set_item: Vec<String>,

    /// Remove the line item at INDEX. Applied after the other edits.
    #[clap(long = "remove-item", value_name = "INDEX")]
    pub remove_item: Vec<usize>,

    /// Submit the edited draft instead of just printing it.
    #[clap(long)]
    pub submit: bool,
}

fn parse_field_edit(arg: &str) -> Result<(DraftField, &str)> {
    let (key, value) = arg
        .split_once('=')
        .with_context(|| format!("Expected FIELD=VALUE, got: {}", arg))?;
    let field = DraftField::parse(key)
        .with_context(|| format!("Unknown draft field: {} (try store_name, date, total_amount, category, warranty_months)", key))?;
    Ok((field, value))
}

fn parse_item_edit(arg: &str) -> Result<(usize, LineItemField, &str)> {
    let (index, rest) = arg
        .split_once(':')
        .with_context(|| format!("Expected INDEX:FIELD=VALUE, got: {}", arg))?;
    let index: usize = index
        .parse()
        .with_context(|| format!("Invalid line item index: {}", index))?;
    let (key, value) = rest
        .split_once('=')
        .with_context(|| format!("Expected FIELD=VALUE, got: {}", rest))?;
    let field = LineItemField::parse(key)
        .with_context(|| format!("Unknown line item field: {} (try name, price)", key))?;
    Ok((index, field, value))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    let file_config = cli_args
        .config
        .as_deref()
        .map(FileConfig::load)
        .transpose()?;
    let config = AppConfig::resolve(
        &CliConfig {
            api_base_url: cli_args.api_url.clone(),
            bearer_token: cli_args.token.clone(),
            request_timeout_sec: cli_args.timeout_sec,
        },
        file_config,
    )?;

    let extraction = Arc::new(
        HttpExtractionClient::new(
            config.api_base_url.clone(),
            config.bearer_token.clone(),
            config.request_timeout_sec,
        )
        .context("Failed to create extraction client")?,
    );
    let submission = Arc::new(
        HttpSubmissionClient::new(
            config.api_base_url.clone(),
            config.bearer_token.clone(),
            config.request_timeout_sec,
        )
        .context("Failed to create submission client")?,
    );
    let mut manager = IngestionManager::new(extraction, submission, config.pipeline.clone());

    let mut files = Vec::with_capacity(cli_args.images.len());
    for path in &cli_args.images {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read image: {:?}", path))?;
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("receipt")
            .to_string();
        files.push(ImageFile::new(filename, bytes));
    }

    manager
        .select_images(files)
        .await
        .context("Receipt extraction failed")?;

    for edit in &cli_args.set {
        let (field, value) = parse_field_edit(edit)?;
        manager.update_field(field, value)?;
    }
    for item in &cli_args.add_item {
        let (name, price) = item
            .split_once('=')
            .with_context(|| format!("Expected NAME=PRICE, got: {}", item))?;
        manager.add_line_item()?;
        let index = manager
            .draft()
            .map(|d| d.line_items.len() - 1)
            .context("No draft to add line items to")?;
        manager.update_line_item(index, LineItemField::Name, name)?;
        manager.update_line_item(index, LineItemField::Price, price)?;
    }
    for edit in &cli_args.set_item {
        let (index, field, value) = parse_item_edit(edit)?;
        let count = manager.draft().map(|d| d.line_items.len()).unwrap_or(0);
        if index >= count {
            bail!("Line item index {} out of range ({} items)", index, count);
        }
        manager.update_line_item(index, field, value)?;
    }
    for &index in &cli_args.remove_item {
        let count = manager.draft().map(|d| d.line_items.len()).unwrap_or(0);
        if index >= count {
            bail!("Line item index {} out of range ({} items)", index, count);
        }
        manager.remove_line_item(index)?;
    }

    if cli_args.submit {
        let receipt = manager.submit().await.context("Submission failed")?;
        println!("{}", serde_json::to_string_pretty(&receipt)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&manager.snapshot())?);
        manager.close_session();
    }

    Ok(())
}
