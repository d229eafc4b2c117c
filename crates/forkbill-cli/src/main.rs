//! Forkbill CLI — create and inspect receipt-split expenses.
//!
//! Set FORKBILL_API_URL (or API_URL) and optionally FORKBILL_API_KEY.

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;

use forkbill_api_client::ApiClient;
use forkbill_cli::{content_type_for, init_tracing};
use forkbill_core::models::SelectedFile;
use forkbill_core::Config;
use forkbill_processing::{CompressionEnvelope, ReceiptCompressor, ReceiptValidator};
use forkbill_upload::{ReceiptUploadController, GENERIC_FAILURE_MESSAGE};

#[derive(Parser)]
#[command(name = "forkbill", about = "Split a bill from a receipt photo")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a receipt and create a shareable expense
    Create {
        /// Path to the receipt image
        file: std::path::PathBuf,
        /// Name of the person who paid the bill
        #[arg(long)]
        payer: String,
    },
    /// Compress a receipt locally without uploading (dry run)
    Compress {
        /// Path to the receipt image
        file: std::path::PathBuf,
        /// Where to write the compressed JPEG
        #[arg(long)]
        output: std::path::PathBuf,
    },
    /// Fetch an expense by slug or id
    Get {
        /// Expense slug or id
        reference: String,
    },
}

#[derive(Serialize)]
struct CreateOutput {
    routing_ref: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
}

#[derive(Serialize)]
struct CompressOutput {
    original_bytes: usize,
    compressed_bytes: usize,
    max_width: u32,
    max_height: u32,
    quality: f32,
    max_size_kb: u32,
    output: String,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

fn read_receipt(path: &std::path::Path) -> anyhow::Result<SelectedFile> {
    let data = std::fs::read(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("receipt.jpg")
        .to_string();
    let content_type = content_type_for(&filename);
    Ok(SelectedFile::new(data, filename, content_type))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;

    match cli.command {
        Commands::Create { file, payer } => {
            let receipt = read_receipt(&file)?;
            let client = ApiClient::from_config(&config)?;
            let validator = ReceiptValidator::from_config(&config);

            let mut controller = ReceiptUploadController::new(
                client,
                validator,
                Box::new(|routing_ref| {
                    tracing::debug!(routing_ref = %routing_ref, "Expense ready for sharing");
                }),
            );
            controller.set_payer_name(&payer);
            controller.select_file(receipt);
            if let Some(err) = controller.error() {
                anyhow::bail!("{}", err);
            }

            match controller.submit().await {
                Some(routing_ref) => {
                    let url = config.share_url(&routing_ref);
                    print_json(&CreateOutput { routing_ref, url })?;
                }
                None => {
                    anyhow::bail!(
                        "{}",
                        controller.error().unwrap_or(GENERIC_FAILURE_MESSAGE)
                    );
                }
            }
        }
        Commands::Compress { file, output } => {
            let receipt = read_receipt(&file)?;
            let validator = ReceiptValidator::from_config(&config);
            validator
                .validate_all(&receipt.filename, &receipt.content_type, receipt.size())
                .map_err(|e| anyhow::anyhow!("{}", e))?;

            let envelope = CompressionEnvelope::for_file_size(receipt.size());
            let compressed =
                ReceiptCompressor::compress_async(receipt.data.clone(), envelope).await?;

            std::fs::write(&output, &compressed)
                .with_context(|| format!("Failed to write: {}", output.display()))?;

            print_json(&CompressOutput {
                original_bytes: receipt.size(),
                compressed_bytes: compressed.len(),
                max_width: envelope.max_width,
                max_height: envelope.max_height,
                quality: envelope.quality,
                max_size_kb: envelope.max_size_kb,
                output: output.display().to_string(),
            })?;
        }
        Commands::Get { reference } => {
            let client = ApiClient::from_config(&config)?;
            let expense = client.get_expense(&reference).await?;
            print_json(&expense)?;
        }
    }

    Ok(())
}
