//! sales-report - car sales summary mailer
//!
//! Loads car sales records from a JSON file, computes the top-revenue
//! model, the best-selling model and the most popular model year, renders
//! a PDF report and emails it over plain SMTP.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Configuration or usage error
//!   2 - Input error (unreadable file, malformed data, no records, bad address)
//!   3 - PDF rendering error
//!   4 - Attachment error
//!   5 - SMTP transport error

mod analysis;
mod cli;
mod config;
mod error;
mod loader;
mod models;
mod notify;
mod report;

use analysis::PriceFormat;
use anyhow::{Context, Result};
use cli::Args;
use config::Config;
use error::ReportError;
use notify::{MessagePolicy, SmtpSettings};
use report::ReportDocument;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, error, info};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(error::EXIT_CONFIG);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args);

    info!("sales-report v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run_report(args).await {
        error!("Report failed: {}", e);
        eprintln!("\n❌ Error: {}", e);
        print_error_sources(&e);
        std::process::exit(error::exit_code_for(&e));
    }

    Ok(())
}

/// Handle --init-config: generate a default .sales-report.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(config::DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            config::DEFAULT_CONFIG_FILE
        );
        std::process::exit(error::EXIT_CONFIG);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", config::DEFAULT_CONFIG_FILE))?;

    println!(
        "✅ Created {} with default settings.",
        config::DEFAULT_CONFIG_FILE
    );
    println!("   Edit it to customize the input file, price format, sender and SMTP server.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Warning: failed to install log subscriber: {}", e);
    }
}

fn print_error_sources(error: &anyhow::Error) {
    for cause in error.chain().skip(1) {
        eprintln!("  caused by: {}", cause);
    }
}

/// Run the load, summarize, render and email steps.
async fn run_report(args: Args) -> Result<()> {
    let start_time = Instant::now();

    let mut config = Config::resolve(
        args.config.as_deref(),
        Path::new(config::DEFAULT_CONFIG_FILE),
    )?;
    config.merge_with_args(&args);
    config.validate()?;

    let price_format = PriceFormat::from(&config.price);
    let input_path = PathBuf::from(&config.input.path);
    let output_path = PathBuf::from(&config.report.output);

    // Step 1: Load the sales data
    println!("📥 Loading sales data: {}", input_path.display());
    let records = loader::load_data(&input_path).context("Failed to load sales data")?;

    // Step 2: Summarize
    let summary = analysis::process_data(&records, &price_format)
        .context("Failed to summarize sales data")?;
    let lines = summary.lines(&price_format.currency_symbol);
    debug!("Sales by year: {:?}", summary.sales_by_year);

    println!("\n📊 Summary:");
    for line in &lines {
        println!("   {}", line);
    }

    // Step 3: Render the PDF report
    println!("\n📝 Rendering report...");
    let fonts_dir = config.report.fonts_dir.as_deref().map(Path::new);
    let fonts = report::fonts::load_font_family(fonts_dir)?;
    let document = ReportDocument::new(
        config.report.title.clone(),
        lines.clone(),
        analysis::cars_to_table(&records),
    );
    let pdf = report::render_pdf(&document, fonts)?;
    report::write_pdf(&output_path, &pdf)?;
    info!("Report written to {}", output_path.display());
    println!("   Saved {} ({} bytes)", output_path.display(), pdf.len());

    // Step 4: Compose the email
    let user = std::env::var("USER").ok();
    let policy = MessagePolicy {
        sender: config.email.sender.clone(),
        recipient: notify::recipient_address(&config.email.recipient, user.as_deref())?,
        subject: config.email.subject.clone(),
        body: lines.join("\n"),
    };
    let message = notify::build_message(&policy, Some(&output_path))?;
    debug!(
        "Composed message from {} with subject {:?}",
        message.sender(),
        message.subject()
    );

    if args.dry_run {
        // Validate the MIME form even though nothing is sent.
        message.to_mime()?;
        println!("\n🔍 Dry run: email composed but not sent");
        println!("   From: {}", message.sender());
        println!("   To: {}", message.recipient());
        println!("   Subject: {}", message.subject());
        if let Some(attachment) = message.attachment() {
            println!(
                "   Attachment: {} ({}, {} bytes)",
                attachment.filename,
                attachment.content_type,
                attachment.bytes.len()
            );
        }
        println!("\n✅ Dry run complete.");
        return Ok(());
    }

    // Step 5: Send
    let server = config.smtp.server.clone().ok_or_else(|| {
        ReportError::Config("no SMTP server given; pass SERVER or set smtp.server".to_string())
    })?;
    let settings =
        SmtpSettings::from_address(&server, Duration::from_secs(config.smtp.timeout_seconds))?
            .with_progress(!args.quiet);

    println!("\n📧 Sending report to {}...", message.recipient());
    notify::send_message(&message, &settings).await?;

    println!(
        "\n✅ Report sent to {} via {} in {:.1}s",
        message.recipient(),
        settings.display_address(),
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}
