use clap::Parser;
use txn_loadgen::core::dashboard::DEFAULT_OUTPUT_FILE;
use txn_loadgen::utils::logger;
use txn_loadgen::{write_dashboard, DashboardSpec, LocalStorage};

#[derive(Parser)]
#[command(name = "grafana-dashboard")]
#[command(about = "Generates the API monitoring dashboard JSON for Grafana")]
struct Args {
    /// File name of the generated dashboard
    #[arg(short, long, default_value = DEFAULT_OUTPUT_FILE)]
    output: String,

    /// Directory the dashboard is written into
    #[arg(long, default_value = ".")]
    output_dir: String,

    /// Optional TOML file overriding dashboard metadata or panels
    #[arg(short, long)]
    config: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    logger::init_cli_logger(args.verbose);

    let spec = match &args.config {
        Some(path) => {
            tracing::info!("📁 Loading dashboard definition from: {}", path);
            match DashboardSpec::from_file(path) {
                Ok(spec) => spec,
                Err(e) => {
                    eprintln!("❌ Failed to load config file '{}': {}", path, e);
                    eprintln!("💡 Make sure the file exists and is valid TOML format");
                    std::process::exit(1);
                }
            }
        }
        None => DashboardSpec::default(),
    };

    let storage = LocalStorage::new(args.output_dir.clone());
    let written = write_dashboard(&storage, &spec, &args.output).await?;

    tracing::info!("Dashboard has {} panels", spec.panels.len());
    println!(
        "Dashboard JSON generated successfully and saved to '{}'",
        written
    );

    Ok(())
}
