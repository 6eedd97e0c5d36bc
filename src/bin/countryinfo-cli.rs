use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "countryinfo-cli")]
#[command(about = "Query a running country info service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Country metadata and cities
    Info {
        /// Two-letter country code, e.g. "no"
        code: String,
        /// Maximum number of cities
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// Population mean and values, optionally limited to a year range
    Population {
        code: String,
        /// Inclusive range such as 2000-2010
        #[arg(short, long)]
        range: Option<String>,
    },
    /// Upstream provider availability, uptime and version
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = format!("{}/countryinfo/v1", cli.url.trim_end_matches('/'));

    let request = match cli.command {
        Commands::Info { code, limit } => {
            let request = client.get(format!("{}/info/{}", base, code));
            match limit {
                Some(limit) => request.query(&[("limit", limit.to_string())]),
                None => request,
            }
        }
        Commands::Population { code, range } => {
            let request = client.get(format!("{}/population/{}", base, code));
            match range {
                Some(range) => request.query(&[("limit", range)]),
                None => request,
            }
        }
        Commands::Status => client.get(format!("{}/status", base)),
    };

    print_response(request.send().await?).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: service returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
