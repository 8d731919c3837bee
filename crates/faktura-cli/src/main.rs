mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "faktura",
    version,
    about = "Invoice analyzer: discount and effective-rate calculator"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract and normalize the invoice table (without computing economics)
    Extract {
        /// Path to PDF invoice
        input_file: PathBuf,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Write the extraction report to a JSON file
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,

        /// Manual column mapping, e.g. --map price="Unit Rate"
        /// (roles: item, price, paid, free)
        #[arg(short, long = "map", value_name = "ROLE=COLUMN")]
        map: Vec<String>,
    },
    /// Analyze an invoice: detect columns, apply a discount, compute
    /// effective rates
    Analyze {
        /// Path to PDF invoice
        input_file: PathBuf,

        /// Discount percentage, 0-100
        #[arg(short, long, default_value_t = 13.0)]
        discount: f64,

        /// Manual column mapping, e.g. --map price="Unit Rate"
        /// (roles: item, price, paid, free)
        #[arg(short, long = "map", value_name = "ROLE=COLUMN")]
        map: Vec<String>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Write the enriched table to an .xlsx workbook
        #[arg(long, value_name = "FILE")]
        xlsx: Option<PathBuf>,

        /// Write the enriched table as CSV
        #[arg(long, value_name = "FILE")]
        csv: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Extract {
            input_file,
            output,
            out,
            map,
        } => commands::extract::run(input_file, &output, out, map),
        Commands::Analyze {
            input_file,
            discount,
            map,
            output,
            xlsx,
            csv,
        } => commands::analyze::run(input_file, discount, map, &output, xlsx, csv),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
