//! spapi CLI: request signing, record reconciliation and event journals.

use clap::{Parser, Subcommand};

mod commands;
mod input;
mod output;

use commands::{canonicalize, fingerprint, get, list, parse_report, reconcile, sign, verify};
use input::parse_pair;

#[derive(Parser)]
#[command(name = "spapi")]
#[command(about = "Selling Partner API signing, sync and journal tooling")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign a request and print its Authorization header
    Sign {
        /// Base URI, e.g. https://sellingpartnerapi-eu.amazon.com
        #[arg(long)]
        endpoint: String,
        /// HTTP method
        #[arg(long, default_value = "GET")]
        method: String,
        /// Request path
        #[arg(long, default_value = "/")]
        path: String,
        /// Query parameter (repeatable)
        #[arg(long = "query", value_name = "KEY=VALUE", value_parser = parse_pair)]
        query: Vec<(String, String)>,
        /// Extra header (repeatable)
        #[arg(long = "header", value_name = "NAME=VALUE", value_parser = parse_pair)]
        header: Vec<(String, String)>,
        /// JSON body file (default: {})
        #[arg(long)]
        body: Option<String>,
        /// Signing time as RFC 3339 (default: now)
        #[arg(long)]
        date: Option<String>,
        /// Access key
        #[arg(long, env = "SPAPI_ACCESS_KEY")]
        access_key: String,
        /// Access secret
        #[arg(long, env = "SPAPI_ACCESS_SECRET", hide_env_values = true)]
        access_secret: String,
        /// Also print the canonical request
        #[arg(long)]
        canonical: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Perform a signed GET and print the response payload
    Get {
        /// Request path
        path: String,
        /// Client config file (JSON)
        #[arg(long)]
        config: String,
        /// Query parameter (repeatable)
        #[arg(long = "query", value_name = "KEY=VALUE", value_parser = parse_pair)]
        query: Vec<(String, String)>,
        /// Access key
        #[arg(long, env = "SPAPI_ACCESS_KEY")]
        access_key: String,
        /// Access secret
        #[arg(long, env = "SPAPI_ACCESS_SECRET", hide_env_values = true)]
        access_secret: String,
        /// Request timeout in seconds
        #[arg(long, default_value_t = 30)]
        timeout: u64,
    },
    /// Show canonical record bytes for input JSON
    Canonicalize {
        /// Input JSON file (or stdin if not provided)
        input: Option<String>,
        /// Sort keys at every depth (RFC 8785)
        #[arg(long)]
        deep: bool,
    },
    /// Print the fingerprint of each input record
    Fingerprint {
        /// Input JSON file (or stdin if not provided)
        input: Option<String>,
        /// Sort keys at every depth (RFC 8785)
        #[arg(long)]
        deep: bool,
        /// Field printed next to each fingerprint
        #[arg(long, default_value = "AmazonOrderId")]
        key_field: String,
    },
    /// Reconcile fetched records into a partition's state and journal
    Reconcile {
        /// Input JSON file (or stdin if not provided)
        input: Option<String>,
        /// Partition (selling partner) id
        #[arg(long)]
        partition: String,
        /// State directory
        #[arg(long)]
        state: String,
        /// Event journal file
        #[arg(long)]
        journal: String,
        /// Business key field
        #[arg(long, default_value = "AmazonOrderId")]
        key_field: String,
        /// Ordering field
        #[arg(long, default_value = "LastUpdateDate")]
        ordering_field: String,
        /// Fingerprint with keys sorted at every depth
        #[arg(long)]
        deep: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List events in a journal
    List {
        /// Path to journal file
        journal: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Stop after N events
        #[arg(long)]
        max_events: Option<u64>,
        /// Treat a truncated trailing frame as end of journal
        #[arg(long)]
        permissive: bool,
    },
    /// Verify all event IDs in a journal
    Verify {
        /// Path to journal file
        journal: String,
        /// Exit with error code if any verification fails
        #[arg(long)]
        strict: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Parse a downloaded report document into JSON lines
    ParseReport {
        /// Report file (or stdin if not provided)
        input: Option<String>,
        /// Report type, e.g. GET_MERCHANT_LISTINGS_ALL_DATA
        #[arg(long)]
        report_type: String,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Sign {
            endpoint,
            method,
            path,
            query,
            header,
            body,
            date,
            access_key,
            access_secret,
            canonical,
            json,
        } => sign::run(sign::SignArgs {
            endpoint,
            method,
            path,
            query,
            headers: header,
            body,
            date,
            access_key,
            access_secret,
            canonical,
            json,
        }),
        Commands::Get {
            path,
            config,
            query,
            access_key,
            access_secret,
            timeout,
        } => get::run(path, config, query, access_key, access_secret, timeout),
        Commands::Canonicalize { input, deep } => canonicalize::run(input, deep),
        Commands::Fingerprint {
            input,
            deep,
            key_field,
        } => fingerprint::run(input, deep, key_field),
        Commands::Reconcile {
            input,
            partition,
            state,
            journal,
            key_field,
            ordering_field,
            deep,
            json,
        } => reconcile::run(reconcile::ReconcileArgs {
            input,
            partition,
            state,
            journal,
            key_field,
            ordering_field,
            deep,
            json,
        }),
        Commands::List {
            journal,
            json,
            max_events,
            permissive,
        } => list::run(journal, json, max_events, permissive),
        Commands::Verify {
            journal,
            strict,
            json,
        } => verify::run(journal, strict, json),
        Commands::ParseReport { input, report_type } => parse_report::run(input, report_type),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
