use anyhow::Result;
use clap::{Parser, Subcommand};
use met_query::{IdSpec, MetClient, MetQuery, QueryOptions};
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Query the Met Museum collection API by classification
#[derive(Parser, Debug)]
#[command(name = "met-query")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Query the Met Museum collection API by classification", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times: -v, -vv, -vvv)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the total number of objects in the collection
    Total,

    /// Query objects by classification, printing one JSON record per line
    Classifications {
        /// Object ids to search: "all", a single id (e.g. "5"), or a
        /// comma/range list (e.g. "1-20,42"). Defaults to the whole
        /// collection.
        #[arg(long)]
        ids: Option<String>,

        /// Limit the number of results returned
        #[arg(long)]
        limit: Option<usize>,

        /// Case-sensitive substring to match against the classification
        #[arg(long)]
        search_string: Option<String>,

        /// Order of date of creation
        #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
        ascending: bool,

        /// Fan fetches out concurrently instead of one at a time
        #[arg(long)]
        concurrent: bool,

        /// Print elapsed time when done
        #[arg(long)]
        debug: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let env_filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("met_query={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Total => {
            let total = MetClient::new().fetch_total().await?;
            println!("Total objects: {}", total);
        }
        Commands::Classifications {
            ids,
            limit,
            search_string,
            ascending,
            concurrent,
            debug,
        } => {
            let start = Instant::now();

            let spec = match ids {
                Some(raw) => raw.parse::<IdSpec>()?,
                None => IdSpec::All,
            };
            let mut options = QueryOptions::new();
            options.limit = limit;
            options.search_string = search_string;
            options.ascending = ascending;

            let query = MetQuery::new(MetClient::new());
            let results = if concurrent {
                query
                    .query_by_classification_concurrent(&spec, &options)
                    .await?
            } else {
                query.query_by_classification(&spec, &options).await?
            };

            for record in &results {
                println!("{}", serde_json::to_string(record)?);
            }

            if debug {
                eprintln!("Time taken: {:.3} seconds", start.elapsed().as_secs_f64());
            }
        }
    }

    Ok(())
}
