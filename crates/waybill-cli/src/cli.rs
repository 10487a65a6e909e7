use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "waybill",
    about = "Waybill: package audit trails on an indexed ledger",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Ledger node URL (overrides the config file)
    #[arg(long, global = true, env = "IOTA_NODE_URL")]
    pub node_url: Option<String>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP API server
    Serve(ServeArgs),
    /// Generate package IDs without writing anything
    NewId(NewIdArgs),
    /// Show the ledger index a package's records are tagged with
    IndexKey(IndexKeyArgs),
    /// Record a status update directly on the ledger
    Track(TrackArgs),
    /// Show a package's audit trail
    History(HistoryArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,
    /// Listen address, e.g. 0.0.0.0:3000 (overrides PORT)
    #[arg(long)]
    pub bind: Option<String>,
    /// Explorer base URL used for tracking links
    #[arg(long)]
    pub explorer_url: Option<String>,
    /// Serve from an in-memory ledger instead of a node
    #[arg(long)]
    pub in_memory: bool,
}

#[derive(Args)]
pub struct NewIdArgs {
    #[arg(short = 'n', long, default_value = "1")]
    pub count: usize,
}

#[derive(Args)]
pub struct IndexKeyArgs {
    pub package_id: String,
}

#[derive(Args)]
pub struct TrackArgs {
    pub package_id: String,
    #[arg(short, long)]
    pub status: String,
    #[arg(short, long)]
    pub location: String,
}

#[derive(Args)]
pub struct HistoryArgs {
    pub package_id: String,
}
