use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "pagedrop",
    about = "pagedrop: paste HTML, get a short share link",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP server
    Serve(ServeArgs),
    /// Store a file's contents and print its identifier
    Put(PutArgs),
    /// Print the payload stored under an identifier
    Get(GetArgs),
    /// Delete the payload stored under an identifier
    Rm(RmArgs),
    /// Print the identifier derived from some input
    Hash(HashArgs),
    /// Show chunk count and length of a stored payload
    Inspect(InspectArgs),
    /// Print the effective configuration
    Config,
}

#[derive(Args)]
pub struct ServeArgs {
    #[arg(long)]
    pub bind: Option<SocketAddr>,
    #[arg(long)]
    pub public_url: Option<String>,
}

#[derive(Args)]
pub struct PutArgs {
    pub file: PathBuf,
    /// Store under this identifier instead of a derived one
    #[arg(long)]
    pub id: Option<String>,
}

#[derive(Args)]
pub struct GetArgs {
    pub identifier: String,
}

#[derive(Args)]
pub struct RmArgs {
    pub identifier: String,
}

#[derive(Args)]
pub struct HashArgs {
    pub input: String,
    /// Derive as a page title rather than as content
    #[arg(long)]
    pub title: bool,
}

#[derive(Args)]
pub struct InspectArgs {
    pub identifier: String,
}
