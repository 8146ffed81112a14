use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use folio_sdk::{Area, ConflictStrategy};

#[derive(Parser)]
#[command(name = "folio", about = "Folio: versioned documents with a staging area", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding the repository documents
    #[arg(long, global = true, default_value = ".folio")]
    pub store: PathBuf,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show staged and unstaged changes of the working tree
    Status(StatusArgs),
    /// Stage paths for the next commit
    Add(AddArgs),
    /// Unstage paths
    Reset(ResetArgs),
    /// Commit the staged changes
    Commit(CommitArgs),
    /// Show commit history
    Log(LogArgs),
    /// Show a line diff of one file against head
    Diff(DiffArgs),
    /// Write a file
    Write(WriteArgs),
    /// Create a folder
    Mkdir(PathArgs),
    /// Remove a file or folder
    Rm(PathArgs),
    /// List a folder
    Ls(LsArgs),
    /// Copy Workspace entries into the working tree
    CopyToWorking(CopyToWorkingArgs),
    /// Copy working tree entries into the Workspace
    CopyToWorkspace(CopyArgs),
    /// Search file names and contents
    Search(SearchArgs),
}

#[derive(Args)]
pub struct StatusArgs {}

#[derive(Args)]
pub struct AddArgs {
    pub paths: Vec<String>,
    /// Stage every current change
    #[arg(short, long)]
    pub all: bool,
}

#[derive(Args)]
pub struct ResetArgs {
    pub paths: Vec<String>,
    /// Clear the staged set
    #[arg(short, long)]
    pub all: bool,
}

#[derive(Args)]
pub struct CommitArgs {
    #[arg(short, long)]
    pub message: String,
    #[arg(short, long)]
    pub description: Option<String>,
}

#[derive(Args)]
pub struct LogArgs {
    #[arg(short = 'n', long, default_value = "20")]
    pub limit: usize,
    #[arg(long)]
    pub oneline: bool,
}

#[derive(Args)]
pub struct DiffArgs {
    pub path: String,
}

#[derive(Args)]
pub struct WriteArgs {
    pub path: String,
    pub content: String,
    /// workspace (ws) or working (wt)
    #[arg(short, long, default_value = "working")]
    pub area: Area,
}

#[derive(Args)]
pub struct PathArgs {
    pub path: String,
    #[arg(short, long, default_value = "working")]
    pub area: Area,
}

#[derive(Args)]
pub struct LsArgs {
    #[arg(default_value = "")]
    pub path: String,
    #[arg(short, long, default_value = "working")]
    pub area: Area,
}

#[derive(Args)]
pub struct CopyArgs {
    #[arg(required = true)]
    pub paths: Vec<String>,
}

#[derive(Args)]
pub struct CopyToWorkingArgs {
    #[arg(required = true)]
    pub paths: Vec<String>,
    /// keep-both, overwrite or skip
    #[arg(long, default_value = "keep-both")]
    pub on_conflict: ConflictStrategy,
}

#[derive(Args)]
pub struct SearchArgs {
    pub query: String,
    #[arg(short, long, default_value = "workspace")]
    pub area: Area,
    #[arg(long)]
    pub case_sensitive: bool,
    #[arg(short, long)]
    pub word: bool,
    #[arg(short, long)]
    pub regex: bool,
    /// Comma-separated globs of files to search
    #[arg(long, default_value = "")]
    pub include: String,
    /// Comma-separated globs to skip
    #[arg(long, default_value = "")]
    pub exclude: String,
}
