use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use tracing::debug;

use folio_sdk::{
    ChangeRecord, ChangeStatus, ContentDiff, FileKind, FileKvStore, Folio, FolioConfig,
    Line, SearchOptions,
};

use crate::cli::*;

/// Config file looked up inside the store directory when `--config` is absent.
const STORE_CONFIG: &str = "folio.toml";

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let mut repo = open_repo(&cli.store, cli.config.as_deref())?;
    match cli.command {
        Command::Status(_) => cmd_status(&repo),
        Command::Add(args) => cmd_add(&mut repo, args),
        Command::Reset(args) => cmd_reset(&mut repo, args),
        Command::Commit(args) => cmd_commit(&mut repo, args),
        Command::Log(args) => cmd_log(&repo, args),
        Command::Diff(args) => cmd_diff(&repo, args),
        Command::Write(args) => {
            repo.write_file(args.area, &args.path, &args.content)?;
            println!("{} Wrote {} ({})", "✓".green(), args.path.bold(), args.area);
            Ok(())
        }
        Command::Mkdir(args) => {
            repo.create_folder(args.area, &args.path)?;
            println!("{} Created {}/ ({})", "✓".green(), args.path.bold(), args.area);
            Ok(())
        }
        Command::Rm(args) => {
            let removed = repo.remove(args.area, &args.path)?;
            println!("{} Removed {} ({} entries)", "✓".green(), args.path.bold(), removed);
            Ok(())
        }
        Command::Ls(args) => cmd_ls(&repo, args),
        Command::CopyToWorking(args) => {
            let report = repo.move_to_working_tree(&args.paths, args.on_conflict)?;
            print_transfer(&report);
            Ok(())
        }
        Command::CopyToWorkspace(args) => {
            let report = repo.move_to_workspace(&args.paths)?;
            print_transfer(&report);
            Ok(())
        }
        Command::Search(args) => cmd_search(&repo, args),
    }
}

fn open_repo(store: &Path, config: Option<&Path>) -> anyhow::Result<Folio> {
    let config = match config {
        Some(path) => FolioConfig::load(path)?,
        None => FolioConfig::load_or_default(&store.join(STORE_CONFIG))?,
    };
    let kv = FileKvStore::open(store)
        .with_context(|| format!("opening store at {}", store.display()))?;
    debug!(store = %store.display(), "opening repository");
    Ok(Folio::open(Arc::new(kv), config)?)
}

fn status_label(change: &ChangeRecord) -> colored::ColoredString {
    let label = |s: &str| format!("{s:<11}");
    match change.status {
        ChangeStatus::Added => label("added:").green(),
        ChangeStatus::Modified => label("modified:").yellow(),
        ChangeStatus::Deleted => label("deleted:").red(),
        ChangeStatus::Untracked => label("untracked:").dimmed(),
    }
}

fn cmd_status(repo: &Folio) -> anyhow::Result<()> {
    let state = repo.state();
    println!("On branch {}", state.current_branch.yellow().bold());
    if state.ahead_count > 0 || state.behind_count > 0 {
        println!("  ahead {}, behind {}", state.ahead_count, state.behind_count);
    }

    let status = repo.status();
    if status.is_clean() {
        println!("\nNothing to commit. Working tree clean.");
        return Ok(());
    }
    if !status.staged.is_empty() {
        println!("\nChanges to be committed:");
        for change in &status.staged {
            println!("  {} {}", status_label(change), change.path);
        }
    }
    if !status.unstaged.is_empty() {
        println!("\nChanges not staged for commit:");
        for change in &status.unstaged {
            println!("  {} {}", status_label(change), change.path);
        }
    }
    Ok(())
}

fn cmd_add(repo: &mut Folio, args: AddArgs) -> anyhow::Result<()> {
    if args.all {
        let count = repo.stage_all()?;
        println!("{} {} paths staged", "✓".green(), count);
        return Ok(());
    }
    if args.paths.is_empty() {
        anyhow::bail!("nothing specified; pass paths or --all");
    }
    for path in &args.paths {
        repo.stage(path)?;
        println!("  {} {}", "staged:".green(), path);
    }
    Ok(())
}

fn cmd_reset(repo: &mut Folio, args: ResetArgs) -> anyhow::Result<()> {
    if args.all {
        let count = repo.unstage_all()?;
        println!("{} {} paths unstaged", "✓".green(), count);
        return Ok(());
    }
    if args.paths.is_empty() {
        anyhow::bail!("nothing specified; pass paths or --all");
    }
    for path in &args.paths {
        repo.unstage(path)?;
        println!("  {} {}", "unstaged:".yellow(), path);
    }
    Ok(())
}

fn cmd_commit(repo: &mut Folio, args: CommitArgs) -> anyhow::Result<()> {
    let commit = repo.commit(&args.message, args.description.as_deref())?;
    println!("{} Committed {}", "✓".green().bold(), commit.id.short_id().yellow());
    println!("  {}", commit.message);
    println!("  {} files changed", commit.changed.len());
    Ok(())
}

fn cmd_log(repo: &Folio, args: LogArgs) -> anyhow::Result<()> {
    let commits = repo.log(args.limit);
    if commits.is_empty() {
        println!("No commits yet.");
        return Ok(());
    }
    for commit in commits {
        if args.oneline {
            println!("{} {}", commit.id.short_id().yellow(), commit.message);
            continue;
        }
        println!("{} {}", "commit".yellow(), commit.id.to_string().yellow());
        println!("Author: {}", commit.author);
        println!("Date:   {}", commit.timestamp.format("%Y-%m-%d %H:%M:%S UTC"));
        println!("\n    {}", commit.message);
        if let Some(description) = &commit.description {
            println!("\n    {}", description);
        }
        println!();
    }
    Ok(())
}

fn print_diff(path: &str, diff: &ContentDiff) {
    println!("{}", format!("--- a/{path}").bold());
    println!("{}", format!("+++ b/{path}").bold());
    for hunk in &diff.hunks {
        println!("{}", hunk.header().cyan());
        for line in &hunk.lines {
            let text = format!("{}{}", line.marker(), line.text());
            match line {
                Line::Added(_) => println!("{}", text.green()),
                Line::Removed(_) => println!("{}", text.red()),
                Line::Context(_) => println!("{}", text),
            }
        }
    }
}

fn cmd_diff(repo: &Folio, args: DiffArgs) -> anyhow::Result<()> {
    let diff = repo.file_diff(&args.path)?;
    if diff.is_empty() {
        println!("No changes.");
        return Ok(());
    }
    print_diff(&args.path, &diff);
    Ok(())
}

fn cmd_ls(repo: &Folio, args: LsArgs) -> anyhow::Result<()> {
    for entry in repo.list(args.area, &args.path)? {
        match entry.kind {
            FileKind::Folder => println!("{}/", entry.path.blue().bold()),
            FileKind::File => println!("{}", entry.path),
        }
    }
    Ok(())
}

fn print_transfer(report: &folio_sdk::TransferReport) {
    for t in &report.transferred {
        if t.source == t.target {
            println!("  {} {}", "copied:".green(), t.target);
        } else {
            println!("  {} {} -> {}", "copied:".green(), t.source, t.target);
        }
    }
    for path in &report.skipped {
        println!("  {} {} (exists)", "skipped:".yellow(), path);
    }
    for failure in &report.failures {
        println!("  {} {}: {}", "failed:".red(), failure.path, failure.error);
    }
}

fn cmd_search(repo: &Folio, args: SearchArgs) -> anyhow::Result<()> {
    let options = SearchOptions {
        case_sensitive: args.case_sensitive,
        whole_word: args.word,
        use_regex: args.regex,
        include_pattern: args.include,
        exclude_pattern: args.exclude,
    };
    let results = repo.search(args.area, &args.query, &options);
    if results.is_empty() {
        println!("No matches.");
        return Ok(());
    }
    for result in &results {
        println!("{}", result.file.bold());
        for m in &result.matches {
            if m.line == folio_sdk::FILE_NAME_LINE {
                println!("  {} {}", "name:".dimmed(), m.preview);
            } else {
                println!("  {}:{} {}", m.line.to_string().yellow(), m.column, m.preview);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_repo_seeds_store_directory() {
        let dir = tempfile::tempdir().unwrap();
        let repo = open_repo(dir.path(), None).unwrap();
        assert!(repo.workspace().contains("README.md"));
        assert!(dir.path().join("workspace.json").exists());
    }

    #[test]
    fn commands_share_state_through_the_store() {
        let dir = tempfile::tempdir().unwrap();
        let run = |args: &[&str]| {
            let mut argv = vec!["folio", "--store", dir.path().to_str().unwrap()];
            argv.extend_from_slice(args);
            run_command(<Cli as clap::Parser>::try_parse_from(argv).unwrap())
        };
        run(&["write", "a.md", "# A"]).unwrap();
        run(&["add", "a.md"]).unwrap();
        run(&["commit", "-m", "first"]).unwrap();

        let repo = open_repo(dir.path(), None).unwrap();
        assert_eq!(repo.log(1)[0].message, "first");
        assert!(repo.status().is_clean());
        assert!(run(&["add"]).is_err());
    }

    #[test]
    fn explicit_missing_config_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(open_repo(dir.path(), Some(&dir.path().join("nope.toml"))).is_err());
    }
}
