use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for focustown")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// fmt, clippy, tests and docs, stopping at the first failure
    Check,
    Fmt,
    Clippy,
    Test,
    Doc,
    /// Drive the CLI through a short session in a throwaway save directory
    Smoke,
}

const FMT: &[&str] = &["fmt", "--all", "--", "--check"];
const CLIPPY: &[&str] = &[
    "clippy",
    "--workspace",
    "--all-targets",
    "--",
    "-D",
    "warnings",
];
const TEST: &[&str] = &["test", "--workspace"];
const DOC: &[&str] = &["doc", "--workspace", "--no-deps"];
const RUN_CLI: &[&str] = &["run", "-q", "-p", "focustown-cli", "--"];

/// CLI invocations for `smoke`, run in order against one save directory.
const SMOKE: &[&[&str]] = &[
    &["info"],
    &["walk", "interact", "down:60", "interact", "left+run:30"],
    &["focus", "home", "25"],
    &["buy", "family_photo"],
    &["place", "family_photo", "home", "100", "100"],
    &["decorations", "home"],
    &["load"],
];

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            for args in [FMT, CLIPPY, TEST, DOC] {
                cargo(args)?;
            }
        }
        Commands::Fmt => cargo(FMT)?,
        Commands::Clippy => cargo(CLIPPY)?,
        Commands::Test => cargo(TEST)?,
        Commands::Doc => cargo(DOC)?,
        Commands::Smoke => smoke()?,
    }

    Ok(())
}

fn cargo(args: &[&str]) -> Result<()> {
    println!("==> cargo {}", args.join(" "));
    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        anyhow::bail!("cargo {} failed", args[0]);
    }
    Ok(())
}

fn smoke() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let save_dir = dir.path().to_string_lossy().into_owned();
    for step in SMOKE {
        let mut args = RUN_CLI.to_vec();
        args.extend(["--save-dir", save_dir.as_str()]);
        args.extend_from_slice(step);
        cargo(&args)?;
    }
    Ok(())
}
