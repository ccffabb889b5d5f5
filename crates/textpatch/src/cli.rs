//! Command-line interface.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{ArgAction, ArgGroup, Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use crate::app::patch::{PatchReport, Patcher};
use crate::app::recipe::{Recipe, resolve_text};
use crate::app::report::{render_diff, render_json, render_summary};
use crate::domain::model::{NoMatchPolicy, PatchSpec, ReplaceMode};
use crate::infra::config::Config;

#[derive(Debug, Parser)]
#[command(
    name = "textpatch",
    author,
    version,
    about = "Replace a literal block of text inside a file, in place",
    long_about = None
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Apply a single replacement to one file
    Apply(ApplyArgs),
    /// Apply every patch listed in a TOML or YAML recipe, in order
    Run(RunArgs),
    /// Print shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Debug, Args)]
#[command(group(ArgGroup::new("needle_source").required(true).args(["needle", "needle_file"])))]
#[command(group(
    ArgGroup::new("replacement_source")
        .required(true)
        .args(["replacement", "replacement_file"])
))]
pub struct ApplyArgs {
    /// File to rewrite
    #[arg(long, short = 'p')]
    pub path: PathBuf,
    /// Literal text to search for
    #[arg(long, allow_hyphen_values = true)]
    pub needle: Option<String>,
    /// Read the needle verbatim from a file
    #[arg(long)]
    pub needle_file: Option<PathBuf>,
    /// Literal text to substitute
    #[arg(long, allow_hyphen_values = true)]
    pub replacement: Option<String>,
    /// Read the replacement verbatim from a file
    #[arg(long)]
    pub replacement_file: Option<PathBuf>,
    /// Replace the first occurrence or all of them
    #[arg(long, value_enum)]
    pub mode: Option<ReplaceMode>,
    /// Behaviour when the needle does not occur
    #[arg(long, value_enum)]
    pub on_no_match: Option<NoMatchPolicy>,
    #[command(flatten)]
    pub output: OutputArgs,
    #[command(flatten)]
    pub write: WriteArgs,
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Recipe file (.toml, .yaml or .yml)
    pub recipe: PathBuf,
    #[command(flatten)]
    pub output: OutputArgs,
    #[command(flatten)]
    pub write: WriteArgs,
}

#[derive(Debug, Clone, Copy, Args)]
pub struct OutputArgs {
    /// Show the diff without writing anything
    #[arg(long)]
    pub dry_run: bool,
    /// Print one JSON object per patch instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Copy, Args)]
pub struct WriteArgs {
    /// Keep a timestamped copy of the original next to it
    #[arg(long)]
    pub backup: bool,
    /// Overwrite the file directly instead of via a temporary file and rename
    #[arg(long)]
    pub no_atomic: bool,
}

/// Execute a parsed command line, writing results to stdout.
pub fn run(cli: Cli) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Commands::Apply(args) => run_apply(args, &Config::load()?, &mut out),
        Commands::Run(args) => run_recipe(args, &Config::load()?, &mut out),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "textpatch", &mut out);
            Ok(())
        }
    }
}

fn run_apply(args: ApplyArgs, config: &Config, out: &mut impl Write) -> Result<()> {
    let cwd = Path::new(".");
    let spec = PatchSpec {
        needle: resolve_text(
            "needle",
            args.needle.as_deref(),
            args.needle_file.as_deref(),
            cwd,
        )?,
        replacement: resolve_text(
            "replacement",
            args.replacement.as_deref(),
            args.replacement_file.as_deref(),
            cwd,
        )?,
        source_path: args.path,
        mode: args.mode.unwrap_or(config.defaults.mode()),
        on_no_match: args.on_no_match.unwrap_or(config.defaults.on_no_match()),
    };

    let patcher = build_patcher(config, args.write, args.output);
    let report = patcher.patch_file(&spec)?;
    emit(&report, args.output, out)
}

fn run_recipe(args: RunArgs, config: &Config, out: &mut impl Write) -> Result<()> {
    let loaded = Recipe::load(&args.recipe)?;
    let specs = loaded.specs(config)?;
    if specs.is_empty() {
        tracing::warn!(recipe = %args.recipe.display(), "recipe lists no patches");
    }

    let patcher = build_patcher(config, args.write, args.output);
    for spec in &specs {
        let report = patcher.patch_file(spec)?;
        emit(&report, args.output, out)?;
    }
    Ok(())
}

fn build_patcher(config: &Config, write: WriteArgs, output: OutputArgs) -> Patcher {
    let mut options = config.write.options();
    options.backup |= write.backup;
    options.atomic &= !write.no_atomic;
    Patcher::new()
        .with_write_options(options)
        .dry_run(output.dry_run)
}

fn emit(report: &PatchReport, output: OutputArgs, out: &mut impl Write) -> Result<()> {
    if output.json {
        writeln!(out, "{}", render_json(&report.outcome)?)?;
        return Ok(());
    }
    if output.dry_run && report.outcome.replaced() {
        write!(out, "{}", render_diff(report))?;
    }
    writeln!(out, "{}", render_summary(&report.outcome))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn apply_requires_a_needle_source() {
        let result = Cli::try_parse_from([
            "textpatch",
            "apply",
            "--path",
            "a.txt",
            "--replacement",
            "X",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn apply_rejects_both_needle_sources() {
        let result = Cli::try_parse_from([
            "textpatch",
            "apply",
            "--path",
            "a.txt",
            "--needle",
            "B",
            "--needle-file",
            "b.txt",
            "--replacement",
            "X",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn apply_writes_summary_line() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("a.txt");
        std::fs::write(&path, "A.B.C")?;

        let cli = Cli::try_parse_from([
            "textpatch",
            "apply",
            "--path",
            path.to_str().unwrap(),
            "--needle",
            "B",
            "--replacement",
            "X",
        ])?;
        let Commands::Apply(args) = cli.command else {
            panic!("expected apply");
        };

        let mut out = Vec::new();
        run_apply(args, &Config::default(), &mut out)?;
        let printed = String::from_utf8(out)?;
        assert!(printed.starts_with("Replacement completed successfully!"));
        assert_eq!(std::fs::read_to_string(&path)?, "A.X.C");
        Ok(())
    }

    #[test]
    fn command_line_flags_override_config_write_options() {
        let config = Config::default();
        let write = WriteArgs {
            backup: true,
            no_atomic: true,
        };
        let output = OutputArgs {
            dry_run: false,
            json: false,
        };
        let patcher = build_patcher(&config, write, output);
        let expected = Patcher::new().with_write_options(crate::infra::fs::WriteOptions {
            atomic: false,
            backup: true,
            backup_suffix: "bak".into(),
        });
        assert_eq!(patcher, expected);
    }
}
