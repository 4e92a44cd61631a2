/*!
Main binary for jsonmatch.
*/

use anyhow::{Context, Result};
use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use clap_complete::generate;
use serde_json::Value;
use std::io::stdout;
use std::io::{self};
use std::{
    fs::{self},
    io::{IsTerminal, Read},
    path::{Path, PathBuf},
};

use jsonmatch::filter::decode::decode;
use jsonmatch::filter::matcher::matches;
use jsonmatch::filter::Filter;
use jsonmatch::{commands, utils};

/// Match JSON documents against a jsonmatch filter.
#[derive(Parser)]
#[command(name = "jm", version, about, arg_required_else_help = true, long_about = None, disable_help_subcommand = true)]
struct Args {
    /// Optional subcommands
    #[command(subcommand)]
    command: Option<Commands>,
    /// Filter as inline JSON (e.g., '{"filterType":"present","field":"x"}')
    /// or a path to a file containing the filter JSON
    filter: Option<String>,
    #[arg(value_name = "FILE")]
    /// Optional path to a JSON file of candidate documents (a single
    /// object, or an array of objects). If omitted, reads from STDIN
    input: Option<PathBuf>,
    /// Do not pretty-print the JSON output, instead use compact
    #[arg(long, action = ArgAction::SetTrue)]
    compact: bool,
    /// Display count of matched documents
    #[arg(long, action = ArgAction::SetTrue)]
    count: bool,
    /// Do not display matched documents
    #[arg(short, long, action = ArgAction::SetTrue)]
    no_display: bool,
    #[command(flatten)]
    verbosity: clap_verbosity_flag::Verbosity,
}

/// Available subcommands for `jm`
#[derive(Subcommand)]
enum Commands {
    #[command(subcommand)]
    /// Generate additional documentation and/or completions
    Generate(GenerateCommand),
}

/// Generate shell completions and man page
#[derive(Subcommand)]
enum GenerateCommand {
    /// Generate shell completions for the given shell to stdout.
    Shell { shell: clap_complete::Shell },
    /// Generate a man page for jm to output directory if specified, else
    /// the current directory.
    Man {
        /// The output directory to write the man pages.
        #[clap(short, long)]
        output_dir: Option<PathBuf>,
    },
}

/// Entry point for main binary.
///
/// This parses the command line arguments, decodes the filter, and
/// evaluates it against the candidate documents. If the input is piped in,
/// it reads from STDIN. The output is printed to STDOUT, with formatting
/// determined by the command line arguments.
fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbosity.log_level_filter())
        .init();

    match args.command {
        Some(Commands::Generate(cmd)) => match cmd {
            GenerateCommand::Shell { shell } => {
                let mut cmd = Args::command();
                generate(shell, &mut cmd, "jm", &mut stdout().lock())
            }
            GenerateCommand::Man { output_dir } => {
                commands::generate::generate_man_pages(
                    &Args::command(),
                    output_dir,
                )?
            }
        },
        None => {
            // Decode filter
            let filter_arg = args.filter.ok_or_else(|| {
                anyhow::anyhow!("Filter required unless using subcommand")
            })?;
            let filter = load_filter(&filter_arg)
                .with_context(|| "Failed to decode filter")?;
            log::debug!("decoded filter: {filter}");

            // Parse input content
            let input_content = if let Some(path) = args.input {
                fs::read_to_string(&path).with_context(|| {
                    format!("Failed to read file {path:?}")
                })?
            } else {
                if io::stdin().is_terminal() {
                    // No piped input and no file specified
                    let mut cmd = Args::command();
                    return Ok(cmd.print_help()?);
                }
                let mut buffer = String::new();
                io::stdin().read_to_string(&mut buffer)?;
                buffer
            };
            let json: Value = serde_json::from_str(&input_content)
                .with_context(|| "Failed to parse JSON")?;

            // Evaluate: a top-level array is a stream of candidates, any
            // other value is a single candidate.
            let candidates: Vec<(Option<usize>, &Value)> = match &json {
                Value::Array(docs) => {
                    docs.iter().enumerate().map(|(i, d)| (Some(i), d)).collect()
                }
                doc => vec![(None, doc)],
            };
            let total = candidates.len();
            let matched: Vec<(Option<usize>, &Value)> = candidates
                .into_iter()
                .filter(|(_, doc)| matches(&filter, doc))
                .collect();
            log::info!("matched {}/{} documents", matched.len(), total);

            // Display output
            if args.count {
                println!("Matched documents: {}", matched.len());
            }

            if !args.no_display {
                let mut out = stdout().lock();
                for (index, doc) in &matched {
                    utils::write_colored_match(
                        &mut out,
                        doc,
                        *index,
                        !args.compact,
                    )?;
                }
            }
        }
    }

    Ok(())
}

/// Loads the filter from the positional argument: a path to a filter file
/// if one exists at that location, otherwise inline filter JSON.
fn load_filter(arg: &str) -> Result<Filter> {
    let text = if Path::new(arg).is_file() {
        fs::read_to_string(arg)
            .with_context(|| format!("Failed to read filter file {arg:?}"))?
    } else {
        arg.to_owned()
    };
    let value: Value = serde_json::from_str(&text)
        .with_context(|| "Failed to parse filter JSON")?;
    Ok(decode(&value)?)
}
