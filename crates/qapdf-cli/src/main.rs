mod commands;
mod output;

use clap::{ArgAction, Args, Parser, Subcommand};
use qapdf_core::config::{BatchOptions, RulesetConfig, ScanOptions};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "qapdf",
    version,
    about = "Mine IMRT QA PDF reports into CSV"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Where rulesets come from; shared by `scan` and `extract`.
#[derive(Args, Debug, Default)]
struct RuleArgs {
    /// Custom JSON ruleset file(s)
    #[arg(short, long = "rules", value_name = "FILE")]
    rules: Vec<PathBuf>,

    /// Directory of JSON rulesets, loaded in file-name order
    #[arg(long = "rules-dir", value_name = "DIR")]
    rules_dir: Option<PathBuf>,

    /// Predefined ruleset(s): sncpatient2020 (default: all presets if no
    /// --rules/--rules-dir/--preset given)
    #[arg(short, long = "preset", value_name = "NAME")]
    preset: Vec<String>,
}

impl From<RuleArgs> for RulesetConfig {
    fn from(args: RuleArgs) -> Self {
        RulesetConfig {
            presets: args.preset,
            rules_dir: args.rules_dir,
            rule_files: args.rules,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Extract every recognised report under a directory into CSV files
    Scan {
        /// Directory to search for reports
        dir: PathBuf,

        /// Output file name; each report type is written to <type>_<name>
        #[arg(long, value_name = "NAME")]
        output_file: Option<String>,

        /// Directory for the CSV files (default: current directory)
        #[arg(long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Only scan the top-level directory
        #[arg(long)]
        no_recursive: bool,

        /// Consider every file, not just *.pdf
        #[arg(long)]
        ignore_extension: bool,

        /// Number of worker threads (default: one per core)
        #[arg(short = 'j', long, value_name = "N")]
        processes: Option<usize>,

        /// Stop at the first file that cannot be read instead of skipping it
        #[arg(long)]
        raise_errors: bool,

        #[command(flatten)]
        rules: RuleArgs,
    },
    /// Identify and extract a single report
    Extract {
        /// Path to PDF file
        input_file: PathBuf,

        #[command(flatten)]
        rules: RuleArgs,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Dump a PDF's indexed text blocks with their positions
    Inspect {
        /// Path to PDF file
        input_file: PathBuf,

        /// Only list blocks containing this text
        #[arg(long, value_name = "TEXT")]
        find: Option<String>,
    },
    /// Manage and inspect rulesets
    Rules {
        #[command(subcommand)]
        action: RulesAction,
    },
}

#[derive(Subcommand)]
enum RulesAction {
    /// List predefined rulesets
    List,
    /// Print the JSON schema with field descriptions and example
    Schema,
    /// Validate a custom rule file
    Validate {
        /// Path to JSON rule file
        file: PathBuf,
    },
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Scan {
            dir,
            output_file,
            output_dir,
            no_recursive,
            ignore_extension,
            processes,
            raise_errors,
            rules,
        } => commands::scan::run(commands::scan::ScanArgs {
            dir,
            output_file,
            output_dir,
            scan: ScanOptions {
                recursive: !no_recursive,
                extension: (!ignore_extension).then(|| "pdf".to_string()),
            },
            batch: BatchOptions {
                workers: processes,
                raise_errors,
            },
            rules: rules.into(),
        }),
        Commands::Extract {
            input_file,
            rules,
            output,
        } => commands::extract::run(&input_file, rules.into(), &output),
        Commands::Inspect { input_file, find } => {
            commands::inspect::run(&input_file, find.as_deref())
        }
        Commands::Rules { action } => match action {
            RulesAction::List => commands::rules::list(),
            RulesAction::Schema => commands::rules::schema(),
            RulesAction::Validate { file } => commands::rules::validate(&file),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
