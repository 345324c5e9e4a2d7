use clap::{ArgAction, Parser as ClapParser, Subcommand};
use jsonpath_transform::cli::{self, CliError, RunOptions};
use jsonpath_transform::{AbsentPolicy, TransformOptions};
use std::io::{self, Read};
use tracing::Level;

#[derive(ClapParser)]
#[command(name = "jpt")]
#[command(about = "jpt - Reshape JSON documents with JSONPath templates")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// JSON file with transform options
    #[arg(long, global = true)]
    config: Option<String>,

    /// Regular expression marking strings and keys as queries
    /// (default `\$\.`; `\$\.|^\$\[|^\$$` also accepts `$[..]` and `$`)
    #[arg(long, global = true)]
    trigger: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Transform a JSON document with a specification
    Run {
        /// Specification file, or inline specification JSON
        spec: String,

        /// JSON input (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,

        /// Drop fields whose query matched nothing instead of writing null
        #[arg(long)]
        omit_absent: bool,
    },

    /// Show how each node of a specification is interpreted
    Check {
        /// Specification file, or inline specification JSON
        spec: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    let mut options = match &cli.config {
        Some(path) => TransformOptions::from_path(path)?,
        None => TransformOptions::default(),
    };
    if let Some(trigger) = cli.trigger {
        options.trigger = trigger;
    }

    match cli.command {
        Commands::Run {
            spec,
            input,
            pretty,
            omit_absent,
        } => {
            if omit_absent {
                options.absent = AbsentPolicy::Omit;
            }
            let options = RunOptions {
                spec,
                input: read_input(input)?,
                pretty,
                transform: options,
            };
            println!("{}", cli::execute_run(&options)?);
        }
        Commands::Check { spec } => {
            let trigger = options.trigger()?;
            print!("{}", cli::execute_check(&spec, &trigger)?);
        }
    }
    Ok(())
}

fn read_input(input: Option<String>) -> Result<Option<String>, CliError> {
    Ok(match input {
        Some(s) => Some(s),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Some(buffer)
        }
        None => None,
    })
}
