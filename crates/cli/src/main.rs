use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use posixopt::{GetOpt, help, tokenize};
use posixopt_schema::CliSchema;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(name = "posixopt")]
#[command(version, about = "Parse command lines against a declarative option schema", long_about = None)]
#[command(disable_help_subcommand = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse arguments against a schema and print the result as JSON
    Parse(ParseArgs),

    /// Print the lexical tokens of an argument vector as JSON
    Tokens(TokensArgs),

    /// Print help text generated from a schema
    Help(HelpArgs),
}

#[derive(Parser)]
struct ParseArgs {
    /// Path to the JSON option schema
    #[arg(short, long, value_name = "FILE")]
    schema: PathBuf,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Arguments to parse, after `--`
    #[arg(last = true, value_name = "ARGS")]
    args: Vec<String>,
}

#[derive(Parser)]
struct TokensArgs {
    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Arguments to tokenize, after `--`
    #[arg(last = true, value_name = "ARGS")]
    args: Vec<String>,
}

#[derive(Parser)]
struct HelpArgs {
    /// Path to the JSON option schema
    #[arg(short, long, value_name = "FILE")]
    schema: PathBuf,

    /// Show help for a single command
    #[arg(value_name = "COMMAND")]
    command: Option<String>,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Parse(args) => parse(args),
        Commands::Tokens(args) => tokens(args),
        Commands::Help(args) => help_text(args),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn load_schema(path: &Path) -> Result<(CliSchema, GetOpt)> {
    let schema = CliSchema::from_file(path)?;
    let getopt = schema
        .build()
        .with_context(|| format!("invalid schema {}", path.display()))?;
    Ok((schema, getopt))
}

fn parse(args: ParseArgs) -> Result<ExitCode> {
    let (_, getopt) = load_schema(&args.schema)?;

    match getopt.parse(&args.args) {
        Ok(input) => {
            print_json(&input, args.pretty)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            tracing::debug!(
                exit_code = err.exit_code(),
                client = err.is_client_error(),
                "parse failed"
            );
            eprintln!("error: {}", err.message());
            Ok(exit_code(err.exit_code()))
        }
    }
}

fn tokens(args: TokensArgs) -> Result<ExitCode> {
    let tokenized = tokenize(&args.args);
    print_json(&tokenized, args.pretty)?;
    Ok(ExitCode::SUCCESS)
}

fn help_text(args: HelpArgs) -> Result<ExitCode> {
    let (schema, getopt) = load_schema(&args.schema)?;
    let meta = schema.help_meta();

    let text = match args.command.as_deref() {
        Some(command) => match help::render_command(&getopt, &meta, command) {
            Some(text) => text,
            None => bail!("unknown command '{command}'"),
        },
        None => help::render(&getopt, &meta),
    };

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    Ok(ExitCode::SUCCESS)
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{json}")?;
    Ok(())
}

/// Exit codes outside `0..=255` cannot be reported faithfully.
fn exit_code(code: i32) -> ExitCode {
    u8::try_from(code)
        .map(ExitCode::from)
        .unwrap_or(ExitCode::FAILURE)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
