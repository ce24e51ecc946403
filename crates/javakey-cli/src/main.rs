use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use javakey::{Event, Recorder};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "javakey", version, about = "Decode and check Java binding keys")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode keys into their production sequence
    Parse(ParseArgs),
    /// Check keys for well-formedness
    Validate(ValidateArgs),
}

#[derive(Args)]
struct ParseArgs {
    /// Binding keys, e.g. `Ljava.lang.Object;`
    #[arg(required = true)]
    keys: Vec<String>,
    /// Emit JSON suitable for CI
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ValidateArgs {
    /// Binding keys to check
    #[arg(required = true)]
    keys: Vec<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let exit_code = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{:#}", err);
            2
        }
    };

    std::process::exit(exit_code);
}

#[derive(Serialize)]
struct KeyReport {
    key: String,
    has_type_name: bool,
    malformed: bool,
    events: Vec<Event>,
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Command::Parse(args) => {
            let mut exit = 0;
            let mut reports = Vec::with_capacity(args.keys.len());
            for key in &args.keys {
                let parsed = javakey::parse(key, Recorder::default());
                if parsed.malformed {
                    exit = 1;
                }
                reports.push(KeyReport {
                    key: key.clone(),
                    has_type_name: parsed.has_type_name,
                    malformed: parsed.malformed,
                    events: parsed.events.events,
                });
            }
            if args.json {
                println!("{}", serde_json::to_string_pretty(&reports)?);
            } else {
                for report in &reports {
                    println!("{}", report.key);
                    for event in &report.events {
                        println!("  {event:?}");
                    }
                }
            }
            Ok(exit)
        }
        Command::Validate(args) => {
            let mut exit = 0;
            for key in &args.keys {
                match javakey::validate(key) {
                    Ok(()) => println!("ok: {key}"),
                    Err(err) => {
                        exit = 1;
                        println!("{err}");
                    }
                }
            }
            Ok(exit)
        }
    }
}
