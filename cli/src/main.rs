use std::{
    fs,
    io::{self, Write},
    path::PathBuf,
    process,
};

use clap::Parser;
use json_tree::{to_writer, to_writer_pretty, Error};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "json-tree", about = "Parse a json file and write it back")]
struct Cli {
    path: PathBuf,
    /// Indent the output, one element per line
    #[arg(long)]
    pretty: bool,
    /// Only validate the document
    #[arg(long, conflicts_with = "pretty")]
    check: bool,
}

fn main() {
    init_tracing();

    let cli = Cli::parse();

    if let Err(err) = run(&cli) {
        match err {
            Error::Parse(e) => {
                eprintln!("{}:{}:{}: {}", cli.path.display(), e.line(), e.col(), e.kind)
            }
            other => eprintln!("error: {other}"),
        }
        process::exit(1);
    }
}

fn run(cli: &Cli) -> json_tree::Result<()> {
    let json = fs::read_to_string(&cli.path)?;
    let value = json_tree::parse(&json)?;

    tracing::debug!(path = %cli.path.display(), kind = value.type_name(), "parsed document");

    if cli.check {
        return Ok(());
    }

    let mut stdout = io::stdout().lock();
    if cli.pretty {
        to_writer_pretty(&mut stdout, &value)?;
    } else {
        to_writer(&mut stdout, &value)?;
    }
    writeln!(stdout)?;

    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}
