use std::fs::File;
use std::io::{Read, stdin};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "archie-cli",
    about = "CLI for ArchieML ↔ JSON conversion",
    version
)]
struct Args {
    /// Encode JSON to ArchieML (default parses ArchieML to JSON)
    #[arg(short, long)]
    encode: bool,

    /// Treat `[bracketed]` spans as comments
    #[arg(short, long, default_value_t = false)]
    comments: bool,

    /// Pretty-print JSON on output (when parsing)
    #[arg(long, default_value_t = false)]
    pretty: bool,

    /// Input file (defaults to stdin)
    input: Option<PathBuf>,
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    let mut buf = String::new();
    match path {
        Some(path) => {
            let mut f =
                File::open(path).with_context(|| format!("opening {}", path.display()))?;
            f.read_to_string(&mut buf)?;
        }
        None => {
            stdin().read_to_string(&mut buf)?;
        }
    }
    Ok(buf)
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let buf = read_input(args.input.as_ref())?;
    debug!(bytes = buf.len(), encode = args.encode, "read input");

    let options = archie::Options::with_comments(args.comments);

    if args.encode {
        let value: serde_json::Value =
            serde_json::from_str(&buf).context("input is not valid JSON")?;
        let out = archie::encode_to_string(&value, &options)?;
        print!("{out}");
    } else {
        let value = archie::parse_str(&buf, &options).to_json();
        if args.pretty {
            println!("{}", serde_json::to_string_pretty(&value)?);
        } else {
            println!("{}", serde_json::to_string(&value)?);
        }
    }
    Ok(())
}
