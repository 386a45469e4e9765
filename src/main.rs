use std::fmt::Write;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use ini_reader::{Capacity, FromIniValue, Ini, Section};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Print an INI file, or read a single typed value from it.
#[derive(Parser, Debug)]
#[command(name = "ini-reader", version, about, long_about = None)]
struct Cli {
    /// INI file to read. A missing or unreadable file is an empty document unless --strict is set.
    path: PathBuf,

    /// Section to query; use "" for keys before the first header.
    #[arg(short, long, requires = "key")]
    section: Option<String>,

    /// Key to query. Without it, the whole document is printed.
    #[arg(short, long)]
    key: Option<String>,

    /// Type to convert the value into.
    #[arg(long = "as", value_enum, default_value_t = Kind::String)]
    kind: Kind,

    /// Value printed when the key is missing or cannot be converted.
    #[arg(short, long)]
    default: Option<String>,

    /// Lowercase string values.
    #[arg(long)]
    fold_case: bool,

    /// Fail if the file cannot be opened or read.
    #[arg(long)]
    strict: bool,

    /// Expected number of sections.
    #[arg(long, default_value_t = Capacity::default().sections)]
    capacity_sections: usize,

    /// Expected number of keys per section.
    #[arg(long, default_value_t = Capacity::default().keys)]
    capacity_keys: usize,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Kind {
    Bool,
    Char,
    Int,
    Uint,
    Float,
    String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    debug!(?cli, "parsed arguments");

    let capacity = Capacity::new(cli.capacity_sections, cli.capacity_keys);
    let ini = if cli.strict {
        Ini::try_open_with_capacity(&cli.path, capacity)
            .with_context(|| format!("failed to load {}", cli.path.display()))?
    } else {
        Ini::open_with_capacity(&cli.path, capacity)
    };

    match &cli.key {
        Some(key) => {
            let section = cli.section.as_deref().unwrap_or_default();
            let default = cli.default.as_deref();
            let output = match cli.kind {
                Kind::Bool => query::<bool>(&ini, section, key, default, cli.fold_case)?,
                Kind::Char => query::<char>(&ini, section, key, default, cli.fold_case)?,
                Kind::Int => query::<i64>(&ini, section, key, default, cli.fold_case)?,
                Kind::Uint => query::<u64>(&ini, section, key, default, cli.fold_case)?,
                Kind::Float => query::<f64>(&ini, section, key, default, cli.fold_case)?,
                Kind::String => query::<String>(&ini, section, key, default, cli.fold_case)?,
            };

            println!("{output}");
        }
        None => print!("{}", render_document(&ini)),
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Reads `section`/`key` as `T`. The fallback comes from `--default`, or `T::default()`.
fn query<T>(
    ini: &Ini,
    section: &str,
    key: &str,
    default: Option<&str>,
    fold_case: bool,
) -> Result<String>
where
    T: FromIniValue + FromStr + Default + ToString,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let default = match default {
        Some(text) => text
            .parse::<T>()
            .with_context(|| format!("invalid default value: {text:?}"))?,
        None => T::default(),
    };

    Ok(ini.read_with(section, key, default, fold_case).to_string())
}

/// Renders the document with sections and keys sorted. The implicit section comes first, without
/// a header.
fn render_document(ini: &Ini) -> String {
    let mut sections = ini.sections().collect::<Vec<&Section>>();
    sections.sort_unstable_by(|a, b| a.name().cmp(b.name()));

    let mut out = String::new();
    for section in sections {
        if section.name().is_empty() && section.is_empty() {
            continue;
        }

        if !out.is_empty() {
            out.push('\n');
        }

        if !section.name().is_empty() {
            _ = writeln!(out, "[{}]", section.name());
        }

        let mut entries = section.iter().collect::<Vec<(&str, &str)>>();
        entries.sort_unstable();

        for (key, value) in entries {
            _ = writeln!(out, "{key} = {value}");
        }
    }

    out
}
