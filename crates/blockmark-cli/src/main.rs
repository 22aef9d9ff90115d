use anyhow::{Context, Result};
use blockmark_config::Config;
use blockmark_engine::parsing::snapshot;
use blockmark_engine::{Registry, core_registry, io, parse, raw_handler, serialize};
use relative_path::RelativePathBuf;
use std::{
    env, fs,
    path::{Path, PathBuf},
    process,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Parse,
    Inspect,
    Roundtrip,
    Raw,
    Types,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "parse" => Some(Self::Parse),
            "inspect" => Some(Self::Inspect),
            "roundtrip" => Some(Self::Roundtrip),
            "raw" => Some(Self::Raw),
            "types" => Some(Self::Types),
            _ => None,
        }
    }

    fn needs_file(self) -> bool {
        self != Self::Types
    }
}

fn usage(program: &str) -> String {
    format!("Usage: {program} <parse|inspect|roundtrip|raw> <file>\n       {program} types")
}

/// Apply the optional block names from the config file. A name that is not
/// registered leaves the built-in choice in place.
fn apply_config(registry: &mut Registry, config: &Config) {
    if let Some(name) = &config.default_block
        && let Err(e) = registry.set_default_block_name(name)
    {
        log::warn!("Ignoring default_block from config: {e}");
    }
    if let Some(name) = &config.unknown_type_handler
        && let Err(e) = registry.set_unknown_type_handler_name(name)
    {
        log::warn!("Ignoring unknown_type_handler from config: {e}");
    }
}

/// Read the input file. Relative names resolve against the documents path
/// when one is configured, otherwise against the working directory.
fn read_input(arg: &str, documents_path: Option<&Path>) -> Result<String> {
    let path = PathBuf::from(arg);
    match documents_path {
        Some(root) if path.is_relative() => {
            let relative = RelativePathBuf::from_path(&path)
                .with_context(|| format!("'{arg}' is not a relative path"))?;
            Ok(io::read_document(&relative, root)?)
        }
        _ => fs::read_to_string(&path).with_context(|| format!("Failed to read '{}'", path.display())),
    }
}

fn print_types(registry: &Registry) {
    for block_type in registry.list() {
        let private = if block_type.is_private { " (private)" } else { "" };
        println!(
            "{}\t{}\t{}{}",
            block_type.name, block_type.title, block_type.category, private
        );
    }
}

/// Runs the command. Returns `Ok(false)` when a round trip is not a fixed point.
fn run(command: Command, registry: &Registry, source: &str) -> Result<bool> {
    match command {
        Command::Parse => {
            println!("{}", serde_json::to_string_pretty(&parse(registry, source))?);
        }
        Command::Inspect => {
            let snap = snapshot::normalize(&parse(registry, source));
            println!("{}", serde_json::to_string_pretty(&snap)?);
        }
        Command::Raw => {
            println!("{}", serde_json::to_string_pretty(&raw_handler(registry, source))?);
        }
        Command::Roundtrip => {
            let once = serialize(registry, &parse(registry, source).blocks);
            let twice = serialize(registry, &parse(registry, &once).blocks);
            if once != twice {
                eprintln!("Round trip is not a fixed point");
                eprintln!("--- first pass\n{once}\n--- second pass\n{twice}");
                return Ok(false);
            }
            if once == source {
                log::info!("Source is already in canonical form");
            }
            println!("{once}");
        }
        Command::Types => print_types(registry),
    }
    Ok(true)
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("blockmark-cli");

    let Some(command) = args.get(1).and_then(|arg| Command::from_arg(arg)) else {
        eprintln!("{}", usage(program));
        process::exit(1);
    };
    if command.needs_file() != (args.len() == 3) || args.len() > 3 {
        eprintln!("{}", usage(program));
        process::exit(1);
    }

    let config_path = Config::config_path();
    log::debug!("Config path: {}", config_path.display());

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };

    let mut registry = core_registry()?;
    if let Some(config) = &config {
        apply_config(&mut registry, config);
    }

    let source = match args.get(2) {
        Some(file) => read_input(file, config.as_ref().map(|c| c.documents_path.as_path()))?,
        None => String::new(),
    };

    if !run(command, &registry, &source)? {
        process::exit(1);
    }
    Ok(())
}
