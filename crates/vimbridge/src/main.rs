use std::env;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use tracing_subscriber::EnvFilter;

use vimbridge::config::{self, Config};
use vimbridge::keys::{expand_keys, VariableStore};
use vimbridge::shell::{detect_backend, filter_regions, CommandContext};
use vimbridge::{Mode, Region, StringBuffer, TextBuffer};

fn print_version() {
    println!("vimbridge {}", env!("CARGO_PKG_VERSION"));
}

fn print_usage() {
    eprintln!("vimbridge - shell filters and key notation for modal editors");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  vimbridge filter [OPTIONS] FILE -- COMMAND...");
    eprintln!("  vimbridge expand [--set NAME=VALUE]... [--] KEYS");
    eprintln!("  vimbridge run [--file FILE] COMMAND...");
    eprintln!("  vimbridge term [DIR]");
    eprintln!();
    eprintln!("Filter options:");
    eprintln!("  --region B:E      Character range to filter (repeatable, default: whole file)");
    eprintln!("  --mode MODE       Selection mode: visual (default), visual-line, visual-block");
    eprintln!("  --in-place        Write the result back to FILE instead of stdout");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -h, --help        Print this help message");
    eprintln!("  -V, --version     Print version information");
    eprintln!();
    eprintln!("Environment Variables:");
    eprintln!("  VIMBRIDGE_LOG         Log filter (e.g. debug, vimbridge=trace)");
    eprintln!("  VIMBRIDGE_CONFIG_DIR  Override the config directory");
    eprintln!("  TERMINAL              Terminal used by `term` when none is configured");
    eprintln!();
    eprintln!("Configuration:");
    if let Some(path) = config::config_path() {
        eprintln!("  Config file: {}", path.display());
    }
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  vimbridge filter --region 0:120 notes.txt -- sort -u");
    eprintln!("  vimbridge expand --set mapleader=, '<leader>w'");
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();

    // Global flags only come before the subcommand; later words belong to
    // it (e.g. `filter FILE -- sort -h`).
    match args.first().map(String::as_str) {
        None | Some("-h" | "--help") => {
            print_usage();
            return Ok(());
        }
        Some("-V" | "--version") => {
            print_version();
            return Ok(());
        }
        Some(_) => {}
    }

    init_logging();

    // Load configuration from ~/.config/vimbridge/config.toml
    let cfg = config::load_config().unwrap_or_else(|e| {
        eprintln!("Warning: Failed to load config: {:#}", e);
        Config::default()
    });

    let rest = &args[1..];
    match args[0].as_str() {
        "filter" => run_filter(&cfg, rest),
        "expand" => run_expand(&cfg, rest),
        "run" => run_command(&cfg, rest),
        "term" => run_term(&cfg, rest),
        other => {
            print_usage();
            Err(anyhow!("Unknown command: {}", other))
        }
    }
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_env("VIMBRIDGE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    // Also installs the `log` bridge used by the library.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Join the words after `--`. A single word is used verbatim so a quoted
/// pipeline like `'sort | uniq'` reaches the shell intact.
fn command_from_words(words: &[String]) -> Result<String> {
    match words {
        [] => bail!("Missing command"),
        [single] => Ok(single.clone()),
        words => shlex::try_join(words.iter().map(String::as_str))
            .map_err(|e| anyhow!("Cannot quote command: {}", e)),
    }
}

fn run_filter(cfg: &Config, args: &[String]) -> Result<()> {
    let (opts, command_words) = match args.iter().position(|a| a == "--") {
        Some(i) => (&args[..i], &args[i + 1..]),
        None => bail!("Missing `-- COMMAND` after the filter options"),
    };
    let command = command_from_words(command_words)?;

    let mut regions = Vec::new();
    let mut mode = Mode::Visual;
    let mut in_place = false;
    let mut file: Option<PathBuf> = None;

    let mut iter = opts.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--region" => {
                let value = iter.next().context("--region needs a value")?;
                regions.push(value.parse::<Region>().map_err(|e| anyhow!(e))?);
            }
            "--mode" => {
                let value = iter.next().context("--mode needs a value")?;
                mode = value.parse().map_err(|e: String| anyhow!(e))?;
            }
            "--in-place" => in_place = true,
            other if other.starts_with('-') => bail!("Unknown filter option: {}", other),
            path if file.is_none() => file = Some(PathBuf::from(path)),
            extra => bail!("Unexpected argument: {}", extra),
        }
    }

    if !mode.is_visual() {
        bail!("Filtering works on a selection; {} mode has none", mode.label());
    }

    let file = file.context("Missing FILE")?;
    let mut buffer = StringBuffer::load(&file)?;

    if regions.is_empty() {
        regions.push(Region::new(0, buffer.len_chars()));
    }
    if mode == Mode::VisualLine {
        for region in &mut regions {
            *region = buffer.line_span(*region);
        }
    }
    let regions = merge_overlapping(regions);

    let backend = detect_backend(&cfg.shell, CommandContext::for_file(&file))?;
    let change = match filter_regions(&mut buffer, &regions, &command, &*backend) {
        Ok(change) => change,
        Err(e) if in_place => {
            return Err(e).with_context(|| {
                format!("{} was left unchanged; nothing was written", file.display())
            })
        }
        Err(e) => return Err(e.into()),
    };

    if in_place {
        buffer.save(&file)?;
    } else {
        io::stdout()
            .write_all(buffer.as_str().as_bytes())
            .context("Failed to write output")?;
    }

    let cursors: Vec<String> = change.cursors.iter().map(|c| c.to_string()).collect();
    eprintln!("{} cursors: {}", change.mode.label(), cursors.join(","));
    Ok(())
}

/// Sort regions and merge any that overlap, as the filter requires.
fn merge_overlapping(mut regions: Vec<Region>) -> Vec<Region> {
    regions.sort_by_key(|r| r.begin);
    let mut merged: Vec<Region> = Vec::with_capacity(regions.len());
    for region in regions {
        if let Some(last) = merged.last_mut() {
            if region.begin < last.end {
                last.end = last.end.max(region.end);
                continue;
            }
        }
        merged.push(region);
    }
    merged
}

fn run_expand(cfg: &Config, args: &[String]) -> Result<()> {
    let mut store = VariableStore::from_config(&cfg.keys);
    let mut keys: Option<&str> = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--set" => {
                let value = iter.next().context("--set needs NAME=VALUE")?;
                let (name, value) = value
                    .split_once('=')
                    .with_context(|| format!("Invalid --set (expected NAME=VALUE): {}", value))?;
                store.set(name, value);
            }
            "--" if keys.is_none() => keys = iter.next().map(String::as_str),
            k if keys.is_none() => keys = Some(k),
            extra => bail!("Unexpected argument: {}", extra),
        }
    }

    let keys = keys.context("Missing KEYS")?;
    println!("{}", expand_keys(keys, &store));
    Ok(())
}

fn run_command(cfg: &Config, args: &[String]) -> Result<()> {
    let (context, words) = match args {
        [flag, file, rest @ ..] if flag == "--file" => (CommandContext::for_file(file), rest),
        _ => (CommandContext::default(), args),
    };
    let command = command_from_words(words)?;

    let backend = detect_backend(&cfg.shell, context)?;
    print!("{}", backend.run_capture(&command));
    Ok(())
}

fn run_term(cfg: &Config, args: &[String]) -> Result<()> {
    let dir = match args {
        [] => env::current_dir().context("Failed to read current directory")?,
        [dir] => PathBuf::from(dir),
        _ => bail!("Usage: vimbridge term [DIR]"),
    };
    if !dir.is_dir() {
        bail!("Not a directory: {}", dir.display());
    }

    let backend = detect_backend(&cfg.shell, CommandContext::default())?;
    let terminal = cfg.shell.terminal_or(backend.default_terminal());
    backend.open_interactive(&dir, &terminal);
    Ok(())
}
