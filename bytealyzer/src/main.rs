mod cli;

use bytelib::{
    Direction, EditSession, EngineConfig, Pattern, SearchMode, SearchOutcome, format_float,
    format_with_separators, rows,
};
use clap::Parser;
use cli::{Cli, Command};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "BYTEALYZER_LOG";

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Dispatch and immediately handle results
    if let Err(e) = run_dispatch(&cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Log to stderr, filtered by `BYTEALYZER_LOG` (default `warn`) or `debug` with `-v`
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run_dispatch(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(cli)?;
    let mut session = EditSession::new(config)?;

    match &cli.command {
        Command::Info { file } => {
            let path = open_into(&mut session, file)?;
            run_info(&session, &path)
        }
        Command::Dump {
            file,
            offset,
            length,
        } => {
            open_into(&mut session, file)?;
            run_dump(&session, *offset, *length)
        }
        Command::Search {
            file,
            pattern,
            mode,
            ignore_case,
        } => {
            open_into(&mut session, file)?;
            run_search(&mut session, pattern, (*mode).into(), !ignore_case)
        }
        Command::Inspect { file, offset } => {
            open_into(&mut session, file)?;
            println!("{}", session.inspect(*offset)?);
            Ok(())
        }
        Command::Entropy { file } => {
            open_into(&mut session, file)?;
            run_entropy(&session)
        }
        Command::Patch {
            file,
            offset,
            bytes,
            output,
        } => {
            let path = open_into(&mut session, file)?;
            run_patch(&mut session, &path, *offset, bytes, output.as_deref())
        }
        Command::Viz { file, mode } => {
            open_into(&mut session, file)?;
            for (offset, rgb) in session.cell_colors((*mode).into())?.iter().enumerate() {
                println!("{offset:08X} {} {} {}", rgb.0, rgb.1, rgb.2);
            }
            Ok(())
        }
    }
}

fn run_info(session: &EditSession, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let len = session.len();
    let analysis = session.analyze(0..len)?;
    let classes = session.class_counts(0..len)?;

    println!("File Path:   {}", path.display());
    println!("Data Size:   {} bytes", format_with_separators(len));
    println!("Entropy:     {}", format_float(analysis.entropy));
    match analysis.frequency.most_common() {
        Some((byte, count)) => println!(
            "Most Common: 0x{byte:02X} ({} times)",
            format_with_separators(count)
        ),
        None => println!("Most Common: -"),
    }

    let pct = |class| format!("{:.1}%", classes.ratio(class) * 100.0);
    println!(
        "Printable:   {} ({})",
        format_with_separators(classes.printable),
        pct(bytelib::ByteClass::Printable)
    );
    println!(
        "Null:        {} ({})",
        format_with_separators(classes.null),
        pct(bytelib::ByteClass::Null)
    );
    println!(
        "Control:     {} ({})",
        format_with_separators(classes.control),
        pct(bytelib::ByteClass::Control)
    );
    println!(
        "Extended:    {} ({})",
        format_with_separators(classes.extended),
        pct(bytelib::ByteClass::Extended)
    );
    Ok(())
}

fn run_dump(
    session: &EditSession,
    offset: usize,
    length: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    // Guard: Empty files have nothing to show at any offset
    if session.is_empty() {
        return Ok(());
    }
    if offset >= session.len() {
        return Err(format!("Offset 0x{offset:X} is past the end of the file").into());
    }
    let end = length.map_or(session.len(), |l| offset.saturating_add(l).min(session.len()));

    // Whole rows touching [offset, end)
    for row in rows(session.buffer(), session.config().bytes_per_row)
        .skip_while(|r| r.offset + r.bytes.len() <= offset)
        .take_while(|r| r.offset < end)
    {
        println!("{row}");
    }
    Ok(())
}

fn run_search(
    session: &mut EditSession,
    pattern: &str,
    mode: SearchMode,
    case_sensitive: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let SearchOutcome::All(hits) = session.search(pattern, mode, case_sensitive, Direction::All)?
    else {
        return Err("Unexpected search result".into());
    };

    println!("Found {} match(es)", format_with_separators(hits.len()));
    for offset in hits {
        println!("0x{offset:08X}");
    }
    Ok(())
}

fn run_entropy(session: &EditSession) -> Result<(), Box<dyn std::error::Error>> {
    let block_size = session.config().block_size;
    for block in session.block_entropies(block_size)? {
        println!("0x{:08X}  {:.4}", block.offset, block.entropy);
    }
    Ok(())
}

fn run_patch(
    session: &mut EditSession,
    in_path: &Path,
    offset: usize,
    bytes: &str,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let pattern = Pattern::parse(bytes, SearchMode::Hex, true)?;
    let payload = pattern
        .fixed_bytes()
        .map(<[u8]>::to_vec)
        .ok_or("Invalid patch bytes")?;

    session.set_clipboard(payload);
    session.set_active(offset, false)?;
    let written = session.paste()?;

    let out_path = output.map_or_else(
        || in_path.with_file_name(session.export_name()),
        Path::to_path_buf,
    );
    fs::write(&out_path, session.export())?;

    println!(
        "Patched {written} byte(s) at 0x{offset:X} -> {}",
        out_path.display()
    );
    Ok(())
}

// =============================== HELPER FUNCTIONS ===============================

/// Engine config from the file given by `--config`, then per-field overrides
fn load_config(cli: &Cli) -> Result<EngineConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .map_err(|e| format!("Cannot read config {}: {e}", path.display()))?;
            EngineConfig::from_toml_str(&text)?
        }
        None => EngineConfig::default(),
    };

    if let Some(history) = cli.history {
        config.history_capacity = history;
    }
    if let Some(block_size) = cli.block_size {
        config.block_size = block_size;
    }
    if let Some(width) = cli.width {
        config.bytes_per_row = width;
    }
    tracing::debug!(?config, "engine config");
    Ok(config)
}

/// Load the file into the session. Returns its absolute path.
fn open_into(session: &mut EditSession, path: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let abs_path = validate_exists(path)?;
    let bytes = fs::read(&abs_path)?;
    let name = abs_path
        .file_name()
        .map_or_else(|| "Untitled".to_string(), |n| n.to_string_lossy().into_owned());
    session.load_named(name, bytes);
    Ok(abs_path)
}

/// Validate that a path exists and is a file. Returns absolute path.
fn validate_exists(path: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if !path.exists() {
        return Err(format!("File not found: {}", path.display()).into());
    }
    if !path.is_file() {
        return Err(format!("Path is not a file: {}", path.display()).into());
    }
    // Return absolute path
    Ok(fs::canonicalize(path)?)
}
