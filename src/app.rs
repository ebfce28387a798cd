// Declare modules
pub mod cli;
pub mod clipboard;
pub mod config;
pub mod formatter;
pub mod models;
pub mod scanner;

use anyhow::Result;
use clap::Parser;
use std::io;
use std::time::Duration;

use self::cli::Cli;
use self::clipboard::{copy_and_report, SystemClipboard};
use self::config::{load_presets_file, presets_path, resolve_config, resolve_root};
use self::formatter::OutputGenerator;
use self::models::ScanConfig;
use self::scanner::Scanner;

/// Scans `config.root` and returns the rendered tree as one text block.
pub fn scan_directory(config: &ScanConfig) -> Result<String> {
    let scanner = Scanner::new(config)?;
    let lines = scanner.scan();
    Ok(OutputGenerator::generate_tree(&lines))
}

/// Initializes components and orchestrates data flow.
pub fn run() -> Result<()> {
    // 1. Parse Args
    let args = Cli::parse();

    // 2. Resolve Configuration
    let root = resolve_root(args.root.as_deref())?;
    let presets = load_presets_file(&presets_path()?)?;
    let fenced = args.fenced;
    let copy = args.copy;
    let hold = Duration::from_secs(args.clipboard_hold);
    let config = resolve_config(args, root, &presets)?;

    if !config.root.is_dir() {
        log::warn!("⚠️ {} is not a readable directory", config.root.display());
    }

    // 3. Scan & Render
    let tree = scan_directory(&config)?;
    let output = if fenced {
        OutputGenerator::fenced(&tree)
    } else {
        tree
    };

    // 4. Print to Stdout
    println!("{}", output);

    // 5. Clipboard failures are reported, never fatal
    if copy {
        if cfg!(target_os = "linux") && !hold.is_zero() {
            eprintln!(
                "Holding the clipboard for up to {}s, until something else takes it over...",
                hold.as_secs()
            );
        }
        let mut clipboard = SystemClipboard::new(hold);
        copy_and_report(&mut clipboard, &output, &mut io::stderr())?;
    }

    Ok(())
}
