use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Print a filtered, depth-limited tree of a project directory"
)]
pub struct Cli {
    /// Directory to scan (defaults to the current directory)
    pub root: Option<PathBuf>,

    /// Deepest folder level to list; the root is level 0
    #[arg(short = 'd', long, value_parser = clap::value_parser!(u8).range(0..=64))]
    pub max_depth: Option<u8>,

    /// Only list Python (.py) files
    #[arg(long, overrides_with = "no_py_only")]
    pub py_only: bool,

    /// List all file types, even if the preset says otherwise
    #[arg(long, overrides_with = "py_only")]
    pub no_py_only: bool,

    /// Include files and folders whose names start with '.'
    #[arg(long, overrides_with = "no_show_hidden")]
    pub show_hidden: bool,

    /// Hide dot entries, even if the preset shows them
    #[arg(long, overrides_with = "show_hidden")]
    pub no_show_hidden: bool,

    /// Keep the order the filesystem returns instead of sorting by name
    #[arg(long)]
    pub fs_order: bool,

    /// Extra directory names to skip entirely
    #[arg(long, num_args = 1..)]
    pub ignore_dir: Option<Vec<String>>,

    /// Extra file extensions to hide (e.g. 'lock' or '.lock')
    #[arg(long, num_args = 1..)]
    pub ignore_ext: Option<Vec<String>>,

    /// Glob patterns, relative to the root, for files or directories to exclude
    #[arg(long, num_args = 1..)]
    pub exclude: Option<Vec<String>>,

    /// Use a predefined set of options from presets.toml
    #[arg(long)]
    pub preset: Option<String>,

    /// Wrap the output in a ```text code fence
    #[arg(long)]
    pub fenced: bool,

    /// Copy the output to the system clipboard
    #[arg(short, long)]
    pub copy: bool,

    /// Linux only: seconds to keep serving the copied text before exiting
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    pub clipboard_hold: u64,
}
