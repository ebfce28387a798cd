use globset::GlobSet;
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

pub const DEFAULT_MAX_DEPTH: usize = 3;
pub const DEFAULT_IGNORE_DIRS: &[&str] = &[
    ".git",
    "__pycache__",
    "venv",
    ".idea",
    ".vscode",
    ".env",
];
pub const DEFAULT_IGNORE_EXTS: &[&str] = &[".tmp", ".log", ".bak"];

const INDENT: &str = "    ";

/// Everything a single scan needs, resolved from defaults, presets and CLI args.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub root: PathBuf,
    pub max_depth: usize,
    pub python_only: bool,
    pub show_hidden: bool,
    /// Order siblings by name. When false, siblings keep whatever order the filesystem yields.
    pub sorted: bool,
    pub ignore_dirs: BTreeSet<String>,
    /// Always stored with a leading dot.
    pub ignore_exts: BTreeSet<String>,
    pub exclude: Vec<String>,
}

impl ScanConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            max_depth: DEFAULT_MAX_DEPTH,
            python_only: false,
            show_hidden: false,
            sorted: true,
            ignore_dirs: DEFAULT_IGNORE_DIRS.iter().map(|s| s.to_string()).collect(),
            ignore_exts: DEFAULT_IGNORE_EXTS.iter().map(|s| s.to_string()).collect(),
            exclude: Vec::new(),
        }
    }
}

/// Normalizes `log` and `.log` alike to `.log`. Case is kept; matching is exact.
pub fn normalize_ext(ext: &str) -> String {
    let trimmed = ext.trim().trim_start_matches('.');
    format!(".{}", trimmed)
}

/// Compiled filter rules shared by the walker callback and the file pass.
#[derive(Debug)]
pub struct Filters {
    pub python_only: bool,
    pub show_hidden: bool,
    pub ignore_dirs: BTreeSet<String>,
    pub ignore_exts: BTreeSet<String>,
    pub exclude_set: GlobSet,
}

impl Filters {
    fn is_hidden(&self, name: &str) -> bool {
        !self.show_hidden && name.starts_with('.')
    }

    /// Whether a subdirectory should be listed and descended into.
    pub fn allows_dir(&self, name: &str) -> bool {
        !self.is_hidden(name) && !self.ignore_dirs.contains(name)
    }

    pub fn allows_file(&self, name: &str) -> bool {
        if self.python_only && !name.ends_with(".py") {
            return false;
        }
        if self.is_hidden(name) {
            return false;
        }
        match extension_of(name) {
            Some(ext) => !self.ignore_exts.contains(&ext),
            None => true,
        }
    }

    /// Checks a root-relative path against the exclude globs.
    pub fn is_excluded(&self, relative: &Path) -> bool {
        self.exclude_set.is_match(relative)
    }
}

/// Last dot-suffix of a file name, dot included.
/// Dot-files such as `.bashrc` have no extension.
fn extension_of(name: &str) -> Option<String> {
    let idx = name.rfind('.')?;
    if name[..idx].trim_start_matches('.').is_empty() {
        return None;
    }
    Some(name[idx..].to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Folder,
    File,
}

/// One rendered row of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeLine {
    pub depth: usize,
    pub kind: EntryKind,
    pub name: String,
}

impl fmt::Display for TreeLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let indent = INDENT.repeat(self.depth);
        match self.kind {
            EntryKind::Folder => write!(f, "{}📁 {}/", indent, self.name),
            EntryKind::File => write!(f, "{}📄 {}", indent, self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filters(python_only: bool, show_hidden: bool) -> Filters {
        let config = ScanConfig::new(".");
        Filters {
            python_only,
            show_hidden,
            ignore_dirs: config.ignore_dirs,
            ignore_exts: config.ignore_exts,
            exclude_set: GlobSet::empty(),
        }
    }

    #[test]
    fn ignored_dirs_stay_pruned_even_when_hidden_is_shown() {
        let f = filters(false, true);
        assert!(!f.allows_dir(".git"));
        assert!(!f.allows_dir("__pycache__"));
        assert!(f.allows_dir(".github"));
        assert!(f.allows_dir("src"));
    }

    #[test]
    fn hidden_dirs_pruned_by_default() {
        let f = filters(false, false);
        assert!(!f.allows_dir(".github"));
        assert!(f.allows_dir("docs"));
    }

    #[test]
    fn file_rules() {
        let f = filters(false, false);
        assert!(f.allows_file("README.md"));
        assert!(!f.allows_file("notes.log"));
        assert!(!f.allows_file("backup.tar.bak"));
        assert!(!f.allows_file(".bashrc"));
        assert!(f.allows_file("archive.log.gz"));
        assert!(f.allows_file("RUN.LOG"));

        let py = filters(true, true);
        assert!(py.allows_file("main.py"));
        assert!(!py.allows_file("README.md"));
        assert!(!py.allows_file("main.pyc"));
    }

    #[test]
    fn dotfile_has_no_extension() {
        assert_eq!(extension_of(".log"), None);
        assert_eq!(extension_of("..log"), None);
        assert_eq!(extension_of("run.LOG"), Some(".LOG".to_string()));
        assert_eq!(extension_of("Makefile"), None);
    }

    #[test]
    fn normalizes_extensions() {
        assert_eq!(normalize_ext("log"), ".log");
        assert_eq!(normalize_ext(" .bak"), ".bak");
    }

    #[test]
    fn renders_lines() {
        let folder = TreeLine {
            depth: 1,
            kind: EntryKind::Folder,
            name: "src".into(),
        };
        let file = TreeLine {
            depth: 2,
            kind: EntryKind::File,
            name: "main.py".into(),
        };
        assert_eq!(folder.to_string(), "    📁 src/");
        assert_eq!(file.to_string(), "        📄 main.py");
    }
}
