use crate::app::models::{EntryKind, Filters, ScanConfig, TreeLine};
use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::{DirEntry, Walk, WalkBuilder};
use pathdiff::diff_paths;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct Scanner {
    root: PathBuf,
    max_depth: usize,
    sorted: bool,
    filters: Arc<Filters>,
}

/// A directory that made it into the tree, with its surviving children in walk order.
#[derive(Debug)]
struct DirNode {
    name: String,
    depth: usize,
    files: Vec<String>,
    subdirs: Vec<usize>,
}

impl DirNode {
    fn new(name: String, depth: usize) -> Self {
        Self {
            name,
            depth,
            files: Vec::new(),
            subdirs: Vec::new(),
        }
    }
}

impl Scanner {
    pub fn new(config: &ScanConfig) -> Result<Self> {
        let filters = Filters {
            python_only: config.python_only,
            show_hidden: config.show_hidden,
            ignore_dirs: config.ignore_dirs.clone(),
            ignore_exts: config.ignore_exts.clone(),
            exclude_set: build_globset(&config.exclude)?,
        };

        Ok(Self {
            root: config.root.clone(),
            max_depth: config.max_depth,
            sorted: config.sorted,
            filters: Arc::new(filters),
        })
    }

    /// Walks the root and returns the tree lines in pre-order: each directory,
    /// then its files, then its subdirectories.
    ///
    /// Directories deeper than `max_depth` are neither listed nor entered. The
    /// root line is always present, even when the root cannot be read.
    pub fn scan(&self) -> Vec<TreeLine> {
        let mut dirs = vec![DirNode::new(root_name(&self.root), 0)];
        // stack[d] is the index of the directory currently open at depth d
        let mut stack: Vec<usize> = vec![0];

        for result in self.walker() {
            match result {
                Ok(entry) => self.process_entry(&entry, &mut dirs, &mut stack),
                Err(err) => log::warn!("Error walking entry: {}", err),
            }
        }

        let mut lines = Vec::new();
        render(&dirs, 0, &mut lines);
        log::debug!(
            "Scanned {} into {} lines ({} folders)",
            self.root.display(),
            lines.len(),
            dirs.len()
        );
        lines
    }

    fn walker(&self) -> Walk {
        let filters = Arc::clone(&self.filters);
        let root = self.root.clone();
        let max_depth = self.max_depth;

        let mut builder = WalkBuilder::new(&self.root);
        builder
            .standard_filters(false)
            .follow_links(false)
            // one level past the deepest listed folder, so its files are visited
            .max_depth(Some(self.max_depth.saturating_add(1)))
            .filter_entry(move |entry| keep_dir(&root, &filters, max_depth, entry));

        if self.sorted {
            builder.sort_by_file_name(|a, b| a.cmp(b));
        }

        builder.build()
    }

    fn process_entry(&self, entry: &DirEntry, dirs: &mut Vec<DirNode>, stack: &mut Vec<usize>) {
        let depth = entry.depth();
        if depth == 0 {
            return;
        }

        stack.truncate(depth);
        let Some(&parent) = stack.get(depth - 1) else {
            log::debug!("No open parent for {}", entry.path().display());
            return;
        };

        let name = entry.file_name().to_string_lossy().into_owned();

        if is_dir(entry) {
            if depth > self.max_depth {
                return;
            }
            let idx = dirs.len();
            dirs.push(DirNode::new(name, depth));
            dirs[parent].subdirs.push(idx);
            stack.push(idx);
            return;
        }

        if !self.filters.allows_file(&name) {
            return;
        }
        if let Some(relative) = diff_paths(entry.path(), &self.root) {
            if self.filters.is_excluded(&relative) {
                return;
            }
        }
        dirs[parent].files.push(name);
    }
}

/// Prunes directories before the walker descends into them. Files always pass here.
///
/// A listed directory that cannot be read is dropped whole, line included.
fn keep_dir(root: &Path, filters: &Filters, max_depth: usize, entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !is_dir(entry) {
        return true;
    }

    let name = entry.file_name().to_string_lossy();
    if !filters.allows_dir(&name) {
        return false;
    }

    if let Some(relative) = diff_paths(entry.path(), root) {
        if filters.is_excluded(&relative) {
            return false;
        }
    }

    // symlinked dirs are listed but never entered, so their readability is moot
    if entry.depth() <= max_depth && !entry.path_is_symlink() {
        if let Err(err) = fs::read_dir(entry.path()) {
            log::warn!("Skipping unreadable directory {}: {}", entry.path().display(), err);
            return false;
        }
    }

    true
}

/// Directory test that also covers symlinks pointing at directories.
/// The walker does not follow links, so such entries become leaf folders.
fn is_dir(entry: &DirEntry) -> bool {
    match entry.file_type() {
        Some(ft) if ft.is_symlink() => entry.path().is_dir(),
        Some(ft) => ft.is_dir(),
        None => false,
    }
}

fn root_name(root: &Path) -> String {
    match root.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => root.display().to_string(),
    }
}

fn render(dirs: &[DirNode], idx: usize, lines: &mut Vec<TreeLine>) {
    let node = &dirs[idx];
    lines.push(TreeLine {
        depth: node.depth,
        kind: EntryKind::Folder,
        name: node.name.clone(),
    });

    for file in &node.files {
        lines.push(TreeLine {
            depth: node.depth + 1,
            kind: EntryKind::File,
            name: file.clone(),
        });
    }

    for &child in &node.subdirs {
        render(dirs, child, lines);
    }
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        builder.add(Glob::new(pat).context(format!("Invalid glob pattern: {}", pat))?);
    }
    Ok(builder.build()?)
}
