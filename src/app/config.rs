use crate::app::cli::Cli;
use crate::app::models::{normalize_ext, ScanConfig, DEFAULT_MAX_DEPTH};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Deserialize, Debug)]
struct PresetsFile {
    #[serde(flatten)]
    presets: HashMap<String, PresetConfig>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct PresetConfig {
    pub max_depth: Option<usize>,
    pub python_only: Option<bool>,
    pub show_hidden: Option<bool>,
    pub ignore_dirs: Option<Vec<String>>,
    pub ignore_exts: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
}

pub fn presets_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home
        .join(".config")
        .join("project_tree")
        .join("presets.toml"))
}

/// Reads the presets file. A missing file means no presets.
pub fn load_presets_file(path: &Path) -> Result<HashMap<String, PresetConfig>> {
    if !path.exists() {
        return Ok(HashMap::new());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config at {:?}", path))?;

    parse_presets(&content).with_context(|| format!("Failed to parse {:?}", path))
}

fn parse_presets(content: &str) -> Result<HashMap<String, PresetConfig>> {
    let parsed: PresetsFile = toml::from_str(content)?;
    Ok(parsed.presets)
}

fn merge_vecs(
    base: Vec<String>,
    preset_vec: Option<Vec<String>>,
    cli_vec: Option<Vec<String>>,
) -> Vec<String> {
    let mut combined = base;
    combined.extend(preset_vec.unwrap_or_default());
    combined.extend(cli_vec.unwrap_or_default());
    // Deduplicate while keeping order
    let mut seen = std::collections::HashSet::new();
    combined.retain(|item| seen.insert(item.clone()));
    combined
}

fn merge_set(
    base: &BTreeSet<String>,
    preset_vec: Option<Vec<String>>,
    cli_vec: Option<Vec<String>>,
) -> BTreeSet<String> {
    merge_vecs(base.iter().cloned().collect(), preset_vec, cli_vec)
        .into_iter()
        .collect()
}

/// `--flag` / `--no-flag` from the CLI beat the preset, which beats `false`.
fn pick_flag(on: bool, off: bool, preset: Option<bool>) -> bool {
    if on {
        true
    } else if off {
        false
    } else {
        preset.unwrap_or(false)
    }
}

/// The directory to scan: the CLI argument or the working directory, canonicalized when possible.
pub fn resolve_root(cli_root: Option<&Path>) -> Result<PathBuf> {
    let root = match cli_root {
        Some(path) => path.to_path_buf(),
        None => env::current_dir().context("Failed to get current directory")?,
    };

    match fs::canonicalize(&root) {
        Ok(canonical) => Ok(canonical),
        Err(err) => {
            log::warn!("Cannot resolve {}: {}", root.display(), err);
            Ok(root)
        }
    }
}

/// Merges built-in defaults, the selected preset and CLI args into one `ScanConfig`.
///
/// Preset selection: `--preset` first, then the root directory's name.
/// Lists accumulate; for scalars a CLI flag beats the preset.
pub fn resolve_config(
    cli: Cli,
    root: PathBuf,
    presets: &HashMap<String, PresetConfig>,
) -> Result<ScanConfig> {
    let project_name = root.file_name().and_then(|n| n.to_str()).map(str::to_owned);
    let preset_key = cli.preset.as_deref().or(project_name.as_deref());

    if let Some(requested) = cli.preset.as_deref() {
        if !presets.contains_key(requested) {
            anyhow::bail!("Unknown preset '{}'", requested);
        }
    }

    let preset = preset_key
        .and_then(|k| presets.get(k))
        .cloned()
        .unwrap_or_default();
    if let Some(key) = preset_key.filter(|k| presets.contains_key(*k)) {
        log::info!("Using preset '{}'", key);
    }

    let defaults = ScanConfig::new(root);

    let max_depth = match cli.max_depth {
        Some(depth) => usize::from(depth),
        None => preset.max_depth.unwrap_or(DEFAULT_MAX_DEPTH),
    };

    let ignore_exts = merge_set(&defaults.ignore_exts, preset.ignore_exts, cli.ignore_ext)
        .iter()
        .map(|ext| normalize_ext(ext))
        .collect();

    Ok(ScanConfig {
        max_depth,
        python_only: pick_flag(cli.py_only, cli.no_py_only, preset.python_only),
        show_hidden: pick_flag(cli.show_hidden, cli.no_show_hidden, preset.show_hidden),
        sorted: !cli.fs_order,
        ignore_dirs: merge_set(&defaults.ignore_dirs, preset.ignore_dirs, cli.ignore_dir),
        ignore_exts,
        exclude: merge_vecs(Vec::new(), preset.exclude, cli.exclude),
        root: defaults.root,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        let mut full = vec!["project-tree"];
        full.extend_from_slice(args);
        Cli::try_parse_from(full).unwrap()
    }

    const PRESETS: &str = r#"
[webapp]
max_depth = 5
ignore_dirs = ["node_modules", "dist"]
ignore_exts = ["map"]
exclude = ["**/*.min.js"]

[scripts]
python_only = true
"#;

    #[test]
    fn defaults_without_presets() {
        let config =
            resolve_config(cli(&[]), PathBuf::from("/work/app"), &HashMap::new()).unwrap();
        assert_eq!(config.max_depth, 3);
        assert!(!config.python_only);
        assert!(!config.show_hidden);
        assert!(config.sorted);
        assert!(config.ignore_dirs.contains("__pycache__"));
        assert!(config.ignore_exts.contains(".log"));
        assert!(config.exclude.is_empty());
    }

    #[test]
    fn preset_picked_by_project_name() {
        let presets = parse_presets(PRESETS).unwrap();
        let config = resolve_config(cli(&[]), PathBuf::from("/work/webapp"), &presets).unwrap();
        assert_eq!(config.max_depth, 5);
        assert!(config.ignore_dirs.contains("node_modules"));
        assert!(config.ignore_dirs.contains(".git"));
        assert!(config.ignore_exts.contains(".map"));
        assert_eq!(config.exclude, vec!["**/*.min.js".to_string()]);
    }

    #[test]
    fn cli_overrides_and_extends_preset() {
        let presets = parse_presets(PRESETS).unwrap();
        let args = cli(&[
            "--preset",
            "webapp",
            "-d",
            "1",
            "--ignore-ext",
            ".map",
            "lock",
            "--fs-order",
        ]);
        let config = resolve_config(args, PathBuf::from("/work/other"), &presets).unwrap();
        assert_eq!(config.max_depth, 1);
        assert!(!config.sorted);
        assert!(config.ignore_exts.contains(".lock"));
        assert_eq!(config.ignore_exts.iter().filter(|e| *e == ".map").count(), 1);
    }

    #[test]
    fn preset_scalar_flags_apply() {
        let presets = parse_presets(PRESETS).unwrap();
        let args = cli(&["--preset", "scripts"]);
        let config = resolve_config(args, PathBuf::from("/x"), &presets).unwrap();
        assert!(config.python_only);
    }

    #[test]
    fn negative_cli_flags_beat_the_preset() {
        let presets = parse_presets("[scripts]\npython_only = true\nshow_hidden = true").unwrap();
        let args = cli(&["--preset", "scripts", "--no-py-only", "--no-show-hidden"]);
        let config = resolve_config(args, PathBuf::from("/x"), &presets).unwrap();
        assert!(!config.python_only);
        assert!(!config.show_hidden);

        let args = cli(&["--preset", "scripts", "--no-py-only", "--py-only"]);
        let config = resolve_config(args, PathBuf::from("/x"), &presets).unwrap();
        assert!(config.python_only);
    }

    #[test]
    fn pick_flag_precedence() {
        assert!(pick_flag(true, false, Some(false)));
        assert!(!pick_flag(false, true, Some(true)));
        assert!(pick_flag(false, false, Some(true)));
        assert!(!pick_flag(false, false, None));
    }

    #[test]
    fn unknown_explicit_preset_fails() {
        let err = resolve_config(cli(&["--preset", "nope"]), PathBuf::from("/x"), &HashMap::new());
        assert!(err.is_err());
    }

    #[test]
    fn malformed_presets_are_rejected() {
        assert!(parse_presets("[webapp]\nmax_depth = \"deep\"").is_err());
    }

    #[test]
    fn missing_presets_file_is_empty() {
        let tmp = tempfile::TempDir::new().unwrap();
        let presets = load_presets_file(&tmp.path().join("presets.toml")).unwrap();
        assert!(presets.is_empty());
    }

    #[test]
    fn merge_keeps_first_occurrence_order() {
        let merged = merge_vecs(
            vec!["a".into()],
            Some(vec!["b".into(), "a".into()]),
            Some(vec!["c".into(), "b".into()]),
        );
        assert_eq!(merged, vec!["a", "b", "c"]);
    }
}
