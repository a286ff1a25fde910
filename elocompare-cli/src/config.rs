/// Optional TOML defaults for `run` and `simulate`.
///
/// Precedence is flag, then file, then built-in value. A missing file is the
/// same as an empty one.
use serde::Deserialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Read { path: PathBuf, source: std::io::Error },

    #[error("invalid config {}: {source}", path.display())]
    Parse { path: PathBuf, source: toml::de::Error },

    #[error("cannot create {}: {source}", path.display())]
    Write { path: PathBuf, source: std::io::Error },
}

#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ElocompareConfig {
    pub rounds: Option<usize>,
    pub k_factor: Option<f64>,
    pub recency_window: Option<usize>,
    pub results: Option<String>,
    pub rankings: Option<String>,
}

/// (explanation, commented-out example) for every key `init` documents.
const DOCUMENTED_KEYS: &[(&str, &str)] = &[
    ("Session ends on its own after this many recorded rounds", "rounds = 2000"),
    ("Largest rating change a single comparison can cause", "k_factor = 32.0"),
    ("Recently shown items held back from the next pair", "recency_window = 10"),
    ("Round log: Image1,Image2,Chosen,NotChosen,Rank_diff", "results = \"results.csv\""),
    ("Final scores: Image,Final Score", "rankings = \"rankings.csv\""),
];

/// The file written by `elocompare init`. Every key is commented out.
pub fn template() -> String {
    let mut out = String::from("# elocompare defaults; command-line flags take precedence\n");
    for (about, example) in DOCUMENTED_KEYS {
        out.push_str(&format!("\n# {about}\n# {example}\n"));
    }
    out
}

impl ElocompareConfig {
    /// `$HOME/.config/elocompare/config.toml`, if there is a home directory.
    pub fn default_path() -> Option<PathBuf> {
        std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join(".config/elocompare/config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        toml::from_str(&text)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }

    /// Write `template()` to `path`. Never overwrites an existing file.
    pub fn write_template(path: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write { path: path.to_path_buf(), source };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(write_err)?;
        file.write_all(template().as_bytes()).map_err(write_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_parses_to_empty_config() {
        let cfg: ElocompareConfig = toml::from_str(&template()).unwrap();
        assert_eq!(cfg, ElocompareConfig::default());
    }

    #[test]
    fn test_template_examples_are_valid_keys() {
        let uncommented: String = DOCUMENTED_KEYS.iter()
            .map(|(_, example)| format!("{example}\n"))
            .collect();
        let cfg: ElocompareConfig = toml::from_str(&uncommented).unwrap();
        assert_eq!(cfg.rounds, Some(2000));
        assert_eq!(cfg.k_factor, Some(32.0));
        assert_eq!(cfg.rankings.as_deref(), Some("rankings.csv"));
    }

    #[test]
    fn test_load_partial_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "rounds = 150\nk_factor = 16.0\nresults = \"out/log.csv\"\n").unwrap();

        let cfg = ElocompareConfig::load(&path).unwrap();
        assert_eq!(cfg.rounds, Some(150));
        assert_eq!(cfg.k_factor, Some(16.0));
        assert_eq!(cfg.results.as_deref(), Some("out/log.csv"));
        assert_eq!(cfg.recency_window, None);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "round = 5\n").unwrap();
        assert!(matches!(ElocompareConfig::load(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = ElocompareConfig::load(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(cfg, ElocompareConfig::default());
    }

    #[test]
    fn test_write_template_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        ElocompareConfig::write_template(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), template());
        assert_eq!(ElocompareConfig::load(&path).unwrap(), ElocompareConfig::default());

        assert!(matches!(ElocompareConfig::write_template(&path), Err(ConfigError::Write { .. })));
    }
}
