//! Project configuration read from `basil.toml`.
//!
//! Every section and key is optional:
//!
//! ```toml
//! [project]
//! name = "Ledger"                 # program name when no entry point is found
//! extensions = ["bas", "cls"]
//! output = "build"                # relative to the project directory
//!
//! [translate]
//! entry_points = ["Main", "Start"]
//! imports = ["System", "Microsoft.VisualBasic"]
//! runtime = "support/Runtime.vb"
//!
//! [compiler]
//! command = "vbc"
//! args = ["-nologo", "-out:{output}", "{files}"]
//! ```

use std::path::{Path, PathBuf};

use basil_rewrite::options::{DEFAULT_ENTRY_POINTS, DEFAULT_IMPORTS};
use basil_rewrite::TranslateOptions;
use serde::Deserialize;

/// File name looked up in the project directory.
pub const CONFIG_FILE: &str = "basil.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub project: Project,
    #[serde(default)]
    pub translate: Translate,
    #[serde(default)]
    pub compiler: Option<CompilerConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Project {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    #[serde(default)]
    pub output: Option<PathBuf>,
}

impl Default for Project {
    fn default() -> Self {
        Self {
            name: default_name(),
            extensions: default_extensions(),
            output: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Translate {
    #[serde(default = "default_entry_points")]
    pub entry_points: Vec<String>,
    #[serde(default = "default_imports")]
    pub imports: Vec<String>,
    /// Runtime-support source shipped with the output instead of the
    /// built-in one.
    #[serde(default)]
    pub runtime: Option<PathBuf>,
}

impl Default for Translate {
    fn default() -> Self {
        Self {
            entry_points: default_entry_points(),
            imports: default_imports(),
            runtime: None,
        }
    }
}

/// External compiler invocation. `{output}` in an argument is replaced by
/// the artifact path, an argument equal to `{files}` by every output file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompilerConfig {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

fn default_name() -> String {
    "vbProgram".to_string()
}

fn default_extensions() -> Vec<String> {
    ["bas", "cls", "frm"].iter().map(|s| s.to_string()).collect()
}

fn default_entry_points() -> Vec<String> {
    DEFAULT_ENTRY_POINTS.iter().map(|s| s.to_string()).collect()
}

fn default_imports() -> Vec<String> {
    DEFAULT_IMPORTS.iter().map(|s| s.to_string()).collect()
}

impl Config {
    /// Read and parse a config file.
    pub fn from_file(path: &Path) -> Result<Config, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        Self::from_str(&content).map_err(|e| format!("{}: {}", path.display(), e))
    }

    /// Parse a config from a string.
    pub fn from_str(content: &str) -> Result<Config, String> {
        toml::from_str(content).map_err(|e| format!("Failed to parse config: {}", e))
    }

    /// The explicit file if given, else `basil.toml` in `dir` if present,
    /// else the defaults.
    pub fn load(dir: &Path, explicit: Option<&Path>) -> Result<Config, String> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let path = dir.join(CONFIG_FILE);
                if path.is_file() {
                    Self::from_file(&path)
                } else {
                    Ok(Config::default())
                }
            }
        }
    }

    pub fn translate_options(&self) -> TranslateOptions {
        TranslateOptions {
            entry_points: self.translate.entry_points.clone(),
            imports: self.translate.imports.clone(),
        }
    }
}
