//! Layered configuration: defaults, global file, project file, environment

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::core::Project;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default author recorded on new and edited entities
    pub author: Option<String>,

    /// Editor command for `pft ... edit`
    pub editor: Option<String>,

    /// Default output format
    pub default_format: Option<String>,
}

impl Config {
    /// Load configuration, later layers overriding earlier ones:
    /// global file, then `.pft/config.yaml`, then `PFT_*` variables.
    pub fn load() -> Self {
        let mut config = Config::default();

        if let Some(layer) = global_config_path().and_then(|p| read_layer(&p)) {
            config = config.overlay(layer);
        }
        if let Ok(project) = Project::discover() {
            if let Some(layer) = read_layer(&project.pft_dir().join("config.yaml")) {
                config = config.overlay(layer);
            }
        }

        if let Ok(author) = std::env::var("PFT_AUTHOR") {
            config.author = Some(author);
        }
        if let Ok(editor) = std::env::var("PFT_EDITOR") {
            config.editor = Some(editor);
        }

        config
    }

    fn overlay(self, layer: Config) -> Config {
        Config {
            author: layer.author.or(self.author),
            editor: layer.editor.or(self.editor),
            default_format: layer.default_format.or(self.default_format),
        }
    }

    /// Author name, falling back to the login user
    pub fn author(&self) -> String {
        self.author
            .clone()
            .or_else(|| std::env::var("USER").ok())
            .or_else(|| std::env::var("USERNAME").ok())
            .unwrap_or_else(|| "unknown".to_string())
    }

    /// Editor command, falling back to $EDITOR / $VISUAL / vi
    pub fn editor(&self) -> String {
        self.editor
            .clone()
            .or_else(|| std::env::var("EDITOR").ok())
            .or_else(|| std::env::var("VISUAL").ok())
            .unwrap_or_else(|| "vi".to_string())
    }

    /// Run the editor on a file; the configured command may carry its own
    /// arguments (e.g. "emacsclient -nw" or "code --wait")
    pub fn run_editor(&self, file_path: &Path) -> std::io::Result<std::process::ExitStatus> {
        let editor = self.editor();
        let mut parts = editor.split_whitespace();

        let mut command = match parts.next() {
            Some(cmd) => std::process::Command::new(cmd),
            None => std::process::Command::new("vi"),
        };
        command.args(parts).arg(file_path).status()
    }
}

fn global_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "pft")
        .map(|dirs| dirs.config_dir().join("config.yaml"))
}

// Unreadable or malformed layers are skipped, never fatal.
fn read_layer(path: &Path) -> Option<Config> {
    if !path.exists() {
        return None;
    }
    let contents = std::fs::read_to_string(path).ok()?;
    serde_yml::from_str(&contents).ok()
}
