//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

/// Application directory under the platform config dir
const APP_DIR: &str = "incident-quorum";

/// Project-level config file names, checked in order
const PROJECT_FILES: [&str; 2] = ["incident-quorum.toml", ".incident-quorum.toml"];

/// Environment variable prefix; `__` separates nested keys
/// (`INCIDENT_QUORUM_ANALYSIS__MAX_CONCURRENCY=2`)
pub const ENV_PREFIX: &str = "INCIDENT_QUORUM_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `INCIDENT_QUORUM_*` environment variables
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./incident-quorum.toml` or `./.incident-quorum.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/incident-quorum/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        Self::figment(config_path).extract().map_err(Box::new)
    }

    /// The merged figment, before extraction
    pub fn figment(config_path: Option<&PathBuf>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(&path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    ///
    /// Returns `$XDG_CONFIG_HOME/incident-quorum/config.toml` if set,
    /// otherwise the platform config directory equivalent
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Describe the config sources being used, highest priority first
    pub fn describe_sources(config_path: Option<&Path>) -> Vec<String> {
        let mark = |found: bool| if found { "[FOUND]" } else { "[     ]" };
        let mut lines = Vec::new();

        let env_vars = std::env::vars()
            .filter(|(key, _)| key.starts_with(ENV_PREFIX))
            .count();
        lines.push(format!(
            "{} Env:     {}* ({} set)",
            mark(env_vars > 0),
            ENV_PREFIX,
            env_vars
        ));

        if let Some(path) = config_path {
            lines.push(format!("{} Explicit: {}", mark(path.exists()), path.display()));
        }

        match Self::project_config_path() {
            Some(path) => lines.push(format!("{} Project: {}", mark(true), path.display())),
            None => lines.push(format!(
                "{} Project: ./{} or ./{}",
                mark(false),
                PROJECT_FILES[0],
                PROJECT_FILES[1]
            )),
        }

        if let Some(path) = Self::global_config_path() {
            lines.push(format!("{} Global:  {}", mark(path.exists()), path.display()));
        }

        lines.push(format!("{} Default: built-in defaults", mark(true)));
        lines
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources(config_path: Option<&Path>) {
        println!("Configuration sources (in priority order):");
        for line in Self::describe_sources(config_path) {
            println!("  {}", line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FileOutputFormat;
    use crate::providers::BackendKind;
    use figment::Jail;

    /// Point the global config dir into the jail so a real user config is ignored
    fn isolate(jail: &mut Jail) {
        let home = jail.directory().to_path_buf();
        jail.set_env("XDG_CONFIG_HOME", home.join("xdg").display());
        jail.set_env("HOME", home.display());
    }

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config, FileConfig::default());
        assert_eq!(config.analysis.max_concurrency, 4);
    }

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().to_string_lossy().contains("incident-quorum"));
    }

    #[test]
    fn test_project_file_overrides_defaults() {
        Jail::expect_with(|jail| {
            isolate(jail);
            jail.create_file(
                "incident-quorum.toml",
                r#"
[backend]
kind = "ollama"

[analysis]
max_tokens = 300
"#,
            )?;

            let config = ConfigLoader::load(None).map_err(|e| *e)?;
            assert_eq!(config.backend.kind, BackendKind::Ollama);
            assert_eq!(config.analysis.max_tokens, 300);
            assert_eq!(config.analysis.consistency_max_tokens, 400);
            Ok(())
        });
    }

    #[test]
    fn test_explicit_file_overrides_project_file() {
        Jail::expect_with(|jail| {
            isolate(jail);
            jail.create_file(".incident-quorum.toml", "[output]\nformat = \"full\"\n")?;
            jail.create_file("custom.toml", "[output]\nformat = \"json\"\n")?;

            let path = PathBuf::from("custom.toml");
            let config = ConfigLoader::load(Some(&path)).map_err(|e| *e)?;
            assert_eq!(config.output.format, Some(FileOutputFormat::Json));
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_files() {
        Jail::expect_with(|jail| {
            isolate(jail);
            jail.create_file(
                "incident-quorum.toml",
                "[analysis]\nmax_concurrency = 3\ntemperature = 0.5\n",
            )?;
            jail.set_env("INCIDENT_QUORUM_ANALYSIS__MAX_CONCURRENCY", "1");
            jail.set_env("INCIDENT_QUORUM_BACKEND__MODEL", "llama3.2");

            let config = ConfigLoader::load(None).map_err(|e| *e)?;
            assert_eq!(config.analysis.max_concurrency, 1);
            assert_eq!(config.analysis.temperature, 0.5);
            assert_eq!(config.backend.model.as_deref(), Some("llama3.2"));
            Ok(())
        });
    }

    #[test]
    fn test_global_file_is_lowest_file_priority() {
        Jail::expect_with(|jail| {
            isolate(jail);
            std::fs::create_dir_all(jail.directory().join("xdg/incident-quorum"))
                .expect("create global config dir");
            jail.create_file(
                "xdg/incident-quorum/config.toml",
                "[analysis]\nmax_tokens = 100\nknowledge_max_tokens = 200\n",
            )?;
            jail.create_file("incident-quorum.toml", "[analysis]\nmax_tokens = 350\n")?;

            let config = ConfigLoader::load(None).map_err(|e| *e)?;
            assert_eq!(config.analysis.max_tokens, 350);
            assert_eq!(config.analysis.knowledge_max_tokens, 200);
            Ok(())
        });
    }

    #[test]
    fn test_invalid_value_is_an_error() {
        Jail::expect_with(|jail| {
            isolate(jail);
            jail.create_file("incident-quorum.toml", "[analysis]\nmax_concurrency = \"many\"\n")?;
            assert!(ConfigLoader::load(None).is_err());
            Ok(())
        });
    }

    #[test]
    fn test_describe_sources_marks_project_file() {
        Jail::expect_with(|jail| {
            isolate(jail);
            jail.create_file("incident-quorum.toml", "")?;

            let lines = ConfigLoader::describe_sources(None);
            assert!(lines.iter().any(|l| l == "[FOUND] Project: incident-quorum.toml"));
            assert!(lines.last().unwrap().contains("built-in defaults"));
            Ok(())
        });
    }
}
