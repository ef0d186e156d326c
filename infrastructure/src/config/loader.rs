//! Configuration loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
    value::{Uncased, UncasedStr},
};
use std::path::{Path, PathBuf};

/// Project-level config file name
const PROJECT_CONFIG_FILE: &str = "chat-relay.toml";

/// Deployment environment variables and the config keys they set.
const DEPLOYMENT_ENV: &[(&str, &str)] = &[
    ("OPENAI_API_KEY", "provider.api_key"),
    ("OPENAI_BASE_URL", "provider.base_url"),
    ("APPWRITE_API_KEY", "storage.api_key"),
    ("APPWRITE_ENDPOINT", "storage.endpoint"),
    ("APPWRITE_DATABASE_ID", "storage.database_id"),
    ("APPWRITE_COLLECTION_ID", "storage.collection_id"),
    ("APPWRITE_FUNCTION_PROJECT_ID", "storage.project_id"),
];

fn deployment_key(name: &UncasedStr) -> Uncased<'_> {
    DEPLOYMENT_ENV
        .iter()
        .find(|(env, _)| name.as_str().eq_ignore_ascii_case(env))
        .map_or_else(|| name.into(), |(_, key)| Uncased::from(*key))
}

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `RELAY_*` variables (`RELAY_PROVIDER__API_KEY`, `RELAY_SERVER__PORT`, ...)
    /// 2. Deployment variables (`OPENAI_API_KEY`, `APPWRITE_*`)
    /// 3. Explicit config path (if provided)
    /// 4. Project root: `./chat-relay.toml`
    /// 5. XDG config: `$XDG_CONFIG_HOME/chat-relay/config.toml`
    /// 6. Default values
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, Box<figment::Error>> {
        Self::figment(config_path).extract().map_err(Box::new)
    }

    /// Build the merged figment without extracting it.
    pub fn figment(config_path: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        let deployment_names: Vec<&str> = DEPLOYMENT_ENV.iter().map(|(env, _)| *env).collect();

        figment
            .merge(Env::raw().only(&deployment_names).map(deployment_key))
            .merge(Env::prefixed("RELAY_").split("__"))
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/chat-relay/config.toml if set,
    /// otherwise falls back to ~/.config/chat-relay/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("chat-relay").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        let path = PathBuf::from(PROJECT_CONFIG_FILE);
        path.exists().then_some(path)
    }

    /// Describe the config file locations being used (for debugging)
    pub fn describe_sources(config_path: Option<&Path>) -> Vec<String> {
        let mut lines = vec!["Configuration sources (in priority order):".to_string()];

        lines.push("  [ env ] RELAY_* and deployment variables".to_string());

        if let Some(path) = config_path {
            let mark = if path.exists() { "FOUND" } else { "MISSING" };
            lines.push(format!("  [{mark}] Explicit: {}", path.display()));
        }

        match Self::project_config_path() {
            Some(path) => lines.push(format!("  [FOUND] Project: {}", path.display())),
            None => lines.push(format!("  [     ] Project: ./{PROJECT_CONFIG_FILE}")),
        }

        if let Some(path) = Self::global_config_path() {
            let mark = if path.exists() { "FOUND" } else { "     " };
            lines.push(format!("  [{mark}] Global:  {}", path.display()));
        }

        lines.push("  [     ] Default: built-in defaults".to_string());
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_global_config_path_mentions_app() {
        if let Some(path) = ConfigLoader::global_config_path() {
            assert!(path.to_string_lossy().contains("chat-relay"));
        }
    }

    #[test]
    fn test_project_file_is_merged() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file(
                PROJECT_CONFIG_FILE,
                r#"
                [server]
                port = 8080

                [provider]
                api_key = "sk-file"
                base_url = "https://api.example.com/v1"

                [defaults]
                model = "gpt-4o-mini"
                "#,
            )?;

            let config = ConfigLoader::load(None).map_err(|e| *e)?;
            assert_eq!(config.server.port, 8080);
            assert_eq!(config.provider.api_key.as_deref(), Some("sk-file"));
            assert_eq!(config.defaults.model, "gpt-4o-mini");
            // Untouched keys keep their defaults.
            assert_eq!(config.defaults.max_tokens, 1240);
            Ok(())
        });
    }

    #[test]
    fn test_deployment_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file(
                PROJECT_CONFIG_FILE,
                r#"
                [provider]
                api_key = "sk-file"
                base_url = "https://api.example.com/v1"
                "#,
            )?;
            jail.set_env("OPENAI_API_KEY", "sk-env");
            jail.set_env("APPWRITE_DATABASE_ID", "db-main");

            let config = ConfigLoader::load(None).map_err(|e| *e)?;
            assert_eq!(config.provider.api_key.as_deref(), Some("sk-env"));
            assert_eq!(
                config.provider.base_url.as_deref(),
                Some("https://api.example.com/v1")
            );
            assert_eq!(config.storage.database_id.as_deref(), Some("db-main"));
            Ok(())
        });
    }

    #[test]
    fn test_prefixed_env_has_highest_priority() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env("OPENAI_API_KEY", "sk-deploy");
            jail.set_env("RELAY_PROVIDER__API_KEY", "sk-relay");
            jail.set_env("RELAY_SERVER__PORT", "9090");

            let config = ConfigLoader::load(None).map_err(|e| *e)?;
            assert_eq!(config.provider.api_key.as_deref(), Some("sk-relay"));
            assert_eq!(config.server.port, 9090);
            Ok(())
        });
    }

    #[test]
    fn test_explicit_file_overrides_project_file() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file(PROJECT_CONFIG_FILE, "[server]\nport = 1111\n")?;
            jail.create_file("custom.toml", "[server]\nport = 2222\n")?;

            let config = ConfigLoader::load(Some(Path::new("custom.toml"))).map_err(|e| *e)?;
            assert_eq!(config.server.port, 2222);
            Ok(())
        });
    }

    #[test]
    fn test_describe_sources_lists_explicit_path() {
        let lines = ConfigLoader::describe_sources(Some(Path::new("/nonexistent/relay.toml")));
        assert!(lines.iter().any(|l| l.contains("MISSING")));
        assert!(lines.last().unwrap().contains("Default"));
    }
}
