//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for chat-relay
#[derive(Parser, Debug)]
#[command(name = "chat-relay")]
#[command(author, version, about = "Chat completion relay with optional conversation history")]
#[command(long_about = r#"
chat-relay accepts chat requests over HTTP, forwards them to an
OpenAI-compatible provider, and answers with either a Server-Sent Events
stream or a single JSON document. When a document store is configured, every
user and assistant turn is recorded under a conversation id.

Configuration is merged from (later wins):
1. Built-in defaults
2. ~/.config/chat-relay/config.toml   Global config
3. ./chat-relay.toml                  Project-level config
4. --config <path>                    Explicit config file
5. OPENAI_* / APPWRITE_* variables    Deployment environment
6. RELAY_SECTION__KEY variables       e.g. RELAY_PROVIDER__API_KEY

Example:
  OPENAI_API_KEY=sk-... OPENAI_BASE_URL=https://api.example.com/v1 chat-relay
  chat-relay --config relay.toml --port 8080 -vv
"#)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Address to bind (overrides server.host)
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Port to listen on (overrides server.port)
    #[arg(short, long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,

    /// Show configuration sources and exit
    #[arg(long)]
    pub print_config_sources: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_overrides() {
        let cli = Cli::parse_from([
            "chat-relay",
            "--config",
            "relay.toml",
            "--host",
            "127.0.0.1",
            "-p",
            "8080",
            "-vv",
            "--log-json",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("relay.toml")));
        assert_eq!(cli.host.as_deref(), Some("127.0.0.1"));
        assert_eq!(cli.port, Some(8080));
        assert_eq!(cli.verbose, 2);
        assert!(cli.log_json);
        assert!(!cli.print_config_sources);
    }

    #[test]
    fn defaults_leave_config_untouched() {
        let cli = Cli::parse_from(["chat-relay"]);
        assert!(cli.config.is_none());
        assert!(cli.host.is_none());
        assert!(cli.port.is_none());
        assert_eq!(cli.verbose, 0);
    }
}
