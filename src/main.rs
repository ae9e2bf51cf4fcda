use anyhow::{Context, Result};
use content_fallback::config::{Config, ConfigOverrides};
use content_fallback::fallback::{ContentCategory, FallbackEngine};
use content_fallback::scheduler;
use content_fallback::store::FileContentStore;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;

/// One console command, parsed from a stdin line.
#[derive(Debug, PartialEq)]
enum Command {
    Resolve {
        content_id: String,
        language: String,
        category: ContentCategory,
    },
    Validate {
        content_id: String,
        language: String,
        category: ContentCategory,
    },
    Analytics,
    Stats,
    Clear,
    Sweep,
    Quit,
}

impl Command {
    fn parse(line: &str) -> Result<Option<Self>, String> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((name, args)) = words.split_first() else {
            return Ok(None);
        };

        let command = match (*name, args) {
            ("resolve", [id, lang, category]) => Command::Resolve {
                content_id: id.to_string(),
                language: lang.to_string(),
                category: ContentCategory::from(*category),
            },
            ("validate", [id, lang, category]) => Command::Validate {
                content_id: id.to_string(),
                language: lang.to_string(),
                category: ContentCategory::from(*category),
            },
            ("resolve" | "validate", _) => {
                return Err(format!("usage: {} <content_id> <language> <category>", name))
            }
            ("analytics", []) => Command::Analytics,
            ("stats", []) => Command::Stats,
            ("clear", []) => Command::Clear,
            ("sweep", []) => Command::Sweep,
            ("quit" | "exit", []) => Command::Quit,
            _ => return Err(format!("unknown command: {}", line.trim())),
        };
        Ok(Some(command))
    }
}

async fn execute(engine: &FallbackEngine, command: Command) -> Result<Value> {
    let output = match command {
        Command::Resolve {
            content_id,
            language,
            category,
        } => serde_json::to_value(
            engine
                .resolve_content_with_fallback(&content_id, &language, &category, None)
                .await,
        )?,
        Command::Validate {
            content_id,
            language,
            category,
        } => serde_json::to_value(
            engine
                .validate_fallback_chain(&content_id, &language, &category)
                .await,
        )?,
        Command::Analytics => serde_json::to_value(engine.analytics())?,
        Command::Stats => serde_json::to_value(engine.cache_stats())?,
        Command::Clear => {
            engine.clear_cache();
            json!({ "cleared": true })
        }
        Command::Sweep => serde_json::to_value(engine.sweep_cache())?,
        Command::Quit => json!({ "bye": true }),
    };
    Ok(output)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    // Logs go to stderr; stdout carries only command output
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("content_fallback=info".parse()?),
        )
        .init();

    info!("Starting content fallback console");

    let config = Config::from_env()?;
    info!("Serving content from {}", config.content_dir.display());

    let store = Arc::new(FileContentStore::new(&config.content_dir));
    let engine = Arc::new(FallbackEngine::with_config(store, config.engine_config()));

    if let Some(path) = &config.overrides_file {
        ConfigOverrides::load(path)?.apply(&engine);
    }

    let mut sweeper = scheduler::start_cache_sweeper(Arc::clone(&engine), config.sweep_interval())
        .await
        .context("Failed to start cache sweeper")?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        let (output, quit) = match Command::parse(&line) {
            Ok(None) => continue,
            Ok(Some(command)) => {
                let quit = command == Command::Quit;
                (execute(&engine, command).await?, quit)
            }
            Err(message) => (json!({ "error": message }), false),
        };

        stdout.write_all(format!("{}\n", output).as_bytes()).await?;
        stdout.flush().await?;

        if quit {
            break;
        }
    }

    sweeper.shutdown().await?;
    info!("Console closed");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_resolve() {
        assert_eq!(
            Command::parse("resolve story_01 ml story").unwrap(),
            Some(Command::Resolve {
                content_id: "story_01".to_string(),
                language: "ml".to_string(),
                category: ContentCategory::Story,
            })
        );
    }

    #[test]
    fn test_parse_blank_and_simple() {
        assert_eq!(Command::parse("   ").unwrap(), None);
        assert_eq!(Command::parse("stats").unwrap(), Some(Command::Stats));
        assert_eq!(Command::parse("exit").unwrap(), Some(Command::Quit));
    }

    #[test]
    fn test_parse_errors() {
        assert!(Command::parse("resolve story_01")
            .unwrap_err()
            .starts_with("usage: resolve"));
        assert!(Command::parse("translate x")
            .unwrap_err()
            .contains("unknown command"));
        assert!(Command::parse("stats now").is_err());
    }
}
