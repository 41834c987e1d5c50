mod bot;
mod config;
mod lyrics;
mod translate;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "lyricsbot", version, about = "Song lyrics chat bot backed by Genius")]
struct Cli {
    /// Override config file path.
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Chat with the bot on stdin/stdout (default).
    Chat,
    /// Look up lyrics once and print the reply (headless).
    Search {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
        /// Translate the lyrics into this language.
        #[arg(long)]
        translate: Option<String>,
        /// Print the raw result as JSON instead of chat messages.
        #[arg(long, conflicts_with = "translate")]
        json: bool,
    },
    /// Extract lyrics from a known song page URL.
    Page { url: String },
    /// Static fallback catalog management.
    Catalog {
        #[command(subcommand)]
        cmd: Option<CatalogCommand>,
    },
}

#[derive(Debug, Subcommand)]
enum CatalogCommand {
    /// List entries in match order (default).
    List,
    /// Map a query fragment to a song page path.
    Add {
        pattern: String,
        /// Site-relative path, e.g. /Queen-bohemian-rhapsody-lyrics
        path: String,
        /// Add to the international group instead of the regional one.
        #[arg(long)]
        international: bool,
    },
    /// Remove every entry with this pattern.
    Remove { pattern: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut cfg = config::load(cli.config.as_deref()).context("load config")?;
    let genius = lyrics::GeniusClient::new(&cfg.genius, cfg.catalog.build())
        .context("create genius client")?;

    match cli.command.unwrap_or(Command::Chat) {
        Command::Chat => {
            let bot = make_bot(genius, &cfg)?;
            let delay = Duration::from_millis(cfg.bot.part_delay_ms);
            bot::console::run(bot, delay).await?;
        }
        Command::Search {
            query,
            translate,
            json,
        } => {
            let query = query.join(" ");
            if bot::parse_message(&query).is_none() {
                anyhow::bail!(bot::EMPTY_QUERY_TEXT);
            }

            if json {
                match genius.search(&query).await {
                    lyrics::SearchOutcome::Found(result) => {
                        println!("{}", serde_json::to_string_pretty(&result)?);
                    }
                    lyrics::SearchOutcome::Missing(err) => anyhow::bail!(err),
                }
            } else {
                if translate.is_some() {
                    cfg.bot.translate_to = translate;
                }
                let bot = make_bot(genius, &cfg)?;
                for reply in bot.lookup(query.trim()).await {
                    println!("{reply}\n");
                }
            }
        }
        Command::Page { url } => {
            let result = genius.fetch_lyrics(&url).await?;
            println!("{}\n\n{}", result.title, result.lyrics);
        }
        Command::Catalog { cmd } => match cmd.unwrap_or(CatalogCommand::List) {
            CatalogCommand::List => {
                for (i, entry) in genius.catalog().entries().iter().enumerate() {
                    println!("{:02}. {:<28} {}", i + 1, entry.pattern, entry.path);
                }
            }
            CatalogCommand::Add {
                pattern,
                path,
                international,
            } => {
                let entry = lyrics::CatalogEntry::new(pattern.trim().to_lowercase(), path);
                if international {
                    cfg.catalog.international.push(entry);
                } else {
                    cfg.catalog.regional.push(entry);
                }
                config::save(&cfg, cli.config.as_deref()).context("save config")?;
                println!("Added catalog entry.");
            }
            CatalogCommand::Remove { pattern } => {
                let pattern = pattern.trim().to_lowercase();
                let before = cfg.catalog.regional.len() + cfg.catalog.international.len();
                cfg.catalog.regional.retain(|e| e.pattern != pattern);
                cfg.catalog.international.retain(|e| e.pattern != pattern);
                let removed =
                    before - cfg.catalog.regional.len() - cfg.catalog.international.len();
                config::save(&cfg, cli.config.as_deref()).context("save config")?;
                println!("Removed {removed} catalog entries.");
            }
        },
    }

    Ok(())
}

fn make_bot(genius: lyrics::GeniusClient, cfg: &config::Config) -> anyhow::Result<bot::Bot> {
    let translator = match cfg.bot.translate_to {
        Some(_) => Some(translate::Translator::new(&cfg.translate)?),
        None => None,
    };
    Ok(bot::Bot::new(genius, &cfg.bot, translator))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_output_rejects_translation() {
        let parsed = Cli::try_parse_from(["lyricsbot", "search", "x", "--json", "--translate", "ru"]);
        assert!(parsed.is_err());

        let cli = Cli::try_parse_from(["lyricsbot", "search", "let", "it", "be", "--json"]).unwrap();
        match cli.command {
            Some(Command::Search {
                query,
                translate,
                json,
            }) => {
                assert_eq!(query, vec!["let", "it", "be"]);
                assert_eq!(translate, None);
                assert!(json);
            }
            other => panic!("expected search, got {other:?}"),
        }
    }

    #[test]
    fn test_catalog_add_parses() {
        let cli = Cli::try_parse_from([
            "lyricsbot",
            "catalog",
            "add",
            "Bohemian Rhapsody",
            "/Queen-bohemian-rhapsody-lyrics",
            "--international",
        ])
        .unwrap();
        match cli.command {
            Some(Command::Catalog {
                cmd:
                    Some(CatalogCommand::Add {
                        pattern,
                        path,
                        international,
                    }),
            }) => {
                assert_eq!(pattern, "Bohemian Rhapsody");
                assert_eq!(path, "/Queen-bohemian-rhapsody-lyrics");
                assert!(international);
            }
            other => panic!("expected catalog add, got {other:?}"),
        }
    }
}
