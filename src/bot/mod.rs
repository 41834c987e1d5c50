//! Chat front end
//!
//! Turns incoming chat messages into replies: commands, the blank-query guard,
//! lyrics lookup, optional translation and splitting of long replies.

pub mod console;

use crate::config::BotConfig;
use crate::lyrics::{GeniusClient, LyricsResult, SearchOutcome};
use crate::translate::Translator;

pub const START_TEXT: &str = "🎵 Welcome to Lyrics Bot!

I can find the lyrics of almost any song on Genius.

How to use:
• Just send the song title and the artist
• For example: \"Bohemian Rhapsody Queen\" or \"Марафеты Дэббэквуд\"

Commands:
/start - show this message
/help - usage help";

pub const HELP_TEXT: &str = "📖 Help

🔍 Finding lyrics:
Send the song title and the artist in any order.

Example queries:
• \"Bohemian Rhapsody Queen\"
• \"Марафеты Дэббэквуд\"
• \"Баратриум Анакондаз\"
• \"Hotel California Eagles\"

⚠️ Tips:
• Include both the title and the artist for better matches
• Lyrics are looked up on Genius
• If nothing is found, try rephrasing the query

🔄 If the bot does not answer, try again later - the site may be temporarily unavailable.";

pub const EMPTY_QUERY_TEXT: &str = "Please enter a song title and artist.";
pub const SEARCHING_TEXT: &str = "🔍 Searching for lyrics...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Search(String),
}

/// Classify a message. Blank messages yield `None`.
pub fn parse_message(text: &str) -> Option<Command> {
    let text = text.trim();
    match text {
        "" => None,
        "/start" => Some(Command::Start),
        "/help" => Some(Command::Help),
        query => Some(Command::Search(query.to_string())),
    }
}

#[derive(Debug, Clone)]
struct Translation {
    translator: Translator,
    target: String,
    source: String,
}

#[derive(Debug, Clone)]
pub struct Bot {
    genius: GeniusClient,
    translation: Option<Translation>,
    max_message_len: usize,
}

impl Bot {
    /// Translation is enabled only when both a translator and a target language are given.
    pub fn new(genius: GeniusClient, cfg: &BotConfig, translator: Option<Translator>) -> Self {
        let translation = cfg
            .translate_to
            .clone()
            .zip(translator)
            .map(|(target, translator)| Translation {
                translator,
                target,
                source: cfg.translate_from.clone(),
            });

        Self {
            genius,
            translation,
            max_message_len: cfg.max_message_len,
        }
    }

    /// Replies for one incoming message, in sending order.
    pub async fn handle(&self, text: &str) -> Vec<String> {
        match parse_message(text) {
            None => vec![EMPTY_QUERY_TEXT.to_string()],
            Some(Command::Start) => vec![START_TEXT.to_string()],
            Some(Command::Help) => vec![HELP_TEXT.to_string()],
            Some(Command::Search(query)) => self.lookup(&query).await,
        }
    }

    pub async fn lookup(&self, query: &str) -> Vec<String> {
        match self.genius.search(query).await {
            SearchOutcome::Found(result) => {
                let result = self.translate(result).await;
                format_reply(&result, self.max_message_len)
            }
            SearchOutcome::Missing(err) => vec![format!("❌ {err}")],
        }
    }

    async fn translate(&self, result: LyricsResult) -> LyricsResult {
        let Some(t) = &self.translation else {
            return result;
        };
        let lyrics = t
            .translator
            .translate(&result.lyrics, &t.target, &t.source)
            .await;
        LyricsResult { lyrics, ..result }
    }
}

/// Format a result as one message, or as several when it exceeds `max_len` characters.
pub fn format_reply(result: &LyricsResult, max_len: usize) -> Vec<String> {
    let header = format!("🎵 {}\n\n", result.title);
    let full = format!("{header}{}\n\n🔗 {}", result.lyrics, result.url);
    if full.chars().count() <= max_len {
        return vec![full];
    }

    let mut replies: Vec<String> = split_lyrics(&header, &result.lyrics, max_len)
        .into_iter()
        .enumerate()
        .map(|(i, part)| {
            if i == 0 {
                part
            } else {
                format!("📄 Continued {}:\n{part}", i + 1)
            }
        })
        .collect();
    replies.push(format!("🔗 Full lyrics: {}", result.url));
    replies
}

/// Split on line boundaries. A single line longer than `max_len` is kept whole.
fn split_lyrics(header: &str, lyrics: &str, max_len: usize) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = header.to_string();
    let mut current_len = current.chars().count();

    for line in lyrics.split('\n') {
        let line_len = line.chars().count() + 1;
        if current_len + line_len > max_len && current != header {
            parts.push(std::mem::take(&mut current));
            current_len = 0;
        }
        current.push_str(line);
        current.push('\n');
        current_len += line_len;
    }

    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeniusConfig;
    use crate::lyrics::StaticCatalog;

    fn result(lyrics: &str) -> LyricsResult {
        LyricsResult {
            title: "Queen – Bohemian Rhapsody".to_string(),
            lyrics: lyrics.to_string(),
            url: "https://genius.com/Queen-bohemian-rhapsody-lyrics".to_string(),
        }
    }

    #[test]
    fn test_parse_message() {
        assert_eq!(parse_message("   \n\t"), None);
        assert_eq!(parse_message("/start"), Some(Command::Start));
        assert_eq!(parse_message(" /help "), Some(Command::Help));
        assert_eq!(
            parse_message("  Hotel California Eagles "),
            Some(Command::Search("Hotel California Eagles".to_string()))
        );
    }

    #[test]
    fn test_short_reply_is_single_message() {
        let replies = format_reply(&result("Is this the real life?"), 4000);
        assert_eq!(
            replies,
            vec![
                "🎵 Queen – Bohemian Rhapsody\n\nIs this the real life?\n\n🔗 https://genius.com/Queen-bohemian-rhapsody-lyrics"
            ]
        );
    }

    #[test]
    fn test_long_reply_is_split_on_lines() {
        let lines: Vec<String> = (0..40).map(|i| format!("line number {i:02}")).collect();
        let lyrics = lines.join("\n");
        let replies = format_reply(&result(&lyrics), 120);

        assert!(replies.len() > 3);
        assert!(replies[0].starts_with("🎵 Queen – Bohemian Rhapsody\n\nline number 00\n"));
        assert!(replies[1].starts_with("📄 Continued 2:\n"));
        assert_eq!(
            replies.last().unwrap(),
            "🔗 Full lyrics: https://genius.com/Queen-bohemian-rhapsody-lyrics"
        );

        let parts = &replies[..replies.len() - 1];
        for part in parts.iter().skip(1) {
            let body = part.split_once(":\n").unwrap().1;
            assert!(body.chars().count() <= 120);
        }

        let mut rejoined = String::new();
        for (i, part) in parts.iter().enumerate() {
            let body = if i == 0 {
                part.strip_prefix("🎵 Queen – Bohemian Rhapsody\n\n").unwrap()
            } else {
                part.split_once(":\n").unwrap().1
            };
            rejoined.push_str(body);
        }
        assert_eq!(rejoined.trim_end(), lyrics);
    }

    #[test]
    fn test_oversized_line_is_kept_whole() {
        let long_line = "a".repeat(50);
        let parts = split_lyrics("H\n\n", &format!("{long_line}\nshort"), 20);
        assert_eq!(parts, vec![format!("H\n\n{long_line}\n"), "short\n".to_string()]);
    }

    #[tokio::test]
    async fn test_handle_guards_and_reports() {
        let server = mockito::Server::new_async().await;
        let genius = GeniusClient::new(
            &GeniusConfig {
                base_url: server.url(),
                ..GeniusConfig::default()
            },
            StaticCatalog::default(),
        )
        .unwrap();
        let bot = Bot::new(genius, &BotConfig::default(), None);

        assert_eq!(bot.handle("   ").await, vec![EMPTY_QUERY_TEXT]);
        assert_eq!(bot.handle("/help").await, vec![HELP_TEXT]);
        assert_eq!(
            bot.handle("zzz_nonexistent_song_xyz123").await,
            vec!["❌ song not found, try rephrasing"]
        );
    }
}
