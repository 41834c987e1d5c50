use super::Config;
use crate::lyrics::CatalogEntry;

pub const GENIUS_BASE_URL: &str = "https://genius.com";
pub const GOOGLE_TRANSLATE_URL: &str = "https://translate.googleapis.com/translate_a/single";
pub const MYMEMORY_URL: &str = "https://api.mymemory.translated.net/get";

// Plain bot user agents get blocked by the site.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

pub fn defaults() -> Config {
    Config::default()
}

pub fn regional_catalog() -> Vec<CatalogEntry> {
    vec![
        CatalogEntry::new("марафеты", "/Dabbackwood-marathons-lyrics"),
        CatalogEntry::new("баратриум", "/Anacondaz-barathrum-lyrics"),
        CatalogEntry::new("анкаондоз баратриум", "/Anacondaz-barathrum-lyrics"),
        CatalogEntry::new("дэббэквуд марафеты", "/Dabbackwood-marathons-lyrics"),
    ]
}

pub fn international_catalog() -> Vec<CatalogEntry> {
    vec![
        CatalogEntry::new("bohemian rhapsody queen", "/Queen-bohemian-rhapsody-lyrics"),
        CatalogEntry::new("let it be beatles", "/The-Beatles-let-it-be-lyrics"),
        CatalogEntry::new("hotel california eagles", "/Eagles-hotel-california-lyrics"),
    ]
}
