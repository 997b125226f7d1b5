//! Latin-script building names.
//!
//! The transliteration engine is optional. [`Romanizer`] holds it explicitly; with
//! no engine every native name passes through unchanged.

/// Script conversion from Japanese text to romaji
pub trait Transliterate: Send + Sync {
    fn romaji(&self, text: &str) -> String;
}

/// Engine backed by the `kakasi` dictionary
#[cfg(feature = "romaji")]
#[derive(Debug, Default, Clone, Copy)]
pub struct Kakasi;

#[cfg(feature = "romaji")]
impl Transliterate for Kakasi {
    fn romaji(&self, text: &str) -> String {
        kakasi::convert(text).romaji
    }
}

pub struct Romanizer {
    engine: Option<Box<dyn Transliterate>>,
}

impl Romanizer {
    pub fn new(engine: Box<dyn Transliterate>) -> Self {
        Self {
            engine: Some(engine),
        }
    }

    /// Romanizer that returns every name as-is
    pub fn passthrough() -> Self {
        Self { engine: None }
    }

    /// Use the compiled-in engine when there is one
    pub fn detect() -> Self {
        #[cfg(feature = "romaji")]
        {
            Self::new(Box::new(Kakasi))
        }
        #[cfg(not(feature = "romaji"))]
        {
            tracing::debug!("no transliteration engine compiled in, names pass through");
            Self::passthrough()
        }
    }

    pub fn is_available(&self) -> bool {
        self.engine.is_some()
    }

    /// English form of a building name.
    ///
    /// Names already containing Latin letters are kept. Otherwise the engine's
    /// romaji is title-cased word by word. Without an engine, or when it produces
    /// nothing, the native name is returned.
    pub fn to_english_name(&self, name: Option<&str>) -> Option<String> {
        let name = name?.trim();
        if name.is_empty() {
            return None;
        }
        if name.chars().any(|c| c.is_ascii_alphabetic()) {
            return Some(name.to_string());
        }

        let Some(engine) = &self.engine else {
            return Some(name.to_string());
        };

        let romaji = engine.romaji(name);
        let words: Vec<String> = romaji.split_whitespace().map(capitalize).collect();
        if words.is_empty() {
            return Some(name.to_string());
        }
        Some(words.join(" "))
    }
}

impl Default for Romanizer {
    fn default() -> Self {
        Self::detect()
    }
}

impl std::fmt::Debug for Romanizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Romanizer")
            .field("available", &self.is_available())
            .finish()
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
