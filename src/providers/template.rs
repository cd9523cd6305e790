//! Template lyrics
//!
//! Offline lyric writer: fills a genre-specific verse/chorus template with
//! the input theme and its first word. Always available, so it terminates
//! the lyrics chain.

use super::provider::{LyricsGenerator, Provider, ProviderInfo};
use crate::error::{AuraError, Result};
use crate::synth::genre::canonical;

/// Key word used when the theme has no words
const FALLBACK_KEY_WORD: &str = "dreams";

/// Genre-templated lyric writer
pub struct TemplateLyrics {
    info: ProviderInfo,
}

impl TemplateLyrics {
    pub fn new() -> Self {
        Self {
            info: ProviderInfo::new(
                "template-lyrics",
                "Template Lyrics",
                "Genre-specific verse/chorus templates filled with the theme",
                &["lyrics"],
                false,
            ),
        }
    }

    /// Render the template for `genre` around `theme`
    pub fn render(theme: &str, genre: &str) -> String {
        let key_word = theme
            .to_lowercase()
            .split_whitespace()
            .next()
            .map(str::to_string)
            .unwrap_or_else(|| FALLBACK_KEY_WORD.to_string());

        match canonical(genre).as_str() {
            "rock" => rock(theme, &key_word),
            "hip-hop" => hip_hop(theme, &key_word),
            _ => pop(theme, &key_word, genre.trim()),
        }
    }
}

impl Default for TemplateLyrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Provider for TemplateLyrics {
    fn info(&self) -> &ProviderInfo {
        &self.info
    }
}

impl LyricsGenerator for TemplateLyrics {
    fn generate_lyrics(&self, prompt: &str, genre: &str) -> Result<String> {
        if prompt.trim().is_empty() {
            return Err(AuraError::invalid_input("lyrics theme is empty"));
        }
        Ok(Self::render(prompt.trim(), genre))
    }
}

fn rock(theme: &str, key_word: &str) -> String {
    let chorus = format!(
        "Chorus:\n\
         We're breaking free from {theme}\n\
         Rock and roll runs through our veins\n\
         Every chord, every beat\n\
         Makes our rebel hearts complete"
    );
    format!(
        "Verse 1:\n\
         Thunder in the distance, {key_word} calling my name\n\
         Electric guitars screaming, nothing's quite the same\n\
         {theme} burns inside me like a raging fire\n\
         Taking me higher and higher\n\
         \n\
         {chorus}\n\
         \n\
         Verse 2:\n\
         Leather jacket stories of {key_word} and pain\n\
         Drumbeats like my heartbeat driving me insane\n\
         {theme} is the anthem of our generation\n\
         Rock and roll salvation\n\
         \n\
         {chorus}\n\
         \n\
         Bridge:\n\
         When the world gets heavy\n\
         And the road gets long\n\
         {key_word} will guide us\n\
         In this rock and roll song\n\
         \n\
         Outro:\n\
         {theme}... our rock and roll dream"
    )
}

fn hip_hop(theme: &str, key_word: &str) -> String {
    let chorus = format!(
        "Chorus:\n\
         {theme} on my mind, hustle in my soul\n\
         Hip-hop is the rhythm that makes me feel whole\n\
         From the streets to the stage, this is how we roll\n\
         {key_word} and ambition, that's how we take control"
    );
    format!(
        "Verse 1:\n\
         Started from the bottom, now we here with {theme}\n\
         Every beat's a lesson, every rhyme's a test\n\
         {key_word} in my pocket, dreams up in my head\n\
         Spitting fire bars until the day I'm dead\n\
         \n\
         {chorus}\n\
         \n\
         Verse 2:\n\
         Microphone check, one-two, {theme} in the booth\n\
         Speaking nothing but the realest, that's the honest truth\n\
         {key_word} motivates me when the going gets tough\n\
         In this hip-hop game, you gotta be rough\n\
         \n\
         {chorus}\n\
         \n\
         Outro:\n\
         {theme}, yeah, that's my story\n\
         Hip-hop forever, this is our glory"
    )
}

fn pop(theme: &str, key_word: &str, genre: &str) -> String {
    let chorus = format!(
        "Chorus:\n\
         {key_word} lights up the night\n\
         In this {genre} paradise\n\
         Every moment feels so right\n\
         {theme} is my device"
    );
    format!(
        "Verse 1:\n\
         Dancing through the {theme}\n\
         Like a {genre} melody\n\
         Every step feels magical\n\
         This is where I'm meant to be\n\
         \n\
         {chorus}\n\
         \n\
         Verse 2:\n\
         Singing with the {key_word}\n\
         To a {genre} symphony\n\
         {theme} shows the way\n\
         To who I'm meant to be\n\
         \n\
         {chorus}\n\
         \n\
         Bridge:\n\
         When the music fades away\n\
         {key_word} will always stay\n\
         In my heart, in my soul\n\
         {theme} makes me whole\n\
         \n\
         Outro:\n\
         {theme}...\n\
         My {genre} dream come true"
    )
}
