//! Interactive collection of reader preferences
//!
//! Every question re-prompts with a localized hint until the answer is
//! valid. Values already supplied on the command line are checked once and
//! never re-asked.

use super::line_source::{InputError, LineSource};
use crate::i18n::Messages;
use bookbot_domain::{
    Adventurousness, Genre, InputSanitizer, Language, PreferenceError, Preferences,
};
use std::io::Write;
use thiserror::Error;
use tracing::{info, warn};

/// Errors that end preference collection
#[derive(Error, Debug)]
pub enum CollectError {
    #[error(transparent)]
    Input(#[from] InputError),

    /// A value given on the command line is invalid
    #[error(transparent)]
    Invalid(#[from] PreferenceError),

    #[error("could not render recommendations: {0}")]
    Render(#[from] serde_json::Error),
}

impl From<std::io::Error> for CollectError {
    fn from(e: std::io::Error) -> Self {
        CollectError::Input(InputError::Io(e))
    }
}

/// Preference values supplied up front (command-line flags)
#[derive(Debug, Clone, Default)]
pub struct PresetPreferences {
    pub genres: Vec<String>,
    pub books: Vec<String>,
    pub adventurousness: Option<u8>,
}

/// Bilingual language menu; only `1` and `2` are accepted.
pub fn select_language<S: LineSource, W: Write>(
    source: &mut S,
    mut out: W,
) -> Result<Language, CollectError> {
    // Both tables share the bilingual menu
    let m = Messages::for_language(Language::En);
    loop {
        writeln!(out, "{}", m.lang_prompt)?;
        writeln!(out, "{}", m.lang_option_1)?;
        writeln!(out, "{}", m.lang_option_2)?;
        match source.read_line(m.lang_input)?.trim() {
            "1" => return Ok(Language::En),
            "2" => return Ok(Language::Zh),
            _ => writeln!(out, "{}", m.lang_invalid)?,
        }
    }
}

/// Asks for whatever [`PresetPreferences`] leaves open
pub struct PreferenceCollector<'a, S: LineSource, W: Write> {
    source: &'a mut S,
    out: W,
    sanitizer: &'a InputSanitizer,
    language: Language,
}

impl<'a, S: LineSource, W: Write> PreferenceCollector<'a, S, W> {
    pub fn new(
        source: &'a mut S,
        out: W,
        sanitizer: &'a InputSanitizer,
        language: Language,
    ) -> Self {
        Self {
            source,
            out,
            sanitizer,
            language,
        }
    }

    fn messages(&self) -> &'static Messages {
        Messages::for_language(self.language)
    }

    /// Collect a complete, validated [`Preferences`].
    pub fn collect(&mut self, preset: &PresetPreferences) -> Result<Preferences, CollectError> {
        let m = self.messages();
        let interactive = preset.genres.is_empty()
            || preset.books.is_empty()
            || preset.adventurousness.is_none();
        if interactive {
            let rule = "=".repeat(55);
            writeln!(self.out, "{rule}\n{}\n{rule}\n", m.welcome)?;
        }

        let genres = if preset.genres.is_empty() {
            let genres = self.ask_genres()?;
            writeln!(self.out)?;
            genres
        } else {
            self.resolve_genres(&preset.genres)?
        };

        let books = if preset.books.is_empty() {
            let books = self.ask_books()?;
            writeln!(self.out)?;
            books
        } else {
            preset.books.clone()
        };

        let adventurousness = match preset.adventurousness {
            Some(level) => Adventurousness::new(i64::from(level))?,
            None => {
                let level = self.ask_adventurousness()?;
                writeln!(self.out)?;
                level
            }
        };

        let preferences = Preferences::new(genres, books, adventurousness, self.sanitizer)?;
        info!(
            genres = ?preferences.genres(),
            books = ?preferences.favorite_books(),
            adventurousness = preferences.adventurousness().level(),
            "Collected preferences"
        );
        Ok(preferences)
    }

    fn resolve_genres(&self, names: &[String]) -> Result<Vec<Genre>, PreferenceError> {
        names
            .iter()
            .map(|name| {
                self.sanitizer.check_injection(name)?;
                Genre::lookup(name, self.language)
                    .ok_or_else(|| PreferenceError::UnknownGenre(name.trim().to_string()))
            })
            .collect()
    }

    fn ask_genres(&mut self) -> Result<Vec<Genre>, CollectError> {
        let m = self.messages();
        let sep = self.language.list_separator();
        let allowed = Genre::display_names(self.language).join(sep);

        loop {
            writeln!(self.out, "{}", m.genre_list(&allowed))?;
            let raw = self.source.read_line(m.genre_prompt)?;
            if raw.trim().is_empty() {
                writeln!(self.out, "{}", m.genre_empty)?;
                continue;
            }

            let parts = self.language.split_list(&raw);
            if !(Preferences::MIN_GENRES..=Preferences::MAX_GENRES).contains(&parts.len()) {
                writeln!(self.out, "{}", m.genre_count)?;
                continue;
            }

            let mut genres = Vec::with_capacity(parts.len());
            let mut unknown = Vec::new();
            for part in &parts {
                match Genre::lookup(part, self.language) {
                    Some(genre) => genres.push(genre),
                    None => unknown.push(part.to_lowercase()),
                }
            }
            if !unknown.is_empty() {
                writeln!(self.out, "{}", m.genre_invalid(&unknown.join(sep)))?;
                writeln!(self.out, "{}", m.genre_allowed(&allowed))?;
                continue;
            }

            let has_duplicate = genres
                .iter()
                .enumerate()
                .any(|(i, g)| genres[..i].contains(g));
            if has_duplicate {
                writeln!(self.out, "{}", m.genre_dup)?;
                continue;
            }

            return Ok(genres);
        }
    }

    fn ask_books(&mut self) -> Result<Vec<String>, CollectError> {
        let m = self.messages();

        loop {
            let raw = self.source.read_line(m.book_prompt)?;
            if raw.trim().is_empty() {
                writeln!(self.out, "{}", m.book_empty)?;
                continue;
            }

            if let Some(pattern) = self.sanitizer.injection_match(&raw) {
                warn!(pattern, "Prompt injection attempt in favorite books");
                writeln!(self.out, "{}", m.book_injection)?;
                continue;
            }

            let parts = self.language.split_list(&raw);
            if !(Preferences::MIN_BOOKS..=Preferences::MAX_BOOKS).contains(&parts.len()) {
                writeln!(self.out, "{}", m.book_count)?;
                continue;
            }

            let mut titles = Vec::with_capacity(parts.len());
            let mut bad = Vec::new();
            for part in &parts {
                match self.sanitizer.check_title(part) {
                    Ok(title) => titles.push(title),
                    Err(_) => bad.push(format!("'{part}'")),
                }
            }
            if !bad.is_empty() {
                let bad = bad.join(self.language.list_separator());
                writeln!(self.out, "{}", m.book_invalid(&bad, self.sanitizer.max_chars()))?;
                continue;
            }

            return Ok(titles);
        }
    }

    fn ask_adventurousness(&mut self) -> Result<Adventurousness, CollectError> {
        let m = self.messages();

        loop {
            writeln!(self.out, "{}", m.fam_header)?;
            for option in m.fam_options {
                writeln!(self.out, "{option}")?;
            }
            let raw = self.source.read_line(m.fam_prompt)?;
            let raw = raw.trim();
            if raw.is_empty() {
                writeln!(self.out, "{}", m.fam_empty)?;
                continue;
            }
            let Ok(level) = raw.parse::<i64>() else {
                writeln!(self.out, "{}", m.fam_nan)?;
                continue;
            };
            match Adventurousness::new(level) {
                Ok(level) => return Ok(level),
                Err(_) => writeln!(self.out, "{}", m.fam_range)?,
            }
        }
    }

    /// Ask whether to run another round; only exact `yes`/`no` or `是`/`否`.
    pub fn ask_more(&mut self) -> Result<bool, CollectError> {
        let m = self.messages();
        loop {
            writeln!(self.out)?;
            match self.source.read_line(m.more_prompt)?.trim() {
                "yes" | "是" => return Ok(true),
                "no" | "否" => return Ok(false),
                _ => writeln!(self.out, "{}", m.more_invalid)?,
            }
        }
    }
}
