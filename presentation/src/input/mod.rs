//! Interactive input: line sources and the preference collector

pub mod collector;
pub mod line_source;

pub use collector::{CollectError, PreferenceCollector, PresetPreferences, select_language};
pub use line_source::{InputError, LineSource, TerminalLineSource};
