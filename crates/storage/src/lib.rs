#![forbid(unsafe_code)]

pub mod json_file;
pub mod prefs;
pub mod repository;

pub use json_file::JsonFileBackend;
pub use prefs::PrefsBackend;
pub use repository::{decode_deck, encode_deck, CardRecord, DeckBackend, StorageError};
