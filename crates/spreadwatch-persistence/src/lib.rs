//! File persistence for the scanner and the spread loop.
//!
//! - `store`: whole-file JSON arrays replaced atomically (candidates, results)
//! - `journal`: append-only JSON Lines record of every signal, rotated daily

pub mod error;
pub mod journal;
pub mod store;

pub use error::{PersistenceError, PersistenceResult};
pub use journal::{JournalRecord, SignalJournal};
pub use store::{CandidateStore, JsonFileStore, ResultsStore};
