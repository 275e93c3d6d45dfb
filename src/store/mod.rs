//! Persistence of app state as named JSON snapshots

mod db;
mod keys;

pub use db::{Store, DB_FILE_NAME};
pub use keys::StorageKey;
