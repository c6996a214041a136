//! # supportchat-storage
//!
//! Best-effort local persistence for the support chat.
//!
//! - [`KeyValueStore`]: injectable string store (`get` / `set` / `remove`)
//! - [`MemoryStore`] and [`FileStore`]: in-process and on-disk backends
//! - [`PersistentCell`]: a typed value mirrored into a store on every update
//! - [`generate_session_id`]: client-side session tokens

pub mod cell;
pub mod session;
pub mod store;

pub use cell::PersistentCell;
pub use session::generate_session_id;
pub use store::{FileStore, KeyValueStore, MemoryStore, StorageError};
