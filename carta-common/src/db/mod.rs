//! Persistent deck storage

pub mod init;
pub mod schema;
pub mod store;

pub use init::open_pool;
pub use store::DeckStore;
