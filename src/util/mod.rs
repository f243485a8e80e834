// Utilities around the core: local persistence of key records

pub mod key_store;

pub use key_store::{FileKeyStore, KeyStore, KeyStoreError, MemoryKeyStore, StoredKeys};
