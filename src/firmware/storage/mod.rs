mod credentials;
mod flash_kv;
mod kv;
mod ram;

pub use credentials::CredentialStore;
pub use flash_kv::{FlashKvStore, KV_NAME_MAX, KV_SLOT_LEN, KV_VALUE_MAX};
pub use kv::{KeyValueStore, StoreError};
pub use ram::{OutOfBounds, RamStorage};
