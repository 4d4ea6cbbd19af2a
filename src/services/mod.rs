// 同期アダプタ関連のモジュール

pub mod memory;
pub mod sync;

pub use memory::MemorySyncAdapter;
pub use sync::{CollectionEvent, CollectionSubscription, SyncAdapter};
