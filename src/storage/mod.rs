mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use log::info;
use std::sync::Arc;

use crate::cli::Args;
use crate::error::{ ClientError, Result };

const KEY_PREFIX: &str = "docMedia_";

/// Synchronous string key-value store with browser local-storage semantics:
/// last write wins, values are opaque strings.
pub trait LocalStore: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
}

pub fn history_key(tool_name: &str) -> String {
    format!("{}{}_chatHistory", KEY_PREFIX, tool_name)
}

pub fn shared_key(chat_id: &str) -> String {
    format!("{}shared_{}", KEY_PREFIX, chat_id)
}

pub fn create_local_store(args: &Args) -> Result<Arc<dyn LocalStore>> {
    match args.store_type.to_lowercase().as_str() {
        "memory" => Ok(Arc::new(MemoryStore::new())),
        "file" => {
            let store = FileStore::open(&args.store_path)?;
            Ok(Arc::new(store))
        }
        other => Err(ClientError::Storage(format!("Unsupported local store type: {}", other))),
    }
}

pub fn initialize_local_store(args: &Args) -> Result<Arc<dyn LocalStore>> {
    info!("Chat history will be kept in: {} store at {}", args.store_type, args.store_path);
    create_local_store(args)
}
