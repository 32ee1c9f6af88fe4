pub mod prepare_env;

mod notifier;

pub use notifier::{MemoryNotifier, SentToken};
