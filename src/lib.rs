pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{HttpQueryService, TelegramNotifier};
pub use config::WatchConfig;
pub use crate::core::{PollLoop, WatchEngine};
pub use utils::error::{WatchError, Result};
