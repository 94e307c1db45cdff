// Adapters layer: concrete implementations for external systems (the target
// endpoint and the Telegram bot channel).

pub mod http_query;
pub mod telegram;

pub use http_query::HttpQueryService;
pub use telegram::TelegramNotifier;
