pub mod engine;
pub mod poll_loop;

pub use crate::domain::model::{CycleReport, InboundMessage, MatchEvent};
pub use crate::domain::ports::{Notifier, QueryService};
pub use crate::utils::error::Result;
pub use engine::WatchEngine;
pub use poll_loop::PollLoop;
