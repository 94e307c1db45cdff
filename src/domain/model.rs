/// A response body that contained the target marker, keyed by the
/// identifier that produced it. Not stored anywhere; it is turned into a
/// notification as soon as it is observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchEvent {
    pub identifier: u32,
    pub body: String,
}

/// The most recent inbound message on the notifier channel. `text` is
/// `None` for non-text messages (stickers, photos).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub id: i64,
    pub text: Option<String>,
}

/// Summary of one completed scan cycle.
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub cycle: u64,
    pub matches: Vec<MatchEvent>,
    pub queries_failed: usize,
    pub status_replied: bool,
}
