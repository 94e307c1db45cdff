use crate::domain::model::InboundMessage;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Issues one templated request against the fixed remote resource.
/// Headers, cookies, and the endpoint itself are configuration of the
/// implementation, not part of the contract.
#[async_trait]
pub trait QueryService: Send + Sync {
    async fn query(&self, identifier: u32) -> Result<String>;
}

/// Messaging channel to the operator. Delivery is best-effort; there is
/// no retry, no backoff, and no ordering guarantee beyond "most recent by
/// the channel's own ordering".
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: &str) -> Result<()>;
    async fn fetch_latest_inbound(&self) -> Result<Option<InboundMessage>>;
}
