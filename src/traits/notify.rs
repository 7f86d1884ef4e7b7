use async_trait::async_trait;

use crate::error::GavelResult;
use crate::events::AuctionEvent;

/// Outbound delivery of auction events.
///
/// Publishing happens strictly after the commit that produced the event.
/// Implementations may drop, batch, or fan out; the engines only log a
/// warning when delivery fails.
#[async_trait]
pub trait Notifier: Send + Sync + Clone + 'static {
    async fn publish(&self, event: AuctionEvent) -> GavelResult<()>;
}
