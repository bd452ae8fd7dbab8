use feedcheck_core::Item;

use crate::ActorError;

/// Paginated supplier of feed items. Pages are visited in order and the
/// source is trusted to hand out distinct items.
#[async_trait::async_trait]
pub trait FeedSource: Send {
    /// Items on the page the source currently shows, in presentation order.
    async fn current_page_items(&mut self) -> Result<Vec<Item>, ActorError>;

    async fn has_next_page(&mut self) -> Result<bool, ActorError>;

    /// Moves to the next page; may block until the page has settled.
    async fn advance_to_next_page(&mut self) -> Result<(), ActorError>;

    /// Releases the underlying session. Called once at the end of a flow.
    async fn close(&mut self) -> Result<(), ActorError>;
}
