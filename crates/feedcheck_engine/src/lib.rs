//! Feedcheck engine: collaborator traits and the async drivers that run the
//! core logic against them.
mod collect;
mod flow;
mod replay;
mod retry;
mod session;
mod source;
mod types;

pub use collect::{collect, CollectSettings};
pub use flow::{
    run_feed_sort_flow, run_login_flow, Clock, FeedSortReport, FeedSortSettings, FEED_SORT_FLOW,
    LOGIN_FLOW,
};
pub use replay::{
    FeedScript, FixtureError, LoginScript, Observation, ReplayFeed, ReplayFixture, ReplaySession,
};
pub use retry::{login_with_retry, LoginOutcome, RetrySettings};
pub use session::{Credentials, SessionActor};
pub use source::FeedSource;
pub use types::{ActorError, CollectError, Collection, FlowError, RetryError, StopReason};
