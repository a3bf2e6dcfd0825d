//! Query module - Keyword dispatch and aggregation routines

mod dispatcher;
mod response;
mod routines;

pub use dispatcher::QueryDispatcher;
