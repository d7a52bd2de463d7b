//! Remote image API
//!
//! Wire types, the REST client and the background worker that runs
//! requests off the UI thread.

mod client;
mod protocol;
mod worker;

pub use client::GeminiClient;
pub use protocol::AspectRatio;
pub use worker::{start_worker, Job, JobKind, JobResult, WorkerHandle};
