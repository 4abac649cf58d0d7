//! Stream resolution.
//!
//! Drives the debrid provider protocol per candidate (submit, inspect,
//! select, poll, unrestrict), schedules candidates in bounded-concurrency
//! batches with early termination, and exposes the one operation callers
//! use: `StreamResolver::resolve_streams`.

mod job;
mod pipeline;
mod scheduler;
mod types;

pub use job::CandidateResolver;
pub use pipeline::StreamResolver;
pub use scheduler::{BatchOutcome, BatchScheduler};
pub use types::{
    BehaviorHints, ResolveFailure, ResolvedStream, ScoredCandidate, Stream, StreamList,
};
