//! Job tracking for long-running generation work.
//!
//! Video renders are queued on the backend and report progress as
//! `job_update` events. A [`JobTracker`] folds those events through the
//! [`JobState`] machine, publishes every accepted snapshot on a `watch`
//! channel and stores the finished video as an asset.
//!
//! Events come from a [`JobEventSource`]: either the Socket.IO push channel
//! ([`SocketIoEventSource`]) or bounded polling of the job status endpoint
//! ([`JobPoller`]).

#![warn(missing_docs)]

mod poll;
mod socketio;
mod source;
mod state;
mod tracker;

pub use poll::{
    JobPoller, JobStatusSource, Operation, OperationPoller, OperationStatus, PollConfig,
    PollConfigBuilder,
};
pub use socketio::{Packet, SocketIoEventSource, parse_packet, socket_url};
pub use source::{JobEventSource, JobEvents};
pub use state::{JobState, Transition};
pub use tracker::JobTracker;
