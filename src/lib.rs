//! Discrete-event simulation of disk request scheduling.
//!
//! A random workload is replayed against a seek/rotation/transfer timing
//! model once per policy (arrival order and FSCAN), and the per-request
//! latencies are reduced to summary statistics.

pub mod disk;
pub mod report;
pub mod request;
pub mod scheduler;
pub mod simulation;
pub mod stats;
