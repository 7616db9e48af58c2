//! Parallel Monte Carlo estimation of the area of a circle.
//!
//! A fixed sample budget is split into near-equal shares, one per worker
//! thread. Each worker draws points from its own seeded generator, counts
//! the ones that land inside the circle, and the counts are summed after
//! all workers have joined:
//!
//! ```text
//! area ≈ 4 · r² · hits / samples
//! ```
//!
//! [`coordinator`] owns partitioning and the thread lifecycle, [`sampler`]
//! is the per-worker counting loop, and [`stream`] is the line-oriented
//! query boundary used by the `dartboard` binary.
//!
//! # Example
//!
//! ```
//! use dartboard::{Coordinator, SampleRequest};
//!
//! let coordinator = Coordinator::with_max_parallelism(2);
//! let estimate = coordinator.estimate(&SampleRequest {
//!     total_samples: 100_000,
//!     threads: 2,
//!     radius: 1.0,
//!     base_seed: 7,
//! });
//! assert!((estimate.area - std::f64::consts::PI).abs() < 0.1);
//! ```

pub mod coordinator;
pub mod sampler;
pub mod stream;

pub use coordinator::{Coordinator, Estimate, SampleRequest, WorkerAssignment};
