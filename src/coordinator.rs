//! Work partitioning, thread lifecycle, and aggregation.
//!
//! One [`Coordinator::estimate`] call spawns a fresh set of worker threads,
//! waits for all of them at the join barrier, and folds their private hit
//! counts into a single area estimate. Workers never share mutable state;
//! each returns its count from the spawned closure and the sum happens
//! sequentially after the join.

use std::thread;
use std::time::{Duration, Instant};

use crate::sampler;

/// One estimation query. The boundary validates every field before
/// constructing it: counts are positive and the radius is a positive,
/// finite number.
#[derive(Debug, Clone, Copy)]
pub struct SampleRequest {
    /// Total number of points to draw, split across workers.
    pub total_samples: u64,
    /// Requested worker count, clamped to the coordinator's cap.
    pub threads: usize,
    /// Circle radius.
    pub radius: f64,
    /// Base seed; worker `i` samples with `base_seed + i`.
    pub base_seed: u64,
}

/// Work handed to a single worker: its slice of the sample budget and the
/// seed for its private generator. Owned exclusively by that worker for the
/// duration of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerAssignment {
    pub share: u64,
    pub seed: u64,
}

/// Outcome of one coordinator run.
#[derive(Debug, Clone, Copy)]
pub struct Estimate {
    /// `4 · radius² · hits / total_samples`.
    pub area: f64,
    /// Aggregate hit count across all workers.
    pub hits: u64,
    /// Wall-clock time from clamping through aggregation.
    pub elapsed: Duration,
}

/// Splits `total_samples` into `workers` near-equal shares with sequential
/// seeds derived from `base_seed`.
///
/// The division remainder is folded into worker 0, so the shares always sum
/// to exactly `total_samples`. When there are more workers than samples,
/// trailing workers receive an empty share.
///
/// # Panics
///
/// Panics if `workers` is 0.
pub fn partition(total_samples: u64, workers: usize, base_seed: u64) -> Vec<WorkerAssignment> {
    let base = total_samples / workers as u64;
    let remainder = total_samples % workers as u64;

    (0..workers)
        .map(|i| WorkerAssignment {
            share: if i == 0 { base + remainder } else { base },
            seed: base_seed.wrapping_add(i as u64),
        })
        .collect()
}

/// Fans one request out to worker threads and folds the results back into a
/// single estimate.
#[derive(Debug, Clone)]
pub struct Coordinator {
    max_parallelism: usize,
}

impl Coordinator {
    /// Caps worker counts at the parallelism the host reports, falling back
    /// to 1 when detection fails.
    pub fn new() -> Self {
        let detected = thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
        Self::with_max_parallelism(detected)
    }

    /// Caps worker counts at a fixed value instead of asking the host.
    ///
    /// The hit count depends on the effective worker count, so pinning the
    /// cap makes runs reproducible across machines. A cap of 0 is raised to
    /// 1.
    pub fn with_max_parallelism(cap: usize) -> Self {
        Self {
            max_parallelism: cap.max(1),
        }
    }

    /// The largest worker count this coordinator will spawn.
    pub fn max_parallelism(&self) -> usize {
        self.max_parallelism
    }

    /// Runs one estimation: clamp, partition, spawn, join, aggregate.
    ///
    /// The worker count is the requested thread count clamped to the
    /// parallelism cap, and never below 1. The returned elapsed time spans
    /// the whole run, from clamping the worker count to computing the area.
    pub fn estimate(&self, request: &SampleRequest) -> Estimate {
        let started = Instant::now();

        let workers = request.threads.min(self.max_parallelism).max(1);
        let assignments = partition(request.total_samples, workers, request.base_seed);
        tracing::debug!(
            workers,
            total_samples = request.total_samples,
            radius = request.radius,
            base_seed = request.base_seed,
            "dispatching sampler threads"
        );

        let radius = request.radius;
        let mut handles = Vec::with_capacity(workers);
        for assignment in assignments {
            handles.push(thread::spawn(move || {
                sampler::count_hits(assignment.share, assignment.seed, radius)
            }));
        }

        // Join barrier: no partial result is read before every worker is done.
        let mut hits = 0u64;
        for handle in handles {
            hits += handle.join().expect("sampler thread panicked");
        }

        let area = 4.0 * radius * radius * hits as f64 / request.total_samples as f64;
        Estimate {
            area,
            hits,
            elapsed: started.elapsed(),
        }
    }
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(total_samples: u64, threads: usize, radius: f64, base_seed: u64) -> SampleRequest {
        SampleRequest {
            total_samples,
            threads,
            radius,
            base_seed,
        }
    }

    #[test]
    fn partition_preserves_total() {
        let parts = partition(1_000_003, 7, 0);
        assert_eq!(parts.len(), 7);
        assert_eq!(parts.iter().map(|a| a.share).sum::<u64>(), 1_000_003);
    }

    #[test]
    fn remainder_lands_on_worker_zero() {
        let parts = partition(10, 4, 0);
        assert_eq!(parts[0].share, 4);
        assert!(parts[1..].iter().all(|a| a.share == 2));
    }

    #[test]
    fn even_split_has_no_extra() {
        let parts = partition(100, 4, 9);
        assert!(parts.iter().all(|a| a.share == 25));
    }

    #[test]
    fn seeds_are_sequential_from_base() {
        let seeds: Vec<u64> = partition(100, 3, 41).iter().map(|a| a.seed).collect();
        assert_eq!(seeds, vec![41, 42, 43]);
    }

    #[test]
    fn seed_derivation_wraps_at_u64_max() {
        let parts = partition(10, 3, u64::MAX);
        assert_eq!(parts[1].seed, 0);
        assert_eq!(parts[2].seed, 1);
    }

    #[test]
    fn more_workers_than_samples_leaves_empty_shares() {
        let parts = partition(3, 8, 0);
        assert_eq!(parts[0].share, 3);
        assert!(parts[1..].iter().all(|a| a.share == 0));
        assert_eq!(parts.iter().map(|a| a.share).sum::<u64>(), 3);
    }

    #[test]
    fn thread_request_is_clamped_to_cap() {
        let coordinator = Coordinator::with_max_parallelism(2);
        // 16 requested workers clamp down to 2, so the partition and the
        // seeds match a plain 2-worker run.
        let wide = coordinator.estimate(&request(10_000, 16, 1.0, 5));
        let narrow = coordinator.estimate(&request(10_000, 2, 1.0, 5));
        assert_eq!(wide.hits, narrow.hits);
    }

    #[test]
    fn identical_requests_are_deterministic() {
        let coordinator = Coordinator::with_max_parallelism(4);
        let req = request(50_000, 4, 2.0, 42);
        let first = coordinator.estimate(&req);
        let second = coordinator.estimate(&req);
        assert_eq!(first.hits, second.hits);
        assert_eq!(first.area, second.area);
    }

    #[test]
    fn hits_and_area_stay_in_range() {
        let coordinator = Coordinator::with_max_parallelism(4);
        let estimate = coordinator.estimate(&request(20_000, 4, 3.0, 7));
        assert!(estimate.hits <= 20_000);
        assert!(estimate.area >= 0.0);
        // The circle fits inside the bounding square of area 4r².
        assert!(estimate.area <= 4.0 * 3.0 * 3.0);
    }

    #[test]
    fn degenerate_share_split_still_runs() {
        let coordinator = Coordinator::with_max_parallelism(8);
        let estimate = coordinator.estimate(&request(5, 8, 1.0, 0));
        assert!(estimate.hits <= 5);
    }

    #[test]
    fn ten_samples_scale_area_by_hits() {
        // 4 · 5² · hits / 10 = 10 · hits
        let coordinator = Coordinator::with_max_parallelism(1);
        let estimate = coordinator.estimate(&request(10, 1, 5.0, 0));
        assert!(estimate.hits <= 10);
        assert_eq!(estimate.area, 10.0 * estimate.hits as f64);
    }

    #[test]
    fn elapsed_time_is_nonzero() {
        let coordinator = Coordinator::with_max_parallelism(2);
        let estimate = coordinator.estimate(&request(200_000, 2, 1.0, 3));
        assert!(estimate.elapsed > Duration::ZERO);
    }

    #[test]
    fn zero_thread_request_runs_a_single_worker() {
        let coordinator = Coordinator::with_max_parallelism(4);
        let floor = coordinator.estimate(&request(1_000, 0, 1.0, 6));
        let single = coordinator.estimate(&request(1_000, 1, 1.0, 6));
        assert_eq!(floor.hits, single.hits);
    }

    #[test]
    fn zero_cap_is_raised_to_one() {
        let coordinator = Coordinator::with_max_parallelism(0);
        assert_eq!(coordinator.max_parallelism(), 1);
        let estimate = coordinator.estimate(&request(100, 4, 1.0, 0));
        assert!(estimate.hits <= 100);
    }

    #[test]
    fn detected_cap_is_at_least_one() {
        assert!(Coordinator::new().max_parallelism() >= 1);
    }
}
