//! Four ways of summing `1..=SUM_LIMIT`.

use crate::errors::ApiError;
use log::{debug, info};
use std::time::Instant;
use tokio::task::JoinSet;

pub const SUM_LIMIT: u64 = 1_000_000;

/// Number of blocking tasks the parallel sum is split into
const PARALLEL_CHUNKS: u64 = 4;

/// Counts up one element at a time
pub fn sum_slow() -> u64 {
    info!("Calculating sum using slow method");
    let started = Instant::now();

    let sum = std::iter::successors(Some(1u64), |n| Some(n + 1))
        .take(SUM_LIMIT as usize)
        .fold(0u64, |acc, n| acc + n);

    debug!("Slow method took {:?}, sum: {}", started.elapsed(), sum);
    sum
}

pub fn sum_formula() -> u64 {
    info!("Calculating sum using formula");
    SUM_LIMIT * (SUM_LIMIT + 1) / 2
}

pub fn sum_range() -> u64 {
    info!("Calculating sum using an inclusive range");
    let started = Instant::now();

    let sum: u64 = (1..=SUM_LIMIT).sum();

    debug!("Range method took {:?}, sum: {}", started.elapsed(), sum);
    sum
}

/// Splits the range into chunks summed on blocking threads
pub async fn sum_parallel() -> Result<u64, ApiError> {
    info!("Calculating sum using parallel chunks");
    let started = Instant::now();

    let chunk = SUM_LIMIT.div_ceil(PARALLEL_CHUNKS);
    let mut tasks = JoinSet::new();
    for index in 0..PARALLEL_CHUNKS {
        let start = index * chunk + 1;
        let end = ((index + 1) * chunk).min(SUM_LIMIT);
        tasks.spawn_blocking(move || (start..=end).sum::<u64>());
    }

    let mut sum = 0u64;
    while let Some(partial) = tasks.join_next().await {
        sum += partial.map_err(|e| ApiError::internal(format!("Sum task failed: {e}")))?;
    }

    debug!("Parallel method took {:?}, sum: {}", started.elapsed(), sum);
    Ok(sum)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPECTED: u64 = 500_000_500_000;

    #[test]
    fn test_sequential_sums() {
        assert_eq!(sum_slow(), EXPECTED);
        assert_eq!(sum_formula(), EXPECTED);
        assert_eq!(sum_range(), EXPECTED);
    }

    #[tokio::test]
    async fn test_parallel_sum() {
        assert_eq!(sum_parallel().await.unwrap(), EXPECTED);
    }
}
