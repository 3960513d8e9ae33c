use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackoffPolicy {
    Constant,
    Linear,
    Exponential { factor: f32 },
}

/// Governs what happens when an observation shows no new items: how far to
/// scroll, how long to let the list settle, and when to give up.
#[derive(Debug, Clone)]
pub struct ScrollPolicy {
    pub pixels: i64,
    pub max_stalled_scrolls: usize,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub backoff_policy: BackoffPolicy,
}

impl Default for ScrollPolicy {
    fn default() -> Self {
        Self {
            pixels: 2000,
            max_stalled_scrolls: 5,
            initial_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(10),
            backoff_policy: BackoffPolicy::Constant,
        }
    }
}

impl ScrollPolicy {
    /// Settling delay after the scroll issued for the `stall`-th consecutive
    /// empty observation (zero-based).
    pub fn calculate_delay(&self, stall: usize) -> Duration {
        if stall == 0 {
            return self.initial_delay;
        }

        let delay = match self.backoff_policy {
            BackoffPolicy::Constant => Some(self.initial_delay),
            BackoffPolicy::Linear => stall
                .checked_add(1)
                .and_then(|steps| u32::try_from(steps).ok())
                .and_then(|steps| self.initial_delay.checked_mul(steps)),
            BackoffPolicy::Exponential { factor } => {
                let exponent = i32::try_from(stall).unwrap_or(i32::MAX);
                let secs = self.initial_delay.as_secs_f64() * f64::from(factor).powi(exponent);
                Duration::try_from_secs_f64(secs).ok()
            }
        };

        // Out of range means far past the cap.
        delay.map_or(self.max_delay, |delay| std::cmp::min(delay, self.max_delay))
    }

    /// True once `stalls` consecutive empty observations means the list is done.
    pub fn is_exhausted(&self, stalls: usize) -> bool {
        stalls >= self.max_stalled_scrolls
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(backoff_policy: BackoffPolicy) -> ScrollPolicy {
        ScrollPolicy {
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(1000),
            backoff_policy,
            ..Default::default()
        }
    }

    #[test]
    fn test_constant_backoff() {
        let policy = policy(BackoffPolicy::Constant);
        assert_eq!(policy.calculate_delay(0), Duration::from_millis(100));
        assert_eq!(policy.calculate_delay(4), Duration::from_millis(100));
    }

    #[test]
    fn test_linear_backoff() {
        let policy = policy(BackoffPolicy::Linear);
        assert_eq!(policy.calculate_delay(1), Duration::from_millis(200));
        assert_eq!(policy.calculate_delay(2), Duration::from_millis(300));
    }

    #[test]
    fn test_exponential_backoff_is_capped() {
        let policy = policy(BackoffPolicy::Exponential { factor: 2.0 });
        assert_eq!(policy.calculate_delay(0), Duration::from_millis(100));
        assert_eq!(policy.calculate_delay(1), Duration::from_millis(200));
        assert_eq!(policy.calculate_delay(2), Duration::from_millis(400));
        assert_eq!(policy.calculate_delay(10), Duration::from_millis(1000));
    }

    #[test]
    fn test_huge_stall_counts_saturate_at_cap() {
        let exponential = policy(BackoffPolicy::Exponential { factor: 2.0 });
        assert_eq!(exponential.calculate_delay(64), Duration::from_millis(1000));
        assert_eq!(exponential.calculate_delay(10_000), Duration::from_millis(1000));
        assert_eq!(exponential.calculate_delay(usize::MAX), Duration::from_millis(1000));

        let linear = policy(BackoffPolicy::Linear);
        assert_eq!(linear.calculate_delay(10_000), Duration::from_millis(1000));
        assert_eq!(linear.calculate_delay(usize::MAX), Duration::from_millis(1000));
    }

    #[test]
    fn test_stall_budget() {
        let policy = ScrollPolicy {
            max_stalled_scrolls: 3,
            ..Default::default()
        };
        assert!(!policy.is_exhausted(2));
        assert!(policy.is_exhausted(3));
    }
}
