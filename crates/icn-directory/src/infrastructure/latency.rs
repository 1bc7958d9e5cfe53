//! Simulated backend latency

use rand::Rng;
use std::time::Duration;

use crate::config::LatencyConfig;

/// Sleeps before each service call to mimic a network round trip
#[derive(Clone, Debug, Default)]
pub struct SimulatedLatency {
    config: LatencyConfig,
}

impl SimulatedLatency {
    pub fn new(config: LatencyConfig) -> Self {
        Self { config }
    }

    /// Delay for the next call: `base_ms` plus up to `jitter_ms`
    pub fn next_delay(&self) -> Duration {
        let jitter = if self.config.jitter_ms > 0 {
            rand::thread_rng().gen_range(0..=self.config.jitter_ms)
        } else {
            0
        };
        Duration::from_millis(self.config.base_ms + jitter)
    }

    pub async fn wait(&self) {
        if self.config.is_zero() {
            return;
        }
        tokio::time::sleep(self.next_delay()).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_bounds() {
        let latency = SimulatedLatency::new(LatencyConfig { base_ms: 100, jitter_ms: 50 });
        for _ in 0..20 {
            let d = latency.next_delay();
            assert!(d >= Duration::from_millis(100) && d <= Duration::from_millis(150));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_advances_clock() {
        let latency = SimulatedLatency::new(LatencyConfig { base_ms: 300, jitter_ms: 0 });
        let start = tokio::time::Instant::now();
        latency.wait().await;
        assert!(start.elapsed() >= Duration::from_millis(300));
    }
}
