use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::Duration;

/// Delay before moving to the next question after grading.
pub const DEFAULT_ADVANCE_DELAY: Duration = Duration::from_millis(500);
/// Delay before returning to idle after the last question is graded.
pub const DEFAULT_RESET_DELAY: Duration = Duration::from_millis(1000);
const DEFAULT_COMMAND_BUFFER: usize = 32;

/// Tunables for a `QuizEngine`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizConfig {
    advance_delay: Duration,
    reset_delay: Duration,
    fetch_timeout: Option<Duration>,
    seed: Option<u64>,
    command_buffer: usize,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            advance_delay: DEFAULT_ADVANCE_DELAY,
            reset_delay: DEFAULT_RESET_DELAY,
            fetch_timeout: None,
            seed: None,
            command_buffer: DEFAULT_COMMAND_BUFFER,
        }
    }
}

impl QuizConfig {
    #[must_use]
    pub fn with_advance_delay(mut self, delay: Duration) -> Self {
        self.advance_delay = delay;
        self
    }

    #[must_use]
    pub fn with_reset_delay(mut self, delay: Duration) -> Self {
        self.reset_delay = delay;
        self
    }

    /// Give up on a fetch after `timeout` and treat it as a failed source.
    ///
    /// Without a timeout a stalled source keeps the session loading.
    #[must_use]
    pub fn with_fetch_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Seed the shuffle for reproducible question order.
    #[must_use]
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_command_buffer(mut self, capacity: usize) -> Self {
        self.command_buffer = capacity.max(1);
        self
    }

    #[must_use]
    pub fn advance_delay(&self) -> Duration {
        self.advance_delay
    }

    #[must_use]
    pub fn reset_delay(&self) -> Duration {
        self.reset_delay
    }

    #[must_use]
    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch_timeout
    }

    #[must_use]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    #[must_use]
    pub fn command_buffer(&self) -> usize {
        self.command_buffer
    }

    /// Delay applied after grading, depending on whether more questions remain.
    #[must_use]
    pub fn delay_after(&self, is_last: bool) -> Duration {
        if is_last {
            self.reset_delay
        } else {
            self.advance_delay
        }
    }

    pub(crate) fn build_rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}
