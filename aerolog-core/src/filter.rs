//! Moving-average smoothing for sensor readings

/// Samples averaged per channel
pub const FILTER_WINDOW: usize = 10;

/// Arithmetic mean over the last `N` samples
///
/// New samples overwrite the oldest. Until the window fills, the mean is
/// taken over the samples seen so far.
#[derive(Debug, Clone)]
pub struct MovingAverage<const N: usize> {
    samples: [i32; N],
    next: usize,
    filled: usize,
}

impl<const N: usize> Default for MovingAverage<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> MovingAverage<N> {
    pub const fn new() -> Self {
        Self {
            samples: [0; N],
            next: 0,
            filled: 0,
        }
    }

    /// Add a sample and return the updated mean
    pub fn push(&mut self, value: i32) -> i32 {
        self.samples[self.next] = value;
        self.next = (self.next + 1) % N;
        self.filled = (self.filled + 1).min(N);
        self.sum() / self.filled as i32
    }

    fn sum(&self) -> i32 {
        self.samples[..self.filled].iter().sum()
    }
}
