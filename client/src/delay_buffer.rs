use std::{collections::VecDeque, num::NonZeroUsize};

/// Holds local input back for a fixed number of steps.
///
/// The buffer is a sliding window of cohorts, one per step. Input is always
/// added to the newest cohort; every step the oldest cohort is released and a
/// fresh empty one is appended, so the depth never changes.
pub struct InputDelayBuffer<T> {
    cohorts: VecDeque<Vec<T>>,
}

impl<T> InputDelayBuffer<T> {
    pub fn new(depth: NonZeroUsize) -> Self {
        let mut cohorts = VecDeque::with_capacity(depth.get());
        cohorts.resize_with(depth.get(), Vec::new);
        Self { cohorts }
    }

    /// Builds a buffer for `delay_count` steps, or `None` when input should
    /// bypass the buffer.
    pub fn from_delay_count(delay_count: usize) -> Option<Self> {
        NonZeroUsize::new(delay_count).map(Self::new)
    }

    pub fn depth(&self) -> usize {
        self.cohorts.len()
    }

    /// Adds input to the newest cohort
    pub fn push(&mut self, input: T) {
        if let Some(newest) = self.cohorts.back_mut() {
            newest.push(input);
        }
    }

    /// Removes the oldest cohort, in submission order, and opens a new one
    pub fn release_oldest(&mut self) -> Vec<T> {
        let released = self.cohorts.pop_front().unwrap_or_default();
        self.cohorts.push_back(Vec::new());
        released
    }

    /// Number of inputs waiting across all cohorts
    pub fn pending(&self) -> usize {
        self.cohorts.iter().map(Vec::len).sum()
    }
}
