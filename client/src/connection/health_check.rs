use std::{
    collections::{BTreeMap, VecDeque},
    time::{Duration, Instant},
};

use log::debug;

use stepsync_shared::RttQueryId;

/// Measures round-trip time to the authority with periodic queries,
/// reporting the average of the most recent samples.
pub struct HealthCheck {
    interval: Duration,
    sample_size: usize,
    last_query: Option<Instant>,
    next_query_id: RttQueryId,
    in_flight: BTreeMap<RttQueryId, Instant>,
    samples: VecDeque<Duration>,
}

impl HealthCheck {
    pub fn new(interval: Duration, sample_size: usize) -> Self {
        Self {
            interval,
            sample_size: sample_size.max(1),
            last_query: None,
            next_query_id: 0,
            in_flight: BTreeMap::new(),
            samples: VecDeque::new(),
        }
    }

    pub fn should_query(&self, now: Instant) -> bool {
        match self.last_query {
            None => true,
            Some(last_query) => now.saturating_duration_since(last_query) >= self.interval,
        }
    }

    /// Registers a new query sent at `now` and returns its id
    pub fn start_query(&mut self, now: Instant) -> RttQueryId {
        let query_id = self.next_query_id;
        self.next_query_id = self.next_query_id.wrapping_add(1);
        self.last_query = Some(now);
        self.in_flight.insert(query_id, now);

        // queries that never came back
        while self.in_flight.len() > self.sample_size {
            self.in_flight.pop_first();
        }
        query_id
    }

    /// Records the response to `query_id`, returning the measured round trip
    pub fn on_response(&mut self, query_id: RttQueryId, now: Instant) -> Option<Duration> {
        let sent = self.in_flight.remove(&query_id)?;
        let rtt = now.saturating_duration_since(sent);
        self.samples.push_back(rtt);
        while self.samples.len() > self.sample_size {
            self.samples.pop_front();
        }
        debug!("rtt sample {:?}, average {:?}", rtt, self.rtt());
        Some(rtt)
    }

    /// Average of the retained samples
    pub fn rtt(&self) -> Option<Duration> {
        if self.samples.is_empty() {
            return None;
        }
        let total: Duration = self.samples.iter().sum();
        Some(total / self.samples.len() as u32)
    }
}
