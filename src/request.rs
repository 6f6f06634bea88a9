use std::ops::Index;
use std::slice;

use rand::distributions::Open01;
use rand::Rng;

use crate::simulation::SimParams;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Read,
    Write,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub track: u32,
    pub sector: u32,
    /// Surface index. Carried for the record, the timing model ignores it.
    pub head: u32,
    pub arrival: f64,
    pub operation: Operation,
}

impl Request {
    /// Draws the request that follows one issued at `now`, arriving a uniform
    /// gap in `(0, max_gap)` later.
    pub fn new<R: Rng>(now: f64, max_gap: f64, params: &SimParams, rng: &mut R) -> Request {
        let arrival = loop {
            let gap: f64 = rng.sample(Open01);
            let t = now + gap * max_gap;
            if t > now {
                break t;
            }
        };
        Request {
            track: rng.gen_range(0..params.tracks),
            head: rng.gen_range(0..params.heads),
            sector: rng.gen_range(0..params.sectors),
            arrival,
            operation: if rng.gen::<bool>() { Operation::Write } else { Operation::Read },
        }
    }
}

/// Requests in strictly increasing arrival order.
///
/// The last element is the first one to arrive at or past the horizon, so
/// engines always see at least one request they are not allowed to finish.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workload {
    requests: Vec<Request>,
}

impl Workload {
    pub fn generate<R: Rng>(params: &SimParams, max_gap: f64, rng: &mut R) -> Workload {
        let mut requests = Vec::new();
        let mut now = 0.0;
        loop {
            let req = Request::new(now, max_gap, params, rng);
            now = req.arrival;
            requests.push(req);
            if now >= params.horizon {
                break;
            }
        }
        Workload { requests }
    }

    /// Wraps hand-built requests. They must already be in strictly
    /// increasing arrival order.
    pub fn from_requests(requests: Vec<Request>) -> Workload {
        debug_assert!(requests.windows(2).all(|w| w[0].arrival < w[1].arrival));
        Workload { requests }
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn as_slice(&self) -> &[Request] {
        &self.requests
    }
}

impl Index<usize> for Workload {
    type Output = Request;

    fn index(&self, index: usize) -> &Request {
        &self.requests[index]
    }
}

impl<'a> IntoIterator for &'a Workload {
    type Item = &'a Request;
    type IntoIter = slice::Iter<'a, Request>;

    fn into_iter(self) -> Self::IntoIter {
        self.requests.iter()
    }
}

/// Count of requests that have arrived by a clock that only moves forward.
///
/// Each call resumes where the previous one stopped, so a whole replay
/// walks the workload once.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    arrived: usize,
}

impl Window {
    pub fn new() -> Window {
        Window { arrived: 0 }
    }

    pub fn advance(&mut self, workload: &Workload, clock: f64) -> usize {
        while self.arrived < workload.len() && workload[self.arrived].arrival <= clock {
            self.arrived += 1;
        }
        self.arrived
    }

    pub fn arrived(&self) -> usize {
        self.arrived
    }
}
