use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use log::{debug, trace};

use crate::disk::{Disk, Head};
use crate::request::{Window, Workload};
use crate::simulation::SimParams;

/// One completed service: which request, during which sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Served {
    pub index: usize,
    pub sweep: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimulationResult {
    pub total_processed: usize,
    /// High-water mark of requests arrived but not yet served.
    pub max_queue_len: usize,
    /// Completion minus arrival, in completion order.
    pub latencies: Vec<f64>,
    pub idle_time: f64,
    pub busy_time: f64,
    pub head_movement: u64,
    /// Clock value when the engine stopped.
    pub end_time: f64,
    pub service_log: Vec<Served>,
}

pub trait Scheduler {
    fn name(&self) -> &'static str;
    fn run(&self, workload: &Workload, params: &SimParams) -> SimulationResult;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    Fifo,
    Fscan,
}

impl Policy {
    pub const ALL: [Policy; 2] = [Policy::Fifo, Policy::Fscan];

    pub fn scheduler(self) -> Box<dyn Scheduler> {
        match self {
            Policy::Fifo => Box::new(Fifo),
            Policy::Fscan => Box::new(Fscan),
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Policy::Fifo => f.write_str("FIFO"),
            Policy::Fscan => f.write_str("FSCAN"),
        }
    }
}

impl FromStr for Policy {
    type Err = String;

    fn from_str(s: &str) -> Result<Policy, String> {
        match s.to_ascii_lowercase().as_str() {
            "fifo" => Ok(Policy::Fifo),
            "fscan" => Ok(Policy::Fscan),
            other => Err(format!("unknown policy `{}` (expected fifo or fscan)", other)),
        }
    }
}

/// Track order of one FSCAN sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    pub fn of_sweep(sweep: usize) -> Direction {
        if sweep % 2 == 0 {
            Direction::Ascending
        } else {
            Direction::Descending
        }
    }

    pub fn order(self, a: u32, b: u32) -> Ordering {
        match self {
            Direction::Ascending => a.cmp(&b),
            Direction::Descending => b.cmp(&a),
        }
    }
}

/// Clock, head and counters shared by both engines while replaying a workload.
struct Replay<'a> {
    workload: &'a Workload,
    disk: Disk,
    horizon: f64,
    window: Window,
    head: Head,
    clock: f64,
    result: SimulationResult,
}

impl<'a> Replay<'a> {
    fn new(workload: &'a Workload, params: &SimParams) -> Replay<'a> {
        Replay {
            workload,
            disk: Disk::new(params),
            horizon: params.horizon,
            window: Window::new(),
            head: Head::new(),
            clock: 0.0,
            result: SimulationResult::default(),
        }
    }

    /// Samples the queue depth at the current clock into the high-water mark.
    fn sample_queue(&mut self) -> usize {
        let arrived = self.window.advance(self.workload, self.clock);
        let depth = arrived - self.result.total_processed;
        self.result.max_queue_len = self.result.max_queue_len.max(depth);
        depth
    }

    /// Jumps the clock to the arrival of request `next`, booking the gap as
    /// idle. Returns false if that arrival is at or beyond the horizon; the
    /// run ends there and the trailing gap is not booked.
    fn idle_until(&mut self, next: usize) -> bool {
        let arrival = self.workload[next].arrival;
        if arrival >= self.horizon {
            trace!("{:.3}: next arrival #{} is past the horizon", self.clock, next);
            self.clock = self.horizon;
            return false;
        }
        trace!("{:.3}: idle until #{} at {:.3}", self.clock, next, arrival);
        self.result.idle_time += arrival - self.clock;
        self.clock = arrival;
        true
    }

    /// Serves request `index` from the current head position. Returns false
    /// if completion would reach the horizon; the request is then dropped
    /// without being counted.
    fn serve(&mut self, index: usize, sweep: usize) -> bool {
        let workload = self.workload;
        let req = &workload[index];
        let service = self.disk.service_time(req, self.head.track, self.clock);
        let done = self.clock + service;
        if done >= self.horizon {
            self.clock = done;
            self.sample_queue();
            trace!("{:.3}: horizon reached while serving #{}", done, index);
            self.clock = self.horizon;
            return false;
        }

        trace!(
            "{:.3}: serve #{} track {} -> {} in {:.3} ms",
            self.clock,
            index,
            self.head.track,
            req.track,
            service
        );
        self.head.settle(req.track, service);
        self.clock = done;
        self.result.latencies.push(done - req.arrival);
        self.result.service_log.push(Served { index, sweep });
        self.result.total_processed += 1;
        true
    }

    fn finish(mut self) -> SimulationResult {
        self.result.busy_time = self.head.busy_time;
        self.result.head_movement = self.head.movement;
        self.result.end_time = self.clock;
        self.result
    }
}

/// Serves requests strictly in arrival order.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fifo;

impl Scheduler for Fifo {
    fn name(&self) -> &'static str {
        "FIFO"
    }

    fn run(&self, workload: &Workload, params: &SimParams) -> SimulationResult {
        let mut replay = Replay::new(workload, params);
        let mut next = 0;
        while next < workload.len() {
            if replay.sample_queue() == 0 {
                if !replay.idle_until(next) {
                    break;
                }
                continue;
            }
            if !replay.serve(next, 0) {
                break;
            }
            next += 1;
        }
        let result = replay.finish();
        debug!(
            "{}: {} of {} served, max queue {}",
            self.name(),
            result.total_processed,
            workload.len(),
            result.max_queue_len
        );
        result
    }
}

/// Serves frozen batches in alternating track order.
///
/// Requests arriving during a sweep wait for the next one, so a stream of
/// nearby arrivals cannot starve a far track.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fscan;

impl Scheduler for Fscan {
    fn name(&self) -> &'static str {
        "FSCAN"
    }

    fn run(&self, workload: &Workload, params: &SimParams) -> SimulationResult {
        let mut replay = Replay::new(workload, params);
        let mut batch = Vec::new();
        let mut next = 0;
        let mut sweep = 0;
        'sweeps: while next < workload.len() {
            let depth = replay.sample_queue();
            let current = sweep;
            let direction = Direction::of_sweep(current);
            sweep += 1;

            if depth == 0 {
                if !replay.idle_until(next) {
                    break;
                }
                continue;
            }

            let end = next + depth;
            batch.clear();
            batch.extend(next..end);
            batch.sort_by(|&a: &usize, &b: &usize| {
                direction.order(workload[a].track, workload[b].track)
            });
            debug!("sweep {} {:?}: {} requests", current, direction, batch.len());

            for &index in &batch {
                if !replay.serve(index, current) {
                    break 'sweeps;
                }
            }
            next = end;
        }
        let result = replay.finish();
        debug!(
            "{}: {} of {} served in {} sweeps, max queue {}",
            self.name(),
            result.total_processed,
            workload.len(),
            sweep,
            result.max_queue_len
        );
        result
    }
}
