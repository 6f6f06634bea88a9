use crate::request::{Operation, Request};
use crate::simulation::SimParams;

const MS_PER_MIN: f64 = 60_000.0;

/// Timing model of a single spindle: seek, rotational delay and transfer.
///
/// All times are simulated milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Disk {
    pub sectors: u32,
    pub seek_per_track: f64,
    /// Time for one sector to pass under the head.
    pub sector_time: f64,
}

impl Disk {
    pub fn new(params: &SimParams) -> Disk {
        Disk {
            sectors: params.sectors,
            seek_per_track: params.seek_per_track,
            sector_time: MS_PER_MIN / (params.rpm as f64 * params.sectors as f64),
        }
    }

    pub fn revolution(&self) -> f64 {
        self.sector_time * self.sectors as f64
    }

    pub fn seek_time(&self, from: u32, to: u32) -> f64 {
        from.abs_diff(to) as f64 * self.seek_per_track
    }

    /// Time until the start of `target` next passes under the head, looking
    /// at the platter at instant `at`. Always in `[0, revolution)`.
    pub fn rotational_delay(&self, target: u32, at: f64) -> f64 {
        let passed = (at / self.sector_time).floor();
        let current = (passed as u64 % self.sectors as u64) as u32;
        let offset = (at - passed * self.sector_time).clamp(0.0, self.sector_time);

        let ahead = if target > current || (target == current && offset == 0.0) {
            target - current
        } else {
            target + self.sectors - current
        };
        let delay = ahead as f64 * self.sector_time - offset;
        // A vanishing offset can round the wrapped delay up to a full turn.
        if delay >= self.revolution() {
            0.0
        } else {
            delay
        }
    }

    /// A write pays one extra revolution on top of the sector itself.
    pub fn transfer_time(&self, op: Operation) -> f64 {
        match op {
            Operation::Read => self.sector_time,
            Operation::Write => self.sector_time * (1 + self.sectors) as f64,
        }
    }

    /// Total time to serve `req` with the head parked on `track` at `now`.
    pub fn service_time(&self, req: &Request, track: u32, now: f64) -> f64 {
        let seek = self.seek_time(track, req.track);
        seek + self.rotational_delay(req.sector, now + seek) + self.transfer_time(req.operation)
    }
}

/// Arm position plus the busy/movement counters an engine accumulates.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Head {
    pub track: u32,
    pub busy_time: f64,
    pub movement: u64,
}

impl Head {
    pub fn new() -> Head {
        Head { track: 0, busy_time: 0.0, movement: 0 }
    }

    /// Commits a completed service of `service` ms that ended on `track`.
    pub fn settle(&mut self, track: u32, service: f64) {
        self.movement += self.track.abs_diff(track) as u64;
        self.busy_time += service;
        self.track = track;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn disk() -> Disk {
        Disk::new(&SimParams::default())
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn default_geometry_timing() {
        let d = disk();
        assert!(close(d.sector_time, 0.375));
        assert!(close(d.revolution(), 6.0));
        assert!(close(d.transfer_time(Operation::Read), 0.375));
        assert!(close(d.transfer_time(Operation::Write), 0.375 * 17.0));
    }

    #[test]
    fn seek_is_symmetric() {
        let d = disk();
        assert!(close(d.seek_time(10, 30), 10.0));
        assert!(close(d.seek_time(30, 10), 10.0));
        assert_eq!(d.seek_time(7, 7), 0.0);
    }

    #[test]
    fn rotational_delay_wraps() {
        let d = disk();
        assert_eq!(d.rotational_delay(0, 0.0), 0.0);
        assert!(close(d.rotational_delay(3, 0.0), 1.125));
        // sector 0 started 0.1 ms ago: wait almost a full turn
        assert!(close(d.rotational_delay(0, 0.1), 5.9));
        // t = 1.0 is sector 2 with 0.25 ms elapsed inside it
        assert!(close(d.rotational_delay(5, 1.0), 0.875));
        assert!(close(d.rotational_delay(1, 1.0), 15.0 * 0.375 - 0.25));
    }

    #[test]
    fn service_time_adds_components() {
        let d = disk();
        let req = Request { track: 4, sector: 0, head: 1, arrival: 0.0, operation: Operation::Read };
        let seek = d.seek_time(0, 4);
        let expected = seek + d.rotational_delay(0, seek) + d.sector_time;
        assert!(close(d.service_time(&req, 0, 0.0), expected));
    }

    #[test]
    fn head_settle_counts_movement() {
        let mut head = Head::new();
        head.settle(40, 3.0);
        head.settle(10, 2.0);
        assert_eq!(head.track, 10);
        assert_eq!(head.movement, 70);
        assert!(close(head.busy_time, 5.0));
    }

    proptest! {
        #[test]
        fn rotational_delay_within_one_turn(target in 0u32..16, at in 0.0f64..1.0e6) {
            let d = disk();
            let delay = d.rotational_delay(target, at);
            prop_assert!(delay >= 0.0);
            prop_assert!(delay < d.revolution());
        }
    }
}
