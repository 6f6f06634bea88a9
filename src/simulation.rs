use std::fs;
use std::path::Path;

use anyhow::{ensure, Context};
use log::info;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::request::Workload;
use crate::scheduler::{Policy, SimulationResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimParams {
    pub tracks: u32,
    pub heads: u32,
    pub sectors: u32,
    pub rpm: u32,
    /// Head travel time between adjacent tracks, ms.
    pub seek_per_track: f64,
    /// Simulated time after which nothing more completes, ms.
    pub horizon: f64,

    /// Largest interarrival gap of the first trial, ms.
    pub max_gap: f64,
    /// The gap shrinks by this factor after every trial.
    pub gap_divisor: f64,
    pub trials: usize,
    pub seed: Option<u64>,
}

impl Default for SimParams {
    fn default() -> SimParams {
        SimParams {
            tracks: 500,
            heads: 4,
            sectors: 16,
            rpm: 10_000,
            seek_per_track: 0.5,
            horizon: 300_000.0,
            max_gap: 5000.0,
            gap_divisor: 10.0,
            trials: 3,
            seed: None,
        }
    }
}

impl SimParams {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> anyhow::Result<SimParams> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let params: SimParams = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.tracks > 0, "tracks must be positive");
        ensure!(self.heads > 0, "heads must be positive");
        ensure!(self.sectors > 0, "sectors must be positive");
        ensure!(self.rpm > 0, "rpm must be positive");
        ensure!(self.seek_per_track > 0.0, "seek_per_track must be positive, got {}", self.seek_per_track);
        ensure!(self.horizon > 0.0, "horizon must be positive, got {}", self.horizon);
        ensure!(self.max_gap > 0.0, "max_gap must be positive, got {}", self.max_gap);
        ensure!(self.gap_divisor > 0.0, "gap_divisor must be positive, got {}", self.gap_divisor);
        Ok(())
    }
}

/// Outcome of one generate-and-replay cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Trial {
    pub max_gap: f64,
    pub workload_len: usize,
    pub results: Vec<(Policy, SimulationResult)>,
}

/// Generates one workload and replays it once per policy.
pub fn run_trial<R: Rng>(sys: &SimParams, max_gap: f64, policies: &[Policy], rng: &mut R) -> Trial {
    let workload = Workload::generate(sys, max_gap, rng);
    info!("max gap {} ms: {} requests generated", max_gap, workload.len());

    let results = policies
        .iter()
        .map(|&policy| (policy, policy.scheduler().run(&workload, sys)))
        .collect();
    Trial { max_gap, workload_len: workload.len(), results }
}

/// Runs `sys.trials` trials, dividing the gap by `sys.gap_divisor` after each.
pub fn run<R: Rng>(sys: &SimParams, policies: &[Policy], rng: &mut R) -> Vec<Trial> {
    let mut max_gap = sys.max_gap;
    let mut trials = Vec::with_capacity(sys.trials);
    for i in 0..sys.trials {
        info!("trial {} of {}", i + 1, sys.trials);
        trials.push(run_trial(sys, max_gap, policies, rng));
        max_gap /= sys.gap_divisor;
    }
    trials
}
