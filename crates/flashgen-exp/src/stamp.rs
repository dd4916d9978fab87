//! Terminal pipeline stage pinning each experiment to its output file.

use std::path::PathBuf;

use flashgen_core::GenError;

use crate::experiment::Experiment;

/// Assigns `stats.outputFile` (and optionally the stats cadence) to
/// every experiment. Pure annotation: exactly one output per input,
/// never a fan-out or a filter.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputStamper {
    run_dir: PathBuf,
    stats_interval_power: Option<i64>,
}

impl OutputStamper {
    /// Stamper writing under `run_dir`.
    pub fn new(run_dir: impl Into<PathBuf>) -> Self {
        Self {
            run_dir: run_dir.into(),
            stats_interval_power: None,
        }
    }

    /// Also sets the base-10 stats collection interval power.
    pub fn with_stats_interval(mut self, power: i64) -> Self {
        self.stats_interval_power = Some(power);
        self
    }

    /// Stamps one experiment.
    pub fn apply(&self, exp: &Experiment) -> Result<Vec<Experiment>, GenError> {
        let mut next = exp.clone();
        next.cfg.set(
            "stats.outputFile",
            format!("{}/output/{}.out", self.run_dir.display(), exp.name),
        )?;
        if let Some(power) = self.stats_interval_power {
            next.cfg.set("stats.collectionIntervalPower", power)?;
        }
        Ok(vec![next])
    }

    /// Stamps a whole batch, preserving order.
    pub fn stamp_all(&self, exps: &[Experiment]) -> Result<Vec<Experiment>, GenError> {
        let mut out = Vec::with_capacity(exps.len());
        for exp in exps {
            out.extend(self.apply(exp)?);
        }
        Ok(out)
    }
}
