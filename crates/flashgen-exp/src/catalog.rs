//! The sweep catalog: every config mutation the generator can apply,
//! modeled as inspectable data rather than free functions.

use flashgen_core::{GenError, Scalar};
use serde::{Deserialize, Serialize};

use crate::experiment::Experiment;

/// Default memory capacity sweep (MB) when none is requested.
pub const DEFAULT_MEM_SIZES_MB: [i64; 1] = [17];
/// Default flash capacity sweep (MB) when none is requested.
pub const DEFAULT_FLASH_SIZES_MB: [i64; 1] = [950];

/// Sentinel for an unbounded request replay.
const UNLIMITED_KILO_REQUESTS: i64 = -1;
/// Set capacity fallback, in the 1024-byte units the simulator expects.
const DEFAULT_SET_CAPACITY: i64 = 4;
/// Average object size in the sampled TAO trace, bytes.
const TAO_AVG_OBJECT_BYTES: f64 = 291.0;
/// Per-record index overhead carried in memory, bits.
const INDEX_OVERHEAD_BITS: f64 = 30.0;

/// Tolerance for identity-value float comparisons.
const IDENTITY_EPS: f64 = 1e-9;

/// One composable mutation over an [`Experiment`].
///
/// Applying a sweep yields zero, one, or many derived experiments, each
/// owning a fresh tree. An unmet structural precondition yields an empty
/// list — ordinary sweep-algebra control flow, never an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Sweep {
    /// Memory capacity fan-out, one experiment per size.
    MemSizes {
        /// Capacities in MB.
        sizes_mb: Vec<i64>,
    },
    /// Flash capacity fan-out, one experiment per size.
    FlashSizes {
        /// Capacities in MB.
        sizes_mb: Vec<i64>,
    },
    /// Enables the slow warmup phase. No name token.
    SlowWarmup,
    /// Records the per-set occupancy distribution. No name token.
    SetDistribution,
    /// Records the per-set hit distribution. No name token.
    SetHitsDistribution,
    /// Carves a victim cache out of the flash budget.
    VictimCache {
        /// Victim cache sizes in MB, subtracted from the flash capacity.
        sizes_mb: Vec<i64>,
    },
    /// Set capacity fan-out, optionally with NRU hit tracking.
    Sets {
        /// Track per-item hits for NRU eviction.
        nru: bool,
        /// Capacities in 1024-byte units; empty means the default of 4.
        capacities: Vec<i64>,
    },
    /// RRIP eviction bit-width fan-out.
    Rrip {
        /// Bit widths to sweep.
        bits: Vec<i64>,
    },
    /// RRIP promotion-only insertion; filtered out after mixed promotion.
    RripPromotionOnly,
    /// RRIP mixed promotion insertion; filtered out after promotion-only.
    RripMixedPromotion,
    /// Fraction of flash reserved as the log area.
    LogRatio {
        /// Percent values; a value ≈ 0 passes the input through.
        percents: Vec<f64>,
        /// Also grow the flash capacity to keep the set area constant.
        adjust_flash_capacity: bool,
    },
    /// Splits the log area into several independent logs.
    MultiLog {
        /// Log counts to sweep.
        counts: Vec<i64>,
    },
    /// Rotating log flush granularity fan-out.
    RotatingLog {
        /// Flush block sizes in KB.
        flush_kb: Vec<i64>,
    },
    /// Random admission ahead of the set area.
    PreSetRandom {
        /// Admit ratios; a ratio ≈ 1 passes the input through.
        ratios: Vec<f64>,
    },
    /// Random admission ahead of the log area.
    PreLogRandom {
        /// Admit ratios; a ratio ≈ 1 passes the input through.
        ratios: Vec<f64>,
    },
    /// Hit-count threshold admission ahead of the set area.
    Threshold {
        /// Thresholds; a threshold of 1 passes the input through.
        counts: Vec<i64>,
    },
    /// Readmission of recently evicted objects into the log.
    Readmission {
        /// Readmit counts; a count of 0 passes the input through.
        counts: Vec<i64>,
    },
    /// Synthetic Zipf trace fan-out.
    Zipf {
        /// Zipf skew parameters.
        alphas: Vec<f64>,
    },
    /// Synthetic churn trace fan-out.
    Churn {
        /// Churn probabilities.
        probabilities: Vec<f64>,
    },
    /// Sampled Facebook TAO trace, with optional object scaling.
    FbTaoSimple {
        /// Object size multipliers; a value ≈ 1 omits the scaling leaves.
        scalings: Vec<f64>,
    },
    /// Caps the replayed request count.
    LimitRequests {
        /// Limits in thousands of requests.
        kilo_requests: Vec<i64>,
    },
}

impl Sweep {
    /// Applies this sweep to one experiment.
    pub fn apply(&self, exp: &Experiment) -> Result<Vec<Experiment>, GenError> {
        match self {
            Sweep::MemSizes { sizes_mb } => {
                fan_out(sizes_mb, |&size| {
                    let mut next = exp.derive(&format!("-memSize{size}MB"));
                    next.cfg.set("cache.memorySizeMB", size)?;
                    Ok(next)
                })
            }
            Sweep::FlashSizes { sizes_mb } => {
                fan_out(sizes_mb, |&size| {
                    let mut next = exp.derive(&format!("-flashSize{size}MB"));
                    next.cfg.set("cache.flashSizeMB", size)?;
                    Ok(next)
                })
            }
            Sweep::SlowWarmup => {
                let mut next = exp.clone();
                next.cfg.set("cache.slowWarmup", 1)?;
                Ok(vec![next])
            }
            Sweep::SetDistribution => {
                let mut next = exp.clone();
                next.cfg.set("cache.recordSetDistribution", 1)?;
                Ok(vec![next])
            }
            Sweep::SetHitsDistribution => {
                let mut next = exp.clone();
                next.cfg.set("sets.hitDistribution", 1)?;
                Ok(vec![next])
            }
            Sweep::VictimCache { sizes_mb } => {
                let Some(flash_mb) = exp.cfg.scalar("cache.flashSizeMB").and_then(Scalar::as_int)
                else {
                    return Ok(Vec::new());
                };
                fan_out(sizes_mb, |&size| {
                    let mut next = exp.derive(&format!("-victim{size}MB"));
                    next.cfg.set("victimCache.sizeMB", size)?;
                    next.cfg.set("cache.flashSizeMB", flash_mb - size)?;
                    Ok(next)
                })
            }
            Sweep::Sets { nru, capacities } => {
                let capacities = if capacities.is_empty() {
                    vec![DEFAULT_SET_CAPACITY]
                } else {
                    capacities.clone()
                };
                fan_out(&capacities, |&capacity| {
                    let bytes = capacity * 1024;
                    let mut next = exp.derive(&format!("-setCapacity{bytes}B"));
                    next.cfg.set("sets.setCapacity", bytes)?;
                    if *nru {
                        next.cfg.set("sets.trackHitsPerItem", 1)?;
                        next.name.push_str("-nru");
                    }
                    Ok(next)
                })
            }
            Sweep::Rrip { bits } => {
                fan_out(bits, |&width| {
                    let mut next = exp.derive(&format!("-rripBits{width}"));
                    next.cfg.set("sets.rripBits", width)?;
                    Ok(next)
                })
            }
            Sweep::RripPromotionOnly => {
                if exp.name.contains("-rripMixedPromotion") {
                    return Ok(Vec::new());
                }
                let mut next = exp.derive("-rripPromotionOnly");
                next.cfg.set("sets.promotionOnly", 1)?;
                Ok(vec![next])
            }
            Sweep::RripMixedPromotion => {
                if exp.name.contains("-rripPromotionOnly") {
                    return Ok(Vec::new());
                }
                let mut next = exp.derive("-rripMixedPromotion");
                next.cfg.set("sets.mixedRRIP", 1)?;
                Ok(vec![next])
            }
            Sweep::LogRatio {
                percents,
                adjust_flash_capacity,
            } => {
                fan_out(percents, |&percent| {
                    let mut next = if close(percent, 0.0) {
                        exp.clone()
                    } else {
                        let mut derived = exp.derive(&format!("-logPer{}", num(percent)));
                        derived.cfg.set("log.percentLog", percent)?;
                        derived
                    };
                    if *adjust_flash_capacity {
                        next.name.push_str("-adjustFlashCap");
                        next.cfg.set("log.adjustFlashSizeUp", 1)?;
                    }
                    Ok(next)
                })
            }
            Sweep::MultiLog { counts } => {
                if !exp.cfg.contains("log") {
                    return Ok(Vec::new());
                }
                fan_out(counts, |&count| {
                    let mut next = exp.derive(&format!("-multiLog{count}"));
                    next.cfg.set("log.multiLog", count)?;
                    Ok(next)
                })
            }
            Sweep::RotatingLog { flush_kb } => {
                if !exp.cfg.contains("log") {
                    return Ok(Vec::new());
                }
                fan_out(flush_kb, |&block| {
                    let mut next = exp.derive(&format!("-flushSize{block}"));
                    next.cfg.set("log.flushBlockSizeKB", block)?;
                    Ok(next)
                })
            }
            Sweep::PreSetRandom { ratios } => {
                fan_out(ratios, |&ratio| {
                    if close(ratio, 1.0) {
                        return Ok(exp.clone());
                    }
                    let mut next = exp.derive(&format!("-randomAdmissionPreSet{}", num(ratio)));
                    next.cfg.set("preSetAdmission.policy", "Random")?;
                    next.cfg.set("preSetAdmission.admitRatio", ratio)?;
                    Ok(next)
                })
            }
            Sweep::PreLogRandom { ratios } => {
                if !exp.cfg.contains("log") {
                    return Ok(Vec::new());
                }
                fan_out(ratios, |&ratio| {
                    if close(ratio, 1.0) {
                        return Ok(exp.clone());
                    }
                    let mut next = exp.derive(&format!("-randomAdmissionPreLog{}", num(ratio)));
                    next.cfg.set("preLogAdmission.policy", "Random")?;
                    next.cfg.set("preLogAdmission.admitRatio", ratio)?;
                    Ok(next)
                })
            }
            Sweep::Threshold { counts } => {
                if !exp.cfg.contains("log") {
                    return Ok(Vec::new());
                }
                fan_out(counts, |&count| {
                    if count == 1 {
                        return Ok(exp.clone());
                    }
                    let mut next = exp.derive(&format!("-threshold{count}"));
                    next.cfg.set("preSetAdmission.threshold", count)?;
                    next.cfg.set("preSetAdmission.policy", "Threshold")?;
                    Ok(next)
                })
            }
            Sweep::Readmission { counts } => {
                if !exp.cfg.contains("preSetAdmission") {
                    return Ok(Vec::new());
                }
                fan_out(counts, |&count| {
                    if count == 0 {
                        return Ok(exp.clone());
                    }
                    let mut next = exp.derive(&format!("-readmit{count}"));
                    next.cfg.set("log.readmit", count)?;
                    Ok(next)
                })
            }
            Sweep::Zipf { alphas } => {
                fan_out(alphas, |&alpha| {
                    let mut next = exp.derive(&format!("-zipf{}", num(alpha)));
                    next.cfg.set("trace.totalKAccesses", 10_000)?;
                    next.cfg.set("trace.alpha", alpha)?;
                    next.cfg.set("trace.numObjects", 1_000)?;
                    next.cfg.set("trace.format", "Zipf")?;
                    Ok(next)
                })
            }
            Sweep::Churn { probabilities } => {
                let mut base = exp.derive("-churn");
                base.cfg.set("trace.totalKAccesses", 10_000)?;
                base.cfg.set("trace.alpha", 0.8)?;
                base.cfg.set("trace.numObjects", 1_000)?;
                base.cfg.set("trace.numActiveObjects", 10)?;
                base.cfg.set("trace.format", "Churn")?;
                fan_out(probabilities, |&probability| {
                    let mut next = base.derive(&num(probability));
                    next.cfg.set("trace.churn", probability)?;
                    Ok(next)
                })
            }
            Sweep::FbTaoSimple { scalings } => {
                let mut base = exp.derive("-fbTaoSimple");
                base.cfg.set("trace.totalKAccesses", UNLIMITED_KILO_REQUESTS)?;
                base.cfg.set("trace.filename", "fb-sampled.csv")?;
                base.cfg.set("trace.samplingSeed", 0)?;
                base.cfg.set("trace.format", "FacebookTaoSimple")?;
                fan_out(scalings, |&scaling| {
                    let mut next = base.clone();
                    if !close(scaling, 1.0) {
                        next.cfg
                            .set("cache.memOverheadRatio", index_overhead_ratio(scaling))?;
                        next.cfg.set("trace.objectScaling", scaling)?;
                        next.name.push_str(&format!("-scaling{}", num(scaling)));
                    }
                    Ok(next)
                })
            }
            Sweep::LimitRequests { kilo_requests } => {
                fan_out(kilo_requests, |&limit| {
                    let mut next = exp.derive(&format!("-numKRequests{limit}"));
                    next.cfg.set("trace.totalKAccesses", limit)?;
                    Ok(next)
                })
            }
        }
    }
}

/// In-memory index bytes per cached byte once objects are scaled.
fn index_overhead_ratio(scaling: f64) -> f64 {
    (INDEX_OVERHEAD_BITS / 8.0) / (TAO_AVG_OBJECT_BYTES * scaling)
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= IDENTITY_EPS
}

/// Formats a sweep value for a name token: integral floats drop the
/// decimal point (`50`, not `50.0`).
fn num(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

fn fan_out<T>(
    values: &[T],
    mut one: impl FnMut(&T) -> Result<Experiment, GenError>,
) -> Result<Vec<Experiment>, GenError> {
    let mut out = Vec::with_capacity(values.len());
    for value in values {
        out.push(one(value)?);
    }
    Ok(out)
}
