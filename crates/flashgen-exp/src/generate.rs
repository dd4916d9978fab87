//! Whole-run orchestration: a declarative [`GenSpec`] is expanded into
//! experiments, stamped, and written out as one config file per variant.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use flashgen_core::{ConfigTree, ErrorInfo, GenError};
use serde::{Deserialize, Serialize};

use crate::catalog::{Sweep, DEFAULT_FLASH_SIZES_MB, DEFAULT_MEM_SIZES_MB};
use crate::experiment::Experiment;
use crate::pipeline::{ensure_budget, expand};
use crate::stamp::OutputStamper;

/// Default ceiling on generated variants per run.
pub const DEFAULT_MAX_VARIANTS: usize = 4096;

fn default_max_variants() -> usize {
    DEFAULT_MAX_VARIANTS
}

fn default_seed_name() -> String {
    "cache".to_string()
}

/// Declarative description of one generation run.
///
/// Mirrors the generator command line one-to-one and is serde-friendly,
/// so whole runs can be stored and replayed as YAML plans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenSpec {
    /// Label naming the run directory.
    pub label: String,
    /// Token every experiment name starts with.
    #[serde(default = "default_seed_name")]
    pub seed_name: String,
    /// Memory capacity sweep (MB); empty selects the default of [17].
    #[serde(default)]
    pub mem_sizes_mb: Vec<i64>,
    /// Flash capacity sweep (MB); empty selects the default of [950].
    #[serde(default)]
    pub flash_sizes_mb: Vec<i64>,
    /// Skip the flash layer entirely.
    #[serde(default)]
    pub no_flash: bool,
    /// Victim cache sizes (MB) carved out of the flash budget.
    #[serde(default)]
    pub victim_sizes_mb: Vec<i64>,
    /// Skip the set area (forces a pure log layout).
    #[serde(default)]
    pub no_sets: bool,
    /// Track per-item hits for NRU eviction.
    #[serde(default)]
    pub nru: bool,
    /// RRIP bit widths; non-empty enables the RRIP sweeps.
    #[serde(default)]
    pub rrip_bits: Vec<i64>,
    /// Set capacities in 1024-byte units; empty selects the default.
    #[serde(default)]
    pub set_capacities: Vec<i64>,
    /// Record the per-set occupancy distribution.
    #[serde(default)]
    pub set_distribution: bool,
    /// Record the per-set hit distribution.
    #[serde(default)]
    pub set_hits_distribution: bool,
    /// Log area percents; `no_sets` forces [100].
    #[serde(default)]
    pub log_percents: Option<Vec<f64>>,
    /// Grow flash capacity to keep the set area constant under the log.
    #[serde(default)]
    pub adjust_flash_capacity: bool,
    /// Rotating-log flush block sizes (KB); wins over multi-log.
    #[serde(default)]
    pub rotating_flush_kb: Vec<i64>,
    /// Multi-log counts; applied when no rotating sweep is requested.
    #[serde(default)]
    pub multi_log_counts: Vec<i64>,
    /// Admission policy family.
    #[serde(default)]
    pub admission: Option<AdmissionSpec>,
    /// Trace family; at least one trace kind is required.
    #[serde(default)]
    pub traces: TraceSpec,
    /// Base-10 power of the stats collection interval.
    #[serde(default)]
    pub stats_interval_power: Option<i64>,
    /// Ceiling on the variant count, checked after every phase.
    #[serde(default = "default_max_variants")]
    pub max_variants: usize,
}

impl GenSpec {
    /// Spec with the given run label and every knob at its default.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            seed_name: default_seed_name(),
            mem_sizes_mb: Vec::new(),
            flash_sizes_mb: Vec::new(),
            no_flash: false,
            victim_sizes_mb: Vec::new(),
            no_sets: false,
            nru: false,
            rrip_bits: Vec::new(),
            set_capacities: Vec::new(),
            set_distribution: false,
            set_hits_distribution: false,
            log_percents: None,
            adjust_flash_capacity: false,
            rotating_flush_kb: Vec::new(),
            multi_log_counts: Vec::new(),
            admission: None,
            traces: TraceSpec::default(),
            stats_interval_power: None,
            max_variants: DEFAULT_MAX_VARIANTS,
        }
    }
}

/// Trace selection for a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraceSpec {
    /// Zipf skew parameters.
    #[serde(default)]
    pub zipf_alphas: Option<Vec<f64>>,
    /// Churn probabilities.
    #[serde(default)]
    pub churn_probabilities: Option<Vec<f64>>,
    /// Replay the sampled Facebook TAO trace.
    #[serde(default)]
    pub fb_tao_simple: bool,
    /// Object size multipliers for the TAO replay; empty means [1].
    #[serde(default)]
    pub object_scalings: Vec<f64>,
    /// Caps on replayed requests, in thousands.
    #[serde(default)]
    pub limit_kilo_requests: Option<Vec<i64>>,
}

impl TraceSpec {
    fn any(&self) -> bool {
        self.zipf_alphas.is_some() || self.churn_probabilities.is_some() || self.fb_tao_simple
    }
}

/// Admission policy selection for a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdmissionSpec {
    /// Random admission ratios ahead of the set area.
    #[serde(default)]
    pub pre_set_random: Option<Vec<f64>>,
    /// Random admission ratios ahead of the log area.
    #[serde(default)]
    pub pre_log_random: Option<Vec<f64>>,
    /// Hit-count thresholds ahead of the set area.
    #[serde(default)]
    pub threshold: Option<Vec<i64>>,
    /// Readmission counts threaded through the other policies.
    #[serde(default)]
    pub readmission: Option<Vec<i64>>,
    /// Also keep the unmodified base experiments in the batch.
    #[serde(default)]
    pub keep_unmodified: bool,
    /// Thread the pre-set family through the pre-log results instead of
    /// unioning the two families.
    #[serde(default)]
    pub layered: bool,
}

/// Result of a generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenReport {
    /// Root of the run directory.
    pub run_dir: PathBuf,
    /// Written config paths, in pipeline order.
    pub config_paths: Vec<PathBuf>,
}

/// Expands `spec` against a parsed template into the final experiment
/// list, without touching the filesystem.
pub fn build_experiments(
    spec: &GenSpec,
    template: &ConfigTree,
) -> Result<Vec<Experiment>, GenError> {
    validate(spec)?;
    let mut exps = base_experiments(spec, template)?;
    if let Some(admission) = &spec.admission {
        exps = apply_admission(spec, exps, admission)?;
    }
    exps = apply_traces(spec, exps)?;
    ensure_budget("traces", exps.len(), spec.max_variants)?;
    Ok(exps)
}

/// Runs the whole pipeline and writes one config per final experiment.
pub fn generate(
    spec: &GenSpec,
    template: &ConfigTree,
    run_dir: &Path,
) -> Result<GenReport, GenError> {
    let exps = build_experiments(spec, template)?;
    let mut stamper = OutputStamper::new(run_dir);
    if let Some(power) = spec.stats_interval_power {
        stamper = stamper.with_stats_interval(power);
    }
    let exps = stamper.stamp_all(&exps)?;
    write_configs(run_dir, &exps)
}

/// Picks the run directory: timestamped under `results_root` when one is
/// supplied, the current directory otherwise.
pub fn run_directory(results_root: Option<&Path>, label: &str) -> PathBuf {
    match results_root {
        Some(root) => {
            let stamp = Local::now().format("%Y-%m-%d_%H-%M-%S");
            root.join(format!("{stamp}-{label}"))
        }
        None => PathBuf::from("."),
    }
}

/// Writes `<run>/configs/<name>.cfg` per experiment and creates the
/// empty `<run>/output/` directory for the downstream simulator.
///
/// Duplicate experiment names abort the batch before any file lands;
/// individual files are written atomically.
pub fn write_configs(run_dir: &Path, exps: &[Experiment]) -> Result<GenReport, GenError> {
    let mut seen = BTreeSet::new();
    for exp in exps {
        if !seen.insert(exp.name.as_str()) {
            return Err(GenError::Sweep(
                ErrorInfo::new("output-collision", "two experiments share an output name")
                    .with_context("name", exp.name.clone())
                    .with_hint("distinguish the sweeps feeding these variants"),
            ));
        }
    }

    let configs_dir = run_dir.join("configs");
    let output_dir = run_dir.join("output");
    fs::create_dir_all(&configs_dir).map_err(|err| wrap_io(&configs_dir, &err))?;
    fs::create_dir_all(&output_dir).map_err(|err| wrap_io(&output_dir, &err))?;

    let mut config_paths = Vec::with_capacity(exps.len());
    for exp in exps {
        let path = configs_dir.join(format!("{}.cfg", exp.name));
        exp.cfg.write_file(&path)?;
        tracing::info!(config = %path.display(), "wrote config");
        config_paths.push(path);
    }
    Ok(GenReport {
        run_dir: run_dir.to_path_buf(),
        config_paths,
    })
}

fn validate(spec: &GenSpec) -> Result<(), GenError> {
    if !spec.traces.any() {
        return Err(GenError::Sweep(
            ErrorInfo::new("trace-required", "at least one trace kind must be selected")
                .with_hint("select zipf, churn, or the TAO replay"),
        ));
    }
    if spec.nru && !spec.rrip_bits.is_empty() {
        return Err(GenError::Sweep(
            ErrorInfo::new("eviction-conflict", "NRU and RRIP set layouts are mutually exclusive"),
        ));
    }
    Ok(())
}

fn base_experiments(
    spec: &GenSpec,
    template: &ConfigTree,
) -> Result<Vec<Experiment>, GenError> {
    let mut exps = vec![Experiment::new(spec.seed_name.clone(), template.clone())];

    let mem_sizes = pick(&spec.mem_sizes_mb, &DEFAULT_MEM_SIZES_MB);
    exps = expand(&exps, &Sweep::MemSizes { sizes_mb: mem_sizes })?;
    exps = expand(&exps, &Sweep::SlowWarmup)?;
    if spec.set_distribution {
        exps = expand(&exps, &Sweep::SetDistribution)?;
    }
    if spec.set_hits_distribution {
        exps = expand(&exps, &Sweep::SetHitsDistribution)?;
    }

    if !spec.no_flash {
        let flash_sizes = pick(&spec.flash_sizes_mb, &DEFAULT_FLASH_SIZES_MB);
        exps = expand(&exps, &Sweep::FlashSizes { sizes_mb: flash_sizes })?;
        if !spec.victim_sizes_mb.is_empty() {
            exps = expand(
                &exps,
                &Sweep::VictimCache {
                    sizes_mb: spec.victim_sizes_mb.clone(),
                },
            )?;
        }

        let mut log_percents = spec.log_percents.clone();
        if !spec.no_sets {
            exps = expand(
                &exps,
                &Sweep::Sets {
                    nru: spec.nru,
                    capacities: spec.set_capacities.clone(),
                },
            )?;
            if !spec.rrip_bits.is_empty() {
                exps = expand(&exps, &Sweep::RripMixedPromotion)?;
                exps = expand(
                    &exps,
                    &Sweep::Rrip {
                        bits: spec.rrip_bits.clone(),
                    },
                )?;
            }
        } else {
            // A pure log layout: the whole flash area becomes log.
            log_percents = Some(vec![100.0]);
        }

        if let Some(percents) = log_percents {
            exps = expand(
                &exps,
                &Sweep::LogRatio {
                    percents,
                    adjust_flash_capacity: spec.adjust_flash_capacity,
                },
            )?;
            if !spec.rotating_flush_kb.is_empty() {
                exps = expand(
                    &exps,
                    &Sweep::RotatingLog {
                        flush_kb: spec.rotating_flush_kb.clone(),
                    },
                )?;
            } else if !spec.multi_log_counts.is_empty() {
                exps = expand(
                    &exps,
                    &Sweep::MultiLog {
                        counts: spec.multi_log_counts.clone(),
                    },
                )?;
            }
        }
    }

    ensure_budget("base", exps.len(), spec.max_variants)?;
    Ok(exps)
}

fn apply_admission(
    spec: &GenSpec,
    exps: Vec<Experiment>,
    admission: &AdmissionSpec,
) -> Result<Vec<Experiment>, GenError> {
    let mut out = match &admission.pre_log_random {
        Some(ratios) => expand(
            &exps,
            &Sweep::PreLogRandom {
                ratios: ratios.clone(),
            },
        )?,
        None => Vec::new(),
    };

    if admission.layered {
        out = pre_set_family(out, admission)?;
    } else {
        out.extend(pre_set_family(exps.clone(), admission)?);
    }
    if admission.keep_unmodified {
        out.extend(exps);
    }

    ensure_budget("admission", out.len(), spec.max_variants)?;
    Ok(out)
}

fn pre_set_family(
    exps: Vec<Experiment>,
    admission: &AdmissionSpec,
) -> Result<Vec<Experiment>, GenError> {
    let mut out = Vec::new();
    if let Some(ratios) = &admission.pre_set_random {
        out.extend(expand(
            &exps,
            &Sweep::PreSetRandom {
                ratios: ratios.clone(),
            },
        )?);
    }
    if let Some(counts) = &admission.threshold {
        out.extend(expand(
            &exps,
            &Sweep::Threshold {
                counts: counts.clone(),
            },
        )?);
    }
    if let Some(counts) = &admission.readmission {
        out = expand(
            &out,
            &Sweep::Readmission {
                counts: counts.clone(),
            },
        )?;
    }
    Ok(out)
}

fn apply_traces(spec: &GenSpec, exps: Vec<Experiment>) -> Result<Vec<Experiment>, GenError> {
    let traces = &spec.traces;
    let mut out = Vec::new();
    if let Some(alphas) = &traces.zipf_alphas {
        out.extend(expand(
            &exps,
            &Sweep::Zipf {
                alphas: alphas.clone(),
            },
        )?);
    }
    if let Some(probabilities) = &traces.churn_probabilities {
        out.extend(expand(
            &exps,
            &Sweep::Churn {
                probabilities: probabilities.clone(),
            },
        )?);
    }
    if traces.fb_tao_simple {
        let scalings = pick_f64(&traces.object_scalings, &[1.0]);
        out.extend(expand(&exps, &Sweep::FbTaoSimple { scalings })?);
    }
    if let Some(limits) = &traces.limit_kilo_requests {
        out = expand(
            &out,
            &Sweep::LimitRequests {
                kilo_requests: limits.clone(),
            },
        )?;
    }
    Ok(out)
}

fn pick(requested: &[i64], fallback: &[i64]) -> Vec<i64> {
    if requested.is_empty() {
        fallback.to_vec()
    } else {
        requested.to_vec()
    }
}

fn pick_f64(requested: &[f64], fallback: &[f64]) -> Vec<f64> {
    if requested.is_empty() {
        fallback.to_vec()
    } else {
        requested.to_vec()
    }
}

fn wrap_io(path: &Path, err: &std::io::Error) -> GenError {
    GenError::Io(
        ErrorInfo::new("run-layout", "failed to create run directory")
            .with_context("path", path.display().to_string())
            .with_hint(err.to_string()),
    )
}
