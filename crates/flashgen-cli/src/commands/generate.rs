use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use flashgen_core::ConfigTree;
use flashgen_exp::{
    generate, run_directory, AdmissionSpec, GenSpec, TraceSpec, DEFAULT_MAX_VARIANTS,
};

/// Default Zipf skew when `--zipf` is given bare.
const DEFAULT_ZIPF_ALPHA: f64 = 0.8;
/// Default churn probabilities when `--churn` is given bare.
const DEFAULT_CHURN_PROBABILITIES: [f64; 4] = [0.0, 0.01, 0.05, 0.1];

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Label naming this generation run.
    pub label: String,
    /// Template config parsed as the seed tree.
    #[arg(long, default_value = "template.cfg")]
    pub template: PathBuf,
    /// Load a stored YAML spec instead of assembling one from flags.
    #[arg(long)]
    pub plan: Option<PathBuf>,
    /// Create a timestamped run directory under this root.
    #[arg(long)]
    pub results_root: Option<PathBuf>,
    /// Memory sizes in MB.
    #[arg(long = "mem-size-mb", value_name = "MB", num_args = 1..)]
    pub mem_size_mb: Vec<i64>,
    /// Flash sizes in MB.
    #[arg(long = "flash-size-mb", value_name = "MB", num_args = 1..)]
    pub flash_size_mb: Vec<i64>,
    /// Skip the flash layer entirely.
    #[arg(long)]
    pub no_flash: bool,
    /// Victim cache sizes in MB, carved out of the flash budget.
    #[arg(long = "victim-mb", value_name = "MB", num_args = 1..)]
    pub victim_mb: Vec<i64>,
    /// Skip the set area (pure log layout).
    #[arg(long)]
    pub no_sets: bool,
    /// Track per-item hits for NRU eviction.
    #[arg(long)]
    pub nru: bool,
    /// RRIP bit widths.
    #[arg(long = "rrip", value_name = "BITS", num_args = 1..)]
    pub rrip: Vec<i64>,
    /// Set capacities in 1024-byte units.
    #[arg(long = "set-caps", value_name = "CAP", num_args = 1..)]
    pub set_caps: Vec<i64>,
    /// Record the per-set occupancy distribution.
    #[arg(long = "set-dist")]
    pub set_dist: bool,
    /// Record the per-set hit distribution.
    #[arg(long = "set-hits-dist")]
    pub set_hits_dist: bool,
    /// Log area percents.
    #[arg(long = "log", value_name = "PERCENT", num_args = 1..)]
    pub log: Option<Vec<f64>>,
    /// Grow flash capacity to keep the set area constant under the log.
    #[arg(long = "adjust-up-flash-capacity")]
    pub adjust_up_flash_capacity: bool,
    /// Rotating log flush block sizes in KB.
    #[arg(long = "rotating-kb", value_name = "KB", num_args = 1..)]
    pub rotating_kb: Vec<i64>,
    /// Multi-log counts.
    #[arg(long = "multilog", value_name = "N", num_args = 1..)]
    pub multilog: Vec<i64>,
    /// Zipf skew parameters (bare flag selects 0.8).
    #[arg(long = "zipf", value_name = "ALPHA", num_args = 0..)]
    pub zipf: Option<Vec<f64>>,
    /// Churn probabilities (bare flag selects the default ladder).
    #[arg(long = "churn", value_name = "PROB", num_args = 0..)]
    pub churn: Option<Vec<f64>>,
    /// Replay the sampled Facebook TAO trace.
    #[arg(long = "fb-simple")]
    pub fb_simple: bool,
    /// Object scaling multipliers for the TAO replay.
    #[arg(long = "obj-scaling", value_name = "MULT", num_args = 1..)]
    pub obj_scaling: Vec<f64>,
    /// Caps on replayed requests, in thousands.
    #[arg(long = "limit-requests", value_name = "KREQ", num_args = 1..)]
    pub limit_requests: Option<Vec<i64>>,
    /// Random admission ratios ahead of the set area.
    #[arg(long = "pre-set-random", value_name = "RATIO", num_args = 1..)]
    pub pre_set_random: Option<Vec<f64>>,
    /// Random admission ratios ahead of the log area.
    #[arg(long = "pre-log-random", value_name = "RATIO", num_args = 1..)]
    pub pre_log_random: Option<Vec<f64>>,
    /// Hit-count admission thresholds.
    #[arg(long = "threshold", value_name = "N", num_args = 1..)]
    pub threshold: Option<Vec<i64>>,
    /// Readmission counts.
    #[arg(long = "readmission", value_name = "N", num_args = 1..)]
    pub readmission: Option<Vec<i64>>,
    /// Also keep the unmodified base experiments in the batch.
    #[arg(long = "no-admission")]
    pub no_admission: bool,
    /// Thread pre-set policies through the pre-log results.
    #[arg(long = "multiple-admission-policies")]
    pub multiple_admission_policies: bool,
    /// Stats collection interval as a base-10 power.
    #[arg(long = "stats-interval", value_name = "POWER")]
    pub stats_interval: Option<i64>,
    /// Ceiling on generated variants.
    #[arg(long = "max-variants", default_value_t = DEFAULT_MAX_VARIANTS)]
    pub max_variants: usize,
}

pub fn run(args: &GenerateArgs) -> Result<(), Box<dyn Error>> {
    let spec = match &args.plan {
        Some(path) => {
            let text = fs::read_to_string(path)?;
            let mut spec: GenSpec = serde_yaml::from_str(&text)?;
            // The positional label names this run even for stored plans.
            spec.label = args.label.clone();
            spec
        }
        None => spec_from_args(args),
    };
    let template = ConfigTree::from_file(&args.template)?;
    let run_dir = run_directory(args.results_root.as_deref(), &spec.label);

    let report = generate(&spec, &template, &run_dir)?;
    for path in &report.config_paths {
        println!("{}", path.display());
    }
    Ok(())
}

fn spec_from_args(args: &GenerateArgs) -> GenSpec {
    let mut spec = GenSpec::new(args.label.clone());
    spec.mem_sizes_mb = args.mem_size_mb.clone();
    spec.flash_sizes_mb = args.flash_size_mb.clone();
    spec.no_flash = args.no_flash;
    spec.victim_sizes_mb = args.victim_mb.clone();
    spec.no_sets = args.no_sets;
    spec.nru = args.nru;
    spec.rrip_bits = args.rrip.clone();
    spec.set_capacities = args.set_caps.clone();
    spec.set_distribution = args.set_dist;
    spec.set_hits_distribution = args.set_hits_dist;
    spec.log_percents = args.log.clone();
    spec.adjust_flash_capacity = args.adjust_up_flash_capacity;
    spec.rotating_flush_kb = args.rotating_kb.clone();
    spec.multi_log_counts = args.multilog.clone();
    spec.stats_interval_power = args.stats_interval;
    spec.max_variants = args.max_variants;

    spec.traces = TraceSpec {
        zipf_alphas: args.zipf.clone().map(|alphas| {
            if alphas.is_empty() {
                vec![DEFAULT_ZIPF_ALPHA]
            } else {
                alphas
            }
        }),
        churn_probabilities: args.churn.clone().map(|probabilities| {
            if probabilities.is_empty() {
                DEFAULT_CHURN_PROBABILITIES.to_vec()
            } else {
                probabilities
            }
        }),
        fb_tao_simple: args.fb_simple,
        object_scalings: args.obj_scaling.clone(),
        limit_kilo_requests: args.limit_requests.clone(),
    };

    let any_admission = args.pre_set_random.is_some()
        || args.pre_log_random.is_some()
        || args.threshold.is_some()
        || args.readmission.is_some()
        || args.no_admission;
    if any_admission {
        spec.admission = Some(AdmissionSpec {
            pre_set_random: args.pre_set_random.clone(),
            pre_log_random: args.pre_log_random.clone(),
            threshold: args.threshold.clone(),
            readmission: args.readmission.clone(),
            keep_unmodified: args.no_admission,
            layered: args.multiple_admission_policies,
        });
    }
    spec
}
