//! Experiment expansion for flashgen: the sweep catalog, the flat-map
//! pipeline, output stamping, and whole-run generation.

mod catalog;
mod experiment;
mod generate;
mod pipeline;
mod stamp;

pub use catalog::{Sweep, DEFAULT_FLASH_SIZES_MB, DEFAULT_MEM_SIZES_MB};
pub use experiment::Experiment;
pub use generate::{
    build_experiments, generate, run_directory, write_configs, AdmissionSpec, GenReport, GenSpec,
    TraceSpec, DEFAULT_MAX_VARIANTS,
};
pub use pipeline::expand;
pub use stamp::OutputStamper;
