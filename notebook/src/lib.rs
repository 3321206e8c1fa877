mod analyze;
mod config;
mod etl;
mod filter;
pub mod model;
mod notebook;
pub mod transformer;

pub use config::EtlConfig;
pub use etl::{EtlError, EtlOutput, FileGroup, PerftestEtl};
pub use filter::filter_metrics;
pub use notebook::{Analysis, PerftestNotebook};

#[cfg(feature = "test_data")]
pub mod test_data;
