//! Infant growth tracking against WHO weight-for-age reference percentiles.
//!
//! The pure core (`age`, `percentile`, `series`, `generator`) works on plain
//! data snapshots. Persistence sits behind the repository traits in `store`,
//! and `tracker` composes the two.

pub mod age;
pub mod charts;
pub mod config;
pub mod error;
pub mod generator;
pub mod models;
pub mod percentile;
pub mod reference;
pub mod series;
pub mod store;
pub mod tracker;
pub mod units;

pub use age::months_from_days;
pub use error::{ChartError, ConfigError, ReferenceError, StoreError, TrackerError, ValidationError};
pub use generator::generate_batch;
pub use models::{Gender, Measurement, Profile};
pub use percentile::estimate_weight_percentile;
pub use reference::ReferenceTable;
pub use series::{
    build_point_annotations, build_reference_curves, build_user_trend, GrowthChartData,
    PointAnnotation, SeriesPoint,
};
pub use tracker::{GrowthTracker, Readings};
