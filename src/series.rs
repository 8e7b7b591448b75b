//! # Growth Series Construction
//!
//! Builds the plot-ready series for the growth chart:
//! - reference percentile curves, one ordered sequence per displayed rank
//! - the child's own weight trend, one point per month bucket
//! - per-point annotations (date, weight, percentile) for tooltips
//!
//! All builders are pure, take snapshots by reference and are empty-safe.

use crate::age::months_from_days;
use crate::models::{Gender, Measurement};
use crate::percentile::estimate_weight_percentile;
use crate::reference::ReferenceTable;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Percentile ranks drawn on the chart by default
pub const PERCENTILES_TO_PLOT: [u8; 7] = [3, 10, 25, 50, 75, 90, 97];

/// Default chart horizon in months
pub const DEFAULT_MAX_MONTHS: u32 = 24;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub month: i64,
    pub weight_kg: f64,
}

/// A trend point with the details shown in its tooltip
#[derive(Debug, Clone, PartialEq)]
pub struct PointAnnotation {
    pub month: i64,
    pub weight_kg: f64,
    pub percentile: Option<f64>,
    pub date: NaiveDate,
}

/// Percentile rank -> curve ordered by month
pub type ReferenceCurves = BTreeMap<u8, Vec<SeriesPoint>>;

/// Everything a chart needs, computed from one snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct GrowthChartData {
    pub gender: Gender,
    pub max_months: u32,
    pub curves: ReferenceCurves,
    pub trend: Vec<SeriesPoint>,
    pub annotations: Vec<PointAnnotation>,
}

impl GrowthChartData {
    /// True when the child has no measurements to plot
    pub fn is_empty(&self) -> bool {
        self.trend.is_empty()
    }

    /// Y axis bounds over curves and trend
    pub fn weight_range(&self) -> Option<(f64, f64)> {
        weight_axis_range(&self.curves, &self.trend)
    }
}

pub trait PointSliceExt {
    fn min_max_month(&self) -> Option<(i64, i64)>;
    fn min_max_weight(&self) -> Option<(f64, f64)>;
}

impl PointSliceExt for [SeriesPoint] {
    fn min_max_month(&self) -> Option<(i64, i64)> {
        self.iter().fold(None, |acc, point| match acc {
            None => Some((point.month, point.month)),
            Some((min, max)) => Some((min.min(point.month), max.max(point.month))),
        })
    }

    fn min_max_weight(&self) -> Option<(f64, f64)> {
        self.iter().fold(None, |acc, point| match acc {
            None => Some((point.weight_kg, point.weight_kg)),
            Some((min, max)) => Some((min.min(point.weight_kg), max.max(point.weight_kg))),
        })
    }
}

/// Reference curves for months `0..=max_months`.
///
/// Months without a row, or rows without the requested rank, are skipped;
/// nothing is interpolated across gaps. Every requested rank gets a key.
pub fn build_reference_curves(
    table: &ReferenceTable,
    gender: Gender,
    max_months: u32,
    ranks: &[u8],
) -> ReferenceCurves {
    let mut curves: ReferenceCurves = ranks.iter().map(|&rank| (rank, Vec::new())).collect();

    for month in 0..=i64::from(max_months) {
        let Some(row) = table.row(gender, month) else {
            continue;
        };
        for (rank, curve) in curves.iter_mut() {
            if let Some(&weight_kg) = row.get(rank) {
                curve.push(SeriesPoint { month, weight_kg });
            }
        }
    }

    curves
}

/// Latest measurement per month bucket, ordered by month.
///
/// On equal dates the entry encountered later in the input wins.
pub fn latest_by_month(measurements: &[Measurement]) -> Vec<(i64, &Measurement)> {
    let mut latest: BTreeMap<i64, &Measurement> = BTreeMap::new();
    for m in measurements {
        let month = months_from_days(m.age_in_days);
        let newer_exists = latest
            .get(&month)
            .is_some_and(|existing| existing.date > m.date);
        if !newer_exists {
            latest.insert(month, m);
        }
    }
    latest.into_iter().collect()
}

/// The child's weight, once per month, from the freshest entry in that month
pub fn build_user_trend(measurements: &[Measurement]) -> Vec<SeriesPoint> {
    latest_by_month(measurements)
        .into_iter()
        .map(|(month, m)| SeriesPoint {
            month,
            weight_kg: m.weight_kg,
        })
        .collect()
}

/// Tooltip data for each trend point.
///
/// The percentile is looked up at the measurement's own age-derived month.
pub fn build_point_annotations(
    measurements: &[Measurement],
    table: &ReferenceTable,
    gender: Gender,
) -> Vec<PointAnnotation> {
    latest_by_month(measurements)
        .into_iter()
        .map(|(month, m)| PointAnnotation {
            month,
            weight_kg: m.weight_kg,
            percentile: estimate_weight_percentile(
                table,
                months_from_days(m.age_in_days),
                m.weight_kg,
                gender,
            ),
            date: m.date,
        })
        .collect()
}

/// Y axis bounds covering every curve and trend point, padded by half a kilo
/// and snapped to whole kilos
pub fn weight_axis_range(curves: &ReferenceCurves, trend: &[SeriesPoint]) -> Option<(f64, f64)> {
    let (min, max) = curves
        .values()
        .filter_map(|curve| curve.min_max_weight())
        .chain(trend.min_max_weight())
        .fold(None, |acc: Option<(f64, f64)>, (lo, hi)| match acc {
            None => Some((lo, hi)),
            Some((min, max)) => Some((min.min(lo), max.max(hi))),
        })?;

    Some(((min - 0.5).floor().max(0.0), (max + 0.5).ceil()))
}
