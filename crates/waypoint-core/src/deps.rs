//! Static dependency graph of the pipeline.
//!
//! `DEPENDENCIES` is the single declaration of which upstream output each
//! step consumes for a given input slot. The resolver, the preflight checker,
//! and the CLI all read it from here; it is maintained by hand whenever a
//! step's inputs change.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::error::Error;
use crate::id::StepId;

/// One edge: `consumer.input` is satisfied by `producer:output`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dependency {
    pub consumer: StepId,
    pub input: &'static str,
    pub producer: StepId,
    pub output: &'static str,
}

impl Dependency {
    pub fn source(&self) -> SourceRef {
        SourceRef {
            step: self.producer,
            output: self.output.to_string(),
        }
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{} -> {}:{}",
            self.consumer, self.input, self.producer, self.output
        )
    }
}

/// `stepN:output_key` reference to a registered output.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceRef {
    pub step: StepId,
    pub output: String,
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.step, self.output)
    }
}

impl FromStr for SourceRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (step, output) = s
            .split_once(':')
            .ok_or_else(|| Error::InvalidDependency(s.to_string()))?;
        if output.is_empty() {
            return Err(Error::InvalidDependency(s.to_string()));
        }
        let step = step
            .parse()
            .map_err(|_| Error::InvalidDependency(s.to_string()))?;
        Ok(Self {
            step,
            output: output.to_string(),
        })
    }
}

const fn dep(consumer: u16, input: &'static str, producer: u16, output: &'static str) -> Dependency {
    Dependency {
        consumer: StepId::new(consumer),
        input,
        producer: StepId::new(producer),
        output,
    }
}

pub const DEPENDENCIES: &[Dependency] = &[
    // Ingest and preparation
    dep(2, "store_config", 1, "store_config"),
    dep(3, "spu_sales", 1, "spu_sales"),
    dep(3, "category_sales", 1, "category_sales"),
    dep(3, "store_coordinates", 2, "store_coordinates"),
    dep(5, "weather_data", 4, "weather_data"),
    dep(6, "store_matrix_spu", 3, "store_matrix_spu"),
    dep(6, "store_matrix_subcategory", 3, "store_matrix_subcategory"),
    dep(6, "temperature_bands", 5, "temperature_bands"),
    // Business rules
    dep(7, "clustering_results", 6, "clustering_results"),
    dep(7, "category_sales", 1, "category_sales"),
    dep(8, "clustering_results", 6, "clustering_results"),
    dep(8, "spu_sales", 1, "spu_sales"),
    dep(9, "clustering_results", 6, "clustering_results"),
    dep(10, "clustering_results", 6, "clustering_results"),
    dep(10, "store_config", 1, "store_config"),
    dep(11, "clustering_results", 6, "clustering_results"),
    dep(11, "spu_sales", 1, "spu_sales"),
    dep(12, "clustering_results", 6, "clustering_results"),
    dep(13, "rule7_results", 7, "missing_category_results"),
    dep(13, "rule8_results", 8, "imbalanced_results"),
    dep(13, "rule9_results", 9, "below_minimum_results"),
    dep(13, "rule10_results", 10, "overcapacity_results"),
    dep(13, "rule11_results", 11, "missed_sales_results"),
    dep(13, "rule12_results", 12, "sales_performance_results"),
    // Formatting, baselines, augmentation
    dep(14, "consolidated_rules", 13, "consolidated_rules"),
    dep(15, "spu_sales", 1, "spu_sales"),
    dep(16, "historical_reference", 15, "historical_reference"),
    dep(17, "fast_fish_format", 14, "fast_fish_format"),
    dep(17, "historical_reference", 15, "historical_reference"),
    dep(17, "clustering_results", 6, "clustering_results"),
    dep(18, "augmented_recommendations", 17, "augmented_recommendations"),
    dep(19, "consolidated_rules", 13, "consolidated_rules"),
    dep(19, "sell_through_analysis", 18, "sell_through_analysis"),
    dep(20, "detailed_spu_breakdown", 19, "detailed_spu_breakdown"),
    dep(20, "consolidated_rules", 13, "consolidated_rules"),
    dep(21, "sell_through_analysis", 18, "sell_through_analysis"),
    // Enrichment and labeling
    dep(22, "store_config", 1, "store_config"),
    dep(22, "spu_sales", 1, "spu_sales"),
    dep(23, "enriched_store_attributes", 22, "enriched_store_attributes"),
    dep(24, "clustering_results", 6, "clustering_results"),
    dep(24, "enriched_store_attributes", 22, "enriched_store_attributes"),
    dep(25, "spu_sales", 1, "spu_sales"),
    dep(26, "product_role_classifications", 25, "product_role_classifications"),
    dep(27, "product_role_classifications", 25, "product_role_classifications"),
    dep(27, "cluster_labels", 24, "cluster_labels"),
    // Gap analysis, optimization, delivery
    dep(28, "gap_analysis", 27, "gap_analysis"),
    dep(28, "price_band_analysis", 26, "price_band_analysis"),
    dep(29, "gap_analysis", 27, "gap_analysis"),
    dep(30, "sell_through_analysis", 18, "sell_through_analysis"),
    dep(30, "supply_demand_gap", 29, "supply_demand_gap"),
    dep(31, "gap_analysis", 27, "gap_analysis"),
    dep(31, "cluster_labels", 24, "cluster_labels"),
    dep(32, "sell_through_analysis", 18, "sell_through_analysis"),
    dep(32, "store_config", 1, "store_config"),
    dep(33, "store_allocation", 32, "store_allocation"),
    dep(34, "store_level_plan", 33, "store_level_plan"),
    dep(34, "sell_through_analysis", 18, "sell_through_analysis"),
    dep(35, "unified_outputs", 34, "unified_outputs"),
    dep(36, "unified_outputs", 34, "unified_outputs"),
    dep(36, "merchandising_strategy", 35, "merchandising_strategy"),
    dep(36, "cluster_labels", 24, "cluster_labels"),
];

type Index = HashMap<StepId, HashMap<&'static str, &'static Dependency>>;

static INDEX: Lazy<Index> = Lazy::new(|| {
    let mut index: Index = HashMap::new();
    for d in DEPENDENCIES {
        index.entry(d.consumer).or_default().insert(d.input, d);
    }
    index
});

/// The declared source for `step.input`, if any.
pub fn lookup(step: StepId, input: &str) -> Option<&'static Dependency> {
    INDEX.get(&step).and_then(|inputs| inputs.get(input)).copied()
}

/// Declared inputs of `step`, in table order.
pub fn inputs_of(step: StepId) -> impl Iterator<Item = &'static Dependency> {
    DEPENDENCIES.iter().filter(move |d| d.consumer == step)
}

/// Edges whose producer is `step`, in table order.
pub fn consumers_of(step: StepId) -> impl Iterator<Item = &'static Dependency> {
    DEPENDENCIES.iter().filter(move |d| d.producer == step)
}
