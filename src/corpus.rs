/*!
 * Corpus-level cleaning.
 *
 * Runs a `Pipeline` over a whole sequence of units and keeps track of which
 * stage rejected what. Accepted units keep their input order; with
 * deduplication enabled only the first copy of an accepted unit is kept.
 */

use std::collections::HashSet;

use log::{debug, info};
use rayon::prelude::*;

use crate::filters::{Pipeline, TextUnit, Verdict};

/// Options for a cleaning run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanOptions {
    /// Keep only the first copy of identical accepted units
    pub deduplicate: bool,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self { deduplicate: true }
    }
}

/// Rejections attributed to one pipeline stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageRejections {
    pub label: String,
    pub count: usize,
}

/// Cleaning run statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleaningStats {
    pub total: usize,
    pub accepted: usize,
    pub duplicates: usize,
    /// One entry per pipeline stage, in pipeline order
    pub rejected_by_stage: Vec<StageRejections>,
}

impl CleaningStats {
    fn for_pipeline(pipeline: &Pipeline) -> Self {
        Self {
            rejected_by_stage: pipeline
                .labels()
                .map(|label| StageRejections {
                    label: label.to_string(),
                    count: 0,
                })
                .collect(),
            ..Self::default()
        }
    }

    /// Units rejected by any stage
    pub fn rejected(&self) -> usize {
        self.rejected_by_stage.iter().map(|stage| stage.count).sum()
    }

    /// Percentage of input units that ended up in the output
    pub fn acceptance_rate(&self) -> f64 {
        if self.total > 0 {
            (self.accepted as f64 / self.total as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Result of a cleaning run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanedCorpus {
    pub units: Vec<TextUnit>,
    pub stats: CleaningStats,
}

impl CleanedCorpus {
    /// Split the accepted units into source and target columns
    pub fn into_columns(self) -> (Vec<String>, Vec<String>) {
        split_columns(self.units)
    }
}

/// Run every unit through the pipeline
pub fn clean_units<I>(pipeline: &Pipeline, units: I, options: CleanOptions) -> CleanedCorpus
where
    I: IntoIterator<Item = TextUnit>,
{
    let mut stats = CleaningStats::for_pipeline(pipeline);
    let mut seen: HashSet<TextUnit> = HashSet::new();
    let mut accepted = Vec::new();

    for unit in units {
        stats.total += 1;
        match pipeline.evaluate(unit) {
            Verdict::Accepted(unit) => {
                if options.deduplicate && !seen.insert(unit.clone()) {
                    stats.duplicates += 1;
                    continue;
                }
                accepted.push(unit);
            }
            Verdict::Rejected { stage } => {
                if let Some(entry) = stats.rejected_by_stage.get_mut(stage) {
                    entry.count += 1;
                }
            }
        }
    }
    stats.accepted = accepted.len();

    log_stats(&stats);
    CleanedCorpus {
        units: accepted,
        stats,
    }
}

/// Evaluate units in parallel, one result per input in input order
pub fn clean_units_parallel(pipeline: &Pipeline, units: Vec<TextUnit>) -> Vec<Option<TextUnit>> {
    debug!("Cleaning {} units in parallel", units.len());
    units
        .into_par_iter()
        .map(|unit| pipeline.apply(unit))
        .collect()
}

/// Flatten units into a source column and a target column
pub fn split_columns<I>(units: I) -> (Vec<String>, Vec<String>)
where
    I: IntoIterator<Item = TextUnit>,
{
    units.into_iter().map(TextUnit::into_parts).unzip()
}

fn log_stats(stats: &CleaningStats) {
    info!(
        "Cleaned {} units: {} accepted ({:.1}%), {} rejected, {} duplicates",
        stats.total,
        stats.accepted,
        stats.acceptance_rate(),
        stats.rejected(),
        stats.duplicates
    );
    for stage in stats.rejected_by_stage.iter().filter(|stage| stage.count > 0) {
        debug!("  {}: rejected {}", stage.label, stage.count);
    }
}
