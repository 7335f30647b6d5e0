/*!
 * Cleaning run configuration.
 *
 * Describes a cleaning run: where the charset catalog is cached, which
 * filters run in which order, and how verbose logging is. A `Config` is plain
 * data loaded from JSON; `build_pipeline` turns it into filters.
 */

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use log::{LevelFilter, debug};
use serde::{Deserialize, Serialize};

use crate::charset::{self, CharsetCatalog, LoadedCatalog};
use crate::errors::{CatalogError, FilterError};
use crate::filters::{self, FilterItem, Pipeline, QuoteConvention};

/// Cleaning run configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Charset catalog settings
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Filter steps in the order they run
    #[serde(default = "default_pipeline")]
    pub pipeline: Vec<FilterStep>,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Charset catalog cache settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CatalogConfig {
    /// Snapshot location; the per-user cache directory when unset
    #[serde(default)]
    pub cache_path: Option<PathBuf>,

    /// Whether to read and write the snapshot at all
    #[serde(default = "default_true")]
    pub use_cache: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            cache_path: None,
            use_cache: true,
        }
    }
}

impl CatalogConfig {
    /// Snapshot path with the default applied
    pub fn resolved_cache_path(&self) -> PathBuf {
        self.cache_path
            .clone()
            .unwrap_or_else(charset::default_cache_path)
    }

    /// Load or build the catalog according to these settings
    pub fn load(&self) -> Result<LoadedCatalog, CatalogError> {
        if self.use_cache {
            charset::load_or_build(&self.resolved_cache_path())
        } else {
            debug!("Charset cache disabled, building catalog in memory");
            Ok(LoadedCatalog::built(CharsetCatalog::build()?))
        }
    }
}

/// One filter and its parameters
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "filter", rename_all = "snake_case")]
pub enum FilterSpec {
    RemoveSmaller { min_length: usize },
    RemoveLarger { max_length: usize },
    RemoveEmpty,
    UnescapeHtml,
    UnescapeStandard,
    NormalizeWhitespace,
    Replace { chars: String, replacement: char },
    NormalizeQuotation { convention: QuoteConvention },
    RemoveMarkup,
    RemoveNonText { min_token_length: f64, max_token_length: f64 },
    RemoveOnWordcount { min_wordcount: usize, max_wordcount: usize },
    RemoveOnSourceTargetRatio { max_ratio: f64 },
}

impl FilterSpec {
    // @returns: Short stage label used in logs and statistics
    pub fn label(&self) -> String {
        match self {
            Self::RemoveSmaller { min_length } => format!("remove_smaller({})", min_length),
            Self::RemoveLarger { max_length } => format!("remove_larger({})", max_length),
            Self::RemoveEmpty => "remove_empty".to_string(),
            Self::UnescapeHtml => "unescape_html".to_string(),
            Self::UnescapeStandard => "unescape_standard".to_string(),
            Self::NormalizeWhitespace => "normalize_whitespace".to_string(),
            Self::Replace { chars, replacement } => {
                format!("replace({:?} -> {:?})", chars, replacement)
            }
            Self::NormalizeQuotation { convention } => {
                format!("normalize_quotation({:?})", convention)
            }
            Self::RemoveMarkup => "remove_markup".to_string(),
            Self::RemoveNonText {
                min_token_length,
                max_token_length,
            } => format!("remove_non_text({}, {})", min_token_length, max_token_length),
            Self::RemoveOnWordcount {
                min_wordcount,
                max_wordcount,
            } => format!("remove_on_wordcount({}, {})", min_wordcount, max_wordcount),
            Self::RemoveOnSourceTargetRatio { max_ratio } => {
                format!("remove_on_source_target_ratio({})", max_ratio)
            }
        }
    }

    // @returns: Human readable description of what the filter does
    pub fn describe(&self) -> String {
        match self {
            Self::RemoveSmaller { min_length } => {
                format!("Remove all entries shorter than {} characters", min_length)
            }
            Self::RemoveLarger { max_length } => {
                format!("Remove all entries longer than {} characters", max_length)
            }
            Self::RemoveEmpty => "Remove all empty entries".to_string(),
            Self::UnescapeHtml => {
                "Replace HTML escape sequences with their Unicode values".to_string()
            }
            Self::UnescapeStandard => {
                "Replace standard C-style escape codes with their Unicode values".to_string()
            }
            Self::NormalizeWhitespace => {
                "Replace every run of Unicode whitespace with a single space".to_string()
            }
            Self::Replace { chars, replacement } => format!(
                "Replace the characters {:?} with {:?}",
                chars, replacement
            ),
            Self::NormalizeQuotation { convention } => format!(
                "Replace quotation marks with {:?} and {:?}",
                convention.single_glyph(),
                convention.double_glyph()
            ),
            Self::RemoveMarkup => {
                "Remove all XML markup in the text (including HTML markup)".to_string()
            }
            Self::RemoveNonText {
                min_token_length,
                max_token_length,
            } => format!(
                "Remove segments whose average token length is outside {}..={}",
                min_token_length, max_token_length
            ),
            Self::RemoveOnWordcount {
                min_wordcount,
                max_wordcount,
            } => format!(
                "Remove segments with less than {} or more than {} tokens",
                min_wordcount, max_wordcount
            ),
            Self::RemoveOnSourceTargetRatio { max_ratio } => format!(
                "Remove units whose source/target character ratio exceeds {}",
                max_ratio
            ),
        }
    }

    /// Whether the filter needs both sides at once
    pub fn is_paired(&self) -> bool {
        matches!(self, Self::RemoveOnSourceTargetRatio { .. })
    }

    /// Construct the filter
    pub fn build(&self, catalog: &Arc<CharsetCatalog>) -> Result<FilterItem, FilterError> {
        let single = match self {
            Self::RemoveOnSourceTargetRatio { max_ratio } => {
                return Ok(FilterItem::paired(filters::remove_on_source_target_ratio(
                    *max_ratio,
                )?));
            }
            Self::RemoveSmaller { min_length } => filters::remove_smaller(*min_length)?,
            Self::RemoveLarger { max_length } => filters::remove_larger(*max_length)?,
            Self::RemoveEmpty => filters::remove_empty(),
            Self::UnescapeHtml => filters::unescape_html(),
            Self::UnescapeStandard => filters::unescape_standard(catalog),
            Self::NormalizeWhitespace => filters::normalize_whitespace(catalog),
            Self::Replace { chars, replacement } => filters::replace(chars.chars(), *replacement)?,
            Self::NormalizeQuotation { convention } => {
                filters::normalize_quotation(catalog, *convention)?
            }
            Self::RemoveMarkup => filters::remove_markup(),
            Self::RemoveNonText {
                min_token_length,
                max_token_length,
            } => filters::remove_non_text(*min_token_length, *max_token_length)?,
            Self::RemoveOnWordcount {
                min_wordcount,
                max_wordcount,
            } => filters::remove_on_wordcount(*min_wordcount, *max_wordcount)?,
        };
        Ok(FilterItem::single(single))
    }
}

/// A pipeline step: one filter for both sides, or one filter per side
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum FilterStep {
    PerSide { source: FilterSpec, target: FilterSpec },
    Both(FilterSpec),
}

impl FilterStep {
    pub fn label(&self) -> String {
        match self {
            Self::PerSide { source, target } => {
                format!("{} | {}", source.label(), target.label())
            }
            Self::Both(spec) => spec.label(),
        }
    }

    pub fn build(&self, catalog: &Arc<CharsetCatalog>) -> Result<FilterItem, FilterError> {
        self.check_shape()?;
        match self {
            Self::Both(spec) => spec.build(catalog),
            Self::PerSide { source, target } => match (source.build(catalog)?, target.build(catalog)?) {
                (FilterItem::Single(source), FilterItem::Single(target)) => {
                    Ok(FilterItem::per_side(source, target))
                }
                (source, target) => Err(FilterError::invalid(format!(
                    "per-side step '{}' built {} and {} filters",
                    self.label(),
                    source.shape(),
                    target.shape()
                ))),
            },
        }
    }

    /// A per-side step only holds filters that work on one text
    fn check_shape(&self) -> Result<(), FilterError> {
        match self {
            Self::PerSide { source, target } if source.is_paired() || target.is_paired() => {
                Err(FilterError::invalid(format!(
                    "per-side step '{}' cannot hold a paired filter",
                    self.label()
                )))
            }
            _ => Ok(()),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn default_true() -> bool {
    true
}

// Thresholds measured on English/Swedish corpora: a mean token length of 25
// sits about 3.5 standard deviations above the mean in both languages and
// removes URLs and similar noise.
fn default_pipeline() -> Vec<FilterStep> {
    vec![
        FilterStep::Both(FilterSpec::UnescapeHtml),
        FilterStep::Both(FilterSpec::UnescapeStandard),
        FilterStep::Both(FilterSpec::NormalizeWhitespace),
        FilterStep::PerSide {
            source: FilterSpec::NormalizeQuotation {
                convention: QuoteConvention::English,
            },
            target: FilterSpec::NormalizeQuotation {
                convention: QuoteConvention::Swedish,
            },
        },
        FilterStep::Both(FilterSpec::RemoveMarkup),
        FilterStep::Both(FilterSpec::RemoveNonText {
            min_token_length: 2.0,
            max_token_length: 25.0,
        }),
        FilterStep::Both(FilterSpec::RemoveOnWordcount {
            min_wordcount: 3,
            max_wordcount: 100,
        }),
        FilterStep::Both(FilterSpec::RemoveOnSourceTargetRatio { max_ratio: 2.0 }),
        FilterStep::Both(FilterSpec::RemoveEmpty),
    ]
}

impl Config {
    /// Load a configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .context(format!("Failed to open config file: {}", path.display()))?;

        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Parse a configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse config JSON")
    }

    /// Write the configuration as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        std::fs::write(path, config_json)
            .context(format!("Failed to write config to file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the configuration for consistency and usable filter parameters
    pub fn validate(&self) -> Result<()> {
        if self.pipeline.is_empty() {
            return Err(anyhow!("Pipeline must contain at least one filter step"));
        }

        for (index, step) in self.pipeline.iter().enumerate() {
            step.check_shape()
                .context(format!("Invalid pipeline step {}", index + 1))?;
            let specs: Vec<&FilterSpec> = match step {
                FilterStep::PerSide { source, target } => vec![source, target],
                FilterStep::Both(spec) => vec![spec],
            };
            for spec in specs {
                check_parameters(spec)
                    .context(format!("Invalid pipeline step {} ({})", index + 1, step.label()))?;
            }
        }

        Ok(())
    }

    /// Assemble the configured filters into a pipeline
    pub fn build_pipeline(&self, catalog: &Arc<CharsetCatalog>) -> Result<Pipeline> {
        let mut pipeline = Pipeline::new();
        for (index, step) in self.pipeline.iter().enumerate() {
            let item = step
                .build(catalog)
                .context(format!("Failed to build pipeline step {}", index + 1))?;
            pipeline.push(step.label(), item);
        }

        debug!(
            "Assembled pipeline: {}",
            pipeline.labels().collect::<Vec<_>>().join(" -> ")
        );
        Ok(pipeline)
    }
}

/// Same checks the filter factories run, without needing a catalog
fn check_parameters(spec: &FilterSpec) -> Result<(), FilterError> {
    match spec {
        FilterSpec::RemoveSmaller { min_length } => filters::remove_smaller(*min_length).map(drop),
        FilterSpec::RemoveLarger { max_length } => filters::remove_larger(*max_length).map(drop),
        FilterSpec::Replace { chars, replacement } => {
            filters::replace(chars.chars(), *replacement).map(drop)
        }
        FilterSpec::RemoveNonText {
            min_token_length,
            max_token_length,
        } => filters::remove_non_text(*min_token_length, *max_token_length).map(drop),
        FilterSpec::RemoveOnWordcount {
            min_wordcount,
            max_wordcount,
        } => filters::remove_on_wordcount(*min_wordcount, *max_wordcount).map(drop),
        FilterSpec::RemoveOnSourceTargetRatio { max_ratio } => {
            filters::remove_on_source_target_ratio(*max_ratio).map(drop)
        }
        FilterSpec::RemoveEmpty
        | FilterSpec::UnescapeHtml
        | FilterSpec::UnescapeStandard
        | FilterSpec::NormalizeWhitespace
        | FilterSpec::NormalizeQuotation { .. }
        | FilterSpec::RemoveMarkup => Ok(()),
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            catalog: CatalogConfig::default(),
            pipeline: default_pipeline(),
            log_level: LogLevel::default(),
        }
    }
}
