/*!
 * # tmclean - Translation memory cleaning
 *
 * A Rust library for cleaning bilingual translation memories (aligned
 * source/target segments) before they are used to train or evaluate
 * machine translation systems.
 *
 * ## Features
 *
 * - Composable filters that either rewrite a segment or reject it
 * - Single-text, paired and per-side filter shapes in one pipeline
 * - HTML entity and C-style escape decoding
 * - Unicode aware whitespace and quotation mark normalization
 * - Length, word count, token length and source/target ratio checks
 * - Cached Unicode charset catalog shared by all filters
 * - Configurable pipelines with per-stage rejection statistics
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `charset`: Unicode category catalog, escape table and snapshot cache:
 *   - `charset::escapes`: Escape rules and their substitution
 *   - `charset::cache`: Load-or-build with an on-disk snapshot
 * - `filters`: Filter types and factories:
 *   - `filters::compose`: Sequential and paired composition, pipelines
 *   - `filters::bounds`: Rejection filters
 *   - `filters::normalize`: Rewriting filters
 * - `app_config`: Configuration management
 * - `corpus`: Running a pipeline over a whole corpus
 * - `errors`: Custom error types for the library
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod charset;
pub mod corpus;
pub mod errors;
pub mod filters;

// Re-export main types for easier usage
pub use app_config::{Config, FilterSpec, FilterStep};
pub use charset::{CatalogOrigin, CharsetCatalog, LoadedCatalog};
pub use corpus::{CleanOptions, CleanedCorpus, CleaningStats, clean_units, clean_units_parallel};
pub use errors::{CatalogError, FilterError};
pub use filters::{
    FilterItem, PairedFilter, Pipeline, SingleFilter, TextUnit, Verdict, compose_paired,
    compose_sequential,
};
