/*!
 * Filter composition.
 *
 * Every stage either hands a value to the next one or stops the chain with
 * `None`; later stages never run after a rejection. The shape of each stage
 * is fixed when it is added, through the `FilterItem` constructors.
 */

use std::fmt;
use std::sync::Arc;

use super::{PairedFilter, SingleFilter, TextUnit};

/// Chain single-text filters left to right.
///
/// An empty chain returns its input unchanged.
pub fn compose_sequential(filters: Vec<SingleFilter>) -> SingleFilter {
    Arc::new(move |text: String| filters.iter().try_fold(text, |text, filter| filter(text)))
}

/// Chain filter items of any shape into one unit filter.
pub fn compose_paired(items: Vec<FilterItem>) -> PairedFilter {
    Pipeline::from_items(items).into_filter()
}

/// One pipeline stage, tagged with its shape
#[derive(Clone)]
pub enum FilterItem {
    /// Separate filters for source and target
    PerSide(SingleFilter, SingleFilter),
    /// One filter over the whole unit
    Paired(PairedFilter),
    /// The same filter applied to both sides
    Single(SingleFilter),
}

impl FilterItem {
    pub fn per_side(source: SingleFilter, target: SingleFilter) -> Self {
        Self::PerSide(source, target)
    }

    pub fn paired(filter: PairedFilter) -> Self {
        Self::Paired(filter)
    }

    pub fn single(filter: SingleFilter) -> Self {
        Self::Single(filter)
    }

    /// Name of the item's shape
    pub fn shape(&self) -> &'static str {
        match self {
            Self::PerSide(..) => "per-side",
            Self::Paired(_) => "paired",
            Self::Single(_) => "single",
        }
    }

    /// Run this stage on a unit
    pub fn apply(&self, unit: TextUnit) -> Option<TextUnit> {
        match self {
            Self::PerSide(source_filter, target_filter) => {
                let (source, target) = unit.into_parts();
                let source = source_filter(source)?;
                let target = target_filter(target)?;
                Some(TextUnit::new(source, target))
            }
            Self::Paired(filter) => filter(unit),
            Self::Single(filter) => {
                let (source, target) = unit.into_parts();
                let source = filter(source)?;
                let target = filter(target)?;
                Some(TextUnit::new(source, target))
            }
        }
    }
}

impl fmt::Debug for FilterItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FilterItem::{}", self.shape())
    }
}

/// Outcome of running a unit through a pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accepted(TextUnit),
    /// Index of the first stage that rejected the unit
    Rejected { stage: usize },
}

impl Verdict {
    pub fn into_unit(self) -> Option<TextUnit> {
        match self {
            Self::Accepted(unit) => Some(unit),
            Self::Rejected { .. } => None,
        }
    }
}

#[derive(Debug, Clone)]
struct Stage {
    label: String,
    item: FilterItem,
}

/// Ordered, labeled list of filter items
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pipeline with generated stage labels
    pub fn from_items(items: Vec<FilterItem>) -> Self {
        let mut pipeline = Self::new();
        for (index, item) in items.into_iter().enumerate() {
            let label = format!("stage {} ({})", index + 1, item.shape());
            pipeline.push(label, item);
        }
        pipeline
    }

    /// Append a stage
    pub fn push(&mut self, label: impl Into<String>, item: FilterItem) -> &mut Self {
        self.stages.push(Stage {
            label: label.into(),
            item,
        });
        self
    }

    /// Append a filter applied to both sides
    pub fn single(mut self, label: impl Into<String>, filter: SingleFilter) -> Self {
        self.push(label, FilterItem::single(filter));
        self
    }

    /// Append a filter over the whole unit
    pub fn paired(mut self, label: impl Into<String>, filter: PairedFilter) -> Self {
        self.push(label, FilterItem::paired(filter));
        self
    }

    /// Append separate source and target filters
    pub fn per_side(
        mut self,
        label: impl Into<String>,
        source: SingleFilter,
        target: SingleFilter,
    ) -> Self {
        self.push(label, FilterItem::per_side(source, target));
        self
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Label of the stage at `index`
    pub fn label(&self, index: usize) -> Option<&str> {
        self.stages.get(index).map(|stage| stage.label.as_str())
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.stages.iter().map(|stage| stage.label.as_str())
    }

    /// Run a unit through every stage, stopping at the first rejection
    pub fn evaluate(&self, unit: TextUnit) -> Verdict {
        let mut current = unit;
        for (index, stage) in self.stages.iter().enumerate() {
            match stage.item.apply(current) {
                Some(next) => current = next,
                None => return Verdict::Rejected { stage: index },
            }
        }
        Verdict::Accepted(current)
    }

    pub fn apply(&self, unit: TextUnit) -> Option<TextUnit> {
        self.evaluate(unit).into_unit()
    }

    /// Turn the pipeline into a plain unit filter
    pub fn into_filter(self) -> PairedFilter {
        Arc::new(move |unit: TextUnit| self.apply(unit))
    }
}
