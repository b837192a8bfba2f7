pub mod dataset;
pub mod job;
pub mod structure;
pub mod suggestion;

pub use dataset::CsvDataset;
pub use job::{CANCELLED_MARKER, ImportJob, ImportMode, JobStatus};
pub use structure::{
    ActivityGroup, GeneratedStructure, WheelItem, WheelLabel, WheelRing, YearPage,
};
pub use suggestion::{
    ActivitySuggestion, ColumnMapping, GroupSuggestion, LabelSuggestion, MappingSuggestion,
    RingKind, RingSuggestion, SuitabilityWarning, WarningSeverity,
};
