//! Structure builder for wheel imports.
//!
//! Consumes a reviewed mapping suggestion plus the operator's overrides and
//! produces the finalized, ID-assigned structure with per-year pages, along
//! with a report of everything that was rerouted, unresolved or excluded.

pub mod builder;
pub mod pages;

mod palette;

pub use builder::{
    BuildOptions, BuildReport, ReferenceKind, UnresolvedReference, build_structure,
};
pub use pages::{parse_year, partition_pages};
