pub mod scoring;
pub mod view;

pub use scoring::{evaluate, score, score_record, CriteriaOutcome, Criterion};
pub use view::{build_view, sort_records, ScreenView, SortSpec, ViewRow};
