pub mod aggregator;
pub mod diagnostics;
pub mod report;
pub mod run;
pub mod source_file;

pub use aggregator::{AggregationEntry, AggregationKey, Aggregator};
pub use diagnostics::Diagnostics;
pub use report::{build_table, ReportTable, TableOptions};
pub use run::{run, RunError, RunOptions, RunOutcome, RunStatus};
pub use source_file::{select_files, SourceFile};
