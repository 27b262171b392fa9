//! Report tables for one run.
//!
//! [`assemble`] projects the reconciliation, the linked document headers and
//! the contained failures into flat rows with a fixed column order;
//! [`write_csv_reports`] writes them out. The produced files are:
//!
//! | File | Rows |
//! |------|------|
//! | `control_summary.csv` | one per series |
//! | `missing.csv` | numbers absent from a series range |
//! | `duplicates.csv` | duplicate occurrences and unparseable names |
//! | `invalidations.csv` | full-cancellation credit notes |
//! | `documents.csv` | every extracted document header |
//! | `line_items.csv` | every extracted line |
//! | `errors.csv` | archive and document failures |

mod assemble;
mod csv_export;

pub use assemble::*;
pub use csv_export::{ReportPaths, write_csv_reports};
