//! # folio
//!
//! Reconciliation of archived UBL invoice and credit note bundles:
//! completeness and uniqueness of the issued number sequence per series, and
//! linking of full-cancellation credit notes to the invoices they void.
//!
//! ## Quick Start
//!
//! ```rust
//! use folio::core::*;
//!
//! let names = [
//!     "A1",
//!     "FACTURAE001-120501234567.zip",
//!     "FACTURAE001-220501234567.zip",
//!     "FACTURAE001-220501234567.zip",
//! ];
//! let decoded: Vec<_> = names.iter().map(|n| decode_archive_name(n)).collect();
//! let run = reconcile(&decoded, 1128);
//!
//! let e001 = run.summary_for("E001").unwrap();
//! assert_eq!((e001.min_number, e001.max_number), (Some(1), Some(2)));
//! assert_eq!(e001.unique_count, 2);
//! assert_eq!(e001.duplicate_count, 1);
//! assert_eq!(e001.missing_count, 0);
//! assert_eq!(e001.unparseable, 1);
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Archive-name decoding, sequence reconciliation, invalidation linking |
//! | `ubl` | UBL 2.1 header and line extraction |
//! | `archive` | ZIP bundle reading |
//! | `report` | Report tables and CSV output |
//! | `pipeline` | Whole-run orchestration |
//! | `cli` | The `folio` binary |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "ubl")]
pub mod ubl;

#[cfg(feature = "archive")]
pub mod archive;

#[cfg(feature = "report")]
pub mod report;

#[cfg(feature = "pipeline")]
pub mod pipeline;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
