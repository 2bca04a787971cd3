//! File adapters.
//!
//! The engine itself performs no I/O. These adapters load the ten source
//! tables from CSV exports into a [`SourceBundle`](crate::models::SourceBundle)
//! and persist the [`OutputTable`](crate::models::OutputTable) with its
//! headers in the fixed order.

mod csv_output;
mod csv_source;

pub use csv_output::{default_output_path, write_output};
pub use csv_source::{SEARCH_SUBDIRS, find_source_file, load_sources, load_table};
