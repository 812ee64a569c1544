//! Renderers from flat records or suite trees to export byte streams.
//!
//! - [`columns`] - Zentao CSV rows, from flat records
//! - [`testlink`] - TestLink XML hierarchy, from a suite tree
//! - [`outline`] - outline document container, from a suite tree
//!
//! Empty input renders a minimal valid document. The only errors are failures to write
//! the output stream.

pub mod columns;
pub mod outline;
pub mod testlink;
