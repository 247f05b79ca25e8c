//! Library components of the `rowscan` command-line tool.

pub mod logging;
pub mod pipeline;
