//! Built-in column set for a query plan cache.

use super::format::{BytesFormat, CountFormat, MillisFormat, TextFormat, Thresholds};
use super::{ColumnDescriptor, ColumnSet, ColumnWidth};
use crate::core::errors::Result;

pub const DATABASE: &str = "database";
pub const EXECUTIONS: &str = "executions";
pub const ROWS: &str = "rows";
pub const EXEC_TIME: &str = "exec_time";
pub const MEMORY: &str = "memory";
pub const QUERY: &str = "query";

/// Plan-cache columns: per-second execution and row rates, average execution
/// time, memory use and the parameterized query text.
///
/// Sorted by executions by default, execution time as the alternate, and the
/// query text identifies a row on selection.
pub fn default_columns() -> Result<ColumnSet> {
    let columns = vec![
        ColumnDescriptor::new(DATABASE, "DATABASE", 'D', ColumnWidth::Fixed(14), TextFormat),
        ColumnDescriptor::new(
            EXECUTIONS,
            "EXECS/S",
            'E',
            ColumnWidth::Fixed(8),
            CountFormat {
                thresholds: Thresholds::new(1.0, 100.0, 1_000.0, 10_000.0),
            },
        ),
        ColumnDescriptor::new(
            ROWS,
            "ROWS/S",
            'R',
            ColumnWidth::Fixed(8),
            CountFormat {
                thresholds: Thresholds::new(1.0, 10_000.0, 100_000.0, 1_000_000.0),
            },
        ),
        ColumnDescriptor::new(
            EXEC_TIME,
            "AVG TIME",
            'T',
            ColumnWidth::Fixed(9),
            MillisFormat {
                thresholds: Thresholds::new(1.0, 50.0, 500.0, 5_000.0),
            },
        ),
        ColumnDescriptor::new(
            MEMORY,
            "MEMORY",
            'M',
            ColumnWidth::Fixed(9),
            BytesFormat {
                thresholds: Thresholds::new(
                    1_048_576.0,
                    67_108_864.0,
                    536_870_912.0,
                    4_294_967_296.0,
                ),
            },
        ),
        ColumnDescriptor::new(QUERY, "QUERY", 'Q', ColumnWidth::Weight(1), TextFormat),
    ];
    ColumnSet::new(columns, EXECUTIONS, EXEC_TIME, QUERY)
}
