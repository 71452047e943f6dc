//! Result page decoding and statistics extraction.
//!
//! Both functions are pure: the same raw input always yields the same output.

use crate::engine::{RawStatistics, ResultPage};

use super::{Column, QueryStatistics, Row};

/// A decoded result page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPage {
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
}

/// Decodes one raw page into columns and rows.
///
/// A leading row whose cells repeat the column names is treated as the
/// header and dropped. Cells are matched to columns by position; a missing
/// cell or a cell without a value decodes to null. At most `max_rows` rows
/// are returned.
pub fn decode_page(page: &ResultPage, max_rows: usize) -> DecodedPage {
    let columns = page.columns.clone();

    let skip = match page.rows.first() {
        Some(first) if is_header_row(&first.cells, &columns) => 1,
        _ => 0,
    };

    let rows = page
        .rows
        .iter()
        .skip(skip)
        .take(max_rows)
        .map(|raw| {
            columns
                .iter()
                .enumerate()
                .map(|(i, col)| (col.name.as_str(), raw.cells.get(i).cloned().flatten()))
                .collect::<Row>()
        })
        .collect();

    DecodedPage { columns, rows }
}

fn is_header_row(cells: &[Option<String>], columns: &[Column]) -> bool {
    !columns.is_empty()
        && cells.len() == columns.len()
        && cells
            .iter()
            .zip(columns)
            .all(|(cell, col)| cell.as_deref() == Some(col.name.as_str()))
}

/// Maps the engine's statistics block, field by field.
///
/// No block in, no block out: absence is never turned into an all-null record.
pub fn extract_statistics(raw: Option<&RawStatistics>) -> Option<QueryStatistics> {
    raw.map(|stats| QueryStatistics {
        processing_time_ms: stats.total_execution_time_ms,
        data_scanned_bytes: stats.data_scanned_bytes,
        engine_execution_time_ms: stats.engine_execution_time_ms,
        query_queue_time_ms: stats.query_queue_time_ms,
        service_processing_time_ms: stats.service_processing_time_ms,
    })
}
