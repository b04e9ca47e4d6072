use crate::error::Result;
use crate::record::parse_record;
use crate::types::{DecodedTable, Diagnostics, RawRecord, SkipReason};
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    /// Data lines seen after the header, blank lines excluded.
    pub total_rows: usize,
    pub kept_rows: usize,
    pub diagnostics: Diagnostics,
}

/// Read a raw export from disk. The text is decoded separately so a cache
/// can sit between reading and parsing.
pub fn read_blob<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    debug!(path = %path.display(), bytes = text.len(), "read blob");
    Ok(text)
}

/// Decode a whole text blob into a header and keyed records.
///
/// Blank lines are ignored. Rows whose field count differs from the header
/// are dropped and recorded; nothing here fails. An empty blob (or one whose
/// header is entirely blank) yields an empty table.
pub fn decode_table(blob: &str) -> (DecodedTable, LoadReport) {
    let mut report = LoadReport::default();
    let mut lines = blob
        .lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty());

    let Some((_, header_line)) = lines.next() else {
        return (DecodedTable::default(), report);
    };
    let headers = parse_record(header_line);
    if headers.iter().all(|h| h.is_empty()) {
        return (DecodedTable::default(), report);
    }

    let mut records = Vec::new();
    for (idx, line) in lines {
        report.total_rows += 1;
        let values = parse_record(line);
        if values.len() != headers.len() {
            warn!(
                line = idx + 1,
                expected = headers.len(),
                found = values.len(),
                "dropping row with mismatched field count"
            );
            report.diagnostics.record(SkipReason::FieldCountMismatch {
                line: idx + 1,
                expected: headers.len(),
                found: values.len(),
            });
            continue;
        }
        records.push(RawRecord::from_fields(&headers, values));
    }

    report.kept_rows = records.len();
    debug!(
        columns = headers.len(),
        kept = report.kept_rows,
        dropped = report.diagnostics.dropped_rows,
        "decoded table"
    );
    (DecodedTable { headers, records }, report)
}
