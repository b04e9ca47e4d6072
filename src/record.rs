// Single-line delimited record parsing.
//
// Quotes toggle the quoted state and are dropped from the output; a
// delimiter inside quotes is literal. Unbalanced quotes are tolerated: the
// line just ends in whatever state it reached.

pub const DELIMITER: char = ',';
const QUOTE: char = '"';

/// Split one line into trimmed fields. The trailing field is always emitted,
/// so `""` yields one empty field and `"a,"` yields `["a", ""]`.
pub fn parse_record(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in line.chars() {
        match c {
            QUOTE => in_quotes = !in_quotes,
            DELIMITER if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    fields.push(current.trim().to_string());
    fields
}

/// Inverse of [`parse_record`] for well-formed fields: any field containing
/// the delimiter is wrapped in quotes.
pub fn join_record<S: AsRef<str>>(fields: &[S]) -> String {
    fields
        .iter()
        .map(|f| {
            let f = f.as_ref();
            if f.contains(DELIMITER) {
                format!("{QUOTE}{f}{QUOTE}")
            } else {
                f.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(&DELIMITER.to_string())
}
