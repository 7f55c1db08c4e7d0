//! Line-oriented reading of spreadsheet exports.
//!
//! Quotes toggle an in-quotes state and are consumed as delimiters, never
//! unescaped. Commas and newlines inside quotes are field content. Fields
//! come out trimmed.

/// Splits one logical line into trimmed fields.
pub fn parse_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    fields.push(current.trim().to_string());
    fields
}

/// Splits a whole file into logical lines. A newline inside a quoted field
/// stays part of the field; trailing carriage returns are dropped.
pub fn split_rows(text: &str) -> Vec<String> {
    let mut rows = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    for ch in text.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                current.push(ch);
            }
            '\n' if !in_quotes => {
                if current.ends_with('\r') {
                    current.pop();
                }
                rows.push(std::mem::take(&mut current));
            }
            _ => current.push(ch),
        }
    }
    if current.ends_with('\r') {
        current.pop();
    }
    rows.push(current);
    rows
}

/// Parses a full export: header line dropped, blank lines skipped, rows
/// with fewer than `min_fields` fields dropped. Returns the surviving
/// field rows and the dropped-row count.
pub fn parse_records(text: &str, min_fields: usize) -> (Vec<Vec<String>>, usize) {
    let mut records = Vec::new();
    let mut dropped = 0usize;
    for (i, line) in split_rows(text).into_iter().enumerate() {
        if i == 0 || line.trim().is_empty() {
            continue;
        }
        let fields = parse_line(&line);
        if fields.len() < min_fields {
            dropped += 1;
            continue;
        }
        records.push(fields);
    }
    (records, dropped)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
