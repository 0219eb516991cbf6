// src/reader/csv.rs

const DEFAULT_DELIMITER: char = ';';

/// Delimiter from configuration: must be exactly one character, anything
/// else falls back to the default.
pub fn delimiter_or_default(configured: Option<&str>) -> char {
    match configured {
        Some(value) if value.chars().count() == 1 => value.chars().next().unwrap(),
        _ => DEFAULT_DELIMITER,
    }
}

/// Parse delimited rows. Fields may be quoted with `"`, doubled quotes
/// inside a quoted field escape a literal quote, and quoted fields may
/// span lines.
pub fn parse(data: &str, delimiter: char) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;

    let mut chars = data.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
            continue;
        }

        match c {
            '"' => in_quotes = true,
            '\r' => {}
            '\n' => {
                if !record.is_empty() || !field.is_empty() {
                    record.push(std::mem::take(&mut field));
                    rows.push(std::mem::take(&mut record));
                }
            }
            c if c == delimiter => record.push(std::mem::take(&mut field)),
            c => field.push(c),
        }
    }

    if !record.is_empty() || !field.is_empty() {
        record.push(field);
        rows.push(record);
    }

    rows
}
