//! Quote-aware splitting of a single line into trimmed fields.

/// Split `line` on `delimiter`, honouring `"` quoting.
///
/// Inside quotes a doubled `""` yields one literal quote. An unterminated
/// quote is not an error: the rest of the line lands in the last field.
/// Every field is trimmed, and there is always at least one field.
pub fn split_line(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '"' {
            if in_quotes && chars.peek() == Some(&'"') {
                current.push('"');
                chars.next();
            } else {
                in_quotes = !in_quotes;
            }
        } else if ch == delimiter && !in_quotes {
            fields.push(current.trim().to_string());
            current.clear();
        } else {
            current.push(ch);
        }
    }
    fields.push(current.trim().to_string());

    fields
}
