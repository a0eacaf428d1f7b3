//! Delimiter detection for the header line.

pub const COMMA: char = ',';
pub const SEMICOLON: char = ';';

/// Pick the delimiter for a whole document from its header line.
///
/// Semicolon wins only when it strictly outnumbers commas; quoting is not
/// taken into account.
pub fn detect_delimiter(header_line: &str) -> char {
    let semicolons = header_line.matches(SEMICOLON).count();
    let commas = header_line.matches(COMMA).count();
    if semicolons > commas {
        SEMICOLON
    } else {
        COMMA
    }
}
