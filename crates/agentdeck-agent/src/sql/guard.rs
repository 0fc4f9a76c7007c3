//! Read-only allow-list for model-written SQL.
//!
//! A query passes when it is a single statement starting with `SELECT`, `WITH`,
//! `EXPLAIN` or `VALUES` and mentions no data-modifying, schema or session
//! keyword outside string literals, quoted identifiers and comments.

use thiserror::Error;

const ALLOWED_LEADING: &[&str] = &["SELECT", "WITH", "EXPLAIN", "VALUES"];

const FORBIDDEN: &[&str] = &[
    "INSERT", "UPDATE", "DELETE", "REPLACE", "MERGE", "UPSERT", "DROP", "CREATE", "ALTER",
    "TRUNCATE", "ATTACH", "DETACH", "PRAGMA", "VACUUM", "REINDEX", "ANALYZE", "GRANT", "REVOKE",
    "BEGIN", "COMMIT", "ROLLBACK", "SAVEPOINT", "RELEASE",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuardError {
    #[error("query is empty")]
    Empty,
    #[error("only a single statement is allowed")]
    MultipleStatements,
    #[error("query must start with SELECT, WITH, EXPLAIN or VALUES (found `{0}`)")]
    NotReadOnly(String),
    #[error("keyword `{0}` is not allowed")]
    ForbiddenKeyword(String),
    #[error("unterminated literal or comment")]
    Unterminated,
}

/// Check `sql` and return the statement trimmed, without the terminating
/// semicolon and anything (comments, whitespace) after it.
pub fn ensure_read_only(sql: &str) -> Result<&str, GuardError> {
    let trimmed = sql.trim().trim_end_matches(|c: char| c == ';' || c.is_whitespace());
    let Scan { words, end } = scan_words(trimmed)?;
    let statement = trimmed[..end].trim_end();
    if statement.is_empty() {
        return Err(GuardError::Empty);
    }

    let Some((first, _)) = words.first() else {
        return Err(GuardError::NotReadOnly(String::new()));
    };
    if !ALLOWED_LEADING.contains(&first.as_str()) {
        return Err(GuardError::NotReadOnly(first.clone()));
    }
    // A keyword directly followed by `(` is a function call, e.g. replace(a, b, c).
    if let Some((word, _)) = words
        .iter()
        .find(|(word, is_call)| !is_call && FORBIDDEN.contains(&word.as_str()))
    {
        return Err(GuardError::ForbiddenKeyword(word.clone()));
    }
    Ok(statement)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    Code,
    Quoted(char),
    LineComment,
    BlockComment,
}

struct Scan {
    /// Bare words (uppercased) outside literals and comments, flagged when
    /// used as function calls.
    words: Vec<(String, bool)>,
    /// Byte offset where the statement ends: its first `;`, or the input length.
    end: usize,
}

/// Tokenise `sql` far enough to find its words and where the statement ends.
/// After a `;` only whitespace, comments and further semicolons may follow.
fn scan_words(sql: &str) -> Result<Scan, GuardError> {
    let chars: Vec<(usize, char)> = sql.char_indices().collect();
    let mut words = Vec::new();
    let mut end = None;
    let mut mode = Mode::Code;
    let mut i = 0;

    while i < chars.len() {
        let (offset, c) = chars[i];
        let next = chars.get(i + 1).map(|&(_, c)| c);
        match mode {
            Mode::Code => match c {
                '-' if next == Some('-') => {
                    mode = Mode::LineComment;
                    i += 1;
                }
                '/' if next == Some('*') => {
                    mode = Mode::BlockComment;
                    i += 1;
                }
                ';' => {
                    end.get_or_insert(offset);
                }
                c if c.is_whitespace() => {}
                _ if end.is_some() => return Err(GuardError::MultipleStatements),
                '\'' | '"' | '`' => mode = Mode::Quoted(c),
                '[' => mode = Mode::Quoted(']'),
                c if c.is_ascii_alphabetic() || c == '_' => {
                    let start = i;
                    while i < chars.len() && (chars[i].1.is_ascii_alphanumeric() || chars[i].1 == '_') {
                        i += 1;
                    }
                    let word: String = chars[start..i].iter().map(|&(_, c)| c).collect::<String>().to_ascii_uppercase();
                    let is_call = chars[i..].iter().map(|&(_, c)| c).find(|c| !c.is_whitespace()) == Some('(');
                    words.push((word, is_call));
                    continue;
                }
                _ => {}
            },
            Mode::Quoted(close) => {
                if c == close {
                    // Doubled quote is an escaped quote inside the literal.
                    if next == Some(close) && close != ']' {
                        i += 1;
                    } else {
                        mode = Mode::Code;
                    }
                }
            }
            Mode::LineComment => {
                if c == '\n' {
                    mode = Mode::Code;
                }
            }
            Mode::BlockComment => {
                if c == '*' && next == Some('/') {
                    mode = Mode::Code;
                    i += 1;
                }
            }
        }
        i += 1;
    }

    match mode {
        Mode::Code | Mode::LineComment => Ok(Scan { words, end: end.unwrap_or(sql.len()) }),
        Mode::Quoted(_) | Mode::BlockComment => Err(GuardError::Unterminated),
    }
}
