//! Script preprocessing and tokenization.
//!
//! A script is a sequence of lines.  Each line is truncated at the first
//! `#` and the first `//`, trimmed, and dropped when empty; what survives
//! is a command line: a command name followed by raw argument tokens,
//! separated by single spaces.
//!
//! There is no escaping mechanism for `#` or `//` inside arguments, and no
//! quoting of embedded spaces — an argument containing a space must come
//! from a variable or an extension instead.  Both are documented
//! limitations of the language, not parser bugs.

/// Strip comments and blank lines, preserving script order.
pub fn preprocess(src: &str) -> Vec<&str> {
    src.lines()
        .map(strip_comment)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Truncate a line at the first `#`, then at the first `//` of the
/// remainder.  Applying both truncations in sequence means whichever marker
/// comes first wins.
fn strip_comment(line: &str) -> &str {
    let end = line.find('#').unwrap_or(line.len());
    let line = &line[..end];
    let end = line.find("//").unwrap_or(line.len());
    &line[..end]
}

/// A command name plus its raw argument tokens, one per script line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub name: String,
    pub args: Vec<String>,
}

/// Split a preprocessed line on single spaces into name and arguments.
///
/// Consecutive spaces yield empty argument tokens; the preprocessor has
/// already trimmed surrounding whitespace, so the first token is the
/// command name.
pub fn tokenize(line: &str) -> CommandLine {
    let mut tokens = line.split(' ');
    let name = tokens.next().unwrap_or("").to_owned();
    let args = tokens.map(str::to_owned).collect();
    CommandLine { name, args }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
