//! Text canonicalization for chord spellings.
//!
//! One total function over arbitrary input, used on both stored canonical
//! keys and user submissions so that grading is a single set-membership
//! check on its output. The step order is a contract:
//!
//! 1. unify accidental glyphs (`♯`/`#` → `sharp`, `♭` → `flat`)
//! 2. fold case, drop whitespace and separator punctuation
//! 3. elide the literal `major` token (optional in casual spelling),
//!    unless a digit follows, so `major7`/`major6` survive
//! 4. abbreviate `minor` → `m`
//! 5. strip a `th` ordinal suffix, only directly after a digit
//!
//! Step 3 runs strictly before step 4. ASCII `b` is never rewritten as a
//! flat here since that would corrupt the note B; flat-as-`b` spellings
//! are resolved through the catalog's alias spellings instead.

/// Characters treated as separators and dropped in step 2.
fn is_separator(c: char) -> bool {
    c.is_whitespace() || matches!(c, '_' | '-' | '.' | '(' | ')')
}

/// Canonicalize a chord spelling. Total and idempotent; garbled input simply
/// normalizes to something no catalog entry accepts.
pub fn normalize(input: &str) -> String {
    let unified = input
        .replace('♯', "sharp")
        .replace('#', "sharp")
        .replace('♭', "flat");

    let mut text: String = unified
        .to_lowercase()
        .chars()
        .filter(|c| !is_separator(*c))
        .collect();

    // Token removal can join surrounding text into a fresh token, so the
    // token steps run to a fixpoint. Each pass shrinks the string or ends
    // the loop.
    loop {
        let pass = strip_ordinal(&abbreviate_minor(&elide_major(&text)));
        if pass == text {
            return text;
        }
        text = pass;
    }
}

/// Remove `major` occurrences not followed by a digit.
fn elide_major(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while !rest.is_empty() {
        if let Some(tail) = rest.strip_prefix("major") {
            if !tail.starts_with(|c: char| c.is_ascii_digit()) {
                rest = tail;
                continue;
            }
        }
        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            out.push(c);
        }
        rest = chars.as_str();
    }
    out
}

fn abbreviate_minor(text: &str) -> String {
    text.replace("minor", "m")
}

/// Remove `th` when the preceding kept character is a digit ("7th" → "7").
fn strip_ordinal(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while !rest.is_empty() {
        let after_digit = out.chars().next_back().is_some_and(|c| c.is_ascii_digit());
        if after_digit {
            if let Some(tail) = rest.strip_prefix("th") {
                rest = tail;
                continue;
            }
        }
        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            out.push(c);
        }
        rest = chars.as_str();
    }
    out
}
