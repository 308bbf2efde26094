//! `%(path)s` string substitution.
//!
//! A placeholder `%(path)s` is replaced by the entry found at the dotted
//! `path`; `%%` produces a single `%`. Strings are inserted as their raw
//! text, every other entry as its JSON form.
//!
//! ```rust
//! use wax::{node, template::substitute};
//!
//! let config = node! { "user": { "name": "ada", "id": 7 } };
//! let text = substitute("%(user.name)s has id %(user.id)s (100%%)", &config.flat())?;
//! assert_eq!(text, "ada has id 7 (100%)");
//! # Ok::<(), wax::Error>(())
//! ```

use crate::flat::Lookup;
use crate::{Entry, Error, Result};

/// Replaces every placeholder in `template` with values from `source`.
///
/// # Errors
///
/// [`Error::KeyNotFound`] or [`Error::TypeConflict`] when a placeholder path
/// does not resolve, [`Error::Template`] for a malformed placeholder. The
/// offset is the byte position of the offending `%`.
pub fn substitute<L: Lookup + ?Sized>(template: &str, source: &L) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    let mut offset = 0;

    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let start = offset + pos;
        let after = &rest[pos + 1..];

        let consumed = if let Some(tail) = after.strip_prefix('%') {
            out.push('%');
            rest = tail;
            2
        } else if let Some(body) = after.strip_prefix('(') {
            let close = body
                .find(')')
                .ok_or_else(|| Error::template(start, "unterminated placeholder"))?;
            let path = &body[..close];
            if !body[close + 1..].starts_with('s') {
                return Err(Error::template(start, "placeholder must end with `)s`"));
            }
            if path.is_empty() {
                return Err(Error::template(start, "placeholder names no key"));
            }
            write_entry(&mut out, source.lookup(path)?);
            rest = &body[close + 2..];
            path.len() + 4
        } else {
            return Err(Error::template(start, "`%` must be followed by `(` or `%`"));
        };

        offset = start + consumed;
    }

    out.push_str(rest);
    Ok(out)
}

fn write_entry(out: &mut String, entry: &Entry) {
    match entry {
        Entry::String(s) => out.push_str(s),
        other => out.push_str(&other.to_string()),
    }
}
