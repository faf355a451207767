//! Machine-applicable fixes.

use serde::{Deserialize, Serialize};
use tbgen_source::Span;

/// Replace the text under `span` with `new_text`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replacement {
    /// The text to replace.
    pub span: Span,
    /// What to put there instead.
    pub new_text: String,
}

/// A described set of replacements that together fix one diagnostic.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedFix {
    /// What the fix does.
    pub message: String,
    /// The edits.
    pub replacements: Vec<Replacement>,
}

impl SuggestedFix {
    /// A fix consisting of a single replacement.
    pub fn single(message: impl Into<String>, span: Span, new_text: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            replacements: vec![Replacement {
                span,
                new_text: new_text.into(),
            }],
        }
    }
}

/// Applies `fixes` to `source`, returning the new text and how many fixes were applied.
///
/// All replacement spans must point into `source`. A fix whose replacements
/// overlap one already accepted is skipped as a whole, so the result never
/// depends on the order edits are spliced in.
pub fn apply_fixes<'a>(
    source: &str,
    fixes: impl IntoIterator<Item = &'a SuggestedFix>,
) -> (String, usize) {
    let mut accepted: Vec<&Replacement> = Vec::new();
    let mut applied = 0;

    for fix in fixes {
        let overlaps = fix.replacements.iter().any(|new| {
            accepted
                .iter()
                .any(|old| new.span.start < old.span.end && old.span.start < new.span.end)
        });
        let in_bounds = fix
            .replacements
            .iter()
            .all(|r| r.span.start <= r.span.end && r.span.end as usize <= source.len());
        if overlaps || !in_bounds {
            continue;
        }
        accepted.extend(fix.replacements.iter());
        applied += 1;
    }

    accepted.sort_by_key(|r| std::cmp::Reverse(r.span.start));
    let mut out = source.to_string();
    for r in accepted {
        out.replace_range(r.span.range(), &r.new_text);
    }
    (out, applied)
}
