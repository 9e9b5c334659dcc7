use yk_domain::context::EditMode;

use crate::dom::{Document, NodeHandle};

/// Final text for a write. In append mode non-blank existing text is kept,
/// trimmed, ahead of the generated note with one blank line between.
pub fn compose(existing: &str, generated: &str, mode: EditMode) -> String {
    let existing = existing.trim();
    match mode {
        EditMode::AppendAfterExisting if !existing.is_empty() => {
            format!("{existing}\n\n{generated}")
        }
        _ => generated.to_string(),
    }
}

/// Compose against the field's current text and write the result through
/// the framework-visible path. Returns the written text.
pub fn inject(doc: &mut Document, target: NodeHandle, generated: &str, mode: EditMode) -> Option<String> {
    let existing = doc.text_of(target)?.to_string();
    let text = compose(&existing, generated, mode);
    doc.write_value(target, &text).then_some(text)
}
