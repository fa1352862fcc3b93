//! Unified hunk assembly
//!
//! Groups an edit script into hunks with three lines of context on each
//! side. Two changes separated by fewer than `2 * CONTEXT_LINES`
//! unchanged lines fold into one hunk. Headers carry 1-based line
//! numbers: `@@ -oldStart,oldCount +newStart,newCount @@`.

use crate::artifacts::diff::diff_algorithm::{Edit, EditKind};

/// Context lines kept around each change
pub const CONTEXT_LINES: usize = 3;

#[derive(Default)]
struct HunkState {
    lines: Vec<String>,
    old_start: usize,
    new_start: usize,
    old_count: usize,
    new_count: usize,
}

impl HunkState {
    fn flush_into(&mut self, result: &mut Vec<String>) {
        if self.lines.is_empty() {
            return;
        }

        result.push(format!(
            "@@ -{},{} +{},{} @@",
            self.old_start, self.old_count, self.new_start, self.new_count
        ));
        result.append(&mut self.lines);
        self.old_count = 0;
        self.new_count = 0;
    }

    fn push_context(&mut self, text: &str) {
        self.lines.push(format!(" {text}"));
        self.old_count += 1;
        self.new_count += 1;
    }
}

/// Assemble the hunks of a unified diff from an edit script
pub fn build_hunks(edits: &[Edit]) -> Vec<String> {
    let mut result = Vec::new();
    let mut hunk = HunkState::default();
    let mut last_change: Option<usize> = None;

    for (idx, edit) in edits.iter().enumerate() {
        if edit.kind == EditKind::Context {
            continue;
        }

        let starts_new_hunk = match last_change {
            None => true,
            Some(last) => idx - last > 2 * CONTEXT_LINES,
        };

        if starts_new_hunk {
            hunk.flush_into(&mut result);

            let start = idx.saturating_sub(CONTEXT_LINES);
            hunk.old_start = 1 + line_count(&edits[..start], EditKind::Insert);
            hunk.new_start = 1 + line_count(&edits[..start], EditKind::Delete);

            for edit in &edits[start..idx] {
                hunk.push_context(edit.text);
            }
        } else if let Some(last) = last_change {
            // fold the unchanged run between the two changes into the hunk
            for edit in &edits[last + 1..idx] {
                hunk.push_context(edit.text);
            }
        }

        last_change = Some(idx);

        hunk.lines.push(format!("{}{}", edit.kind.symbol(), edit.text));
        match edit.kind {
            EditKind::Delete => hunk.old_count += 1,
            _ => hunk.new_count += 1,
        }
    }

    if let Some(last) = last_change {
        let end = (last + CONTEXT_LINES + 1).min(edits.len());
        for edit in &edits[last + 1..end] {
            hunk.push_context(edit.text);
        }
        hunk.flush_into(&mut result);
    }

    result
}

/// Lines of `edits` present on the side that excludes `excluded`
fn line_count(edits: &[Edit], excluded: EditKind) -> usize {
    edits.iter().filter(|edit| edit.kind != excluded).count()
}
