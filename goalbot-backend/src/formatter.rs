//! Pure text shaping for chat replies.
//!
//! No I/O in this module. Every function is deterministic given the same
//! input, so the dispatcher's replies are fully testable offline.

use crate::models::Objective;

/// Render raw text as bullet lines, splitting on newlines and semicolons.
/// Existing `-` and `•` markers are normalized to `•`. Empty input yields
/// empty output.
pub fn bulletize(text: &str) -> String {
    let mut lines = Vec::new();
    for clause in text.split(['\n', ';']) {
        let clause = clause.trim();
        if clause.is_empty() {
            continue;
        }
        let clause = clause
            .strip_prefix("- ")
            .or_else(|| clause.strip_prefix("• "))
            .unwrap_or(clause);
        lines.push(format!("• {}", clause));
    }
    lines.join("\n")
}

/// Render one page of objectives as a single display block.
///
/// `items` is the page slice, `total` the full collection size. The block
/// carries a `page X of Y` indicator and an out-of-range note when the
/// requested page is past the end.
pub fn paginate(items: &[Objective], page: usize, total: usize, page_size: usize) -> String {
    let total_pages = total.div_ceil(page_size.max(1)).max(1);
    let mut block = format!("📊 Team Objectives (page {} of {})\n", page, total_pages);

    if items.is_empty() {
        block.push_str(&format!(
            "\nPage {} is out of range. The last page is {}.",
            page, total_pages
        ));
        return block;
    }

    for objective in items {
        block.push_str(&format!(
            "\nObjective {} (by {}, {})\n",
            objective.id,
            objective.author,
            objective.created_at.format("%Y-%m-%d")
        ));
        block.push_str(&bulletize(&objective.formatted_text));
        block.push('\n');
    }
    block
}

/// Split `text` into chunks of at most `limit` characters each.
///
/// Concatenating the chunks reproduces the input exactly. Splits prefer
/// the last newline inside the window so bullet lines stay whole. UTF-8
/// safe: the limit counts characters, never bytes.
pub fn chunk_for_transport(text: &str, limit: usize) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    if limit == 0 {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut rest = text;
    loop {
        match rest.char_indices().nth(limit) {
            None => {
                // Everything left fits in one chunk.
                chunks.push(rest.to_string());
                break;
            }
            Some((hard_end, _)) => {
                let window = &rest[..hard_end];
                let split_at = match window.rfind('\n') {
                    // Keep the newline with the leading chunk.
                    Some(idx) if idx > 0 => idx + 1,
                    _ => hard_end,
                };
                chunks.push(rest[..split_at].to_string());
                rest = &rest[split_at..];
            }
        }
    }
    chunks
}

/// Truncate to at most `limit` characters, appending `...` when cut.
pub fn truncate_with_ellipsis(text: &str, limit: usize) -> String {
    let char_count = text.chars().count();
    if char_count <= limit {
        return text.to_string();
    }
    if limit <= 3 {
        return ".".repeat(limit);
    }
    let keep = limit - 3;
    let end = text
        .char_indices()
        .nth(keep)
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    format!("{}...", &text[..end])
}
