//! Plain-text rendering of tableaux and the step gallery.
//!
//! The pivot cell is shown in brackets. Columns are sized to their widest
//! entry using Unicode display width so CJK/emoji labels stay aligned.

use tabstep_engine::{StepSummary, TableauView};
use unicode_width::UnicodeWidthStr;

const CORNER: &str = "row \\ col";

/// Display width of a string, accounting for CJK double-width, emoji, etc.
pub(crate) fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Right-pad a string to `width` display columns.
pub(crate) fn pad_right(s: &str, width: usize) -> String {
    let sw = display_width(s);
    if sw >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - sw))
    }
}

/// Left-pad, for numeric-looking cells.
pub(crate) fn pad_left(s: &str, width: usize) -> String {
    let sw = display_width(s);
    if sw >= width {
        s.to_string()
    } else {
        format!("{}{}", " ".repeat(width - sw), s)
    }
}

fn cell_text(view: &TableauView<'_>, row: usize, col: usize) -> String {
    let value = view.cell(row, col).unwrap_or("");
    if view.is_pivot(row, col) {
        format!("[{}]", value)
    } else {
        value.to_string()
    }
}

/// Render a grid under a title line.
pub fn render_tableau(title: &str, view: TableauView<'_>) -> String {
    let label_width = view
        .row_vars
        .iter()
        .map(|l| display_width(l))
        .chain(std::iter::once(display_width(CORNER)))
        .max()
        .unwrap_or(0);

    let texts: Vec<Vec<String>> = (0..view.rows())
        .map(|r| (0..view.cols()).map(|c| cell_text(&view, r, c)).collect())
        .collect();

    let widths: Vec<usize> = (0..view.cols())
        .map(|c| {
            texts
                .iter()
                .map(|row| display_width(&row[c]))
                .chain(std::iter::once(display_width(&view.col_vars[c])))
                .max()
                .unwrap_or(0)
                .max(1)
        })
        .collect();

    let mut out = String::new();
    out.push_str(&format!("{}  ({}x{})\n", title, view.rows(), view.cols()));

    let header: Vec<String> = view
        .col_vars
        .iter()
        .zip(&widths)
        .map(|(label, w)| pad_left(label, *w))
        .collect();
    out.push_str(&format!("{} | {}\n", pad_right(CORNER, label_width), header.join("  ")));

    let rule_width = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
    out.push_str(&format!("{}-+-{}\n", "-".repeat(label_width), "-".repeat(rule_width)));

    for (label, row) in view.row_vars.iter().zip(&texts) {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(text, w)| pad_left(text, *w))
            .collect();
        let line = format!("{} | {}", pad_right(label, label_width), cells.join("  "));
        out.push_str(line.trim_end());
        out.push('\n');
    }

    if let Some(p) = view.pivot {
        out.push_str(&format!("pivot: {}\n", p));
    }
    out
}

/// One line per frozen step: `* Step 2  3x4` (`*` marks the previous step).
pub fn render_gallery(gallery: &[StepSummary]) -> String {
    if gallery.is_empty() {
        return "No steps yet.\n".to_string();
    }
    let mut out = format!(
        "{} step{}\n",
        gallery.len(),
        if gallery.len() == 1 { "" } else { "s" }
    );
    for entry in gallery {
        let marker = if entry.selected { '*' } else { ' ' };
        out.push_str(&format!("{} Step {}  {}x{}\n", marker, entry.step, entry.rows, entry.cols));
    }
    out
}
