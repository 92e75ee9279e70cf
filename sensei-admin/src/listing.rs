//! Plain-text rendering of a listing page for the `list` command

use crate::tui::columns::{cell_content, CellContext};
use crate::tui::state::paged_list::{EMPTY_HEADLINE, EMPTY_SUBTEXT};
use crate::tui::transform::ResultPage;
use crate::tui::types::ui::Column;

/// Render `page` as an aligned text table.
///
/// `page_index` is zero-based; it is shown one-based.
pub fn render_page(page: &ResultPage, page_index: usize) -> String {
    if page.rows.is_empty() {
        return format!("{}\n{}\n", EMPTY_HEADLINE, EMPTY_SUBTEXT);
    }

    let ctx = CellContext::default();
    let cells: Vec<Vec<String>> = page
        .rows
        .iter()
        .map(|row| {
            Column::ALL
                .iter()
                .map(|column| cell_content(*column, row, &ctx).text)
                .collect()
        })
        .collect();

    let widths: Vec<usize> = Column::ALL
        .iter()
        .enumerate()
        .map(|(i, column)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(column.header().chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let headers: Vec<String> = Column::ALL.iter().map(|c| c.header().to_string()).collect();
    push_line(&mut out, &headers, &widths);
    for row in &cells {
        push_line(&mut out, row, &widths);
    }
    out.push_str(&format!(
        "\nPage {} · {} total{}\n",
        page_index + 1,
        page.total,
        if page.has_more { " · more available" } else { "" }
    ));
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{}{}", cell, " ".repeat(pad))
        })
        .collect();
    out.push_str(padded.join("  ").trim_end());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use sensei_admin_core::{NodePage, NodeRecord, NodeRole, NodeStatus, PaginationMeta};

    use crate::tui::transform::transform_page;

    #[test]
    fn test_empty_page_prints_empty_state() {
        let page = transform_page(&NodePage::default());
        assert_eq!(render_page(&page, 0), "No nodes found\nTry changing the search term\n");
    }

    #[test]
    fn test_rows_are_aligned_under_headers() {
        let page = transform_page(&NodePage {
            nodes: vec![NodeRecord::new(
                "02aa",
                "alpha",
                "alice",
                NodeRole::Child,
                NodeStatus::Stopped,
                "127.0.0.1",
                9736,
            )],
            pagination: PaginationMeta {
                has_more: true,
                total: 7,
            },
        });

        let text = render_page(&page, 0);
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].starts_with("Username  Alias"));
        assert!(lines[1].starts_with("alice     alpha"));
        assert!(lines[1].contains("02aa@127.0.0.1:9736"));
        assert!(lines[1].ends_with("▶ ⊕"));
        assert!(text.contains("Page 1 · 7 total · more available"));
    }
}
