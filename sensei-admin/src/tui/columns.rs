//! Per-column cell content
//!
//! Each column renders through one dispatch: the specialized columns get
//! their own content, everything else falls back to plain text.

use sensei_admin_core::NodeStatus;

use crate::tui::state::clipboard::COPIED_LABEL;
use crate::tui::types::row::DisplayRow;
use crate::tui::types::ui::Column;

pub const COPY_ICON: &str = "⧉";
pub const PENDING_MARKER: &str = "…";

/// Row-level context a cell may depend on
#[derive(Debug, Clone, Copy, Default)]
pub struct CellContext<'a> {
    /// The row has keyboard focus
    pub focused: bool,
    /// The copied confirmation window is open for the row
    pub copied: bool,
    /// A lifecycle command for the row is in flight
    pub pending: bool,
    pub error: Option<&'a str>,
}

/// Semantic styling of a cell, mapped to colors by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellTone {
    Plain,
    Muted,
    Success,
    Danger,
    Accent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellContent {
    pub text: String,
    pub tone: CellTone,
}

impl CellContent {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: CellTone::Plain,
        }
    }
}

pub fn cell_content(column: Column, row: &DisplayRow, ctx: &CellContext<'_>) -> CellContent {
    match column {
        Column::Status => status_cell(row.status),
        Column::ConnectionInfo => connection_cell(row, ctx),
        Column::Actions => actions_cell(row, ctx),
        Column::Username => CellContent::plain(&row.username),
        Column::Alias => CellContent::plain(&row.alias),
        Column::Role => CellContent::plain(row.role_label()),
    }
}

fn status_cell(status: NodeStatus) -> CellContent {
    CellContent {
        text: status.label().to_string(),
        tone: match status {
            NodeStatus::Running => CellTone::Success,
            NodeStatus::Stopped => CellTone::Danger,
        },
    }
}

fn connection_cell(row: &DisplayRow, ctx: &CellContext<'_>) -> CellContent {
    if ctx.copied {
        CellContent {
            text: COPIED_LABEL.to_string(),
            tone: CellTone::Success,
        }
    } else if ctx.focused {
        CellContent {
            text: format!("{} {}", row.connection_info, COPY_ICON),
            tone: CellTone::Accent,
        }
    } else {
        CellContent::plain(&row.connection_info)
    }
}

fn actions_cell(row: &DisplayRow, ctx: &CellContext<'_>) -> CellContent {
    let icons: Vec<&str> = row.available_actions().iter().map(|a| a.icon()).collect();
    let mut text = icons.join(" ");

    if ctx.pending {
        text.push(' ');
        text.push_str(PENDING_MARKER);
        return CellContent {
            text,
            tone: CellTone::Muted,
        };
    }
    if ctx.error.is_some() {
        text.push_str(" !");
        return CellContent {
            text,
            tone: CellTone::Danger,
        };
    }
    CellContent::plain(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sensei_admin_core::{NodeRecord, NodeRole};

    use crate::tui::transform::to_display_row;

    fn row(status: NodeStatus) -> DisplayRow {
        to_display_row(&NodeRecord::new(
            "02".to_string() + &"a".repeat(64),
            "alias",
            "user",
            NodeRole::Sensei,
            status,
            "127.0.0.1",
            9735,
        ))
    }

    #[test]
    fn test_actions_icons_follow_status() {
        let ctx = CellContext::default();
        assert_eq!(
            cell_content(Column::Actions, &row(NodeStatus::Stopped), &ctx).text,
            "▶ ⊕"
        );
        assert_eq!(
            cell_content(Column::Actions, &row(NodeStatus::Running), &ctx).text,
            "■ ⊕"
        );
    }

    #[test]
    fn test_status_tone() {
        let ctx = CellContext::default();
        assert_eq!(
            cell_content(Column::Status, &row(NodeStatus::Running), &ctx).tone,
            CellTone::Success
        );
        assert_eq!(
            cell_content(Column::Status, &row(NodeStatus::Stopped), &ctx).tone,
            CellTone::Danger
        );
    }

    #[test]
    fn test_connection_cell_states() {
        let r = row(NodeStatus::Running);
        let idle = cell_content(Column::ConnectionInfo, &r, &CellContext::default());
        assert_eq!(idle.text, r.connection_info);

        let focused = CellContext {
            focused: true,
            ..Default::default()
        };
        assert!(cell_content(Column::ConnectionInfo, &r, &focused)
            .text
            .ends_with(COPY_ICON));

        let copied = CellContext {
            focused: true,
            copied: true,
            ..Default::default()
        };
        assert_eq!(cell_content(Column::ConnectionInfo, &r, &copied).text, "Copied!");
    }

    #[test]
    fn test_simple_columns_render_text() {
        let r = row(NodeStatus::Running);
        let ctx = CellContext::default();
        assert_eq!(cell_content(Column::Role, &r, &ctx).text, "Sensei");
        assert_eq!(cell_content(Column::Username, &r, &ctx).text, "user");
        assert_eq!(cell_content(Column::Alias, &r, &ctx).tone, CellTone::Plain);
    }
}
