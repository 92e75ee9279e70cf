//! Terminal rendering for the node console

use std::time::Instant;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
    Frame,
};

use super::columns::{cell_content, CellContext, CellTone};
use super::forms::{Modal, StartNodeForm};
use super::state::confirm::GateState;
use super::state::paged_list::{ListView, SEARCH_PLACEHOLDER};
use super::state::App;
use super::types::row::{ChannelOpenRoute, DisplayRow};
use super::types::ui::{AppMode, Column, InputMode};

const PRIMARY_COLOR: Color = Color::Cyan;
const SUCCESS_COLOR: Color = Color::Green;
const WARNING_COLOR: Color = Color::Yellow;
const ERROR_COLOR: Color = Color::Red;
const MUTED_COLOR: Color = Color::DarkGray;
const TEXT_COLOR: Color = Color::White;

pub fn render(f: &mut Frame, app: &App) {
    let size = f.size();
    let now = Instant::now();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search bar
            Constraint::Min(0),    // Node table
            Constraint::Length(3), // Status bar
        ])
        .split(size);

    render_search_bar(f, chunks[0], app);
    match &app.ui_state.mode {
        AppMode::NodeList => render_node_list(f, chunks[1], app, now),
        AppMode::ChannelOpen(route) => render_channel_open(f, chunks[1], route),
    }
    render_status_bar(f, chunks[2], app);

    if app.overlays.confirm.is_open() {
        render_confirm_dialog(f, app);
    }
    if let Some(Modal::StartNode(form)) = app.overlays.modal.current() {
        render_start_node_form(f, form);
    }
}

fn render_search_bar(f: &mut Frame, area: Rect, app: &App) {
    let editing = app.ui_state.input_mode == InputMode::Editing;
    let text = if app.ui_state.search_input.is_empty() && !editing {
        Span::styled(SEARCH_PLACEHOLDER, Style::default().fg(MUTED_COLOR))
    } else {
        Span::raw(format!(
            "{}{}",
            app.ui_state.search_input,
            if editing { "_" } else { "" }
        ))
    };

    let border = if editing { WARNING_COLOR } else { PRIMARY_COLOR };
    let search = Paragraph::new(Line::from(vec![Span::raw("🔍 "), text])).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Search")
            .border_style(Style::default().fg(border)),
    );
    f.render_widget(search, area);
}

fn render_node_list(f: &mut Frame, area: Rect, app: &App, now: Instant) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(node_table_title(app))
        .border_style(Style::default().fg(PRIMARY_COLOR));

    match app.view() {
        ListView::Loading => {
            let loading = Paragraph::new("Loading nodes...")
                .style(Style::default().fg(MUTED_COLOR))
                .alignment(Alignment::Center)
                .block(block);
            f.render_widget(loading, area);
        }
        ListView::Failed { message } => {
            let text = vec![
                Line::from(Span::styled(
                    "Could not load nodes",
                    Style::default().fg(ERROR_COLOR).add_modifier(Modifier::BOLD),
                )),
                Line::from(message.to_string()),
                Line::from(""),
                Line::from(Span::styled(
                    "Press r to retry",
                    Style::default().fg(MUTED_COLOR),
                )),
            ];
            let failed = Paragraph::new(text)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(block);
            f.render_widget(failed, area);
        }
        ListView::Empty { headline, subtext } => {
            let text = vec![
                Line::from(Span::styled(
                    headline,
                    Style::default().fg(TEXT_COLOR).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(subtext, Style::default().fg(MUTED_COLOR))),
            ];
            let empty = Paragraph::new(text).alignment(Alignment::Center).block(block);
            f.render_widget(empty, area);
        }
        ListView::Rows { rows, .. } => render_node_table(f, area, app, rows, block, now),
    }
}

fn render_node_table(
    f: &mut Frame,
    area: Rect,
    app: &App,
    rows: &[DisplayRow],
    block: Block,
    now: Instant,
) {
    let header = Row::new(Column::ALL.iter().map(|column| {
        Cell::from(column.header())
            .style(Style::default().fg(PRIMARY_COLOR).add_modifier(Modifier::BOLD))
    }));

    let selected = app.ui_state.selected();
    let table_rows: Vec<Row> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let ctx = CellContext {
                focused: selected == Some(i),
                copied: app.copy_feedback.is_copied(&row.pubkey, now),
                pending: app.actions.is_pending(&row.pubkey),
                error: app.actions.row_error(&row.pubkey),
            };
            Row::new(Column::ALL.iter().map(|column| {
                let content = cell_content(*column, row, &ctx);
                Cell::from(content.text).style(tone_style(content.tone))
            }))
        })
        .collect();

    let table = Table::new(
        table_rows,
        [
            Constraint::Min(10), // Username
            Constraint::Min(12), // Alias
            Constraint::Min(8),  // Role
            Constraint::Min(40), // Connection info
            Constraint::Min(9),  // Status
            Constraint::Min(8),  // Actions
        ],
    )
    .header(header)
    .block(block)
    .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
    .highlight_symbol(">> ");

    f.render_stateful_widget(table, area, &mut app.ui_state.table_state.clone());
}

fn tone_style(tone: CellTone) -> Style {
    match tone {
        CellTone::Plain => Style::default().fg(TEXT_COLOR),
        CellTone::Muted => Style::default().fg(MUTED_COLOR),
        CellTone::Success => Style::default().fg(SUCCESS_COLOR),
        CellTone::Danger => Style::default().fg(ERROR_COLOR),
        CellTone::Accent => Style::default().fg(PRIMARY_COLOR),
    }
}

fn node_table_title(app: &App) -> String {
    let page = app.list.page() + 1;
    let mut title = match app.view() {
        ListView::Rows {
            total,
            has_more,
            refreshing,
            ..
        } => format!(
            "Nodes · page {}{} · {} total{}",
            page,
            if has_more { "+" } else { "" },
            total,
            if refreshing { " · refreshing" } else { "" }
        ),
        _ => format!("Nodes · page {}", page),
    };
    if !app.list.search_term().is_empty() {
        title.push_str(&format!(" · \"{}\"", app.list.search_term()));
    }
    title
}

fn render_channel_open(f: &mut Frame, area: Rect, route: &ChannelOpenRoute) {
    let text = vec![
        Line::from(Span::styled(
            "Open channel",
            Style::default().fg(PRIMARY_COLOR).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!("Route: {}", route.path())),
        Line::from(format!("Connection: {}", route.connection)),
        Line::from(""),
        Line::from(Span::styled(
            "Press Esc to return to the node list",
            Style::default().fg(MUTED_COLOR),
        )),
    ];
    let panel = Paragraph::new(text).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Channels")
            .border_style(Style::default().fg(PRIMARY_COLOR)),
    );
    f.render_widget(panel, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(60), // Status info
            Constraint::Percentage(40), // Shortcuts
        ])
        .split(area);

    let (status_text, status_style) = if let Some(msg) = &app.ui_state.error_message {
        (format!("❌ {}", msg), Style::default().fg(ERROR_COLOR))
    } else if let Some(msg) = &app.ui_state.status_message {
        (format!("✅ {}", msg), Style::default().fg(SUCCESS_COLOR))
    } else if let Some(error) = app
        .selected_row()
        .and_then(|row| app.actions.row_error(&row.pubkey))
    {
        (format!("❌ {}", error), Style::default().fg(ERROR_COLOR))
    } else {
        (
            format!("{} nodes shown", app.rows().len()),
            Style::default().fg(TEXT_COLOR),
        )
    };

    let status = Paragraph::new(status_text)
        .style(status_style)
        .block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(status, chunks[0]);

    let shortcuts = Paragraph::new(current_shortcuts(app))
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL).title("Keys"))
        .wrap(Wrap { trim: true });
    f.render_widget(shortcuts, chunks[1]);
}

fn current_shortcuts(app: &App) -> &'static str {
    if app.overlays.modal.is_showing() {
        "Enter: start  Esc: cancel"
    } else if app.overlays.confirm.is_open() {
        "y: confirm  n/Esc: cancel  Tab: switch"
    } else if matches!(app.ui_state.mode, AppMode::ChannelOpen(_)) {
        "Esc: back"
    } else if app.ui_state.input_mode == InputMode::Editing {
        "type to search  Enter/Esc: done"
    } else {
        "/ search  ←→ page  c copy  s start/stop  o channel  r refresh  q quit"
    }
}

fn render_confirm_dialog(f: &mut Frame, app: &App) {
    let gate = &app.overlays.confirm;
    let Some(request) = gate.request() else {
        return;
    };

    let area = centered_rect(60, 40, f.size());
    f.render_widget(Clear, area);

    let block = Block::default()
        .title(request.title.as_str())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(WARNING_COLOR));
    f.render_widget(block, area);

    let inner_area = area.inner(&Margin {
        vertical: 1,
        horizontal: 1,
    });
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(inner_area);

    let mut message = vec![Line::from(request.description.as_str())];
    match gate.state() {
        GateState::Pending { .. } => {
            message.push(Line::from(""));
            message.push(Line::from(Span::styled(
                "Stopping...",
                Style::default().fg(MUTED_COLOR),
            )));
        }
        GateState::Open {
            error: Some(error), ..
        } => {
            message.push(Line::from(""));
            message.push(Line::from(Span::styled(
                error.as_str(),
                Style::default().fg(ERROR_COLOR),
            )));
        }
        _ => {}
    }
    let body = Paragraph::new(message)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(body, chunks[0]);

    let button_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    let no_style = if !gate.confirm_selected {
        Style::default()
            .bg(WARNING_COLOR)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(WARNING_COLOR)
    };
    let yes_style = if gate.confirm_selected {
        Style::default()
            .bg(ERROR_COLOR)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(ERROR_COLOR)
    };

    let no_button = Paragraph::new("Cancel")
        .style(no_style)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);
    let yes_button = Paragraph::new(request.cta_text.as_str())
        .style(yes_style)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);

    f.render_widget(no_button, button_chunks[0]);
    f.render_widget(yes_button, button_chunks[1]);
}

fn render_start_node_form(f: &mut Frame, form: &StartNodeForm) {
    let area = centered_rect(60, 40, f.size());
    f.render_widget(Clear, area);

    let block = Block::default()
        .title("Start node")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(PRIMARY_COLOR));
    f.render_widget(block, area);

    let inner_area = area.inner(&Margin {
        vertical: 1,
        horizontal: 2,
    });
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Pubkey
            Constraint::Length(3), // Passphrase
            Constraint::Min(0),    // Status
        ])
        .split(inner_area);

    let pubkey = Paragraph::new(form.pubkey.as_str())
        .style(Style::default().fg(MUTED_COLOR))
        .block(Block::default().borders(Borders::ALL).title("Pubkey"));
    f.render_widget(pubkey, chunks[0]);

    let passphrase = Paragraph::new(format!("{}_", form.masked_passphrase())).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Passphrase")
            .border_style(Style::default().fg(WARNING_COLOR)),
    );
    f.render_widget(passphrase, chunks[1]);

    let status = if form.is_submitting() {
        Line::from(Span::styled(
            "Starting node...",
            Style::default().fg(MUTED_COLOR),
        ))
    } else if let Some(error) = &form.error {
        Line::from(Span::styled(
            error.as_str(),
            Style::default().fg(ERROR_COLOR),
        ))
    } else {
        Line::from(Span::styled(
            "Enter to start, Esc to cancel",
            Style::default().fg(MUTED_COLOR),
        ))
    };
    f.render_widget(Paragraph::new(status).wrap(Wrap { trim: true }), chunks[2]);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
