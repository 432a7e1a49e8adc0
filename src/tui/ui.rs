//! Main UI rendering coordinator.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::models::StatsScope;
use crate::models::order::Order;

use super::app::{App, Mode};
use super::components::status_bar;

/// Renders the entire kitchen display.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let banner_height = if app.banner_ids.is_empty() { 0 } else { 3 };
    let drilldown_height = if app.stats.is_expanded(StatsScope::Today)
        || app.stats.is_expanded(StatsScope::All)
    {
        8
    } else {
        0
    };

    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),                // Status bar
            Constraint::Length(banner_height),    // Missed-alert banner
            Constraint::Min(8),                   // Backlog and detail
            Constraint::Length(drilldown_height), // Completed drill-downs
            Constraint::Length(1),                // Keybindings help
        ])
        .split(area);

    status_bar::render(frame, main_layout[0], app);

    if !app.banner_ids.is_empty() {
        render_banner(frame, main_layout[1], app);
    }

    render_backlog(frame, main_layout[2], app);

    if drilldown_height > 0 {
        render_drilldowns(frame, main_layout[3], app);
    }

    render_keybindings(frame, main_layout[4]);

    if let Some(toast) = &app.toast {
        render_toast(frame, area, &toast.message);
    }

    if app.mode == Mode::SecretEntry {
        render_secret_popup(frame, area, app);
    }
}

/// Sticky banner for arrivals that could not reach the operator
/// through sound or a system notification.
fn render_banner(frame: &mut Frame, area: Rect, app: &App) {
    let ids: Vec<String> = app.banner_ids.iter().map(|id| format!("#{id}")).collect();
    let line = Line::from(vec![
        Span::styled(
            " NEW ORDERS ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" {} ", ids.join(", "))),
        Span::styled("(x to dismiss)", Style::default().fg(Color::DarkGray)),
    ]);
    let para = Paragraph::new(line)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Yellow)));
    frame.render_widget(para, area);
}

/// Open backlog list on the left, selected order detail on the right.
fn render_backlog(frame: &mut Frame, area: Rect, app: &App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let items: Vec<ListItem> = app
        .orders
        .iter()
        .map(|order| {
            let paid = match order.payment_status {
                crate::models::PaymentStatus::Paid => {
                    Span::styled(" PAID", Style::default().fg(Color::Green))
                }
                crate::models::PaymentStatus::Unpaid => {
                    Span::styled(" UNPAID", Style::default().fg(Color::Red))
                }
            };
            ListItem::new(Line::from(vec![
                Span::raw(format!(
                    "#{} {} ",
                    order.id,
                    order.customer_label().unwrap_or("Walk-in")
                )),
                Span::styled(
                    format!("({} items)", order.items.len()),
                    Style::default().fg(Color::DarkGray),
                ),
                paid,
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title(format!(" Open Orders ({}) ", app.orders.len()))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    let mut state = ListState::default();
    if !app.orders.is_empty() {
        state.select(Some(app.selected));
    }
    frame.render_stateful_widget(list, columns[0], &mut state);

    render_order_detail(frame, columns[1], app.selected_order());
}

fn render_order_detail(frame: &mut Frame, area: Rect, order: Option<&Order>) {
    let block = Block::default()
        .title(" Order Detail ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let Some(order) = order else {
        let para = Paragraph::new("No open orders").block(block);
        frame.render_widget(para, area);
        return;
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                format!("Order #{}", order.id),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("  waiter: {}", order.waiter)),
        ]),
        Line::from(format!(
            "Customer: {}",
            order.customer_label().unwrap_or("Walk-in")
        )),
    ];
    if let Some(time) = &order.time {
        lines.push(Line::from(format!("Placed: {time}")));
    }
    lines.push(Line::raw(""));

    for item in &order.items {
        let mut spans = vec![Span::styled(
            format!("• {}", item.name),
            Style::default().fg(Color::White),
        )];
        if item.wants_drink()
            && let Some(drink) = &item.drink
        {
            spans.push(Span::styled(
                format!("  + {drink}"),
                Style::default().fg(Color::Cyan),
            ));
        }
        lines.push(Line::from(spans));
        if let Some(note) = &item.note
            && !note.is_empty()
        {
            lines.push(Line::from(Span::styled(
                format!("    note: {note}"),
                Style::default().fg(Color::Yellow),
            )));
        }
    }

    let para = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(para, area);
}

/// Expanded completed-order lists, side by side when both are open.
fn render_drilldowns(frame: &mut Frame, area: Rect, app: &App) {
    let expanded: Vec<StatsScope> = app.stats.expanded_scopes();
    let constraints: Vec<Constraint> = expanded
        .iter()
        .map(|_| Constraint::Ratio(1, expanded.len() as u32))
        .collect();
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (scope, col) in expanded.into_iter().zip(columns.iter()) {
        let title = match scope {
            StatsScope::Today => " Completed Today ",
            StatsScope::All => " Completed All Time ",
        };
        let items: Vec<ListItem> = app
            .stats
            .completed_list(scope)
            .iter()
            .map(|order| {
                let duration = order
                    .duration_minutes
                    .map(|m| format!(" {m:.0} min"))
                    .unwrap_or_default();
                ListItem::new(format!(
                    "#{} {}{}",
                    order.id,
                    order.customer_label().unwrap_or("Walk-in"),
                    duration
                ))
            })
            .collect();
        let list = List::new(items).block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        frame.render_widget(list, *col);
    }
}

fn render_keybindings(frame: &mut Frame, area: Rect) {
    let help = Paragraph::new(Line::from(Span::styled(
        " j/k: select │ d/Enter: mark done │ t/a: completed today/all │ r: reset │ b: backup │ x: dismiss │ q: quit",
        Style::default().fg(Color::DarkGray),
    )));
    frame.render_widget(help, area);
}

/// Transient action-result message pinned to the bottom edge.
fn render_toast(frame: &mut Frame, area: Rect, message: &str) {
    let width = (message.len() as u16 + 4).min(area.width);
    let toast_area = Rect {
        x: area.width.saturating_sub(width),
        y: area.height.saturating_sub(2),
        width,
        height: 1,
    };
    frame.render_widget(Clear, toast_area);
    let para = Paragraph::new(format!(" {message} "))
        .style(Style::default().fg(Color::Black).bg(Color::Cyan));
    frame.render_widget(para, toast_area);
}

/// Centered masked prompt for the reset secret.
fn render_secret_popup(frame: &mut Frame, area: Rect, app: &App) {
    let width = 40.min(area.width);
    let popup = Rect {
        x: area.width.saturating_sub(width) / 2,
        y: area.height / 2,
        width,
        height: 3,
    };
    frame.render_widget(Clear, popup);
    let para = Paragraph::new(app.secret_input.masked()).block(
        Block::default()
            .title(" Reset secret (Enter to confirm, Esc to cancel) ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red)),
    );
    frame.render_widget(para, popup);
}
