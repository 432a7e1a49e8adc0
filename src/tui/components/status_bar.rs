//! Status bar component.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::models::StatsScope;
use crate::tui::app::App;

/// Renders the status bar.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let (sync_label, sync_color) = match app.last_backlog_at {
        Some(at) if at.elapsed().as_secs() < 30 => (" Live ", Color::Green),
        Some(_) => (" Stale ", Color::Yellow),
        None => (" Syncing ", Color::Yellow),
    };

    let visibility_span = if app.visibility.is_visible() {
        Span::raw("")
    } else {
        Span::styled(" BG ", Style::default().fg(Color::Black).bg(Color::Yellow))
    };

    let today = app.stats.counts(StatsScope::Today);
    let total = app.stats.counts(StatsScope::All);

    let held_span = if app.held_count > 0 {
        Span::styled(
            format!(" Held: {} ", app.held_count),
            Style::default().fg(Color::Cyan),
        )
    } else {
        Span::raw("")
    };

    let open_info = format!(" Open: {} ", app.orders.len());

    let spans = vec![
        Span::styled(sync_label, Style::default().fg(sync_color)),
        Span::raw("│"),
        visibility_span,
        Span::raw(open_info),
        Span::raw("│"),
        Span::styled(
            format!(" Today: {} (avg {:.1} min) ", today.count, today.avg_minutes),
            Style::default().fg(Color::White),
        ),
        Span::raw("│"),
        Span::styled(
            format!(" Total: {} ", total.count),
            Style::default().fg(Color::White),
        ),
        Span::raw("│"),
        held_span,
        Span::raw(format!(" Next #{} ", app.next_sequence)),
    ];

    let para = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(para, area);
}
