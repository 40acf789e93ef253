//! Shared UI components (status bar, help, toasts, layout helpers).
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::keymap::KeyAction;
use crate::app::{AccountView, AppState, Level, ModalState};
use crate::gate::COUNTDOWN_SECS;

const MAX_TOASTS: usize = 3;

/// Render the bottom status bar with mode and key hints.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let mode = if app.delete_gate.is_open() {
        "CONFIRM"
    } else {
        match app.modal {
            Some(ModalState::UpdateForm(_)) => "EDIT",
            Some(ModalState::Help { .. }) => "HELP",
            None => "NORMAL",
        }
    };
    let load = match app.account {
        AccountView::Loading => "  loading",
        AccountView::Failed(_) => "  error",
        AccountView::Missing => "  not found",
        AccountView::Loaded(_) => "",
    };
    let busy = if app.delete_in_flight {
        "  deleting..."
    } else if app.update_in_flight {
        "  saving..."
    } else {
        ""
    };
    let msg = format!(
        "mode: {mode}  account:{}{load}{busy}  | a: account  p: personal  d: delete  r: refresh  ?: help  q: back",
        app.account_id
    );
    let p = Paragraph::new(msg).style(Style::default().fg(app.theme.status_fg).bg(app.theme.status_bg));
    f.render_widget(p, area);
}

/// Compute a rectangle centered within `area` with a maximum size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render the help modal from the live keymap.
pub fn render_help_modal(f: &mut Frame, area: Rect, app: &AppState, scroll: u16) {
    let width = 64u16.min(area.width.saturating_sub(4)).max(40);
    let height = 20u16.min(area.height.saturating_sub(4)).max(10);
    let rect = centered_rect(width, height, area);

    let heading = |text: &'static str| Line::from(Span::styled(text, Style::default().add_modifier(Modifier::BOLD)));
    let row = |label: &str, keys: String| {
        Line::from(vec![
            Span::raw(format!("{label:<24}")),
            Span::styled(keys, Style::default().add_modifier(Modifier::ITALIC)),
        ])
    };

    let mut lines = vec![heading("Account detail"), Line::raw("")];
    for (label, action) in [
        ("Update account fields", KeyAction::EditAccount),
        ("Update personal fields", KeyAction::EditPersonal),
        ("Delete account", KeyAction::RequestDelete),
        ("Reload", KeyAction::Refresh),
        ("Help", KeyAction::OpenHelp),
        ("Back", KeyAction::Back),
    ] {
        lines.push(row(label, app.keymap.keys_for(action).join(", ")));
    }

    lines.push(Line::raw(""));
    lines.push(heading("Update form"));
    lines.push(row("Next / previous field", "Down, Tab / Up, Shift+Tab".into()));
    lines.push(row("Toggle gender", "Space, Left, Right".into()));
    lines.push(row("Save / cancel", "Enter / Esc".into()));

    lines.push(Line::raw(""));
    lines.push(heading("Delete confirmation"));
    lines.push(Line::raw(format!(
        "The Delete button unlocks after a {COUNTDOWN_SECS} second countdown."
    )));
    lines.push(row("Choose button", "Left, Right, Tab".into()));
    lines.push(row("Delete / cancel", "y / n, Esc".into()));

    lines.push(Line::raw(""));
    lines.push(row("Close help", "Esc / Enter".into()));

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(
            Block::default()
                .title("Help")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

/// Stack the newest notifications in the top-right corner.
pub fn render_notifications(f: &mut Frame, area: Rect, app: &AppState) {
    let width = 44u16.min(area.width);
    let mut y = area.y + 1;
    for notice in app.notifications.latest(MAX_TOASTS) {
        if y + 3 > area.y + area.height {
            break;
        }
        let color = match notice.level {
            Level::Success => app.theme.success,
            Level::Error => app.theme.danger,
            Level::Info => app.theme.highlight_fg,
        };
        let rect = Rect {
            x: area.x + area.width.saturating_sub(width + 1),
            y,
            width,
            height: 3,
        };
        let p = Paragraph::new(notice.message.clone())
            .style(Style::default().fg(color))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color)),
            );
        f.render_widget(Clear, rect);
        f.render_widget(p, rect);
        y += 3;
    }
}
