//! Account detail panels.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::api::Account;
use crate::app::{AccountView, AppState};

fn or_dash(v: Option<&str>) -> String {
    match v {
        Some(s) if !s.trim().is_empty() => s.to_string(),
        _ => "-".to_string(),
    }
}

/// Label/value rows for the "Account info" panel.
pub fn account_rows(a: &Account) -> Vec<(&'static str, String)> {
    vec![
        ("UserID", a.user_id.to_string()),
        ("Username", a.username.clone()),
        ("Role", or_dash(Some(a.role.as_str()))),
    ]
}

/// Label/value rows for the "Personal info" panel.
pub fn personal_rows(a: &Account) -> Vec<(&'static str, String)> {
    vec![
        ("Full name", or_dash(a.full_name.as_deref())),
        ("Email", or_dash(a.email.as_deref())),
        ("Phone", or_dash(a.phone.as_deref())),
        ("Address", or_dash(a.address.as_deref())),
        ("CCCD", or_dash(a.cccd.as_deref())),
        ("Blood type", or_dash(a.type_blood.as_deref())),
        ("Gender", a.gender.map_or_else(|| "-".to_string(), |g| g.label().to_string())),
        (
            "Birthdate",
            a.birthdate
                .map_or_else(|| "-".to_string(), |d| d.format("%Y-%m-%d").to_string()),
        ),
    ]
}

fn panel(f: &mut Frame, area: Rect, app: &AppState, title: &str, hint: &str, rows: Vec<(&'static str, String)>) {
    let label_w = rows.iter().map(|(l, _)| l.len()).max().unwrap_or(0);
    let lines: Vec<Line> = rows
        .into_iter()
        .map(|(label, value)| {
            Line::from(vec![
                Span::styled(
                    format!("{label:<label_w$}  "),
                    Style::default().fg(app.theme.muted),
                ),
                Span::styled(value, Style::default().fg(app.theme.text)),
            ])
        })
        .collect();
    let block = Block::default()
        .title(Span::styled(
            format!(" {title} "),
            Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD),
        ))
        .title_bottom(Line::from(format!(" {hint} ")).alignment(Alignment::Right))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border));
    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(block);
    f.render_widget(p, area);
}

pub fn render_account(f: &mut Frame, area: Rect, app: &AppState, account: &Account) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(area);
    panel(f, cols[0], app, "Account info", "a: update", account_rows(account));
    panel(f, cols[1], app, "Personal info", "p: update", personal_rows(account));
}

/// Body shown while there is no account to display.
pub fn render_placeholder(f: &mut Frame, area: Rect, app: &AppState, view: &AccountView) {
    let (text, color) = match view {
        AccountView::Loading => ("Loading...".to_string(), app.theme.muted),
        AccountView::Failed(e) => (format!("Error: {e}"), app.theme.danger),
        AccountView::Missing => ("No account found.".to_string(), app.theme.text),
        AccountView::Loaded(_) => (String::new(), app.theme.text),
    };
    let p = Paragraph::new(text)
        .style(Style::default().fg(color))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(p, area);
}
