//! Delete prompt and update form dialogs.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::form::UpdateForm;
use crate::app::{AppState, DeleteChoice};
use crate::gate::GateState;
use crate::ui::components::centered_rect;

/// Caption of the delete button: the remaining seconds while it is locked.
pub fn delete_button_label(state: GateState) -> String {
    if state.action_enabled {
        "Delete".to_string()
    } else {
        format!("Delete ({})", state.remaining_seconds)
    }
}

pub fn render_delete_gate(f: &mut Frame, area: Rect, app: &AppState) {
    let state = app.delete_gate.state();
    let rect = centered_rect(56, 9, area);

    let button = |label: String, focused: bool, style: Style| {
        let style = if focused {
            style.add_modifier(Modifier::REVERSED | Modifier::BOLD)
        } else {
            style
        };
        Span::styled(format!(" {label} "), style)
    };
    let cancel = button(
        "Cancel".to_string(),
        app.delete_focus == DeleteChoice::Cancel,
        Style::default().fg(app.theme.text),
    );
    let delete_style = if state.action_enabled {
        Style::default().fg(app.theme.danger)
    } else {
        Style::default().fg(app.theme.muted).add_modifier(Modifier::DIM)
    };
    let delete = button(
        delete_button_label(state),
        app.delete_focus == DeleteChoice::Delete,
        delete_style,
    );

    let lines = vec![
        Line::raw("Are you sure you want to delete this account?"),
        Line::styled("This action cannot be undone.", Style::default().fg(app.theme.danger)),
        Line::raw(""),
        Line::from(vec![cancel, Span::raw("    "), delete]).alignment(Alignment::Center),
        Line::raw(""),
        Line::styled(
            "←/→ choose  Enter select  y delete  Esc cancel",
            Style::default().fg(app.theme.muted),
        ),
    ];
    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title("Confirm account deletion")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.danger)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

pub fn render_update_form(f: &mut Frame, area: Rect, app: &AppState, form: &UpdateForm) {
    let label_w = form.fields.iter().map(|fl| fl.key.label().len()).max().unwrap_or(0);
    let mut lines: Vec<Line> = Vec::new();
    for (idx, field) in form.fields.iter().enumerate() {
        let focused = idx == form.selected;
        let marker = if focused { "▶ " } else { "  " };
        let mut value = field.value.display();
        if focused && matches!(field.value, crate::app::form::FieldValue::Text(_)) {
            value.push('_');
        }
        let value_style = if focused {
            Style::default().fg(app.theme.highlight_fg).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text)
        };
        lines.push(Line::from(vec![
            Span::raw(marker),
            Span::styled(
                format!("{:<w$}  ", field.key.label(), w = label_w),
                Style::default().fg(app.theme.muted),
            ),
            Span::styled(value, value_style),
        ]));
    }
    lines.push(Line::raw(""));
    for err in &form.errors {
        lines.push(Line::styled(err.clone(), Style::default().fg(app.theme.danger)));
    }
    if form.submitting {
        lines.push(Line::styled("Saving...", Style::default().fg(app.theme.muted)));
    } else {
        lines.push(Line::styled(
            "↑/↓ field  Space/←/→ toggle  Enter save  Esc cancel",
            Style::default().fg(app.theme.muted),
        ));
    }

    let height = (lines.len() as u16).saturating_add(2);
    let rect = centered_rect(64, height, area);
    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(form.title())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
