pub mod components;
pub mod detail;
pub mod modals;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{AccountView, AppState, ModalState};

pub fn render(f: &mut Frame, app: &AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5), Constraint::Length(1)].as_ref())
        .split(f.area());

    let title = match &app.account {
        AccountView::Loaded(a) => format!("Account detail: {}", a.username),
        _ => format!("Account detail: #{}", app.account_id),
    };
    let header = Paragraph::new(title)
        .block(
            Block::default()
                .title("account-admin")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .style(Style::default().fg(app.theme.header_fg).bg(app.theme.header_bg));
    f.render_widget(header, root[0]);

    match &app.account {
        AccountView::Loaded(account) => detail::render_account(f, root[1], app, account),
        other => detail::render_placeholder(f, root[1], app, other),
    }

    components::render_status_bar(f, root[2], app);

    let area = f.area();
    match &app.modal {
        Some(ModalState::UpdateForm(form)) => modals::render_update_form(f, area, app, form),
        Some(ModalState::Help { scroll }) => components::render_help_modal(f, area, app, *scroll),
        None => {}
    }
    if app.delete_gate.is_open() {
        modals::render_delete_gate(f, area, app);
    }

    components::render_notifications(f, area, app);
}
