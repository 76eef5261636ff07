use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Paragraph};

use crate::tui::component::Component;
use crate::tui::components::{MainConversation, StatusBar};

pub fn draw_ui(frame: &mut Frame, main: &mut MainConversation, status_message: &str) {
    use Constraint::{Length, Min};
    let [main_area, status_area] = Layout::vertical([Min(0), Length(1)]).areas(frame.area());

    if main.is_empty() {
        draw_empty_view(frame, main_area);
    } else {
        main.render(frame, main_area);
    }

    let tab_position = (!main.is_empty()).then(|| (main.active_index() + 1, main.len()));
    let mut status_bar = StatusBar::new(tab_position, status_message.to_string());
    status_bar.render(frame, status_area);
}

fn draw_empty_view(frame: &mut Frame, area: Rect) {
    use ratatui::layout::Alignment;

    let hint = Paragraph::new("No open conversations. Press Ctrl+N to start one.")
        .block(Block::bordered().title("parley"))
        .style(Style::default().add_modifier(Modifier::DIM))
        .alignment(Alignment::Center);
    frame.render_widget(hint, area);
}
