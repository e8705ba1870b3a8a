/// Cell formatting and small widgets shared by the results view
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::analysis::scoring::CRITERIA_COUNT;
use crate::models::CellValue;

/// Text for one table cell; absent values render as `-`
pub fn display_cell(cell: &CellValue) -> String {
    match cell {
        CellValue::Text(text) => text.clone(),
        CellValue::Number(Some(value)) => format!("{:.2}", value),
        CellValue::Flag(Some(true)) => "Yes".to_string(),
        CellValue::Flag(Some(false)) => "No".to_string(),
        CellValue::Number(None) | CellValue::Flag(None) => "-".to_string(),
        CellValue::Score(score) => format!("{}/{}", score, CRITERIA_COUNT),
    }
}

/// Score colored by how close it is to a full pass
pub fn styled_score(score: u8) -> Span<'static> {
    let color = if score == CRITERIA_COUNT {
        Color::Green
    } else if score >= 4 {
        Color::Yellow
    } else {
        Color::Red
    };
    Span::styled(
        format!("{}/{}", score, CRITERIA_COUNT),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )
}

pub fn render_warning(f: &mut Frame, area: Rect, title: &str, message: &str) {
    let warning = Paragraph::new(message.to_string())
        .block(Block::default().borders(Borders::ALL).title(title.to_string()))
        .style(Style::default().fg(Color::Yellow))
        .wrap(Wrap { trim: true });

    f.render_widget(warning, area);
}
