use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame, Terminal,
};
use std::io;

use super::components::{display_cell, render_warning, styled_score};
use crate::analysis::SortSpec;
use crate::models::{Column, CompanyRecord};
use crate::pipeline::ScreenReport;

/// Columns shown on screen; sector and industry stay in the export only
const DISPLAY_COLUMNS: [Column; 10] = [
    Column::Name,
    Column::Ticker,
    Column::Price,
    Column::PriceEarnings,
    Column::PriceToBook,
    Column::DebtToEquity,
    Column::DividendYield,
    Column::MarketCap,
    Column::NetProfitPositive,
    Column::GrahamScore,
];

const DISPLAY_WIDTHS: [Constraint; 10] = [
    Constraint::Min(20),
    Constraint::Length(10),
    Constraint::Length(10),
    Constraint::Length(8),
    Constraint::Length(8),
    Constraint::Length(12),
    Constraint::Length(12),
    Constraint::Length(12),
    Constraint::Length(10),
    Constraint::Length(8),
];

/// Interactive results table for one finished screen run
pub struct ResultsApp {
    report: ScreenReport,
    sort: SortSpec,
    pub should_quit: bool,
}

impl ResultsApp {
    pub fn new(report: ScreenReport) -> Self {
        let sort = report.view.sort;
        Self {
            report,
            sort,
            should_quit: false,
        }
    }

    pub fn sort(&self) -> SortSpec {
        self.sort
    }

    pub fn report(&self) -> &ScreenReport {
        &self.report
    }

    pub fn handle_key_event(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('s') => {
                self.sort.column = self.sort.column.next();
                self.report.resort(self.sort);
            }
            KeyCode::Char('o') => {
                self.sort.ascending = !self.sort.ascending;
                self.report.resort(self.sort);
            }
            _ => {}
        }
    }

    pub fn draw(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),      // Criteria summary
                Constraint::Percentage(50), // All selected companies
                Constraint::Min(5),         // Passing subset
                Constraint::Length(4),      // Fetch errors and keys
            ])
            .split(f.area());

        self.render_criteria(f, chunks[0]);
        self.render_full_table(f, chunks[1]);
        self.render_passing(f, chunks[2]);
        self.render_status_bar(f, chunks[3]);
    }

    fn render_criteria(&self, f: &mut Frame, area: Rect) {
        let paragraph = Paragraph::new(self.report.thresholds.to_string())
            .block(Block::default().borders(Borders::ALL).title("📐 Graham Screener"))
            .style(Style::default().fg(Color::Cyan));

        f.render_widget(paragraph, area);
    }

    fn render_full_table(&self, f: &mut Frame, area: Rect) {
        let rows = self.report.view.full_table.iter().map(|row| {
            let style = if row.highlight {
                Style::default().bg(Color::LightGreen).fg(Color::Black)
            } else {
                Style::default()
            };
            self.record_row(&row.record).style(style)
        });

        let table = Table::new(rows, DISPLAY_WIDTHS)
            .header(self.header_row())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("All selected companies ({})", self.report.view.full_table.len())),
            );

        f.render_widget(table, area);
    }

    fn render_passing(&self, f: &mut Frame, area: Rect) {
        let passing = &self.report.view.passing;
        if passing.is_empty() {
            render_warning(
                f,
                area,
                "Stocks meeting all Graham criteria",
                "⚠️ No stock meets all Graham criteria with the current thresholds.",
            );
            return;
        }

        let rows = passing.iter().map(|record| self.record_row(record));
        let table = Table::new(rows, DISPLAY_WIDTHS)
            .header(self.header_row())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("Stocks meeting all Graham criteria ({})", passing.len())),
            )
            .style(Style::default().fg(Color::Green));

        f.render_widget(table, area);
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let errors = if self.report.fetch_errors.is_empty() {
            Line::from(Span::styled("All tickers returned data", Style::default().fg(Color::Gray)))
        } else {
            Line::from(vec![
                Span::styled("❌ Data unavailable for: ", Style::default().fg(Color::Red)),
                Span::raw(self.report.fetch_errors.join(", ")),
            ])
        };

        let direction = if self.sort.ascending { "ascending" } else { "descending" };
        let keys = Line::from(vec![
            Span::styled(
                format!("Sorted by {} ({}) • ", self.sort.column, direction),
                Style::default().fg(Color::Gray),
            ),
            Span::styled("S", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::styled(" next column • ", Style::default().fg(Color::Gray)),
            Span::styled("O", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::styled(" toggle order • ", Style::default().fg(Color::Gray)),
            Span::styled("Q", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Span::styled(" to quit", Style::default().fg(Color::Gray)),
        ]);

        let paragraph = Paragraph::new(vec![errors, keys]).block(Block::default().borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }

    fn header_row(&self) -> Row<'static> {
        let cells = DISPLAY_COLUMNS.iter().map(|column| {
            let marker = match (*column == self.sort.column, self.sort.ascending) {
                (true, true) => " ▲",
                (true, false) => " ▼",
                (false, _) => "",
            };
            Cell::from(format!("{}{}", column.header(), marker))
        });

        Row::new(cells).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    }

    fn record_row(&self, record: &CompanyRecord) -> Row<'static> {
        let cells = DISPLAY_COLUMNS.iter().map(|column| match column {
            Column::GrahamScore => Cell::from(styled_score(record.graham_score)),
            other => Cell::from(display_cell(&record.cell(*other))),
        });
        Row::new(cells)
    }

    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        loop {
            terminal.draw(|f| self.draw(f))?;

            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key_event(key.code);
                }
            }

            if self.should_quit {
                return Ok(());
            }
        }
    }
}

/// Show the report in the alternate screen until the user quits
pub fn run_results_view(report: ScreenReport) -> Result<()> {
    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let mut app = ResultsApp::new(report);
    let result = app.run(&mut terminal);

    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;

    result
}
