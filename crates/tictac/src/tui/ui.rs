//! Stateless UI rendering.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use tictac_engine::{GameView, Mark, Mode, Phase, Position};

use crate::scoreboard::Scoreboard;

const SETUP_HELP: &str = "m: mode | x: your mark | Enter: start | q: quit";
const PLAY_HELP: &str = "Arrows + Enter or 1-9: place | r: reset | s: setup | q: quit";

/// Renders one frame: setup screen or board depending on the phase.
pub fn draw(frame: &mut Frame, view: &GameView, cursor: Position, status: &str, score: &Scoreboard) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(11),   // Body
            Constraint::Length(3), // Status
            Constraint::Length(1), // Help
        ])
        .split(area);

    let title = Paragraph::new(format!("Tic Tac Toe  [{}]", score))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    let help = match view.phase {
        Phase::Setup => {
            draw_setup(frame, chunks[1], view);
            SETUP_HELP
        }
        Phase::Playing => {
            draw_board(frame, chunks[1], view, cursor);
            PLAY_HELP
        }
    };

    let status_text = Paragraph::new(status)
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status_text, chunks[2]);

    let help_text = Paragraph::new(help)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(help_text, chunks[3]);
}

fn draw_setup(frame: &mut Frame, area: Rect, view: &GameView) {
    let area = center_rect(area, 40, 6);
    let highlight = Style::default().fg(Color::Green).add_modifier(Modifier::BOLD);

    let mut lines = vec![Line::from(vec![
        Span::raw("Mode:      "),
        Span::styled(view.mode.to_string(), highlight),
    ])];
    if view.mode == Mode::HumanVsComputer {
        lines.push(Line::from(vec![
            Span::raw("You play:  "),
            Span::styled(view.human_mark.to_string(), mark_style(view.human_mark)),
        ]));
        lines.push(Line::from(format!("Computer:  {}", view.computer_mark)));
    }

    let setup = Paragraph::new(lines).block(Block::default().title("New game").borders(Borders::ALL));
    frame.render_widget(setup, area);
}

fn draw_board(frame: &mut Frame, area: Rect, view: &GameView, cursor: Position) {
    let board_area = center_rect(area, 38, 11);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(board_area);

    for (row, chunk) in [rows[0], rows[2], rows[4]].into_iter().enumerate() {
        draw_row(frame, chunk, view, cursor, row);
    }
    draw_separator(frame, rows[1]);
    draw_separator(frame, rows[3]);
}

fn draw_row(frame: &mut Frame, area: Rect, view: &GameView, cursor: Position, row: usize) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(12),
            Constraint::Length(1),
            Constraint::Length(12),
            Constraint::Length(1),
            Constraint::Length(12),
        ])
        .split(area);

    for (col, chunk) in [cols[0], cols[2], cols[4]].into_iter().enumerate() {
        draw_cell(frame, chunk, view, cursor, row * 3 + col);
    }
    draw_separator_vertical(frame, cols[1]);
    draw_separator_vertical(frame, cols[3]);
}

fn draw_cell(frame: &mut Frame, area: Rect, view: &GameView, cursor: Position, index: usize) {
    let (symbol, base_style) = match view.cells[index] {
        None => (format!(" {} ", index + 1), Style::default().fg(Color::DarkGray)),
        Some(mark) => (format!(" {} ", mark), mark_style(mark)),
    };

    let style = if view.is_winning_cell(index) {
        base_style.bg(Color::Green).fg(Color::Black)
    } else if index == cursor.to_index() && !view.outcome.is_terminal() {
        base_style.bg(Color::White).fg(Color::Black)
    } else {
        base_style
    };

    // Vertically center the symbol in the 3-line cell.
    let lines = vec![Line::default(), Line::from(Span::styled(symbol, style))];
    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn mark_style(mark: Mark) -> Style {
    let color = match mark {
        Mark::X => Color::Blue,
        Mark::O => Color::Red,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

fn draw_separator(frame: &mut Frame, area: Rect) {
    let sep = Paragraph::new("─".repeat(area.width as usize)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(sep, area);
}

fn draw_separator_vertical(frame: &mut Frame, area: Rect) {
    let sep = Paragraph::new(vec![Line::from("│"); area.height as usize])
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(sep, area);
}

fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(area.height.saturating_sub(height) / 2),
            Constraint::Length(height),
            Constraint::Length(area.height.saturating_sub(height) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(area.width.saturating_sub(width) / 2),
            Constraint::Length(width),
            Constraint::Length(area.width.saturating_sub(width) / 2),
        ])
        .split(vert[1])[1]
}
