//! # Console Monitor
//!
//! Terminal view of a running board: every element with its readout, and the
//! nodes of the selected element with their voltages.
//!
//! Keys: `q`/`Esc` quit, space pause/resume, arrows select an element,
//! `Enter` clicks it, `t` toggles it, `h` shows help.

use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::board::Board;
use crate::component::{Element, ElementKind};
use crate::config::ConsoleConfig;
use crate::runtime::{lock, SimControl};

/// One-line readout of an element's visible state.
pub fn element_summary(element: &Element) -> String {
    let readout = match element.kind() {
        ElementKind::Led(led) | ElementKind::Buzzer(led) => flag(led.is_on(), "on", "off"),
        ElementKind::Counter(counter) => format!("count {}", counter.value()),
        ElementKind::Voltmeter(meter) | ElementKind::DigitalVoltmeter(meter) => {
            format!("{:.2} V", meter.reading())
        }
        ElementKind::Relay(relay) => flag(relay.is_energized(), "closed", "open"),
        ElementKind::Lightbulb(bulb) => flag(bulb.is_lit(), "lit", "dark"),
        ElementKind::Flashlight(lamp) => flag(lamp.is_lit(), "lit", "dark"),
        ElementKind::Heater(heater) => flag(heater.is_on(), "heating", "off"),
        ElementKind::Pulse(pulse) => format!("{} Hz", pulse.frequency()),
        ElementKind::VarVoltage(supply) => format!("{:.2} V", supply.volts()),
        ElementKind::Comparator(cmp) => format!("ref {:.2} V", cmp.reference()),
        ElementKind::Text(label) => format!("\"{}\"", label.text()),
        _ => String::new(),
    };
    let mut line = format!("{:<20} {:<18} {}", element.name(), element.element_type(), readout);
    if element.is_degraded() {
        line.push_str(" (no source)");
    }
    line.trim_end().to_string()
}

fn flag(value: bool, on: &str, off: &str) -> String {
    if value { on } else { off }.to_string()
}

/// Node readouts of `element`: name, stored voltage and digital level.
pub fn node_lines(board: &Board, element: &Element, show_inputs: bool) -> Vec<String> {
    element
        .nodes()
        .iter()
        .filter_map(|id| board.nodes().get(*id).map(|node| (*id, node)))
        .filter(|(_, node)| show_inputs || !node.is_input())
        .map(|(id, node)| {
            let value = if node.is_input() {
                match node.child() {
                    Some(source) => board.node_state(source),
                    None => board.node_state(id),
                }
            } else {
                node.state()
            };
            format!(
                "{:<10} {:>6.2} V  {}{}",
                node.name(),
                value.volts(),
                value.level().to_char(),
                if node.is_hv() { "  HV" } else { "" }
            )
        })
        .collect()
}

/// Console UI application state
pub struct ConsoleApp {
    board: Arc<Mutex<Board>>,
    control: SimControl,
    config: ConsoleConfig,
    running: bool,
    show_help: bool,
    selected: usize,
}

impl ConsoleApp {
    pub fn new(board: Arc<Mutex<Board>>, control: SimControl, config: ConsoleConfig) -> Self {
        Self {
            board,
            control,
            config,
            running: false,
            show_help: false,
            selected: 0,
        }
    }

    pub fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        // Setup terminal
        enable_raw_mode().map_err(|e| format!("Failed to enable raw mode: {}", e))?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)
            .map_err(|e| format!("Failed to enter alternate screen: {}", e))?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        self.running = true;
        let refresh = Duration::from_millis(self.config.refresh_rate_ms);
        let mut last_draw = Instant::now().checked_sub(refresh).unwrap_or_else(Instant::now);

        while self.running {
            if let Ok(true) = event::poll(Duration::from_millis(10)) {
                if let Ok(Event::Key(key)) = event::read() {
                    self.handle_key_event(key.code);
                }
            }

            let now = Instant::now();
            if now.duration_since(last_draw) >= refresh {
                terminal.draw(|f| self.draw_ui(f))?;
                last_draw = now;
            }

            // Simulation ended on its own (tick limit reached)
            if !self.control.is_running() {
                terminal.draw(|f| self.draw_ui(f))?;
                thread::sleep(Duration::from_millis(500));
                break;
            }

            thread::sleep(Duration::from_millis(1));
        }

        // Restore terminal
        disable_raw_mode().map_err(|e| format!("Failed to disable raw mode: {}", e))?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .map_err(|e| format!("Failed to leave alternate screen: {}", e))?;
        terminal
            .show_cursor()
            .map_err(|e| format!("Failed to show cursor: {}", e))?;

        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyCode) {
        if self.show_help {
            self.show_help = false;
            return;
        }
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                debug!("Quit requested from console");
                self.running = false;
                self.control.stop();
            }
            KeyCode::Char(' ') => {
                let paused = self.control.toggle_pause();
                debug!("Simulation {}", if paused { "paused" } else { "resumed" });
            }
            KeyCode::Char('h') | KeyCode::Char('H') => {
                self.show_help = true;
            }
            KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Down => {
                let count = lock(&self.board).elements().len();
                if self.selected + 1 < count {
                    self.selected += 1;
                }
            }
            KeyCode::Enter => self.operate(false),
            KeyCode::Char('t') | KeyCode::Char('T') => self.operate(true),
            _ => {}
        }
    }

    /// Clicks or toggles the selected element.
    fn operate(&mut self, toggle: bool) {
        let mut board = lock(&self.board);
        let Some(id) = board.elements().get(self.selected).map(Element::id) else {
            return;
        };
        let result = if toggle { board.toggle(id) } else { board.click(id) };
        if let Err(e) = result {
            debug!("Console action ignored: {}", e);
        }
    }

    fn draw_ui(&self, f: &mut Frame) {
        let size = f.size();

        if self.show_help {
            self.draw_help_screen(f);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4), // Title bar
                Constraint::Min(8),    // Main content
            ])
            .split(size);

        let board = lock(&self.board);
        let state = if !self.control.is_running() {
            Span::styled("stopped", Style::default().fg(Color::Red))
        } else if self.control.is_paused() {
            Span::styled("paused", Style::default().fg(Color::Yellow))
        } else {
            Span::styled("running", Style::default().fg(Color::Green))
        };
        let title_text = vec![
            Line::from(vec![
                Span::styled(
                    "Systemboard",
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!("  tick {}  ", board.current_tick())),
                state,
                Span::raw(format!("  room {:.1} °C", board.sim().thermal.inside())),
            ]),
            Line::from(vec![
                Span::styled("q", Style::default().fg(Color::Yellow)),
                Span::raw("=quit, "),
                Span::styled("space", Style::default().fg(Color::Yellow)),
                Span::raw("=pause, "),
                Span::styled("enter", Style::default().fg(Color::Yellow)),
                Span::raw("=click, "),
                Span::styled("t", Style::default().fg(Color::Yellow)),
                Span::raw("=toggle, "),
                Span::styled("h", Style::default().fg(Color::Yellow)),
                Span::raw("=help"),
            ]),
        ];
        let title = Paragraph::new(title_text)
            .block(Block::default().borders(Borders::ALL).title("Status"))
            .wrap(Wrap { trim: true });
        f.render_widget(title, chunks[0]);

        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[1]);

        self.draw_elements(f, content_chunks[0], &board);
        self.draw_nodes(f, content_chunks[1], &board);
    }

    fn draw_elements(&self, f: &mut Frame, area: Rect, board: &Board) {
        let items: Vec<ListItem> = board
            .elements()
            .iter()
            .enumerate()
            .map(|(index, element)| {
                let style = if index == self.selected {
                    Style::default().add_modifier(Modifier::REVERSED)
                } else if element.is_degraded() {
                    Style::default().fg(Color::DarkGray)
                } else {
                    Style::default()
                };
                ListItem::new(element_summary(element)).style(style)
            })
            .collect();
        let list = List::new(items).block(Block::default().borders(Borders::ALL).title("Elements"));
        f.render_widget(list, area);
    }

    fn draw_nodes(&self, f: &mut Frame, area: Rect, board: &Board) {
        let (title, lines) = match board.elements().get(self.selected) {
            Some(element) => (
                element.name().to_string(),
                node_lines(board, element, self.config.show_inputs),
            ),
            None => ("Nodes".to_string(), vec!["No elements on the board".to_string()]),
        };
        let text: Vec<Line> = lines.into_iter().map(Line::from).collect();
        let widget = Paragraph::new(text)
            .block(Block::default().borders(Borders::ALL).title(title))
            .wrap(Wrap { trim: true });
        f.render_widget(widget, area);
    }

    fn draw_help_screen(&self, f: &mut Frame) {
        let size = f.size();
        let key = |k: &'static str, what: &'static str| {
            Line::from(vec![
                Span::styled(format!("  {:<8}", k), Style::default().fg(Color::Yellow)),
                Span::raw(what),
            ])
        };
        let help_text = vec![
            Line::from(vec![Span::styled(
                "Systemboard Console Help",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            key("q, Esc", " - Quit"),
            key("space", " - Pause or resume ticking"),
            key("Up/Down", " - Select an element"),
            key("Enter", " - Click the selected button for one tick"),
            key("t", " - Toggle the selected switch, flashlight or pulse"),
            key("h", " - Show this help"),
            Line::from(""),
            Line::from("Levels: 1 high, 0 low, ~ between thresholds"),
            Line::from(""),
            Line::from(vec![Span::raw("Press any key to return to main view...")]),
        ];

        let help = Paragraph::new(help_text)
            .style(Style::default().fg(Color::White))
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Help"));
        f.render_widget(help, size);
    }
}

/// Public interface for launching the console
pub fn run_console(
    board: Arc<Mutex<Board>>,
    control: SimControl,
    config: ConsoleConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = ConsoleApp::new(board, control, config);
    app.run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{ElementType, Params};
    use crate::types::Position;

    #[test]
    fn test_summary_and_node_lines() {
        let mut board = Board::default();
        let supply = board
            .add_element(ElementType::VarVoltage, Position::default(), &Params::new())
            .unwrap();
        let meter = board
            .add_element(ElementType::Voltmeter, Position::default(), &Params::new())
            .unwrap();
        board.set_parameter(supply, "inputValue", "4").unwrap();
        let out = board.element(supply).unwrap().nodes()[0];
        let probe = board.element(meter).unwrap().nodes()[0];
        board.connect(out, probe).unwrap();
        board.tick();

        let summary = element_summary(board.element(meter).unwrap());
        assert!(summary.starts_with("Voltmeter0"));
        assert!(summary.ends_with("4.00 V"));

        let lines = node_lines(&board, board.element(meter).unwrap(), true);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("4.00 V"));
        assert!(node_lines(&board, board.element(meter).unwrap(), false).is_empty());
    }
}
