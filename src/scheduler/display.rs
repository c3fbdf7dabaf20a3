use super::{
    runner::{Frame, RunnerEvent},
    Schedule,
};
use crossterm::event::{self, Event, KeyCode, KeyEvent};
use std::{
    io::{self, Stdout},
    sync::mpsc::{self, Receiver},
    thread,
    time::{Duration, Instant},
};
use tui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table},
    Terminal,
};

pub enum DisplayEvent {
    Input(KeyEvent),
    Tick,
}

const HELP: &str = "q quit | p pause | r resume | s step | n next policy";

pub struct DisplayTerminal {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    input_rx: Receiver<DisplayEvent>,
}

impl DisplayTerminal {
    pub fn new(tick_rate: Duration) -> Result<Self, io::Error> {
        crossterm::terminal::enable_raw_mode()?;

        // Forward key presses and replay ticks from a dedicated thread
        let (input_tx, input_rx) = mpsc::channel();
        thread::spawn(move || {
            let mut last_tick = Instant::now();
            loop {
                let timeout = tick_rate
                    .checked_sub(last_tick.elapsed())
                    .unwrap_or(Duration::ZERO);

                match event::poll(timeout) {
                    Ok(true) => {
                        if let Ok(Event::Key(key)) = event::read() {
                            if input_tx.send(DisplayEvent::Input(key)).is_err() {
                                break;
                            }
                        }
                    }
                    Ok(false) => {}
                    Err(err) => {
                        log::error!("failed to poll terminal events: {err}");
                        break;
                    }
                }

                if last_tick.elapsed() >= tick_rate {
                    if input_tx.send(DisplayEvent::Tick).is_err() {
                        break;
                    }
                    last_tick = Instant::now();
                }
            }
        });

        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::new(backend)?;

        Ok(Self { terminal, input_rx })
    }

    pub fn draw(&mut self, schedule: &Schedule, frame: &Frame, paused: bool) -> io::Result<()> {
        let title = format!("{} ({})", schedule.policy.name(), schedule.policy);
        let summary = if frame.done {
            schedule
                .summary()
                .map(|summary| summary.to_string())
                .unwrap_or_else(|err| format!("error: {err}"))
        } else {
            format!("Replaying slice {} of {}", frame.cursor, schedule.timeline.len())
        };

        self.terminal
            .draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .margin(1)
                    .constraints([
                        Constraint::Length(3),
                        Constraint::Min(5),
                        Constraint::Length(6),
                    ])
                    .split(f.size());

                let status = match frame.current {
                    Some(slice) => format!(
                        "t={}ms | P{} ran {}-{}ms{}",
                        frame.now,
                        slice.pid,
                        slice.start,
                        slice.end,
                        if paused { " | paused" } else { "" }
                    ),
                    None => "The CPU has not been dispatched yet.".to_owned(),
                };
                let current = Paragraph::new(status)
                    .style(
                        Style::default()
                            .add_modifier(Modifier::BOLD)
                            .fg(Color::LightBlue),
                    )
                    .block(
                        Block::default()
                            .borders(Borders::ALL)
                            .title("Current Slice")
                            .border_type(BorderType::Rounded),
                    );

                f.render_widget(current, chunks[0]);

                let items = schedule.processes.iter().map(|process| {
                    let remaining = frame.remaining_of(process.pid()).unwrap_or(0);
                    // Completion columns stay blank until the replay reaches them.
                    let finished = |value: Option<u64>| match value {
                        Some(value) if remaining == 0 => value.to_string(),
                        _ => "-".to_owned(),
                    };
                    let running = frame
                        .current
                        .map_or(false, |slice| slice.pid == process.pid());

                    let row = Row::new(vec![
                        Cell::from(format!("P{}", process.pid()))
                            .style(Style::default().add_modifier(Modifier::BOLD)),
                        Cell::from(process.arrival().to_string()),
                        Cell::from(process.burst().to_string()),
                        Cell::from(remaining.to_string()),
                        Cell::from(finished(process.finish())),
                        Cell::from(finished(process.waiting())),
                        Cell::from(finished(process.turnaround())),
                    ]);
                    if running {
                        row.style(Style::default().fg(Color::Yellow))
                    } else {
                        row
                    }
                });

                let table = Table::new(items)
                    .header(
                        Row::new(vec![
                            "PID",
                            "Arrival",
                            "Burst",
                            "Remaining",
                            "Finish",
                            "Waiting",
                            "Turnaround",
                        ])
                        .style(Style::default().add_modifier(Modifier::BOLD)),
                    )
                    .widths(&[
                        Constraint::Length(5),
                        Constraint::Length(8),
                        Constraint::Length(6),
                        Constraint::Length(10),
                        Constraint::Length(7),
                        Constraint::Length(8),
                        Constraint::Length(10),
                    ])
                    .block(Block::default().title(title.as_str()).borders(Borders::ALL))
                    .style(Style::default().fg(Color::LightGreen))
                    .column_spacing(1);

                f.render_widget(table, chunks[1]);

                let footer = Paragraph::new(format!("{summary}\n{HELP}")).block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title("Summary")
                        .border_type(BorderType::Rounded),
                );

                f.render_widget(footer, chunks[2]);
            })
            .map(|_| ())
    }

    pub fn get_input(&self) -> RunnerEvent {
        // The input thread only hangs up when the terminal is gone
        let Ok(event) = self.input_rx.recv() else {
            return RunnerEvent::Quit;
        };

        match event {
            DisplayEvent::Input(key) => {
                if key.modifiers.is_empty() {
                    match key.code {
                        KeyCode::Char('q') => return RunnerEvent::Quit,
                        KeyCode::Char('p') => return RunnerEvent::Pause,
                        KeyCode::Char('r') => return RunnerEvent::Resume,
                        KeyCode::Char('s') => return RunnerEvent::Step,
                        KeyCode::Char('n') => return RunnerEvent::NextPolicy,
                        _ => {}
                    };
                }
            }
            DisplayEvent::Tick => return RunnerEvent::Tick,
        }
        RunnerEvent::None
    }
}

impl Drop for DisplayTerminal {
    fn drop(&mut self) {
        let _ = crossterm::terminal::disable_raw_mode();
    }
}
