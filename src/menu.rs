use std::io::{BufRead, Write};

use anyhow::{Context, Result};

use crate::render::ChartKind;
use crate::session::Session;

/// A parsed menu choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Chart(ChartKind),
    All,
    Preview,
    Report,
    Quit,
}

impl Command {
    /// Map one input line to a command. `None` for anything unrecognised.
    pub fn parse(line: &str) -> Option<Self> {
        let choice = line.trim().to_ascii_lowercase();
        let cmd = match choice.as_str() {
            "1" => Command::Chart(ChartKind::Line),
            "2" => Command::Chart(ChartKind::Bar),
            "3" => Command::Chart(ChartKind::Scatter),
            "4" => Command::Chart(ChartKind::Histogram),
            "5" => Command::Chart(ChartKind::Heatmap),
            "6" => Command::All,
            "7" => Command::Preview,
            "8" => Command::Report,
            "9" | "q" | "quit" | "exit" => Command::Quit,
            _ => return None,
        };
        Some(cmd)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    AwaitingInput,
    Dispatching(Command),
    Done,
}

impl MenuState {
    /// Transition out of `AwaitingInput` for one line of input; `None` is end
    /// of input and quits.
    pub fn on_input(line: Option<&str>) -> MenuState {
        match line {
            None => MenuState::Dispatching(Command::Quit),
            Some(line) => Command::parse(line).map_or(MenuState::AwaitingInput, MenuState::Dispatching),
        }
    }

    /// Transition after a command has run.
    pub fn after(command: Command) -> MenuState {
        match command {
            Command::Quit => MenuState::Done,
            _ => MenuState::AwaitingInput,
        }
    }
}

pub fn display_banner<W: Write>(out: &mut W) -> Result<()> {
    let rule = "=".repeat(60);
    writeln!(out, "{rule}")?;
    writeln!(out, "           DATAVISUALIZER")?;
    writeln!(out, "     Business Data Visualization Tool")?;
    writeln!(out, "{rule}\n")?;
    Ok(())
}

fn display_menu<W: Write>(out: &mut W) -> Result<()> {
    let rule = "=".repeat(60);
    writeln!(out, "\n{rule}\nVISUALIZATION OPTIONS\n{rule}")?;
    writeln!(out, "1. Line Plot - Show trends over time")?;
    writeln!(out, "2. Bar Chart - Compare different metrics")?;
    writeln!(out, "3. Scatter Plot - Analyze relationships")?;
    writeln!(out, "4. Histogram - Show data distribution")?;
    writeln!(out, "5. Heatmap - Correlation analysis")?;
    writeln!(out, "6. Generate All Plots")?;
    writeln!(out, "7. Show Data Preview")?;
    writeln!(out, "8. Save Analysis Report")?;
    writeln!(out, "9. Exit")?;
    writeln!(out)?;
    Ok(())
}

/// Drive the session from `input` until quit or end of input.
pub fn run<R: BufRead, W: Write>(session: &mut Session, mut input: R, out: &mut W) -> Result<()> {
    let mut state = MenuState::AwaitingInput;
    let mut show_menu = true;
    let mut buf = Vec::new();

    loop {
        state = match state {
            MenuState::AwaitingInput => {
                if show_menu {
                    display_menu(out)?;
                }
                write!(out, "Enter your choice (1-9): ")?;
                out.flush()?;

                buf.clear();
                let read = input.read_until(b'\n', &mut buf).context("reading menu choice")?;
                // Undecodable bytes become U+FFFD and fail to parse like any other typo.
                let line = String::from_utf8_lossy(&buf);
                let next = MenuState::on_input((read > 0).then_some(line.as_ref()));
                show_menu = next != MenuState::AwaitingInput;
                if !show_menu {
                    writeln!(out, "Please enter a number between 1 and 9.")?;
                }
                next
            }
            MenuState::Dispatching(command) => {
                log::debug!("Dispatching {command:?}");
                session.execute(command, out)?;
                MenuState::after(command)
            }
            MenuState::Done => return Ok(()),
        };
    }
}
