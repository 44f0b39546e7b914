//! Raw-mode setup and teardown for the finance client.
//!
//! A panic inside the event loop would otherwise leave the user's shell in
//! raw mode on the alternate screen, so setup chains a hook that leaves both
//! before the default panic report is printed.

use std::{
    io::{self, Stdout},
    panic,
};

use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::error::Result;

pub type AppTerminal = Terminal<CrosstermBackend<Stdout>>;

pub fn setup_terminal() -> Result<AppTerminal> {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        if let Err(err) = leave_screen(&mut io::stdout()) {
            tracing::error!(%err, "failed to restore terminal after panic");
        }
        default_hook(info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    tracing::debug!("terminal switched to raw mode");
    Ok(terminal)
}

pub fn restore_terminal(terminal: &mut AppTerminal) -> Result<()> {
    leave_screen(terminal.backend_mut())?;
    terminal.show_cursor()?;
    tracing::debug!("terminal restored");
    Ok(())
}

fn leave_screen(out: &mut impl io::Write) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(out, LeaveAlternateScreen)
}
