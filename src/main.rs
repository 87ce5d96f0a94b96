// rodrego: INC/DEB/END register machine interpreter

use std::io;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use rodrego::cli::{self, Config, Loaded};
use rodrego::interpreter::engine::Interpreter;
use rodrego::ui::App;

fn main() -> Result<()> {
    let env = env_logger::Env::default().default_filter_or("warn");
    env_logger::Builder::from_env(env).init();

    let config = Config::parse();
    let Loaded {
        program_source,
        program,
        registers,
    } = cli::load(&config)?;

    if config.tui {
        let interpreter = Interpreter::new(program, registers);
        let mut app = App::new(interpreter, &program_source, config.history_limit);
        return run_tui(&mut app);
    }

    let summary = cli::run_console(
        &config,
        program,
        registers,
        io::stdout().lock(),
        io::stdin().lock(),
    )?;
    log::info!("finished in {} step(s)", summary.steps);
    Ok(())
}

fn run_tui(app: &mut App) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Some(fault) = app.fault() {
        eprintln!("{}", fault);
    }

    Ok(res?)
}
