use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::time::Duration;
use tracing::{error, info};

mod app;
mod cli;
mod config;
mod controller;
mod fs;
mod input;
mod logging;
mod models;
mod render;
mod store;
mod ui;
mod view;

use app::App;
use cli::{Cli, Environment};
use fs::SlotStorage;
use logging::LogTarget;

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        error!(error = %format!("{:#}", err), "study-tracker failed");
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let env = Environment::prepare(&cli)?;

    // 处理 CLI 命令
    if let Some(command) = &cli.command {
        logging::init_tracing(cli.verbose, LogTarget::Stderr)?;
        return cli::run_command(command, &env);
    }

    // TUI 模式：终端被占用，日志写入数据目录
    logging::init_tracing(cli.verbose, LogTarget::File(&env.data_dir))?;
    let controller = env.open_controller()?;
    let store = controller.store();
    info!(
        file = %store.storage().path_for(store.key()).display(),
        tasks = store.len(),
        "starting terminal ui"
    );
    if store.is_empty() {
        info!(slot = store.key(), "no saved tasks, starting empty");
    }
    let mut app = App::new(controller);

    // 设置终端
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // 恢复终端
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run_app<B, S>(terminal: &mut Terminal<B>, app: &mut App<S>) -> Result<()>
where
    B: ratatui::backend::Backend,
    S: SlotStorage,
{
    loop {
        app.clear_expired_notification();
        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                // Windows 上会同时收到按下和释放事件
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if !input::handle_key_input(app, key) {
                    info!("quit");
                    return Ok(());
                }
            }
        }
    }
}
