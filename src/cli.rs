use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::info;

use crate::config::{self, Config};
use crate::controller::{Controller, NoticeLevel, Reply};
use crate::fs::FileSlots;
use crate::models::TaskForm;
use crate::render::{html, text};
use crate::store::TaskStore;
use crate::view::TaskAction;

#[derive(Parser, Debug)]
#[command(
    name = "study-tracker",
    version,
    about = "Track study tasks with due dates, a timeline and progress stats",
    long_about = "Track study tasks with due dates, a timeline and progress stats.\n\nRun without a command to open the terminal UI."
)]
pub struct Cli {
    /// 日志详细程度（-v info, -vv debug, -vvv trace）
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Data directory holding the task slot
    #[arg(long = "data", global = true)]
    pub data: Option<PathBuf>,

    /// Config file (default: platform config dir)
    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Add a task
    Add {
        #[arg(short, long)]
        title: String,
        /// Due date, YYYY-MM-DD, not before today
        #[arg(short = 'd', long)]
        due: String,
        #[arg(short = 'D', long, default_value = "")]
        description: String,
        /// low, medium or high
        #[arg(short, long, default_value = "medium")]
        priority: String,
    },
    /// List all tasks by due date
    List,
    /// Show the recent list
    Recent,
    /// Show pending tasks grouped by due date
    Timeline,
    /// Show completion statistics
    Stats,
    /// Mark a task as completed
    Complete { id: u64 },
    /// Delete a task
    Delete {
        id: u64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Export the dashboard as an HTML page
    Export {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigCommand>,
    },
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,
    /// Print the config file location
    Path,
    /// Write a config file with default values
    Init,
}

/// 运行环境：配置、配置文件路径、数据目录
#[derive(Debug, Clone)]
pub struct Environment {
    pub config: Config,
    pub config_path: PathBuf,
    pub data_dir: PathBuf,
}

impl Environment {
    pub fn prepare(cli: &Cli) -> Result<Self> {
        let config_path = match &cli.config {
            Some(path) => path.clone(),
            None => config::get_config_path()?,
        };
        let config = config::load_config(&config_path)?;
        let data_dir = config::resolve_data_dir(&config, cli.data.as_deref())
            .context("failed to resolve data directory")?;

        Ok(Self {
            config,
            config_path,
            data_dir,
        })
    }

    pub fn open_controller(&self) -> Result<Controller<FileSlots>> {
        let slots = FileSlots::open(&self.data_dir).with_context(|| {
            format!("failed to open data directory {}", self.data_dir.display())
        })?;
        let store = TaskStore::load(slots, &self.config.storage_key);
        Ok(Controller::new(store, self.config.confirm_delete))
    }
}

/// 执行命令行子命令
pub fn run_command(command: &Command, env: &Environment) -> Result<()> {
    info!(?command, data_dir = %env.data_dir.display(), "running command");

    if let Command::Config { action } = command {
        return run_config_command(action.unwrap_or(ConfigCommand::Show), env);
    }

    let mut controller = env.open_controller()?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match command {
        Command::Add {
            title,
            due,
            description,
            priority,
        } => {
            let form = TaskForm::new(title, description, due, priority);
            let today = chrono::Local::now().date_naive();
            let reply = controller.submit(&form, today)?;
            report(&mut out, reply)?;
            if let Some(task) = controller.store().all().last() {
                writeln!(out, "id: {}", task.id)?;
            }
        }
        Command::List => {
            write!(out, "{}", text::render_list(&controller.dashboard().all))?;
        }
        Command::Recent => {
            write!(out, "{}", text::render_list(&controller.dashboard().recent))?;
        }
        Command::Timeline => {
            write!(out, "{}", text::render_timeline(&controller.dashboard().timeline))?;
        }
        Command::Stats => {
            write!(out, "{}", text::render_stats(&controller.dashboard().stats))?;
        }
        Command::Complete { id } => {
            let reply = controller.activate(TaskAction::Complete(*id));
            report(&mut out, reply)?;
        }
        Command::Delete { id, yes } => {
            let mut reply = controller.activate(TaskAction::Delete(*id));
            if let Reply::Confirm(request) = &reply {
                let confirmed =
                    *yes || prompt_yes_no(&mut out, &request.message, &mut io::stdin().lock())?;
                reply = controller.respond(confirmed);
            }
            report(&mut out, reply)?;
        }
        Command::Export { output } => {
            let page = html::render_page(controller.dashboard());
            match output {
                Some(path) => {
                    std::fs::write(path, page)
                        .with_context(|| format!("failed writing {}", path.display()))?;
                    writeln!(out, "exported to {}", path.display())?;
                }
                None => write!(out, "{}", page)?,
            }
        }
        // 已在上方处理
        Command::Config { .. } => {}
    }

    Ok(())
}

fn run_config_command(action: ConfigCommand, env: &Environment) -> Result<()> {
    match action {
        ConfigCommand::Show => config::show_config(&env.config, &env.config_path, &env.data_dir),
        ConfigCommand::Path => println!("{}", env.config_path.display()),
        ConfigCommand::Init => {
            if env.config_path.exists() {
                bail!("config file already exists: {}", env.config_path.display());
            }
            config::save_config(&env.config_path, &Config::default())?;
            println!("✓ wrote {}", env.config_path.display());
        }
    }
    Ok(())
}

/// 输出控制器的回复；保存失败视为错误
fn report(out: &mut impl Write, reply: Reply) -> Result<()> {
    match reply {
        Reply::Rendered => writeln!(out, "ok")?,
        Reply::Notice(notice) => match notice.level {
            NoticeLevel::Warning => bail!(notice.message),
            NoticeLevel::Info | NoticeLevel::Success => writeln!(out, "{}", notice.message)?,
        },
        Reply::Confirm(request) => writeln!(out, "{} (not answered)", request.message)?,
    }
    Ok(())
}

/// Blocking y/N question on the terminal; anything but y/yes declines
fn prompt_yes_no(out: &mut impl Write, message: &str, input: &mut impl BufRead) -> Result<bool> {
    write!(out, "{} [y/N] ", message)?;
    out.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_no_command_means_tui() {
        let cli = Cli::try_parse_from(["study-tracker"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_parse_add() {
        let cli = Cli::try_parse_from([
            "study-tracker",
            "-vv",
            "add",
            "--title",
            "Read chapter 3",
            "--due",
            "2099-01-01",
            "-p",
            "high",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        assert_eq!(
            cli.command,
            Some(Command::Add {
                title: "Read chapter 3".to_string(),
                due: "2099-01-01".to_string(),
                description: String::new(),
                priority: "high".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_delete_and_global_data() {
        let cli =
            Cli::try_parse_from(["study-tracker", "delete", "42", "--yes", "--data", "/tmp/x"])
                .unwrap();
        assert_eq!(cli.command, Some(Command::Delete { id: 42, yes: true }));
        assert_eq!(cli.data, Some(PathBuf::from("/tmp/x")));
    }

    #[test]
    fn test_prompt_yes_no() {
        let mut out = Vec::new();
        assert!(prompt_yes_no(&mut out, "Sure?", &mut "y\n".as_bytes()).unwrap());
        assert!(prompt_yes_no(&mut out, "Sure?", &mut " YES \n".as_bytes()).unwrap());
        assert!(!prompt_yes_no(&mut out, "Sure?", &mut "\n".as_bytes()).unwrap());
        assert!(!prompt_yes_no(&mut out, "Sure?", &mut "nope\n".as_bytes()).unwrap());
        assert!(String::from_utf8(out).unwrap().starts_with("Sure? [y/N] "));
    }

    #[test]
    fn test_commands_against_data_dir() {
        let temp = tempdir().unwrap();
        let env = Environment {
            config: Config::default(),
            config_path: temp.path().join("config.toml"),
            data_dir: temp.path().join("data"),
        };

        let add = Command::Add {
            title: "Read chapter 3".to_string(),
            due: "2099-01-01".to_string(),
            description: String::new(),
            priority: "high".to_string(),
        };
        run_command(&add, &env).unwrap();

        let controller = env.open_controller().unwrap();
        assert_eq!(controller.store().len(), 1);
        let id = controller.store().all()[0].id;

        run_command(&Command::Complete { id }, &env).unwrap();
        run_command(&Command::Delete { id, yes: true }, &env).unwrap();
        assert!(env.open_controller().unwrap().store().is_empty());

        let export = temp.path().join("page.html");
        run_command(&Command::Export { output: Some(export.clone()) }, &env).unwrap();
        assert!(std::fs::read_to_string(export).unwrap().contains("No tasks yet"));
    }

    #[test]
    fn test_add_rejects_past_due_date() {
        let temp = tempdir().unwrap();
        let env = Environment {
            config: Config::default(),
            config_path: temp.path().join("config.toml"),
            data_dir: temp.path().to_path_buf(),
        };
        let add = Command::Add {
            title: "Old".to_string(),
            due: "2000-01-01".to_string(),
            description: String::new(),
            priority: "low".to_string(),
        };
        assert!(run_command(&add, &env).is_err());
    }
}
