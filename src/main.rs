use anyhow::{bail, Context, Result as AnyhowResult};
use clap::{Args as ClapArgs, Parser, Subcommand};
use codeward::{
    app::headless::{self, LineSpan},
    app::selection_actions::ControllerSettings,
    app::Editor,
    config::{Config, DirectoryContext},
    model::document::Document,
    primitives::language::Language,
    services::action_client::{ActionKind, AnalysisService, HttpBackend},
    services::auth::{AuthClient, Session, SessionStore},
    services::terminal_modes::TerminalModes,
    services::time_source::RealTimeSource,
    services::tracing_setup,
    view::ui::execution_panel::execution_lines,
    view::ui::results_panel::result_lines,
};
use crossterm::event::{
    poll as event_poll, read as event_read, Event as CrosstermEvent, KeyEvent, KeyEventKind,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::{
    io::{self, stdout},
    path::{Path, PathBuf},
    sync::Arc,
    time::{Duration, Instant},
};

/// A terminal code editor with selection-triggered analysis actions
#[derive(Parser, Debug)]
#[command(name = "codeward")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Path to log file for editor diagnostics (default: system temp dir)
    #[arg(long, value_name = "PATH", global = true)]
    log_file: Option<PathBuf>,

    /// Override the analysis backend URL
    #[arg(long, value_name = "URL", global = true)]
    backend_url: Option<String>,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    dump_config: bool,

    /// Print the JSON Schema of the configuration file and exit
    #[arg(long)]
    dump_schema: bool,

    /// Log debug output to stderr (headless commands)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open the interactive editor (default)
    Edit {
        file: Option<PathBuf>,
        /// Language id, overriding detection from the file extension
        #[arg(long)]
        language: Option<String>,
    },
    /// Replace lines with the backend's fixed version
    Fix(ActionArgs),
    /// Insert generated test cases after the lines
    Tests(ActionArgs),
    /// Ask the backend to review the lines
    Enhance(ActionArgs),
    /// Analyze a whole file and print the report
    Analyze(FileArgs),
    /// Run a whole file on the backend and print its output
    Execute(FileArgs),
    /// Log in and remember the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account
    Signup {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Reset the password of an account
    ForgotPassword {
        #[arg(long)]
        email: String,
        #[arg(long)]
        new_password: String,
    },
    /// Forget the stored session
    Logout,
    /// List saved analyses of the logged-in user
    History,
}

#[derive(ClapArgs, Debug)]
struct ActionArgs {
    file: PathBuf,
    /// Inclusive 1-based line span, e.g. 3:5
    #[arg(long, value_name = "A:B")]
    lines: LineSpan,
    #[arg(long)]
    language: Option<String>,
    /// Print the result without writing the file
    #[arg(long)]
    dry_run: bool,
}

#[derive(ClapArgs, Debug)]
struct FileArgs {
    file: PathBuf,
    #[arg(long)]
    language: Option<String>,
}

/// Everything resolved before a command runs
struct SetupState {
    config: Config,
    session_store: SessionStore,
    backend: HttpBackend,
}

impl SetupState {
    fn user_id(&self) -> Option<String> {
        self.session_store.load().map(|s| s.user_id)
    }

    /// Explicit flag first, then the file extension, then the configured default
    fn language(&self, flag: Option<&str>, path: Option<&Path>) -> Language {
        if let Some(id) = flag {
            return Language::from_id(id);
        }
        match path.map(Language::from_path) {
            Some(Language::PlainText) | None => self.config.default_language,
            Some(detected) => detected,
        }
    }
}

fn load_config(args: &Args, dir_context: &DirectoryContext) -> AnyhowResult<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::load_or_default(&dir_context.config_path()),
    };
    if let Some(url) = &args.backend_url {
        config.backend.base_url = url.clone();
    }
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn main() -> AnyhowResult<()> {
    real_main()
}

fn real_main() -> AnyhowResult<()> {
    let args = Args::parse();

    if args.dump_schema {
        println!("{}", Config::json_schema()?);
        return Ok(());
    }

    let dir_context =
        DirectoryContext::from_system().context("Failed to determine system directories")?;
    let config = load_config(&args, &dir_context)?;

    if args.dump_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let backend = HttpBackend::new(&config.backend.base_url, config.backend.timeout());
    let state = SetupState {
        session_store: SessionStore::new(dir_context.session_path()),
        config,
        backend,
    };

    match args.command {
        None => run_editor(state, None, None, args.log_file),
        Some(Command::Edit { file, language }) => run_editor(state, file, language, args.log_file),
        Some(command) => {
            tracing_setup::init_stderr(args.verbose);
            run_headless(state, command)
        }
    }
}

fn run_headless(state: SetupState, command: Command) -> AnyhowResult<()> {
    match command {
        Command::Fix(a) => run_action(&state, ActionKind::FixIssues, a),
        Command::Tests(a) => run_action(&state, ActionKind::GenerateTests, a),
        Command::Enhance(a) => run_action(&state, ActionKind::Enhance, a),
        Command::Analyze(a) => {
            let (code, language) = read_source(&state, &a)?;
            let result = state.backend.analyze(&code, language)?;
            for line in result_lines(&result) {
                println!("{line}");
            }
            Ok(())
        }
        Command::Execute(a) => {
            let (code, language) = read_source(&state, &a)?;
            let result = state.backend.execute(&code, language)?;
            for line in execution_lines(&result) {
                println!("{line}");
            }
            Ok(())
        }
        Command::Login { email, password } => {
            let user_id = AuthClient::new(state.backend.clone()).login(&email, &password)?;
            state
                .session_store
                .save(&Session {
                    user_id,
                    email: Some(email.clone()),
                })
                .context("Failed to save session")?;
            println!("Logged in as {email}");
            Ok(())
        }
        Command::Signup {
            username,
            email,
            password,
        } => {
            AuthClient::new(state.backend.clone()).signup(&username, &email, &password)?;
            println!("Account created for {email}; run `codeward login` to sign in");
            Ok(())
        }
        Command::ForgotPassword {
            email,
            new_password,
        } => {
            let message =
                AuthClient::new(state.backend.clone()).forgot_password(&email, &new_password)?;
            println!("{message}");
            Ok(())
        }
        Command::Logout => {
            if state.session_store.clear().context("Failed to remove session")? {
                println!("Logged out");
            } else {
                println!("Not logged in");
            }
            Ok(())
        }
        Command::History => {
            let Some(user_id) = state.user_id() else {
                bail!("Not logged in; run `codeward login` first");
            };
            let entries = state.backend.history(&user_id)?;
            if entries.is_empty() {
                println!("No saved analyses");
            }
            for entry in entries {
                let score = entry
                    .analysis()
                    .map(|a| a.metrics.overall_score.to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{:>5}  {}  {:<10}  overall {}",
                    entry.id,
                    entry.created_at,
                    Language::from_id(&entry.language).label(),
                    score
                );
            }
            Ok(())
        }
        Command::Edit { .. } => Ok(()),
    }
}

fn read_source(state: &SetupState, args: &FileArgs) -> AnyhowResult<(String, Language)> {
    let code = std::fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    if code.trim().is_empty() {
        bail!("{} is empty", args.file.display());
    }
    Ok((code, state.language(args.language.as_deref(), Some(&args.file))))
}

fn run_action(state: &SetupState, kind: ActionKind, args: ActionArgs) -> AnyhowResult<()> {
    let mut document = Document::load_from_file(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let settings = ControllerSettings {
        language: state.language(args.language.as_deref(), Some(&args.file)),
        user_id: state.user_id(),
        menu_offset: state.config.editor.menu_offset,
        feedback_lifetime: state.config.editor.feedback_duration(),
    };
    // Give the worker the HTTP timeout plus a margin to report back
    let timeout = state.config.backend.timeout() + Duration::from_secs(5);

    let feedback = headless::run_action(
        &mut document,
        kind,
        args.lines,
        Arc::new(state.backend.clone()),
        RealTimeSource::shared(),
        settings,
        timeout,
    )?;

    match feedback {
        Some(f) if f.is_error() => bail!("{}", f.message),
        Some(f) => println!("{}", f.message),
        None => println!("The backend returned nothing to apply"),
    }

    if document.is_modified() {
        if args.dry_run {
            print!("{}", document.text());
        } else {
            document.save()?;
            println!("Wrote {}", args.file.display());
        }
    }
    Ok(())
}

fn run_editor(
    state: SetupState,
    file: Option<PathBuf>,
    language: Option<String>,
    log_file: Option<PathBuf>,
) -> AnyhowResult<()> {
    let log_path = log_file.unwrap_or_else(tracing_setup::default_log_path);
    let handles = tracing_setup::init_global(&log_path);
    tracing::info!("codeward starting, backend {}", state.backend.base_url());

    let user_id = state.user_id();
    let language_override = language.as_deref().map(Language::from_id);

    let terminal_modes = TerminalModes::enable().context("Failed to set up terminal")?;
    let mut terminal =
        Terminal::new(CrosstermBackend::new(stdout())).context("Failed to create terminal")?;
    let size = terminal.size()?;

    let service = Arc::new(state.backend);
    let mut editor = Editor::new(
        state.config,
        service.clone(),
        service,
        RealTimeSource::shared(),
        size.width,
        size.height,
    );
    editor.set_user_id(user_id);
    if let Some(path) = &file {
        editor
            .open_file(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
    }
    if let Some(language) = language_override {
        editor.set_language(language);
    }

    let result = run_event_loop(&mut editor, &mut terminal);

    editor.quit();
    drop(terminal_modes);
    if let Some(path) = handles.log_path {
        tracing::info!("codeward exiting, log at {}", path.display());
    }
    result
}

fn handle_key_event(editor: &mut Editor, key_event: KeyEvent) -> AnyhowResult<()> {
    tracing::trace!("Key event: {:?}", key_event);
    editor.handle_key(key_event.code, key_event.modifiers)?;
    Ok(())
}

fn run_event_loop(
    editor: &mut Editor,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> AnyhowResult<()> {
    const FRAME_DURATION: Duration = Duration::from_millis(16); // 60fps
    let mut last_render = Instant::now();
    let mut needs_render = true;

    loop {
        if editor.process_async_messages() {
            needs_render = true;
        }

        if editor.should_quit() {
            break;
        }

        if needs_render && last_render.elapsed() >= FRAME_DURATION {
            terminal.draw(|frame| editor.render(frame))?;
            last_render = Instant::now();
            needs_render = false;
        }

        let timeout = if needs_render {
            FRAME_DURATION.saturating_sub(last_render.elapsed())
        } else {
            Duration::from_millis(50)
        };
        if !event_poll(timeout)? {
            continue;
        }

        match event_read()? {
            CrosstermEvent::Key(key_event) => {
                if key_event.kind == KeyEventKind::Press {
                    handle_key_event(editor, key_event)?;
                    needs_render = true;
                }
            }
            CrosstermEvent::Mouse(mouse_event) => {
                if editor.handle_mouse(mouse_event)? {
                    needs_render = true;
                }
            }
            CrosstermEvent::Resize(width, height) => {
                editor.resize(width, height);
                needs_render = true;
            }
            _ => {}
        }
    }
    Ok(())
}
