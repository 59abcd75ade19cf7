// tabstep CLI - step through a tableau by hand, one frozen step at a time
//
// Every command loads the session file, applies one action, and writes the
// file back. Row, column and step numbers are 1-based on the command line.

mod exit_codes;
mod render;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tabstep_config::Settings;
use tabstep_core::{classify_draft, DraftKind};
use tabstep_engine::{
    reconstruct_view_only, Action, Outcome, Tableau, TableauView, Workbench, WorkbenchState,
};
use tabstep_io::SessionFileError;

use exit_codes::{EXIT_DRAFT_REJECTED, EXIT_ERROR, EXIT_SESSION_FILE, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "tabstep")]
#[command(
    about = "Step-by-step tableau workbench (no arithmetic, just structured entry and history)"
)]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_COMMIT_HASH"), ")"))]
struct Cli {
    /// Session file (default: `session.file` setting, then <config dir>/tabstep/session.json)
    #[arg(long, short = 's', global = true, env = "TABSTEP_SESSION")]
    session: Option<PathBuf>,

    /// Settings file (default: <config dir>/tabstep/settings.json)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a new session on the starter tableau
    New {
        /// Overwrite an existing session file
        #[arg(long)]
        force: bool,
    },

    /// Print the current tableau, the previous step, or any step
    Show {
        /// Show the step selected as previous (latest by default)
        #[arg(long, conflicts_with = "step")]
        previous: bool,

        /// Show a specific history step
        #[arg(long)]
        step: Option<usize>,
    },

    /// List frozen steps with their dimensions
    History,

    /// Append a column (blank label = x<N+1>)
    AddCol { label: Option<String> },

    /// Remove a column (the last one is kept)
    RmCol { index: usize },

    /// Append a row (blank label = r<N+1>)
    AddRow { label: Option<String> },

    /// Remove a row (the last one is kept)
    RmRow { index: usize },

    /// Rename a column
    ColLabel { index: usize, text: String },

    /// Rename a row
    RowLabel { index: usize, text: String },

    /// Enter a cell draft (decimal or fraction, possibly unfinished)
    #[command(after_help = "\
Examples:
  tabstep set 1 1 -3
  tabstep set 2 3 4/3
  tabstep set 1 2 -- -.5")]
    Set {
        row: usize,
        col: usize,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Select a pivot cell, or clear it if it is already selected
    Pivot { row: usize, col: usize },

    /// Clear the pivot selection
    Unpivot,

    /// Freeze the current tableau into history and start the next step
    Next,

    /// Choose which history step is shown as previous
    Select { step: usize },

    /// Discard the current tableau and all history
    Reset,

    /// Write a tableau as CSV
    Export {
        /// Output file
        #[arg(long, short = 'o')]
        out: PathBuf,

        /// Export a history step instead of the current tableau
        #[arg(long, conflicts_with = "previous")]
        step: Option<usize>,

        /// Export the step selected as previous
        #[arg(long)]
        previous: bool,
    },

    /// Check a cell draft against the grammar without touching the session
    Check {
        #[arg(allow_hyphen_values = true)]
        text: String,
    },
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self {
            code,
            message: msg.into(),
            hint: None,
        }
    }

    pub fn usage(msg: impl Into<String>) -> Self {
        Self::new(EXIT_USAGE, msg)
    }

    pub fn session(err: SessionFileError) -> Self {
        let hint = match &err {
            SessionFileError::UnsupportedVersion { .. } => {
                Some("the file was written by a newer tabstep".to_string())
            }
            SessionFileError::Parse(_) => Some("start over with `tabstep new --force`".to_string()),
            _ => None,
        };
        Self {
            code: EXIT_SESSION_FILE,
            message: err.to_string(),
            hint,
        }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Everything a command needs: where the session lives and what a fresh
/// session starts from.
struct Context {
    session_path: PathBuf,
    settings: Settings,
}

impl Context {
    fn from_cli(session: Option<PathBuf>, settings: Option<PathBuf>) -> Self {
        let settings = match settings {
            Some(path) => Settings::load_from(&path),
            None => Settings::load(),
        };
        let session_path = session.unwrap_or_else(|| settings.session_path());
        Self { session_path, settings }
    }

    /// Starter grid from settings. Settings are repaired on load, so this
    /// only falls back if labels were set programmatically to nothing.
    fn template(&self) -> Tableau {
        Tableau::from_labels(self.settings.columns.clone(), self.settings.rows.clone())
            .unwrap_or_else(|_| Tableau::create_initial())
    }

    /// Load the session, or start one if the file does not exist yet.
    fn open(&self) -> Result<Workbench, CliError> {
        log::debug!("opening session {}", self.session_path.display());
        let state = tabstep_io::session::load_if_exists(&self.session_path)
            .map_err(CliError::session)?
            .unwrap_or_else(|| WorkbenchState::with_current(self.template()));
        Ok(Workbench::resume(state, self.template()))
    }

    fn save(&self, state: &WorkbenchState) -> Result<(), CliError> {
        tabstep_io::session::save(state, &self.session_path).map_err(CliError::session)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let ctx = Context::from_cli(cli.session, cli.settings);

    match run(&ctx, cli.command) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(err.code)
        }
    }
}

fn run(ctx: &Context, command: Commands) -> Result<(), CliError> {
    match command {
        Commands::New { force } => cmd_new(ctx, force),
        Commands::Show { previous, step } => cmd_show(ctx, previous, step),
        Commands::History => cmd_history(ctx),
        Commands::Check { text } => cmd_check(&text),
        Commands::Export { out, step, previous } => cmd_export(ctx, &out, step, previous),
        Commands::AddCol { label } => cmd_edit(ctx, Action::AddColumn { label }),
        Commands::RmCol { index } => {
            let index = to_index(index, "column")?;
            cmd_edit(ctx, Action::RemoveColumn { index })
        }
        Commands::AddRow { label } => cmd_edit(ctx, Action::AddRow { label }),
        Commands::RmRow { index } => {
            let index = to_index(index, "row")?;
            cmd_edit(ctx, Action::RemoveRow { index })
        }
        Commands::ColLabel { index, text } => {
            let index = to_index(index, "column")?;
            cmd_edit(ctx, Action::SetColVar { index, text })
        }
        Commands::RowLabel { index, text } => {
            let index = to_index(index, "row")?;
            cmd_edit(ctx, Action::SetRowVar { index, text })
        }
        Commands::Set { row, col, value } => {
            let row = to_index(row, "row")?;
            let col = to_index(col, "column")?;
            cmd_edit(ctx, Action::SetCell { row, col, text: value })
        }
        Commands::Pivot { row, col } => {
            let row = to_index(row, "row")?;
            let col = to_index(col, "column")?;
            cmd_edit(ctx, Action::TogglePivot { row, col })
        }
        Commands::Unpivot => cmd_edit(ctx, Action::ClearPivot),
        Commands::Next => cmd_next(ctx),
        Commands::Select { step } => cmd_select(ctx, step),
        Commands::Reset => cmd_edit(ctx, Action::Reset),
    }
}

/// 1-based command-line number to 0-based index.
fn to_index(n: usize, what: &str) -> Result<usize, CliError> {
    n.checked_sub(1)
        .ok_or_else(|| CliError::usage(format!("{what} numbers start at 1")))
}

fn current_title(state: &WorkbenchState) -> String {
    format!("Current (step {} draft)", state.history().len() + 1)
}

// ============================================================================
// new / show / history
// ============================================================================

fn cmd_new(ctx: &Context, force: bool) -> Result<(), CliError> {
    if ctx.session_path.exists() && !force {
        return Err(CliError::usage(format!(
            "session already exists: {}",
            ctx.session_path.display()
        ))
        .with_hint("use --force to discard it"));
    }
    let state = WorkbenchState::with_current(ctx.template());
    ctx.save(&state)?;
    eprintln!("New session: {}", ctx.session_path.display());
    print!("{}", render::render_tableau(&current_title(&state), state.current().view()));
    Ok(())
}

fn cmd_show(ctx: &Context, previous: bool, step: Option<usize>) -> Result<(), CliError> {
    let wb = ctx.open()?;
    let state = wb.state();

    if let Some(step) = step {
        let frozen = state
            .find_step(step)
            .ok_or_else(|| CliError::new(EXIT_ERROR, format!("no step {step} in history")))?;
        let title = format!("Step {step}");
        print!("{}", render::render_tableau(&title, reconstruct_view_only(frozen)));
        return Ok(());
    }

    if previous {
        match state.selected_previous() {
            Some(frozen) => print!(
                "{}",
                render::render_tableau(
                    &format!("Previous: step {}", frozen.step()),
                    reconstruct_view_only(frozen)
                )
            ),
            None => println!("No previous tableau yet."),
        }
        return Ok(());
    }

    print!("{}", render::render_tableau(&current_title(state), state.current().view()));
    Ok(())
}

fn cmd_history(ctx: &Context) -> Result<(), CliError> {
    let wb = ctx.open()?;
    let gallery = wb.state().history_gallery(ctx.settings.newest_first);
    print!("{}", render::render_gallery(&gallery));
    Ok(())
}

// ============================================================================
// edits
// ============================================================================

fn cmd_edit(ctx: &Context, action: Action) -> Result<(), CliError> {
    let mut wb = ctx.open()?;
    let rejected_text = match &action {
        Action::SetCell { text, .. } => Some(text.clone()),
        _ => None,
    };

    match wb.apply(action) {
        Outcome::Rejected => {
            let text = rejected_text.unwrap_or_default();
            return Err(CliError::new(
                EXIT_DRAFT_REJECTED,
                format!("rejected draft {:?}: not a decimal or fraction in progress", text),
            ));
        }
        Outcome::Unchanged => eprintln!("Nothing changed."),
        Outcome::Applied => ctx.save(wb.state())?,
    }

    let state = wb.state();
    print!("{}", render::render_tableau(&current_title(state), state.current().view()));
    Ok(())
}

fn cmd_next(ctx: &Context) -> Result<(), CliError> {
    let mut wb = ctx.open()?;
    wb.apply(Action::Advance);
    ctx.save(wb.state())?;

    let state = wb.state();
    if let Some(frozen) = state.history().last() {
        eprintln!("Froze step {} ({}x{})", frozen.step(), frozen.rows(), frozen.cols());
    }
    print!("{}", render::render_tableau(&current_title(state), state.current().view()));
    Ok(())
}

fn cmd_select(ctx: &Context, step: usize) -> Result<(), CliError> {
    let mut wb = ctx.open()?;
    if wb.apply(Action::SelectHistoryStep { step }) == Outcome::Applied {
        ctx.save(wb.state())?;
    }

    let state = wb.state();
    match state.selected_previous() {
        Some(frozen) => {
            if frozen.step() != step {
                eprintln!("Step {} is not in history; showing step {}.", step, frozen.step());
            }
            print!(
                "{}",
                render::render_tableau(
                    &format!("Previous: step {}", frozen.step()),
                    reconstruct_view_only(frozen)
                )
            );
        }
        None => println!("No previous tableau yet."),
    }
    Ok(())
}

// ============================================================================
// export / check
// ============================================================================

fn cmd_export(
    ctx: &Context,
    out: &Path,
    step: Option<usize>,
    previous: bool,
) -> Result<(), CliError> {
    let wb = ctx.open()?;
    let state = wb.state();

    let view: TableauView<'_> = match (step, previous) {
        (Some(step), _) => state
            .find_step(step)
            .map(reconstruct_view_only)
            .ok_or_else(|| CliError::new(EXIT_ERROR, format!("no step {step} in history")))?,
        (None, true) => state
            .selected_previous()
            .map(reconstruct_view_only)
            .ok_or_else(|| CliError::new(EXIT_ERROR, "no previous tableau yet"))?,
        (None, false) => state.current().view(),
    };

    tabstep_io::csv::export(view, out).map_err(CliError::session)?;
    eprintln!("Wrote {}x{} tableau to {}", view.rows(), view.cols(), out.display());
    Ok(())
}

fn cmd_check(text: &str) -> Result<(), CliError> {
    match classify_draft(text) {
        Some(kind) => {
            let name = match kind {
                DraftKind::Empty => "empty",
                DraftKind::Partial => "partial",
                DraftKind::Decimal => "decimal",
                DraftKind::Fraction => "fraction",
            };
            println!("ok: {}", name);
            Ok(())
        }
        None => Err(CliError::new(EXIT_DRAFT_REJECTED, format!("rejected draft {:?}", text))),
    }
}
