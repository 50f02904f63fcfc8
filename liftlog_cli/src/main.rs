use clap::{Parser, Subcommand};
use liftlog_core::*;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Largest clock advance a single `tick` command may request (one day)
const MAX_TICKS_PER_COMMAND: u64 = 86_400;

#[derive(Parser)]
#[command(name = "liftlog")]
#[command(about = "Live workout session tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a workout session and log sets from stdin (default)
    Start {
        /// Routine file (TOML or JSON); defaults to the configured or built-in routine
        #[arg(long)]
        routine: Option<PathBuf>,

        /// Only advance the clock with explicit `tick` commands
        #[arg(long)]
        manual_clock: bool,

        /// Dry run - show the summary without logging it
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the set plan for a routine without starting a session
    Plan {
        /// Routine file (TOML or JSON)
        #[arg(long)]
        routine: Option<PathBuf>,
    },

    /// Roll up logged sessions to CSV
    Rollup {
        /// Clean up processed log files after rollup
        #[arg(long)]
        cleanup: bool,
    },

    /// Write the current (or default) configuration to the config file
    InitConfig,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        liftlog_core::logging::init_with_level("debug");
    } else {
        liftlog_core::logging::init_with_level("warn");
    }

    let config = Config::load()?;
    let data_dir = cli
        .data_dir
        .unwrap_or_else(|| config.data.data_dir.clone());
    tracing::debug!("Using data directory {:?}", data_dir);

    match cli.command {
        Some(Commands::Start {
            routine,
            manual_clock,
            dry_run,
        }) => cmd_start(&data_dir, routine, manual_clock, dry_run, &config),
        Some(Commands::Plan { routine }) => cmd_plan(routine, &config),
        Some(Commands::Rollup { cleanup }) => cmd_rollup(&data_dir, cleanup),
        Some(Commands::InitConfig) => cmd_init_config(&config),
        None => cmd_start(&data_dir, None, false, false, &config),
    }
}

fn wal_path(data_dir: &Path) -> PathBuf {
    data_dir.join("wal").join("workout_sessions.wal")
}

fn csv_path(data_dir: &Path) -> PathBuf {
    data_dir.join("completed_sets.csv")
}

/// Pick the routine: command line, then config, then built-in
fn resolve_routine(path: Option<PathBuf>, config: &Config) -> Result<Routine> {
    let routine = match path.or_else(|| config.session.routine.clone()) {
        Some(path) => {
            tracing::debug!("Loading routine from {:?}", path);
            Routine::load_from(&path)?
        }
        None => {
            tracing::debug!("Using built-in routine");
            default_routine().clone()
        }
    };

    for problem in routine.validate() {
        tracing::warn!("{}", problem);
    }
    Ok(routine)
}

fn cmd_plan(routine: Option<PathBuf>, config: &Config) -> Result<()> {
    let routine = resolve_routine(routine, config)?;
    let plan = generate(&routine);

    println!("{} ({} sets)", routine.name, routine.planned_set_count());
    for (index, set) in plan.iter().enumerate() {
        println!(
            "  {}",
            describe_set(index, set, &routine, &config.session.weight_unit)
        );
    }
    Ok(())
}

fn cmd_start(
    data_dir: &Path,
    routine: Option<PathBuf>,
    manual_clock: bool,
    dry_run: bool,
    config: &Config,
) -> Result<()> {
    let unit = config.session.weight_unit.as_str();
    let routine = resolve_routine(routine, config)?;
    let wall_clock = config.session.wall_clock && !manual_clock;

    let mut session = WorkoutSession::new();
    session.start(routine);
    let mut ticker = Ticker::new(Instant::now());

    let interactive = io::stdin().is_terminal();
    if interactive {
        print_help();
    }
    print_status(&session, unit);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        if interactive {
            print!("> ");
            io::stdout().flush()?;
        }

        let Some(line) = lines.next() else { break };
        let line = line?;

        if wall_clock {
            ticker.drive(&mut session, Instant::now());
        }

        let command = match SessionCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(msg) => {
                eprintln!("error: {}", msg);
                continue;
            }
        };

        match command {
            SessionCommand::End => break,
            SessionCommand::Help => print_help(),
            SessionCommand::Status => print_status(&session, unit),
            other => {
                if let Err(e) = apply(&mut session, other) {
                    eprintln!("error: {}", e);
                }
            }
        }
    }

    if wall_clock {
        ticker.drive(&mut session, Instant::now());
    }

    let summary = session.end()?;
    display_summary(&summary, unit);

    if dry_run {
        println!("\n[Dry run - not logging session]");
        return Ok(());
    }

    let mut sink = JsonlSink::new(wal_path(data_dir));
    let record = sink.record(&summary)?;
    println!("\n✓ Session logged ({})", record.id);
    println!("  Log: {}", sink.path().display());
    Ok(())
}

fn cmd_rollup(data_dir: &Path, cleanup: bool) -> Result<()> {
    let wal_path = wal_path(data_dir);
    let csv_path = csv_path(data_dir);

    if !wal_path.exists() {
        println!("No session log found - nothing to roll up.");
        return Ok(());
    }

    let count = liftlog_core::csv_rollup::wal_to_csv_and_archive(&wal_path, &csv_path)?;

    println!("✓ Rolled up {} sessions to CSV", count);
    println!("  CSV: {}", csv_path.display());

    if cleanup {
        let cleaned = liftlog_core::csv_rollup::cleanup_processed_wals(&data_dir.join("wal"))?;
        if cleaned > 0 {
            println!("✓ Cleaned up {} processed log files", cleaned);
        }
    }

    Ok(())
}

fn cmd_init_config(config: &Config) -> Result<()> {
    let path = Config::default_config_path();
    if path.exists() {
        println!("Config already exists at {}", path.display());
        return Ok(());
    }

    config.save()?;
    println!("✓ Wrote config to {}", path.display());
    Ok(())
}

// ============================================================================
// Session commands
// ============================================================================

/// One line of session input
#[derive(Debug, PartialEq)]
enum SessionCommand {
    Complete {
        index: usize,
        reps: Option<u32>,
        weight: Option<f64>,
    },
    Skip(usize),
    Edit {
        index: usize,
        reps: u32,
        weight: Option<f64>,
    },
    Pause,
    Resume,
    Tick(u64),
    Status,
    Help,
    End,
}

impl SessionCommand {
    /// Parse a command line. Blank lines yield `None`.
    fn parse(line: &str) -> std::result::Result<Option<Self>, String> {
        let mut parts = line.split_whitespace();
        let Some(verb) = parts.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = parts.collect();

        let command = match verb.to_lowercase().as_str() {
            "done" | "complete" | "c" => SessionCommand::Complete {
                index: required(&args, 0, "set index")?,
                reps: optional(&args, 1, "reps")?,
                weight: optional(&args, 2, "weight")?,
            },
            "skip" | "s" => SessionCommand::Skip(required(&args, 0, "set index")?),
            "edit" | "e" => SessionCommand::Edit {
                index: required(&args, 0, "set index")?,
                reps: required(&args, 1, "reps")?,
                weight: optional(&args, 2, "weight")?,
            },
            "pause" | "p" => SessionCommand::Pause,
            "resume" | "r" => SessionCommand::Resume,
            "tick" | "t" => {
                let count: u64 = optional(&args, 0, "tick count")?.unwrap_or(1);
                if count > MAX_TICKS_PER_COMMAND {
                    return Err(format!(
                        "tick count {} exceeds the limit of {}",
                        count, MAX_TICKS_PER_COMMAND
                    ));
                }
                SessionCommand::Tick(count)
            }
            "status" | "ls" => SessionCommand::Status,
            "help" | "?" => SessionCommand::Help,
            "end" | "quit" | "q" => SessionCommand::End,
            other => return Err(format!("unknown command '{}' (try 'help')", other)),
        };
        Ok(Some(command))
    }
}

fn optional<T: std::str::FromStr>(
    args: &[&str],
    pos: usize,
    what: &str,
) -> std::result::Result<Option<T>, String> {
    args.get(pos)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|_| format!("invalid {} '{}'", what, raw))
        })
        .transpose()
}

fn required<T: std::str::FromStr>(
    args: &[&str],
    pos: usize,
    what: &str,
) -> std::result::Result<T, String> {
    optional(args, pos, what)?.ok_or_else(|| format!("missing {}", what))
}

fn apply(session: &mut WorkoutSession, command: SessionCommand) -> Result<()> {
    match command {
        SessionCommand::Complete {
            index,
            reps,
            weight,
        } => {
            session.complete_set(index, reps, weight)?;
            match session.current_set() {
                Some(next) if next.is_pending() => println!(
                    "✓ Set {} done. Next: {} set {}",
                    index, next.exercise_name, next.set_number
                ),
                _ => println!("✓ Set {} done.", index),
            }
        }
        SessionCommand::Skip(index) => {
            session.skip_set(index)?;
            println!("Set {} skipped.", index);
        }
        SessionCommand::Edit {
            index,
            reps,
            weight,
        } => {
            session.edit_set(index, reps, weight)?;
            println!("Set {} updated.", index);
        }
        SessionCommand::Pause => {
            if session.pause() {
                println!("Paused at {}.", format_duration(session.elapsed_seconds()));
            }
        }
        SessionCommand::Resume => {
            if session.resume() {
                println!("Resumed.");
            }
        }
        SessionCommand::Tick(count) => {
            for _ in 0..count {
                session.tick();
            }
        }
        SessionCommand::Status | SessionCommand::Help | SessionCommand::End => {}
    }
    Ok(())
}

// ============================================================================
// Display
// ============================================================================

fn print_help() {
    println!("─────────────────────────────────────────");
    println!("  c <i> [reps] [weight]   complete set i");
    println!("  s <i>                   skip set i");
    println!("  e <i> <reps> [weight]   correct set i");
    println!("  p / r                   pause / resume");
    println!("  t [n]                   advance clock n seconds");
    println!("  status                  show the plan");
    println!("  end                     finish the session");
    println!("─────────────────────────────────────────");
}

fn print_status(session: &WorkoutSession, unit: &str) {
    let Some(routine) = session.routine() else {
        println!("No active session.");
        return;
    };

    println!(
        "\n{} - {} - {}",
        routine.name,
        session.phase(),
        format_duration(session.elapsed_seconds())
    );
    for (index, set) in session.sets().iter().enumerate() {
        let marker = if index == session.cursor() { ">" } else { " " };
        println!("{} {}", marker, describe_set(index, set, routine, unit));
    }
    println!();
}

fn describe_set(index: usize, set: &PlannedSet, routine: &Routine, unit: &str) -> String {
    let total = routine
        .exercises
        .get(set.exercise_index)
        .map(|e| e.planned_sets)
        .unwrap_or(0);
    let status = match set.status {
        SetStatus::Pending => "[ ]",
        SetStatus::Completed => "[x]",
        SetStatus::Skipped => "[-]",
    };

    let mut line = format!(
        "{} {:>2}. {} set {}/{}: {} reps{}",
        status,
        index,
        set.exercise_name,
        set.set_number,
        total,
        set.target_reps,
        format_weight(set.target_weight, unit)
    );

    if let Some(reps) = set.actual_reps.get() {
        line.push_str(&format!(
            " -> {} reps{}",
            reps,
            format_weight(set.actual_weight.get(), unit)
        ));
    }
    line
}

fn display_summary(summary: &SessionSummary, unit: &str) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  SESSION COMPLETE");
    println!("╰─────────────────────────────────────────╯");
    println!();
    if let Some(ref name) = summary.routine_name {
        println!("  Routine: {}", name);
    }
    println!("  Duration: {}", format_duration(summary.duration_seconds));
    println!("  Completed sets: {}", summary.completed_sets.len());
    println!("  Total reps: {}", summary.total_reps());
    println!("  Volume: {} {}", summary.total_volume(), unit);

    let totals = summary.exercise_totals();
    if !totals.is_empty() {
        println!();
    }
    for total in totals {
        println!(
            "  → {}: {} sets, {} reps, {} {}",
            total.exercise_name, total.sets, total.reps, total.volume, unit
        );
    }
}

fn format_duration(seconds: u64) -> String {
    let (h, m, s) = (seconds / 3600, (seconds % 3600) / 60, seconds % 60);
    if h > 0 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else {
        format!("{:02}:{:02}", m, s)
    }
}

fn format_weight(weight: Option<f64>, unit: &str) -> String {
    match weight {
        Some(w) => format!(" @ {} {}", w, unit),
        None => String::new(),
    }
}
