pub mod output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use output::{format_change, format_history, format_status};
use tokio::io::BufReader;
use tokio_util::sync::CancellationToken;
use tracing::{info, level_filters::LevelFilter};

use crate::{
    config::{ALLOWED_STEPS, ROLLOVER_CHECK_INTERVAL},
    session::{
        feedback::{Feedback, SilentFeedback, TerminalFeedback},
        Session,
    },
    storage::key_value::FileStore,
    utils::{
        clock::DefaultClock,
        dir::{create_application_default_path, ensure_dir},
        logging::{enable_logging, CLI_PREFIX, WATCH_PREFIX},
    },
    watch::{run_watch, shutdown::detect_shutdown},
};

#[derive(Parser, Debug)]
#[command(name = "Tasbih", version, long_about = None)]
#[command(about = "Tally counter that keeps a daily history", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(
        long,
        global = true,
        help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
    )]
    dir: Option<PathBuf>,
    #[arg(long, global = true, help = "Enable logging")]
    log: bool,
    #[arg(long = "quiet-feedback", global = true, help = "Never ring the terminal bell")]
    quiet_feedback: bool,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Show the current count and settings")]
    Show {},
    #[command(about = "Add the current step to the count")]
    Inc {},
    #[command(about = "Subtract the current step from the count. Never goes below zero")]
    Dec {},
    #[command(about = "Set today's count to a specific value")]
    Set {
        #[arg(allow_negative_numbers = true)]
        value: f64,
    },
    #[command(about = "Clear today's count")]
    Reset {
        #[arg(long, help = "Confirm the reset")]
        yes: bool,
    },
    #[command(about = "Change the step")]
    Step {
        #[arg(help = format!("One of {ALLOWED_STEPS:?}. Anything else becomes 1"))]
        step: u64,
    },
    #[command(about = "Toggle sound")]
    Sound {},
    #[command(about = "Toggle vibration")]
    Vibration {},
    #[command(about = "Print counts of previous days")]
    History {
        #[arg(long, short, default_value_t = 7)]
        days: usize,
    },
    #[command(about = "Count interactively. Lines typed into the terminal act as key presses")]
    Watch {},
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let app_dir = args
        .dir
        .map_or_else(create_application_default_path, ensure_dir)?;

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    let prefix = match args.commands {
        Commands::Watch {} => WATCH_PREFIX,
        _ => CLI_PREFIX,
    };
    enable_logging(prefix, &app_dir, logging_level, args.log)?;

    let store = FileStore::new(app_dir.clone())
        .with_context(|| format!("Can't use {app_dir:?} for storage"))?;
    let feedback: Box<dyn Feedback> = if args.quiet_feedback {
        Box::new(SilentFeedback)
    } else {
        Box::new(TerminalFeedback)
    };
    let mut session = Session::open(store, Box::new(DefaultClock), feedback).await;
    let today = session.today();

    match args.commands {
        Commands::Show {} => {}
        Commands::Inc {} => println!("{}", format_change(session.increment().await)),
        Commands::Dec {} => println!("{}", format_change(session.decrement().await)),
        Commands::Set { value } => {
            println!("{}", format_change(session.set_current_count(value).await))
        }
        Commands::Reset { yes } => {
            if !yes {
                println!(
                    "This clears today's count of {}. Run again with --yes to confirm",
                    session.record().current_count
                );
                return Ok(());
            }
            println!("{}", format_change(session.reset_today().await));
        }
        Commands::Step { step } => {
            let step = session.set_step(step).await;
            println!("Step is now +{step}");
        }
        Commands::Sound {} => {
            session.toggle_sound().await;
        }
        Commands::Vibration {} => {
            session.toggle_vibration().await;
        }
        Commands::History { days } => {
            for line in format_history(session.record(), days, &today) {
                println!("{line}");
            }
            println!("lifetime {}", session.record().lifetime_total);
            return Ok(());
        }
        Commands::Watch {} => {
            let shutdown = CancellationToken::new();
            tokio::spawn(detect_shutdown(shutdown.clone()));
            session = run_watch(
                session,
                BufReader::new(tokio::io::stdin()),
                std::io::stdout(),
                shutdown,
                ROLLOVER_CHECK_INTERVAL,
            )
            .await?;
            info!("Watch finished at {}", session.record().current_count);
            return Ok(());
        }
    }

    println!("{}", format_status(session.record(), &today));
    Ok(())
}
