use anyhow::Context;
use clap::{Parser, Subcommand};
use focustown_cli::{AppConfig, Session, SessionEvent, Step};
use focustown_common::BuildingType;
use focustown_pomodoro::PomodoroEvent;
use focustown_progression::{Ledger, ProgressionEvent};
use focustown_tools::TownInspector;
use glam::Vec2;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "focustown", about = "Headless driver for the focus town")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Save directory, overriding the config
    #[arg(long)]
    save_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the town, movement and progression report
    Info {
        /// Also list every entity with its components
        #[arg(long)]
        entities: bool,
    },
    /// Run scripted input, e.g. `walk down:20 right+run:10 interact`
    Walk {
        #[arg(required = true)]
        steps: Vec<Step>,
        /// Put the character here before the script runs
        #[arg(long, num_args = 2, value_names = ["X", "Y"], allow_negative_numbers = true)]
        start: Option<Vec<f32>>,
        /// Do not write the save afterwards
        #[arg(long)]
        no_save: bool,
    },
    /// Run a timed focus session credited to a building
    Focus {
        #[arg(value_parser = parse_building)]
        building: BuildingType,
        /// Work length in minutes, the configured length when omitted
        minutes: Option<u32>,
        /// Stop the session early after this many minutes
        #[arg(long)]
        stop_after: Option<u32>,
    },
    /// Upgrade a building by one level
    Upgrade {
        #[arg(value_parser = parse_building)]
        building: BuildingType,
    },
    /// List the decoration catalog
    Decorations {
        #[arg(value_parser = parse_building)]
        building: Option<BuildingType>,
    },
    /// Buy a decoration
    Buy { decoration: String },
    /// Place a purchased decoration inside a building
    Place {
        decoration: String,
        #[arg(value_parser = parse_building)]
        building: BuildingType,
        x: f32,
        y: f32,
    },
    /// Write the current state
    Save,
    /// Load the save and show where it came from
    Load,
}

/// Accepts `coffee_shop`, `coffee-shop` or `Coffee Shop`.
fn parse_building(s: &str) -> Result<BuildingType, String> {
    let key = s.trim().to_ascii_lowercase().replace([' ', '-'], "_");
    BuildingType::from_key(&key).ok_or_else(|| format!("unknown building {s:?}"))
}

fn describe(event: &SessionEvent) -> String {
    match event {
        SessionEvent::EnteredBuilding { kind } => format!("entered {kind}"),
        SessionEvent::BuildingLocked { name } => format!("{name} is locked"),
        SessionEvent::ExitedBuilding { kind } => format!("left {kind}"),
        SessionEvent::Interacted { kind } => format!("interacted with {kind}"),
        SessionEvent::Progression(ProgressionEvent::BuildingUpgraded { kind, level }) => {
            format!("{kind} reached level {level}")
        }
        SessionEvent::Progression(ProgressionEvent::DecorationPurchased { id }) => {
            format!("purchased {id}")
        }
        SessionEvent::Progression(ProgressionEvent::DecorationPlaced { kind, id }) => {
            format!("placed {id} in {kind}")
        }
        SessionEvent::Progression(ProgressionEvent::UpgradeReady { kind }) => {
            format!("{kind} has enough XP for its next level")
        }
        SessionEvent::Focus(event) => describe_focus(event),
        SessionEvent::FocusRewarded { kind, reward } => {
            format!("{kind}: +{reward} xp, +{reward} coins")
        }
        SessionEvent::AutoSaved => "auto-saved".to_string(),
    }
}

fn describe_focus(event: &PomodoroEvent) -> String {
    let phase = event.phase();
    match event {
        PomodoroEvent::Started { minutes, .. } => format!("{phase} started, {minutes} min"),
        PomodoroEvent::Paused { .. } => format!("{phase} paused"),
        PomodoroEvent::Resumed { .. } => format!("{phase} resumed"),
        PomodoroEvent::Completed { minutes, .. } => format!("{phase} done after {minutes} min"),
        PomodoroEvent::Interrupted { minutes, .. } => format!("{phase} stopped at {minutes} min"),
    }
}

fn print_events(session: &mut Session) {
    for event in session.drain_events() {
        println!("- {}", describe(&event));
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    if let Some(dir) = cli.save_dir {
        config.save_dir = dir;
    }
    let (mut session, source) = Session::resume(config).context("opening the save")?;
    if let Some(source) = source {
        tracing::debug!(?source, "save loaded");
    }

    match cli.command {
        Commands::Info { entities } => {
            for line in session.report() {
                println!("{line}");
            }
            if entities {
                let world = session.world();
                for entity in TownInspector::list_entities(world) {
                    if let Some(info) = TownInspector::inspect_entity(world, entity) {
                        println!("{info}");
                    }
                }
            }
        }
        Commands::Walk {
            steps,
            start,
            no_save,
        } => {
            if let Some(&[x, y]) = start.as_deref() {
                if !session.teleport(Vec2::new(x, y)) {
                    anyhow::bail!("({x}, {y}) is not a free spot in town");
                }
            }
            for step in &steps {
                session.run_step(step);
            }
            print_events(&mut session);
            println!("{}", session.status_line());
            if !no_save {
                session.save()?;
            }
        }
        Commands::Focus {
            building,
            minutes,
            stop_after,
        } => {
            session.start_focus(building, minutes);
            let length = session.pomodoro().duration_secs() as u32;
            let run_for = stop_after.map_or(length, |m| m.saturating_mul(60).min(length));
            session.wait(run_for);
            session.stop_focus();
            print_events(&mut session);
            println!("{}", session.status_line());
            session.save()?;
        }
        Commands::Upgrade { building } => {
            let level = session
                .upgrade(building)
                .with_context(|| format!("upgrading {building}"))?;
            println!("{building} is now level {level}");
            if let Some(effect) = session.progression().building_prestige_effect(building) {
                println!("prestige: {effect}");
            }
            session.save()?;
        }
        Commands::Decorations { building } => {
            let engine = session.progression();
            let listed = engine
                .catalog()
                .iter()
                .filter(|d| building.is_none_or(|k| d.compatible_building == k));
            for d in listed {
                let status = if engine.is_purchased(&d.id) {
                    "owned"
                } else if d.unlocked {
                    "available"
                } else {
                    "locked"
                };
                println!(
                    "{:<20} {:<15} {:>4} coins  level {}  {:<10} [{status}]",
                    d.id,
                    d.compatible_building.display_name(),
                    d.cost,
                    d.required_level,
                    d.category.as_str(),
                );
            }
        }
        Commands::Buy { decoration } => {
            session
                .purchase(&decoration)
                .with_context(|| format!("buying {decoration}"))?;
            println!(
                "bought {decoration}, balance {}",
                session.wallet().balance()
            );
            session.save()?;
        }
        Commands::Place {
            decoration,
            building,
            x,
            y,
        } => {
            session
                .place(building, &decoration, x, y)
                .with_context(|| format!("placing {decoration} in {building}"))?;
            println!("placed {decoration} in {building} at ({x}, {y})");
            session.save()?;
        }
        Commands::Save => {
            session.save()?;
            println!("saved to {}", session.store().save_path().display());
        }
        Commands::Load => {
            match source {
                Some(source) => println!(
                    "loaded {:?} save from {}",
                    source,
                    session.store().root().display()
                ),
                None => println!("no save in {}", session.store().root().display()),
            }
            println!("{}", session.status_line());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn building_names() {
        assert_eq!(parse_building("coffee_shop"), Ok(BuildingType::CoffeeShop));
        assert_eq!(parse_building("Coffee Shop"), Ok(BuildingType::CoffeeShop));
        assert_eq!(
            parse_building("bulletin-board"),
            Ok(BuildingType::BulletinBoard)
        );
        assert!(parse_building("castle").is_err());
    }

    #[test]
    fn cli_parses_walk_script() {
        let args = ["ft", "walk", "down:20", "x", "--start", "300", "500"];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Commands::Walk { steps, start, .. } => {
                assert_eq!(steps.len(), 2);
                assert_eq!(start, Some(vec![300.0, 500.0]));
            }
            _ => panic!("expected walk"),
        }
    }

    #[test]
    fn cli_parses_focus() {
        let args = ["ft", "focus", "library", "50", "--stop-after", "10"];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Commands::Focus {
                building,
                minutes,
                stop_after,
            } => {
                assert_eq!(building, BuildingType::Library);
                assert_eq!(minutes, Some(50));
                assert_eq!(stop_after, Some(10));
            }
            _ => panic!("expected focus"),
        }
    }

    #[test]
    fn focus_events_read_plainly() {
        let event = PomodoroEvent::Interrupted {
            phase: focustown_pomodoro::Phase::Work,
            minutes: 10,
        };
        assert_eq!(describe_focus(&event), "work stopped at 10 min");
    }
}
