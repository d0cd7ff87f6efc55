use std::io;
use std::path::PathBuf;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use hacking::die::DieStatus;
use hacking::difficulty::Difficulty;
use hacking::settings::SettingsStore;
use hacking::{HackAction, HackPhase, HackSession, HackSnapshot, SessionDriver, logging};

const HELP: &str = "\
setup:  breach <1-6|roll>  knowledge <n|roll>  attempt <1-4|roll>
        size <2|4|8|16>  timer <seconds>  difficulty <easy|normal|hard|exceptional>
run:    roll  select <id>  add  sub  reroll  pause  end  deep
other:  help  quit";

/// Terminal front end for the hacking minigame.
#[derive(Parser, Debug)]
#[command(name = "hacking", version, about, long_about = None)]
struct Cli {
    /// Starting difficulty (overrides the settings file)
    #[arg(short, long)]
    difficulty: Option<Difficulty>,

    /// Dice seed for a reproducible hack
    #[arg(long)]
    seed: Option<u64>,

    /// Path to a settings JSON file
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

enum Input {
    Line(io::Result<Option<String>>),
    Update(bool),
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_level);

    let store = cli
        .settings
        .map(SettingsStore::new)
        .unwrap_or_else(SettingsStore::from_env);
    let settings = store.load();
    let difficulty = cli.difficulty.unwrap_or(settings.difficulty);
    let session = HackSession::for_difficulty(difficulty, cli.seed.or(settings.seed));
    let (handle, task) = SessionDriver::spawn(session, settings.tick_interval());

    println!("{HELP}\n");
    print!("{}", render(&handle.latest()));

    let mut updates = handle.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut expiry_announced = None;

    loop {
        let input = tokio::select! {
            line = lines.next_line() => Input::Line(line),
            changed = updates.changed() => Input::Update(changed.is_ok()),
        };

        match input {
            Input::Line(line) => {
                let Some(line) = line? else {
                    break;
                };
                let line = line.trim();
                match line {
                    "" => continue,
                    "quit" | "exit" => break,
                    "help" => {
                        println!("{HELP}");
                        continue;
                    }
                    _ => {}
                }
                let action = match HackAction::parse(line) {
                    Ok(action) => action,
                    Err(err) => {
                        println!("ignored: {err}");
                        continue;
                    }
                };
                match handle.apply(action).await {
                    Ok(report) => {
                        if !report.applied {
                            println!("(not available right now)");
                        }
                        print!("{}", render(&report.snapshot));
                    }
                    Err(err) => {
                        eprintln!("{err}");
                        break;
                    }
                }
            }
            Input::Update(false) => break,
            Input::Update(true) => {
                let snapshot = updates.borrow_and_update().clone();
                if snapshot.clock_ran_out
                    && snapshot.hack_complete
                    && expiry_announced != Some(snapshot.generation)
                {
                    expiry_announced = Some(snapshot.generation);
                    println!("\n*** Timer expired ***");
                    print!("{}", render(&snapshot));
                }
            }
        }
    }

    handle.shutdown();
    let _ = task.await;
    Ok(())
}

fn render(s: &HackSnapshot) -> String {
    let mut out = format!(
        "breach code {} | attempts {}/{} (knowledge {:+} + d4 {}) | matrix {}",
        s.breach_code, s.attempts_remaining, s.attempts, s.knowledge, s.attempt_roll, s.matrix_size
    );
    if s.timer_seconds > 0 {
        out.push_str(&format!(" | time {}s/{}s", s.time_left, s.timer_seconds));
    }
    if s.hack_paused {
        out.push_str(" | PAUSED");
    }
    out.push('\n');

    if !s.dice.is_empty() {
        let dice: Vec<String> = s
            .dice
            .iter()
            .map(|die| {
                let mark = match die.status {
                    DieStatus::Active => ' ',
                    DieStatus::Locked => 'x',
                    DieStatus::Success => '*',
                };
                let picked = if s.selected_dice.contains(&die.id) { ">" } else { "" };
                format!("{picked}#{}:{}{mark}", die.id, die.value)
            })
            .collect();
        out.push_str(&dice.join("  "));
        out.push('\n');
    }

    let phase = match s.phase {
        HackPhase::Empty => "awaiting roll",
        HackPhase::Active => "hacking",
        HackPhase::DeepHackOffer => "full access: `deep` to dive deeper or `end` to cash out",
        HackPhase::DeepHack => "deep hack",
        HackPhase::Complete => "complete",
    };
    out.push_str(&format!("[{phase}] {}\n", s.outcome_text));
    out
}
