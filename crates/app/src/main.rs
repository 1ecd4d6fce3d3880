use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use deck_core::session::SessionState;
use services::{DeckService, SessionHandle, SessionLoop, Ticker};
use storage::{DeckBackend, JsonFileBackend};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidOffset { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidOffset { raw } => write!(f, "invalid offset: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- review [--file <path>]   # interactive review pass");
    eprintln!("  cargo run -p app -- list   [--file <path>]");
    eprintln!("  cargo run -p app -- seed   [--file <path>]   # add a few sample cards");
    eprintln!("  cargo run -p app -- delete <offset>... [--file <path>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --file cards.json");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  FLASHDECK_FILE");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Review,
    List,
    Seed,
    Delete,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "review" => Some(Self::Review),
            "list" => Some(Self::List),
            "seed" => Some(Self::Seed),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }
}

struct Args {
    file: String,
    offsets: BTreeSet<usize>,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut file = std::env::var("FLASHDECK_FILE")
            .ok()
            .unwrap_or_else(|| "cards.json".into());
        let mut offsets = BTreeSet::new();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--file" => {
                    file = require_value(args, "--file")?;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                raw if !raw.starts_with("--") => {
                    let offset = raw
                        .parse::<usize>()
                        .map_err(|_| ArgsError::InvalidOffset { raw: arg.clone() })?;
                    offsets.insert(offset);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { file, offsets })
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    let cmd = match argv.first().map(String::as_str) {
        None => Command::Review,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Review,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let backend: Arc<dyn DeckBackend> = Arc::new(JsonFileBackend::new(&parsed.file)?);
    let deck = DeckService::load(backend).await;
    let (handle, join) = SessionLoop::spawn(deck);

    match cmd {
        Command::Seed => seed(&handle).await?,
        Command::List => list(&handle).await?,
        Command::Delete => delete(&handle, parsed.offsets).await?,
        Command::Review => review(&handle).await?,
    }

    handle.shutdown().await?;
    join.await?;
    Ok(())
}

async fn seed(handle: &SessionHandle) -> Result<(), Box<dyn std::error::Error>> {
    let samples = [
        ("In which year was SwiftUI released?", "2019"),
        ("What is the capital of Australia?", "Canberra"),
        ("6 * 7?", "42"),
    ];
    for (prompt, answer) in samples {
        let card = handle.add_card(prompt, answer).await?;
        println!("added {}", card.id());
    }
    Ok(())
}

async fn list(handle: &SessionHandle) -> Result<(), Box<dyn std::error::Error>> {
    let cards = handle.list_deck().await?;
    if cards.is_empty() {
        println!("deck is empty; try `seed` first");
        return Ok(());
    }
    for card in cards {
        println!("{}  {}  ->  {}", card.id(), card.prompt(), card.answer());
    }
    Ok(())
}

async fn review(handle: &SessionHandle) -> Result<(), Box<dyn std::error::Error>> {
    let ticker = Ticker::spawn(handle);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("y = right, n = wrong, a = reveal answer, p = pause, r = resume,");
    println!("x = restart, q = quit");

    loop {
        let session = handle.query_session().await?;
        match session.state {
            SessionState::Empty => {
                println!("NO CARDS LEFT -- x to start again, q to quit");
            }
            SessionState::Expired => {
                println!("TIME'S UP -- x to start again, q to quit");
            }
            SessionState::Loaded => {
                let card = session.current_card.as_ref().map(|c| c.prompt().as_str());
                println!(
                    "[{:>3}s, {} left] {}",
                    session.time_remaining,
                    session.queue_len,
                    card.unwrap_or("-")
                );
            }
        }

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let current = handle.query_session().await?.current_card;

        match line.trim() {
            "y" => {
                if let Some(card) = current {
                    handle.mark_right(card.id()).await?;
                }
            }
            "n" => {
                if let Some(card) = current {
                    handle.mark_wrong(card.id()).await?;
                }
            }
            "a" => {
                if let Some(card) = current {
                    println!("answer: {}", card.answer());
                }
            }
            "p" => handle.pause().await?,
            "r" => handle.resume().await?,
            "x" => handle.restart().await?,
            "q" => break,
            "" => {}
            other => println!("unrecognized input: {other}"),
        }
    }

    ticker.stop();
    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::init();
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

async fn delete(
    handle: &SessionHandle,
    offsets: BTreeSet<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    if offsets.is_empty() {
        println!("nothing to delete; pass one or more offsets");
        return Ok(());
    }
    handle.delete_cards(offsets).await?;
    handle.deck_edited().await?;
    println!("{} cards remain", handle.list_deck().await?.len());
    Ok(())
}
