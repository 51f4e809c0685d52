use std::sync::Arc;

use fleche_client::config::ClientConfig;
use fleche_client::{
    runtime, Bootstrap, HttpGameApi, Input, JoinState, Key, Position, TextRenderer,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_help() {
    println!("fleche - collaborative mots fléchés in the terminal");
    println!();
    println!("USAGE:");
    println!("    fleche [OPTIONS] <GAME_ID> [PSEUDO]");
    println!();
    println!("OPTIONS:");
    println!("    -s, --server URL  API base URL (overrides config)");
    println!("    -h, --help        Print help information");
    println!("    -v, --version     Print version");
    println!();
    println!("COMMANDS (stdin, one per line):");
    println!("    click ROW COL     Select a cell (same cell again flips direction)");
    println!("    key NAME          Press a key: ArrowUp, Tab, Backspace, Delete, a..z");
    println!("    WORD              Type the letters of WORD");
    println!("    quit              Leave the game");
    println!();
    println!("CONFIG:");
    println!("    ~/.config/fleche/config.toml");
}

/// Command line after flags
#[derive(Debug, Default, PartialEq, Eq)]
struct Args {
    server: Option<String>,
    game_id: Option<String>,
    pseudo: Option<String>,
}

enum Parsed {
    Run(Args),
    Exit,
}

fn parse_args(args: &[String]) -> anyhow::Result<Parsed> {
    let mut parsed = Args::default();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--version" | "-v" => {
                println!("fleche {VERSION}");
                return Ok(Parsed::Exit);
            }
            "--help" | "-h" => {
                print_help();
                return Ok(Parsed::Exit);
            }
            "--server" | "-s" if i + 1 < args.len() => {
                parsed.server = Some(args[i + 1].clone());
                i += 2;
            }
            arg if !arg.starts_with('-') => {
                if parsed.game_id.is_none() {
                    parsed.game_id = Some(arg.to_string());
                } else if parsed.pseudo.is_none() {
                    parsed.pseudo = Some(arg.to_string());
                } else {
                    anyhow::bail!("unexpected argument {arg:?}");
                }
                i += 1;
            }
            other => anyhow::bail!("unknown option {other:?} (see --help)"),
        }
    }
    Ok(Parsed::Run(parsed))
}

/// One stdin line
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Inputs(Vec<Input>),
    Quit,
    Invalid(String),
}

fn parse_command(line: &str) -> Command {
    let words: Vec<&str> = line.split_whitespace().collect();
    match words.as_slice() {
        [] => Command::Inputs(Vec::new()),
        ["quit" | "exit"] => Command::Quit,
        ["click", row, col] => match (row.parse(), col.parse()) {
            (Ok(row), Ok(col)) => Command::Inputs(vec![Input::Click(Position::new(row, col))]),
            _ => Command::Invalid(format!("bad cell {row} {col}")),
        },
        ["key", name] => Command::Inputs(vec![Input::Key(Key::from(*name))]),
        [word] if word.chars().all(|c| c.is_ascii_alphabetic()) => Command::Inputs(
            word.chars()
                .map(|c| Input::Key(Key::from(c.to_string().as_str())))
                .collect(),
        ),
        _ => Command::Invalid(format!("unknown command {line:?}")),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Parsed::Run(args) = parse_args(&args)? else {
        return Ok(());
    };
    let Some(game_id) = args.game_id else {
        print_help();
        anyhow::bail!("missing game id");
    };

    ClientConfig::create_default_if_missing();
    let mut config = ClientConfig::load();
    if let Some(server) = args.server {
        config.server.base_url = server;
    }
    tracing::info!(server = %config.server.base_url, game = %game_id, "Starting");

    let api = Arc::new(HttpGameApi::new(&config.server)?);
    let mut bootstrap = Bootstrap::new(Arc::clone(&api), game_id);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    // Stay unjoined until a name is accepted
    let mut name = args.pseudo;
    loop {
        let candidate = match name.take() {
            Some(candidate) => candidate,
            None => {
                eprintln!("pseudo?");
                match lines.next_line().await? {
                    Some(line) => line,
                    None => return Ok(()),
                }
            }
        };
        match bootstrap.join(&candidate).await {
            Ok(true) => break,
            Ok(false) => {}
            Err(e) => eprintln!("error: {e}"),
        }
    }
    if let JoinState::Joined { pseudo, color } = bootstrap.state() {
        tracing::info!(%pseudo, %color, "Joined");
        eprintln!("joined as {pseudo} {color}");
    }

    let session = bootstrap
        .load(TextRenderer::new(std::io::stderr()), &config)
        .await?;

    let (tx, rx) = mpsc::channel(64);
    tokio::spawn(async move {
        while let Ok(Some(line)) = lines.next_line().await {
            match parse_command(&line) {
                Command::Inputs(inputs) => {
                    for input in inputs {
                        if tx.send(input).await.is_err() {
                            return;
                        }
                    }
                }
                Command::Quit => return,
                Command::Invalid(message) => eprintln!("error: {message}"),
            }
        }
    });

    let session = runtime::run(api, session, rx).await;
    tracing::info!(pseudo = %session.pseudo(), "Left game");
    Ok(())
}
