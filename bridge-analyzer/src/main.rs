use bridge_play::{Command, DdsOracle, PlayError, Session};
use clap::Parser;
use std::io::{self, BufRead, Write};
use tracing::{info, Level};

#[derive(Parser, Debug)]
#[command(name = "bridge-analyzer")]
#[command(about = "Track the card play of a bridge deal with double-dummy help", long_about = None)]
struct Args {
    /// Hands in PBN notation, e.g. "N:AK.QJ.T9.8765 ..."
    #[arg(short = 'd', long = "deal")]
    deal: Option<String>,

    /// Contract or denomination (3NT, 4S, H, ...); needs --leader
    #[arg(short = 'c', long = "contract", requires = "leader")]
    contract: Option<String>,

    /// Seat on lead to the first tracked trick
    #[arg(short = 'l', long = "leader", requires = "contract")]
    leader: Option<String>,

    /// Seat whose plays the history marks
    #[arg(short = 'p', long = "perspective")]
    perspective: Option<String>,

    /// Worker threads for trick tables (0 = one per core)
    #[arg(short = 't', long = "threads", default_value = "0")]
    threads: usize,

    /// Log level written to stderr
    #[arg(long = "log-level", default_value = "warn")]
    log_level: Level,
}

/// Commands implied by the command line, run before reading stdin
fn startup_commands(args: &Args) -> Vec<Command> {
    let mut commands = Vec::new();
    if let Some(seat) = &args.perspective {
        commands.push(Command::Perspective(Some(seat.clone())));
    }
    if let Some(deal) = &args.deal {
        commands.push(Command::Deal(deal.clone()));
    }
    if let (Some(contract), Some(leader)) = (&args.contract, &args.leader) {
        commands.push(Command::Contract {
            contract: contract.clone(),
            leader: leader.clone(),
        });
    }
    commands
}

fn is_quit(line: &str) -> bool {
    matches!(line.trim().to_ascii_lowercase().as_str(), "quit" | "exit" | "q")
}

fn run(session: &mut Session<DdsOracle>) -> io::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    for line in stdin.lock().lines() {
        let line = line?;
        if is_quit(&line) {
            break;
        }
        match session.run_line(&line) {
            Ok(text) if text.is_empty() => {}
            Ok(text) => writeln!(stdout, "{}", text)?,
            Err(err) => writeln!(stdout, "error: {}", err)?,
        }
        stdout.flush()?;
    }
    Ok(())
}

fn startup(args: &Args, session: &mut Session<DdsOracle>) -> Result<(), PlayError> {
    for command in startup_commands(args) {
        let text = session.execute(command)?;
        if !text.is_empty() {
            println!("{}", text);
        }
    }
    Ok(())
}

fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_writer(io::stderr)
        .init();

    if args.threads > 0 {
        if let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(args.threads)
            .build_global()
        {
            eprintln!("Thread pool error: {}", e);
            std::process::exit(2);
        }
    }

    let mut session = Session::new(DdsOracle);
    if let Err(e) = startup(&args, &mut session) {
        eprintln!("Startup error: {}", e);
        std::process::exit(2);
    }
    info!(threads = args.threads, "session ready");

    if let Err(e) = run(&mut session) {
        eprintln!("I/O error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_build_startup_commands() {
        let args = Args::parse_from([
            "bridge-analyzer",
            "--deal",
            "N:A... K... Q... J...",
            "-c",
            "3nt",
            "-l",
            "w",
            "--log-level",
            "debug",
        ]);
        assert_eq!(args.log_level, Level::DEBUG);
        assert_eq!(
            startup_commands(&args),
            vec![
                Command::Deal("N:A... K... Q... J...".to_string()),
                Command::Contract {
                    contract: "3nt".to_string(),
                    leader: "w".to_string()
                }
            ]
        );
    }

    #[test]
    fn test_contract_requires_leader() {
        assert!(Args::try_parse_from(["bridge-analyzer", "-c", "4s"]).is_err());
    }

    #[test]
    fn test_startup_runs_session() {
        let args = Args::parse_from([
            "bridge-analyzer",
            "-d",
            "N:A.2.. .A..2 2.3.. ...43",
            "-c",
            "nt",
            "-l",
            "n",
        ]);
        let mut session = Session::new(DdsOracle);
        startup(&args, &mut session).unwrap();
        assert_eq!(session.run_line("player").unwrap(), "N to play");
        assert!(is_quit(" Quit "));
    }
}
