//! Text command surface over a play session.
//!
//! Each line names one command and its arguments; executing it returns
//! the text to show the user.

use bridge_core::Position;
use bridge_pbn::{parse_card, parse_position};
use std::str::FromStr;

use crate::contract::Contract;
use crate::engine::{CompletedTrick, PlayEngine};
use crate::layout::{AutoFill, Layout};
use crate::oracle::Oracle;
use crate::render::{
    render_dd_table, render_hand, render_history, render_move_options, render_table, west_width,
};
use crate::PlayError;

pub const HELP: &str = "\
Commands:
  deal <notation>          load four hands, e.g. N:AKQ.T9.. ...
  layout [notation]        start editing a layout, empty or from notation
  add <card> <seat>        give a missing card to a seat
  move <card> <seat>       move a card to another seat
  remove <card>            take a card out of the layout
  rotate [ccw]             turn all hands one seat clockwise
  missing                  list the cards in no hand
  preview                  show the layout being edited
  notation                 print the layout as hand notation
  accept                   start play on the edited layout
  contract <denom> <seat>  set trump and opening leader, e.g. contract 3NT W
  play <card>              play one card for the seat on move
  trick <c1> <c2> <c3> <c4> play a whole trick from the leader
  undo                     take back the last card
  undotrick                take back the last complete trick
  goto <trick>             rewind to the start of a trick
  gotocard <trick> <pos>   rewind to just before a card of a trick
  best                     show the double-dummy best card
  options                  show tricks after each legal card
  auto                     play the best card
  autotrick                finish the trick with best cards
  autotricks <n>           play n tricks with best cards
  end                      play to the end with best cards
  abandon                  discard the last auto-played tricks
  legal                    list legal cards
  player                   show whose turn it is
  score                    show tricks won by each side
  history                  show the play so far
  table                    show the trick table of the deal
  display                  show the table diagram
  hand                     show the hand on move
  perspective [seat]       mark a seat's plays in the history
  export                   print the deal and play as PBN
  help                     show this text";

/// One parsed command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Deal(String),
    Layout(Option<String>),
    Add { card: String, seat: String },
    Move { card: String, seat: String },
    Remove(String),
    Rotate { clockwise: bool },
    Missing,
    Preview,
    Notation,
    Accept,
    Contract { contract: String, leader: String },
    Play(String),
    Trick(String),
    Undo,
    UndoTrick,
    Goto(usize),
    GotoCard(usize, usize),
    Best,
    Options,
    Auto,
    AutoTrick,
    AutoTricks(usize),
    End,
    Abandon,
    Legal,
    Player,
    Score,
    History,
    Table,
    Display,
    Hand,
    Perspective(Option<String>),
    Export,
    Help,
}

fn number(arg: Option<&str>, usage: &str) -> Result<usize, PlayError> {
    arg.and_then(|s| s.parse().ok())
        .ok_or_else(|| PlayError::InvalidArgument(format!("usage: {}", usage)))
}

fn rest(args: &[&str], usage: &str) -> Result<String, PlayError> {
    if args.is_empty() {
        return Err(PlayError::InvalidArgument(format!("usage: {}", usage)));
    }
    Ok(args.join(" "))
}

impl FromStr for Command {
    type Err = PlayError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let (name, args) = words
            .split_first()
            .ok_or_else(|| PlayError::UnknownCommand(String::new()))?;

        let command = match name.to_ascii_lowercase().as_str() {
            "deal" => Command::Deal(rest(args, "deal <notation>")?),
            "layout" => Command::Layout((!args.is_empty()).then(|| args.join(" "))),
            "add" | "move" => match args {
                [card, seat] => {
                    let (card, seat) = (card.to_string(), seat.to_string());
                    if name.eq_ignore_ascii_case("add") {
                        Command::Add { card, seat }
                    } else {
                        Command::Move { card, seat }
                    }
                }
                _ => {
                    return Err(PlayError::InvalidArgument(format!(
                        "usage: {} <card> <seat>",
                        name.to_ascii_lowercase()
                    )))
                }
            },
            "remove" => Command::Remove(rest(args, "remove <card>")?),
            "rotate" => match args.first().map(|a| a.to_ascii_lowercase()) {
                None => Command::Rotate { clockwise: true },
                Some(dir) if dir == "ccw" => Command::Rotate { clockwise: false },
                Some(_) => {
                    return Err(PlayError::InvalidArgument("usage: rotate [ccw]".to_string()))
                }
            },
            "missing" => Command::Missing,
            "preview" => Command::Preview,
            "notation" => Command::Notation,
            "accept" => Command::Accept,
            "contract" => match args {
                [contract, leader] => Command::Contract {
                    contract: contract.to_string(),
                    leader: leader.to_string(),
                },
                _ => {
                    return Err(PlayError::InvalidArgument(
                        "usage: contract <denom> <seat>".to_string(),
                    ))
                }
            },
            "play" => Command::Play(rest(args, "play <card>")?),
            "trick" => Command::Trick(args.join(" ")),
            "undo" => Command::Undo,
            "undotrick" => Command::UndoTrick,
            "goto" => Command::Goto(number(args.first().copied(), "goto <trick>")?),
            "gotocard" => Command::GotoCard(
                number(args.first().copied(), "gotocard <trick> <pos>")?,
                number(args.get(1).copied(), "gotocard <trick> <pos>")?,
            ),
            "best" => Command::Best,
            "options" => Command::Options,
            "auto" => Command::Auto,
            "autotrick" => Command::AutoTrick,
            "autotricks" => Command::AutoTricks(number(args.first().copied(), "autotricks <n>")?),
            "end" => Command::End,
            "abandon" => Command::Abandon,
            "legal" => Command::Legal,
            "player" => Command::Player,
            "score" => Command::Score,
            "history" => Command::History,
            "table" => Command::Table,
            "display" => Command::Display,
            "hand" => Command::Hand,
            "perspective" => Command::Perspective(args.first().map(|s| s.to_string())),
            "export" => Command::Export,
            "help" => Command::Help,
            other => return Err(PlayError::UnknownCommand(other.to_string())),
        };
        Ok(command)
    }
}

fn describe_trick(done: &CompletedTrick) -> String {
    format!("{}, won by {}", done.trick, done.winner)
}

fn with_fill(mut text: String, filled: Option<AutoFill>) -> String {
    if let Some(fill) = filled {
        let cards: Vec<String> = fill.cards.iter().map(|c| c.to_string()).collect();
        text.push_str(&format!(
            "\nPlaced {} missing card(s) with {}: {}",
            cards.len(),
            fill.player,
            cards.join(" ")
        ));
    }
    text
}

/// One user's session: the oracle to consult, the deal being tracked and
/// any layout still being edited
pub struct Session<O> {
    oracle: O,
    engine: Option<PlayEngine<O>>,
    layout: Option<Layout>,
    perspective: Option<Position>,
}

impl<O: Oracle + Clone> Session<O> {
    pub fn new(oracle: O) -> Self {
        Self {
            oracle,
            engine: None,
            layout: None,
            perspective: None,
        }
    }

    pub fn engine(&self) -> Option<&PlayEngine<O>> {
        self.engine.as_ref()
    }

    pub fn layout(&self) -> Option<&Layout> {
        self.layout.as_ref()
    }

    fn engine_mut(&mut self) -> Result<&mut PlayEngine<O>, PlayError> {
        self.engine.as_mut().ok_or(PlayError::NoDeal)
    }

    /// Parse and execute one line; blank lines produce no output
    pub fn run_line(&mut self, line: &str) -> Result<String, PlayError> {
        if line.trim().is_empty() {
            return Ok(String::new());
        }
        let command: Command = line.parse()?;
        self.execute(command)
    }

    pub fn execute(&mut self, command: Command) -> Result<String, PlayError> {
        match &command {
            Command::Help => return Ok(HELP.to_string()),
            Command::Deal(text) => return self.load(text),
            Command::Layout(text) => {
                let layout = match text {
                    Some(text) => Layout::from_notation(text)?,
                    None => Layout::new(),
                };
                let preview = layout.preview();
                self.layout = Some(layout);
                return Ok(preview);
            }
            Command::Accept => {
                let layout = self.layout.clone().ok_or(PlayError::NoLayout)?;
                let text = self.start(layout, None)?;
                self.layout = None;
                return Ok(text);
            }
            Command::Add { .. }
            | Command::Move { .. }
            | Command::Remove(_)
            | Command::Rotate { .. }
            | Command::Missing
            | Command::Preview
            | Command::Notation => return self.edit_layout(&command),
            Command::Perspective(seat) => {
                self.perspective = seat.as_deref().map(parse_position).transpose()?;
                if let Some(engine) = self.engine.as_mut() {
                    engine.set_perspective(self.perspective);
                }
                return Ok(match self.perspective {
                    Some(seat) => format!("History marks {}'s plays.", seat),
                    None => "History marks your own plays.".to_string(),
                });
            }
            _ => {}
        }

        let engine = self.engine_mut()?;
        let text = match command {
            Command::Contract { contract, leader } => {
                let contract = Contract::parse(&contract, &leader)?;
                engine.set_contract(contract);
                format!("Contract {}.", contract)
            }
            Command::Play(token) => format!("Played {}", engine.play_token(&token)?),
            Command::Trick(tokens) => {
                format!("Trick {}", describe_trick(&engine.play_trick_tokens(&tokens)?))
            }
            Command::Undo => format!("Took back {}", engine.undo_last_card()?),
            Command::UndoTrick => format!("Took back trick {}", engine.undo_last_trick()?),
            Command::Goto(n) => {
                engine.goto_trick(n)?;
                format!("Back to trick {}.", n)
            }
            Command::GotoCard(n, pos) => {
                engine.goto_checkpoint(n, pos)?;
                format!("Back to trick {}, card {}.", n, pos)
            }
            Command::Best => {
                let card = engine.optimal_move()?;
                format!("Best card for {}: {}", engine.current_player()?, card)
            }
            Command::Options => {
                let options = engine.move_options()?;
                render_move_options(engine.current_player()?, &options)
            }
            Command::Auto => format!("Engine played {}", engine.play_optimal_card()?),
            Command::AutoTrick => {
                format!("Engine played {}", describe_trick(&engine.play_optimal_trick()?))
            }
            Command::AutoTricks(n) => {
                let first = engine.history().completed_count();
                let done = engine.play_optimal_tricks(n)?;
                let lines: Vec<String> = done
                    .iter()
                    .enumerate()
                    .map(|(i, t)| {
                        format!("{:2}: {}", engine.trick_number(first + i), describe_trick(t))
                    })
                    .collect();
                if lines.is_empty() {
                    "No tricks played.".to_string()
                } else {
                    lines.join("\n")
                }
            }
            Command::End => {
                let done = engine.play_to_end()?;
                format!(
                    "Played {} trick(s) to the end. Score: {}",
                    done.len(),
                    engine.score()
                )
            }
            Command::Abandon => {
                format!("Discarded {} auto-played trick(s).", engine.abandon_auto_plan()?)
            }
            Command::Legal => {
                let cards: Vec<String> = engine
                    .legal_moves()?
                    .iter()
                    .map(|c| c.to_string())
                    .collect();
                format!("Legal: {}", cards.join(" "))
            }
            Command::Player => {
                if engine.is_complete() {
                    "The deal is complete.".to_string()
                } else {
                    format!("{} to play", engine.current_player()?)
                }
            }
            Command::Score => engine.score().to_string(),
            Command::History => render_history(
                engine.history(),
                engine.state().trump(),
                engine.perspective(),
            ),
            Command::Table => render_dd_table(&engine.dd_table()?),
            Command::Display => {
                let to_play = if engine.is_complete() {
                    None
                } else {
                    engine.current_player().ok()
                };
                render_table(
                    engine.state().hands(),
                    engine.history().current(),
                    to_play,
                    west_width(engine.original()),
                )
            }
            Command::Hand => {
                let player = engine.current_player()?;
                render_hand(player, engine.state().hands().hand(player))
            }
            Command::Export => engine.export_pbn(None),
            Command::Help
            | Command::Deal(_)
            | Command::Layout(_)
            | Command::Add { .. }
            | Command::Move { .. }
            | Command::Remove(_)
            | Command::Rotate { .. }
            | Command::Missing
            | Command::Preview
            | Command::Notation
            | Command::Accept
            | Command::Perspective(_) => String::new(),
        };
        Ok(text)
    }

    fn edit_layout(&mut self, command: &Command) -> Result<String, PlayError> {
        let layout = self.layout.as_mut().ok_or(PlayError::NoLayout)?;
        let text = match command {
            Command::Add { card, seat } => {
                let (card, seat) = (parse_card(card)?, parse_position(seat)?);
                let filled = layout.add(card, seat)?;
                with_fill(format!("Added {} to {}.", card, seat), filled)
            }
            Command::Move { card, seat } => {
                let (card, seat) = (parse_card(card)?, parse_position(seat)?);
                let filled = layout.move_card(card, seat)?;
                with_fill(format!("Moved {} to {}.", card, seat), filled)
            }
            Command::Remove(card) => {
                let card = parse_card(card)?;
                format!("Removed {} from {}.", card, layout.remove(card)?)
            }
            Command::Rotate { clockwise: true } => {
                layout.rotate_clockwise();
                "Rotated the hands clockwise.".to_string()
            }
            Command::Rotate { clockwise: false } => {
                layout.rotate_counter_clockwise();
                "Rotated the hands counter-clockwise.".to_string()
            }
            Command::Missing => {
                let missing = layout.missing_cards();
                if missing.is_empty() {
                    "All cards placed.".to_string()
                } else {
                    let cards: Vec<String> = missing.iter().map(|c| c.to_string()).collect();
                    format!("Missing {} card(s): {}", cards.len(), cards.join(" "))
                }
            }
            Command::Preview => layout.preview(),
            Command::Notation => layout.to_notation(),
            _ => String::new(),
        };
        Ok(text)
    }

    fn load(&mut self, notation: &str) -> Result<String, PlayError> {
        let mut layout = Layout::from_notation(notation)?;
        let filled = layout.auto_fill();
        self.start(layout, filled)
    }

    fn start(&mut self, layout: Layout, filled: Option<AutoFill>) -> Result<String, PlayError> {
        let engine = layout
            .into_engine(self.oracle.clone())?
            .with_perspective(self.perspective);
        let per_hand = engine.original().north.len();
        self.engine = Some(engine);
        Ok(with_fill(
            format!("Deal loaded, {} card(s) per hand.", per_hand),
            filled,
        ))
    }
}
