use std::fmt;

use quiz_core::model::{QuizId, SessionKey, SessionKeyError};

pub const DEFAULT_DB_URL: &str = "sqlite:quiz.sqlite3";
pub const DEFAULT_SESSION: &str = "local";

#[derive(Debug, PartialEq, Eq)]
pub enum ArgsError {
    MissingValue { flag: &'static str },
    MissingCommand,
    MissingQuizId { command: &'static str },
    MissingField { command: &'static str, flag: &'static str },
    UnknownArg(String),
    UnknownCommand(String),
    InvalidQuizId { raw: String },
    InvalidDbUrl { raw: String },
    InvalidSeed { raw: String },
    InvalidSession(SessionKeyError),
    HelpRequested,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingCommand => write!(f, "no command given"),
            ArgsError::MissingQuizId { command } => write!(f, "{command} requires a quiz id"),
            ArgsError::MissingField { command, flag } => write!(f, "{command} requires {flag}"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown command: {cmd}"),
            ArgsError::InvalidQuizId { raw } => write!(f, "invalid quiz id: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidSeed { raw } => write!(f, "invalid --seed value: {raw}"),
            ArgsError::InvalidSession(e) => write!(f, "invalid --session value: {e}"),
            ArgsError::HelpRequested => write!(f, "help requested"),
        }
    }
}

impl std::error::Error for ArgsError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Show(QuizId),
    New {
        question: String,
        answer: String,
    },
    Edit {
        id: QuizId,
        question: Option<String>,
        answer: Option<String>,
    },
    Delete(QuizId),
    Play {
        id: QuizId,
        answer: Option<String>,
    },
    Random,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub db_url: String,
    pub session: SessionKey,
    pub seed: Option<u64>,
    pub command: Command,
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_seed(raw: String) -> Result<u64, ArgsError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| ArgsError::InvalidSeed { raw })
}

fn parse_quiz_id(raw: &str) -> Result<QuizId, ArgsError> {
    raw.parse().map_err(|_| ArgsError::InvalidQuizId {
        raw: raw.to_owned(),
    })
}

/// Flags and positionals collected before the command shape is known.
#[derive(Default)]
struct Pending {
    command: Option<String>,
    positional: Option<String>,
    question: Option<String>,
    answer: Option<String>,
}

impl Args {
    /// Parse process arguments, falling back to `QUIZ_*` environment variables.
    pub fn parse() -> Result<Self, ArgsError> {
        Self::parse_from(std::env::args().skip(1), |name| std::env::var(name).ok())
    }

    /// Parse `argv` (without the program name), reading defaults through `env`.
    pub fn parse_from(
        argv: impl IntoIterator<Item = String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ArgsError> {
        let mut db_url = env("QUIZ_DB_URL").unwrap_or_else(|| DEFAULT_DB_URL.into());
        let mut session = env("QUIZ_SESSION").unwrap_or_else(|| DEFAULT_SESSION.into());
        let mut seed = env("QUIZ_SEED").map(parse_seed).transpose()?;
        let mut pending = Pending::default();

        let mut args = argv.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = value;
                }
                "--session" => session = require_value(&mut args, "--session")?,
                "--seed" => seed = Some(parse_seed(require_value(&mut args, "--seed")?)?),
                "--question" | "-q" => {
                    pending.question = Some(require_value(&mut args, "--question")?);
                }
                "--answer" | "-a" => pending.answer = Some(require_value(&mut args, "--answer")?),
                "--help" | "-h" => return Err(ArgsError::HelpRequested),
                flag if flag.starts_with('-') => return Err(ArgsError::UnknownArg(arg)),
                _ if pending.command.is_none() => pending.command = Some(arg),
                _ if pending.positional.is_none() => pending.positional = Some(arg),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let session = SessionKey::new(session).map_err(ArgsError::InvalidSession)?;
        let command = build_command(pending)?;

        Ok(Self {
            db_url,
            session,
            seed,
            command,
        })
    }
}

fn build_command(pending: Pending) -> Result<Command, ArgsError> {
    let Pending {
        command,
        positional,
        question,
        answer,
    } = pending;
    let name = command.ok_or(ArgsError::MissingCommand)?;

    let quiz_id = |command: &'static str| -> Result<QuizId, ArgsError> {
        positional
            .as_deref()
            .ok_or(ArgsError::MissingQuizId { command })
            .and_then(parse_quiz_id)
    };
    let no_positional = || match &positional {
        Some(extra) => Err(ArgsError::UnknownArg(extra.clone())),
        None => Ok(()),
    };

    let command = match name.as_str() {
        "list" => {
            no_positional()?;
            Command::List
        }
        "show" => Command::Show(quiz_id("show")?),
        "new" => {
            no_positional()?;
            Command::New {
                question: question.ok_or(ArgsError::MissingField {
                    command: "new",
                    flag: "--question",
                })?,
                answer: answer.ok_or(ArgsError::MissingField {
                    command: "new",
                    flag: "--answer",
                })?,
            }
        }
        "edit" => Command::Edit {
            id: quiz_id("edit")?,
            question,
            answer,
        },
        "delete" => Command::Delete(quiz_id("delete")?),
        "play" => Command::Play {
            id: quiz_id("play")?,
            answer,
        },
        "random" => {
            no_positional()?;
            Command::Random
        }
        _ => return Err(ArgsError::UnknownCommand(name)),
    };
    Ok(command)
}

pub fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [options] <command>");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  list                                   List every quiz");
    eprintln!("  show <id>                              Show one quiz");
    eprintln!("  new --question <text> --answer <text>  Create a quiz");
    eprintln!("  edit <id> [--question <text>] [--answer <text>]");
    eprintln!("                                         Edit a quiz");
    eprintln!("  delete <id>                            Delete a quiz");
    eprintln!("  play <id> [--answer <text>]            Answer one quiz");
    eprintln!("  random                                 Random play with streak scoring");
    eprintln!("                                         (type :q or send EOF to stop)");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>      SQLite URL (default: {DEFAULT_DB_URL})");
    eprintln!("  --session <key>        Random-play session key (default: {DEFAULT_SESSION})");
    eprintln!("  --seed <n>             Fixed seed for random play");
    eprintln!("  -h, --help             Show this help");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DB_URL, QUIZ_SESSION, QUIZ_SEED, RUST_LOG");
}
