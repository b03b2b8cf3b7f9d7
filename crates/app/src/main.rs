use std::io::Write as _;
use std::path::Path;

use log::debug;
use quiz_core::model::{QuizDraft, SessionKey};
use services::{AppServices, Clock, QuizServiceError, RandomPlayService, RandomTurn};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

mod args;
mod render;

use args::{Args, ArgsError, Command};

type Input = Lines<BufReader<Stdin>>;

/// Typed at the random-play prompt to stop; any other line, blank included, is an answer.
const QUIT: &str = ":q";

/// `None` is EOF.
fn wants_quit(line: Option<&str>) -> bool {
    line.is_none_or(|line| line.trim() == QUIT)
}

fn stdin_lines() -> Input {
    BufReader::new(tokio::io::stdin()).lines()
}

/// Print `prompt` and read one line; `None` on EOF.
async fn ask(input: &mut Input, prompt: &str) -> std::io::Result<Option<String>> {
    print!("{prompt}");
    std::io::stdout().flush()?;
    input.next_line().await
}

async fn run_random(random: &RandomPlayService, key: &SessionKey) -> Result<(), Box<dyn std::error::Error>> {
    let mut input = stdin_lines();
    loop {
        let turn = random.next_quiz(key).await.map_err(|e| e.user_message())?;

        let next = match turn {
            RandomTurn::Next(next) => next,
            RandomTurn::RoundComplete(done) => {
                println!("{}", render::round_complete(&done));
                return Ok(());
            }
        };

        println!("{}", render::next_quiz(&next));
        let line = ask(&mut input, "> ").await?;
        if wants_quit(line.as_deref()) {
            println!();
            return Ok(());
        }
        let answer = line.unwrap_or_default();

        let result = random
            .check_answer(key, next.quiz.id, Some(answer.as_str()))
            .await
            .map_err(|e| e.user_message())?;
        println!("{}", render::random_result(&result));
        println!();
    }
}

async fn run_command(services: &AppServices, args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let quizzes = services.quizzes();
    match &args.command {
        Command::List => {
            println!("{}", render::quiz_list(&quizzes.list_quizzes().await?));
        }
        Command::Show(id) => {
            println!("{}", render::quiz_detail(&quizzes.load_quiz(*id).await?));
        }
        Command::New { question, answer } => {
            match quizzes
                .create_quiz(QuizDraft::new(question.as_str(), answer.as_str()))
                .await
            {
                Ok(quiz) => {
                    println!("Quiz created successfully.");
                    println!("{}", render::quiz_detail(&quiz));
                }
                Err(QuizServiceError::Validation(err)) => {
                    eprintln!("{}", render::form_errors(&err));
                    return Err(err.into());
                }
                Err(other) => return Err(other.into()),
            }
        }
        Command::Edit {
            id,
            question,
            answer,
        } => {
            let mut draft = quizzes.load_quiz(*id).await?.to_draft();
            if let Some(question) = question {
                draft.question.clone_from(question);
            }
            if let Some(answer) = answer {
                draft.answer.clone_from(answer);
            }
            match quizzes.update_quiz(*id, draft).await {
                Ok(quiz) => {
                    println!("Quiz edited successfully.");
                    println!("{}", render::quiz_detail(&quiz));
                }
                Err(QuizServiceError::Validation(err)) => {
                    eprintln!("{}", render::form_errors(&err));
                    return Err(err.into());
                }
                Err(other) => return Err(other.into()),
            }
        }
        Command::Delete(id) => {
            quizzes.delete_quiz(*id).await?;
            println!("Quiz deleted successfully.");
        }
        Command::Play { id, answer } => {
            let play = services.play();
            let answer = match answer {
                Some(answer) => Some(answer.clone()),
                None => {
                    let prompt = play.play(*id, None).await?;
                    println!("{}", prompt.quiz.question());
                    ask(&mut stdin_lines(), "> ").await?
                }
            };
            let checked = play.check(*id, answer.as_deref()).await?;
            println!("{}", render::check_result(&checked));
        }
        Command::Random => run_random(&services.random_play(), &args.session).await?,
    }
    Ok(())
}

/// Create the parent directory of a file-backed `SQLite` URL.
fn prepare_sqlite_dir(db_url: &str) -> std::io::Result<()> {
    let Some(rest) = db_url.strip_prefix("sqlite:") else {
        return Ok(());
    };
    let path = rest.trim_start_matches("//");
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() || path.starts_with(':') || path.starts_with("file:") {
        return Ok(());
    }
    match Path::new(path).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = match Args::parse() {
        Ok(args) => args,
        Err(ArgsError::HelpRequested) => {
            args::print_usage();
            return Ok(());
        }
        Err(e) => {
            eprintln!("{e}");
            args::print_usage();
            return Err(e.into());
        }
    };
    debug!("using {} as session {}", args.db_url, args.session);

    prepare_sqlite_dir(&args.db_url)?;
    let services = AppServices::new_sqlite(&args.db_url, Clock::system(), args.seed).await?;
    run_command(&services, &args).await
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepare_skips_memory_urls() {
        assert!(prepare_sqlite_dir("sqlite::memory:").is_ok());
        assert!(prepare_sqlite_dir("sqlite:file:mem?mode=memory&cache=shared").is_ok());
        assert!(prepare_sqlite_dir("sqlite:quiz.sqlite3").is_ok());
    }

    #[test]
    fn blank_answer_is_submitted_not_quit() {
        assert!(!wants_quit(Some("")));
        assert!(!wants_quit(Some("   ")));
        assert!(!wants_quit(Some("Rome")));
        assert!(wants_quit(Some(":q")));
        assert!(wants_quit(Some(" :q ")));
        assert!(wants_quit(None));
    }
}
