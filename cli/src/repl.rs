//! Interactive session loop: choose an application and level, generate classes, repeat.
//!
//! One [`PlanSession`](classgen::PlanSession) lives for the whole loop, so `again`
//! is served from its cache and later prompts list the classes already suggested.

use std::io::Write;

use classgen::{Difficulty, PlanError, PlanRequest, RequestToken};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::Instrument;

use classgen_cli::{levels_text, plan_text, CliError, Creator, WAIT_NOTICE};

#[derive(Debug, PartialEq, Eq)]
enum SessionCommand<'a> {
    Use(&'a str),
    Level(&'a str),
    New,
    Again,
    History,
    Help,
    Quit,
    Unknown(&'a str),
}

fn parse_command(line: &str) -> SessionCommand<'_> {
    let line = line.trim();
    let (head, arg) = match line.split_once(char::is_whitespace) {
        Some((h, a)) => (h, a.trim()),
        None => (line, ""),
    };
    match head.to_lowercase().as_str() {
        "use" if !arg.is_empty() => SessionCommand::Use(arg),
        "level" if !arg.is_empty() => SessionCommand::Level(arg),
        "new" => SessionCommand::New,
        "again" => SessionCommand::Again,
        "history" => SessionCommand::History,
        "help" | "?" => SessionCommand::Help,
        "quit" | "exit" | "/quit" => SessionCommand::Quit,
        _ => SessionCommand::Unknown(line),
    }
}

const HELP: &str = "commands: use <APP>, level <LEVEL>, new, again, history, quit";

/// Runs the loop until EOF (Ctrl+D) or `quit`/`exit`. Generation errors are printed
/// to stderr and the loop continues.
pub async fn run_session_loop(creator: &Creator) -> Result<(), CliError> {
    let session = creator.session()?;
    let profile = creator.profile();
    let mut application: Option<String> = None;
    let mut level: Option<Difficulty> = None;
    let mut last: Option<(PlanRequest, RequestToken)> = None;
    let mut reader = BufReader::new(tokio::io::stdin()).lines();

    println!(
        "applications: {}",
        profile.application_names().collect::<Vec<_>>().join(", ")
    );
    println!(
        "levels: {}",
        levels_text(&profile.difficulties).replace('\n', ", ")
    );
    println!("{}", HELP);

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let line = match reader.next_line().await? {
            None => break,
            Some(s) if s.trim().is_empty() => continue,
            Some(s) => s,
        };

        match parse_command(&line) {
            SessionCommand::Quit => break,
            SessionCommand::Help => println!("{}", HELP),
            SessionCommand::Unknown(s) => eprintln!("unknown command: {} ({})", s, HELP),
            SessionCommand::Use(app) => match profile.application(app) {
                Some(entry) => {
                    println!("application: {}", entry.name);
                    application = Some(entry.name.clone());
                }
                None => eprintln!("{} is not one of the offered applications.", app),
            },
            SessionCommand::Level(l) => match l.parse::<Difficulty>() {
                Ok(d) if profile.offers_difficulty(d) => {
                    println!("level: {}", d);
                    level = Some(d);
                }
                Ok(d) => eprintln!("{}", PlanError::UnsupportedDifficulty(d).user_message()),
                Err(_) => eprintln!("{}", PlanError::UnknownDifficulty(l.to_string()).user_message()),
            },
            SessionCommand::History => {
                let titles = session.history().await;
                if titles.is_empty() {
                    println!("no classes yet");
                }
                for (i, t) in titles.iter().enumerate() {
                    println!("{}. {}", i + 1, t);
                }
            }
            SessionCommand::New => {
                let (Some(app), Some(lvl)) = (application.as_deref(), level) else {
                    eprintln!("choose an application and a level first ({})", HELP);
                    continue;
                };
                let request = match creator.request(app, lvl.label()) {
                    Ok(r) => r,
                    Err(e) => {
                        eprintln!("{}", e.user_message());
                        continue;
                    }
                };
                let token = RequestToken::mint();
                eprintln!("{}", WAIT_NOTICE);
                let span = tracing::info_span!("generate", application = %request.application, %token);
                match session.fetch(&request, token).instrument(span).await {
                    Ok(plan) => {
                        println!("{}", plan_text(&plan, profile.logo_for(&plan.application)));
                        last = Some((request, token));
                    }
                    Err(e) => eprintln!("{}", e.user_message()),
                }
            }
            SessionCommand::Again => {
                let Some((request, token)) = &last else {
                    eprintln!("no class generated yet");
                    continue;
                };
                match session.fetch(request, *token).await {
                    Ok(plan) => println!("{}", plan_text(&plan, profile.logo_for(&plan.application))),
                    Err(e) => eprintln!("{}", e.user_message()),
                }
            }
        }
    }

    println!("Bye.");
    Ok(())
}
