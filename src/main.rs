use anyhow::{Context, Result};
use std::sync::{Arc, Mutex};
use time::{OffsetDateTime, UtcOffset, format_description::FormatItem, macros::format_description};
use tokio::io::{AsyncBufReadExt, BufReader};
use tony::ai::TonyAI;
use tony::auth::{Account, SimulatedAuth};
use tony::config::Config;
use tony::orchestrator::{Orchestrator, SendOutcome};
use tony::storage::{FileStore, KeyValueStore};
use tony::store::ConversationStore;
use tony::types::{ChatSession, Message, Role};
use tracing_subscriber::EnvFilter;

const MESSAGE_TIME_FORMAT: &[FormatItem<'static>] =
    format_description!("[hour repr:12 padding:zero]:[minute padding:zero] [period case:upper]");

const HELP: &str = "\
Commands:
  <text>            send a message to the current conversation
  /new              start a new conversation
  /list             list conversations
  /open <n>         open conversation n from /list
  /delete [n]       delete conversation n (or the current one)
  /rename <title>   rename the current conversation
  /ask <n>          send follow-up suggestion n from the last reply
  /login, /logout   sync profile
  /quit             exit";

fn load_dotenv() {
    // A missing .env file is normal outside development.
    if let Err(err) = dotenvy::dotenv()
        && !err.not_found()
    {
        eprintln!("failed to load .env: {err}");
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn format_message_timestamp(millis: i64) -> Option<String> {
    let mut datetime =
        OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000).ok()?;
    if let Ok(offset) = UtcOffset::current_local_offset() {
        datetime = datetime.to_offset(offset);
    }
    datetime.format(MESSAGE_TIME_FORMAT).ok()
}

fn print_message(message: &Message) {
    let label = match message.role {
        Role::User => "YOU",
        Role::Assistant => "TONY",
    };
    let time = format_message_timestamp(message.timestamp).unwrap_or_default();
    println!("\n[{label}] {time}\n{}", message.content);
    if let Some(suggestions) = &message.suggestions {
        for (index, suggestion) in suggestions.iter().enumerate() {
            println!("  /ask {} → {suggestion}", index + 1);
        }
    }
}

fn print_sessions(sessions: &[ChatSession], current: Option<&str>) {
    if sessions.is_empty() {
        println!("No conversations yet.");
        return;
    }
    for (index, session) in sessions.iter().enumerate() {
        let marker = if Some(session.id.as_str()) == current {
            "*"
        } else {
            " "
        };
        println!(
            "{marker} {:>2}. {} ({} messages)",
            index + 1,
            session.title,
            session.messages.len()
        );
    }
}

/// Resolves a 1-based list position to a session id.
fn session_at(orch: &Orchestrator, arg: &str) -> Option<String> {
    let index = arg.trim().parse::<usize>().ok()?.checked_sub(1)?;
    orch.with_store(|store| store.sessions().get(index).map(|s| s.id.clone()))
}

fn current_session_id(orch: &Orchestrator) -> Option<String> {
    orch.with_store(|store| store.current_session().map(|s| s.id.clone()))
}

fn print_new_reply(orch: &Orchestrator, outcome: &SendOutcome) {
    let session_id = match outcome {
        SendOutcome::Replied { session_id } | SendOutcome::Failed { session_id } => session_id,
        SendOutcome::Busy => {
            println!("TONY is still processing the previous message.");
            return;
        }
        SendOutcome::Ignored => return,
    };
    orch.with_store(|store| {
        if let Some(reply) = store
            .session(session_id)
            .and_then(|session| session.messages.last())
        {
            print_message(reply);
        }
    });
}

async fn handle_command(
    orch: &Orchestrator,
    account: &mut Account,
    command: &str,
    arg: &str,
) -> bool {
    match command {
        "/quit" | "/exit" => return false,
        "/help" => println!("{HELP}"),
        "/new" => {
            orch.with_store(|store| store.create_session());
            println!("Started a new conversation.");
        }
        "/list" => orch.with_store(|store| print_sessions(store.sessions(), store.current_id())),
        "/open" => match session_at(orch, arg) {
            Some(id) => orch.with_store(|store| {
                store.select_session(id.as_str());
                if let Some(session) = store.current_session() {
                    println!("== {}", session.title);
                    session.messages.iter().for_each(print_message);
                }
            }),
            None => println!("No such conversation."),
        },
        "/delete" => {
            let target = if arg.trim().is_empty() {
                current_session_id(orch)
            } else {
                session_at(orch, arg)
            };
            match target {
                Some(id) => {
                    orch.with_store(|store| store.delete_session(&id));
                    println!("Conversation deleted.");
                }
                None => println!("No such conversation."),
            }
        }
        "/rename" => {
            let renamed = current_session_id(orch)
                .is_some_and(|id| orch.with_store(|store| store.rename_session(&id, arg)));
            if !renamed {
                println!("Open a conversation and give a non-empty title.");
            }
        }
        "/ask" => {
            let pick = arg
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1));
            let last_reply = current_session_id(orch).and_then(|session_id| {
                orch.with_store(|store| {
                    store
                        .session(&session_id)?
                        .messages
                        .iter()
                        .rev()
                        .find(|m| m.role == Role::Assistant)
                        .map(|m| (session_id.clone(), m.id.clone()))
                })
            });
            match (pick, last_reply) {
                (Some(index), Some((session_id, message_id))) => {
                    let outcome = orch.send_suggestion(&session_id, &message_id, index).await;
                    if outcome == SendOutcome::Ignored {
                        println!("No such suggestion.");
                    }
                    print_new_reply(orch, &outcome);
                }
                _ => println!("No such suggestion."),
            }
        }
        "/login" => match account.login(&SimulatedAuth::default()) {
            Ok(user) => println!("Signed in as {} <{}>.", user.name, user.email),
            Err(err) => println!("Sign-in failed: {err}"),
        },
        "/logout" => {
            account.logout();
            println!("Signed out.");
        }
        _ => println!("Unknown command. Type /help."),
    }
    true
}

#[tokio::main]
async fn main() -> Result<()> {
    load_dotenv();
    init_tracing();

    let config = Config::from_env();
    let storage: Arc<dyn KeyValueStore> = Arc::new(match &config.data_dir {
        Some(dir) => FileStore::new(dir),
        None => FileStore::in_default_location(),
    });

    let ai = TonyAI::from_config(&config).context("failed to configure model client")?;
    let store = Arc::new(Mutex::new(ConversationStore::hydrate(storage.clone())));
    let orch = Orchestrator::new(store, Arc::new(ai));
    let mut account = Account::load(storage);

    println!("I'M TONY. Type /help for commands.");
    if let Some(user) = account.user() {
        println!("Signed in as {}.", user.name);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let trimmed = line.trim();
        if let Some(rest) = trimmed.strip_prefix('/') {
            let (command, arg) = rest.split_once(' ').unwrap_or((rest, ""));
            if !handle_command(&orch, &mut account, &format!("/{command}"), arg).await {
                break;
            }
            continue;
        }

        orch.set_draft(line.as_str());
        let target = current_session_id(&orch);
        let outcome = orch.send_message(target.as_deref(), &line).await;
        print_new_reply(&orch, &outcome);
    }

    Ok(())
}
