use calendar_backend::{AppConfig, CalendarService, NewEvent, logging, open_store};
use std::io::{self, Write};
use std::process::ExitCode;

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  register                           Register a new user and make it active\n  user <key>                         Switch to an existing user\n  add <start> <end> <title...>       Add an event (YYYY-MM-DDTHH:MM)\n  today                              List today's remaining events\n  day <offset>                       List events <offset> days from today\n  seed                               Add the demonstration events\n  quit|exit                          Exit"
    );
}

fn print_events(events: &[String]) {
    if events.is_empty() {
        println!("(no events)");
    }
    for line in events {
        println!("  {line}");
    }
}

/// Splits off the first whitespace-delimited field. The remainder keeps its
/// inner spacing so event titles are stored as typed.
fn next_field(text: &str) -> Option<(&str, &str)> {
    let text = text.trim_start();
    if text.is_empty() {
        return None;
    }
    let (field, rest) = text.split_once(char::is_whitespace).unwrap_or((text, ""));
    Some((field, rest.trim_start()))
}

fn main() -> ExitCode {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };
    logging::init_with_level(&config.log_level);

    let store = match open_store(&config.store) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Could not open {} store: {e}", config.store.name());
            return ExitCode::FAILURE;
        }
    };
    let service = CalendarService::new(store, config.clock());

    println!(
        "Calendar (CLI, {} store) - type 'help' for commands\n",
        service.store_name()
    );

    let mut active_user: Option<String> = None;
    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "register" => match service.register() {
                Ok(user) => {
                    println!("Registered user {}.", user.user_key);
                    active_user = Some(user.user_key);
                }
                Err(e) => println!("Error: {e}"),
            },
            "user" => match parts.next() {
                Some(key) => match service.user_exists(key) {
                    Ok(true) => {
                        println!("Active user {key}.");
                        active_user = Some(key.to_string());
                    }
                    Ok(false) => println!("User {key} not found."),
                    Err(e) => println!("Error: {e}"),
                },
                None => println!("Usage: user <key>"),
            },
            "add" | "today" | "day" | "seed" => {
                let Some(user_key) = active_user.as_deref() else {
                    println!("No active user. Use 'register' or 'user <key>' first.");
                    continue;
                };
                match cmd {
                    "add" => {
                        let fields = next_field(input)
                            .and_then(|(_, rest)| next_field(rest))
                            .and_then(|(start, rest)| Some((start, next_field(rest)?)));
                        match fields {
                            Some((start, (end, title))) if !title.is_empty() => {
                                let new_event = NewEvent::new(title, start, end);
                                match service.add_event(user_key, &new_event) {
                                    Ok(event) => println!("Added '{}'.", event.title),
                                    Err(e) => println!("Error: {e}"),
                                }
                            }
                            _ => println!("Usage: add <start> <end> <title...>"),
                        }
                    }
                    "today" => match service.today_events(user_key) {
                        Ok(events) => print_events(&events),
                        Err(e) => println!("Error: {e}"),
                    },
                    "day" => {
                        let offset = match parts.next().map(str::parse::<i64>) {
                            Some(Ok(v)) => v,
                            Some(Err(_)) => {
                                println!("Invalid offset");
                                continue;
                            }
                            None => {
                                println!("Usage: day <offset>");
                                continue;
                            }
                        };
                        match service.events_at_offset(user_key, offset) {
                            Ok(events) => print_events(&events),
                            Err(e) => println!("Error: {e}"),
                        }
                    }
                    _ => match service.seed_test_events(user_key) {
                        Ok(events) => println!("Added {} test events.", events.len()),
                        Err(e) => println!("Error: {e}"),
                    },
                }
            }
            _ => {
                println!("Unknown command '{cmd}'. Type 'help' for commands.");
            }
        }
    }

    ExitCode::SUCCESS
}
