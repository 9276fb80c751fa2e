//! Subcommand handling.
//!
//! Every command that changes the ledger runs one unlock, modify, save cycle.

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use std::io::{self, IsTerminal, Write};
use tallyrs_core::{Direction, Flow, Ledger, Standing, Vault};

use crate::config::Config;
use crate::Command;

/// What a command needs to reach the save file.
pub struct Session {
    config: Config,
    password: Option<String>,
}

impl Session {
    pub fn new(config: Config, password: Option<String>) -> Self {
        Self { config, password }
    }

    fn password(&self) -> Result<String> {
        match &self.password {
            Some(password) => Ok(password.clone()),
            None => prompt_password(),
        }
    }

    fn unlock(&self) -> Result<Vault> {
        let path = &self.config.save_path;
        if !tallyrs_core::exists(path) {
            anyhow::bail!(
                "No save file at {}. Run `tallyrs init` to create an account.",
                path.display()
            );
        }

        Vault::unlock(path, &self.password()?)
            .with_context(|| format!("Failed to open save file: {}", path.display()))
    }

    fn money(&self, amount: impl std::fmt::Display) -> String {
        format!("{}{}", self.config.currency_symbol, amount)
    }
}

/// Ask for the password on stderr. Typing is not echoed on a terminal;
/// piped input is read as one line.
fn prompt_password() -> Result<String> {
    eprint!("Password: ");
    io::stderr().flush()?;

    if io::stdin().is_terminal() {
        enable_raw_mode()?;
        let result = read_hidden_line();
        disable_raw_mode()?;
        eprintln!();
        return result;
    }

    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .context("Failed to read password")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn read_hidden_line() -> Result<String> {
    let mut password = String::new();
    loop {
        if let Event::Key(key) = event::read()? {
            match handle_key(&mut password, key) {
                Entry::Typing => {}
                Entry::Done => return Ok(password),
                Entry::Cancelled => anyhow::bail!("Password entry cancelled"),
            }
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Entry {
    Typing,
    Done,
    Cancelled,
}

/// Apply one key press to a password being typed.
fn handle_key(password: &mut String, key: KeyEvent) -> Entry {
    if key.kind != KeyEventKind::Press {
        return Entry::Typing;
    }
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Entry::Cancelled;
    }

    match key.code {
        KeyCode::Enter => return Entry::Done,
        KeyCode::Esc => return Entry::Cancelled,
        KeyCode::Backspace => {
            password.pop();
        }
        KeyCode::Char(c) => password.push(c),
        _ => {}
    }
    Entry::Typing
}

/// Run a parsed subcommand.
pub fn run(session: &Session, command: Command) -> Result<()> {
    match command {
        Command::Init { initial, force } => init(session, initial.as_deref(), force),
        Command::Show => {
            let vault = session.unlock()?;
            print_ledger(session, vault.ledger());
            Ok(())
        }
        Command::Transaction { amount, expense } => {
            let flow = if expense { Flow::Expense } else { Flow::Income };
            modify(session, "Transaction completed", |ledger| {
                ledger.apply_transaction(&amount, flow)
            })
        }
        Command::Note { text } => modify(session, "Note saved", |ledger| {
            ledger.set_note(text.as_deref().unwrap_or_default())
        }),
        Command::Record {
            name,
            amount,
            borrowed,
            lent: _,
        } => {
            let direction = if borrowed {
                Direction::Borrowed
            } else {
                Direction::Lent
            };
            modify(session, "Record added", |ledger| {
                ledger.upsert_record(&name, &amount, direction)
            })
        }
        Command::Reset { yes } => reset(session, yes),
    }
}

fn init(session: &Session, initial: Option<&str>, force: bool) -> Result<()> {
    let path = &session.config.save_path;
    if tallyrs_core::exists(path) && !force {
        anyhow::bail!(
            "A save file already exists at {}. Use --force to replace it.",
            path.display()
        );
    }

    let vault = Vault::create(path, &session.password()?, initial)
        .context("Failed to create account")?;
    vault
        .save()
        .with_context(|| format!("Failed to write save file: {}", path.display()))?;

    println!("Account created successfully!");
    print_ledger(session, vault.ledger());
    Ok(())
}

/// Unlock, apply `change`, and save. Nothing is written if `change` fails.
fn modify<F>(session: &Session, done: &str, change: F) -> Result<()>
where
    F: FnOnce(&mut Ledger) -> tallyrs_core::Result<()>,
{
    let mut vault = session.unlock()?;
    change(vault.ledger_mut())?;
    vault
        .save()
        .with_context(|| format!("Failed to write save file: {}", vault.path().display()))?;

    println!("{done}!");
    print_ledger(session, vault.ledger());
    Ok(())
}

fn reset(session: &Session, yes: bool) -> Result<()> {
    let path = &session.config.save_path;
    if !yes {
        anyhow::bail!(
            "Refusing to delete {} without --yes. All data will be lost.",
            path.display()
        );
    }

    tallyrs_core::reset(path)
        .with_context(|| format!("Failed to delete save file: {}", path.display()))?;
    println!("All data has been reset.");
    Ok(())
}

fn print_ledger(session: &Session, ledger: &Ledger) {
    println!("Total Money: {}", session.money(ledger.total()));
    println!(
        "Last Transaction: {}",
        ledger.last_transaction().unwrap_or("-")
    );
    println!("Short Note: {}", ledger.note().unwrap_or("-"));

    let mut records = ledger.records().peekable();
    if records.peek().is_none() {
        println!("No borrowers/lenders");
        return;
    }

    println!("Borrowers & lenders:");
    for record in records {
        let tag = match record.standing() {
            Standing::OwesYou => "OWES YOU",
            Standing::YouOwe => "YOU OWE",
            Standing::Settled => "SETTLED",
        };
        println!(
            "  [{tag}] {}: {}",
            record.name,
            session.money(record.amount.abs())
        );
    }
}
