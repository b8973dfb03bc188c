//! CLI Module for snipdeck
//!
//! Commands that run without launching the TUI. Anything that is not a
//! known command is treated as a snippet name or id to open.

use crate::detail::SnippetStore;
use crate::models::{JsonSnippetStore, Snippet, StorageManager};
use colored::Colorize;
use std::error::Error;

/// What `main` should do with the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// Open the TUI, optionally on a snippet given by name or id
    Open(Option<String>),
    /// A command was handled here; exit
    Done,
}

/// Executes CLI commands based on the provided arguments
pub fn execute_cli(args: &[String]) -> Result<Invocation, Box<dyn Error>> {
    let Some(first) = args.first() else {
        return Ok(Invocation::Open(None));
    };

    match first.as_str() {
        "list" | "ls" => {
            let store = JsonSnippetStore::open(StorageManager::new()?)?;
            list_snippets(store.snippets());
            Ok(Invocation::Done)
        }
        "help" | "--help" | "-h" => {
            print_help();
            Ok(Invocation::Done)
        }
        target => Ok(Invocation::Open(Some(target.to_string()))),
    }
}

fn list_snippets(snippets: &[Snippet]) {
    if snippets.is_empty() {
        println!("{}  No snippets stored yet", "┃".bright_magenta());
        return;
    }

    for snippet in snippets {
        let tags = snippet
            .visible_tags()
            .iter()
            .map(|tag| format!("#{tag}"))
            .collect::<Vec<_>>()
            .join(" ");
        println!(
            "{}  {} {} {}",
            "┃".bright_magenta(),
            snippet.name.bold(),
            format!("({} files)", snippet.files.len()).bright_black(),
            tags.bright_cyan()
        );
        println!(
            "{}    {}",
            "┃".bright_magenta(),
            snippet.id.to_string().bright_black()
        );
    }
}

pub fn print_not_found(target: &str) {
    println!(
        "{}  No snippet found with name or id: {}",
        "┃".bright_magenta(),
        target
    );
    println!(
        "{}  Run {} to see what is stored",
        "┃".bright_magenta(),
        "snipdeck list".bright_white()
    );
}

/// Prints the help message with available commands
fn print_help() {
    println!(
        "{}  {}",
        "┃".bright_magenta(),
        "SNIPDECK - MULTI-FILE SNIPPETS".bold()
    );

    println!("{}  {}", "┃".bright_magenta(), "USAGE:".bright_yellow());
    println!("{}  snipdeck [COMMAND | SNIPPET]", "┃".bright_magenta());
    println!("{}  {}", "┃".bright_magenta(), "COMMANDS:".bright_yellow());
    println!(
        "{}  {:<27} {}",
        "┃".bright_magenta(),
        "list, ls".bright_white(),
        "List stored snippets with their ids"
    );
    println!(
        "{}  {:<27} {}",
        "┃".bright_magenta(),
        "<NAME_OR_ID>".bright_white(),
        "Open a snippet by id or name (partial name works)"
    );
    println!(
        "{}  {:<27} {}",
        "┃".bright_magenta(),
        "help".bright_white(),
        "Display this help message"
    );

    println!("{}  {}", "┃".bright_magenta(), "TIP:".bright_green());
    println!(
        "{}  Run with no arguments to open the first snippet",
        "┃".bright_magenta()
    );
}
