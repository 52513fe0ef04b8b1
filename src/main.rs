use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;

use libris::catalog::{Catalog, LoanEntry, MemberPatch, TitlePatch};
use libris::storage::JsonStorage;

mod cli;
mod config;

use cli::Cli;
use cli::commands::{Commands, LoanCommands, MemberCommands, TitleCommands};
use config::Config;

fn setup_logging(level: &str) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("libris")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("libris.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn open_catalog(cli: &Cli, config: &Config) -> Result<Catalog> {
    let data_dir = cli.data_dir.as_ref().unwrap_or(&config.storage.data_dir);
    let mut storage = JsonStorage::new(data_dir)
        .context(format!("Failed to open data directory {}", data_dir.display()))?;
    if !config.storage.pretty {
        storage = storage.compact();
    }
    Ok(Catalog::open(storage))
}

fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    let mut catalog = open_catalog(cli, config)?;

    if cli.is_verbose() {
        println!(
            "{} {}",
            "Data directory:".yellow(),
            catalog.storage().base_path().display()
        );
    }

    match &cli.command {
        Commands::Member { command } => handle_member_command(command, &mut catalog),
        Commands::Title { command } => handle_title_command(command, &mut catalog),
        Commands::Loan { command } => handle_loan_command(command, &mut catalog),
    }
}

fn not_found(what: &str, id: u64) {
    println!("{} {} {}", "Not found:".red(), what, id);
}

fn handle_member_command(command: &MemberCommands, catalog: &mut Catalog) -> Result<()> {
    info!("Handling member command: {:?}", command);
    match command {
        MemberCommands::Add { name, email, phone } => {
            let member = catalog.add_member(name, email, phone)?;
            println!("{} {}", "Registered:".green(), member);
        }
        MemberCommands::Find { query } => {
            let found = catalog.find_member(query);
            if found.is_empty() {
                println!("{}", "No members match".yellow());
            }
            for member in found {
                println!("{}", member);
            }
        }
        MemberCommands::Show { id } => match catalog.get_member(*id) {
            Some(member) => println!("{}", member),
            None => not_found("member", *id),
        },
        MemberCommands::Edit { id, name, email, phone } => {
            let patch = MemberPatch {
                name: name.clone(),
                email: email.clone(),
                phone: phone.clone(),
            };
            if catalog.update_member(*id, patch)? {
                println!("{} member {}", "Updated:".green(), id);
            } else {
                not_found("member", *id);
            }
        }
        MemberCommands::Delete { id } => {
            if catalog.delete_member(*id)? {
                println!("{} member {}", "Deleted:".green(), id);
            } else {
                not_found("member", *id);
            }
        }
        MemberCommands::List => {
            for member in catalog.list_members() {
                println!("{}", member);
            }
        }
    }
    Ok(())
}

fn handle_title_command(command: &TitleCommands, catalog: &mut Catalog) -> Result<()> {
    info!("Handling title command: {:?}", command);
    match command {
        TitleCommands::Add {
            title,
            author,
            isbn,
            description,
        } => {
            let record = catalog.add_title(title, author, isbn, description)?;
            println!("{} {}", "Catalogued:".green(), record);
        }
        TitleCommands::Find { query } => {
            let found = catalog.find_title(query);
            if found.is_empty() {
                println!("{}", "No titles match".yellow());
            }
            for title in found {
                println!("{}", title);
            }
        }
        TitleCommands::Show { id } => match catalog.get_title(*id) {
            Some(title) => {
                println!("{}", title);
                if !title.description.is_empty() {
                    println!("  {}", title.description);
                }
            }
            None => not_found("title", *id),
        },
        TitleCommands::Edit {
            id,
            title,
            author,
            isbn,
            description,
        } => {
            let patch = TitlePatch {
                title: title.clone(),
                author: author.clone(),
                isbn: isbn.clone(),
                description: description.clone(),
            };
            if catalog.update_title(*id, patch)? {
                println!("{} title {}", "Updated:".green(), id);
            } else {
                not_found("title", *id);
            }
        }
        TitleCommands::Delete { id } => {
            if catalog.delete_title(*id)? {
                println!("{} title {}", "Deleted:".green(), id);
            } else {
                not_found("title", *id);
            }
        }
        TitleCommands::List => {
            for title in catalog.list_titles() {
                println!("{}", title);
            }
        }
    }
    Ok(())
}

fn print_entry(entry: &LoanEntry<'_>) {
    println!(
        "{} | {} -> {}",
        entry.loan,
        entry.member.name.cyan(),
        entry.title.title.cyan()
    );
}

fn handle_loan_command(command: &LoanCommands, catalog: &mut Catalog) -> Result<()> {
    info!("Handling loan command: {:?}", command);
    match command {
        LoanCommands::Issue {
            member_id,
            title_id,
            date,
        } => match catalog.issue_loan(*member_id, *title_id, *date) {
            Ok(loan) => println!("{} {}", "Issued:".green(), loan),
            Err(e) if e.is_loan_rejection() => println!("{} {}", "Rejected:".red(), e),
            Err(e) => return Err(e.into()),
        },
        LoanCommands::Return { id } => {
            if catalog.return_loan(*id)? {
                println!("{} loan {}", "Returned:".green(), id);
            } else {
                println!("{} no outstanding loan {}", "Not applied:".yellow(), id);
            }
        }
        LoanCommands::Find { query } => {
            let found = catalog.find_loans(query);
            if found.is_empty() {
                println!("{}", "No loans match".yellow());
            }
            for entry in &found {
                print_entry(entry);
            }
        }
        LoanCommands::Show { id } => match catalog.get_loan(*id) {
            Some(loan) => println!("{}", loan),
            None => not_found("loan", *id),
        },
        LoanCommands::Active => {
            let active = catalog.list_active_loans();
            if active.is_empty() {
                println!("{}", "No outstanding loans".yellow());
            }
            for entry in &active {
                print_entry(entry);
            }
        }
        LoanCommands::List => {
            for loan in catalog.list_loans() {
                println!("{}", loan);
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    // Setup logging
    let level = config.log_level.clone().unwrap_or_else(|| "info".to_string());
    setup_logging(&level).context("Failed to setup logging")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).context("Application failed")?;

    Ok(())
}
