use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;
use patient_roster_client::config::{default_config_path, load_config};
use patient_roster_client::{ClientConfig, HttpTransport, RemoteRoster};
use patient_roster_core::{Database, LocalRoster, PageInfo, Patient, PatientForm, ViewState};
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{Cli, Command};

/// Where the records live for this invocation.
enum Roster {
    Local(LocalRoster),
    Remote(RemoteRoster<HttpTransport>),
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn resolve_config(cli: &Cli) -> Result<ClientConfig> {
    let file = match (&cli.config, default_config_path()) {
        (Some(path), _) => load_config(path, false)?,
        (None, Some(path)) => load_config(&path, true)?,
        (None, None) => Default::default(),
    };
    Ok(ClientConfig::from_file(file).with_overrides(cli.api.as_deref()))
}

fn open(cli: &Cli, config: &ClientConfig, view: ViewState) -> Result<Roster> {
    match &cli.local {
        Some(path) => {
            let db = Database::open(path)
                .with_context(|| format!("failed to open database '{}'", path.display()))?;
            tracing::info!(path = %path.display(), "using local database");
            Ok(Roster::Local(LocalRoster::with_view(db, view)))
        }
        None => {
            let transport = HttpTransport::new(config)?;
            tracing::info!(url = %transport.base_url(), "using remote backend");
            Ok(Roster::Remote(RemoteRoster::with_view(transport, view)))
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(&cli)?;
    let view = match &cli.command {
        Command::List(args) => args.view(config.per_page)?,
        _ => ViewState::new(config.per_page),
    };
    let mut roster = open(&cli, &config, view)?;

    match cli.command {
        Command::List(_) => list(&mut roster),
        Command::Show { id } => show(&roster, &id),
        Command::Save(args) => save(&mut roster, &PatientForm::from(args)),
        Command::Delete { id, yes } => {
            if !yes && !confirm(&format!("Delete patient {id}?"))? {
                println!("Cancelled.");
                return Ok(());
            }
            delete(&mut roster, &id)
        }
        Command::Stats => {
            let stats = match &roster {
                Roster::Local(r) => r.stats()?,
                Roster::Remote(r) => r.stats()?,
            };
            print!("{stats}");
            Ok(())
        }
        Command::Import { file } => import(&mut roster, &file),
        Command::Export { output } => {
            let csv = match &roster {
                Roster::Local(r) => r.export_csv()?,
                Roster::Remote(r) => r.export_csv()?,
            };
            match output {
                Some(path) => {
                    std::fs::write(&path, csv)
                        .with_context(|| format!("failed to write '{}'", path.display()))?;
                    println!("Exported to {}", path.display());
                }
                None => print!("{csv}"),
            }
            Ok(())
        }
    }
}

fn list(roster: &mut Roster) -> Result<()> {
    let (items, info) = match roster {
        Roster::Local(r) => {
            let page = r.current_page()?;
            let info = PageInfo::from_page(&page);
            (page.items, info)
        }
        Roster::Remote(r) => {
            r.refresh()?;
            (r.items().to_vec(), *r.page_info())
        }
    };

    if items.is_empty() {
        println!("No patients found.");
    } else {
        println!(
            "{:<36}  {:<24} {:>3}  {:<8} {:<18} {:<14} {}",
            "ID", "NAME", "AGE", "GENDER", "DEPARTMENT", "PHONE", "STATUS"
        );
        for p in &items {
            println!(
                "{:<36}  {:<24} {:>3}  {:<8} {:<18} {:<14} {}",
                p.id,
                p.name,
                p.age,
                p.gender.as_str(),
                p.department.as_str(),
                p.phone_or_empty(),
                p.status.as_str()
            );
        }
    }
    println!("{}", info.summary());
    Ok(())
}

fn show(roster: &Roster, id: &str) -> Result<()> {
    let patient = match roster {
        Roster::Local(r) => r.get(id)?,
        Roster::Remote(r) => Some(r.get(id)?),
    };
    let Some(p) = patient else {
        bail!("Patient not found: {id}");
    };
    print_patient(&p);
    Ok(())
}

fn print_patient(p: &Patient) {
    println!("ID:         {}", p.id);
    println!("Name:       {}", p.name);
    println!("Age:        {}", p.age);
    println!("Gender:     {}", p.gender);
    println!("Department: {}", p.department);
    println!("Phone:      {}", p.phone.as_deref().unwrap_or("-"));
    println!("Address:    {}", p.address.as_deref().unwrap_or("-"));
    println!("Notes:      {}", p.notes.as_deref().unwrap_or("-"));
    println!("Admitted:   {}", p.admission_date);
    println!("Status:     {}", p.status);
}

fn save(roster: &mut Roster, form: &PatientForm) -> Result<()> {
    let saved = match roster {
        Roster::Local(r) => r.save(form)?,
        Roster::Remote(r) => r.save(form)?,
    };
    println!("Saved patient {}", saved.id);
    Ok(())
}

fn delete(roster: &mut Roster, id: &str) -> Result<()> {
    let deleted = match roster {
        Roster::Local(r) => r.delete(id)?,
        Roster::Remote(r) => r.delete(id)?,
    };
    if deleted {
        println!("Deleted patient {id}");
    } else {
        println!("No patient with id {id}");
    }
    Ok(())
}

fn import(roster: &mut Roster, file: &Path) -> Result<()> {
    match roster {
        Roster::Local(r) => {
            let text = std::fs::read_to_string(file)
                .with_context(|| format!("failed to read '{}'", file.display()))?;
            let report = r.import_csv(&text)?;
            for skipped in &report.skipped {
                eprintln!("line {}: {}", skipped.line, skipped.reason);
            }
            println!(
                "Imported {} patients ({} lines skipped)",
                report.inserted,
                report.skipped.len()
            );
        }
        Roster::Remote(r) => {
            let inserted = r.import_csv_file(file)?;
            println!("Imported {inserted} patients");
        }
    }
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    eprint!("{prompt} [y/N] ");
    io::stderr().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
