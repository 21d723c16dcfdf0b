//! `alunos` - CLI for the student registry
//!
//! This binary provides the creation form, the list views and the navigation
//! menu on the command line.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::io::BufReader;
use tracing::debug;

use alunos::cli::{
    render, session, Cli, Command, ConfigCommand, CoursesCommand, CreateCommand, DeleteCommand,
    ListCommand, OpenCommand,
};
use alunos::record::Field;
use alunos::{
    init_logging, Config, DatabaseHandle, NavigationShell, RecordCreationForm, Route,
    SqliteDatabase, Storage, StudentService, SubmitOutcome,
};

type Form = RecordCreationForm<SqliteDatabase, StudentService>;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone())?;

    match cli.command {
        Command::Create(cmd) => handle_create(&config, cmd).await,
        Command::Form => handle_form(&config).await,
        Command::List(cmd) => handle_list(&config, &cmd),
        Command::Delete(cmd) => handle_delete(&config, &cmd),
        Command::Courses(cmd) => handle_courses(&config, &cmd),
        Command::Open(cmd) => handle_open(&config, &cmd).await,
        Command::Routes => {
            print!("{}", NavigationShell.render_menu());
            Ok(ExitCode::SUCCESS)
        }
        Command::Status(cmd) => handle_status(&config, cmd.json),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn open_database(config: &Config) -> anyhow::Result<SqliteDatabase> {
    let path = config.database_path();
    debug!(path = %path.display(), "Opening database");
    SqliteDatabase::open(&path).with_context(|| format!("opening {}", path.display()))
}

fn new_form(config: &Config) -> anyhow::Result<Form> {
    let database = open_database(config)?;
    Ok(RecordCreationForm::new(
        Arc::new(database),
        Arc::new(StudentService),
        config.form.clone(),
    ))
}

async fn handle_create(config: &Config, cmd: CreateCommand) -> anyhow::Result<ExitCode> {
    let form = new_form(config)?;
    form.update_field(Field::Name, cmd.nome);
    form.update_field(Field::Course, cmd.curso);
    form.update_grade(&cmd.ira);

    let created = match form.submit() {
        SubmitOutcome::Pending(pending) => pending.wait().await.ok(),
        SubmitOutcome::Rejected(_) | SubmitOutcome::InFlight => None,
    };
    let banner = form.banner();
    form.teardown();

    match created {
        Some(student) if cmd.json => {
            println!("{}", serde_json::to_string_pretty(&student)?);
            Ok(ExitCode::SUCCESS)
        }
        Some(_) => {
            if let Some(line) = render::banner(&banner) {
                println!("{line}");
            }
            Ok(ExitCode::SUCCESS)
        }
        None => {
            if let Some(line) = render::banner(&banner) {
                eprintln!("{line}");
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn handle_form(config: &Config) -> anyhow::Result<ExitCode> {
    let form = new_form(config)?;
    let input = BufReader::new(tokio::io::stdin());
    session::run(&form, input, tokio::io::stdout()).await?;
    form.teardown();
    Ok(ExitCode::SUCCESS)
}

fn handle_list(config: &Config, cmd: &ListCommand) -> anyhow::Result<ExitCode> {
    let database = open_database(config)?;
    let limit = cmd.limit.unwrap_or(config.storage.list_limit);
    let students = database.session()?.with(|s| match cmd.curso.as_deref() {
        Some(course) => s.list_by_course(course, limit),
        None => s.list(limit),
    })?;
    print!("{}", render::students(&students, cmd.format)?);
    Ok(ExitCode::SUCCESS)
}

fn handle_delete(config: &Config, cmd: &DeleteCommand) -> anyhow::Result<ExitCode> {
    let database = open_database(config)?;
    if database.session()?.with(|s| s.delete(cmd.id))? {
        println!("Aluno {} removido.", cmd.id);
        Ok(ExitCode::SUCCESS)
    } else {
        eprintln!("Aluno {} não encontrado.", cmd.id);
        Ok(ExitCode::FAILURE)
    }
}

fn handle_courses(config: &Config, cmd: &CoursesCommand) -> anyhow::Result<ExitCode> {
    let database = open_database(config)?;
    let courses = database.session()?.with(Storage::course_summaries)?;
    print!("{}", render::courses(&courses, cmd.format)?);
    Ok(ExitCode::SUCCESS)
}

async fn handle_open(config: &Config, cmd: &OpenCommand) -> anyhow::Result<ExitCode> {
    let Some(route) = NavigationShell.resolve(&cmd.path) else {
        eprintln!("Página não encontrada: {}", cmd.path);
        print!("{}", NavigationShell.render_menu());
        return Ok(ExitCode::FAILURE);
    };
    debug!(%route, "Opening page");

    match route {
        Route::Home => {
            print!("{}", NavigationShell.render_menu());
            Ok(ExitCode::SUCCESS)
        }
        Route::CreateStudent => handle_form(config).await,
        Route::ListStudents => handle_list(
            config,
            &ListCommand {
                curso: None,
                limit: None,
                format: cmd.format,
            },
        ),
        Route::ListCourses => handle_courses(config, &CoursesCommand { format: cmd.format }),
    }
}

fn handle_status(config: &Config, json: bool) -> anyhow::Result<ExitCode> {
    let database = open_database(config)?;
    let stats = database.session()?.with(Storage::stats)?;

    if json {
        let status = serde_json::json!({
            "database_path": config.database_path(),
            "stats": stats,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        let newest = stats.newest_student.map_or_else(
            || "-".to_string(),
            |t| t.format("%Y-%m-%d %H:%M").to_string(),
        );
        println!("alunos status");
        println!("-------------");
        println!("Database:      {}", config.database_path().display());
        println!("Students:      {}", stats.total_students);
        println!("Courses:       {}", stats.courses);
        println!("Newest:        {newest}");
        println!("Size (bytes):  {}", stats.db_size_bytes);
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<ExitCode> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!("  List limit:         {}", config.storage.list_limit);
                println!();
                println!("[Form]");
                println!("  Success clear (ms): {}", config.form.success_clear_ms);
                println!("  Block resubmit:     {}", config.form.block_resubmit);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => {
                    println!("Configuration error: {e}");
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}
