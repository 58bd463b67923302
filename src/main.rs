use std::process::ExitCode;

use clap::Parser;
use tracing::info;

use todo_board::cli::Cli;
use todo_board::cmd::*;
use todo_board::config::Config;
use todo_board::db::Database;
use todo_board::error::CliError;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Completions need no data.
    if let Commands::Completions { shell } = cli.command {
        cmd_completions(shell);
        return ExitCode::SUCCESS;
    }

    let config = Config::resolve(cli.data_dir.as_deref(), cli.verbose);
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
    info!(data_dir = %config.data_dir.display(), "opening task board");

    let mut db = Database::open_dir(&config.data_dir);

    match run(&mut db, cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(db: &mut Database, command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Add { title, desc, category, priority, due, tags } =>
            cmd_add(db, title, desc, category, priority, due, tags),

        Commands::List { category, priority, sort, limit } => {
            cmd_list(db, category, priority, sort, limit);
            Ok(())
        }

        Commands::View { id } => cmd_view(db, id),

        Commands::Toggle { id } => cmd_toggle(db, id),

        Commands::Update { id, title, desc, category, priority, due, clear_due, add_tags, rm_tags } =>
            cmd_update(db, id, title, desc, category, priority, due, clear_due, add_tags, rm_tags),

        Commands::Delete { id } => cmd_delete(db, id),

        Commands::Tags => {
            cmd_tags(db);
            Ok(())
        }

        Commands::Category { action } => cmd_category(db, action),

        Commands::Completions { shell } => {
            cmd_completions(shell);
            Ok(())
        }
    }
}
