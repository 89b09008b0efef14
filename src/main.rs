//! fbsql - interactive terminal for Firebird

use std::sync::atomic::Ordering;

use clap::Parser;
use fbsql::cli::Args;
use fbsql::command::help::VERSION;
use fbsql::config::ConfigFile;
use fbsql::db::connect;
use fbsql::error::EXIT_SUCCESS;
use fbsql::input::{LineReader, RustylineReader};
use fbsql::{InputLoop, Session, Settings};
use tracing::{debug, warn};

fn main() {
    let args = Args::parse();

    if let Err(e) = fbsql::logging::init_logging() {
        eprintln!("Warning: {}", e);
    }

    match run(args) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(e.exit_code());
        }
    }
}

fn run(args: Args) -> fbsql::Result<i32> {
    let mut settings = Settings::default();
    ConfigFile::load(args.config.as_deref())?.apply(&mut settings)?;
    settings.echo_hidden = args.echo_internal;

    let params = args.resolve()?;

    if !settings.quiet {
        println!("fbsql {}", VERSION);
    }

    let mut conn = connect(&params)?;
    if !settings.quiet {
        println!("Connected to {}", conn.server_version());
    }
    conn.set_autocommit(settings.autocommit);
    debug!(dbpath = %params.dbpath, username = %params.username, "connected");

    let history_file = settings.history_file.clone();
    let mut input = InputLoop::new(settings.histcontrol);
    let mut session = Session::new(conn, settings, params.dbpath, params.username);

    // Outside of line reads an interrupt raises the cancel flag and
    // aborts whatever statement the backend is running
    let cancel = session.cancel_flag();
    let canceller = session.conn.canceller();
    let handler = move || {
        cancel.store(true, Ordering::SeqCst);
        if let Some(abort) = &canceller {
            abort();
        }
    };
    if let Err(e) = ctrlc::set_handler(handler) {
        warn!(error = %e, "could not install interrupt handler");
    }

    let mut reader = RustylineReader::new()?;
    match &history_file {
        Some(path) => {
            if let Err(e) = reader.load_history(path) {
                session.eprintln(format!("Warning: {}", e));
            }
        }
        None => {
            session.eprintln("Warning: could not locate home directory, history will not be saved");
        }
    }

    let outcome = input.run(&mut session, &mut reader);

    if let Some(path) = &history_file {
        if let Err(e) = reader.save_history(path) {
            session.eprintln(format!("Warning: {}", e));
        }
    }

    if session.in_transaction() {
        session.println("Rolling back uncommitted transaction");
    }
    session.conn.close();
    session.flush();

    outcome.map(|()| EXIT_SUCCESS)
}
