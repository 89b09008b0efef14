//! Slash command dispatch
//!
//! A backslash found by the scanner hands control here. The command name
//! is matched by prefix against [`COMMANDS`], its arguments are pulled from
//! the rest of the line, and a [`DispatchStatus`] tells the input loop what
//! to do with the statement being accumulated.

pub mod catalog;
pub mod describe;
pub mod format;
pub mod help;

use tracing::debug;

use crate::scanner::{OptionKind, ScanState};
use crate::session::Session;

/// What the input loop should do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchStatus {
    /// Not a known command
    Unknown,
    /// Execute the statement buffer now
    Send,
    /// Command handled, keep accumulating
    SkipLine,
    /// Leave the session
    Terminate,
    /// Command failed; the rest of the line is discarded
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Quit,
    Help,
    Activity,
    Autocommit,
    ToggleAlignment,
    Copyright,
    ConnInfo,
    ListFunctions,
    ListIndexes,
    ListProcedures,
    ListSequences,
    ListTables,
    ListUsers,
    ListViews,
    Describe,
    Send,
    DatabaseInfo,
    Plan,
    Format,
    Timing,
    Util,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Match {
    /// The command name starts with the table entry
    Prefix,
    Exact,
}

/// Checked in order; longer names precede the shorter prefixes that
/// would otherwise shadow them.
const COMMANDS: &[(&str, Match, CommandKind)] = &[
    ("q", Match::Prefix, CommandKind::Quit),
    ("?", Match::Prefix, CommandKind::Help),
    ("activity", Match::Prefix, CommandKind::Activity),
    ("autocommit", Match::Prefix, CommandKind::Autocommit),
    ("a", Match::Prefix, CommandKind::ToggleAlignment),
    ("copyright", Match::Prefix, CommandKind::Copyright),
    ("conninfo", Match::Prefix, CommandKind::ConnInfo),
    ("df", Match::Prefix, CommandKind::ListFunctions),
    ("di", Match::Prefix, CommandKind::ListIndexes),
    ("dp", Match::Prefix, CommandKind::ListProcedures),
    ("ds", Match::Prefix, CommandKind::ListSequences),
    ("dt", Match::Prefix, CommandKind::ListTables),
    ("du", Match::Prefix, CommandKind::ListUsers),
    ("dv", Match::Prefix, CommandKind::ListViews),
    ("d", Match::Prefix, CommandKind::Describe),
    ("g", Match::Prefix, CommandKind::Send),
    ("l", Match::Prefix, CommandKind::DatabaseInfo),
    ("plan", Match::Exact, CommandKind::Plan),
    ("format", Match::Exact, CommandKind::Format),
    ("timing", Match::Prefix, CommandKind::Timing),
    ("util", Match::Prefix, CommandKind::Util),
];

/// Command names offered by tab completion
pub fn command_names() -> impl Iterator<Item = &'static str> {
    COMMANDS.iter().map(|(name, _, _)| *name)
}

/// A recognised command name with its modifier flags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    pub name: String,
    pub kind: CommandKind,
    /// `+` in the name: show extended detail
    pub show_extended: bool,
    /// `S` in the name: include system objects
    pub show_system: bool,
}

impl CommandInvocation {
    pub fn parse(name: &str) -> Option<Self> {
        let kind = COMMANDS
            .iter()
            .find(|(entry, matching, _)| match matching {
                Match::Prefix => name.starts_with(entry),
                Match::Exact => name == *entry,
            })
            .map(|(_, _, kind)| *kind)?;

        Some(Self {
            name: name.to_string(),
            kind,
            show_extended: name.contains('+'),
            show_system: name.contains('S'),
        })
    }
}

/// Read a slash command from `scan` and run it.
///
/// An unknown command is reported and becomes [`DispatchStatus::Error`].
/// Arguments left over after a successful command are warned about one
/// by one; after an error they are dropped silently.
pub fn handle_slash_command(scan: &mut ScanState, session: &mut Session) -> DispatchStatus {
    let name = scan.scan_slash_command();

    let mut status = match CommandInvocation::parse(&name) {
        Some(invocation) => {
            debug!(command = %name, kind = ?invocation.kind, "dispatching slash command");
            dispatch(&invocation, scan, session)
        }
        None => DispatchStatus::Unknown,
    };

    if status == DispatchStatus::Unknown {
        session.eprintln(format!("Invalid command \\{}. Try \\? for help.", name));
        status = DispatchStatus::Error;
    }

    if status == DispatchStatus::Error {
        while scan.scan_slash_option(OptionKind::WholeLine).is_some() {}
    } else {
        while let Some(arg) = scan.scan_slash_option(OptionKind::Normal) {
            session.eprintln(format!("\\{}: extra argument \"{}\" ignored", name, arg));
        }
    }

    scan.scan_slash_command_end();
    session.flush();

    status
}

/// Run one recognised command, pulling its arguments from `scan`
pub fn dispatch(
    invocation: &CommandInvocation,
    scan: &mut ScanState,
    session: &mut Session,
) -> DispatchStatus {
    let mut next_arg = || scan.scan_slash_option(OptionKind::Normal);

    let success = match invocation.kind {
        CommandKind::Quit => return DispatchStatus::Terminate,
        CommandKind::Send => return DispatchStatus::Send,
        CommandKind::Help => {
            help::print_usage(session);
            true
        }
        CommandKind::Copyright => {
            help::print_copyright(session);
            true
        }
        CommandKind::ConnInfo => {
            let line = format!(
                "You are currently connected as user '{}' to '{}'",
                session.username, session.dbpath
            );
            session.println(line);
            true
        }
        CommandKind::Activity => {
            catalog::show_activity(session);
            true
        }
        CommandKind::DatabaseInfo => {
            catalog::show_database_info(session);
            true
        }
        CommandKind::Autocommit => {
            format::toggle_autocommit(session);
            true
        }
        CommandKind::Timing => {
            format::toggle_timing(session);
            true
        }
        CommandKind::ToggleAlignment => format::toggle_alignment(session),
        CommandKind::ListFunctions => {
            catalog::list_functions(session, next_arg().as_deref());
            true
        }
        CommandKind::ListIndexes => {
            catalog::list_indexes(
                session,
                next_arg().as_deref(),
                invocation.show_system,
                invocation.show_extended,
            );
            true
        }
        CommandKind::ListProcedures => {
            catalog::list_procedures(session, next_arg().as_deref());
            true
        }
        CommandKind::ListSequences => {
            catalog::list_sequences(session, next_arg().as_deref(), invocation.show_system);
            true
        }
        CommandKind::ListTables => {
            catalog::list_tables(session, next_arg().as_deref(), invocation.show_system);
            true
        }
        CommandKind::ListUsers => {
            catalog::list_users(session);
            true
        }
        CommandKind::ListViews => {
            catalog::list_views(session, next_arg().as_deref());
            true
        }
        CommandKind::Describe => match next_arg() {
            Some(name) => {
                describe::describe_object(session, &name);
                true
            }
            None => {
                session.eprintln(format!("\\{}: missing required argument", invocation.name));
                false
            }
        },
        CommandKind::Plan => match next_arg() {
            Some(value) => format::set_plan_display(session, &value),
            None => {
                let line = format!(
                    "Plan display is currently {}",
                    session.settings.plan_display
                );
                session.println(line);
                true
            }
        },
        CommandKind::Format => {
            let option = next_arg();
            let value = next_arg();
            match option {
                Some(option) => format::do_format(session, &option, value.as_deref()),
                None => {
                    session.eprintln(format!("\\{}: missing required argument", invocation.name));
                    false
                }
            }
        }
        CommandKind::Util => match next_arg() {
            Some(option) => catalog::exec_util(session, &option),
            None => {
                help::print_util_options(session);
                true
            }
        },
    };

    if success {
        DispatchStatus::SkipLine
    } else {
        DispatchStatus::Error
    }
}
