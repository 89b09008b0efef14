//! Help texts

use super::format::on_off;
use crate::session::Session;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// `\?`
pub fn print_usage(session: &mut Session) {
    let aligned = on_off(session.settings.format.alignment.is_aligned());
    let plan = session.settings.plan_display;
    let timing = on_off(session.settings.timing);
    let autocommit = on_off(session.settings.autocommit);

    let text = format!(
        r"General
  \copyright             Show fbsql copyright information
  \g or ;                execute query
  \q                     quit fbsql

Display
  \a                     Toggle aligned mode (currently {aligned})
  \format OPTION [VALUE] Set or show table output formatting option:
                           {{alignment|border|null}}
  \plan [SETTING]        Display plan {{off|on|only}} (currently {plan})
  \timing                Toggle execution timing (currently {timing})

Environment
  \activity              Show information about current database activity
  \conninfo              Show information about the current connection

Database
  (options: S = show system objects, + = additional detail)
  \l                     List information about the current database
  \autocommit            Toggle autocommit (currently {autocommit})
  \d      NAME           List information about the specified object
  \df     [PATTERN]      List information about functions matching [PATTERN]
  \di[S+] [PATTERN]      List information about indexes matching [PATTERN]
  \dp     [PATTERN]      List information about procedures matching [PATTERN]
  \ds[S]  [PATTERN]      List information about sequences (generators) matching [PATTERN]
  \dt[S]  [PATTERN]      List information about tables matching [PATTERN]
  \du                    List users granted privileges on this database
  \dv     [PATTERN]      List information about views matching [PATTERN]
  \util   [COMMAND]      execute utility command
                           {{set_index_statistics}}
"
    );
    session.write(&text);
}

/// `\copyright`
pub fn print_copyright(session: &mut Session) {
    session.println(format!(
        "fbsql v{} (c) Copyright fbsql contributors, licensed under MIT or Apache-2.0",
        VERSION
    ));
}

/// Printed for a line starting with `help` at the start of a statement
pub fn print_help_banner(session: &mut Session) {
    session.write(
        r"This is fbsql, a command-line interface to Firebird.
Type:  \copyright for distribution terms
       \? for help with fbsql commands
       \g or terminate with semicolon to execute query
       \q to quit
",
    );
}

/// `\util` without an option
pub fn print_util_options(session: &mut Session) {
    session.write(
        r"
Options for \util:

  \util set_index_statistics     Set global index statistics

",
    );
}
