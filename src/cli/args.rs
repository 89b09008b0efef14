//! CLI argument parsing

use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::db::ConnectParams;
use crate::error::{FbsqlError, Result};

const VERSION_STRING: &str = concat!("(Firebird) ", env!("CARGO_PKG_VERSION"));

#[derive(Parser, Debug)]
#[command(name = "fbsql")]
#[command(version = VERSION_STRING, about = "fbsql is an interactive terminal for Firebird", long_about = None)]
#[command(disable_help_flag = true)]
pub struct Args {
    /// Database path to connect to [env: ISC_DATABASE]
    #[arg(short = 'd', long = "database", value_name = "DBPATH")]
    pub database: Option<String>,

    /// Database user name [env: ISC_USER]
    #[arg(short = 'u', long = "username", value_name = "USERNAME")]
    pub username: Option<String>,

    /// Password
    #[arg(short = 'p', long, env = "ISC_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Client character set
    #[arg(short = 'C', long, value_name = "ENCODING", default_value = "UTF-8")]
    pub client_encoding: String,

    /// Display queries generated by internal commands
    #[arg(short = 'E', long)]
    pub echo_internal: bool,

    /// Configuration file (default ~/.fbsqlrc.json)
    #[arg(long, env = "FBSQL_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Show this help, then exit
    #[arg(short = '?', long, action = ArgAction::Help)]
    help: Option<bool>,

    /// Database path, used when -d is not given
    #[arg(value_name = "DBNAME")]
    pub dbname: Option<String>,

    /// User name, used when -u is not given
    #[arg(value_name = "USERNAME")]
    pub user: Option<String>,
}

impl Args {
    /// Connection parameters from flags, positional arguments and
    /// then the environment, in that order
    pub fn resolve(&self) -> Result<ConnectParams> {
        self.resolve_with(|name| std::env::var(name).ok())
    }

    pub fn resolve_with(&self, env: impl Fn(&str) -> Option<String>) -> Result<ConnectParams> {
        let mut positional = [&self.dbname, &self.user].into_iter().flatten().cloned();

        let dbpath = match &self.database {
            Some(database) => Some(database.clone()),
            None => positional.next(),
        }
        .or_else(|| env("ISC_DATABASE"))
        .ok_or_else(|| FbsqlError::Usage("need -d dbpath".to_string()))?;

        let username = self
            .username
            .clone()
            .or_else(|| positional.next())
            .or_else(|| env("ISC_USER"))
            .ok_or_else(|| FbsqlError::Usage("need -u username".to_string()))?;

        Ok(ConnectParams {
            dbpath,
            username,
            password: self.password.clone(),
            client_encoding: self.client_encoding.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("fbsql").chain(args.iter().copied()))
            .expect("arguments should parse")
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_flags() {
        let args = parse(&["-d", "employee", "-u", "sysdba", "-p", "masterkey", "-E"]);
        let params = args.resolve_with(no_env).unwrap();

        assert_eq!(params.dbpath, "employee");
        assert_eq!(params.username, "sysdba");
        assert_eq!(params.password.as_deref(), Some("masterkey"));
        assert_eq!(params.client_encoding, "UTF-8");
        assert!(args.echo_internal);
    }

    #[test]
    fn test_positional_fill_missing_flags() {
        let params = parse(&["employee", "sysdba"]).resolve_with(no_env).unwrap();
        assert_eq!(params.dbpath, "employee");
        assert_eq!(params.username, "sysdba");

        // with -d given, the first positional is the user name
        let params = parse(&["-d", "employee", "sysdba"])
            .resolve_with(no_env)
            .unwrap();
        assert_eq!(params.username, "sysdba");
    }

    #[test]
    fn test_environment_fallback() {
        let env = |name: &str| match name {
            "ISC_DATABASE" => Some("from_env.fdb".to_string()),
            "ISC_USER" => Some("env_user".to_string()),
            _ => None,
        };

        let params = parse(&[]).resolve_with(env).unwrap();
        assert_eq!(params.dbpath, "from_env.fdb");
        assert_eq!(params.username, "env_user");

        let params = parse(&["employee"]).resolve_with(env).unwrap();
        assert_eq!(params.dbpath, "employee");
        assert_eq!(params.username, "env_user");
    }

    #[test]
    fn test_missing_parameters() {
        let err = parse(&[]).resolve_with(no_env).unwrap_err();
        assert_eq!(err.to_string(), "need -d dbpath");
        assert_eq!(err.exit_code(), crate::error::EXIT_USER);

        let err = parse(&["-d", "employee"]).resolve_with(no_env).unwrap_err();
        assert_eq!(err.to_string(), "need -u username");
    }
}
