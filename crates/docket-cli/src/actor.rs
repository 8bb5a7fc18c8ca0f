//! Actor identity resolution for CLI commands.
//!
//! The resolution chain: `--actor` flag > `DOCKET_ACTOR` env > `USER` env
//! (TTY only). Mutating commands require an actor; read-only commands work
//! without one. Role resolves from `--role` > `DOCKET_ROLE` > `member`.

use anyhow::{Context, bail};
use docket_core::model::{Actor, Role};
use std::env;
use std::str::FromStr;

/// Environment reader trait for dependency injection in tests.
trait EnvReader {
    fn get(&self, key: &str) -> Option<String>;
    fn is_tty(&self) -> bool;
}

struct RealEnv;

impl EnvReader for RealEnv {
    fn get(&self, key: &str) -> Option<String> {
        env::var(key).ok().filter(|v| !v.is_empty())
    }

    fn is_tty(&self) -> bool {
        use std::io::IsTerminal;
        std::io::stdin().is_terminal()
    }
}

fn resolve_id_with(cli_flag: Option<&str>, env: &dyn EnvReader) -> Option<String> {
    if let Some(actor) = cli_flag {
        if !actor.is_empty() {
            return Some(actor.to_string());
        }
    }
    if let Some(val) = env.get("DOCKET_ACTOR") {
        return Some(val);
    }
    if env.is_tty() {
        if let Some(val) = env.get("USER") {
            return Some(val);
        }
    }
    None
}

fn resolve_role(cli_flag: Option<&str>) -> anyhow::Result<Role> {
    let raw = match cli_flag {
        Some(role) => Some(role.to_string()),
        None => RealEnv.get("DOCKET_ROLE"),
    };
    raw.map_or(Ok(Role::default()), |r| {
        Role::from_str(&r).context("resolve actor role")
    })
}

/// Resolve the full actor, failing when no identity can be found.
///
/// Use this for mutating commands; the audit trail needs a real `by`.
pub fn require_actor(id_flag: Option<&str>, role_flag: Option<&str>) -> anyhow::Result<Actor> {
    let Some(id) = resolve_id_with(id_flag, &RealEnv) else {
        bail!("no actor identity: set --actor or DOCKET_ACTOR");
    };
    Ok(Actor::new(id, resolve_role(role_flag)?))
}
