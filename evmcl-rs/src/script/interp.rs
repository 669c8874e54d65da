//! Command dispatch and deferred execution.
//!
//! [`compile`] maps every command line to a [`Command`] exactly once, at
//! compile time — an unrecognized name rejects the whole script before any
//! action exists.  A [`Command`] captures only the raw argument tokens;
//! resolution and the host call happen when the command is invoked, so a
//! compiled [`Program`] is side-effect free until [`Program::run`].

use tracing::debug;

use crate::env::Env;
use crate::error::Error;
use crate::host::{Action, Host};
use crate::script::arg::ArgValue;
use crate::script::line::{preprocess, tokenize, CommandLine};
use crate::script::resolve::Resolver;

/// One compiled command line: the recognized command plus its raw argument
/// tokens, untouched until invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Install { args: Vec<String> },
    Grant { args: Vec<String> },
    Revoke { args: Vec<String> },
    Exec { args: Vec<String> },
    Act { args: Vec<String> },
    Set { args: Vec<String> },
}

impl Command {
    /// The command's script-level name.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Install { .. } => "install",
            Command::Grant { .. } => "grant",
            Command::Revoke { .. } => "revoke",
            Command::Exec { .. } => "exec",
            Command::Act { .. } => "act",
            Command::Set { .. } => "set",
        }
    }

    /// Resolve this command's arguments and perform its host call.
    ///
    /// `set` is the one command with no host call: it resolves its value
    /// tokens, concatenates them, and writes the environment instead.
    pub async fn invoke<H: Host>(&self, host: &H, env: &mut Env) -> Result<Vec<Action>, Error> {
        match self {
            Command::Install { args } => {
                let values = Resolver::new(host, env).resolve_args(args).await?;
                let (identifier, init_params) = values.split_first().ok_or_else(|| {
                    Error::InvalidSyntax("install expects an app identifier".into())
                })?;
                host.install(identifier.as_scalar("install identifier")?, init_params)
            }
            Command::Grant { args } => {
                let values = Resolver::new(host, env).resolve_args(args).await?;
                if values.len() < 4 {
                    return Err(Error::InvalidSyntax(
                        "grant expects grantee, app, role, and a default permission manager"
                            .into(),
                    ));
                }
                host.grant(
                    values[0].as_scalar("grantee")?,
                    values[1].as_scalar("app")?,
                    values[2].as_scalar("role")?,
                    values[3].as_scalar("default permission manager")?,
                )
            }
            Command::Revoke { args } => {
                let values = Resolver::new(host, env).resolve_args(args).await?;
                if values.len() < 3 {
                    return Err(Error::InvalidSyntax(
                        "revoke expects grantee, app, and role".into(),
                    ));
                }
                let remove_manager = coerce_bool(values.get(3))?;
                host.revoke(
                    values[0].as_scalar("grantee")?,
                    values[1].as_scalar("app")?,
                    values[2].as_scalar("role")?,
                    remove_manager,
                )
            }
            Command::Exec { args } => {
                let values = Resolver::new(host, env).resolve_args(args).await?;
                let (identifier, rest) = values.split_first().ok_or_else(|| {
                    Error::InvalidSyntax("exec expects an app identifier and a method".into())
                })?;
                let (method, params) = rest.split_first().ok_or_else(|| {
                    Error::InvalidSyntax("exec expects a method after the identifier".into())
                })?;
                host.exec(
                    identifier.as_scalar("exec identifier")?,
                    method.as_scalar("exec method")?,
                    params,
                )
            }
            Command::Act { args } => {
                let values = Resolver::new(host, env).resolve_args(args).await?;
                if values.len() < 3 {
                    return Err(Error::InvalidSyntax(
                        "act expects agent, target, and a signature".into(),
                    ));
                }
                host.act(
                    values[0].as_scalar("agent")?,
                    values[1].as_scalar("target")?,
                    values[2].as_scalar("signature")?,
                    &values[3..],
                )
            }
            Command::Set { args } => {
                // The variable name token is taken verbatim, not resolved.
                let (name, rest) = args.split_first().ok_or_else(|| {
                    Error::InvalidSyntax("set expects a variable name".into())
                })?;
                let values = Resolver::new(host, env).resolve_args(rest).await?;
                let joined: String = values.iter().map(ToString::to_string).collect();
                env.set(name, joined)?;
                Ok(Vec::new())
            }
        }
    }
}

/// Coerce `revoke`'s optional fourth argument: exactly the literal strings
/// `true` or `false`, or absence.  Anything else is invalid syntax.
fn coerce_bool(value: Option<&ArgValue>) -> Result<Option<bool>, Error> {
    match value {
        None => Ok(None),
        Some(v) => match v.as_scalar("removePermissionManager")? {
            "true" => Ok(Some(true)),
            "false" => Ok(Some(false)),
            other => Err(Error::InvalidSyntax(format!(
                "argument must be a boolean or absent, got `{other}`"
            ))),
        },
    }
}

// ── Program ───────────────────────────────────────────────────────────────────

/// A compiled script: its commands in script order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    commands: Vec<Command>,
}

/// Compile script text into a [`Program`].
///
/// Preprocesses and tokenizes every line, then dispatches each command
/// name once.  Any unrecognized name fails the whole script here, even
/// when well-formed lines precede it.
pub fn compile(src: &str) -> Result<Program, Error> {
    let mut commands = Vec::new();
    for line in preprocess(src) {
        let CommandLine { name, args } = tokenize(line);
        let command = match name.as_str() {
            "install" => Command::Install { args },
            "grant" => Command::Grant { args },
            "revoke" => Command::Revoke { args },
            "exec" => Command::Exec { args },
            "act" => Command::Act { args },
            "set" => Command::Set { args },
            _ => return Err(Error::UnrecognizedCommand(name)),
        };
        commands.push(command);
    }
    debug!(commands = commands.len(), "script compiled");
    Ok(Program { commands })
}

impl Program {
    /// The compiled commands, in script order.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Invoke the composed action.
    ///
    /// Owns a fresh environment for the run, invokes every command
    /// sequentially in script order, and concatenates the actions they
    /// build.  The first failure aborts the run: no partial action list is
    /// returned, and only environment writes from commands that completed
    /// beforehand ever happened.
    pub async fn run<H: Host>(&self, host: &H) -> Result<Vec<Action>, Error> {
        let mut env = Env::new();
        let mut actions = Vec::new();
        for command in &self.commands {
            debug!(command = command.name(), "invoking deferred action");
            let built = command.invoke(host, &mut env).await?;
            actions.extend(built);
        }
        Ok(actions)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
