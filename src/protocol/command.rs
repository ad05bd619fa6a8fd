//! Command definitions
//!
//! Typed verb registry and wire-ready command descriptors. Verbs are
//! validated at construction so an unknown verb fails fast instead of
//! surfacing as a server-side error mid-batch.

use std::fmt;

use crate::error::{AdminError, Result};

/// Every verb the management protocol accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Ping,
    Status,
    Start,
    Stop,
    Auth,
    Quit,
    Help,
    VclLoad,
    VclInline,
    VclShow,
    VclUse,
    VclDiscard,
    VclList,
    ParamShow,
    ParamSet,
    Ban,
    BanUrl,
    BanList,
    PurgeUrl,
    PurgeHash,
    PurgeList,
    Purge,
    Stats,
}

/// Registry of verb spellings and argument arity, checked at construction
const REGISTRY: &[(Verb, &str, usize, Option<usize>)] = &[
    (Verb::Ping, "ping", 0, Some(1)),
    (Verb::Status, "status", 0, Some(0)),
    (Verb::Start, "start", 0, Some(0)),
    (Verb::Stop, "stop", 0, Some(0)),
    (Verb::Auth, "auth", 1, Some(1)),
    (Verb::Quit, "quit", 0, Some(0)),
    (Verb::Help, "help", 0, Some(1)),
    (Verb::VclLoad, "vcl.load", 2, Some(2)),
    (Verb::VclInline, "vcl.inline", 2, None),
    (Verb::VclShow, "vcl.show", 1, Some(1)),
    (Verb::VclUse, "vcl.use", 1, Some(1)),
    (Verb::VclDiscard, "vcl.discard", 1, Some(1)),
    (Verb::VclList, "vcl.list", 0, Some(0)),
    (Verb::ParamShow, "param.show", 0, Some(2)),
    (Verb::ParamSet, "param.set", 2, Some(2)),
    (Verb::Ban, "ban", 1, None),
    (Verb::BanUrl, "ban.url", 1, Some(1)),
    (Verb::BanList, "ban.list", 0, Some(0)),
    (Verb::PurgeUrl, "purge.url", 1, Some(1)),
    (Verb::PurgeHash, "purge.hash", 1, Some(1)),
    (Verb::PurgeList, "purge.list", 0, Some(0)),
    (Verb::Purge, "purge", 3, None),
    (Verb::Stats, "stats", 0, Some(0)),
];

impl Verb {
    /// Look up a verb by its wire spelling
    pub fn parse(s: &str) -> Result<Verb> {
        REGISTRY
            .iter()
            .find(|(_, name, _, _)| *name == s)
            .map(|(verb, _, _, _)| *verb)
            .ok_or_else(|| AdminError::UnknownCommand(s.to_string()))
    }

    /// Wire spelling of the verb
    pub fn as_str(&self) -> &'static str {
        REGISTRY
            .iter()
            .find(|(verb, _, _, _)| verb == self)
            .map(|(_, name, _, _)| *name)
            .unwrap_or("?")
    }

    fn arity(&self) -> (usize, Option<usize>) {
        REGISTRY
            .iter()
            .find(|(verb, _, _, _)| verb == self)
            .map(|(_, _, min, max)| (*min, *max))
            .unwrap_or((0, None))
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable request descriptor
///
/// Arguments are embedded positionally; callers must pre-escape values
/// containing protocol-significant whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    verb: Verb,
    args: Vec<String>,
}

impl Command {
    /// Build a command, validating argument arity against the registry
    pub fn new<S: Into<String>>(verb: Verb, args: impl IntoIterator<Item = S>) -> Result<Self> {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        let (min, max) = verb.arity();
        if args.len() < min || max.is_some_and(|m| args.len() > m) {
            let expected = match max {
                Some(m) if m == min => format!("{min}"),
                Some(m) => format!("{min}..={m}"),
                None => format!("at least {min}"),
            };
            return Err(AdminError::Config(format!(
                "`{verb}` takes {expected} argument(s), got {}",
                args.len()
            )));
        }
        Ok(Self { verb, args })
    }

    /// Build a command from a verb spelling, e.g. `("vcl.use", ["boot"])`
    pub fn parse<S: Into<String>>(verb: &str, args: impl IntoIterator<Item = S>) -> Result<Self> {
        Command::new(Verb::parse(verb)?, args)
    }

    pub fn verb(&self) -> Verb {
        self.verb
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Command text without the trailing newline, as echoed in errors
    pub fn text(&self) -> String {
        if self.args.is_empty() {
            self.verb.to_string()
        } else {
            format!("{} {}", self.verb, self.args.join(" "))
        }
    }

    /// Wire serialization: text plus the line terminator
    pub fn wire(&self) -> String {
        let mut s = self.text();
        s.push('\n');
        s
    }
}
