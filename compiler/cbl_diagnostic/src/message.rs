//! Diagnostic message formatting.
//!
//! The engine never builds user-facing text itself; it asks a
//! [`MessageService`] for the message of an error code with positional
//! arguments. Hosts plug in localized catalogues; [`DefaultMessages`] is the
//! built-in English one.

use crate::ErrorCode;

pub trait MessageService: Send + Sync {
    /// Message for `code`, with `{0}`, `{1}`, ... replaced by `args`.
    fn message(&self, code: ErrorCode, args: &[&str]) -> String;
}

/// English message catalogue.
#[derive(Copy, Clone, Debug, Default)]
pub struct DefaultMessages;

impl DefaultMessages {
    fn template(code: ErrorCode) -> &'static str {
        match code {
            ErrorCode::E0001 => "Copy statement for {0} must end with a period",
            ErrorCode::E0002 => "Copy statement is missing a copybook name",
            ErrorCode::E0003 => "Malformed REPLACING clause: {0}",
            ErrorCode::E2001 => "{0}: Copybook not found",
            ErrorCode::E2002 => "Recursive copybook declaration for: {0}",
            ErrorCode::E2003 => "Cannot apply text transformation at {0}",
        }
    }
}

impl MessageService for DefaultMessages {
    fn message(&self, code: ErrorCode, args: &[&str]) -> String {
        format_template(Self::template(code), args)
    }
}

/// Substitute `{n}` placeholders. Placeholders without an argument are kept.
pub fn format_template(template: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(template.len() + args.iter().map(|a| a.len()).sum::<usize>());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let substituted = after.find('}').and_then(|close| {
            let index: usize = after[..close].parse().ok()?;
            Some((args.get(index)?, close))
        });
        match substituted {
            Some((arg, close)) => {
                out.push_str(arg);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
