//! Process-level argument handling

use crate::cli::Args;
use crate::error::ExtractError;
use clap::error::ErrorKind;
use clap::{CommandFactory as _, Parser as _};
use std::ffi::OsString;

/// What the process should do after looking at its arguments
#[derive(Debug)]
pub enum Invocation {
    /// Arguments are well-formed; run the extraction
    Run(Args),
    /// Help, version or a usage error was printed; exit with this code
    Exit(i32),
}

/// Parse process arguments, printing help, version or usage as needed
///
/// Malformed invocations (wrong positional count, unknown flags, an empty or
/// unsafe subdirectory) exit with the usage error code before any filesystem
/// or network work.
pub fn parse_invocation<I, T>(argv: I) -> Invocation
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Args::try_parse_from(argv) {
        Ok(args) => match args.to_request() {
            Ok(_) => Invocation::Run(args),
            Err(err) => {
                let message = match err.downcast_ref::<ExtractError>() {
                    Some(ExtractError::Usage { message }) => message.clone(),
                    _ => format!("{err:#}"),
                };
                let usage = Args::command().error(ErrorKind::ValueValidation, message);
                usage.print().ok();
                Invocation::Exit(ExtractError::usage(usage.to_string()).exit_code())
            }
        },
        Err(err) => {
            let code = match err.kind() {
                ErrorKind::DisplayHelp
                | ErrorKind::DisplayVersion
                | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => 0,
                _ => ExtractError::usage(err.to_string()).exit_code(),
            };
            // Nothing sensible to do if stderr itself is gone
            err.print().ok();
            Invocation::Exit(code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_errors_exit_one() {
        for argv in [
            vec!["sparsepick"],
            vec!["sparsepick", "https://x/mono.git"],
            vec!["sparsepick", "a", "b", "c"],
            vec!["sparsepick", "--bogus", "a", "b"],
        ] {
            match parse_invocation(argv.clone()) {
                Invocation::Exit(code) => assert_eq!(code, 1, "argv: {argv:?}"),
                Invocation::Run(args) => panic!("unexpected run for {argv:?}: {args:?}"),
            }
        }
    }

    #[test]
    fn test_help_exits_zero() {
        assert!(matches!(
            parse_invocation(["sparsepick", "--help"]),
            Invocation::Exit(0)
        ));
        assert!(matches!(
            parse_invocation(["sparsepick", "--version"]),
            Invocation::Exit(0)
        ));
    }

    #[test]
    fn test_invalid_subdirectory_exits_one() {
        for subdirectory in ["  ", "/etc", "../outside", "."] {
            assert!(
                matches!(
                    parse_invocation(["sparsepick", "https://x/mono.git", subdirectory]),
                    Invocation::Exit(1)
                ),
                "subdirectory: {subdirectory:?}"
            );
        }
    }

    #[test]
    fn test_valid_invocation_runs() {
        assert!(matches!(
            parse_invocation(["sparsepick", "https://x/mono.git", "lib"]),
            Invocation::Run(_)
        ));
    }
}
