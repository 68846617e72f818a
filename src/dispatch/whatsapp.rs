//! WhatsApp links

use std::process::Command;

use mockall::automock;
use thiserror::Error;
use tracing::{debug, info};

/// Number orders are sent to.
pub const DEFAULT_WHATSAPP_NUMBER: &str = "3442475466";

/// Errors raised while opening a link.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// The opener program could not be started.
    #[error("failed to start {program}: {source}")]
    Spawn {
        /// Program that was run
        program: String,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// The opener program reported a failure.
    #[error("{program} exited with status {status}")]
    Status {
        /// Program that was run
        program: String,
        /// Exit status
        status: std::process::ExitStatus,
    },

    /// No number to send the message to.
    #[error("whatsapp number has no digits")]
    MissingNumber,
}

/// Build a `wa.me` link carrying a pre-filled message.
///
/// Everything but digits is dropped from the number, so `"+54 3442 47-5466"`
/// and `"543442475466"` give the same link.
///
/// # Errors
///
/// Returns [`LaunchError::MissingNumber`] if the number has no digits.
pub fn whatsapp_url(number: &str, message: &str) -> Result<String, LaunchError> {
    let digits: String = number.chars().filter(char::is_ascii_digit).collect();

    if digits.is_empty() {
        return Err(LaunchError::MissingNumber);
    }

    Ok(format!(
        "https://wa.me/{digits}?text={}",
        urlencoding::encode(message)
    ))
}

/// Opens links for the customer.
#[automock]
pub trait LinkOpener: Send + Sync {
    /// Open a link. Success only means the link was handed off.
    ///
    /// # Errors
    ///
    /// Returns a [`LaunchError`] if the link could not be handed off.
    fn open(&self, url: &str) -> Result<(), LaunchError>;
}

/// Opens links by running a program with the link as its last argument,
/// e.g. `xdg-open`.
#[derive(Debug, Clone)]
pub struct CommandOpener {
    program: String,
    args: Vec<String>,
}

impl CommandOpener {
    /// Create an opener for a program and any leading arguments.
    #[must_use]
    pub fn new(program: impl Into<String>, args: impl IntoIterator<Item = String>) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().collect(),
        }
    }

    /// Parse a command line such as `"open -a Safari"`.
    ///
    /// Returns `None` for an empty command.
    pub fn from_command_line(command: &str) -> Option<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next()?;

        Some(Self::new(program, parts))
    }
}

impl LinkOpener for CommandOpener {
    fn open(&self, url: &str) -> Result<(), LaunchError> {
        debug!(program = %self.program, "opening link");

        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(url)
            .status()
            .map_err(|source| LaunchError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(LaunchError::Status {
                program: self.program.clone(),
                status,
            });
        }

        Ok(())
    }
}

/// Logs links instead of opening them.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingOpener;

impl LinkOpener for LoggingOpener {
    fn open(&self, url: &str) -> Result<(), LaunchError> {
        info!(url, "order link ready");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn url_keeps_only_digits_of_the_number() -> TestResult {
        assert_eq!(
            whatsapp_url("+54 3442 47-5466", "hola")?,
            "https://wa.me/543442475466?text=hola"
        );

        Ok(())
    }

    #[test]
    fn url_encodes_the_message() -> TestResult {
        let url = whatsapp_url(
            DEFAULT_WHATSAPP_NUMBER,
            "Hola, me gustaría ordenar:\n2x Muzzarella\nTotal: $20.00",
        )?;

        assert_eq!(
            url,
            "https://wa.me/3442475466?text=Hola%2C%20me%20gustar%C3%ADa%20ordenar%3A%0A2x%20Muzzarella%0ATotal%3A%20%2420.00"
        );

        Ok(())
    }

    #[test]
    fn number_without_digits_is_rejected() {
        assert!(matches!(
            whatsapp_url("sin número", "hola"),
            Err(LaunchError::MissingNumber)
        ));
    }

    #[test]
    fn command_line_is_split_into_program_and_args() {
        let Some(opener) = CommandOpener::from_command_line("open -a Safari") else {
            panic!("expected an opener");
        };

        assert_eq!(opener.program, "open");
        assert_eq!(opener.args, vec!["-a", "Safari"]);
        assert!(CommandOpener::from_command_line("   ").is_none());
    }

    #[test]
    fn missing_program_fails_to_launch() {
        let opener = CommandOpener::new("definitely-not-a-real-opener", []);

        assert!(matches!(
            opener.open("https://wa.me/1"),
            Err(LaunchError::Spawn { .. })
        ));
    }
}
