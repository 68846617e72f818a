use std::io::{self, Write};

use clap::Args;
use jiff::civil::DateTime;
use pizzeria::schedule::OpeningHours;

use crate::{
    cli::{local_now, output_error},
    config::ScheduleConfig,
};

#[derive(Debug, Args)]
pub(crate) struct StatusArgs {
    #[command(flatten)]
    schedule: ScheduleConfig,

    /// Check a local date and time instead of now (e.g., 2024-06-02T21:00)
    #[arg(long)]
    at: Option<DateTime>,
}

pub(crate) fn run(args: &StatusArgs) -> Result<(), String> {
    let at = match args.at {
        Some(at) => at,
        None => local_now(&args.schedule)?,
    };

    write_status(&OpeningHours::default(), at, io::stdout().lock()).map_err(output_error)
}

fn write_status(hours: &OpeningHours, at: DateTime, mut out: impl Write) -> io::Result<()> {
    if hours.is_open_at(at) {
        writeln!(out, "Abierto")?;
    } else {
        match hours.next_opening(at) {
            Some(next) => writeln!(
                out,
                "Cerrado, abrimos {}",
                next.strftime("%Y-%m-%d a las %H:%M")
            )?,
            None => writeln!(out, "Cerrado")?,
        }
    }

    writeln!(out)?;

    for line in hours.describe() {
        writeln!(out, "  {line}")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn closed_status_names_the_next_opening() -> TestResult {
        let mut out = Vec::new();

        // Tuesday
        write_status(&OpeningHours::default(), date(2024, 6, 4).at(21, 0, 0, 0), &mut out)?;

        let printed = String::from_utf8(out)?;

        assert!(
            printed.starts_with("Cerrado, abrimos 2024-06-05 a las 20:00\n"),
            "unexpected status {printed}"
        );
        assert!(printed.contains("  martes: cerrado\n"), "schedule missing from {printed}");

        Ok(())
    }

    #[test]
    fn open_status() -> TestResult {
        let mut out = Vec::new();

        write_status(&OpeningHours::default(), date(2024, 6, 2).at(21, 0, 0, 0), &mut out)?;

        assert!(String::from_utf8(out)?.starts_with("Abierto\n"), "shop should be open");

        Ok(())
    }
}
