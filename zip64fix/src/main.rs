use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use zip64fix_trailer::{Outcome, fix};

use crate::cli::Cli;

mod cli;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut skipped = 0;
    for path in &cli.files {
        let outcome = fix(path, cli.dry_run);
        report(path, &outcome);

        if matches!(
            outcome,
            Outcome::NotFound | Outcome::IoError(_) | Outcome::Invalid(_)
        ) {
            skipped += 1;
        }
    }

    match skipped {
        0 => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    }
}

fn report(path: &Path, outcome: &Outcome) {
    let path = path.display();

    match outcome {
        Outcome::Fixed => {
            println!("Correction applied: \"Total Number of Disks\" set to 1 for {path}")
        }
        Outcome::WouldFix => {
            println!("(dry-run) Correction applied: \"Total Number of Disks\" set to 1 for {path}")
        }
        Outcome::AlreadyCorrect => {
            println!("Nothing to do: \"Total Number of Disks\" field is already set to 1 for {path}")
        }
        Outcome::NotFound => {
            eprintln!("No such file: {path}");
            eprintln!("File skipped!");
        }
        Outcome::IoError(detail) => {
            eprintln!("I/O error for {path}: {detail}");
            eprintln!("File skipped!");
        }
        Outcome::Invalid(reason) => {
            eprintln!("{reason} in {path}");
            eprintln!("File skipped!");
        }
    }
}
