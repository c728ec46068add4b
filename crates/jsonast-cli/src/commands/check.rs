use super::load_input;
use crate::CheckArgs;

/// Outcome of checking one file.
#[derive(Debug)]
pub struct Checked {
    pub file: String,
    /// Rendered diagnostic when the file failed to parse.
    pub report: Option<String>,
}

/// Parses every file, collecting a diagnostic for each failure.
///
/// # Errors
///
/// Returns an error if a file or its config cannot be read.
pub fn check_files(args: &CheckArgs) -> anyhow::Result<Vec<Checked>> {
    args.files
        .iter()
        .map(|file| {
            let input = load_input(file, &args.dialect)?;
            let report = jsonast::parse(&input.source, &input.options)
                .err()
                .map(|error| input.render(&error));
            Ok(Checked {
                file: file.clone(),
                report,
            })
        })
        .collect()
}

/// Run the `check` command. Returns `true` when any file failed.
pub fn run(args: &CheckArgs) -> anyhow::Result<bool> {
    let checked = check_files(args)?;
    let mut failed = 0usize;
    for result in &checked {
        match &result.report {
            Some(report) => {
                failed += 1;
                eprintln!("{report}");
            }
            None if args.verbose => eprintln!("  {} ok", result.file),
            None => {}
        }
    }
    tracing::info!(files = checked.len(), failed, "checked");
    if failed > 0 {
        eprintln!("{failed} of {} files failed to parse", checked.len());
    }
    Ok(failed > 0)
}
