// File: ./src/cli.rs
//! Shared command-line interface logic: argument parsing and help text.
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Import { file: PathBuf, dry_run: bool },
    Stats { file: PathBuf },
    Preview { file: PathBuf },
    Tags,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub command: Command,
    pub root: Option<PathBuf>,
    pub verbose: bool,
}

/// Parses arguments (without the binary name).
pub fn parse_args<I, S>(args: I) -> Result<CliArgs, String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut root = None;
    let mut verbose = false;
    let mut dry_run = false;
    let mut positional = Vec::new();

    let mut iter = args.into_iter().map(Into::into);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" | "help" => {
                return Ok(CliArgs {
                    command: Command::Help,
                    root,
                    verbose,
                });
            }
            "-r" | "--root" => {
                let path = iter
                    .next()
                    .ok_or_else(|| "--root requires a path".to_string())?;
                root = Some(PathBuf::from(path));
            }
            "-v" | "--verbose" => verbose = true,
            "--dry-run" => dry_run = true,
            flag if flag.starts_with('-') && flag.len() > 1 => {
                return Err(format!("Unknown option: {}", flag));
            }
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    let command = match positional.next().as_deref() {
        None => Command::Help,
        Some("import") => Command::Import {
            file: file_arg(positional.next(), "import")?,
            dry_run,
        },
        Some("stats") => Command::Stats {
            file: file_arg(positional.next(), "stats")?,
        },
        Some("preview") => Command::Preview {
            file: file_arg(positional.next(), "preview")?,
        },
        Some("tags") => Command::Tags,
        Some(other) => return Err(format!("Unknown command: {}", other)),
    };

    if let Some(extra) = positional.next() {
        return Err(format!("Unexpected argument: {}", extra));
    }
    if dry_run && !matches!(command, Command::Import { .. }) {
        return Err("--dry-run only applies to 'import'".to_string());
    }

    Ok(CliArgs {
        command,
        root,
        verbose,
    })
}

fn file_arg(arg: Option<String>, command: &str) -> Result<PathBuf, String> {
    arg.map(PathBuf::from)
        .ok_or_else(|| format!("'{}' requires a CSV file", command))
}

pub fn print_help(binary_name: &str) {
    println!(
        "Issue Import v{} - Import issue-tracker CSV exports as projects, tasks and tags",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("USAGE:");
    println!("    {} [OPTIONS] import <file.csv> [--dry-run]", binary_name);
    println!("    {} [OPTIONS] stats <file.csv>", binary_name);
    println!("    {} [OPTIONS] preview <file.csv>", binary_name);
    println!("    {} [OPTIONS] tags", binary_name);
    println!("    {} --help", binary_name);
    println!();
    println!("OPTIONS:");
    println!("    -r, --root <path>     Use a different directory for config and data.");
    println!("    -v, --verbose         Log every created task.");
    println!("    --dry-run             Show what an import would create without saving.");
    println!("    -h, --help            Show this help message.");
    println!();
    println!("CSV FORMAT:");
    println!("    The first row names the columns. 'Summary' and 'Project' are required.");
    println!("    'Issue Id', 'Description', 'Tags' (comma separated) and 'State' are optional.");
    println!("    Tasks are titled '<Issue Id> - <Summary>' and tagged with their state and tags.");
    println!();
    println!("EXAMPLES:");
    println!("    {} stats issues.csv", binary_name);
    println!("    {} import issues.csv --dry-run", binary_name);
    println!("    {} --root /tmp/sandbox import issues.csv", binary_name);
}
