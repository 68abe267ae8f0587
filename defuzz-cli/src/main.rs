use anyhow::{Context, Error};
use clap::{crate_authors, crate_description, crate_version, value_parser, Arg, ArgAction, ArgMatches, Command};
use defuzz::process::{self, FileReport, ReviewOptions};
use defuzz::{Catalog, Engine, EquivalencePolicy, PunctuationSet};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::any::Any;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

mod catalog_visitor;
mod render;
mod terminal;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Fix,
    Review,
    Keybindings,
}

struct Options {
    mode: Mode,
    directory: PathBuf,
    policy: EquivalencePolicy,
    seed: Option<u64>,
    dry_run: bool,
    review: ReviewOptions,
    editor: String,
}

impl Options {
    fn from_matches(mode: Mode, matches: &ArgMatches) -> Result<Self, Error> {
        let directory = matches
            .get_one::<PathBuf>("DIRECTORY")
            .context("missing directory")?
            .clone();

        let punctuation = match value::<String>(matches, "punctuation").map(String::as_str) {
            Some("broad") => PunctuationSet::Broad,
            _ => PunctuationSet::Narrow,
        };
        let policy = match value::<String>(matches, "filter-type").map(String::as_str) {
            Some("character-difference") => EquivalencePolicy::BoundedDistance {
                max_char_diff: value::<usize>(matches, "max-char-diff")
                    .copied()
                    .unwrap_or(defuzz::equivalence::DEFAULT_MAX_CHAR_DIFF),
            },
            _ => EquivalencePolicy::NormalizedEquality(punctuation),
        };

        let review = ReviewOptions {
            no_filter: value::<bool>(matches, "no-filter").copied().unwrap_or(false),
            confirm_delay: value::<u64>(matches, "confirm-delay")
                .map(|secs| Duration::from_secs(*secs))
                .unwrap_or(defuzz::session::DEFAULT_CONFIRM_DELAY),
        };
        let editor = value::<String>(matches, "editor").cloned();

        Ok(Options {
            mode,
            directory,
            policy,
            seed: value::<u64>(matches, "seed").copied(),
            dry_run: matches.get_flag("dry-run"),
            review,
            editor: editor.unwrap_or_else(|| terminal::FALLBACK_EDITOR.to_owned()),
        })
    }
}

/// The value of `id`, or `None` if the subcommand has no such argument.
fn value<'a, T: Any + Clone + Send + Sync + 'static>(matches: &'a ArgMatches, id: &str) -> Option<&'a T> {
    matches.try_get_one::<T>(id).ok().flatten()
}

fn directory_arg() -> Arg {
    Arg::new("DIRECTORY")
        .help("Directory to scan for .po files")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .index(1)
}

fn common_args(command: Command) -> Command {
    command
        .arg(directory_arg())
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_name("N")
                .env("DEFUZZ_SEED")
                .value_parser(value_parser!(u64))
                .help("Seed the random placement of new accelerators, for reproducible runs"),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .action(ArgAction::SetTrue)
                .help("Report what would change without writing any file"),
        )
}

fn filter_args(command: Command, punctuation: &'static str) -> Command {
    command
        .arg(
            Arg::new("filter-type")
                .long("filter-type")
                .value_parser(["whitespace-punctuation", "character-difference"])
                .default_value("whitespace-punctuation")
                .help("How to decide that a msgid change is trivial"),
        )
        .arg(
            Arg::new("punctuation")
                .long("punctuation")
                .value_parser(["narrow", "broad"])
                .default_value(punctuation)
                .help("Punctuation ignored by the whitespace-punctuation filter"),
        )
        .arg(
            Arg::new("max-char-diff")
                .long("max-char-diff")
                .value_name("N")
                .value_parser(value_parser!(usize))
                .default_value("2")
                .help("Maximum number of changed characters for the character-difference filter"),
        )
}

fn cli() -> Command {
    Command::new("defuzz")
        .version(crate_version!())
        .author(crate_authors!())
        .about(crate_description!())
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log every decision"),
        )
        .subcommand(filter_args(
            common_args(
                Command::new("fix")
                    .about("Clear fuzzy entries whose msgid change can be mirrored automatically"),
            ),
            "narrow",
        ))
        .subcommand(
            filter_args(
                common_args(Command::new("review").about(
                    "Repair what can be repaired automatically, then review the remaining trivial changes",
                )),
                "broad",
            )
            .arg(
                Arg::new("no-filter")
                    .long("no-filter")
                    .action(ArgAction::SetTrue)
                    .help("Review every fuzzy entry, not only the trivial changes"),
            )
            .arg(
                Arg::new("editor")
                    .long("editor")
                    .value_name("PROGRAM")
                    .env("EDITOR")
                    .help("Editor used to edit translations [default: nano]"),
            )
            .arg(
                Arg::new("confirm-delay")
                    .long("confirm-delay")
                    .value_name("SECONDS")
                    .value_parser(value_parser!(u64))
                    .default_value("2")
                    .help("Time to cancel an edit before it is saved"),
            ),
        )
        .subcommand(common_args(
            Command::new("keybindings")
                .about("Move accelerators away from letters that cannot carry one"),
        ))
}

fn init_tracing(verbose: bool) {
    // the library and the binary are both named `defuzz`
    let default = if verbose { "defuzz=debug" } else { "defuzz=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn process_file(
    path: &Path,
    options: &Options,
    engine: &mut Engine<StdRng>,
    terminal: &mut terminal::Terminal,
    interrupt: &AtomicBool,
) -> Result<Option<FileReport>, Error> {
    let mut catalog = match Catalog::open(path) {
        Ok(catalog) => catalog,
        Err(err) => {
            tracing::error!("{err}, skipping");
            return Ok(None);
        }
    };
    tracing::debug!(path = %path.display(), entries = catalog.len(), "processing");

    let mut printer = render::Printer;
    let report = match options.mode {
        Mode::Fix => process::fix(&mut catalog, engine, &mut printer, interrupt),
        Mode::Review => process::review(
            &mut catalog,
            engine,
            terminal,
            options.review,
            &mut printer,
            interrupt,
        ),
        Mode::Keybindings => {
            process::repair_keybindings(&mut catalog, engine, &mut printer, interrupt)
        }
    };

    if report.changed > 0 && !options.dry_run && save(&catalog, path) {
        tracing::info!(path = %path.display(), changed = report.changed, "catalog saved");
    }
    Ok(Some(report))
}

/// Write `catalog` back to `path`. A failure is logged and the scan goes on
/// with the next file.
fn save(catalog: &Catalog, path: &Path) -> bool {
    render::info(&format!("Saving changes to {}...", path.display()));
    match catalog.save() {
        Ok(()) => true,
        Err(err) => {
            tracing::error!("{err}, changes to {} are lost", path.display());
            false
        }
    }
}

fn run(options: &Options, interrupt: Arc<AtomicBool>) -> Result<usize, Error> {
    let rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut engine = Engine::new(options.policy, rng);
    let mut terminal = terminal::Terminal::new(options.editor.clone(), interrupt.clone());

    let mut total = 0;
    catalog_visitor::visit_catalogs(&options.directory, catalog_visitor::is_hidden, |path| {
        let Some(report) = process_file(path, options, &mut engine, &mut terminal, &interrupt)?
        else {
            return Ok(ControlFlow::Continue(()));
        };
        total += report.changed;
        if report.interrupted || interrupt.load(Ordering::SeqCst) {
            tracing::info!("interrupted, not visiting further catalogs");
            return Ok(ControlFlow::Break(()));
        }
        Ok(ControlFlow::Continue(()))
    })?;
    Ok(total)
}

fn main() -> Result<(), Error> {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("verbose"));

    let (mode, sub_matches) = match matches.subcommand() {
        Some(("fix", sub)) => (Mode::Fix, sub),
        Some(("review", sub)) => (Mode::Review, sub),
        Some(("keybindings", sub)) => (Mode::Keybindings, sub),
        _ => anyhow::bail!("a subcommand is required"),
    };
    let options = Options::from_matches(mode, sub_matches)?;
    if !options.directory.is_dir() {
        anyhow::bail!("`{}` is not a directory", options.directory.display());
    }

    let interrupt = Arc::new(AtomicBool::new(false));
    {
        let interrupt = interrupt.clone();
        ctrlc::set_handler(move || interrupt.store(true, Ordering::SeqCst))
            .context("Failed to install the Ctrl-C handler")?;
    }

    let total = run(&options, interrupt)?;
    render::info(&format!("Changes made: {total}"));
    Ok(())
}
