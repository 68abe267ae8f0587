use defuzz::classify::{Acceptance, Rejection};
use defuzz::process::Reporter;
use defuzz::session::ReviewOutcome;
use defuzz::{CatalogEntry, Forms};
use owo_colors::OwoColorize;
use std::io::Write;
use std::path::Path;

/// Make spaces and line breaks visible in a highlighted span.
pub fn highlight_spaces(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            ' ' => result.push('·'),
            '\n' => result.push_str("↵\n"),
            c => result.push(c),
        }
    }
    result
}

/// One run of a character diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Span<'a> {
    Equal(&'a str),
    Removed(&'a str),
    Inserted(&'a str),
}

/// The runs turning `old` into `new`, from a longest common subsequence of
/// their characters. Where both sides change, the removal comes first.
pub fn diff<'a>(old: &'a str, new: &'a str) -> Vec<Span<'a>> {
    let a: Vec<(usize, char)> = old.char_indices().collect();
    let b: Vec<(usize, char)> = new.char_indices().collect();

    // common[i][j]: length of the longest common subsequence of a[i..] and b[j..]
    let mut common = vec![vec![0usize; b.len() + 1]; a.len() + 1];
    for i in (0..a.len()).rev() {
        for j in (0..b.len()).rev() {
            common[i][j] = if a[i].1 == b[j].1 {
                common[i + 1][j + 1] + 1
            } else {
                common[i + 1][j].max(common[i][j + 1])
            };
        }
    }

    let old_at = |i: usize| a.get(i).map_or(old.len(), |(byte, _)| *byte);
    let new_at = |j: usize| b.get(j).map_or(new.len(), |(byte, _)| *byte);

    let mut spans = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < a.len() || j < b.len() {
        if i < a.len() && j < b.len() && a[i].1 == b[j].1 {
            let start = i;
            while i < a.len() && j < b.len() && a[i].1 == b[j].1 {
                i += 1;
                j += 1;
            }
            spans.push(Span::Equal(&old[old_at(start)..old_at(i)]));
            continue;
        }
        let (old_start, new_start) = (i, j);
        while i < a.len() || j < b.len() {
            if i < a.len() && j < b.len() && a[i].1 == b[j].1 {
                break;
            }
            if j == b.len() || (i < a.len() && common[i + 1][j] >= common[i][j + 1]) {
                i += 1;
            } else {
                j += 1;
            }
        }
        if i > old_start {
            spans.push(Span::Removed(&old[old_at(old_start)..old_at(i)]));
        }
        if j > new_start {
            spans.push(Span::Inserted(&new[new_at(new_start)..new_at(j)]));
        }
    }
    spans
}

/// `old` turned into `new`: removed text on red, inserted text in green.
pub fn inline_diff(old: &str, new: &str) -> String {
    diff(old, new)
        .into_iter()
        .map(|span| match span {
            Span::Equal(text) => text.to_owned(),
            Span::Removed(text) => highlight_spaces(text).white().on_red().to_string(),
            Span::Inserted(text) => highlight_spaces(text).green().to_string(),
        })
        .collect()
}

/// `old`, with what disappears in `new` highlighted.
pub fn old_message(old: &str, new: &str) -> String {
    diff(old, new)
        .into_iter()
        .filter_map(|span| match span {
            Span::Equal(text) => Some(text.to_owned()),
            Span::Removed(text) => Some(highlight_spaces(text).white().on_red().to_string()),
            Span::Inserted(_) => None,
        })
        .collect()
}

/// `new`, with what was added since `old` highlighted.
pub fn new_message(old: &str, new: &str) -> String {
    diff(old, new)
        .into_iter()
        .filter_map(|span| match span {
            Span::Equal(text) => Some(text.to_owned()),
            Span::Removed(_) => None,
            Span::Inserted(text) => Some(highlight_spaces(text).green().to_string()),
        })
        .collect()
}

pub fn header(text: &str) {
    println!("{}", format!("\n=== {text} ===").yellow().bold());
}

pub fn subheader(text: &str) {
    println!("{}", format!("\n ─ {text}").cyan());
}

pub fn info(text: &str) {
    println!("{}", text.magenta().bold());
}

/// Like [`info`], without ending the line.
pub fn prompt(text: &str) {
    print!("{}", text.magenta().bold());
    let _ = std::io::stdout().flush();
}

pub fn change(text: &str) {
    println!("{}", format!("  ↳ {text}").green());
}

pub fn unchanged(text: &str) {
    println!("{}", format!("  ↳ {text}").bright_black());
}

pub fn context(text: &str) {
    println!("{}", text.dimmed());
}

pub fn rule() {
    println!("{}", "─".repeat(80).bright_black());
}

fn entry_header(path: &Path, entry: &CatalogEntry) {
    header(&format!(
        "Editing fuzzy entry in {}:{}",
        path.display(),
        entry.linenum
    ));
}

fn print_forms(forms: &Forms) {
    println!("{}", forms.singular);
    if let Some(plural) = &forms.plural {
        println!("{plural}");
    }
}

fn print_form_diffs(before: &Forms, after: &Forms) {
    println!("{}", inline_diff(&before.singular, &after.singular));
    if let (Some(before), Some(after)) = (&before.plural, &after.plural) {
        println!("{}", inline_diff(before, after));
    }
}

pub fn edited(before: &Forms, after: &Forms) {
    if before == after {
        unchanged("No changes made.");
    } else {
        change("Entry updated:");
        print_form_diffs(before, after);
    }
}

/// Everything the reviewer needs to decide on `entry`.
pub fn present(path: &Path, entry: &CatalogEntry, proposed: &Forms) {
    entry_header(path, entry);

    if let Some(msgctxt) = &entry.msgctxt {
        context(&format!(" ─ {msgctxt}"));
        match &entry.previous_msgctxt {
            Some(previous) if previous != msgctxt => {
                context(&format!("  ↳ (previous: {previous})"))
            }
            _ => context("  ↳ (matches previous)"),
        }
    }

    let msgid_plural = entry.msgid_plural.as_deref();
    if let Some(previous) = &entry.previous_msgid {
        subheader("Previous message");
        println!("{}", old_message(previous, &entry.msgid));
        match (&entry.previous_msgid_plural, msgid_plural) {
            (Some(previous), Some(plural)) => println!("{}", old_message(previous, plural)),
            (Some(previous), None) => println!("{previous}"),
            _ => {}
        }
    }

    subheader("New message");
    match &entry.previous_msgid {
        Some(previous) => println!("{}", new_message(previous, &entry.msgid)),
        None => println!("{}", entry.msgid),
    }
    match (&entry.previous_msgid_plural, msgid_plural) {
        (Some(previous), Some(plural)) => println!("{}", new_message(previous, plural)),
        (None, Some(plural)) => println!("{plural}"),
        _ => {}
    }

    subheader("Translation");
    let current = entry.translation.forms();
    if current != *proposed {
        print_form_diffs(&current, proposed);
    } else {
        print_forms(proposed);
    }
}

/// Prints what the drivers decide for each entry.
pub struct Printer;

impl Reporter for Printer {
    fn accepted(&mut self, path: &Path, entry: &CatalogEntry, acceptance: &Acceptance) {
        entry_header(path, entry);
        if let Some(previous) = &entry.previous_msgid {
            subheader("Detected trivial change in msgid:");
            println!("{}", inline_diff(previous, &entry.msgid));
        }
        if acceptance.is_auto_applied() {
            change("Entry updated automatically:");
            print_form_diffs(&entry.translation.forms(), &acceptance.forms);
        } else {
            change("Entry saved as is:");
            print_forms(&acceptance.forms);
        }
    }

    fn rejected(&mut self, path: &Path, entry: &CatalogEntry, rejection: &Rejection) {
        // only the entries whose msgid change was understood are worth a line
        if let Rejection::Unresolved { proposed, .. } = rejection {
            entry_header(path, entry);
            unchanged("Entry NOT changed:");
            print_forms(proposed);
        }
    }

    fn reviewed(&mut self, _path: &Path, _entry: &CatalogEntry, outcome: &ReviewOutcome) {
        match outcome {
            ReviewOutcome::Committed(_) => change("Entry saved."),
            ReviewOutcome::Skipped => unchanged("Entry skipped."),
        }
    }

    fn repaired(&mut self, path: &Path, entry: &CatalogEntry, repaired: &str) {
        header(&format!(
            "Fixing keybinding in {}:{}",
            path.display(),
            entry.linenum
        ));
        context(&format!(" ─ {}", entry.msgid));
        let before = entry.translation.forms();
        println!("{}", inline_diff(&before.singular, repaired));
    }
}
