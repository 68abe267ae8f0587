use anyhow::Error;
use std::ops::ControlFlow;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

/// Extension of the catalogs to process.
pub const CATALOG_EXTENSION: &str = "po";

/// Hidden directories such as `.git` are not descended into. The root itself is
/// always visited.
pub fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry.file_name().to_string_lossy().starts_with('.')
}

/**
 *  Walk `root` and call `visitor` for every catalog below it, in file name order.
 *  Directories for which `skip` returns true are not descended into. The walk stops
 *  as soon as the visitor returns `ControlFlow::Break` or an error.
 */
pub fn visit_catalogs<P, S, V>(root: P, skip: S, mut visitor: V) -> Result<(), Error>
where
    P: AsRef<Path>,
    S: Fn(&DirEntry) -> bool,
    V: FnMut(&Path) -> Result<ControlFlow<()>, Error>,
{
    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !skip(e));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Error accessing entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() || !is_catalog(entry.path()) {
            continue;
        }
        if visitor(entry.path())?.is_break() {
            break;
        }
    }
    Ok(())
}

fn is_catalog(path: &Path) -> bool {
    path.extension()
        .is_some_and(|extension| extension == CATALOG_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("po/sub")).unwrap();
        fs::create_dir_all(root.join(".git")).unwrap();
        for file in ["po/el.po", "po/de.po", "po/sub/fr.po", "po/messages.pot", ".git/x.po", "z.po"] {
            fs::write(root.join(file), "").unwrap();
        }
        dir
    }

    fn relative(root: &Path, paths: Vec<PathBuf>) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn sorted_and_filtered() {
        let dir = tree();
        let mut seen = Vec::new();
        visit_catalogs(dir.path(), is_hidden, |path| {
            seen.push(path.to_owned());
            Ok(ControlFlow::Continue(()))
        })
        .unwrap();
        assert_eq!(
            relative(dir.path(), seen),
            ["po/de.po", "po/el.po", "po/sub/fr.po", "z.po"]
        );
    }

    #[test]
    fn break_stops_the_walk() {
        let dir = tree();
        let mut seen = Vec::new();
        visit_catalogs(dir.path(), is_hidden, |path| {
            seen.push(path.to_owned());
            Ok(ControlFlow::Break(()))
        })
        .unwrap();
        assert_eq!(relative(dir.path(), seen), ["po/de.po"]);
    }

    #[test]
    fn custom_skip() {
        let dir = tree();
        let mut seen = Vec::new();
        visit_catalogs(
            dir.path(),
            |e| is_hidden(e) || e.file_name() == "sub",
            |path| {
                seen.push(path.to_owned());
                Ok(ControlFlow::Continue(()))
            },
        )
        .unwrap();
        assert_eq!(relative(dir.path(), seen), ["po/de.po", "po/el.po", "z.po"]);
    }
}
