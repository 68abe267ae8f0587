/* Copyright (C) 2025 Olivier Goffart <ogoffart@woboq.com>

Permission is hereby granted, free of charge, to any person obtaining a copy of this software and
associated documentation files (the "Software"), to deal in the Software without restriction,
including without limitation the rights to use, copy, modify, merge, publish, distribute, sublicense,
and/or sell copies of the Software, and to permit persons to whom the Software is furnished to do so,
subject to the following conditions:

The above copyright notice and this permission notice shall be included in all copies or substantial
portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING BUT
NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES
OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
*/

//! Loading and saving `.po` catalogs with [`rspolib`].
//!
//! The engine works on [`CatalogEntry`] values. A [`Catalog`] keeps the parsed
//! [`rspolib::POFile`] around and only writes the translation and the `fuzzy`
//! flag back into it, so comments, references, contexts, other flags, previous
//! strings and obsolete entries come out as they were read.

use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::entry::{CatalogEntry, Translation};

/// Flag marking an entry that needs review.
pub const FUZZY_FLAG: &str = "fuzzy";
/// Line width used when the catalog is written back.
pub const WRAP_WIDTH: usize = 80;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("cannot read `{}`: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse `{}`: {message}", path.display())]
    Parse { path: PathBuf, message: String },
    #[error("cannot write `{}`: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("catalog was not loaded from a file")]
    NoPath,
}

/// A parsed catalog and where it came from.
pub struct Catalog {
    path: Option<PathBuf>,
    file: rspolib::POFile,
}

impl Catalog {
    /// Read and parse the catalog at `path`.
    pub fn open(path: &Path) -> Result<Self, CatalogError> {
        let data = std::fs::read(path).map_err(|source| CatalogError::Read {
            path: path.to_owned(),
            source,
        })?;
        let file = parse(data, path)?;
        Ok(Catalog {
            path: Some(path.to_owned()),
            file,
        })
    }

    /// Parse catalog contents that do not come from a file.
    pub fn from_vec_u8(data: Vec<u8>) -> Result<Self, CatalogError> {
        let file = parse(data, Path::new("<memory>"))?;
        Ok(Catalog { path: None, file })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn len(&self) -> usize {
        self.file.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.file.entries.is_empty()
    }

    /// Indices of the entries needing review, in catalog order. The header and
    /// obsolete entries are never candidates.
    pub fn review_candidates(&self) -> Vec<usize> {
        self.indices(|entry| is_fuzzy(entry) && !entry.obsolete)
    }

    /// Indices of reviewed, non-plural entries that have a translation.
    pub fn translated_singulars(&self) -> Vec<usize> {
        self.indices(|entry| {
            !is_fuzzy(entry)
                && !entry.obsolete
                && entry.msgid_plural.is_none()
                && entry.msgstr.as_deref().is_some_and(|s| !s.is_empty())
        })
    }

    fn indices(&self, filter: impl Fn(&rspolib::POEntry) -> bool) -> Vec<usize> {
        self.file
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| !entry.msgid.is_empty() && filter(entry))
            .map(|(index, _)| index)
            .collect()
    }

    pub fn entry(&self, index: usize) -> Option<CatalogEntry> {
        self.file.entries.get(index).map(CatalogEntry::from)
    }

    /// Write the translation and the review flag of `entry` back at `index`.
    pub fn commit(&mut self, index: usize, entry: &CatalogEntry) {
        let Some(target) = self.file.entries.get_mut(index) else {
            return;
        };
        match &entry.translation {
            Translation::Singular(text) => {
                if target.msgstr.as_deref().unwrap_or_default() != text {
                    target.msgstr = Some(text.clone());
                }
            }
            Translation::Plural(slots) => target.msgstr_plural = slots.clone(),
        }
        let flagged = is_fuzzy(target);
        if entry.needs_review && !flagged {
            target.flags.push(FUZZY_FLAG.to_owned());
        } else if !entry.needs_review && flagged {
            target.flags.retain(|flag| flag != FUZZY_FLAG);
        }
    }

    /// The catalog in `.po` syntax.
    pub fn render(&self) -> String {
        self.file.to_string()
    }

    /// Replace the file the catalog was opened from.
    pub fn save(&self) -> Result<(), CatalogError> {
        let path = self.path.as_deref().ok_or(CatalogError::NoPath)?;
        self.save_to(path)
    }

    /// Write the catalog to `path` through a temporary file in the same directory,
    /// so that `path` holds either the old or the new catalog, never a partial one.
    pub fn save_to(&self, path: &Path) -> Result<(), CatalogError> {
        let write = || -> std::io::Result<()> {
            let dir = match path.parent() {
                Some(dir) if !dir.as_os_str().is_empty() => dir,
                _ => Path::new("."),
            };
            let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
            tmp.write_all(self.render().as_bytes())?;
            if let Ok(metadata) = std::fs::metadata(path) {
                tmp.as_file().set_permissions(metadata.permissions())?;
            }
            tmp.as_file().sync_all()?;
            tmp.persist(path).map_err(|persist_error| persist_error.error)?;
            Ok(())
        };
        write().map_err(|source| CatalogError::Write {
            path: path.to_owned(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "catalog written");
        Ok(())
    }
}

// The PO parser reads `path_or_content` only, raw bytes are left to the MO parser.
fn parse(data: Vec<u8>, path: &Path) -> Result<rspolib::POFile, CatalogError> {
    let content = String::from_utf8(data).map_err(|err| CatalogError::Parse {
        path: path.to_owned(),
        message: err.to_string(),
    })?;
    rspolib::pofile(rspolib::FileOptions::from((content.as_str(), WRAP_WIDTH))).map_err(
        |parse_error| CatalogError::Parse {
            path: path.to_owned(),
            message: parse_error.to_string(),
        },
    )
}

fn is_fuzzy(entry: &rspolib::POEntry) -> bool {
    entry.flags.iter().any(|flag| flag == FUZZY_FLAG)
}

impl From<&rspolib::POEntry> for CatalogEntry {
    fn from(entry: &rspolib::POEntry) -> Self {
        let translation = if entry.msgid_plural.is_some() {
            Translation::Plural(entry.msgstr_plural.clone())
        } else {
            Translation::Singular(entry.msgstr.clone().unwrap_or_default())
        };
        CatalogEntry {
            msgid: entry.msgid.clone(),
            msgid_plural: entry.msgid_plural.clone(),
            msgctxt: entry.msgctxt.clone(),
            previous_msgid: entry.previous_msgid.clone(),
            previous_msgid_plural: entry.previous_msgid_plural.clone(),
            previous_msgctxt: entry.previous_msgctxt.clone(),
            translation,
            needs_review: is_fuzzy(entry),
            obsolete: entry.obsolete,
            occurrences: entry.occurrences.clone(),
            linenum: entry.linenum,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Forms;

    const CATALOG: &str = r#"
msgid ""
msgstr ""
"Content-Type: text/plain; charset=UTF-8\n"

#: src/menu.cpp:12
#, fuzzy
#| msgid "&Quit"
msgid "Quit"
msgstr "&Έξοδος"

#: src/menu.cpp:20
msgid "Open"
msgstr "Άνοιγμα"

#, fuzzy, c-format
#| msgid "%n file..."
#| msgid_plural "%n files..."
msgid "%n file"
msgid_plural "%n files"
msgstr[0] "%n αρχείο..."
msgstr[1] "%n αρχεία..."

#, fuzzy
#~ msgid "Gone"
#~ msgstr "Χάθηκε"
"#;

    fn catalog() -> Catalog {
        Catalog::from_vec_u8(CATALOG.as_bytes().to_vec()).unwrap()
    }

    #[test]
    fn candidates() {
        let catalog = catalog();
        let fuzzy = catalog.review_candidates();
        assert_eq!(fuzzy.len(), 2);
        let quit = catalog.entry(fuzzy[0]).unwrap();
        assert_eq!(quit.msgid, "Quit");
        assert_eq!(quit.previous_msgid.as_deref(), Some("&Quit"));
        assert_eq!(quit.translation, Translation::Singular("&Έξοδος".into()));
        assert!(quit.needs_review);
        assert_eq!(quit.occurrences.len(), 1);

        let files = catalog.entry(fuzzy[1]).unwrap();
        assert_eq!(files.previous_msgid_plural.as_deref(), Some("%n files..."));
        assert_eq!(
            files.translation.forms(),
            Forms::plural("%n αρχείο...", "%n αρχεία...")
        );

        let translated = catalog.translated_singulars();
        assert_eq!(translated.len(), 1);
        assert_eq!(catalog.entry(translated[0]).unwrap().msgid, "Open");
    }

    #[test]
    fn commit_only_touches_translation_and_flag() {
        let mut catalog = catalog();
        let index = catalog.review_candidates()[0];
        let mut entry = catalog.entry(index).unwrap();
        entry.commit(&Forms::singular("Έξοδος"));
        catalog.commit(index, &entry);

        let reread = catalog.entry(index).unwrap();
        assert_eq!(reread.translation, Translation::Singular("Έξοδος".into()));
        assert!(!reread.needs_review);
        assert_eq!(reread.occurrences, entry.occurrences);
        assert_eq!(catalog.review_candidates().len(), 1);

        let rendered = catalog.render();
        assert!(rendered.contains("msgstr \"Έξοδος\""));
        assert!(rendered.contains("c-format"));
    }

    #[test]
    fn open_reads_entries_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("el.po");
        std::fs::write(&path, CATALOG).unwrap();

        let catalog = Catalog::open(&path).unwrap();
        assert_eq!(catalog.path(), Some(path.as_path()));
        assert!(!catalog.is_empty());
        assert_eq!(catalog.review_candidates().len(), 2);
        let rendered = catalog.render();
        assert!(rendered.contains("#| msgid \"&Quit\""));
        assert!(rendered.contains("#~ msgid \"Gone\""));
    }

    #[test]
    fn invalid_utf8_is_a_parse_error() {
        let mut data = CATALOG.as_bytes().to_vec();
        data.extend_from_slice(b"msgid \"\xff\"\nmsgstr \"\"\n");
        assert!(matches!(
            Catalog::from_vec_u8(data),
            Err(CatalogError::Parse { .. })
        ));
    }

    #[test]
    fn in_memory_catalog_has_no_path() {
        assert!(matches!(catalog().save(), Err(CatalogError::NoPath)));
    }
}
