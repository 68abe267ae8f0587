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

//! The catalog entry as seen by the engine.

/// Translated text of an entry.
///
/// Which variant is used depends on whether the entry has a `msgid_plural`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Translation {
    Singular(String),
    /// `msgstr[0]`, `msgstr[1]`, ... Slots past the second are carried along untouched.
    Plural(Vec<String>),
}

impl Translation {
    /// Whether the entry carries a `msgstr[n]` table at all.
    pub fn has_plural_slot(&self) -> bool {
        matches!(self, Translation::Plural(slots) if !slots.is_empty())
    }

    /// The singular text and, if present, the `msgstr[1]` text.
    pub fn forms(&self) -> Forms {
        match self {
            Translation::Singular(text) => Forms::singular(text.clone()),
            Translation::Plural(slots) => Forms {
                singular: slots.first().cloned().unwrap_or_default(),
                plural: slots.get(1).cloned(),
            },
        }
    }

    /// Overwrite the texts of `forms`. A missing plural form leaves `msgstr[1]` alone.
    pub fn set_forms(&mut self, forms: &Forms) {
        match self {
            Translation::Singular(text) => *text = forms.singular.clone(),
            Translation::Plural(slots) => {
                if let Some(slot) = slots.first_mut() {
                    *slot = forms.singular.clone();
                } else if !forms.singular.is_empty() {
                    slots.push(forms.singular.clone());
                }
                if let (Some(slot), Some(plural)) = (slots.get_mut(1), &forms.plural) {
                    *slot = plural.clone();
                }
            }
        }
    }
}

/// The one or two texts the engine rewrites for an entry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Forms {
    pub singular: String,
    pub plural: Option<String>,
}

impl Forms {
    pub fn singular(text: impl Into<String>) -> Self {
        Forms {
            singular: text.into(),
            plural: None,
        }
    }

    pub fn plural(singular: impl Into<String>, plural: impl Into<String>) -> Self {
        Forms {
            singular: singular.into(),
            plural: Some(plural.into()),
        }
    }
}

/// One translatable unit of a catalog.
///
/// The `previous_*` fields hold the source text as of the last translation and
/// are only set while the entry needs review.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogEntry {
    pub msgid: String,
    pub msgid_plural: Option<String>,
    pub msgctxt: Option<String>,
    pub previous_msgid: Option<String>,
    pub previous_msgid_plural: Option<String>,
    pub previous_msgctxt: Option<String>,
    pub translation: Translation,
    /// The `fuzzy` flag.
    pub needs_review: bool,
    pub obsolete: bool,
    /// `(file, line)` pairs of the `#:` reference comments.
    pub occurrences: Vec<(String, String)>,
    pub linenum: usize,
}

impl CatalogEntry {
    pub fn new(msgid: impl Into<String>, translation: Translation) -> Self {
        CatalogEntry {
            msgid: msgid.into(),
            msgid_plural: None,
            msgctxt: None,
            previous_msgid: None,
            previous_msgid_plural: None,
            previous_msgctxt: None,
            translation,
            needs_review: false,
            obsolete: false,
            occurrences: Vec::new(),
            linenum: 0,
        }
    }

    /// Store reviewed texts and clear the review flag.
    pub fn commit(&mut self, forms: &Forms) {
        self.translation.set_forms(forms);
        self.needs_review = false;
    }
}
