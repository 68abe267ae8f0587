use std::sync::atomic::AtomicBool;

use defuzz::accelerator::GREEK;
use defuzz::pipeline::propagate;
use defuzz::process::{self, Silent};
use defuzz::{
    Catalog, CatalogEntry, CatalogError, ChangeStatus, Decision, Engine, EquivalencePolicy, Forms,
    PunctuationSet, Rejection, Translation,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

const CATALOG: &str = r#"# Greek translation.
msgid ""
msgstr ""
"Project-Id-Version: demo\n"
"Content-Type: text/plain; charset=UTF-8\n"
"Plural-Forms: nplurals=2; plural=(n != 1);\n"

#: src/menu.cpp:12
#, fuzzy
#| msgid "&Quit"
msgid "Quit"
msgstr "&Έξοδος"

#. Shown in the toolbar
#: src/menu.cpp:20
msgid "Open"
msgstr "Άνοιγμα"

#: src/file.cpp:7
#, fuzzy
#| msgid "Save file..."
msgid "Save file"
msgstr "Αποθήκευση αρχείου..."

#, fuzzy, c-format
#| msgid "%d file:"
#| msgid_plural "%d files:"
msgid "%d file"
msgid_plural "%d files"
msgstr[0] "%d αρχείο:"
msgstr[1] "%d αρχεία:"

msgctxt "verb"
msgid "Close"
msgstr "Κλείσιμο"

#, fuzzy
#| msgid "Print"
msgid "Print the whole document"
msgstr "Εκτύπωση"

#~ msgid "Gone"
#~ msgstr "Χάθηκε"
"#;

fn engine() -> Engine<StdRng> {
    Engine::new(EquivalencePolicy::default(), StdRng::seed_from_u64(11))
}

fn pipeline(old: &str, new: &str, translated: &str) -> (bool, String) {
    let r = propagate(old, new, translated, &GREEK, &mut StdRng::seed_from_u64(11));
    (r.changed, r.text)
}

fn fuzzy(previous: &str, msgid: &str, msgstr: &str) -> CatalogEntry {
    let mut entry = CatalogEntry::new(msgid, Translation::Singular(msgstr.into()));
    entry.previous_msgid = Some(previous.into());
    entry.needs_review = true;
    entry
}

fn entries(catalog: &Catalog) -> Vec<CatalogEntry> {
    (0..catalog.len()).filter_map(|i| catalog.entry(i)).collect()
}

#[test]
fn scenarios() {
    assert_eq!(pipeline("&Quit", "Quit", "&Έξοδος"), (true, "Έξοδος".into()));
    assert_eq!(
        pipeline("Save file...", "Save file", "Αποθήκευση αρχείου..."),
        (true, "Αποθήκευση αρχείου".into())
    );
    assert_eq!(
        pipeline("open the door", "Open the door", "άνοιξε την πόρτα"),
        (true, "Άνοιξε την πόρτα".into())
    );
    assert_eq!(
        pipeline("hello world", "Hello world", "γειά σου"),
        (true, "Γειά σου".into())
    );
    assert_eq!(
        pipeline("Loading.", "Loading…", "Φόρτωση."),
        (true, "Φόρτωση…".into())
    );

    // "!" is only dropped by the broad punctuation set
    let mut broad = Engine::new(
        EquivalencePolicy::NormalizedEquality(PunctuationSet::Broad),
        StdRng::seed_from_u64(11),
    );
    assert!(matches!(
        broad.classify(&fuzzy("Hello", "Hello!!", "Γειά")),
        Decision::Rejected(Rejection::Unresolved {
            status: ChangeStatus::Unchanged,
            ..
        })
    ));
    assert_eq!(
        engine().classify(&fuzzy("Hello", "Hello!!", "Γειά")),
        Decision::Rejected(Rejection::NotEquivalent)
    );
}

#[test]
fn accelerators_are_added() {
    let (changed, text) = pipeline("Quit", "&Quit", "Έξοδος");
    assert!(changed);
    assert_eq!(text.matches('&').count(), 1);
    // accented letters never receive the marker
    assert!(!text.contains("&Έ"));

    let (_, text) = pipeline("Save && Quit", "&Save && Quit", "Αποθήκευση && Έξοδος");
    assert!(text.contains("&&"));
    assert_eq!(text.replace("&&", "").matches('&').count(), 1);
}

#[test]
fn plural_is_rejected_when_only_singular_is_cosmetic() {
    let mut entry = CatalogEntry::new(
        "%d file",
        Translation::Plural(vec!["%d αρχείο".into(), "%d αρχεία".into()]),
    );
    entry.previous_msgid = Some("%d file.".into());
    entry.msgid_plural = Some("%d documents".into());
    entry.previous_msgid_plural = Some("%d files".into());
    entry.needs_review = true;
    assert_eq!(
        engine().classify(&entry),
        Decision::Rejected(Rejection::PluralMismatch)
    );
}

#[test]
fn fix_whole_catalog() {
    let mut catalog = Catalog::from_vec_u8(CATALOG.as_bytes().to_vec()).unwrap();
    let before = entries(&catalog);

    let report = process::fix(&mut catalog, &mut engine(), &mut Silent, &AtomicBool::new(false));
    assert_eq!(report.changed, 3);
    assert!(!report.interrupted);

    let after = entries(&catalog);
    assert_eq!(before.len(), after.len());
    for (before, after) in before.iter().zip(&after) {
        assert_eq!(before.msgid, after.msgid);
        assert_eq!(before.msgctxt, after.msgctxt);
        assert_eq!(before.occurrences, after.occurrences);
        if !before.needs_review {
            assert_eq!(before, after, "unflagged entries are never modified");
        }
    }

    let translation = |msgid: &str| {
        after
            .iter()
            .find(|e| e.msgid == msgid)
            .map(|e| (e.translation.forms(), e.needs_review))
            .unwrap()
    };
    assert_eq!(translation("Quit"), (Forms::singular("Έξοδος"), false));
    assert_eq!(
        translation("Save file"),
        (Forms::singular("Αποθήκευση αρχείου"), false)
    );
    assert_eq!(
        translation("%d file"),
        (Forms::plural("%d αρχείο", "%d αρχεία"), false)
    );
    assert_eq!(
        translation("Print the whole document"),
        (Forms::singular("Εκτύπωση"), true)
    );

    let rendered = catalog.render();
    assert!(rendered.contains("#: src/menu.cpp:20"));
    assert!(rendered.contains("Shown in the toolbar"));
    assert!(rendered.contains("msgctxt \"verb\""));
    assert!(rendered.contains("c-format"));
    assert!(rendered.contains("Χάθηκε"));
}

#[test]
fn save_and_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("el.po");
    std::fs::write(&path, CATALOG).unwrap();

    let mut catalog = Catalog::open(&path).unwrap();
    assert_eq!(catalog.path(), Some(path.as_path()));
    let report = process::fix(&mut catalog, &mut engine(), &mut Silent, &AtomicBool::new(false));
    assert_eq!(report.changed, 3);
    catalog.save().unwrap();

    let reloaded = Catalog::open(&path).unwrap();
    assert_eq!(reloaded.review_candidates().len(), 1);
    let texts = |catalog: &Catalog| -> Vec<_> {
        entries(catalog)
            .into_iter()
            .map(|e| (e.msgid, e.translation, e.needs_review, e.occurrences))
            .collect()
    };
    assert_eq!(texts(&reloaded), texts(&catalog));
    let leftovers: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(leftovers.len(), 1, "no temporary file is left behind");
}

#[test]
fn missing_catalog_is_a_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.po");
    assert!(matches!(
        Catalog::open(&path),
        Err(CatalogError::Read { path: p, .. }) if p == path
    ));
}
