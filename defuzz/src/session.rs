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

//! Manual review of one entry.
//!
//! The session is a small state machine over a [`ReviewIo`]: the entry is
//! presented, then the reviewer either writes the proposed text as is, skips the
//! entry, or edits it. An edit that changes something is committed after a
//! confirmation delay unless the reviewer cancels during the delay, which brings
//! the entry back on screen. Nothing is stored in the entry before a commit, so a
//! skip or an interrupt leaves its original text in place.

use std::path::Path;
use std::time::Duration;

use thiserror::Error;

use crate::entry::{CatalogEntry, Forms};

/// Delay before an edited entry is committed.
pub const DEFAULT_CONFIRM_DELAY: Duration = Duration::from_secs(2);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Edit,
    Write,
    Skip,
}

/// How the confirmation delay ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaitOutcome {
    Elapsed,
    Cancelled,
}

/// The reviewer asked to stop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Error)]
#[error("review interrupted")]
pub struct Interrupted;

/// The reviewer's side of the session.
pub trait ReviewIo {
    /// Show the entry and the text proposed for it.
    fn present(&mut self, path: &Path, entry: &CatalogEntry, proposed: &Forms);
    fn choose_action(&mut self) -> Result<Action, Interrupted>;
    /// Ask for a replacement of `current`.
    fn edit(&mut self, label: &str, current: &str) -> Result<String, Interrupted>;
    /// Show the result of an edit. `before == after` when nothing was changed.
    fn edited(&mut self, before: &Forms, after: &Forms);
    /// Block for at most `delay`, or until the reviewer cancels.
    fn confirm(&mut self, delay: Duration) -> Result<WaitOutcome, Interrupted>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReviewOutcome {
    /// Store these texts and clear the review flag.
    Committed(Forms),
    /// Leave the entry as it was.
    Skipped,
}

enum State {
    Present,
    Edit,
    Confirm(Forms),
}

/// Run the session for `entry`, starting from the `proposed` texts.
pub fn review(
    io: &mut dyn ReviewIo,
    path: &Path,
    entry: &CatalogEntry,
    proposed: Forms,
    confirm_delay: Duration,
) -> Result<ReviewOutcome, Interrupted> {
    io.present(path, entry, &proposed);
    let singular_label = if proposed.plural.is_some() {
        "msgstr[0]"
    } else {
        "msgstr"
    };

    let mut state = State::Present;
    loop {
        state = match state {
            State::Present => match io.choose_action()? {
                Action::Edit => State::Edit,
                Action::Write => return Ok(ReviewOutcome::Committed(proposed)),
                Action::Skip => return Ok(ReviewOutcome::Skipped),
            },
            State::Edit => {
                let singular = io.edit(singular_label, &proposed.singular)?;
                let plural = match &proposed.plural {
                    Some(plural) => Some(io.edit("msgstr[1]", plural)?),
                    None => None,
                };
                let edited = Forms { singular, plural };
                io.edited(&proposed, &edited);
                if edited == proposed {
                    State::Present
                } else {
                    State::Confirm(edited)
                }
            }
            State::Confirm(edited) => match io.confirm(confirm_delay)? {
                WaitOutcome::Elapsed => return Ok(ReviewOutcome::Committed(edited)),
                WaitOutcome::Cancelled => State::Present,
            },
        };
    }
}
