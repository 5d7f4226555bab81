use ircline_core::Session;

use crate::editor::LineEditor;

pub(crate) enum TabOutcome {
    Nothing,
    Inserted,
    /// Several candidates; their longest shared prefix (if any) was inserted
    /// and these full words should be shown to the user.
    Listed(Vec<String>),
}

/// Complete the word under the cursor, editing the buffer in place.
pub(crate) fn tab_complete(session: &mut Session, editor: &mut LineEditor) -> TabOutcome {
    let candidates = session.complete(&editor.buffer, editor.cursor_chars());
    match candidates.as_slice() {
        [] => TabOutcome::Nothing,
        [only] => {
            editor.insert_text(only);
            TabOutcome::Inserted
        }
        many => {
            let word = editor.word_before_cursor().to_string();
            let shared = common_prefix(many);
            if !shared.is_empty() {
                editor.insert_text(&shared);
            }
            let listed = many
                .iter()
                .map(|c| format!("{word}{}", c.trim_end()))
                .collect();
            TabOutcome::Listed(listed)
        }
    }
}

fn common_prefix(candidates: &[String]) -> String {
    let Some((first, rest)) = candidates.split_first() else {
        return String::new();
    };
    let mut len = first.len();
    for other in rest {
        len = first
            .char_indices()
            .zip(other.chars())
            .take_while(|((_, a), b)| a == b)
            .map(|((i, a), _)| i + a.len_utf8())
            .last()
            .unwrap_or(0)
            .min(len);
    }
    first[..len].to_string()
}
