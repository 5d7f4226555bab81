use std::collections::BTreeMap;

use crate::registry::{self, ParamKind, CHANNEL_PREFIX, COMMAND_PREFIX, SENTINEL};

/// Appended to a nickname completed at the start of a line, addressing that person.
pub const NICK_ADDRESS_SUFFIX: &str = ": ";

/// Known names of one kind, keyed by name, valued by how they are displayed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directory {
    entries: BTreeMap<String, String>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str) {
        self.entries.insert(name.to_string(), name.to_string());
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.entries.remove(name)
    }

    pub fn rename(&mut self, old: &str, new: &str) {
        if self.remove(old).is_some() {
            self.insert(new);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(String::as_str)
    }

    /// Display values starting with `prefix` (ignoring case), each with its
    /// first `word_offset` chars dropped and `suffix` appended.
    pub fn complete(&self, prefix: &str, word_offset: usize, suffix: &str) -> Vec<String> {
        let lower = prefix.to_lowercase();
        self.values()
            .filter(|v| v.to_lowercase().starts_with(&lower))
            .map(|v| format!("{}{suffix}", skip_chars(v, word_offset)))
            .collect()
    }
}

/// State carried between completion calls while one line is being typed.
#[derive(Debug, Clone, Default)]
pub struct CompletionState {
    /// Registry index of the last command name that matched unambiguously.
    pub last_matched: usize,
    pub channels: Directory,
    pub nicks: Directory,
}

impl CompletionState {
    pub fn new() -> Self {
        Self {
            last_matched: SENTINEL,
            channels: Directory::new(),
            nicks: Directory::new(),
        }
    }
}

/// Candidate completions for `line` with the cursor `cursor` chars in.
///
/// Completing a command name records which command matched in
/// `state.last_matched`; the next call, made once the user has typed a space,
/// uses it to decide whether the argument is a nick or a channel. A name that
/// matched zero or several commands resets it, so argument completion after
/// an ambiguous name yields nothing.
pub fn complete(line: &str, cursor: usize, state: &mut CompletionState) -> Vec<String> {
    match line.find(' ') {
        None => complete_first_word(line, cursor, state),
        Some(space) => complete_argument(line, space, cursor, state),
    }
}

fn complete_first_word(line: &str, cursor: usize, state: &mut CompletionState) -> Vec<String> {
    if !line.starts_with(COMMAND_PREFIX) {
        return state.nicks.complete(line, cursor, NICK_ADDRESS_SUFFIX);
    }

    let matches = registry::prefix_matches(line);
    state.last_matched = match matches.as_slice() {
        [(index, _)] => *index,
        _ => SENTINEL,
    };

    matches
        .iter()
        .map(|(_, cmd)| format!("{} ", skip_chars(cmd.name, cursor)))
        .collect()
}

fn complete_argument(line: &str, space: usize, cursor: usize, state: &CompletionState) -> Vec<String> {
    let head_len = line[..space].chars().count() + 1;
    let Some(word_offset) = cursor.checked_sub(head_len) else {
        return Vec::new();
    };
    let arg = &line[space + 1..];

    match registry::get(state.last_matched).kind.first_param_kind() {
        Some(ParamKind::NickOrChannel) => {
            if arg.starts_with(CHANNEL_PREFIX) {
                state.channels.complete(arg, word_offset, "")
            } else {
                state.nicks.complete(arg, word_offset, "")
            }
        }
        Some(ParamKind::Nick) => state.nicks.complete(arg, word_offset, ""),
        Some(ParamKind::Channel) => state.channels.complete(arg, word_offset, ""),
        Some(ParamKind::Text) | None => Vec::new(),
    }
}

/// `s` without its first `n` chars.
fn skip_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((i, _)) => &s[i..],
        None => "",
    }
}
