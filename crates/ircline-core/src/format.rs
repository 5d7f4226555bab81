use chrono::NaiveTime;

/// Column at which messages are word-wrapped.
pub const WRAP_COLUMN: usize = 72;
/// Continuation lines are indented to sit under the text, past the timestamp.
pub const WRAP_INDENT: usize = 7;

// ─── Sanitizing ─────────────────────────────────────────────────────────────

/// Replace DEL and every control character except tab with `?`, so nothing
/// received from the network can drive the terminal.
pub fn sanitize(msg: &str) -> String {
    msg.chars()
        .map(|c| {
            if c == '\u{7f}' || (c < ' ' && c != '\t') {
                '?'
            } else {
                c
            }
        })
        .collect()
}

// ─── Wrapping ───────────────────────────────────────────────────────────────

/// Greedy word wrap at `col` characters. Words are never split; a word that
/// does not fit on its own ends up alone on an over-length line.
pub fn wrap(msg: &str, col: usize) -> String {
    let indent = " ".repeat(WRAP_INDENT);
    let mut out = String::with_capacity(msg.len());
    let mut line_len = 0;
    let mut line_empty = true;

    for word in msg.split_whitespace() {
        let word_len = word.chars().count();
        if line_empty {
            out.push_str(word);
            line_len += word_len + 1;
            line_empty = false;
        } else if line_len + word_len + 1 < col {
            out.push(' ');
            out.push_str(word);
            line_len += word_len + 1;
        } else {
            out.push('\n');
            out.push_str(&indent);
            out.push_str(word);
            line_len = word_len + WRAP_INDENT;
        }
    }

    out
}

// ─── Messages ───────────────────────────────────────────────────────────────

/// `HH:MM`, as shown in front of every line.
pub fn timestamp(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Sanitize, timestamp and wrap a message at `col`.
pub fn format_message(msg: &str, time: NaiveTime, col: usize) -> String {
    let line = format!("{} {}", timestamp(time), sanitize(msg));
    wrap(&line, col)
}

/// A message or action from a participant, as shown in the scrollback.
pub fn incoming(nick: &str, target: &str, text: &str, action: bool) -> String {
    if action {
        format!("{target} [{nick} {text}]")
    } else {
        format!("{target} <{nick}> {text}")
    }
}
