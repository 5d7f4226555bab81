/// Single-line input buffer with cursor, word movement and history.
/// `cursor` is a byte offset that always sits on a char boundary.
pub(crate) struct LineEditor {
    pub(crate) buffer: String,
    pub(crate) cursor: usize,
    pub(crate) history: Vec<String>,
    history_index: Option<usize>,
    saved_buffer: String,
}

impl LineEditor {
    pub(crate) fn new() -> Self {
        Self {
            buffer: String::new(),
            cursor: 0,
            history: Vec::new(),
            history_index: None,
            saved_buffer: String::new(),
        }
    }

    /// Cursor position in chars, as the completer counts it.
    pub(crate) fn cursor_chars(&self) -> usize {
        self.buffer[..self.cursor].chars().count()
    }

    /// The word the cursor is at the end of.
    pub(crate) fn word_before_cursor(&self) -> &str {
        let before = &self.buffer[..self.cursor];
        match before.rfind(' ') {
            Some(pos) => &before[pos + 1..],
            None => before,
        }
    }

    pub(crate) fn insert_char(&mut self, c: char) {
        self.buffer.insert(self.cursor, c);
        self.cursor += c.len_utf8();
        self.history_index = None;
    }

    pub(crate) fn insert_text(&mut self, s: &str) {
        self.buffer.insert_str(self.cursor, s);
        self.cursor += s.len();
        self.history_index = None;
    }

    pub(crate) fn delete_back(&mut self) {
        if self.cursor > 0 {
            let prev = self.prev_char_boundary();
            self.buffer.drain(prev..self.cursor);
            self.cursor = prev;
        }
    }

    pub(crate) fn delete_forward(&mut self) {
        if self.cursor < self.buffer.len() {
            let next = self.next_char_boundary();
            self.buffer.drain(self.cursor..next);
        }
    }

    pub(crate) fn kill_to_end(&mut self) {
        self.buffer.truncate(self.cursor);
    }

    pub(crate) fn kill_to_start(&mut self) {
        self.buffer.drain(..self.cursor);
        self.cursor = 0;
    }

    pub(crate) fn delete_word_back(&mut self) {
        let start = self.word_start_before(self.cursor);
        self.buffer.drain(start..self.cursor);
        self.cursor = start;
    }

    pub(crate) fn move_word_left(&mut self) {
        self.cursor = self.word_start_before(self.cursor);
    }

    pub(crate) fn move_word_right(&mut self) {
        let rest = &self.buffer[self.cursor..];
        let word = rest.find(' ').unwrap_or(rest.len());
        let gap = rest[word..].len() - rest[word..].trim_start_matches(' ').len();
        self.cursor += word + gap;
    }

    pub(crate) fn move_left(&mut self) {
        if self.cursor > 0 {
            self.cursor = self.prev_char_boundary();
        }
    }

    pub(crate) fn move_right(&mut self) {
        if self.cursor < self.buffer.len() {
            self.cursor = self.next_char_boundary();
        }
    }

    pub(crate) fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub(crate) fn move_end(&mut self) {
        self.cursor = self.buffer.len();
    }

    /// Take the buffer as a submitted line, remembering it in history.
    pub(crate) fn submit(&mut self) -> String {
        let content = std::mem::take(&mut self.buffer);
        if !content.trim().is_empty() {
            self.history.push(content.clone());
        }
        self.cursor = 0;
        self.history_index = None;
        content
    }

    pub(crate) fn history_up(&mut self) {
        if self.history.is_empty() {
            return;
        }
        let idx = match self.history_index {
            None => {
                self.saved_buffer = self.buffer.clone();
                self.history.len() - 1
            }
            Some(0) => return,
            Some(idx) => idx - 1,
        };
        self.history_index = Some(idx);
        self.buffer = self.history[idx].clone();
        self.cursor = self.buffer.len();
    }

    pub(crate) fn history_down(&mut self) {
        let Some(idx) = self.history_index else {
            return;
        };
        if idx + 1 >= self.history.len() {
            self.history_index = None;
            self.buffer = std::mem::take(&mut self.saved_buffer);
        } else {
            self.history_index = Some(idx + 1);
            self.buffer = self.history[idx + 1].clone();
        }
        self.cursor = self.buffer.len();
    }

    /// Start of the word ending at or before `pos`, skipping spaces first.
    fn word_start_before(&self, pos: usize) -> usize {
        let head = self.buffer[..pos].trim_end_matches(' ');
        head.rfind(' ').map_or(0, |space| space + 1)
    }

    fn prev_char_boundary(&self) -> usize {
        self.buffer[..self.cursor]
            .char_indices()
            .next_back()
            .map_or(0, |(i, _)| i)
    }

    fn next_char_boundary(&self) -> usize {
        self.buffer[self.cursor..]
            .chars()
            .next()
            .map_or(self.cursor, |c| self.cursor + c.len_utf8())
    }
}
