use crossterm::terminal::{self, ClearType};
use crossterm::{cursor, queue};
use std::io::{Stdout, Write};

use crate::editor::LineEditor;
use crate::{RESET, YELLOW};

/// Draw the prompt and the buffer on the current line, placing the terminal
/// cursor where the editor's cursor is.
pub(crate) fn redraw_input(stdout: &mut Stdout, prompt: &str, editor: &LineEditor) {
    queue!(stdout, cursor::MoveToColumn(0), terminal::Clear(ClearType::CurrentLine)).ok();
    write!(stdout, "{YELLOW}{prompt}{RESET}{}", editor.buffer).ok();

    let col = prompt.chars().count() + editor.cursor_chars();
    queue!(stdout, cursor::MoveToColumn(col.min(u16::MAX as usize) as u16)).ok();
    stdout.flush().ok();
}

/// Wipe the input line so output can take its place.
pub(crate) fn clear_input_line(stdout: &mut Stdout) {
    queue!(stdout, cursor::MoveToColumn(0), terminal::Clear(ClearType::CurrentLine)).ok();
    stdout.flush().ok();
}

/// Print `text` where the input line was, then draw the input line again below it.
pub(crate) fn print_above_input(stdout: &mut Stdout, text: &str, prompt: &str, editor: &LineEditor) {
    clear_input_line(stdout);
    for line in text.split('\n') {
        write!(stdout, "{}\r\n", line).ok();
    }
    stdout.flush().ok();
    redraw_input(stdout, prompt, editor);
}
