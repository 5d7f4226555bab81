//! Whitespace tokenizer that remembers where each field sits in the line, so
//! free-form trailing text can be forwarded exactly as typed.

use std::ops::Range;

#[derive(Debug, Clone)]
pub struct Fields<'a> {
    line: &'a str,
    spans: Vec<Range<usize>>,
}

impl<'a> Fields<'a> {
    pub fn split(line: &'a str) -> Self {
        let mut spans = Vec::new();
        let mut start: Option<usize> = None;

        for (i, c) in line.char_indices() {
            match (c.is_whitespace(), start) {
                (true, Some(s)) => {
                    spans.push(s..i);
                    start = None;
                }
                (false, None) => start = Some(i),
                _ => {}
            }
        }
        if let Some(s) = start {
            spans.push(s..line.len());
        }

        Self { line, spans }
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn get(&self, n: usize) -> Option<&'a str> {
        self.spans.get(n).map(|r| &self.line[r.clone()])
    }

    /// Text from the start of field `n` to the end of the line, with inner
    /// whitespace runs intact and trailing whitespace removed.
    pub fn rest_from(&self, n: usize) -> Option<&'a str> {
        self.spans
            .get(n)
            .map(|r| self.line[r.start..].trim_end())
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.spans.iter().map(|r| &self.line[r.clone()])
    }
}
