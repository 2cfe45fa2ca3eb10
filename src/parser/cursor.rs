/// Forward cursor over template text with one-step backtracking and a mark
/// for capturing the text between two positions.
///
/// All structural characters are ASCII, so the cursor steps over bytes;
/// UTF-8 continuation bytes never compare equal to a delimiter and every
/// captured range starts and ends on a delimiter or the string edge.
pub(crate) struct Cursor<'a> {
    text: &'a str,
    pos: usize,
    mark: Option<usize>,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            mark: None,
        }
    }

    /// Byte under the cursor, `None` once past the end.
    #[inline]
    pub(crate) fn current(&self) -> Option<u8> {
        self.text.as_bytes().get(self.pos).copied()
    }

    #[inline]
    pub(crate) fn at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    /// Step forward. Returns `false` when the step lands past the last byte.
    #[inline]
    pub(crate) fn advance(&mut self) -> bool {
        if self.pos < self.text.len() {
            self.pos += 1;
        }
        self.pos < self.text.len()
    }

    #[inline]
    pub(crate) fn back(&mut self) {
        self.pos = self.pos.saturating_sub(1);
    }

    pub(crate) fn mark(&mut self) {
        self.mark = Some(self.pos);
    }

    /// Text from the mark up to (not including) the cursor. Clears the mark.
    pub(crate) fn capture(&mut self) -> &'a str {
        let start = self.mark.take().unwrap_or(self.pos);
        &self.text[start..self.pos]
    }
}
