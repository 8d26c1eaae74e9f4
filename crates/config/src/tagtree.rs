//! The tag-tree document parser.
//!
//! Documents are ASCII trees of named tags (`<aether><usb><detection>on
//! </detection></usb></aether>`). A small in-house tokenizer turns the text
//! into open/close/text events; the parser walks the events, matches nested
//! tag paths against the schema, and copies matched values into the setting
//! buffers. Structural problems become parsing error codes; they never stop
//! the walk, so one pass reports everything it can find.

use aether_protocol::{ErrorCode, ParsingKind};

use crate::errors::ErrorRing;
use crate::schema::MAX_SCHEMA_SETTINGS;
use crate::setting::Setting;
use crate::tagpath::MAX_TAG_DEPTH;
use crate::value::MAX_VALUE_LEN;

/// A 1-based line/column position inside the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub line: u32,
    pub column: u32,
}

impl Cursor {
    /// The position of the first character.
    pub const START: Cursor = Cursor { line: 1, column: 1 };

    /// Advances past one byte. Newlines start the next line, carriage
    /// returns are skipped, everything else moves one column.
    fn advance(&mut self, byte: u8) {
        match byte {
            b'\n' => {
                self.line += 1;
                self.column = 1;
            }
            b'\r' => {}
            _ => self.column += 1,
        }
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Cursor::START
    }
}

/// One tokenizer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Event<'a> {
    /// An opening construct `<name>`.
    Open { name: &'a str },
    /// A closing construct `</name>`; the name is not matched against the
    /// opening tag, imbalances surface at end of input.
    Close,
    /// Character data between constructs, with the position of its first
    /// byte. Whitespace is significant and reported as-is.
    Text { content: &'a str, at: Cursor },
}

/// Splits a document into [`Event`]s while tracking the cursor.
struct Tokenizer<'a> {
    bytes: &'a [u8],
    index: usize,
    cursor: Cursor,
}

impl<'a> Tokenizer<'a> {
    fn new(document: &'a str) -> Self {
        Tokenizer {
            bytes: document.as_bytes(),
            index: 0,
            cursor: Cursor::START,
        }
    }

    /// The cursor after the most recent event; once the iterator is
    /// exhausted this is the end-of-input position.
    fn position(&self) -> Cursor {
        self.cursor
    }

    fn bump(&mut self) -> Option<u8> {
        let byte = *self.bytes.get(self.index)?;
        self.index += 1;
        self.cursor.advance(byte);
        Some(byte)
    }

    /// Consumes up to and including `stop`; returns the slice before it, or
    /// `None` when the input ends first (the partial token is dropped).
    fn take_until(&mut self, stop: u8) -> Option<&'a str> {
        let bytes = self.bytes;
        let start = self.index;
        loop {
            let byte = self.bump()?;
            if byte == stop {
                // Tag names and content are ASCII, so the slice is valid.
                return std::str::from_utf8(&bytes[start..self.index - 1]).ok();
            }
        }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Event<'a>> {
        loop {
            let at = self.cursor;
            match *self.bytes.get(self.index)? {
                b'<' => {
                    self.bump();
                    if self.bytes.get(self.index) == Some(&b'/') {
                        self.take_until(b'>')?;
                        return Some(Event::Close);
                    }
                    let name = self.take_until(b'>')?;
                    return Some(Event::Open { name });
                }
                _ => {
                    let bytes = self.bytes;
                    let start = self.index;
                    while self.bytes.get(self.index).is_some_and(|byte| *byte != b'<') {
                        self.bump();
                    }
                    let content = std::str::from_utf8(&bytes[start..self.index]).ok()?;
                    if !content.is_empty() {
                        return Some(Event::Text { content, at });
                    }
                }
            }
        }
    }
}

/// Walks a document and fills the value buffers of matching settings.
///
/// Matching keeps a per-setting level counter: a setting's counter advances
/// only when its tag at the current depth matches the opened tag, so a full
/// path must be opened in order for a value to land in its buffer. When
/// several settings match at one depth the later schema entry wins the
/// selection.
#[derive(Debug)]
pub struct TagTreeParser {
    levels: [i8; MAX_SCHEMA_SETTINGS],
    selected: Option<usize>,
    depth: i32,
    saw_any_tag: bool,
    errors: ErrorRing<MAX_SCHEMA_SETTINGS>,
}

impl TagTreeParser {
    /// Creates a parser with no recorded state.
    pub fn new() -> Self {
        TagTreeParser {
            levels: [0; MAX_SCHEMA_SETTINGS],
            selected: None,
            depth: 0,
            saw_any_tag: false,
            errors: ErrorRing::new(),
        }
    }

    /// Parses `document` against `settings`, buffering matched values and
    /// recording parsing errors.
    pub fn parse(&mut self, document: &str, settings: &mut [Setting]) {
        debug_assert!(settings.len() <= MAX_SCHEMA_SETTINGS);

        self.levels = [0; MAX_SCHEMA_SETTINGS];
        self.selected = None;
        self.depth = 0;
        self.saw_any_tag = false;
        self.errors.clear();

        if document.is_empty() {
            self.errors.push(
                ErrorCode::parsing(ParsingKind::EmptyConfig)
                    .with_position(Cursor::START.column, Cursor::START.line),
            );
            return;
        }

        let mut tokenizer = Tokenizer::new(document);
        while let Some(event) = tokenizer.next() {
            match event {
                Event::Open { name } => self.handle_open(name, settings),
                Event::Close => self.depth -= 1,
                Event::Text { content, at } => self.handle_text(content, at, settings),
            }
        }

        self.finish(tokenizer.position());
    }

    /// Whether the walk recorded any parsing error.
    pub fn has_errors(&self) -> bool {
        self.errors.any()
    }

    /// The recorded parsing errors, oldest first.
    pub fn errors(&self) -> &ErrorRing<MAX_SCHEMA_SETTINGS> {
        &self.errors
    }

    fn handle_open(&mut self, name: &str, settings: &[Setting]) {
        if self.depth < MAX_TAG_DEPTH as i32 {
            let depth = self.depth as usize;
            for (index, setting) in settings.iter().enumerate() {
                if i32::from(self.levels[index]) == self.depth && setting.tag(depth) == name {
                    self.levels[index] = (self.depth + 1) as i8;
                    self.selected = Some(index);
                }
            }
        }
        self.depth += 1;
        self.saw_any_tag = true;
    }

    fn handle_text(&mut self, content: &str, at: Cursor, settings: &mut [Setting]) {
        let Some(index) = self.selected else { return };
        if i32::from(self.levels[index]) != self.depth {
            return;
        }
        let leaf_reached = self.depth == MAX_TAG_DEPTH as i32
            || settings[index].tags().is_empty_at(self.depth as usize);
        if !leaf_reached {
            return;
        }

        if content.len() > MAX_VALUE_LEN {
            self.errors.push(
                ErrorCode::parsing(ParsingKind::ExceedsMaxValueLength)
                    .with_position(at.column, at.line),
            );
        }
        settings[index].set_value(content.as_bytes());
        // Matching restarts from the root if the same path reopens later.
        self.levels[index] = 0;
    }

    fn finish(&mut self, end: Cursor) {
        if self.depth > 0 {
            self.errors.push(
                ErrorCode::parsing(ParsingKind::MissingClosingTag).with_data(self.depth as u32),
            );
        } else if self.depth < 0 {
            self.errors.push(
                ErrorCode::parsing(ParsingKind::MissingOpeningTag).with_data(-self.depth as u32),
            );
        }
        if !self.saw_any_tag {
            self.errors.push(
                ErrorCode::parsing(ParsingKind::NoTagsFound).with_position(end.column, end.line),
            );
        }
    }
}

impl Default for TagTreeParser {
    fn default() -> Self {
        Self::new()
    }
}
