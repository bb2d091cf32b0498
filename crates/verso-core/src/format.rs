//! Migration file text format
//!
//! A migration file holds two labelled blocks. Each block starts at a marker
//! line (`--up` or `--down`) and runs until the next marker or end of file:
//!
//! ```text
//! --up
//! CREATE TABLE users (id INTEGER PRIMARY KEY);
//!
//! --down
//! DROP TABLE users;
//! ```
//!
//! Markers are SQL comments, so the file stays valid SQL. Text before the first
//! marker is ignored.

use std::fmt::Write as _;

/// One labelled block of a migration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Block {
    /// Forward statements
    Up,
    /// Reverting statements
    Down,
}

impl Block {
    /// Blocks in the order they are written.
    pub const ALL: [Block; 2] = [Block::Up, Block::Down];

    /// Marker line that opens the block.
    pub fn marker(self) -> &'static str {
        match self {
            Block::Up => "--up",
            Block::Down => "--down",
        }
    }

    fn from_marker(line: &str) -> Option<Block> {
        let line = line.trim();
        Block::ALL.into_iter().find(|b| b.marker() == line)
    }
}

/// Decoded contents of a migration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationBody {
    /// Statements of the `--up` block
    pub up: String,
    /// Statements of the `--down` block
    pub down: String,
}

impl MigrationBody {
    /// Create a body from its two blocks.
    pub fn new(up: impl Into<String>, down: impl Into<String>) -> Self {
        Self {
            up: up.into(),
            down: down.into(),
        }
    }

    /// Text of the given block.
    pub fn block(&self, block: Block) -> &str {
        match block {
            Block::Up => &self.up,
            Block::Down => &self.down,
        }
    }

    fn block_mut(&mut self, block: Block) -> &mut String {
        match block {
            Block::Up => &mut self.up,
            Block::Down => &mut self.down,
        }
    }
}

/// Decode migration file text into its blocks.
///
/// Lines are kept as written and joined with `\n`; surrounding whitespace of
/// each block is trimmed. A repeated marker appends to the same block. Missing
/// blocks decode as empty strings and are reported later by validation.
pub fn decode(text: &str) -> MigrationBody {
    let mut lines: [Vec<&str>; 2] = [Vec::new(), Vec::new()];
    let mut current: Option<Block> = None;

    for line in text.lines() {
        if let Some(block) = Block::from_marker(line) {
            current = Some(block);
            continue;
        }
        if let Some(block) = current {
            lines[block as usize].push(line);
        }
    }

    let mut body = MigrationBody::default();
    for block in Block::ALL {
        *body.block_mut(block) = lines[block as usize].join("\n").trim().to_string();
    }
    body
}

/// Encode a migration body as file text.
pub fn encode(body: &MigrationBody) -> String {
    let mut out = String::new();
    for (i, block) in Block::ALL.into_iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        // Writing to a String cannot fail
        let _ = writeln!(out, "{}", block.marker());
        let _ = writeln!(out, "{}", body.block(block).trim());
    }
    out
}

#[cfg(test)]
#[path = "format_test.rs"]
mod tests;
