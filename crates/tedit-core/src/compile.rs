//! Compiled command lists and the compiler seam
//!
//! A compiled body is an ordered list of statements shared by a prototype
//! and every live instance of it. Committing a new definition swaps in a
//! new body rather than mutating the old one, so an instance either holds
//! the old `Arc` or the new one and never a mix.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Line terminator used when rendering a body back to text
pub const LINE_END: &str = "\r\n";

/// One executable statement
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Command(pub String);

impl Command {
    pub fn new(line: impl Into<String>) -> Self {
        Self(line.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// An immutable, shareable command list
#[derive(Debug, Clone, Default)]
pub struct CompiledBody(Arc<Vec<Command>>);

impl CompiledBody {
    /// The zeroed body a fresh prototype starts with
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_commands(commands: Vec<Command>) -> Self {
        Self(Arc::new(commands))
    }

    pub fn commands(&self) -> &[Command] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Command> {
        self.0.get(index)
    }

    /// Whether both handles point at the same compiled list
    pub fn same_as(&self, other: &CompiledBody) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Render to editable text: one statement per line, each terminated
    pub fn to_text(&self) -> String {
        self.0.iter().fold(String::new(), |mut text, cmd| {
            text.push_str(cmd.as_str());
            text.push_str(LINE_END);
            text
        })
    }
}

impl PartialEq for CompiledBody {
    fn eq(&self, other: &Self) -> bool {
        self.commands() == other.commands()
    }
}

impl Eq for CompiledBody {}

/// Turns authored text into an executable body.
///
/// Must be total: malformed text compiles to whatever statements can be
/// recovered, in the worst case an empty body.
pub trait Compiler {
    fn compile(&self, text: &str) -> CompiledBody;
}

/// Default compiler: one statement per non-blank line, leading
/// indentation and trailing whitespace stripped.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineCompiler;

impl Compiler for LineCompiler {
    fn compile(&self, text: &str) -> CompiledBody {
        let commands = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(Command::new)
            .collect();
        CompiledBody::from_commands(commands)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_line_compiler() {
        let body = LineCompiler.compile("  say hi\r\n\r\nwait 5\n   \nemote waves  ");
        assert_eq!(body.len(), 3);
        assert_eq!(body.get(0).map(Command::as_str), Some("say hi"));
        assert_eq!(body.get(1).map(Command::as_str), Some("wait 5"));
        assert_eq!(body.get(2).map(Command::as_str), Some("emote waves"));
    }

    #[test]
    fn test_to_text() {
        let body = CompiledBody::from_commands(vec![Command::new("say a"), Command::new("say b")]);
        assert_eq!(body.to_text(), "say a\r\nsay b\r\n");
        assert_eq!(CompiledBody::empty().to_text(), "");
    }

    #[test]
    fn test_same_as_is_identity() {
        let a = LineCompiler.compile("say hi");
        let b = LineCompiler.compile("say hi");
        assert_eq!(a, b);
        assert!(!a.same_as(&b));
        assert!(a.same_as(&a.clone()));
    }

    proptest! {
        #[test]
        fn text_round_trip_recompiles_identically(text in "[ a-z%0-9\\r\\n\\t]{0,200}") {
            let body = LineCompiler.compile(&text);
            let again = LineCompiler.compile(&body.to_text());
            prop_assert_eq!(body, again);
        }
    }
}
