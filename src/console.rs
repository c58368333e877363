//! Line consumer for the demo console
//!
//! Stands in for the interpreter that would normally receive finished
//! lines. It understands a few built-in commands and answers everything
//! else by repeating it back.

/// What the run loop should do with a finished line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleAction {
    /// Print this text
    Reply(String),
    /// Switch echo on or off
    SetEcho(bool),
    /// Leave the console
    Exit,
    /// Nothing to do (blank line)
    Nothing,
}

const HELP: &str = "\
commands:
  echo on|off   switch character echo
  help          show this text
  exit, quit    leave the console
anything else is echoed back";

/// Built-in command handler
#[derive(Debug, Default)]
pub struct Console {
    lines_handled: u64,
}

impl Console {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of non-blank lines handled so far
    pub fn lines_handled(&self) -> u64 {
        self.lines_handled
    }

    pub fn handle(&mut self, line: &str) -> ConsoleAction {
        let line = line.trim();
        if line.is_empty() {
            return ConsoleAction::Nothing;
        }
        self.lines_handled += 1;

        let mut words = line.split_whitespace();
        match (words.next(), words.next(), words.next()) {
            (Some("echo"), Some("on"), None) => ConsoleAction::SetEcho(true),
            (Some("echo"), Some("off"), None) => ConsoleAction::SetEcho(false),
            (Some("help"), None, None) => ConsoleAction::Reply(HELP.to_string()),
            (Some("exit" | "quit"), None, None) => ConsoleAction::Exit,
            _ => ConsoleAction::Reply(format!("=> {}", line)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins() {
        let mut console = Console::new();
        assert_eq!(console.handle("echo off"), ConsoleAction::SetEcho(false));
        assert_eq!(console.handle("  echo   on "), ConsoleAction::SetEcho(true));
        assert_eq!(console.handle("quit"), ConsoleAction::Exit);
        assert!(matches!(console.handle("help"), ConsoleAction::Reply(_)));
        assert_eq!(console.lines_handled(), 4);
    }

    #[test]
    fn test_other_lines_are_repeated() {
        let mut console = Console::new();
        assert_eq!(
            console.handle("print(1+1)"),
            ConsoleAction::Reply("=> print(1+1)".to_string())
        );
        assert_eq!(
            console.handle("echo hello"),
            ConsoleAction::Reply("=> echo hello".to_string())
        );
    }

    #[test]
    fn test_blank_line() {
        let mut console = Console::new();
        assert_eq!(console.handle("   "), ConsoleAction::Nothing);
        assert_eq!(console.lines_handled(), 0);
    }
}
