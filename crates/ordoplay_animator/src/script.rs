// SPDX-License-Identifier: MIT OR Apache-2.0
//! Storyboard script parsing.
//!
//! Scripts are plain text with one command per line:
//!
//! ```text
//! Scene: City park
//! Character: Alice enters from the left
//! Action: Alice waves
//! ```
//!
//! Keywords are case-insensitive. Lines that match no command are ignored.

use crate::error::Result;
use regex::Regex;

/// One parsed storyboard command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptCommand {
    /// A new scene begins
    Scene {
        /// Scene name
        name: String,
    },
    /// A character walks on
    Character {
        /// Character name
        name: String,
        /// Where the character enters from
        from: String,
    },
    /// Something happens
    Action {
        /// Free-form description
        description: String,
    },
}

impl ScriptCommand {
    /// Timeline label for this command
    pub fn label(&self) -> String {
        match self {
            Self::Scene { name } => format!("Scene: {name}"),
            Self::Character { name, from } => format!("{name} enters from {from}"),
            Self::Action { description } => description.clone(),
        }
    }
}

/// Compiled command patterns
#[derive(Debug, Clone)]
pub struct ScriptParser {
    scene: Regex,
    character: Regex,
    action: Regex,
}

impl ScriptParser {
    /// Compile the command patterns
    pub fn new() -> Result<Self> {
        Ok(Self {
            scene: Regex::new(r"(?i)^Scene:\s*(.+)")?,
            character: Regex::new(r"(?i)^Character:\s*(.+) enters from (.+)")?,
            action: Regex::new(r"(?i)^Action:\s*(.+)")?,
        })
    }

    /// Parse a single line
    pub fn parse_line(&self, line: &str) -> Option<ScriptCommand> {
        let capture = |re: &Regex, group: usize| {
            re.captures(line)
                .and_then(|caps| caps.get(group))
                .map(|m| m.as_str().trim().to_string())
        };

        if let Some(name) = capture(&self.scene, 1) {
            return Some(ScriptCommand::Scene { name });
        }
        if let Some(caps) = self.character.captures(line) {
            return Some(ScriptCommand::Character {
                name: caps[1].trim().to_string(),
                from: caps[2].trim().to_string(),
            });
        }
        capture(&self.action, 1).map(|description| ScriptCommand::Action { description })
    }

    /// Parse a whole script in line order
    pub fn parse(&self, script: &str) -> Vec<ScriptCommand> {
        let commands: Vec<_> = script.lines().filter_map(|l| self.parse_line(l)).collect();
        tracing::debug!("Parsed {} script command(s)", commands.len());
        commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_script() {
        let script = "Scene: City park\n\
                      Character: Alice enters from the left\n\
                      this line is ignored\n\
                      action:   Alice waves  \n";
        let commands = ScriptParser::new().unwrap().parse(script);
        assert_eq!(
            commands,
            [
                ScriptCommand::Scene {
                    name: "City park".to_string()
                },
                ScriptCommand::Character {
                    name: "Alice".to_string(),
                    from: "the left".to_string()
                },
                ScriptCommand::Action {
                    description: "Alice waves".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_character_needs_entrance() {
        let parser = ScriptParser::new().unwrap();
        assert_eq!(parser.parse_line("Character: Bob"), None);
        assert_eq!(parser.parse_line("  Scene: indented"), None);
        assert_eq!(
            parser.parse_line("CHARACTER: Bob ENTERS FROM stage right"),
            Some(ScriptCommand::Character {
                name: "Bob".to_string(),
                from: "stage right".to_string()
            })
        );
    }

    #[test]
    fn test_labels() {
        let command = ScriptCommand::Character {
            name: "Alice".to_string(),
            from: "the left".to_string(),
        };
        assert_eq!(command.label(), "Alice enters from the left");
    }
}
