//! Dot and colon commands embedded in topic text.
//!
//! A command line either starts with `.` followed by a command name and an
//! optional space-separated parameter (`.topic Getting Started`), or with the
//! database's control character followed by a single-letter code and the
//! parameter (`:nGetting Started`). Command lines are consumed while a topic
//! is decoded and do not appear among its lines.

use log::{trace, warn};

use crate::helpdb::types::topic::{Snippet, Topic};
use crate::helpdb::types::uri::HelpUri;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HelpCommand {
    Category,
    Command,
    Comment,
    Context,
    End,
    Execute,
    Freeze,
    Length,
    List,
    Mark,
    Next,
    Paste,
    Popup,
    Previous,
    Raw,
    Ref,
    Source,
    Topic,
}

/// Dot spelling and colon letter of every command.
const COMMANDS: &[(HelpCommand, &str, Option<char>)] = &[
    (HelpCommand::Category, "category", Some('c')),
    (HelpCommand::Command, "command", Some('x')),
    (HelpCommand::Comment, "comment", None),
    (HelpCommand::Comment, ".", None),
    (HelpCommand::Context, "context", None),
    (HelpCommand::End, "end", Some('e')),
    (HelpCommand::Execute, "execute", Some('y')),
    (HelpCommand::Freeze, "freeze", Some('z')),
    (HelpCommand::Length, "length", Some('l')),
    (HelpCommand::List, "list", Some('i')),
    (HelpCommand::Mark, "mark", Some('m')),
    (HelpCommand::Next, "next", Some('>')),
    (HelpCommand::Paste, "paste", Some('p')),
    (HelpCommand::Popup, "popup", Some('g')),
    (HelpCommand::Previous, "previous", Some('<')),
    (HelpCommand::Raw, "raw", Some('u')),
    (HelpCommand::Ref, "ref", Some('r')),
    (HelpCommand::Source, "source", None),
    (HelpCommand::Topic, "topic", Some('n')),
];

impl HelpCommand {
    pub fn from_dot_name(name: &str) -> Option<Self> {
        COMMANDS
            .iter()
            .find(|(_, dot, _)| *dot == name)
            .map(|&(cmd, _, _)| cmd)
    }

    pub fn from_colon_letter(letter: char) -> Option<Self> {
        COMMANDS
            .iter()
            .find(|(_, _, colon)| *colon == Some(letter))
            .map(|&(cmd, _, _)| cmd)
    }

    /// The single-letter code, or `None` for commands that only exist in
    /// help source files.
    pub fn colon_letter(self) -> Option<char> {
        COMMANDS
            .iter()
            .find(|(cmd, _, _)| *cmd == self)
            .and_then(|&(_, _, colon)| colon)
    }

    pub fn dot_name(self) -> &'static str {
        COMMANDS
            .iter()
            .find(|(cmd, _, _)| *cmd == self)
            .map_or("", |&(_, dot, _)| dot)
    }
}

/// Splits a line into a command and its parameter, if it is one.
pub fn parse_command(line: &str, control_character: char) -> Option<(HelpCommand, &str)> {
    let mut chars = line.chars();
    let first = chars.next()?;
    let second = chars.next()?;

    if first == '.' {
        let body = &line[1..];
        let (name, parameter) = body.split_once(' ').unwrap_or((body, ""));
        HelpCommand::from_dot_name(name).map(|cmd| (cmd, parameter))
    } else if first == control_character {
        let rest = &line[first.len_utf8() + second.len_utf8()..];
        HelpCommand::from_colon_letter(second).map(|cmd| (cmd, rest))
    } else {
        None
    }
}

/// Applies `line` to `topic` if it is a command.
///
/// Returns `false` if the line is not a command, or if its parameter is
/// invalid; such lines are kept as text.
pub fn process_command(line: &str, control_character: char, topic: &mut Topic) -> bool {
    match parse_command(line, control_character) {
        Some((command, parameter)) => apply(command, parameter, topic),
        None => false,
    }
}

fn apply(command: HelpCommand, parameter: &str, topic: &mut Topic) -> bool {
    trace!("Command {:?} '{}'", command, parameter);
    match command {
        HelpCommand::Category => topic.category = Some(parameter.to_string()),
        HelpCommand::Command => topic.hidden = true,
        HelpCommand::End => {
            let end = topic.lines.len();
            if let Some(snippet) = topic.snippets.last_mut() {
                snippet.end_line = end;
            }
        }
        HelpCommand::Execute => topic.execute_command = Some(parameter.to_string()),
        HelpCommand::Freeze => match parameter.trim().parse::<i32>() {
            Ok(n) => topic.freeze_height = Some(n),
            Err(_) => return false,
        },
        HelpCommand::Length => match parameter.trim().parse::<i32>() {
            Ok(n) => topic.window_height = Some(n),
            Err(_) => return false,
        },
        HelpCommand::List => topic.list = true,
        HelpCommand::Mark => {
            warn!(
                "Ignoring mark command at line {} of topic '{}': {}",
                topic.lines.len(),
                topic,
                parameter
            );
        }
        HelpCommand::Next => topic.successor = Some(HelpUri::new(parameter)),
        HelpCommand::Paste => {
            let line = topic.lines.len();
            topic.snippets.push(Snippet {
                name: parameter.to_string(),
                start_line: line,
                end_line: line,
            });
        }
        HelpCommand::Popup => topic.popup = true,
        HelpCommand::Previous => topic.predecessor = Some(HelpUri::new(parameter)),
        HelpCommand::Raw => topic.raw = true,
        HelpCommand::Ref => {
            topic.references.extend(
                parameter
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string),
            );
        }
        HelpCommand::Topic => topic.title = Some(parameter.to_string()),
        HelpCommand::Comment | HelpCommand::Context | HelpCommand::Source => {}
    }
    true
}
