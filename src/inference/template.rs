//! Command templates.
//!
//! A provider's command line is written as a template with a single variable,
//! `{{prompt}}`, which is replaced by the (prefixed) user prompt before the
//! result is split into argv tokens. Whitespace inside the braces is allowed:
//! `{{ prompt }}` works too.

use std::fmt;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";
const PROMPT_VAR: &str = "prompt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// A `{{` without a matching `}}`. Carries the byte offset of the `{{`.
    Unterminated(usize),
    /// A `{{name}}` where `name` is not a known variable.
    UnknownVariable(String),
    /// The template never references `{{prompt}}`, so the prompt would be dropped.
    MissingPrompt,
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateError::Unterminated(at) => {
                write!(f, "unterminated '{{{{' at byte {at} in command template")
            }
            TemplateError::UnknownVariable(name) => {
                write!(f, "unknown template variable '{name}' (only '{PROMPT_VAR}' is supported)")
            }
            TemplateError::MissingPrompt => {
                write!(f, "command template never references {{{{{PROMPT_VAR}}}}}")
            }
        }
    }
}

impl std::error::Error for TemplateError {}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Prompt,
}

/// A parsed command template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
    segments: Vec<Segment>,
}

impl CommandTemplate {
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut rest = source;
        let mut offset = 0;

        while let Some(open) = rest.find(OPEN) {
            if open > 0 {
                segments.push(Segment::Literal(rest[..open].to_string()));
            }
            let after_open = &rest[open + OPEN.len()..];
            let close = after_open
                .find(CLOSE)
                .ok_or(TemplateError::Unterminated(offset + open))?;

            let name = after_open[..close].trim();
            if name != PROMPT_VAR {
                return Err(TemplateError::UnknownVariable(name.to_string()));
            }
            segments.push(Segment::Prompt);

            let consumed = open + OPEN.len() + close + CLOSE.len();
            offset += consumed;
            rest = &rest[consumed..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }

        if !segments.contains(&Segment::Prompt) {
            return Err(TemplateError::MissingPrompt);
        }

        Ok(Self { segments })
    }

    /// Substitute the prompt into every `{{prompt}}` slot.
    pub fn render(&self, prompt: &str) -> String {
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Literal(text) => text.as_str(),
                Segment::Prompt => prompt,
            })
            .collect()
    }
}

/// Split a rendered command line into argv tokens on whitespace.
///
/// There is no quoting: a multi-word prompt becomes several arguments.
pub fn tokenize(command_line: &str) -> Vec<String> {
    command_line.split_whitespace().map(str::to_string).collect()
}
