//! Prompt assembly: message + instruction template + user command.
//!
//! The assembled document always has the same ordered sections:
//! 1. Role framing (who the assistant is, who wrote the incoming email)
//! 2. The instruction template selected by intent
//! 3. The email itself, fenced off from the instructions
//! 4. The user's literal command
//! 5. Output rules for any drafted reply

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::PromptError;
use crate::pipeline::intent::{Intent, classify};
use crate::store::{MessageRepository, TemplateRepository};

/// Everything the renderer needs, gathered up front.
#[derive(Debug, Clone)]
pub struct PromptContext<'a> {
    pub identity: &'a str,
    pub sender: &'a str,
    pub subject: &'a str,
    pub body: &'a str,
    pub template: &'a str,
    pub instruction: &'a str,
}

/// A prompt ready to hand to the language model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssembledPrompt {
    pub message_id: i64,
    pub intent: Intent,
    pub text: String,
}

/// Render a prompt from its context. Pure and deterministic.
pub fn render_prompt(ctx: &PromptContext<'_>) -> String {
    let PromptContext {
        identity,
        sender,
        subject,
        body,
        template,
        instruction,
    } = ctx;

    format!(
        "\
--- ROLE ---
You are {identity}, an email assistant working on behalf of the inbox owner.
You are processing an email sent by {sender}. {sender} wrote the incoming email; \
you are writing the response as {identity}.

--- AGENT INSTRUCTION ---
{template}

--- EMAIL CONTEXT ---
Sender: {sender}
Subject: {subject}
Content:
\"\"\"
{body}
\"\"\"

--- USER COMMAND ---
User is asking to: \"{instruction}\"

--- OUTPUT RULES ---
- Address any drafted reply to {sender}.
- Sign any drafted reply as {identity}.
- Never use a placeholder name such as [Your Name].
- Never sign a reply as {sender}.

Generate the required output now."
    )
}

/// Coerce a requested message id to an integer.
///
/// Leading whitespace and an optional sign are accepted, then the longest
/// run of decimal digits; anything after it is ignored ("12abc" is 12).
pub fn parse_message_id(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }
    let value: i64 = rest[..digits_len].parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Build the full prompt for one message and one user instruction.
pub fn assemble(
    messages: &dyn MessageRepository,
    templates: &dyn TemplateRepository,
    message_id: &str,
    instruction: &str,
    identity: &str,
) -> Result<AssembledPrompt, PromptError> {
    let not_found = || PromptError::NotFound {
        id: message_id.to_string(),
    };

    let id = parse_message_id(message_id).ok_or_else(not_found)?;
    let Some(message) = messages.get_message(id) else {
        warn!(message_id = %message_id, "Email not found for prompt assembly");
        return Err(not_found());
    };

    let intent = classify(instruction);
    let template = templates
        .template(intent)
        .ok_or(PromptError::TemplateMissing { intent })?;

    let text = render_prompt(&PromptContext {
        identity,
        sender: &message.sender,
        subject: &message.subject,
        body: &message.body,
        template,
        instruction,
    });

    debug!(message_id = id, intent = %intent, len = text.len(), "Prompt assembled");

    Ok(AssembledPrompt {
        message_id: id,
        intent,
        text,
    })
}
