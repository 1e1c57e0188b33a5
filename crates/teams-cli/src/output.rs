//! Result and error rendering
//!
//! Machine mode prints exactly one JSON line on stdout. Human mode prints a
//! short coloured summary per command.

use crate::commands::{CommandOutput, TeamChannels};
use crate::console::{RenderContext, Style};
use chrono::{DateTime, Local, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Value, json};
use teams_core::error::{TeamsError, TeamsResult};
use teams_core::types::{Channel, ConversationMessagesResponse, Team, TeamsExport};

/// Message bodies longer than this are clipped
pub const MESSAGE_CLIP_CHARS: usize = 240;
/// Notification previews longer than this are clipped
pub const PREVIEW_CLIP_CHARS: usize = 160;

const TAGLINE: &str = "teams cli - a small Teams helper for human + LLM workflows";
const RELOGIN_HINT: &str =
    "the stored session is no longer valid; run `teams login --ests-auth-persistent <cookie>`";

static LINE_BREAK_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<br\s*/?>").expect("valid line break regex"));
static ANY_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

pub fn print_result(
    context: &RenderContext,
    output: &CommandOutput,
    profile: &str,
) -> TeamsResult<()> {
    if context.machine {
        println!("{}", machine_line(output, profile)?);
    } else {
        for line in render_human(output) {
            println!("{}", line);
        }
    }
    Ok(())
}

pub fn print_error(context: &RenderContext, error: &TeamsError) {
    if context.machine {
        println!("{}", error_line(error));
        return;
    }

    eprintln!("{}: {}", Style::failure("error"), error);
    if error.requires_reauthentication() {
        eprintln!("{}: {}", Style::accent("hint"), RELOGIN_HINT);
    }
    eprintln!();
    eprintln!("{}", Style::bold(TAGLINE));
}

/// `{"command", "profile", "data"}` on one line
pub fn machine_line(output: &CommandOutput, profile: &str) -> TeamsResult<String> {
    let line = json!({
        "command": output.command_name(),
        "profile": profile,
        "data": output.data()?,
    });
    Ok(line.to_string())
}

/// `{"error": message}` on one line
pub fn error_line(error: &TeamsError) -> String {
    json!({ "error": error.to_string() }).to_string()
}

pub fn render_human(output: &CommandOutput) -> Vec<String> {
    match output {
        CommandOutput::Login(summary) => vec![
            Style::bold("Session credentials stored").to_string(),
            format!("  profile: {}", Style::accent(&summary.profile)),
            format!("  file: {}", Style::dim(&summary.profile_path)),
        ],
        CommandOutput::Me(me) => render_snapshot(me),
        CommandOutput::TeamsList(teams) => render_teams(teams),
        CommandOutput::Channels(channels) => render_channels(channels),
        CommandOutput::Notifications(feed) => render_notifications(feed),
        CommandOutput::Messages(conversation) => {
            let messages = to_values(&conversation.messages);
            render_messages("Conversation messages", &messages)
        }
        CommandOutput::ChannelMessages(posts) => {
            render_messages("Channel messages", &to_values(posts))
        }
    }
}

fn render_snapshot(me: &TeamsExport) -> Vec<String> {
    vec![
        Style::bold("Teams profile snapshot").to_string(),
        format!(
            "  {} {} / {} / {}",
            Style::accent("profile:"),
            Style::count(&format!("{} teams", me.teams.len())),
            Style::count(&format!("{} chats", me.chats.len())),
            Style::count(&format!("{} private feeds", me.private_feeds.len())),
        ),
    ]
}

fn render_teams(teams: &[Team]) -> Vec<String> {
    if teams.is_empty() {
        return vec![Style::dim("Teams: no items found").to_string()];
    }

    let mut lines = vec![Style::bold(&format!("Teams ({})", teams.len())).to_string()];
    lines.extend(teams.iter().enumerate().map(|(index, team)| {
        numbered_entry(index, or_placeholder(&team.display_name, "Unknown team"), &team.id)
    }));
    lines
}

fn render_channels(payload: &TeamChannels) -> Vec<String> {
    let label = format!("Channels ({})", payload.team_name);
    if payload.channels.is_empty() {
        return vec![Style::dim(&format!("{}: no items found", label)).to_string()];
    }

    let mut lines =
        vec![Style::bold(&format!("{} ({})", label, payload.channels.len())).to_string()];
    lines.extend(
        payload
            .channels
            .iter()
            .enumerate()
            .map(|(index, channel): (usize, &Channel)| {
                numbered_entry(
                    index,
                    or_placeholder(&channel.display_name, "Unknown channel"),
                    &channel.id,
                )
            }),
    );
    lines
}

fn numbered_entry(index: usize, name: &str, id: &str) -> String {
    format!(
        "  {:02}. {} ({})",
        index + 1,
        Style::accent(name),
        Style::dim(or_placeholder(id, "unknown"))
    )
}

fn render_notifications(feed: &ConversationMessagesResponse) -> Vec<String> {
    if feed.messages.is_empty() {
        return vec![Style::dim("Notifications: no items found").to_string()];
    }

    let mut lines =
        vec![Style::bold(&format!("Notifications ({})", feed.messages.len())).to_string()];
    for message in &feed.messages {
        let value = serde_json::to_value(message).unwrap_or(Value::Null);
        let id = pick_first_string(
            &value,
            &["id", "messageId", "messageID", "id1", "clientmessageid", "clientMessageId"],
        );
        let clump_id = pick_first_string(
            &value,
            &["clumpId", "clumpID", "conversationid", "conversationId"],
        );
        let preview = message
            .activity()
            .and_then(|activity| activity.message_preview.as_deref())
            .map(sanitize_message_body)
            .filter(|preview| !preview.is_empty())
            .unwrap_or_else(|| "no message preview".to_string());

        lines.push(format!(
            "{} {}",
            Style::dim(&format!("- msg: {}, notify:", clump_id)),
            Style::accent(or_placeholder(&id, "unknown-id"))
        ));
        lines.push(format!("    {}", Style::dim(&clip(&preview, PREVIEW_CLIP_CHARS))));
    }
    lines
}

fn render_messages(label: &str, messages: &[Value]) -> Vec<String> {
    if messages.is_empty() {
        return vec![Style::dim(&format!("{}: no items found", label)).to_string()];
    }

    let mut lines = vec![Style::bold(&format!("{} ({})", label, messages.len())).to_string()];
    for (index, message) in messages.iter().enumerate() {
        let sender = pick_first_string(
            message,
            &[
                "imdisplayname",
                "imDisplayName",
                "fromDisplayNameInToken",
                "fromDisplayName",
                "from",
            ],
        );
        let composed_at = pick_first_string(
            message,
            &[
                "composetime",
                "composeTime",
                "originalarrivaltime",
                "originalArrivalTime",
            ],
        );
        let body = sanitize_message_body(&pick_first_string(message, &["content", "text"]));
        let time = pretty_time(&composed_at).unwrap_or_else(|| "unknown time".to_string());

        lines.push(format!(
            "{} {} [{}]",
            Style::dim(&format!("{:02}.", index + 1)),
            or_placeholder(&sender, "Unknown"),
            time
        ));
        lines.push(format!("    {}", Style::dim(&clip(&body, MESSAGE_CLIP_CHARS))));
    }
    lines
}

fn to_values<T: serde::Serialize>(items: &[T]) -> Vec<Value> {
    items
        .iter()
        .map(|item| serde_json::to_value(item).unwrap_or(Value::Null))
        .collect()
}

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.trim().is_empty() {
        placeholder
    } else {
        value
    }
}

/// Turn `<br>` into line breaks, drop other tags, collapse whitespace
pub fn sanitize_message_body(input: &str) -> String {
    let with_breaks = LINE_BREAK_TAG.replace_all(input, "\n");
    let without_tags = ANY_TAG.replace_all(&with_breaks, " ");
    WHITESPACE
        .replace_all(&without_tags, " ")
        .trim()
        .to_string()
}

/// Cut to `max_chars` characters, ending in `...` when shortened
pub fn clip(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// Local time for an epoch-milliseconds or RFC 3339 timestamp
pub fn pretty_time(input: &str) -> Option<String> {
    parse_timestamp(input).map(|time| {
        time.with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
    })
}

fn parse_timestamp(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if let Ok(millis) = input.parse::<i64>() {
        return DateTime::from_timestamp_millis(millis);
    }
    DateTime::parse_from_rfc3339(input)
        .ok()
        .map(|time| time.with_timezone(&Utc))
}

/// First non-blank string among `keys`, trimmed; empty when none match
pub fn pick_first_string(value: &Value, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|candidate| !candidate.is_empty())
        .unwrap_or_default()
        .to_string()
}
