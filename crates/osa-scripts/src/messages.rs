//! iMessage operations.
//!
//! Message history is read from the Messages database with `sqlite3`. The
//! query text is assembled here and passed to the shell as a single quoted
//! argument, so no temporary files are involved.

use osa_catalog::applescript::quoted;
use osa_catalog::{Category, InputShape, Operation, Producer};
use percent_encoding::utf8_percent_encode;
use serde::Deserialize;
use serde_json::json;

use crate::{URL_COMPONENT, non_blank};

const DEFAULT_HISTORY_LIMIT: u32 = 100;
const DEFAULT_SEARCH_LIMIT: u32 = 50;
const DEFAULT_DAYS_BACK: u32 = 30;

const fn default_history_limit() -> u32 {
    DEFAULT_HISTORY_LIMIT
}

const fn default_search_limit() -> u32 {
    DEFAULT_SEARCH_LIMIT
}

const fn default_days_back() -> u32 {
    DEFAULT_DAYS_BACK
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChatsInput {
    #[serde(default)]
    include_participant_details: bool,
}

#[derive(Debug, Deserialize)]
struct HistoryInput {
    #[serde(default = "default_history_limit")]
    limit: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchInput {
    search_text: String,
    #[serde(default)]
    sender: Option<String>,
    #[serde(default)]
    chat_id: Option<String>,
    #[serde(default = "default_search_limit")]
    limit: u32,
    #[serde(default = "default_days_back")]
    days_back: u32,
}

#[derive(Debug, Deserialize)]
struct ComposeInput {
    recipient: String,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    auto: bool,
}

pub(crate) fn category() -> Category {
    Category::new("messages", "iMessage operations")
        .with_operation(
            Operation::new(
                "list_chats",
                "List available iMessage and SMS chats",
                Producer::typed(list_chats),
            )
            .with_input(InputShape::object(
                json!({
                    "includeParticipantDetails": {
                        "type": "boolean",
                        "description": "Include detailed participant information",
                        "default": false
                    }
                }),
                &[],
            )),
        )
        .with_operation(
            Operation::new(
                "get_messages",
                "Get messages from the Messages app",
                Producer::typed(get_messages),
            )
            .with_input(InputShape::object(
                json!({
                    "limit": {
                        "type": "number",
                        "description": "Maximum number of messages to retrieve",
                        "default": DEFAULT_HISTORY_LIMIT
                    }
                }),
                &[],
            )),
        )
        .with_operation(
            Operation::new(
                "search_messages",
                "Search for messages containing specific text or from a specific sender",
                Producer::typed(search_messages),
            )
            .with_input(InputShape::object(
                json!({
                    "searchText": {
                        "type": "string",
                        "description": "Text to search for in messages",
                        "default": ""
                    },
                    "sender": {
                        "type": "string",
                        "description": "Search for messages from a specific sender (phone number or email)",
                        "default": ""
                    },
                    "chatId": {
                        "type": "string",
                        "description": "Limit search to a specific chat ID",
                        "default": ""
                    },
                    "limit": {
                        "type": "number",
                        "description": "Maximum number of messages to retrieve",
                        "default": DEFAULT_SEARCH_LIMIT
                    },
                    "daysBack": {
                        "type": "number",
                        "description": "Limit search to messages from the last N days",
                        "default": DEFAULT_DAYS_BACK
                    }
                }),
                &["searchText"],
            )),
        )
        .with_operation(
            Operation::new(
                "compose_message",
                "Open Messages app with a pre-filled message to a recipient or automatically send a message",
                Producer::typed(compose_message),
            )
            .with_input(InputShape::object(
                json!({
                    "recipient": {
                        "type": "string",
                        "description": "Phone number or email of the recipient"
                    },
                    "body": { "type": "string", "description": "Message body text", "default": "" },
                    "auto": {
                        "type": "boolean",
                        "description": "Automatically send the message without user confirmation",
                        "default": false
                    }
                }),
                &["recipient"],
            )),
        )
}

fn list_chats(input: ChatsInput) -> String {
    let participants = if input.include_participant_details {
        PARTICIPANT_DETAILS
    } else {
        ""
    };
    format!(
        r#"tell application "Messages"
  set chatList to {{}}
  repeat with aChat in chats
    set chatName to name of aChat
    if chatName is missing value then
      set chatName to ""
      try
        set theParticipants to participants of aChat
        if (count of theParticipants) is 1 then set chatName to name of item 1 of theParticipants
      end try
    end if
    set chatInfo to {{id:id of aChat, name:chatName, isGroupChat:(id of aChat contains "+")}}{participants}
    copy chatInfo to end of chatList
  end repeat
  return chatList
end tell"#
    )
}

const PARTICIPANT_DETAILS: &str = r"
    set participantList to {}
    repeat with aParticipant in participants of aChat
      set participantInfo to {id:id of aParticipant, handle:handle of aParticipant}
      try
        set participantInfo to participantInfo & {name:name of aParticipant}
      end try
      copy participantInfo to end of participantList
    end repeat
    set chatInfo to chatInfo & {participant:participantList}";

/// Doubles single quotes for use inside an SQL string literal.
fn sql_literal(text: &str) -> String {
    text.replace('\'', "''")
}

/// Columns and joins common to history and search queries.
const MESSAGE_SELECT: &str = "SELECT \
    datetime(message.date/1000000000 + strftime('%s', '2001-01-01'), 'unixepoch', 'localtime') AS message_date, \
    handle.id AS sender, \
    message.text AS message_text, \
    chat.display_name AS chat_name";

const MESSAGE_JOINS: &str = "FROM message \
    LEFT JOIN handle ON message.handle_id = handle.ROWID \
    LEFT JOIN chat_message_join ON message.ROWID = chat_message_join.message_id \
    LEFT JOIN chat ON chat_message_join.chat_id = chat.ROWID";

fn history_query(limit: u32) -> String {
    format!("{MESSAGE_SELECT} {MESSAGE_JOINS} ORDER BY message.date DESC LIMIT {limit};")
}

fn search_query(input: &SearchInput) -> String {
    let mut conditions = Vec::new();
    if !input.search_text.is_empty() {
        conditions.push(format!(
            "message.text LIKE '%{}%'",
            sql_literal(&input.search_text)
        ));
    }
    if let Some(sender) = input.sender.as_deref().filter(|s| !s.is_empty()) {
        conditions.push(format!("handle.id LIKE '%{}%'", sql_literal(sender)));
    }
    if let Some(chat_id) = input.chat_id.as_deref().filter(|c| !c.is_empty()) {
        conditions.push(format!(
            "chat.chat_identifier = '{}'",
            sql_literal(chat_id)
        ));
    }
    if input.days_back > 0 {
        conditions.push(format!(
            "message.date > (strftime('%s', 'now', '-{} days') - strftime('%s', '2001-01-01')) * 1000000000",
            input.days_back
        ));
    }
    let filter = if conditions.is_empty() {
        "1=1".to_owned()
    } else {
        conditions.join(" AND ")
    };

    format!(
        "{MESSAGE_SELECT}, chat.chat_identifier AS chat_id {MESSAGE_JOINS} \
         WHERE {filter} ORDER BY message.date DESC LIMIT {};",
        input.limit
    )
}

fn run_query(query: &str) -> String {
    format!(
        r#"set dbPath to (POSIX path of (path to home folder)) & "Library/Messages/chat.db"
try
  return do shell script "sqlite3 " & quoted form of dbPath & " " & quoted form of {}
on error errMsg
  return "Failed to query messages: " & errMsg
end try"#,
        quoted(query)
    )
}

fn get_messages(input: HistoryInput) -> String {
    run_query(&history_query(input.limit))
}

fn search_messages(input: SearchInput) -> String {
    run_query(&search_query(&input))
}

fn sms_url(recipient: &str, body: Option<&str>) -> String {
    match body {
        Some(text) => format!(
            "sms:{recipient}&body={}",
            utf8_percent_encode(text, URL_COMPONENT)
        ),
        None => format!("sms:{recipient}"),
    }
}

fn compose_message(input: ComposeInput) -> String {
    let body = non_blank(input.body);
    let recipient = quoted(&input.recipient);
    if input.auto {
        let text = quoted(body.as_deref().unwrap_or_default());
        format!(
            r#"tell application "Messages"
  set targetService to 1st service whose service type = iMessage
  set targetBuddy to buddy {recipient} of targetService
  send {text} to targetBuddy
  return "Message sent to " & {recipient}
end tell"#
        )
    } else {
        let url = quoted(&sms_url(&input.recipient, body.as_deref()));
        format!(
            r#"do shell script "open " & quoted form of {url}
return "Opening Messages app with recipient: " & {recipient}"#
        )
    }
}
