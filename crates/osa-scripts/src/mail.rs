//! Mail operations.
//!
//! The two listing operations share AppleScript handlers for locating a
//! mailbox and describing a message, appended after the script body.

use osa_catalog::applescript::{boolean, quoted};
use osa_catalog::{Category, InputShape, Operation, Producer};
use percent_encoding::utf8_percent_encode;
use serde::Deserialize;
use serde_json::json;

use crate::{URL_COMPONENT, non_blank};

const DEFAULT_MAILBOX: &str = "Inbox";
const DEFAULT_COUNT: u32 = 10;

#[derive(Debug, Deserialize)]
struct ComposeInput {
    recipient: String,
    subject: String,
    body: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListInput {
    #[serde(default)]
    mailbox: Option<String>,
    #[serde(default)]
    account: Option<String>,
    #[serde(default)]
    count: Option<u32>,
    #[serde(default)]
    unread_only: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchInput {
    #[serde(default)]
    mailbox: Option<String>,
    #[serde(default)]
    account: Option<String>,
    #[serde(default)]
    subject: Option<String>,
    #[serde(default)]
    sender: Option<String>,
    #[serde(default)]
    date_received: Option<String>,
    #[serde(default)]
    unread_only: bool,
    #[serde(default)]
    include_body: bool,
}

pub(crate) fn category() -> Category {
    Category::new("mail", "Mail operations")
        .with_operation(
            Operation::new(
                "create_email",
                "Create a new email in Mail.app",
                Producer::typed(create_email),
            )
            .with_input(InputShape::object(
                json!({
                    "recipient": { "type": "string", "description": "Email recipient" },
                    "subject": { "type": "string", "description": "Email subject" },
                    "body": { "type": "string", "description": "Email body" }
                }),
                &["recipient", "subject", "body"],
            )),
        )
        .with_operation(
            Operation::new(
                "list_emails",
                "List emails from a specified mailbox in Mail.app",
                Producer::typed(list_emails),
            )
            .with_input(InputShape::object(
                json!({
                    "mailbox": mailbox_property("list emails from"),
                    "account": account_property(),
                    "count": {
                        "type": "number",
                        "description": "Maximum number of emails to retrieve",
                        "default": DEFAULT_COUNT
                    },
                    "unreadOnly": {
                        "type": "boolean",
                        "description": "Only show unread emails if true"
                    }
                }),
                &[],
            )),
        )
        .with_operation(
            Operation::new(
                "get_email",
                "Get a specific email by search criteria from Mail.app",
                Producer::typed(get_email),
            )
            .with_input(InputShape::object(
                json!({
                    "mailbox": mailbox_property("search in"),
                    "account": account_property(),
                    "subject": {
                        "type": "string",
                        "description": "Subject text to search for (partial match)"
                    },
                    "sender": {
                        "type": "string",
                        "description": "Sender email or name to search for (partial match)"
                    },
                    "dateReceived": {
                        "type": "string",
                        "description": "Date received to search for (format: YYYY-MM-DD)"
                    },
                    "unreadOnly": {
                        "type": "boolean",
                        "description": "Only search unread emails if true"
                    },
                    "includeBody": {
                        "type": "boolean",
                        "description": "Include email body in the result if true",
                        "default": false
                    }
                }),
                &[],
            )),
        )
}

fn mailbox_property(purpose: &str) -> serde_json::Value {
    json!({
        "type": "string",
        "description": format!("Name of the mailbox to {purpose} (e.g., 'Inbox', 'Sent')"),
        "default": DEFAULT_MAILBOX
    })
}

fn account_property() -> serde_json::Value {
    json!({
        "type": "string",
        "description": "Name of the account to search in (e.g., 'iCloud', 'Gmail', 'Exchange'). \
            If not specified, searches all accounts with preference for iCloud."
    })
}

fn mailto_url(recipient: &str, subject: &str, body: &str) -> String {
    format!(
        "mailto:{recipient}?subject={}&body={}",
        utf8_percent_encode(subject, URL_COMPONENT),
        utf8_percent_encode(body, URL_COMPONENT)
    )
}

fn create_email(input: ComposeInput) -> String {
    let url = mailto_url(&input.recipient, &input.subject, &input.body);
    format!(
        r#"tell application "Mail"
  mailto {}
  activate
end tell"#,
        quoted(&url)
    )
}

/// Opening statements shared by both listing scripts.
fn preamble(mailbox: Option<String>, account: Option<String>, unread_only: bool) -> String {
    let mailbox = non_blank(mailbox).unwrap_or_else(|| DEFAULT_MAILBOX.to_owned());
    let account = non_blank(account).unwrap_or_default();
    format!(
        r#"set mailboxName to {}
set accountName to {}
set showUnreadOnly to {}
set targetAccount to missing value
if accountName is not "" then set targetAccount to my findAccount(accountName)
set targetMailbox to my findMailbox(mailboxName, targetAccount)"#,
        quoted(&mailbox),
        quoted(&account),
        boolean(unread_only)
    )
}

fn list_emails(input: ListInput) -> String {
    let count = input
        .count
        .filter(|count| *count > 0)
        .unwrap_or(DEFAULT_COUNT);
    format!(
        r#"{preamble}
set messageCount to {count}
set accountInfo to ""
if targetAccount is not missing value then
  set accountInfo to " (" & accountName & ")"
  if targetMailbox is missing value then
    try
      tell application "Mail" to set targetMailbox to inbox of targetAccount
    end try
  end if
end if
if targetMailbox is missing value then
  set emailMessages to my sortMessagesByDate(my allInboxMessages(showUnreadOnly))
  set mailboxName to "All Inboxes"
  set accountInfo to ""
else
  set emailMessages to my messagesOf(targetMailbox, showUnreadOnly)
end if
if (count of emailMessages) > messageCount then
  set emailMessages to items 1 thru messageCount of emailMessages
end if
set emailList to "Recent emails in " & mailboxName & accountInfo & ":" & return & return
if (count of emailMessages) is 0 then
  set emailList to emailList & "No messages found."
else
  repeat with theMessage in emailMessages
    set emailList to emailList & my describeMessage(theMessage, false) & return
  end repeat
end if
return emailList
{LOCATE_HANDLERS}
{DESCRIBE_HANDLER}
{SORT_HANDLER}"#,
        preamble = preamble(input.mailbox, input.account, input.unread_only),
    )
}

fn get_email(input: SearchInput) -> String {
    let criterion = |value: Option<String>| quoted(&non_blank(value).unwrap_or_default());
    format!(
        r#"{preamble}
set searchSubject to {subject}
set searchSender to {sender}
set searchDate to {date}
set includeBody to {include_body}
set emailMessages to {{}}
if targetMailbox is not missing value then
  set emailMessages to my messagesOf(targetMailbox, showUnreadOnly)
end if
set filteredMessages to {{}}
tell application "Mail"
  repeat with theMessage in emailMessages
    try
      set matches to true
      if searchSubject is not "" and (subject of theMessage) does not contain searchSubject then set matches to false
      if searchSender is not "" and (sender of theMessage) does not contain searchSender then set matches to false
      if matches and searchDate is not "" then
        set msgDate to date received of theMessage
        set msgDay to (year of msgDate as string) & "-" & my padNumber(month of msgDate as integer) & "-" & my padNumber(day of msgDate as integer)
        if msgDay is not searchDate then set matches to false
      end if
      if matches then set end of filteredMessages to contents of theMessage
    end try
  end repeat
end tell
set emailList to "Search results:" & return & return
if (count of filteredMessages) is 0 then
  set emailList to emailList & "No matching emails found."
else
  repeat with theMessage in filteredMessages
    set emailList to emailList & my describeMessage(theMessage, includeBody) & return
  end repeat
end if
return emailList
{LOCATE_HANDLERS}
{DESCRIBE_HANDLER}
{PAD_HANDLER}"#,
        preamble = preamble(input.mailbox, input.account, input.unread_only),
        subject = criterion(input.subject),
        sender = criterion(input.sender),
        date = criterion(input.date_received),
        include_body = boolean(input.include_body),
    )
}

const LOCATE_HANDLERS: &str = r#"
on messagesOf(theMailbox, showUnreadOnly)
  tell application "Mail"
    if showUnreadOnly then return (messages of theMailbox whose read status is false)
    return messages of theMailbox
  end tell
end messagesOf

on findAccount(accountName)
  tell application "Mail"
    repeat with acct in every account
      if name of acct is accountName then return contents of acct
    end repeat
  end tell
  return missing value
end findAccount

on findMailbox(mailboxName, targetAccount)
  tell application "Mail"
    try
      if targetAccount is not missing value then
        repeat with m in every mailbox of targetAccount
          if name of m is mailboxName then return contents of m
        end repeat
        return missing value
      end if
      repeat with m in every mailbox
        if name of m is mailboxName then return contents of m
      end repeat
      set iCloudAccount to my findAccount("iCloud")
      if iCloudAccount is not missing value then
        repeat with m in every mailbox of iCloudAccount
          if name of m is mailboxName then return contents of m
        end repeat
      end if
      repeat with acct in every account
        repeat with m in every mailbox of acct
          if name of m is mailboxName then return contents of m
        end repeat
      end repeat
    end try
  end tell
  return missing value
end findMailbox

on allInboxMessages(showUnreadOnly)
  set collected to {}
  set iCloudAccount to my findAccount("iCloud")
  if iCloudAccount is not missing value then
    try
      tell application "Mail" to set iCloudInbox to inbox of iCloudAccount
      return my messagesOf(iCloudInbox, showUnreadOnly)
    end try
  end if
  tell application "Mail" to set allAccounts to every account
  repeat with acct in allAccounts
    try
      tell application "Mail" to set acctInbox to inbox of acct
      set collected to collected & my messagesOf(acctInbox, showUnreadOnly)
    end try
  end repeat
  return collected
end allInboxMessages"#;

const DESCRIBE_HANDLER: &str = r#"
on describeMessage(theMessage, includeBody)
  tell application "Mail"
    try
      set entry to "From: " & (sender of theMessage) & return
      set entry to entry & "Subject: " & (subject of theMessage) & return
      set msgAccount to ""
      try
        set msgAccount to " [" & (name of account of mailbox of theMessage) & "]"
      end try
      set entry to entry & "Date: " & (date received of theMessage) & msgAccount & return
      set entry to entry & "Read: " & (read status of theMessage) & return
      if includeBody then set entry to entry & "Content: " & return & (content of theMessage) & return
      return entry
    on error errMsg
      return "Error processing message: " & errMsg & return
    end try
  end tell
end describeMessage"#;

const SORT_HANDLER: &str = r#"
on sortMessagesByDate(messageList)
  tell application "Mail"
    set sortedMessages to {}
    repeat with currentMsg in messageList
      set currentMsg to contents of currentMsg
      set currentDate to date received of currentMsg
      set inserted to false
      repeat with j from 1 to count of sortedMessages
        if currentDate > (date received of item j of sortedMessages) then
          if j is 1 then
            set sortedMessages to {currentMsg} & sortedMessages
          else
            set sortedMessages to (items 1 thru (j - 1) of sortedMessages) & {currentMsg} & (items j thru -1 of sortedMessages)
          end if
          set inserted to true
          exit repeat
        end if
      end repeat
      if not inserted then set end of sortedMessages to currentMsg
    end repeat
    return sortedMessages
  end tell
end sortMessagesByDate"#;

const PAD_HANDLER: &str = r#"
on padNumber(num)
  if num < 10 then return "0" & num
  return num as string
end padNumber"#;
