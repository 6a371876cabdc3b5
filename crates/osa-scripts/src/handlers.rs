//! AppleScript handlers shared between templates.
//!
//! Each constant holds a complete handler definition, starting with a blank
//! line, for appending after a script body.

/// `jsonString(theText)` quotes text as a JSON string literal.
pub(crate) const JSON_STRING: &str = r#"
on jsonString(theText)
  set escaped to theText as text
  repeat with pair in {{"\\", "\\\\"}, {"\"", "\\\""}, {return, "\\r"}, {linefeed, "\\n"}, {tab, "\\t"}}
    set AppleScript's text item delimiters to item 1 of pair
    set pieces to text items of escaped
    set AppleScript's text item delimiters to item 2 of pair
    set escaped to pieces as text
  end repeat
  set AppleScript's text item delimiters to ""
  return "\"" & escaped & "\""
end jsonString"#;

/// `joinText(theItems, separator)` concatenates a list of text.
pub(crate) const JOIN_TEXT: &str = r#"
on joinText(theItems, separator)
  set AppleScript's text item delimiters to separator
  set joined to theItems as text
  set AppleScript's text item delimiters to ""
  return joined
end joinText"#;
