//! Calendar operations.

use osa_catalog::applescript::quoted;
use osa_catalog::{Category, InputShape, Operation, ProduceError, Producer};
use serde::Deserialize;
use serde_json::json;

use crate::non_blank;

const DEFAULT_CALENDAR: &str = "Calendar";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddEventInput {
    title: String,
    start_date: String,
    end_date: String,
    #[serde(default)]
    calendar: Option<String>,
}

/// Components of a `YYYY-MM-DD HH:MM:SS` timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Timestamp {
    year: u16,
    month: u8,
    day: u8,
    hours: u8,
    minutes: u8,
    seconds: u8,
}

impl Timestamp {
    fn parse(field: &str, text: &str) -> Result<Self, ProduceError> {
        let invalid = || {
            ProduceError::rejected(format!(
                "{field} must use the form YYYY-MM-DD HH:MM:SS, got '{text}'"
            ))
        };
        let (date, time) = text.trim().split_once(' ').ok_or_else(invalid)?;
        let mut date_parts = date.split('-');
        let mut time_parts = time.trim().split(':');
        let next = |parts: &mut std::str::Split<'_, char>| {
            parts.next().and_then(|part| part.parse::<u16>().ok())
        };

        let year = next(&mut date_parts).ok_or_else(invalid)?;
        let month = next(&mut date_parts).ok_or_else(invalid)?;
        let day = next(&mut date_parts).ok_or_else(invalid)?;
        let hours = next(&mut time_parts).ok_or_else(invalid)?;
        let minutes = next(&mut time_parts).ok_or_else(invalid)?;
        let seconds = next(&mut time_parts).unwrap_or(0);

        let narrow = |value: u16, max: u16| {
            if value <= max {
                u8::try_from(value).ok()
            } else {
                None
            }
        };
        Ok(Self {
            year,
            month: narrow(month, 12).filter(|m| *m >= 1).ok_or_else(invalid)?,
            day: narrow(day, 31).filter(|d| *d >= 1).ok_or_else(invalid)?,
            hours: narrow(hours, 23).ok_or_else(invalid)?,
            minutes: narrow(minutes, 59).ok_or_else(invalid)?,
            seconds: narrow(seconds, 59).ok_or_else(invalid)?,
        })
    }

    /// Statements assigning this timestamp to the AppleScript date `var`.
    fn assign(&self, var: &str) -> String {
        // Day is reset first so a short month cannot overflow while the
        // month is being changed.
        format!(
            "set {var} to current date\n    \
             set day of {var} to 1\n    \
             set year of {var} to {}\n    \
             set month of {var} to {}\n    \
             set day of {var} to {}\n    \
             set hours of {var} to {}\n    \
             set minutes of {var} to {}\n    \
             set seconds of {var} to {}",
            self.year, self.month, self.day, self.hours, self.minutes, self.seconds
        )
    }
}

pub(crate) fn category() -> Category {
    Category::new("calendar", "Calendar operations")
        .with_operation(
            Operation::new("add", "Add a new event to Calendar", Producer::try_typed(add))
                .with_input(InputShape::object(
                    json!({
                        "title": { "type": "string", "description": "Event title" },
                        "startDate": {
                            "type": "string",
                            "description": "Start date and time (YYYY-MM-DD HH:MM:SS)"
                        },
                        "endDate": {
                            "type": "string",
                            "description": "End date and time (YYYY-MM-DD HH:MM:SS)"
                        },
                        "calendar": {
                            "type": "string",
                            "description": "Calendar name (optional)",
                            "default": DEFAULT_CALENDAR
                        }
                    }),
                    &["title", "startDate", "endDate"],
                )),
        )
        .with_operation(Operation::new(
            "list",
            "List all events for today",
            Producer::Fixed(LIST_TODAY),
        ))
}

fn add(input: AddEventInput) -> Result<String, ProduceError> {
    let start = Timestamp::parse("startDate", &input.start_date)?;
    let end = Timestamp::parse("endDate", &input.end_date)?;
    let calendar = non_blank(input.calendar).unwrap_or_else(|| DEFAULT_CALENDAR.to_owned());

    Ok(format!(
        r#"tell application "Calendar"
    {start}
    {end}
    tell calendar {calendar}
      make new event with properties {{summary:{title}, start date:theStartDate, end date:theEndDate}}
    end tell
  end tell"#,
        start = start.assign("theStartDate"),
        end = end.assign("theEndDate"),
        calendar = quoted(&calendar),
        title = quoted(&input.title),
    ))
}

const LIST_TODAY: &str = r#"tell application "Calendar"
  set todayStart to (current date)
  set time of todayStart to 0
  set todayEnd to todayStart + 1 * days
  set eventList to {}
  repeat with aCalendar in calendars
    set eventList to eventList & (every event of aCalendar whose start date is greater than or equal to todayStart and start date is less than todayEnd)
  end repeat
  set output to ""
  repeat with anEvent in eventList
    set eventStart to start date of anEvent
    set eventEnd to end date of anEvent
    set output to output & "Event: " & summary of anEvent & linefeed
    set output to output & "Start: " & (hours of eventStart) & ":" & text -2 thru -1 of ("0" & (minutes of eventStart)) & linefeed
    set output to output & "End: " & (hours of eventEnd) & ":" & text -2 thru -1 of ("0" & (minutes of eventEnd)) & linefeed
    set output to output & "-------------------" & linefeed
  end repeat
  return output
end tell"#;
