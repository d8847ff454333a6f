use chrono::{DateTime, Local, NaiveTime};
use serde::Serialize;

/// Wall-clock format used when timestamps are shown
pub const TIMESTAMP_FORMAT: &str = "%H:%M:%S";

/// A line received from the device
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InboundEvent {
    pub timestamp: Option<DateTime<Local>>,
    pub payload: String,
}

/// Text written to the device
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundEvent {
    pub timestamp: Option<DateTime<Local>>,
    pub payload: String,
}

/// Everything a session reports to its subscriber
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionEvent {
    Received(InboundEvent),
    Sent(OutboundEvent),
    /// The receive loop hit an unrecoverable read error and exited
    ReadFailed { reason: String },
}

impl InboundEvent {
    /// Event stamped with the current local time
    pub fn now(payload: impl Into<String>) -> Self {
        Self {
            timestamp: Some(Local::now()),
            payload: payload.into(),
        }
    }

    pub fn time(&self) -> Option<NaiveTime> {
        self.timestamp.map(|t| t.time())
    }
}

impl OutboundEvent {
    /// Event stamped with the current local time
    pub fn now(payload: impl Into<String>) -> Self {
        Self {
            timestamp: Some(Local::now()),
            payload: payload.into(),
        }
    }

    pub fn time(&self) -> Option<NaiveTime> {
        self.timestamp.map(|t| t.time())
    }
}

/// Presentation preferences for rendering session events
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisplayOptions {
    /// Prefix messages with `HH:MM:SS - `
    pub timestamps: bool,
    /// Render sent data as `< ...` lines
    pub show_sent: bool,
}

impl DisplayOptions {
    pub fn new(timestamps: bool, show_sent: bool) -> Self {
        Self {
            timestamps,
            show_sent,
        }
    }

    /// Render an event as a transcript line, or `None` if it should not be shown
    pub fn render(&self, event: &SessionEvent) -> Option<String> {
        match event {
            SessionEvent::Received(inbound) => Some(format!(
                "> {}",
                format_message(inbound.time(), &inbound.payload, self.timestamps)
            )),
            SessionEvent::Sent(outbound) if self.show_sent => Some(format!(
                "< {}",
                format_message(outbound.time(), &outbound.payload, self.timestamps)
            )),
            SessionEvent::Sent(_) => None,
            SessionEvent::ReadFailed { reason } => Some(format!("! read failed: {}", reason)),
        }
    }
}

/// Format a payload, prefixed with its time when timestamps are enabled and known
pub fn format_message(time: Option<NaiveTime>, payload: &str, timestamps: bool) -> String {
    match time {
        Some(time) if timestamps => format!("{} - {}", time.format(TIMESTAMP_FORMAT), payload),
        _ => payload.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, min: u32, sec: u32) -> Option<DateTime<Local>> {
        Local.with_ymd_and_hms(2024, 1, 15, hour, min, sec).single()
    }

    #[test]
    fn test_format_message_with_timestamp() {
        let time = NaiveTime::from_hms_opt(14, 5, 9);
        assert_eq!(format_message(time, "X", true), "14:05:09 - X");
    }

    #[test]
    fn test_format_message_without_timestamp() {
        let time = NaiveTime::from_hms_opt(14, 5, 9);
        assert_eq!(format_message(time, "X", false), "X");
        assert_eq!(format_message(None, "X", true), "X");
    }

    #[test]
    fn test_render_inbound_line() {
        let event = SessionEvent::Received(InboundEvent {
            timestamp: at(14, 5, 9),
            payload: "X".to_string(),
        });

        assert_eq!(
            DisplayOptions::new(true, false).render(&event).as_deref(),
            Some("> 14:05:09 - X")
        );
        assert_eq!(
            DisplayOptions::new(false, false).render(&event).as_deref(),
            Some("> X")
        );
    }

    #[test]
    fn test_sent_lines_hidden_unless_enabled() {
        let event = SessionEvent::Sent(OutboundEvent {
            timestamp: at(8, 0, 1),
            payload: "AT".to_string(),
        });

        assert_eq!(DisplayOptions::new(true, false).render(&event), None);
        assert_eq!(
            DisplayOptions::new(true, true).render(&event).as_deref(),
            Some("< 08:00:01 - AT")
        );
    }

    #[test]
    fn test_read_failure_rendered() {
        let event = SessionEvent::ReadFailed {
            reason: "device unplugged".to_string(),
        };
        assert_eq!(
            DisplayOptions::default().render(&event).as_deref(),
            Some("! read failed: device unplugged")
        );
    }

    #[test]
    fn test_event_json_shape() {
        let event = SessionEvent::Received(InboundEvent {
            timestamp: None,
            payload: "ok".to_string(),
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "received");
        assert_eq!(json["payload"], "ok");
    }
}
