//! Turn results into display panels

use crate::templates::{names, TemplateEngine};
use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use gaief_core::{
    ChatHistory, ErrorPayload, GaiefError, OcrSummary, Result, Role, UploadReply, UserRecord,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Success or error styling, the only difference between the two paths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelStyle {
    /// Normal result
    Success,
    /// Validation or request failure
    Error,
}

impl PanelStyle {
    /// CSS class name
    pub fn as_str(&self) -> &'static str {
        match self {
            PanelStyle::Success => "success",
            PanelStyle::Error => "error",
        }
    }
}

/// Rendered contents of the single output container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Panel {
    /// Styling flag
    pub style: PanelStyle,
    /// HTML fragment
    pub html: String,
    /// Terminal rendering
    pub text: String,
}

impl Panel {
    /// Whether this is an error panel
    pub fn is_error(&self) -> bool {
        self.style == PanelStyle::Error
    }

    /// Error panel built without templates
    pub fn fallback_error(message: &str) -> Self {
        Self {
            style: PanelStyle::Error,
            html: format!(
                "<div class=\"result error\"><p class=\"error-message\">{}</p></div>",
                handlebars::html_escape(message)
            ),
            text: format!("Error: {}", message),
        }
    }
}

/// What to show
#[derive(Debug, Clone, Copy)]
pub enum ViewModel<'a> {
    /// A failure message
    Error {
        /// Message shown to the user
        message: &'a str,
    },
    /// A fetched user record
    Profile {
        /// Role it was looked up under
        role: Role,
        /// The record
        user: &'a UserRecord,
    },
    /// A question and the assistant's reply
    Exchange {
        /// What the user asked
        question: &'a str,
        /// What came back
        reply: &'a str,
    },
    /// Past exchanges for a user
    History {
        /// Whose history
        user_id: &'a str,
        /// Entries
        history: &'a ChatHistory,
    },
    /// Any JSON value, pretty-printed
    Json {
        /// Value to show
        value: &'a Value,
        /// Style as an error
        is_error: bool,
    },
    /// Feedback on an uploaded document
    Upload {
        /// Name of the uploaded file
        file_name: &'a str,
        /// Backend reply
        reply: &'a UploadReply,
    },
    /// Result of the OCR summary function
    OcrSummary {
        /// The summary
        summary: &'a OcrSummary,
    },
}

/// Deterministic view-model to panel mapping
pub struct Renderer {
    html: TemplateEngine,
    text: TemplateEngine,
}

impl Renderer {
    /// Build both template registries
    pub fn new() -> Result<Self> {
        Ok(Self {
            html: TemplateEngine::html()?,
            text: TemplateEngine::plain()?,
        })
    }

    /// Render a view model
    pub fn render(&self, view: &ViewModel<'_>) -> Result<Panel> {
        let (name, style, data) = match *view {
            ViewModel::Error { message } => {
                (names::ERROR, PanelStyle::Error, json!({ "message": message }))
            }
            ViewModel::Profile { role, user } => {
                (names::PROFILE, PanelStyle::Success, profile_data(role, user))
            }
            ViewModel::Exchange { question, reply } => (
                names::EXCHANGE,
                PanelStyle::Success,
                json!({ "question": question, "reply": reply }),
            ),
            ViewModel::History { user_id, history } => (
                names::HISTORY,
                PanelStyle::Success,
                history_data(user_id, history),
            ),
            ViewModel::Json { value, is_error } => {
                let style = if is_error {
                    PanelStyle::Error
                } else {
                    PanelStyle::Success
                };
                let pretty = serde_json::to_string_pretty(value)?;
                (
                    names::JSON,
                    style,
                    json!({ "json": pretty, "style": style.as_str() }),
                )
            }
            ViewModel::Upload { file_name, reply } => (
                names::UPLOAD,
                PanelStyle::Success,
                json!({
                    "file_name": file_name,
                    "reply": reply.reply,
                    "extracted_text": reply.extracted_text,
                }),
            ),
            ViewModel::OcrSummary { summary } => (
                names::OCR_SUMMARY,
                PanelStyle::Success,
                json!({
                    "message": summary.message.as_deref().unwrap_or("Document processed"),
                    "filename": summary.filename.as_deref().unwrap_or("unknown file"),
                    "status": summary.status.as_deref().unwrap_or("completed"),
                    "length": summary.extracted_text_length,
                    "summary": summary.summary,
                    "preview": summary.extracted_text_preview,
                }),
            ),
        };

        Ok(Panel {
            style,
            html: self.html.render_named(name, &data)?,
            text: self.text.render_named(name, &data)?.trim_end().to_string(),
        })
    }

    /// Render an error; never fails
    pub fn render_error(&self, err: &GaiefError) -> Panel {
        let message = ErrorPayload::from(err).error;
        self.render_message(&message)
    }

    /// Render a plain error message; never fails
    pub fn render_message(&self, message: &str) -> Panel {
        self.render(&ViewModel::Error { message }).unwrap_or_else(|e| {
            tracing::warn!("Error template failed, using fallback: {}", e);
            Panel::fallback_error(message)
        })
    }
}

/// Clamp a score to [0, 100]; NaN becomes 0. The flag is set when the
/// displayed value differs from the input.
pub fn clamp_score(score: f64) -> (f64, bool) {
    if score.is_nan() {
        return (0.0, true);
    }
    let clamped = score.clamp(0.0, 100.0);
    (clamped, clamped != score)
}

/// Bar width without a trailing `.0`
pub fn format_width(width: f64) -> String {
    if width.fract() == 0.0 {
        format!("{:.0}", width)
    } else {
        let s = format!("{:.2}", width);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// RFC 3339 in UTC at seconds precision. Unparseable values come back
/// verbatim; absent ones read `no timestamp`.
pub fn format_timestamp(raw: Option<&str>) -> String {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => "no timestamp".to_string(),
        Some(s) => parse_timestamp(s)
            .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
            .unwrap_or_else(|| s.to_string()),
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    // Naive values are taken as UTC
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
}

fn profile_data(role: Role, user: &UserRecord) -> Value {
    let user_id = user
        .display_id()
        .unwrap_or_else(|| "unknown".to_string());

    let progress: Vec<Value> = user
        .progress()
        .into_iter()
        .map(|(subject, score)| {
            let raw = score.as_f64().unwrap_or(f64::NAN);
            let (width, clamped) = clamp_score(raw);
            if clamped {
                tracing::warn!(
                    subject = %subject,
                    score = %score,
                    user = %user_id,
                    "Progress score outside 0-100, clamped for display"
                );
            }
            json!({
                "subject": subject,
                "score": score.to_string(),
                "width": format_width(width),
                "clamped": clamped,
            })
        })
        .collect();

    let subjects = user.subjects();

    json!({
        "name": user.display_name(),
        "id": user_id,
        "role": role.singular(),
        "grade": user.grade(),
        "subjects": (!subjects.is_empty()).then(|| subjects.join(", ")),
        "progress": progress,
    })
}

fn history_data(user_id: &str, history: &ChatHistory) -> Value {
    let entries: Vec<Value> = history
        .chat_history
        .iter()
        .map(|entry| {
            json!({
                "when": format_timestamp(entry.timestamp.as_deref()),
                "question": entry.question,
                "answer": entry.answer,
            })
        })
        .collect();

    json!({
        "user_id": user_id,
        "count": history.chat_history_count.max(entries.len()),
        "entries": entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gaief_core::ChatHistoryEntry;

    fn renderer() -> Renderer {
        Renderer::new().unwrap()
    }

    #[test]
    fn test_profile_contains_name_and_width() {
        let user: UserRecord =
            serde_json::from_value(json!({"name": "Aisha Khan", "progress": {"Math": 88}}))
                .unwrap();
        let panel = renderer()
            .render(&ViewModel::Profile {
                role: Role::Students,
                user: &user,
            })
            .unwrap();

        assert_eq!(panel.style, PanelStyle::Success);
        assert!(panel.html.contains("Aisha Khan"));
        assert!(panel.html.contains("width: 88%"));
        assert!(!panel.html.contains("data-clamped"));
        assert!(panel.text.contains("Math: 88"));
    }

    #[test]
    fn test_profile_clamps_out_of_range() {
        let user = UserRecord::new("S1", "Aisha Khan")
            .with_progress("Art", 130)
            .with_progress("Music", -5);
        let panel = renderer()
            .render(&ViewModel::Profile {
                role: Role::Students,
                user: &user,
            })
            .unwrap();

        assert!(panel.html.contains("width: 100%"));
        assert!(panel.html.contains("width: 0%"));
        assert!(panel.html.contains("data-clamped=\"true\""));
        assert!(panel.text.contains("Art: 130 (shown as 100%)"));
    }

    #[test]
    fn test_profile_with_numeric_id_and_null_fields() {
        let user: UserRecord = serde_json::from_value(json!({
            "id": 1001,
            "name": "Aisha Khan",
            "grade": null,
            "subjects": null
        }))
        .unwrap();
        let panel = renderer()
            .render(&ViewModel::Profile {
                role: Role::Students,
                user: &user,
            })
            .unwrap();

        assert_eq!(panel.style, PanelStyle::Success);
        assert!(panel.text.contains("ID: 1001"));
        assert!(!panel.text.contains("unknown"));
        assert!(!panel.text.contains("null"));
    }

    #[test]
    fn test_profile_escapes_html() {
        let user = UserRecord::new("S1", "<script>x</script>");
        let panel = renderer()
            .render(&ViewModel::Profile {
                role: Role::Teachers,
                user: &user,
            })
            .unwrap();
        assert!(!panel.html.contains("<script>"));
        assert!(panel.text.contains("<script>x</script>"));
        assert!(panel.html.contains("Role: teacher"));
    }

    #[test]
    fn test_clamp_score() {
        assert_eq!(clamp_score(88.0), (88.0, false));
        assert_eq!(clamp_score(0.0), (0.0, false));
        assert_eq!(clamp_score(100.0), (100.0, false));
        assert_eq!(clamp_score(100.5), (100.0, true));
        assert_eq!(clamp_score(-1.0), (0.0, true));
        assert_eq!(clamp_score(f64::NAN), (0.0, true));
        assert_eq!(clamp_score(f64::INFINITY), (100.0, true));
    }

    #[test]
    fn test_format_width() {
        assert_eq!(format_width(88.0), "88");
        assert_eq!(format_width(72.5), "72.5");
        assert_eq!(format_width(33.333), "33.33");
    }

    #[test]
    fn test_exchange_shows_question_and_reply() {
        let panel = renderer()
            .render(&ViewModel::Exchange {
                question: "What is six times seven?",
                reply: "42",
            })
            .unwrap();
        assert!(panel.html.contains("What is six times seven?"));
        assert!(panel.html.contains("42"));
        assert_eq!(panel.text, "You: What is six times seven?\nAssistant: 42");
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(
            format_timestamp(Some("2024-05-01T12:30:45.123+02:00")),
            "2024-05-01T10:30:45Z"
        );
        assert_eq!(
            format_timestamp(Some("2024-05-01T10:00:00.654321")),
            "2024-05-01T10:00:00Z"
        );
        assert_eq!(format_timestamp(Some("yesterday")), "yesterday");
        assert_eq!(format_timestamp(None), "no timestamp");
        assert_eq!(format_timestamp(Some("  ")), "no timestamp");
    }

    #[test]
    fn test_history_panel() {
        let history = ChatHistory {
            chat_history_count: 2,
            chat_history: vec![
                ChatHistoryEntry {
                    question: "1/2 + 1/4?".to_string(),
                    answer: "3/4".to_string(),
                    timestamp: Some("2024-05-01T10:00:00Z".to_string()),
                },
                ChatHistoryEntry {
                    question: "1/3 + 1/3?".to_string(),
                    answer: "2/3".to_string(),
                    timestamp: None,
                },
            ],
        };
        let panel = renderer()
            .render(&ViewModel::History {
                user_id: "S1001",
                history: &history,
            })
            .unwrap();
        assert!(panel.html.contains("2024-05-01T10:00:00Z"));
        assert!(panel.html.contains("no timestamp"));
        assert!(panel.text.contains("A: 2/3"));
        assert!(!panel.text.contains("No chat history found."));
    }

    #[test]
    fn test_empty_history_notice() {
        let panel = renderer()
            .render(&ViewModel::History {
                user_id: "S1001",
                history: &ChatHistory::default(),
            })
            .unwrap();
        assert!(panel.html.contains("No chat history found."));
        assert!(panel.text.contains("No chat history found."));
    }

    #[test]
    fn test_json_panel_pretty_prints() {
        let value = json!({"status": "ok"});
        let panel = renderer()
            .render(&ViewModel::Json {
                value: &value,
                is_error: false,
            })
            .unwrap();
        assert_eq!(panel.text, "{\n  \"status\": \"ok\"\n}");
        assert!(panel.html.starts_with("<pre class=\"result success\">"));
    }

    #[test]
    fn test_error_panel_uses_error_style() {
        let panel = renderer().render_error(&GaiefError::backend(500, "model unavailable"));
        assert!(panel.is_error());
        assert!(panel.html.contains("model unavailable"));
        assert_eq!(panel.text, "Error: model unavailable");
    }

    #[test]
    fn test_validation_error_message_is_plain() {
        let panel = renderer().render_error(&GaiefError::validation("Please enter a user ID"));
        assert_eq!(panel.text, "Error: Please enter a user ID");
    }

    #[test]
    fn test_fallback_error_escapes() {
        let panel = Panel::fallback_error("<oops>");
        assert!(panel.html.contains("&lt;oops&gt;"));
        assert!(panel.is_error());
    }

    #[test]
    fn test_upload_and_ocr_panels() {
        let reply = UploadReply {
            reply: "Good work on question 2".to_string(),
            extracted_text: "2 + 2 = 4".to_string(),
        };
        let panel = renderer()
            .render(&ViewModel::Upload {
                file_name: "worksheet.pdf",
                reply: &reply,
            })
            .unwrap();
        assert!(panel.text.starts_with("Feedback on worksheet.pdf:"));
        assert!(panel.text.contains("2 + 2 = 4"));

        let summary = OcrSummary {
            message: Some("Document processed successfully".to_string()),
            filename: Some("worksheet.pdf".to_string()),
            extracted_text_length: Some(9),
            summary: Some("Arithmetic practice".to_string()),
            status: Some("completed".to_string()),
            ..Default::default()
        };
        let panel = renderer()
            .render(&ViewModel::OcrSummary { summary: &summary })
            .unwrap();
        assert!(panel.html.contains("COMPLETED"));
        assert!(panel.text.contains("Characters extracted: 9"));
        assert!(panel.text.contains("Arithmetic practice"));
    }
}
