//! Template engine for result panels

use gaief_core::{GaiefError, Result};
use handlebars::Handlebars;
use serde::Serialize;

/// Handlebars registry with every panel template registered once
pub struct TemplateEngine {
    handlebars: Handlebars<'static>,
}

impl TemplateEngine {
    /// Engine for HTML fragments; values are escaped
    pub fn html() -> Result<Self> {
        let mut engine = Self::empty();
        for (name, template) in HTML_TEMPLATES {
            engine.register_template(name, template)?;
        }
        Ok(engine)
    }

    /// Engine for terminal text; values are written verbatim
    pub fn plain() -> Result<Self> {
        let mut engine = Self::empty();
        engine.handlebars.register_escape_fn(handlebars::no_escape);
        for (name, template) in TEXT_TEMPLATES {
            engine.register_template(name, template)?;
        }
        Ok(engine)
    }

    fn empty() -> Self {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);
        handlebars.register_helper("uppercase", Box::new(uppercase_helper));
        Self { handlebars }
    }

    /// Register a template
    pub fn register_template(&mut self, name: &str, template: &str) -> Result<()> {
        self.handlebars
            .register_template_string(name, template)
            .map_err(|e| GaiefError::template(e.to_string()))?;
        Ok(())
    }

    /// Render a registered template
    pub fn render_named<T: Serialize>(&self, name: &str, data: &T) -> Result<String> {
        self.handlebars
            .render(name, data)
            .map_err(|e| GaiefError::template(e.to_string()))
    }
}

fn uppercase_helper(
    h: &handlebars::Helper,
    _: &Handlebars,
    _: &handlebars::Context,
    _: &mut handlebars::RenderContext,
    out: &mut dyn handlebars::Output,
) -> handlebars::HelperResult {
    let param = h
        .param(0)
        .ok_or_else(|| handlebars::RenderErrorReason::ParamNotFoundForIndex("uppercase", 0))?;

    let value = param.value().as_str().unwrap_or("");
    out.write(&value.to_uppercase())?;
    Ok(())
}

/// Names shared by both registries
pub mod names {
    /// Error message
    pub const ERROR: &str = "error";
    /// User profile with progress bars
    pub const PROFILE: &str = "profile";
    /// Question and reply
    pub const EXCHANGE: &str = "exchange";
    /// Past exchanges
    pub const HISTORY: &str = "history";
    /// Pretty-printed JSON
    pub const JSON: &str = "json";
    /// Document feedback
    pub const UPLOAD: &str = "upload";
    /// OCR function result
    pub const OCR_SUMMARY: &str = "ocr_summary";
}

const HTML_TEMPLATES: [(&str, &str); 7] = [
    (names::ERROR, ERROR_HTML),
    (names::PROFILE, PROFILE_HTML),
    (names::EXCHANGE, EXCHANGE_HTML),
    (names::HISTORY, HISTORY_HTML),
    (names::JSON, JSON_HTML),
    (names::UPLOAD, UPLOAD_HTML),
    (names::OCR_SUMMARY, OCR_SUMMARY_HTML),
];

const TEXT_TEMPLATES: [(&str, &str); 7] = [
    (names::ERROR, ERROR_TEXT),
    (names::PROFILE, PROFILE_TEXT),
    (names::EXCHANGE, EXCHANGE_TEXT),
    (names::HISTORY, HISTORY_TEXT),
    (names::JSON, JSON_TEXT),
    (names::UPLOAD, UPLOAD_TEXT),
    (names::OCR_SUMMARY, OCR_SUMMARY_TEXT),
];

const ERROR_HTML: &str = r#"<div class="result error">
  <p class="error-message">{{message}}</p>
</div>"#;

const PROFILE_HTML: &str = r#"<div class="result success profile" data-role="{{role}}">
  <h3 class="user-name">{{name}}</h3>
  <p class="user-id">ID: {{id}}</p>
  <p class="user-role">Role: {{role}}</p>
  {{#if grade}}<p class="user-grade">Grade: {{grade}}</p>{{/if}}
  {{#if subjects}}<p class="user-subjects">Subjects: {{subjects}}</p>{{/if}}
  {{#each progress}}
  <div class="progress-row">
    <span class="subject">{{subject}}</span>
    <div class="progress-track"><div class="progress-bar"{{#if clamped}} data-clamped="true"{{/if}} style="width: {{width}}%"></div></div>
    <span class="score">{{score}}</span>
  </div>
  {{/each}}
</div>"#;

const EXCHANGE_HTML: &str = r#"<div class="result success chat">
  <div class="chat-turn user"><span class="speaker">You</span><p>{{question}}</p></div>
  <div class="chat-turn assistant"><span class="speaker">Assistant</span><p>{{reply}}</p></div>
</div>"#;

const HISTORY_HTML: &str = r#"<div class="result success chat-history">
  <h3>Chat history for {{user_id}} ({{count}})</h3>
  {{#if entries}}
  {{#each entries}}
  <div class="history-entry">
    <time>{{when}}</time>
    <p class="question">Q: {{question}}</p>
    <p class="answer">A: {{answer}}</p>
  </div>
  {{/each}}
  {{else}}
  <p class="empty">No chat history found.</p>
  {{/if}}
</div>"#;

const JSON_HTML: &str = r#"<pre class="result {{style}}">{{json}}</pre>"#;

const UPLOAD_HTML: &str = r#"<div class="result success upload">
  <h3>Feedback on {{file_name}}</h3>
  <p class="reply">{{reply}}</p>
  {{#if extracted_text}}<details><summary>Extracted text</summary><pre>{{extracted_text}}</pre></details>{{/if}}
</div>"#;

const OCR_SUMMARY_HTML: &str = r#"<div class="result success ocr-summary">
  <h3>{{message}}</h3>
  <p class="ocr-file">File: {{filename}} ({{uppercase status}})</p>
  {{#if length}}<p class="ocr-length">Characters extracted: {{length}}</p>{{/if}}
  {{#if summary}}<p class="ocr-text">{{summary}}</p>{{/if}}
  {{#if preview}}<pre class="ocr-preview">{{preview}}</pre>{{/if}}
</div>"#;

const ERROR_TEXT: &str = "Error: {{message}}";

const PROFILE_TEXT: &str = r#"{{name}}
ID: {{id}}
Role: {{role}}
{{#if grade}}Grade: {{grade}}
{{/if}}{{#if subjects}}Subjects: {{subjects}}
{{/if}}{{#each progress}}  {{subject}}: {{score}}{{#if clamped}} (shown as {{width}}%){{/if}}
{{/each}}"#;

const EXCHANGE_TEXT: &str = r#"You: {{question}}
Assistant: {{reply}}"#;

const HISTORY_TEXT: &str = r#"Chat history for {{user_id}} ({{count}})
{{#if entries}}{{#each entries}}
[{{when}}]
Q: {{question}}
A: {{answer}}
{{/each}}{{else}}No chat history found.{{/if}}"#;

const JSON_TEXT: &str = "{{json}}";

const UPLOAD_TEXT: &str = r#"Feedback on {{file_name}}:
{{reply}}
{{#if extracted_text}}
Extracted text:
{{extracted_text}}{{/if}}"#;

const OCR_SUMMARY_TEXT: &str = r#"{{message}} [{{uppercase status}}]
File: {{filename}}
{{#if length}}Characters extracted: {{length}}
{{/if}}{{#if summary}}
{{summary}}
{{/if}}"#;
