//! Form input and required-field checks
//!
//! Every form trims its text fields and rejects blanks before anything
//! touches the network.

use gaief_core::{DocumentUpload, GaiefError, Result, Role};

fn required(value: &str, message: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(GaiefError::validation(message));
    }
    Ok(trimmed.to_string())
}

/// An id is a single path segment, so `.` and `..` are refused
fn required_id(value: &str, message: &str) -> Result<String> {
    let id = required(value, message)?;
    if id == "." || id == ".." {
        return Err(GaiefError::validation(format!("'{}' is not a valid ID", id)));
    }
    Ok(id)
}

fn required_document(document: Option<DocumentUpload>) -> Result<DocumentUpload> {
    match document {
        Some(doc) if !doc.is_empty() => Ok(doc),
        Some(doc) => Err(GaiefError::validation(format!(
            "The selected file '{}' is empty",
            doc.file_name
        ))),
        None => Err(GaiefError::validation("Please choose a file to upload")),
    }
}

/// Role selector plus user id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupForm {
    /// Selected role
    pub role: Role,
    /// Entered id
    pub user_id: String,
}

impl LookupForm {
    /// Create a form
    pub fn new(role: Role, user_id: impl Into<String>) -> Self {
        Self {
            role,
            user_id: user_id.into(),
        }
    }

    /// Trimmed copy, or a validation error naming the missing id
    pub fn validated(&self) -> Result<Self> {
        let user_id = required_id(
            &self.user_id,
            &format!("Please enter a {} ID", self.role.singular()),
        )?;
        Ok(Self {
            role: self.role,
            user_id,
        })
    }
}

/// Inputs of the main "send message" action
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatForm {
    /// Selected role
    pub role: Role,
    /// Whose record provides the context
    pub user_id: String,
    /// What to ask about
    pub topic: String,
}

impl ChatForm {
    /// Create a form
    pub fn new(role: Role, user_id: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            role,
            user_id: user_id.into(),
            topic: topic.into(),
        }
    }

    /// Trimmed copy; id first, then topic
    pub fn validated(&self) -> Result<Self> {
        let user_id = required_id(&self.user_id, "Please enter a user ID")?;
        let topic = required(&self.topic, "Please enter a topic or question")?;
        Ok(Self {
            role: self.role,
            user_id,
            topic,
        })
    }
}

/// Chat with hand-written context instead of a stored record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FreeChatForm {
    /// Selected role
    pub role: Role,
    /// What to ask about
    pub topic: String,
    /// Free-text context
    pub context: String,
}

impl FreeChatForm {
    /// Create a form
    pub fn new(role: Role, topic: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            role,
            topic: topic.into(),
            context: context.into(),
        }
    }

    /// Both fields are required
    pub fn validated(&self) -> Result<Self> {
        let message = "Please fill in both topic and context";
        Ok(Self {
            role: self.role,
            topic: required(&self.topic, message)?,
            context: required(&self.context, message)?,
        })
    }
}

/// Document upload for feedback
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadForm {
    /// Selected role
    pub role: Role,
    /// What the document is about
    pub topic: String,
    /// Chosen file
    pub document: Option<DocumentUpload>,
}

impl UploadForm {
    /// Create a form
    pub fn new(role: Role, topic: impl Into<String>, document: Option<DocumentUpload>) -> Self {
        Self {
            role,
            topic: topic.into(),
            document,
        }
    }

    /// Consume into (role, topic, document)
    pub fn validated(self) -> Result<(Role, String, DocumentUpload)> {
        let document = required_document(self.document)?;
        let topic = required(&self.topic, "Please enter a topic for the document")?;
        Ok((self.role, topic, document))
    }
}

/// Document for the OCR summary function
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummarizeForm {
    /// Chosen file
    pub document: Option<DocumentUpload>,
}

impl SummarizeForm {
    /// Create a form
    pub fn new(document: Option<DocumentUpload>) -> Self {
        Self { document }
    }

    /// Consume into the document
    pub fn validated(self) -> Result<DocumentUpload> {
        required_document(self.document)
    }
}

/// Chat history and debug lookups share the lookup shape
pub type HistoryForm = LookupForm;
