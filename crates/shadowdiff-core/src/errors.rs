use shadowdiff_core_types::CorrelationId;
use thiserror::Error;

/// Result type alias using ShadowDiffError
pub type Result<T> = std::result::Result<T, ShadowDiffError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code usable for programmatic handling,
/// tests, and the `err.code` field of structured log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Input
    /// A body declared as JSON could not be decoded into a document
    InvalidDocument,
    /// The effective equivalence policy failed validation
    InvalidPolicy,
    /// A configuration source could not be parsed or has an unknown format
    InvalidConfig,

    // Integration/IO
    /// A configuration file could not be read
    Io,

    // Internal
    /// A comparison panicked and was caught at the orchestrator boundary
    ComparisonPanicked,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidDocument => "ERR_INVALID_DOCUMENT",
            ExErrorKind::InvalidPolicy => "ERR_INVALID_POLICY",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::ComparisonPanicked => "ERR_COMPARISON_PANICKED",
        }
    }
}

/// Canonical structured error type
///
/// Classification fields for programmatic handling plus the context needed to
/// diagnose a failed comparison (operation and correlation id).
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    correlation_id: Option<CorrelationId>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            correlation_id: None,
            message: String::new(),
        }
    }

    /// Set the operation name
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Set the correlation id of the request pair being compared
    pub fn with_correlation_id(mut self, correlation_id: CorrelationId) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }

    /// Set the error message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation name, if set
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the correlation id, if set
    pub fn correlation_id(&self) -> Option<&CorrelationId> {
        self.correlation_id.as_ref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(correlation_id) = &self.correlation_id {
            write!(f, " (correlation_id: {})", correlation_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Domain failures raised while preparing or running a comparison
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShadowDiffError {
    /// Body bytes could not be decoded as a JSON document
    #[error("Document parse failed: {message}")]
    DocumentParse { message: String },

    /// Effective policy carries values the differ cannot honour
    #[error("Invalid policy: {reason}")]
    InvalidPolicy { reason: String },

    /// Configuration text is malformed
    #[error("Failed to parse {format} configuration: {message}")]
    ConfigParse { format: String, message: String },

    /// Configuration file could not be read
    #[error("Failed to read configuration {path}: {message}")]
    ConfigIo { path: String, message: String },

    /// Configuration file extension is neither .toml nor .json
    #[error("Unsupported configuration format: {path}")]
    UnsupportedConfigFormat { path: String },
}

impl From<ShadowDiffError> for ExError {
    fn from(err: ShadowDiffError) -> Self {
        let message = err.to_string();
        match err {
            ShadowDiffError::DocumentParse { .. } => ExError::new(ExErrorKind::InvalidDocument)
                .with_op("parse_document")
                .with_message(message),

            ShadowDiffError::InvalidPolicy { .. } => ExError::new(ExErrorKind::InvalidPolicy)
                .with_op("validate_policy")
                .with_message(message),

            ShadowDiffError::ConfigParse { .. } | ShadowDiffError::UnsupportedConfigFormat { .. } => {
                ExError::new(ExErrorKind::InvalidConfig)
                    .with_op("load_config")
                    .with_message(message)
            }

            ShadowDiffError::ConfigIo { .. } => ExError::new(ExErrorKind::Io)
                .with_op("load_config")
                .with_message(message),
        }
    }
}

impl From<serde_json::Error> for ShadowDiffError {
    fn from(err: serde_json::Error) -> Self {
        ShadowDiffError::ConfigParse {
            format: "json".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for ShadowDiffError {
    fn from(err: toml::de::Error) -> Self {
        ShadowDiffError::ConfigParse {
            format: "toml".to_string(),
            message: err.to_string(),
        }
    }
}
