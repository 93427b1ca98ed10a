//! Error taxonomy and diagnostics for the token pipeline.

use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, StrataError>;

/// Top-level error type for the token pipeline.
#[derive(Debug, Error)]
pub enum StrataError {
    #[error(transparent)]
    Reference(#[from] ReferenceError),

    #[error(transparent)]
    File(#[from] FileError),

    #[error(transparent)]
    Modifier(#[from] ModifierError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl StrataError {
    /// The machine-readable kind tag for this error.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Reference(e) => e.kind(),
            Self::File(_) => "file-operation",
            Self::Modifier(_) => "modifier",
            Self::Validation(_) => "validation",
            Self::Config(_) => "configuration",
        }
    }

    /// Suggested corrections, when the error carries any.
    pub fn suggestions(&self) -> &[String] {
        match self {
            Self::Reference(ReferenceError::Unknown { suggestions, .. }) => suggestions,
            _ => &[],
        }
    }
}

/// Errors during reference or alias resolution.
#[derive(Debug, Error)]
pub enum ReferenceError {
    /// A reference or alias names nothing that exists.
    #[error("unknown reference: {uri}")]
    Unknown {
        uri: String,
        /// Closest matches among known names.
        suggestions: Vec<String>,
    },

    /// A fragment pointer selected nothing inside its document.
    #[error("no value at pointer {pointer} in {file}")]
    MissingPointer { pointer: String, file: String },

    /// A reference chain re-entered itself.
    #[error("circular reference: {}", .trail.join(" -> "))]
    Circular { trail: Vec<String> },

    /// A reference chain exceeded the configured depth bound.
    #[error("reference depth limit ({limit}) exceeded at {at}")]
    DepthExceeded { at: String, limit: u32 },
}

impl ReferenceError {
    pub fn unknown(uri: impl Into<String>) -> Self {
        Self::Unknown {
            uri: uri.into(),
            suggestions: Vec::new(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unknown { .. } | Self::MissingPointer { .. } => "token-reference",
            Self::Circular { .. } | Self::DepthExceeded { .. } => "circular-reference",
        }
    }
}

/// A filesystem operation failure, with the operation and path.
#[derive(Debug, Error)]
#[error("failed to {op} {}: {source}", .path.display())]
pub struct FileError {
    pub op: &'static str,
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

impl FileError {
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self {
            op: "read",
            path: path.into(),
            source,
        }
    }
}

/// Errors in modifier inputs.
#[derive(Debug, Error)]
pub enum ModifierError {
    #[error("unknown modifier '{name}' (available: {})", .available.join(", "))]
    UnknownModifier {
        name: String,
        available: Vec<String>,
    },

    #[error("unknown context '{context}' for modifier '{modifier}' (available: {})", .available.join(", "))]
    UnknownContext {
        modifier: String,
        context: String,
        available: Vec<String>,
    },
}

/// A single validation issue, located by file path or JSON Pointer.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Issue {
    pub path: String,
    pub message: String,
}

/// Document validation failures.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("resolver document has no version")]
    MissingVersion,

    #[error("unsupported resolver version '{version}' (expected {expected})")]
    UnsupportedVersion { version: String, expected: String },

    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    #[error("invalid document: {} issue(s), first: {}", .issues.len(), first_issue(.issues))]
    Invalid { issues: Vec<Issue> },
}

fn first_issue(issues: &[Issue]) -> String {
    issues
        .first()
        .map(|issue| format!("{}: {}", issue.path, issue.message))
        .unwrap_or_default()
}

/// Build configuration and plugin-contract failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("duplicate token path: {path}")]
    DuplicateTokenPath { path: String },

    #[error("output '{output}' produced colliding file path '{path}'")]
    DuplicateOutputPath { output: String, path: String },

    #[error("malformed plugin '{plugin}': {reason}")]
    MalformedPlugin { plugin: String, reason: String },

    #[error("missing required option '{option}' for {target}")]
    MissingOption { target: String, option: String },

    #[error("invalid file template '{template}': {reason}")]
    InvalidTemplate { template: String, reason: String },
}

/// How strictly the pipeline treats recoverable problems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// Recoverable problems become errors.
    #[default]
    Error,
    /// Recoverable problems become warnings through the sink.
    Warn,
    /// Recoverable problems are dropped.
    Off,
}

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// A diagnostic surfaced through the validation hook.
/// Serializable so the external CLI can report it structurally.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Machine-readable kind tag (`token-reference`, `validation`, ...).
    pub kind: &'static str,
    pub message: String,
    /// File path or JSON Pointer, when known.
    pub source: Option<String>,
    pub suggestions: Vec<String>,
}

impl Diagnostic {
    pub fn warning(kind: &'static str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            kind,
            message: message.into(),
            source: None,
            suggestions: Vec::new(),
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Warning sink; must be callable from any task.
pub type WarningSink = Arc<dyn Fn(&Diagnostic) + Send + Sync>;

/// Validation strictness and the warning sink.
#[derive(Clone, Default)]
pub struct ValidationOptions {
    pub mode: ValidationMode,
    pub on_warning: Option<WarningSink>,
}

impl std::fmt::Debug for ValidationOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationOptions")
            .field("mode", &self.mode)
            .field("on_warning", &self.on_warning.is_some())
            .finish()
    }
}

impl ValidationOptions {
    pub fn warn() -> Self {
        Self {
            mode: ValidationMode::Warn,
            on_warning: None,
        }
    }

    /// Whether recoverable failures should be downgraded to warnings.
    pub fn downgrades(&self) -> bool {
        matches!(self.mode, ValidationMode::Warn | ValidationMode::Off)
    }

    /// Emit a warning through the sink, honouring the mode.
    pub fn emit(&self, diagnostic: Diagnostic) {
        if self.mode == ValidationMode::Off {
            return;
        }
        if let Some(sink) = &self.on_warning {
            sink(&diagnostic);
        }
    }
}

/// Closest matches to `target` among `candidates`, for error suggestions.
///
/// Bounded edit distance; at most `max` results, best first.
pub fn closest_matches<'a>(
    target: &str,
    candidates: impl IntoIterator<Item = &'a str>,
    max: usize,
) -> Vec<String> {
    let cutoff = (target.len() / 3).max(2);
    let mut scored: Vec<(usize, &str)> = candidates
        .into_iter()
        .filter_map(|candidate| {
            let distance = edit_distance(target, candidate);
            (distance <= cutoff).then_some((distance, candidate))
        })
        .collect();
    scored.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(b.1)));
    scored
        .into_iter()
        .take(max)
        .map(|(_, candidate)| candidate.to_string())
        .collect()
}

fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.iter().enumerate() {
        let mut previous = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitute = previous + usize::from(ca != cb);
            previous = row[j + 1];
            row[j + 1] = substitute.min(previous + 1).min(row[j] + 1);
        }
    }
    row[b.len()]
}
