// ─── Error Taxonomy ──────────────────────────────────────────────────────────

/// Broad classification of a [`TaskdefError`], decoupled from the message so
/// callers can map failures to transport-level status codes without string
/// matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadRequest,
    Unauthorized,
    Internal,
}

impl ErrorKind {
    pub fn code(&self) -> u16 {
        match self {
            ErrorKind::BadRequest => 400,
            ErrorKind::Unauthorized => 401,
            ErrorKind::Internal => 500,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TaskdefError {
    /// Bad input to task construction.
    #[error("{0}")]
    Validation(String),

    /// Credential shape or expiry failure.
    #[error("{0}")]
    AuthValidation(String),

    /// Generic bad-request failure outside the auth path.
    #[error("{0}")]
    BadRequest(String),

    /// Propagated failure from the persistence collaborator.
    #[error("{0}")]
    Store(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl TaskdefError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TaskdefError::Validation(_) | TaskdefError::BadRequest(_) => ErrorKind::BadRequest,
            TaskdefError::AuthValidation(_) => ErrorKind::Unauthorized,
            TaskdefError::Store(_) => ErrorKind::Internal,
        }
    }

    pub fn code(&self) -> u16 {
        self.kind().code()
    }
}

pub type Result<T> = std::result::Result<T, TaskdefError>;

// ─── Tests ───────────────────────────────────────────────────────────────────
