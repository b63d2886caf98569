use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuizError {
    #[error("{0}")]
    Ai(#[from] AiError),
    #[error("Failed to parse quiz: {0}. Raw payload: {1}")]
    QuizParse(#[source] serde_json::Error, String),
    #[error("Malformed quiz: {0}")]
    QuizShape(String),
}

#[derive(Error, Debug)]
pub enum AiError {
    #[error("API key not found. Please set {0} in your environment.")]
    MissingApiKey(&'static str),
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("{0}")]
    Api(String),
    #[error("Rate limit exceeded")]
    RateLimit,
    #[error("Authentication failed")]
    Authentication,
    #[error("Invalid response format from API")]
    InvalidFormat,
    #[error("Mock error: {0}")]
    Mock(String),
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("session store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt session record: {0}")]
    Corrupt(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum SyllabusError {
    #[error("Please upload only PDF, Word, or text documents (got {0:?})")]
    UnsupportedFileType(String),
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("Syllabus service error: {0}")]
    Service(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
