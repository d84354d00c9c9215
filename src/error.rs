use thiserror::Error;

pub type Result<T> = std::result::Result<T, CensusError>;

#[derive(Error, Debug)]
pub enum CensusError {
    #[error("Git error: {0}")]
    Git(#[from] Box<gix::open::Error>),
    #[error("Git repository error: {0}")]
    GitRepo(String),
    #[error("Object find error: {0}")]
    ObjectFind(#[from] Box<gix::object::find::existing::Error>),
    #[error("Object find with conversion error: {0}")]
    ObjectFindConv(#[from] Box<gix::object::find::existing::with_conversion::Error>),
    #[error("Commit error: {0}")]
    Commit(#[from] Box<gix::object::commit::Error>),
    #[error("`{program} {args}` failed ({status}): {stderr}")]
    Command {
        program: String,
        args: String,
        status: String,
        stderr: String,
    },
    #[error("Search output is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
    #[error("Malformed search output line: {0}")]
    SearchOutput(String),
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("Walk error: {0}")]
    Walk(#[from] ignore::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

// Manual From implementations for unboxed to boxed conversions
impl From<gix::open::Error> for CensusError {
    fn from(err: gix::open::Error) -> Self {
        CensusError::Git(Box::new(err))
    }
}

impl From<gix::object::find::existing::Error> for CensusError {
    fn from(err: gix::object::find::existing::Error) -> Self {
        CensusError::ObjectFind(Box::new(err))
    }
}

impl From<gix::object::find::existing::with_conversion::Error> for CensusError {
    fn from(err: gix::object::find::existing::with_conversion::Error) -> Self {
        CensusError::ObjectFindConv(Box::new(err))
    }
}

impl From<gix::object::commit::Error> for CensusError {
    fn from(err: gix::object::commit::Error) -> Self {
        CensusError::Commit(Box::new(err))
    }
}

impl CensusError {
    pub fn command(program: &str, args: &[&str], output: &std::process::Output) -> Self {
        CensusError::Command {
            program: program.to_string(),
            args: args.join(" "),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
    }
}
