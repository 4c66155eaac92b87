use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoxModelError {
    DuplicateName { name: String },
}

pub type BoxModelResult<T> = Result<T, BoxModelError>;

impl fmt::Display for BoxModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoxModelError::DuplicateName { name } => {
                write!(f, "a box model named {:?} is already registered", name)
            }
        }
    }
}

impl std::error::Error for BoxModelError {}
