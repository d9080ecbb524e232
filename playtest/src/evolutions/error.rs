use std::{fmt::Display, io, path::PathBuf};

#[derive(Debug)]
pub enum Error {
    IoError(io::Error),
    MissingUpsSection(PathBuf),
    DuplicateSection(PathBuf, String),
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::IoError(e)
    }
}

impl std::error::Error for Error {}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::IoError(e) => write!(f, "IoError: {}", e),
            Error::MissingUpsSection(path) => write!(
                f,
                "Evolution script {} has no '# --- !Ups' section",
                path.display()
            ),
            Error::DuplicateSection(path, section) => write!(
                f,
                "Evolution script {} declares the '{}' section more than once",
                path.display(),
                section
            ),
        }
    }
}
