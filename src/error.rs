use std::{error, fmt};

#[derive(Debug)]
pub enum Error {
    Playtest(playtest::Error),
    Hyper(hyper::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Playtest(e) => write!(f, "{}", e),
            Error::Hyper(e) => write!(f, "Server error: {}", e),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Playtest(e) => Some(e),
            Error::Hyper(e) => Some(e),
        }
    }
}

impl From<playtest::Error> for Error {
    fn from(e: playtest::Error) -> Self {
        Error::Playtest(e)
    }
}

impl From<hyper::Error> for Error {
    fn from(e: hyper::Error) -> Self {
        Error::Hyper(e)
    }
}
