use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum NetworkError {
    // Configuration errors
    UnknownActivationFunction(String),
    UnknownCostFunction(String),
    UnknownOptimizer(String),
    UnimplementedDerivative(&'static str),

    // Model related errors
    EmptyNetwork,
    ShapeMismatch(String),

    // File operations
    MalformedParameterFile(String),
    MalformedDataset(String),
    Io(std::io::Error),
    Csv(csv::Error),
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NetworkError::UnknownActivationFunction(name) => {
                write!(f, "unknown activation function name: {}", name)
            }
            NetworkError::UnknownCostFunction(name) => {
                write!(f, "unknown cost function name: {}", name)
            }
            NetworkError::UnknownOptimizer(name) => {
                write!(f, "unknown optimizer name: {}", name)
            }
            NetworkError::UnimplementedDerivative(name) => {
                write!(f, "{}: derivative is not implemented", name)
            }
            NetworkError::EmptyNetwork => write!(f, "the network has no layers"),
            NetworkError::ShapeMismatch(msg) => write!(f, "shape mismatch: {}", msg),
            NetworkError::MalformedParameterFile(msg) => {
                write!(f, "malformed parameter file: {}", msg)
            }
            NetworkError::MalformedDataset(msg) => write!(f, "malformed dataset: {}", msg),
            NetworkError::Io(err) => write!(f, "I/O error: {}", err),
            NetworkError::Csv(err) => write!(f, "CSV error: {}", err),
        }
    }
}

impl From<std::io::Error> for NetworkError {
    fn from(err: std::io::Error) -> NetworkError {
        NetworkError::Io(err)
    }
}

impl From<csv::Error> for NetworkError {
    fn from(err: csv::Error) -> NetworkError {
        NetworkError::Csv(err)
    }
}

impl Error for NetworkError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            NetworkError::Io(err) => Some(err),
            NetworkError::Csv(err) => Some(err),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, NetworkError>;
