use std::io::Write;
use strum_macros::Display;
use thiserror::Error;

#[derive(Debug, Display)]
pub enum ConfigType {
    #[strum(serialize = "Filter config")]
    FILTER,
    #[strum(serialize = "Transformer params")]
    TRANSFORMER,
}

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("error processing args. Cause : {0}")]
    ArgsProcessingError(String),
    #[error("unable to read configuration file {file:?}. Cause : {cause}")]
    ConfigReadError { file: String, cause: String },
    #[error("unable to parse {location} file {file:?}. Cause : {cause}")]
    SerdeTomlError {
        location: ConfigType,
        file: String,
        cause: String,
    },
    #[error("JSON parsing error: {0}")]
    JsonError(String),
    #[error(transparent)]
    Io(#[from] ::std::io::Error),
    #[error("unknown transformer class \"{class}\" in scope \"{scope}\"")]
    UnknownTransformer { class: String, scope: String },
    #[error("unable to construct transformer \"{class}\". Cause : {cause}")]
    ConstructionError { class: String, cause: String },
    #[error("error transforming {target}. Cause : {cause}")]
    TransformError { target: String, cause: String },
    #[error("{0}")]
    Msg(String),
}

impl From<&'static str> for Error {
    fn from(s: &'static str) -> Self {
        Error::Msg(s.to_owned())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Msg(s)
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::JsonError(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

pub fn default_error_handler(error: &Error, output: &mut dyn Write) {
    use nu_ansi_term::Color::Red;

    match error {
        Error::Io(io_error) if io_error.kind() == ::std::io::ErrorKind::BrokenPipe => {
            ::std::process::exit(0);
        }
        Error::ConfigReadError { file: _, cause: _ }
        | Error::SerdeTomlError {
            location: _,
            file: _,
            cause: _,
        } => {
            writeln!(output, "{}: {}", Red.paint("[config error]"), error).ok();
        }
        Error::UnknownTransformer { class: _, scope: _ }
        | Error::ConstructionError { class: _, cause: _ }
        | Error::TransformError {
            target: _,
            cause: _,
        } => {
            writeln!(output, "{}: {}", Red.paint("[transform error]"), error).ok();
        }
        _ => {
            writeln!(output, "{}: {}", Red.paint("[transform-filter error]"), error).ok();
        }
    };
}
