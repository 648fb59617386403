/// Error kinds raised by the interpreter.
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InterpError {
    /// Wrong arity or argument type for a known command.
    #[error("invalid arguments: {0}")]
    Argument(String),

    /// The line's keyword is not a command, assignment, or defined method.
    #[error("unrecognized command '{0}'")]
    UnrecognizedCommand(String),

    /// Call to a method that was never defined.
    #[error("call to undefined method '{0}'")]
    UndefinedMethod(String),

    /// Division by zero or a malformed expression.
    #[error("cannot evaluate expression: {0}")]
    Evaluation(String),

    /// Unterminated or mismatched block region.  Always fatal for the
    /// whole script.
    #[error("malformed script: {0}")]
    MalformedScript(String),

    /// `load` of a script file that does not exist.
    #[error("no saved script at {}", .0.display())]
    ResourceNotFound(PathBuf),

    /// Underlying file I/O failure during save/load.
    #[error("cannot access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
