//! Source reading.
//!
//! Reads input files from disk, or the whole of standard input when no files
//! were named. Sources are normalised to LF before the lexer ever sees them.

use std::io::{self, Read};
use std::path::PathBuf;
use thiserror::Error;

/// A failure to obtain source text.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("could not read '{path}': {source}")]
    File { path: String, source: io::Error },

    #[error("could not read from standard input: {0}")]
    Pipe(#[from] io::Error),
}

/// A file that was successfully read and normalised.
pub struct FileSource {
    pub path: PathBuf,
    pub source: String,
}

/// Read every named file, or standard input when the list is empty.
pub fn read_sources(files: &[PathBuf]) -> Result<Vec<FileSource>, ReadError> {
    if files.is_empty() {
        return Ok(vec![read_pipe()?]);
    }

    files
        .iter()
        .map(|path| {
            let source = std::fs::read_to_string(path).map_err(|source| ReadError::File {
                path: path.display().to_string(),
                source,
            })?;

            Ok(FileSource {
                path: path.clone(),
                source: normalize(source),
            })
        })
        .collect()
}

fn read_pipe() -> Result<FileSource, io::Error> {
    let mut source = String::new();
    io::stdin().read_to_string(&mut source)?;

    Ok(FileSource {
        path: PathBuf::from("<stdin>"),
        source: normalize(source),
    })
}

/// Strip carriage returns so only LF line endings reach the lexer.
fn normalize(source: String) -> String {
    if source.contains('\r') {
        source.replace('\r', "")
    } else {
        source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_cr() {
        assert_eq!(normalize("a\r\nb\r\n".to_string()), "a\nb\n");
        assert_eq!(normalize("plain\n".to_string()), "plain\n");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = read_sources(&[PathBuf::from("definitely/not/here.cas")]);
        assert!(result.is_err());
    }
}
