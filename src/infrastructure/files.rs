use crate::domain::errors::HttpError;
use hyper::body::Bytes;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Reads a request body file in full, as raw bytes.
pub fn read_body_file(path: &Path) -> Result<Bytes, HttpError> {
    std::fs::read(path).map(Bytes::from).map_err(|source| HttpError::BodyFileRead {
        path: path.to_path_buf(),
        source,
    })
}

/// Creates or truncates `path` and writes `bytes` to it.
///
/// On failure the partially written file is removed so it cannot be
/// mistaken for a complete response.
pub fn write_output_file(path: &Path, bytes: &[u8]) -> Result<(), HttpError> {
    let written = File::create(path).and_then(|mut file| {
        file.write_all(bytes)?;
        file.flush()
    });

    written.map_err(|source| {
        let _ = std::fs::remove_file(path);
        HttpError::OutputWrite {
            path: path.to_path_buf(),
            source,
        }
    })
}
