use crate::infrastructure::files::write_output_file;
use anyhow::{Result, anyhow};
use log::debug;
use std::io::Write;
use std::path::PathBuf;

/// Where the response body of an invocation ends up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputSink {
    /// The command's default stream, body followed by a newline.
    Stream,
    /// A file holding the exact body bytes; the stream only gets a
    /// confirmation line.
    File(PathBuf),
}

impl OutputSink {
    pub fn from_path(path: Option<PathBuf>) -> Self {
        match path {
            Some(path) if !path.as_os_str().is_empty() => OutputSink::File(path),
            _ => OutputSink::Stream,
        }
    }

    /// Writes either the body or the confirmation line, never both.
    pub fn deliver<W: Write>(&self, body: &[u8], out: &mut W) -> Result<()> {
        match self {
            OutputSink::File(path) => {
                debug!("Writing {} bytes to {}", body.len(), path.display());
                write_output_file(path, body)?;
                writeln!(out, "Data saved to: {}", path.display())
                    .map_err(|e| anyhow!("Failed to write confirmation: {}", e))
            }
            OutputSink::Stream => {
                out.write_all(body)
                    .and_then(|_| out.write_all(b"\n"))
                    .map_err(|e| anyhow!("Failed to write response body: {}", e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_gets_body_and_newline() {
        let mut out = Vec::new();
        OutputSink::Stream.deliver(b"this is a response", &mut out).unwrap();
        assert_eq!(out, b"this is a response\n");
    }

    #[test]
    fn empty_path_falls_back_to_stream() {
        assert_eq!(OutputSink::from_path(Some(PathBuf::new())), OutputSink::Stream);
        assert_eq!(OutputSink::from_path(None), OutputSink::Stream);
    }

    #[test]
    fn file_gets_body_and_stream_gets_confirmation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("file_path.out");
        let mut out = Vec::new();

        OutputSink::from_path(Some(path.clone()))
            .deliver(b"this is a response", &mut out)
            .unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"this is a response");
        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!("Data saved to: {}\n", path.display())
        );
    }

    #[test]
    fn failed_file_write_prints_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("file_path.out");
        let mut out = Vec::new();

        let result = OutputSink::File(path).deliver(b"data", &mut out);
        assert!(result.is_err());
        assert!(out.is_empty());
    }
}
