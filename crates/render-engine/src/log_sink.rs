//! Destinations for the encoder's diagnostic output.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Receives encoder output one line at a time.
pub trait LogSink: Send {
    /// Discard output from earlier runs.
    fn reset(&mut self) -> std::io::Result<()>;

    fn write_line(&mut self, line: &str) -> std::io::Result<()>;

    /// Record the failure that ended a run.
    fn append_error(&mut self, message: &str) -> std::io::Result<()>;
}

/// Appends to the run log file, flushing after every line so a concurrent
/// reader (`slidecast log --follow`) sees output as it arrives.
///
/// The file is not touched until the first reset or write.
#[derive(Debug)]
pub struct FileLogSink {
    path: PathBuf,
    file: Option<File>,
}

impl FileLogSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file: None,
        }
    }

    /// Open the log at `path`, emptying it.
    pub fn truncate(path: impl Into<PathBuf>) -> std::io::Result<Self> {
        let mut sink = Self::new(path);
        sink.reset()?;
        Ok(sink)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn file(&mut self) -> std::io::Result<&mut File> {
        match &mut self.file {
            Some(file) => Ok(file),
            slot => {
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&self.path)?;
                Ok(slot.insert(file))
            }
        }
    }
}

impl LogSink for FileLogSink {
    fn reset(&mut self) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        File::create(&self.path)?;
        self.file = None;
        Ok(())
    }

    fn write_line(&mut self, line: &str) -> std::io::Result<()> {
        let file = self.file()?;
        writeln!(file, "{line}")?;
        file.flush()
    }

    fn append_error(&mut self, message: &str) -> std::io::Result<()> {
        let file = self.file()?;
        write!(file, "\nError occurred: {message}\n")?;
        file.flush()
    }
}

/// Collects lines in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryLogSink {
    pub lines: Vec<String>,
    pub errors: Vec<String>,
    pub resets: usize,
}

impl MemoryLogSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LogSink for MemoryLogSink {
    fn reset(&mut self) -> std::io::Result<()> {
        self.lines.clear();
        self.errors.clear();
        self.resets += 1;
        Ok(())
    }

    fn write_line(&mut self, line: &str) -> std::io::Result<()> {
        self.lines.push(line.to_string());
        Ok(())
    }

    fn append_error(&mut self, message: &str) -> std::io::Result<()> {
        self.errors.push(message.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_sink_truncates_then_appends() {
        let dir = std::env::temp_dir().join("slidecast_test_log_sink");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("ffmpeg_log.txt");
        std::fs::write(&path, "previous run\n").unwrap();

        let mut sink = FileLogSink::truncate(&path).unwrap();
        sink.write_line("frame=1").unwrap();
        sink.write_line("frame=2").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "frame=1\nframe=2\n");

        sink.append_error("ffmpeg exited with status 1").unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "frame=1\nframe=2\n\nError occurred: ffmpeg exited with status 1\n"
        );
        assert_eq!(sink.path(), path.as_path());
    }

    #[test]
    fn test_new_sink_touches_nothing() {
        let path = std::env::temp_dir()
            .join("slidecast_test_log_sink_lazy")
            .join("ffmpeg_log.txt");
        let _ = std::fs::remove_dir_all(path.parent().unwrap());

        let mut sink = FileLogSink::new(&path);
        assert!(!path.exists());
        sink.reset().unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_memory_sink() {
        let mut sink = MemoryLogSink::new();
        sink.write_line("a").unwrap();
        sink.append_error("boom").unwrap();
        assert_eq!(sink.lines, vec!["a"]);
        assert_eq!(sink.errors, vec!["boom"]);
        sink.reset().unwrap();
        assert!(sink.lines.is_empty());
        assert_eq!(sink.resets, 1);
    }
}
