// Device log window extraction

/// Fixed-offset window of log lines following a section header
///
/// The header is matched on a trimmed, case-insensitive basis. The window
/// starts `offset` lines after the header line and spans up to `length`
/// lines; a short log yields a shorter (possibly empty) window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogWindow {
    header: String,
    offset: usize,
    length: usize,
}

impl LogWindow {
    pub fn new(header: impl Into<String>, offset: usize, length: usize) -> Self {
        let header: String = header.into();
        Self {
            header: header.trim().to_lowercase(),
            offset,
            length,
        }
    }

    /// Lines of interest joined with `\n`, or `None` when the header is absent
    pub fn extract(&self, logs: &str) -> Option<String> {
        let lines: Vec<&str> = logs.lines().collect();
        let header_index = lines
            .iter()
            .position(|line| line.trim().to_lowercase() == self.header)?;

        let start = (header_index + self.offset).min(lines.len());
        let end = (start + self.length).min(lines.len());
        Some(lines[start..end].join("\n"))
    }
}
