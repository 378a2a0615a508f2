// src/console/log.rs

use std::collections::VecDeque;

use chrono::Local;

/// How a console line should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogKind {
    Normal,
    Command,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// `[HH:MM:SS.mmm]` in local time.
    pub timestamp: String,
    pub kind: LogKind,
    pub text: String,
}

impl LogEntry {
    /// The line as shown to the user.
    pub fn render(&self) -> String {
        format!("{} {}", self.timestamp, self.text)
    }
}

/// Bounded console history. The oldest entry is dropped once the limit is
/// reached.
#[derive(Debug)]
pub struct ConsoleLog {
    entries: VecDeque<LogEntry>,
    limit: usize,
    echo: bool,
}

impl ConsoleLog {
    pub fn new(limit: usize, echo: bool) -> Self {
        let limit = limit.max(1);
        Self {
            entries: VecDeque::with_capacity(limit.min(256)),
            limit,
            echo,
        }
    }

    pub fn log(&mut self, text: impl Into<String>) {
        self.push(LogKind::Normal, text);
    }

    pub fn warn(&mut self, text: impl Into<String>) {
        self.push(LogKind::Warning, text);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.push(LogKind::Error, text);
    }

    pub fn push(&mut self, kind: LogKind, text: impl Into<String>) {
        if self.entries.len() >= self.limit {
            self.entries.pop_front();
        }

        let entry = LogEntry {
            timestamp: Local::now().format("[%H:%M:%S%.3f]").to_string(),
            kind,
            text: text.into(),
        };

        if self.echo {
            match kind {
                LogKind::Warning | LogKind::Error => eprintln!("{}", entry.render()),
                LogKind::Normal | LogKind::Command => println!("{}", entry.render()),
            }
        }

        self.entries.push_back(entry);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Texts of every entry, oldest first.
    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.text.clone()).collect()
    }
}
