use crate::taxonomy::{Axes, EventCode, GroupId};

/// One classified log line.
#[derive(Debug, Clone)]
pub struct Event {
    code: EventCode,
    /// Code as received, kept for unknown-code diagnostics.
    raw_code: u32,
    line: String,
}

impl Event {
    pub fn new(code: EventCode, raw_code: u32, line: String) -> Self {
        Self {
            code,
            raw_code,
            line,
        }
    }

    /// Resolved code, or the unknown sentinel.
    pub fn code(&self) -> &EventCode {
        &self.code
    }

    pub fn raw_code(&self) -> u32 {
        self.raw_code
    }

    pub fn line(&self) -> &str {
        &self.line
    }

    pub fn is_unknown(&self) -> bool {
        self.code.is_unknown()
    }

    pub fn group(&self) -> Option<GroupId> {
        self.code.group()
    }

    pub fn axes(&self) -> Axes {
        self.code.axes()
    }
}
