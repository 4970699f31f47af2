//! Replay of `HEXCODE|line` text through a parser.

use std::path::Path;

use memchr::memchr_iter;
use thiserror::Error;

use crate::events::EventParser;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplayLineError {
    #[error("missing '|' between code and text")]
    MissingSeparator,
    #[error("invalid hex code {0:?}")]
    InvalidCode(String),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplayStats {
    pub lines: u64,
    pub published: u64,
    pub skipped: u64,
}

/// Split one replay line into its code and text.
pub fn parse_replay_line(line: &str) -> Result<(u32, &str), ReplayLineError> {
    let (code, text) = line
        .split_once('|')
        .ok_or(ReplayLineError::MissingSeparator)?;
    let code = code.trim();
    let digits = code
        .strip_prefix("0x")
        .or_else(|| code.strip_prefix("0X"))
        .unwrap_or(code);
    let parsed = u32::from_str_radix(digits, 16)
        .map_err(|_| ReplayLineError::InvalidCode(code.to_string()))?;
    Ok((parsed, text))
}

/// Publish every well-formed line of `bytes`. Blank lines are not counted.
pub fn replay_bytes(parser: &EventParser, bytes: &[u8]) -> ReplayStats {
    let mut stats = ReplayStats::default();
    let mut start = 0;
    for end in memchr_iter(b'\n', bytes) {
        replay_one(parser, &bytes[start..end], &mut stats);
        start = end + 1;
    }
    if start < bytes.len() {
        replay_one(parser, &bytes[start..], &mut stats);
    }
    stats
}

pub fn replay_file(parser: &EventParser, path: impl AsRef<Path>) -> std::io::Result<ReplayStats> {
    let bytes = std::fs::read(path.as_ref())?;
    let stats = replay_bytes(parser, &bytes);
    tracing::info!(
        path = %path.as_ref().display(),
        lines = stats.lines,
        skipped = stats.skipped,
        "Replayed log"
    );
    Ok(stats)
}

fn replay_one(parser: &EventParser, raw: &[u8], stats: &mut ReplayStats) {
    let line = String::from_utf8_lossy(raw);
    let line = line.trim_end_matches('\r');
    if line.trim().is_empty() {
        return;
    }
    stats.lines += 1;
    match parse_replay_line(line) {
        Ok((code, text)) => {
            parser.parse_and_publish(code, text);
            stats.published += 1;
        }
        Err(e) => {
            tracing::debug!(line = stats.lines, error = %e, "Skipping replay line");
            stats.skipped += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::Taxonomy;
    use std::sync::Arc;

    #[test]
    fn parses_code_and_text() {
        assert_eq!(
            parse_replay_line("000A29|You hit the Ifrit for 812 damage."),
            Ok((0x000A29, "You hit the Ifrit for 812 damage."))
        );
        assert_eq!(parse_replay_line(" 0x39 |a|b"), Ok((0x39, "a|b")));
        assert_eq!(
            parse_replay_line("no separator"),
            Err(ReplayLineError::MissingSeparator)
        );
        assert_eq!(
            parse_replay_line("zz|text"),
            Err(ReplayLineError::InvalidCode("zz".to_string()))
        );
    }

    #[test]
    fn replay_counts_lines_and_skips_bad_ones() {
        let parser = EventParser::new(Arc::new(Taxonomy::bundled().unwrap()));
        let data = b"000A29|hit\r\n\nbogus\n0039|system\nFFFFF0|mystery";

        let stats = replay_bytes(&parser, data);

        assert_eq!(
            stats,
            ReplayStats {
                lines: 4,
                published: 3,
                skipped: 1,
            }
        );
        assert_eq!(parser.known_count(), 2);
        assert_eq!(parser.unknown_count(), 1);
    }
}
