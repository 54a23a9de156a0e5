//! Payload helpers for the smoke-test clients.
//!
//! The test driver provisions payload files of well known sizes (1 KiB,
//! 100 KiB, 500 KiB) built from a repeatable pattern; the same generation is
//! exposed here so a client can produce the payload locally instead of
//! mounting a file.

use std::fs;
use std::io;
use std::path::Path;

/// Pattern repeated when generating a payload of a requested size.
pub const MESSAGE_PATTERN: &str = "ThisIsARepeatableMessage";

/// Builds a payload of exactly `size` bytes by repeating [`MESSAGE_PATTERN`],
/// truncating the last repetition when `size` is not a multiple of the
/// pattern length.
pub fn generate_content(size: usize) -> String {
    let repetitions = size / MESSAGE_PATTERN.len() + 1;
    let mut content = MESSAGE_PATTERN.repeat(repetitions);
    content.truncate(size);
    content
}

/// Reads a payload verbatim from a file.
pub fn content_from_file(path: impl AsRef<Path>) -> io::Result<String> {
    fs::read_to_string(path)
}
