//! Chunk delivery for progressive roast reveal
//!
//! Two interchangeable strategies feed the same callback contract: a real
//! SSE stream from the primary provider (see the gateway), and this replay
//! adapter that fakes a stream from already-complete text when real
//! streaming is unavailable or fails mid-flight.

use std::time::Duration;

/// Artificial delay between replayed words
pub const REPLAY_DELAY: Duration = Duration::from_millis(25);

/// Replay completed text through `on_chunk`, one word at a time
///
/// Words after the first are emitted with a leading space so concatenating
/// the chunks reproduces a readable text.
pub fn replay_words(text: &str, delay: Duration, on_chunk: &mut dyn FnMut(&str)) {
    let mut first = true;
    for word in text.split_whitespace() {
        let chunk = if first {
            word.to_string()
        } else {
            format!(" {word}")
        };
        first = false;

        on_chunk(&chunk);
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replay_reassembles_text() {
        let mut collected = String::new();
        replay_words("MongoDB and jQuery, together", Duration::ZERO, &mut |c| {
            collected.push_str(c);
        });
        assert_eq!(collected, "MongoDB and jQuery, together");
    }

    #[test]
    fn test_replay_chunk_count() {
        let mut chunks = 0;
        replay_words("one two  three\nfour", Duration::ZERO, &mut |_| chunks += 1);
        assert_eq!(chunks, 4);
    }

    #[test]
    fn test_replay_empty_text() {
        let mut chunks = 0;
        replay_words("   ", Duration::ZERO, &mut |_| chunks += 1);
        assert_eq!(chunks, 0);
    }
}
