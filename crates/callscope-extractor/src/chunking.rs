//! Line-respecting transcript chunking

/// A bounded slice of a transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Position in the transcript, starting at 1
    pub number: usize,
    /// Chunk text
    pub text: String,
}

/// Splits transcripts into chunks of at most `max_chars` characters
///
/// Split points fall only on line boundaries. A single line longer than the
/// limit is kept whole in its own chunk.
pub struct TranscriptChunker {
    max_chars: usize,
}

impl TranscriptChunker {
    /// Create a new chunker
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }

    /// Split the given transcript
    ///
    /// Input that already fits is returned as one chunk, unchanged.
    pub fn split(&self, text: &str) -> Vec<Chunk> {
        if text.chars().count() <= self.max_chars {
            return vec![Chunk {
                number: 1,
                text: text.to_string(),
            }];
        }

        let mut pieces = Vec::new();
        let mut current = String::new();
        let mut current_chars = 0;

        for line in text.split('\n') {
            let line_chars = line.chars().count();

            if current_chars + line_chars + 1 > self.max_chars && current_chars > 0 {
                push_trimmed(&mut pieces, &current);
                current.clear();
                current_chars = 0;
            }

            current.push_str(line);
            current.push('\n');
            current_chars += line_chars + 1;
        }
        push_trimmed(&mut pieces, &current);

        pieces
            .into_iter()
            .enumerate()
            .map(|(idx, text)| Chunk {
                number: idx + 1,
                text,
            })
            .collect()
    }
}

// Whitespace-only buffers are dropped
fn push_trimmed(pieces: &mut Vec<String>, buffer: &str) {
    let trimmed = buffer.trim();
    if !trimmed.is_empty() {
        pieces.push(trimmed.to_string());
    }
}
