//! Fenced code block tracking for line-based preprocessing.
//!
//! Line preprocessors (admonitions, heading extraction) must not treat text
//! inside fenced code as markup. [`FenceTracker`] follows the `CommonMark`
//! fence rules closely enough for that purpose.

/// Open fence: marker character and run length.
#[derive(Debug, Clone, Copy)]
struct OpenFence {
    marker: char,
    len: usize,
}

/// Tracks whether a line-by-line scan is inside a fenced code block.
#[derive(Debug, Default)]
pub(crate) struct FenceTracker {
    open: Option<OpenFence>,
}

impl FenceTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Feed the next line. Returns `true` if the line is code: a fence
    /// delimiter or content between delimiters.
    pub(crate) fn is_code(&mut self, line: &str) -> bool {
        let Some((marker, len, rest)) = fence_run(line) else {
            return self.open.is_some();
        };

        match self.open {
            Some(open) => {
                if marker == open.marker && len >= open.len && rest.trim().is_empty() {
                    self.open = None;
                }
                true
            }
            None => {
                // Backtick fences cannot carry backticks in their info string.
                if marker == '`' && rest.contains('`') {
                    return false;
                }
                self.open = Some(OpenFence { marker, len });
                true
            }
        }
    }
}

/// Split a potential fence line into marker, run length and the remainder.
///
/// Allows at most three spaces of indentation; four or more is an indented
/// code block, not a fence.
fn fence_run(line: &str) -> Option<(char, usize, &str)> {
    let indent = line.len() - line.trim_start_matches(' ').len();
    if indent > 3 {
        return None;
    }
    let body = &line[indent..];
    let marker = body.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let len = body.chars().take_while(|c| *c == marker).count();
    (len >= 3).then_some((marker, len, &body[len..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code_flags(lines: &[&str]) -> Vec<bool> {
        let mut tracker = FenceTracker::new();
        lines.iter().map(|line| tracker.is_code(line)).collect()
    }

    #[test]
    fn test_backtick_fence() {
        assert_eq!(
            code_flags(&["text", "```rust", "!!! note", "```", "after"]),
            vec![false, true, true, true, false]
        );
    }

    #[test]
    fn test_tilde_fence_ignores_backtick_close() {
        assert_eq!(
            code_flags(&["~~~", "```", "~~~", "x"]),
            vec![true, true, true, false]
        );
    }

    #[test]
    fn test_closing_fence_must_be_long_enough() {
        assert_eq!(
            code_flags(&["````", "```", "````", "x"]),
            vec![true, true, true, false]
        );
    }

    #[test]
    fn test_closing_fence_with_info_does_not_close() {
        assert_eq!(
            code_flags(&["```", "```python", "```"]),
            vec![true, true, true]
        );
    }

    #[test]
    fn test_indented_four_spaces_is_not_fence() {
        assert_eq!(code_flags(&["    ```", "## Heading"]), vec![false, false]);
    }

    #[test]
    fn test_inline_code_is_not_fence() {
        assert_eq!(code_flags(&["``inline``", "```a`b"]), vec![false, false]);
    }

    #[test]
    fn test_up_to_three_spaces_allowed() {
        assert_eq!(code_flags(&["   ```", "x", "  ```"]), vec![true, true, true]);
    }
}
