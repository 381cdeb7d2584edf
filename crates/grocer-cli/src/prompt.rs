//! Keyboard actions offered while a receipt is selected or under review.

/// What the user asked for at a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    /// Save Receipt
    Save,
    /// Close the review, keeping the result
    Cancel,
    /// Parse the same file again
    Reparse,
    /// Reopen the retained result
    View,
    Quit,
}

impl ReviewAction {
    /// Parse a prompt answer: a full word or its first letter, case-insensitive.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "s" | "save" => Some(ReviewAction::Save),
            "c" | "cancel" => Some(ReviewAction::Cancel),
            "r" | "reparse" | "re-parse" => Some(ReviewAction::Reparse),
            "v" | "view" => Some(ReviewAction::View),
            "q" | "quit" | "exit" => Some(ReviewAction::Quit),
            _ => None,
        }
    }
}

pub const REVIEW_PROMPT: &str = "[s]ave, [c]ancel, [r]e-parse, [q]uit >";
pub const SELECTED_WITH_RESULT_PROMPT: &str = "[v]iew results, [r]e-parse, [q]uit >";
pub const RETRY_PROMPT: &str = "[r]etry, [q]uit >";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_actions() {
        assert_eq!(ReviewAction::parse("s"), Some(ReviewAction::Save));
        assert_eq!(ReviewAction::parse(" SAVE "), Some(ReviewAction::Save));
        assert_eq!(ReviewAction::parse("re-parse"), Some(ReviewAction::Reparse));
        assert_eq!(ReviewAction::parse("v"), Some(ReviewAction::View));
        assert_eq!(ReviewAction::parse("exit"), Some(ReviewAction::Quit));
        assert_eq!(ReviewAction::parse("x"), None);
        assert_eq!(ReviewAction::parse(""), None);
    }
}
