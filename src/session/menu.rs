//! Main menu choices.

/// Text shown before every menu prompt.
pub const MENU_TEXT: &str = "
Press 1 to see all your posts, along with their captions and post IDs.
Press 2 to view one specific post (the post ID is required).
Press 3 to create a new post.
Press 4 to edit/update an old post (the post ID is required).
Press 5 to delete an old post (the post ID is required).
Press 6 to exit.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    ListAll,
    ViewOne,
    Create,
    Update,
    Delete,
    Quit,
}

impl MenuChoice {
    /// Parse a single-character command `1`..`6`.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(MenuChoice::ListAll),
            "2" => Some(MenuChoice::ViewOne),
            "3" => Some(MenuChoice::Create),
            "4" => Some(MenuChoice::Update),
            "5" => Some(MenuChoice::Delete),
            "6" => Some(MenuChoice::Quit),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_choices() {
        assert_eq!(MenuChoice::parse("1"), Some(MenuChoice::ListAll));
        assert_eq!(MenuChoice::parse(" 4 "), Some(MenuChoice::Update));
        assert_eq!(MenuChoice::parse("6"), Some(MenuChoice::Quit));
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!(MenuChoice::parse("7"), None);
        assert_eq!(MenuChoice::parse(""), None);
        assert_eq!(MenuChoice::parse("12"), None);
        assert_eq!(MenuChoice::parse("list"), None);
    }
}
