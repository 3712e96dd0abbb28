//! Unit tests for intent decoding.

#[cfg(test)]
mod intent_tests {
    use super::super::Intent;

    #[test]
    fn plain_commands_decode() {
        assert_eq!(Intent::parse("/start"), Intent::Start);
        assert_eq!(Intent::parse("/help"), Intent::Help);
        assert_eq!(Intent::parse("/find"), Intent::Find);
        assert_eq!(Intent::parse("/stats"), Intent::Stats);
        assert_eq!(Intent::parse("/achievements"), Intent::Achievements);
        assert_eq!(Intent::parse("/recommend"), Intent::Recommend);
        assert_eq!(Intent::parse("/events"), Intent::Events);
    }

    #[test]
    fn visit_parses_index() {
        assert_eq!(Intent::parse("/visit 2"), Intent::Visit(Some(2)));
        assert_eq!(Intent::parse("/visit"), Intent::Visit(None));
        assert_eq!(Intent::parse("/visit abc"), Intent::Visit(None));
        assert_eq!(Intent::parse("/visit -1"), Intent::Visit(None));
    }

    #[test]
    fn commands_tolerate_bot_suffix_and_case() {
        assert_eq!(Intent::parse("/find@SportBot"), Intent::Find);
        assert_eq!(Intent::parse("/FIND"), Intent::Find);
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(Intent::parse("  /events  "), Intent::Events);
    }

    #[test]
    fn unknown_commands_fall_through_to_text() {
        assert_eq!(
            Intent::parse("/unknown"),
            Intent::Text("/unknown".to_string())
        );
    }

    #[test]
    fn free_text_stays_text() {
        assert_eq!(
            Intent::parse("Где поплавать?"),
            Intent::Text("Где поплавать?".to_string())
        );
        // A command word without the slash is just text.
        assert_eq!(Intent::parse("start"), Intent::Text("start".to_string()));
    }
}
