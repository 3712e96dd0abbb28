//! Unit tests for progression rules.

#[cfg(test)]
mod progress_tests {
    use super::super::Progression;

    #[test]
    fn progress_midway_through_level_two() {
        let progress = Progression::default().progress(2, 150);
        assert_eq!(progress.threshold, 200);
        assert_eq!(progress.percent, 75);
        assert_eq!(progress.filled_segments, 7);
    }

    #[test]
    fn progress_caps_at_one_hundred_percent() {
        let progress = Progression::default().progress(1, 250);
        assert_eq!(progress.percent, 100);
        assert_eq!(progress.filled_segments, 10);
    }

    #[test]
    fn progress_at_zero_experience() {
        let progress = Progression::default().progress(1, 0);
        assert_eq!(progress.threshold, 100);
        assert_eq!(progress.percent, 0);
        assert_eq!(progress.filled_segments, 0);
    }

    #[test]
    fn progress_is_total_on_garbage_level() {
        // Levels below 1 never come from the store; the clamp keeps the
        // function from dividing by zero anyway.
        let progress = Progression::default().progress(0, 50);
        assert_eq!(progress.threshold, 100);
        assert_eq!(progress.percent, 50);
    }

    #[test]
    fn custom_factor_changes_threshold() {
        let progress = Progression::new(10, 50).progress(2, 75);
        assert_eq!(progress.threshold, 100);
        assert_eq!(progress.percent, 75);
    }
}

#[cfg(test)]
mod catalog_tests {
    use super::super::ACHIEVEMENT_CATALOG;

    #[test]
    fn catalog_covers_expected_levels() {
        let levels: Vec<i64> = ACHIEVEMENT_CATALOG.iter().map(|(lvl, _, _)| *lvl).collect();
        assert_eq!(levels, vec![3, 5, 10]);
    }

    #[test]
    fn catalog_names_are_unique() {
        let mut names: Vec<&str> = ACHIEVEMENT_CATALOG.iter().map(|(_, n, _)| *n).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), ACHIEVEMENT_CATALOG.len());
    }
}
