//! Unit tests for configuration.

#[cfg(test)]
mod path_expansion_tests {
    use super::super::Config;
    use std::path::PathBuf;

    #[test]
    fn expand_path_handles_tilde() {
        let result = Config::expand_path("~/test");
        assert!(!result.to_string_lossy().starts_with('~'));
    }

    #[test]
    fn expand_path_handles_absolute_path() {
        let result = Config::expand_path("/absolute/path");
        assert_eq!(result, PathBuf::from("/absolute/path"));
    }
}

#[cfg(test)]
mod default_config_tests {
    use super::super::Config;

    #[test]
    fn default_has_database_path() {
        let config = Config::default();
        assert!(config.database.to_string_lossy().contains("sportbot"));
        assert!(config.database.to_string_lossy().ends_with(".db"));
    }

    #[test]
    fn default_progression_matches_engine_constants() {
        let config = Config::default();
        assert_eq!(config.progression.xp_per_visit, 10);
        assert_eq!(config.progression.level_up_factor, 100);
    }

    #[test]
    fn default_generation_is_bounded() {
        let config = Config::default();
        assert_eq!(config.generation.timeout_secs, 10);
        assert!(config.generation.api_url.ends_with("/chat/completions"));
    }

    #[test]
    fn default_session_limits() {
        let config = Config::default();
        assert_eq!(config.session.min_query_chars, 5);
        assert!(config.session.idle_ttl_secs > 0);
    }
}

#[cfg(test)]
mod roundtrip_tests {
    use super::super::Config;

    #[test]
    fn save_and_reload_preserves_settings() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.generation.model = "mistral-large".to_string();
        config.progression.xp_per_visit = 25;
        config.save_to_path(&path).expect("save");

        let reloaded = Config::load_from_path(&path).expect("load");
        assert_eq!(reloaded.generation.model, "mistral-large");
        assert_eq!(reloaded.progression.xp_per_visit, 25);
    }

    #[test]
    fn ensure_at_creates_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::ensure_at(&path).expect("ensure");
        assert!(path.exists());
        assert_eq!(config.session.min_query_chars, 5);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[generation]\nmodel = \"mistral-tiny\"\n").expect("write");

        let config = Config::load_from_path(&path).expect("load");
        assert_eq!(config.generation.model, "mistral-tiny");
        assert_eq!(config.progression.level_up_factor, 100);
    }
}
