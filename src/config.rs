use crate::stats::DEFAULT_RECENT_GAMES;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Server settings read from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// How many recent games of a type feed a player's handicap average
    pub recent_games: usize,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let bind_addr =
            lookup("CUESCORE_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        let recent_games = lookup("CUESCORE_RECENT_GAMES")
            .and_then(|s| s.parse().ok())
            .filter(|n: &usize| *n > 0)
            .unwrap_or(DEFAULT_RECENT_GAMES);

        Self {
            bind_addr,
            recent_games,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    fn config_with(vars: &[(&str, &str)]) -> ServerConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let config = ServerConfig::default();

        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.recent_games, 10);
    }

    #[test]
    fn reads_overrides() {
        let config = config_with(&[
            ("CUESCORE_BIND_ADDR", "127.0.0.1:8080"),
            ("CUESCORE_RECENT_GAMES", "25"),
        ]);

        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.recent_games, 25);
    }

    #[rstest]
    #[case("zero", "0")]
    #[case("negative", "-3")]
    #[case("garbage", "lots")]
    fn unusable_window_falls_back_to_default(#[case] _label: &str, #[case] value: &str) {
        let config = config_with(&[("CUESCORE_RECENT_GAMES", value)]);

        assert_eq!(config.recent_games, DEFAULT_RECENT_GAMES);
    }
}
