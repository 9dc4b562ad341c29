use crate::cli::actions::Action;
use anyhow::Result;
use std::path::PathBuf;

pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    Ok(Action::Server {
        port: matches.get_one::<u16>("port").copied().unwrap_or(6966),
        db: matches
            .get_one("db")
            .map(|s: &String| s.to_string())
            .unwrap_or_else(|| "data.db".to_string()),
        icon_cache: matches
            .get_one("icon-cache")
            .map(|s: &String| PathBuf::from(s))
            .unwrap_or_else(|| PathBuf::from("icon_cache")),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;

    #[test]
    fn test_handler_server_action() {
        let matches = commands::new().get_matches_from(vec![
            "navhub",
            "--port",
            "7000",
            "--db",
            "nav.db",
            "--icon-cache",
            "icons",
        ]);

        let Ok(Action::Server {
            port,
            db,
            icon_cache,
        }) = handler(&matches)
        else {
            panic!("expected server action");
        };

        assert_eq!(port, 7000);
        assert_eq!(db, "nav.db");
        assert_eq!(icon_cache, PathBuf::from("icons"));
    }
}
