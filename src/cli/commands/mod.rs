use clap::{
    builder::{
        styling::{AnsiColor, Effects, Styles},
        ValueParser,
    },
    Arg, ColorChoice, Command,
};

pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        if let Ok(parsed) = level.parse::<u8>() {
            // Successfully parsed as a number
            if parsed <= 5 {
                return Ok(parsed);
            }
        }

        match level.to_lowercase().as_str() {
            "error" => Ok(0),
            "warn" => Ok(1),
            "info" => Ok(2),
            "debug" => Ok(3),
            "trace" => Ok(4),
            _ => Err("invalid log level".to_string()),
        }
    })
}

pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    Command::new("navhub")
        .about("Personal link directory backend")
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("6966")
                .env("NAVHUB_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("db")
                .short('d')
                .long("db")
                .help("Path to the SQLite database file (created if missing)")
                .default_value("data.db")
                .env("NAVHUB_DB"),
        )
        .arg(
            Arg::new("icon-cache")
                .long("icon-cache")
                .help("Directory for the icon proxy disk cache")
                .default_value("icon_cache")
                .env("NAVHUB_ICON_CACHE"),
        )
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbose")
                .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
                .env("NAVHUB_LOG_LEVEL")
                .global(true)
                .action(clap::ArgAction::Count)
                .value_parser(validator_log_level()),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "navhub");
        assert_eq!(
            command.get_about().unwrap().to_string(),
            "Personal link directory backend"
        );
        assert_eq!(
            command.get_version().unwrap().to_string(),
            env!("CARGO_PKG_VERSION")
        );
    }

    #[test]
    fn test_defaults() {
        temp_env::with_vars(
            [
                ("NAVHUB_PORT", None::<String>),
                ("NAVHUB_DB", None),
                ("NAVHUB_ICON_CACHE", None),
            ],
            || {
                let command = new();
                let matches = command.get_matches_from(vec!["navhub"]);

                assert_eq!(matches.get_one::<u16>("port").copied(), Some(6966));
                assert_eq!(
                    matches.get_one::<String>("db").map(String::as_str),
                    Some("data.db")
                );
                assert_eq!(
                    matches.get_one::<String>("icon-cache").map(String::as_str),
                    Some("icon_cache")
                );
            },
        );
    }

    #[test]
    fn test_check_port_and_db() {
        let command = new();
        let matches = command.get_matches_from(vec![
            "navhub",
            "--port",
            "8080",
            "--db",
            "/var/lib/navhub/data.db",
            "--icon-cache",
            "/var/cache/navhub/icons",
        ]);

        assert_eq!(matches.get_one::<u16>("port").copied(), Some(8080));
        assert_eq!(
            matches.get_one::<String>("db").map(String::as_str),
            Some("/var/lib/navhub/data.db")
        );
        assert_eq!(
            matches.get_one::<String>("icon-cache").map(String::as_str),
            Some("/var/cache/navhub/icons")
        );
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                ("NAVHUB_PORT", Some("443")),
                ("NAVHUB_DB", Some("/data/nav.db")),
                ("NAVHUB_ICON_CACHE", Some("/data/icons")),
                ("NAVHUB_LOG_LEVEL", Some("info")),
            ],
            || {
                let command = new();
                let matches = command.get_matches_from(vec!["navhub"]);
                assert_eq!(matches.get_one::<u16>("port").copied(), Some(443));
                assert_eq!(
                    matches.get_one::<String>("db").map(String::as_str),
                    Some("/data/nav.db")
                );
                assert_eq!(
                    matches.get_one::<String>("icon-cache").map(String::as_str),
                    Some("/data/icons")
                );
                assert_eq!(matches.get_one::<u8>("verbosity").copied(), Some(2));
            },
        );
    }

    #[test]
    fn test_check_log_level_env() {
        // loop cover all possible value_parse
        let levels = vec!["error", "warn", "info", "debug", "trace"];
        for (index, &level) in levels.iter().enumerate() {
            temp_env::with_vars([("NAVHUB_LOG_LEVEL", Some(level))], || {
                let command = new();
                let matches = command.get_matches_from(vec!["navhub"]);
                assert_eq!(
                    matches.get_one::<u8>("verbosity").copied(),
                    Some(index as u8)
                );
            });
        }
    }

    #[test]
    fn test_check_log_level_verbosity() {
        // loop cover all possible value_parse
        let levels = vec!["error", "warn", "info", "debug", "trace"];
        for (index, _) in levels.iter().enumerate() {
            temp_env::with_vars([("NAVHUB_LOG_LEVEL", None::<String>)], || {
                let mut args = vec!["navhub".to_string()];

                // Add the appropriate number of "-v" flags based on the index
                if index > 0 {
                    let v = format!("-{}", "v".repeat(index));
                    args.push(v);
                }

                let command = new();

                let matches = command.get_matches_from(args);

                assert_eq!(
                    matches.get_one::<u8>("verbosity").copied(),
                    Some(index as u8)
                );
            });
        }
    }
}
