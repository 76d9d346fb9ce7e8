use super::*;

#[test]
fn parses_db_ping_command() {
    let cli =
        Cli::try_parse_from(["brandpulse-cli", "db", "ping"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Ping
        })
    ));
}

#[test]
fn parses_db_migrate_command() {
    let cli =
        Cli::try_parse_from(["brandpulse-cli", "db", "migrate"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Migrate
        })
    ));
}

#[test]
fn db_seed_defaults_to_config_path() {
    let cli =
        Cli::try_parse_from(["brandpulse-cli", "db", "seed"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Seed { ref file }
        }) if file == &PathBuf::from("config/brands.yaml")
    ));
}

#[test]
fn db_seed_accepts_explicit_file() {
    let cli = Cli::try_parse_from(["brandpulse-cli", "db", "seed", "--file", "/tmp/custom.yaml"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Seed { ref file }
        }) if file == &PathBuf::from("/tmp/custom.yaml")
    ));
}

#[test]
fn parses_monitor_with_brand_name() {
    let cli = Cli::try_parse_from(["brandpulse-cli", "monitor", "Acme"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Monitor { ref name }) if name == "Acme"
    ));
}

#[test]
fn monitor_requires_a_name() {
    assert!(Cli::try_parse_from(["brandpulse-cli", "monitor"]).is_err());
}

#[test]
fn parses_alerts_list_with_limit() {
    let cli = Cli::try_parse_from(["brandpulse-cli", "alerts", "list", "--limit", "10"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Alerts {
            command: AlertCommands::List { limit: 10 }
        })
    ));
}

#[test]
fn parses_alerts_sent_with_id() {
    let cli = Cli::try_parse_from(["brandpulse-cli", "alerts", "sent", "42"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Alerts {
            command: AlertCommands::Sent { id: 42 }
        })
    ));
}

#[test]
fn report_defaults() {
    let cli = Cli::try_parse_from(["brandpulse-cli", "report"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Report {
            days: 7,
            ref format,
            out: None
        }) if format == "csv"
    ));
}

#[test]
fn report_accepts_days_format_and_out() {
    let cli = Cli::try_parse_from([
        "brandpulse-cli",
        "report",
        "--days",
        "30",
        "--format",
        "json",
        "--out",
        "/tmp/report.json",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Report {
            days: 30,
            ref format,
            out: Some(ref path)
        }) if format == "json" && path == &PathBuf::from("/tmp/report.json")
    ));
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["brandpulse-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}
