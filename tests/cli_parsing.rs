use agentdeck::cli::{ClearField, Cli, Commands};
use agentdeck::{AgentCategory, AgentStatus, CategoryFilter, SortKey, StatusFilter};
use clap::Parser;

#[test]
fn test_parse_list_with_criteria() {
    let cli = Cli::try_parse_from([
        "agentdeck",
        "list",
        "--search",
        "support",
        "--status",
        "active",
        "--category",
        "customer-support",
        "--sort",
        "name",
    ])
    .unwrap();

    match cli.command {
        Commands::List(args) => {
            assert_eq!(args.criteria.search.as_deref(), Some("support"));
            assert_eq!(args.criteria.status, Some(StatusFilter::Only(AgentStatus::Active)));
            assert_eq!(
                args.criteria.category,
                Some(CategoryFilter::Only(AgentCategory::CustomerSupport))
            );
            assert_eq!(args.criteria.sort, Some(SortKey::NameAscending));
            assert!(!args.watch);
        }
        _ => panic!("Wrong command"),
    }
}

#[test]
fn test_parse_list_rejects_unknown_sort() {
    assert!(Cli::try_parse_from(["agentdeck", "list", "--sort", "size"]).is_err());
}

#[test]
fn test_parse_global_flags() {
    let cli = Cli::try_parse_from([
        "agentdeck",
        "templates",
        "--json",
        "--config",
        "/tmp/agentdeck.yaml",
    ])
    .unwrap();

    assert!(cli.json);
    assert_eq!(
        cli.config.as_deref(),
        Some(std::path::Path::new("/tmp/agentdeck.yaml"))
    );
    assert!(matches!(cli.command, Commands::Templates));
}

#[test]
fn test_parse_create_from_template() {
    let cli = Cli::try_parse_from([
        "agentdeck",
        "create",
        "--template",
        "sales-assistant",
        "--tags",
        "emea,b2b",
    ])
    .unwrap();

    match cli.command {
        Commands::Create(args) => {
            assert_eq!(args.template.as_deref(), Some("sales-assistant"));
            assert!(args.name.is_none());
            assert_eq!(args.fields.tags, vec!["emea", "b2b"]);
        }
        _ => panic!("Wrong command"),
    }
}

#[test]
fn test_parse_create_requires_name_or_template() {
    assert!(Cli::try_parse_from(["agentdeck", "create"]).is_err());
    assert!(Cli::try_parse_from(["agentdeck", "create", "--name", "Helper"]).is_ok());
}

#[test]
fn test_parse_update() {
    let cli = Cli::try_parse_from([
        "agentdeck",
        "update",
        "abc-123",
        "--status",
        "archived",
        "--description",
        "",
    ])
    .unwrap();

    match cli.command {
        Commands::Update(args) => {
            assert_eq!(args.id, "abc-123");
            let patch = args.to_patch();
            assert_eq!(patch.status, Some(Some(AgentStatus::Archived)));
            assert_eq!(patch.description.as_deref(), Some(""));
            assert!(patch.name.is_none());
        }
        _ => panic!("Wrong command"),
    }
}

#[test]
fn test_parse_update_clear_fields() {
    let cli = Cli::try_parse_from([
        "agentdeck",
        "update",
        "abc-123",
        "--clear",
        "icon,category",
        "--color",
        "#ffffff",
    ])
    .unwrap();

    match cli.command {
        Commands::Update(args) => {
            assert_eq!(args.clear, vec![ClearField::Icon, ClearField::Category]);
            let patch = args.to_patch();
            assert_eq!(patch.icon, Some(None));
            assert_eq!(patch.category, Some(None));
            assert_eq!(patch.color, Some(Some("#ffffff".to_string())));
            assert!(patch.status.is_none());
        }
        _ => panic!("Wrong command"),
    }

    assert!(Cli::try_parse_from(["agentdeck", "update", "a1", "--clear", "name"]).is_err());
}

#[test]
fn test_parse_replay() {
    let cli = Cli::try_parse_from([
        "agentdeck",
        "replay",
        "--seed",
        "seed.json",
        "--events",
        "events.jsonl",
        "--status",
        "draft",
    ])
    .unwrap();

    match cli.command {
        Commands::Replay(args) => {
            assert_eq!(args.seed, std::path::PathBuf::from("seed.json"));
            assert_eq!(args.events, std::path::PathBuf::from("events.jsonl"));
            assert_eq!(args.criteria.status, Some(StatusFilter::Only(AgentStatus::Draft)));
        }
        _ => panic!("Wrong command"),
    }
}

#[test]
fn test_parse_show_and_delete() {
    let show = Cli::try_parse_from(["agentdeck", "show", "a1"]).unwrap();
    assert!(matches!(show.command, Commands::Show { id } if id == "a1"));

    let delete = Cli::try_parse_from(["agentdeck", "delete", "a1"]).unwrap();
    assert!(matches!(delete.command, Commands::Delete { id } if id == "a1"));
}
