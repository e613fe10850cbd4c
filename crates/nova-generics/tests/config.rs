use nova_generics::{ConfigError, GenericsConfig, Resolver};
use nova_types::{Type, TypeEnv, TypeStore};

use pretty_assertions::assert_eq;

#[test]
fn loads_config_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("generics.toml");
    std::fs::write(&path, "max_scan_depth = 1\npath_hop_limit = 4\n").unwrap();

    let config = GenericsConfig::load_from_path(&path).unwrap();
    assert_eq!(
        config,
        GenericsConfig {
            max_scan_depth: 1,
            path_hop_limit: 4,
        }
    );

    // `List<String>` needs two steps to erase.
    let env = TypeStore::with_minimal_jdk();
    let list = env.class_id("java.util.List").unwrap();
    let nested = Type::class(list, vec![Type::Class(env.well_known().string)]);
    let resolver = Resolver::with_config(&env, config);
    assert_eq!(resolver.config(), &config);
    assert_eq!(resolver.guess_class(&nested), list);

    let shallow = Resolver::with_config(
        &env,
        GenericsConfig {
            max_scan_depth: 0,
            ..config
        },
    );
    assert_eq!(shallow.guess_class(&nested), env.well_known().object);
}

#[test]
fn missing_file_reports_its_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    let err = GenericsConfig::load_from_path(&path).unwrap_err();
    match &err {
        ConfigError::Io { path: reported, .. } => {
            assert_eq!(reported, &path.display().to_string())
        }
        other => panic!("expected io error, got {other:?}"),
    }
    assert!(err.to_string().starts_with("failed to read config file"));
}

#[test]
fn invalid_values_are_toml_errors() {
    let err = GenericsConfig::load_from_str("max_scan_depth = \"deep\"").unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)));
    assert!(err.to_string().starts_with("failed to parse toml config"));
}

#[test]
fn json_schema_lists_both_knobs() {
    let schema = serde_json::to_value(GenericsConfig::json_schema()).unwrap();
    let properties = &schema["properties"];
    assert_eq!(properties["max_scan_depth"]["default"], 5);
    assert_eq!(properties["path_hop_limit"]["default"], 2);
}
