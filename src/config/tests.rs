use super::*;

#[test]
fn test_builtin_defaults() {
    let config = CoreConfig::default();
    assert_eq!(config.types.default_fp, PrimitiveType::F32);
    assert_eq!(config.types.default_ip, PrimitiveType::I32);
    assert_eq!(config.max_num_args, 8);
    assert_eq!(config.max_num_rets, 1);
}

#[test]
fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kernarg.toml");
    std::fs::write(
        &path,
        r#"
# precision
[types]
default_fp = "f64"
default_ip = "int64"

[limits]
max_args = 16
max_rets = 4
"#,
    )
    .unwrap();

    let config = CoreConfig::load(&path).unwrap();
    assert_eq!(config.types.default_fp, PrimitiveType::F64);
    assert_eq!(config.types.default_ip, PrimitiveType::I64);
    assert_eq!(config.max_num_args, 16);
    assert_eq!(config.max_num_rets, 4);
}

#[test]
fn test_partial_file_keeps_defaults() {
    let config = CoreConfig::parse_toml("[limits]\nmax_args = 3\n", Path::new("p.toml")).unwrap();
    assert_eq!(config.max_num_args, 3);
    assert_eq!(config.max_num_rets, 1);
    assert_eq!(config.types, TypeDefaults::default());
}

#[test]
fn test_unknown_keys_ignored() {
    let src = "[types]\ndefault_fp = \"f32\"\narch = \"x64\"\n[backend]\nname = \"cuda\"\n";
    assert!(CoreConfig::parse_toml(src, Path::new("p.toml")).is_ok());
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = CoreConfig::load(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn test_rejects_integral_default_fp() {
    let err = CoreConfig::parse_toml("[types]\ndefault_fp = \"i32\"\n", Path::new("p.toml"))
        .unwrap_err();
    assert!(err.to_string().contains("default_fp must be a real type"));
}

#[test]
fn test_rejects_real_default_ip() {
    let err = CoreConfig::parse_toml("[types]\ndefault_ip = \"f64\"\n", Path::new("p.toml"))
        .unwrap_err();
    assert!(err.to_string().contains("default_ip must be an integral type"));
}

#[test]
fn test_rejects_bad_values() {
    for src in [
        "[types]\ndefault_fp = \"bool\"\n",
        "[limits]\nmax_args = many\n",
        "[limits]\nmax_args = 0\n",
        "[limits]\nmax_rets = 0\n",
        "[limits]\nmax_args\n",
    ] {
        assert!(
            CoreConfig::parse_toml(src, Path::new("p.toml")).is_err(),
            "accepted: {}",
            src
        );
    }
}

#[test]
fn test_error_mentions_path() {
    let err =
        CoreConfig::parse_toml("[limits]\nmax_rets = -1\n", Path::new("cfg/k.toml")).unwrap_err();
    let msg = err.to_string();
    assert!(msg.starts_with("cfg/k.toml: "), "{}", msg);
    assert!(msg.contains("invalid limits.max_rets"));
}
