use std::io::Write;

use pixcombine_core::stack::{MinMaxParams, SigmaClipParams};
use pixcombine_core::{CombineConfig, CombineError, CombineMethod, ParallelMode};

// ---------------------------------------------------------------------------
// CombineMethod text form
// ---------------------------------------------------------------------------

#[test]
fn test_parse_plain_methods() {
    assert_eq!("mean".parse::<CombineMethod>().unwrap(), CombineMethod::Mean);
    assert_eq!("Median".parse::<CombineMethod>().unwrap(), CombineMethod::Median);
}

#[test]
fn test_parse_parameterized_methods() {
    assert_eq!(
        "minmax:1,2".parse::<CombineMethod>().unwrap(),
        CombineMethod::MinMax(MinMaxParams { nmin: 1, nmax: 2 })
    );
    assert_eq!(
        "sigma-clip: 2.5, 3".parse::<CombineMethod>().unwrap(),
        CombineMethod::SigmaClip(SigmaClipParams {
            low: 2.5,
            high: 3.0
        })
    );
    assert_eq!(
        "quantileclip:0.1".parse::<CombineMethod>().unwrap(),
        CombineMethod::quantile_clip(0.1).unwrap()
    );
}

#[test]
fn test_parse_unknown_method() {
    let err = "winsorize".parse::<CombineMethod>().unwrap_err();
    assert!(matches!(err, CombineError::UnsupportedMethod(ref name) if name == "winsorize"));
}

#[test]
fn test_parse_bad_parameters() {
    for text in [
        "minmax",
        "minmax:1",
        "minmax:1,2,3",
        "minmax:-1,2",
        "sigmaclip:a,b",
        "quantileclip:0.9",
        "mean:3",
    ] {
        let err = text.parse::<CombineMethod>().unwrap_err();
        assert!(
            matches!(err, CombineError::InvalidParameter(_)),
            "{text} gave {err:?}"
        );
    }
}

#[test]
fn test_display_round_trips_through_parse() {
    let methods = [
        CombineMethod::mean(),
        CombineMethod::median(),
        CombineMethod::minmax(2, 0),
        CombineMethod::sigma_clip(1.5, 4.0),
        CombineMethod::quantile_clip(0.25).unwrap(),
    ];
    for method in methods {
        let text = method.to_string();
        assert_eq!(text.parse::<CombineMethod>().unwrap(), method, "{text}");
    }
}

#[test]
fn test_method_names() {
    assert_eq!(CombineMethod::Mean.name(), "mean");
    assert_eq!(CombineMethod::minmax(0, 0).name(), "minmax");
    assert_eq!(CombineMethod::sigma_clip(1.0, 1.0).name(), "sigmaclip");
}

// ---------------------------------------------------------------------------
// Serde
// ---------------------------------------------------------------------------

#[test]
fn test_method_json_shape() {
    let json = serde_json::to_value(CombineMethod::minmax(1, 3)).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "kind": "minmax", "nmin": 1, "nmax": 3 })
    );

    let back: CombineMethod =
        serde_json::from_str(r#"{ "kind": "quantile_clip", "fraction": 0.2 }"#).unwrap();
    assert_eq!(back, CombineMethod::quantile_clip(0.2).unwrap());
}

#[test]
fn test_deserialize_rejects_bad_quantile_fraction() {
    let result: Result<CombineMethod, _> =
        serde_json::from_str(r#"{ "kind": "quantile_clip", "fraction": 0.45 }"#);
    assert!(result.is_err());
}

// ---------------------------------------------------------------------------
// CombineConfig
// ---------------------------------------------------------------------------

#[test]
fn test_config_defaults() {
    let config = CombineConfig::default();
    assert_eq!(config.method, CombineMethod::Mean);
    assert_eq!(config.parallel, ParallelMode::Auto);
    assert_eq!(format!("{}", config.parallel), "Auto");
}

#[test]
fn test_parallel_mode_threshold() {
    assert!(!ParallelMode::Auto.should_parallelize(100));
    assert!(ParallelMode::Auto.should_parallelize(512 * 512));
    assert!(ParallelMode::Always.should_parallelize(1));
    assert!(!ParallelMode::Never.should_parallelize(1 << 30));
}

#[test]
fn test_config_from_toml() {
    let config = CombineConfig::from_toml_str(
        r#"
parallel = "never"

[method]
kind = "sigma_clip"
low = 2.0
high = 4.0
"#,
    )
    .unwrap();
    assert_eq!(config.parallel, ParallelMode::Never);
    assert_eq!(config.method, CombineMethod::sigma_clip(2.0, 4.0));
}

#[test]
fn test_config_empty_toml_is_default() {
    let config = CombineConfig::from_toml_str("").unwrap();
    assert_eq!(config, CombineConfig::default());
}

#[test]
fn test_config_toml_round_trip() {
    let config = CombineConfig::new(CombineMethod::minmax(1, 1)).with_parallel(ParallelMode::Always);
    let text = config.to_toml_string().unwrap();
    assert_eq!(CombineConfig::from_toml_str(&text).unwrap(), config);
}

#[test]
fn test_config_invalid_toml() {
    let err = CombineConfig::from_toml_str("[method]\nkind = \"quantile_clip\"\nfraction = 0.7\n")
        .unwrap_err();
    assert!(matches!(err, CombineError::Config(_)));
}

#[test]
fn test_config_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().expect("create temp file");
    writeln!(file, "[method]\nkind = \"median\"").expect("write config");
    file.flush().expect("flush");

    let config = CombineConfig::load(file.path()).unwrap();
    assert_eq!(config.method, CombineMethod::Median);
}

#[test]
fn test_config_load_missing_file() {
    let err = CombineConfig::load(std::path::Path::new("/nonexistent/combine.toml")).unwrap_err();
    assert!(matches!(err, CombineError::Io(_)));
}
