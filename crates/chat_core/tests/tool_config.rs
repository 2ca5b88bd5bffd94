use chat_core::{ToolConfig, ToolConfigError, TOOL_NAME};

#[test]
fn name_only_input_validates_with_all_fields_absent() {
    let config = ToolConfig::from_json(r#"{ "name": "requirementsCompliance" }"#).unwrap();

    assert_eq!(config.name, TOOL_NAME);
    assert_eq!(config.label, None);
    assert_eq!(config.description, None);
    assert_eq!(config.enabled, None);
    assert_eq!(config.config, None);
    assert!(!config.is_enabled());
}

#[test]
fn null_fields_are_treated_as_absent() {
    let config = ToolConfig::from_json(
        r#"{
            "name": "requirementsCompliance",
            "label": null,
            "description": null,
            "enabled": null,
            "config": null
        }"#,
    )
    .unwrap();

    assert_eq!(config.label, None);
    assert_eq!(config.enabled, None);
    assert_eq!(config.config, None);
}

#[test]
fn wrong_name_literal_is_rejected() {
    let err = ToolConfig::from_json(r#"{ "name": "wikipedia" }"#).unwrap_err();
    assert!(matches!(err, ToolConfigError::UnknownTool(name) if name == "wikipedia"));
}

#[test]
fn missing_name_is_a_parse_error() {
    let err = ToolConfig::from_json(r#"{ "enabled": true }"#).unwrap_err();
    assert!(matches!(err, ToolConfigError::Parse(_)));
}

#[test]
fn unknown_config_keys_are_stripped_on_save() {
    let config = ToolConfig::from_json(
        r#"{ "name": "requirementsCompliance", "config": { "legacy": 1 } }"#,
    )
    .unwrap();

    let saved = config.to_json().unwrap();
    let reloaded = ToolConfig::from_json(&saved).unwrap();
    assert_eq!(reloaded.config, Some(chat_core::EmptyConfig {}));
    assert!(!saved.contains("legacy"));
}

#[test]
fn defaults_match_admin_surface() {
    let config = ToolConfig::default();

    assert_eq!(config.name, TOOL_NAME);
    assert_eq!(config.label.as_deref(), Some(TOOL_NAME));
    assert_eq!(config.description.as_deref(), Some(""));
    assert_eq!(config.enabled, Some(false));
    assert_eq!(config.config, Some(chat_core::EmptyConfig {}));
    config.validate().unwrap();
}

#[test]
fn save_load_round_trip_preserves_fields() {
    let config = ToolConfig {
        label: Some("Requirements compliance".to_owned()),
        enabled: Some(true),
        ..ToolConfig::default()
    };

    let text = config.to_json().unwrap();
    let reloaded = ToolConfig::from_json(&text).unwrap();
    assert_eq!(reloaded, config);
}
