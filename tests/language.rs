use referat::domain::{Language, ModelKey};

#[test]
fn given_supported_codes_when_parsing_then_language_and_whisper_code_round_trip() {
    for code in ["vi", "en", "zh", "ja", "ko", "fr", "de", "es"] {
        let language = Language::from_code(code, None);
        assert_eq!(language.whisper_code(), Some(code));
    }
}

#[test]
fn given_unknown_code_when_parsing_then_other_with_custom_name() {
    let language = Language::from_code("tl", Some("Tagalog".to_string()));

    assert_eq!(language, Language::Other(Some("Tagalog".to_string())));
    assert_eq!(language.whisper_code(), None);
    assert_eq!(language.display_name(), "Tagalog");
}

#[test]
fn given_unknown_code_without_name_when_parsing_then_generic_display_name() {
    let language = Language::from_code("xx", None);

    assert_eq!(language.display_name(), "the language used in the meeting");
}

#[test]
fn given_uppercase_code_when_parsing_then_case_insensitive() {
    assert_eq!(Language::from_code("VI", None), Language::Vietnamese);
}

#[test]
fn given_vietnamese_when_selecting_model_then_medium_variant_with_hint() {
    let key = ModelKey::for_language(&Language::Vietnamese);

    assert_eq!(key.name, "medium");
    assert_eq!(key.language_hint.as_deref(), Some("vi"));
}

#[test]
fn given_other_languages_when_selecting_model_then_default_variant() {
    let english = ModelKey::for_language(&Language::English);
    let unknown = ModelKey::for_language(&Language::Other(None));

    assert_eq!(english.name, "base");
    assert_eq!(english.language_hint.as_deref(), Some("en"));
    assert_eq!(unknown.name, "base");
    assert_eq!(unknown.language_hint, None);
}

#[test]
fn given_default_keys_when_preloading_then_base_and_vietnamese_variants_listed() {
    let keys = ModelKey::default_keys();

    assert!(keys.contains(&ModelKey::new("base", None)));
    assert!(keys.contains(&ModelKey::new("medium", Some("vi".to_string()))));
}
