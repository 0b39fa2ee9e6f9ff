use autoshift_common::globals::{self, flags};

use super::*;

fn compile_err(source: &str) -> (String, &str) {
    match compile(source) {
        Ok(_) => panic!("expected an error compiling {source:?}"),
        Err(err) => {
            let span = err.span.clone().expect("span");
            (err.message, &source[span])
        }
    }
}

#[test]
fn empty_source() {
    let config = compile("").unwrap();
    assert_eq!(config.serialize(), vec![PROTOCOL_VERSION, 0]);

    let config = compile("# nothing\n\n[global]\n   # still nothing\n").unwrap();
    assert_eq!(config.serialize(), vec![PROTOCOL_VERSION, 0]);
}

#[test]
fn global_values() {
    let config = compile(
        r#"
[global]
auto_shift_timeout = 150 # shorter
tapping_term=180
retro_shift = true
auto_shift_numeric = false
"#,
    )
    .unwrap();

    assert_eq!(config.value(globals::AUTO_SHIFT_TIMEOUT), 150);
    assert_eq!(config.value(globals::TAPPING_TERM), 180);
    assert!(!config.is_assigned(globals::TAP_CODE_DELAY));

    let flags_value =
        (globals::AUTO_SHIFT_FLAGS_DEFAULT | flags::RETRO_SHIFT) & !flags::NUMERIC;
    assert_eq!(
        config.serialize(),
        vec![
            PROTOCOL_VERSION,
            3,
            globals::AUTO_SHIFT_TIMEOUT,
            150,
            globals::TAPPING_TERM,
            180,
            globals::AUTO_SHIFT_FLAGS,
            flags_value
        ]
    );

    assert_eq!(config.global("retro_shift").as_deref(), Some("true"));
    assert_eq!(config.global("auto_shift_numeric").as_deref(), Some("false"));
    assert_eq!(config.global("auto_shift_delay").as_deref(), Some("150"));
    assert_eq!(config.global("nope"), None);
}

#[test]
fn last_assignment_wins() {
    let config = compile("[global]\nretro_shift = true\nretro_shift = false\n").unwrap();
    assert!(!config.global("retro_shift").is_some_and(|v| v == "true"));
    assert!(config.is_assigned(globals::AUTO_SHIFT_FLAGS));
}

#[test]
fn describe_lists_everything() {
    let config = compile("[global]\ntap_code_delay = 5\n").unwrap();
    let d = config.describe();
    assert_eq!(d.len(), 14);
    assert_eq!(d[0], ("auto_shift_timeout", "175".to_string()));
    assert!(d.contains(&("tap_code_delay", "5".to_string())));
    assert!(d.contains(&("auto_shift_repeat", "true".to_string())));
    assert!(d.contains(&("auto_shift_modifiers", "false".to_string())));
}

#[test]
fn binary_round_trip() {
    let config = compile("[global]\nretro_shift_timeout = 0\nauto_shift_alpha = off\n").unwrap();
    let bin = config.serialize();
    assert_eq!(SettingsConfig::deserialize(&bin).unwrap(), config);

    assert!(SettingsConfig::deserialize(&[]).is_err());
    assert!(SettingsConfig::deserialize(&[PROTOCOL_VERSION + 1, 0]).is_err());
    assert!(SettingsConfig::deserialize(&[PROTOCOL_VERSION, 1, 0]).is_err());
    assert!(SettingsConfig::deserialize(&[PROTOCOL_VERSION, 1, 9, 0]).is_err());
}

#[test]
fn errors() {
    assert_eq!(
        compile_err("tapping_term = 5"),
        ("expected '['".to_string(), "tapping_term = 5")
    );
    assert_eq!(
        compile_err("[global\n"),
        ("missing ']'".to_string(), "[")
    );
    assert_eq!(
        compile_err("[matrix]\n"),
        ("Unknown section 'matrix'".to_string(), "matrix")
    );
    assert_eq!(
        compile_err("[global]\n  tapping_term 5\n"),
        ("Missing =".to_string(), "tapping_term 5")
    );
    assert_eq!(
        compile_err("[global]\ntapping_term =   \n"),
        ("Missing RHS".to_string(), "tapping_term =")
    );
    assert_eq!(
        compile_err("[global]\n= 5\n"),
        ("Missing name".to_string(), "=")
    );
    assert_eq!(
        compile_err("[global]\ntapping_term = 5 6\n"),
        ("Only one value may be assigned".to_string(), " 6")
    );
    assert_eq!(
        compile_err("[global]\ntaping_term = 5\n"),
        ("Invalid global 'taping_term'".to_string(), "taping_term")
    );
    assert_eq!(
        compile_err("[global]\nauto_shift_timeout = 5001\n"),
        (
            "Invalid duration; only 0 to 5000 milliseconds are valid".to_string(),
            "5001"
        )
    );
    assert_eq!(
        compile_err("[global]\nretro_shift = 1\n"),
        (
            "Invalid switch '1'; use true or false".to_string(),
            "1"
        )
    );
}
