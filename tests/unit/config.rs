use rand::{SeedableRng, rngs::StdRng};

use super::*;

#[test]
fn empty_object_takes_every_default() {
    let cfg = WelcomeConfig::from_json_str("{}").unwrap();
    assert_eq!(cfg, WelcomeConfig::default());
    assert_eq!(cfg.background, PathBuf::from("bg.png"));
    assert_eq!(cfg.fps.get(), 6);
    assert_eq!(cfg.hold_frames, 30);
    assert_eq!(cfg.attachment_limit_bytes, 24 * 1024 * 1024);
}

#[test]
fn fields_override_defaults() {
    let cfg = WelcomeConfig::from_json_str(
        r##"{ "fps": 12, "text_color": "#ff004c", "overlay_opacity": 0.5, "font_dirs": ["fonts"] }"##,
    )
    .unwrap();
    assert_eq!(cfg.fps.get(), 12);
    assert_eq!(cfg.text_color, Some(AccentColor::CRIMSON));
    assert_eq!(cfg.overlay_opacity, 0.5);
    assert_eq!(cfg.font_dirs, vec![PathBuf::from("fonts")]);
}

#[test]
fn palette_names_are_accepted_for_text_color() {
    let cfg = WelcomeConfig::from_json_str(r#"{ "text_color": "amber" }"#).unwrap();
    assert_eq!(cfg.text_color, Some(AccentColor::AMBER));
}

#[test]
fn bad_values_are_rejected() {
    assert!(matches!(
        WelcomeConfig::from_json_str(r#"{ "fps": 0 }"#),
        Err(TypebannerError::Serde(_))
    ));
    assert!(matches!(
        WelcomeConfig::from_json_str(r#"{ "overlay_opacity": 1.5 }"#),
        Err(TypebannerError::Validation(_))
    ));
    assert!(matches!(
        WelcomeConfig::from_json_str(r#"{ "attachment_limit_bytes": 0 }"#),
        Err(TypebannerError::Validation(_))
    ));
    assert!(WelcomeConfig::from_json_str(r#"{ "colour": "red" }"#).is_err());
}

#[test]
fn from_path_reads_json_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("welcome.json");
    std::fs::write(&path, r#"{ "hold_frames": 10 }"#).unwrap();
    assert_eq!(WelcomeConfig::from_path(&path).unwrap().hold_frames, 10);
    assert!(WelcomeConfig::from_path(&dir.path().join("missing.json")).is_err());
}

#[test]
fn fixed_color_wins_over_random_pick() {
    let mut rng = StdRng::seed_from_u64(7);
    let cfg = WelcomeConfig {
        text_color: Some(AccentColor::WHITE),
        ..WelcomeConfig::default()
    };
    assert_eq!(cfg.pick_color(&mut rng), AccentColor::WHITE);
}

#[test]
fn assemble_opts_carry_config_values() {
    let cfg = WelcomeConfig::default();
    let opts = cfg.assemble_opts(AccentColor::AZURE);
    assert_eq!(opts.fps.get(), 6);
    assert_eq!(opts.hold_frames, 30);
    assert_eq!(opts.background.as_deref(), Some(Path::new("bg.png")));
    assert_eq!(opts.color, AccentColor::AZURE);
}
