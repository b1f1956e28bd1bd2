// Keyintent Integration Tests
//
// Configuration files on disk wired through settings into the manager.

use std::fs;
use std::path::Path;
use std::thread;

use keyintent_core::config::parse_sources_path;
use keyintent_core::{
    BlastAction, BlastedKeyTable, CommonIntent, ConfigError, CustomIntent, FilterOutcome,
    FilterTable, Intent, KeyEvent, KeyId, KeyInputManager, KeyOrigin, PowerKey, PowerMacro,
    PowerMacroStore, ProductSourceSlot, RecordingTransport, Settings, SharedFilterTable,
    SourceFilterEngine,
};

const KEY_TABLE_JSON: &str = r#"{
    "keytable": [
        {
            "action": "MUTE_TOGGLE",
            "filter": { "sources": [
                { "sourceName": "BLUETOOTH", "sourceAccountName": ".*" },
                { "sourceName": "PRODUCT", "sourceAccountName": "SLOT_[0-2]" }
            ] }
        },
        { "action": "VOLUME_RAMP_UP", "translate": "VOLUME_UP" }
    ]
}"#;

const BLAST_TABLE_JSON: &str = r#"{
    "blastTable": [
        { "key": "BOSE_CHANNEL_UP", "devices": ["DEVICE_TYPE_CBL_SAT"] },
        { "key": 10, "devices": ["DEVICE_TYPE_CBL_SAT"] }
    ]
}"#;

const SOURCES_JSON: &str = r#"{
    "sources": [
        {
            "sourceName": "PRODUCT",
            "sourceAccountName": "TV",
            "status": "AVAILABLE",
            "details": { "deviceType": "DEVICE_TYPE_TV", "cicode": "0x1A" }
        },
        {
            "sourceName": "PRODUCT",
            "sourceAccountName": "SLOT_1",
            "status": "AVAILABLE",
            "details": { "deviceType": "DEVICE_TYPE_CBL_SAT", "cicode": "0x2B" }
        },
        { "sourceName": "BLUETOOTH", "status": "AVAILABLE" }
    ],
    "nowSelection": { "source": "PRODUCT", "sourceAccount": "SLOT_1" }
}"#;

fn write_config(dir: &Path) {
    fs::write(dir.join("KeyConfiguration.json"), KEY_TABLE_JSON).unwrap();
    fs::write(dir.join("BlastConfiguration.json"), BLAST_TABLE_JSON).unwrap();
    fs::write(dir.join("Sources.json"), SOURCES_JSON).unwrap();
    fs::write(
        dir.join("settings.toml"),
        r#"
[paths]
keys = "KeyConfiguration.json"
blast = "BlastConfiguration.json"
sources = "Sources.json"
power_macro = "state/PowerMacro.json"
"#,
    )
    .unwrap();
}

#[test]
fn test_manager_from_settings() {
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path());

    let settings = Settings::from_file(dir.path().join("settings.toml")).unwrap();
    let filter_table = FilterTable::from_json_path(settings.keys_path().unwrap()).unwrap();
    let blast_table = BlastedKeyTable::from_json_path(settings.blast_path().unwrap()).unwrap();
    let sources = parse_sources_path(settings.sources_path().unwrap()).unwrap();

    let transport = RecordingTransport::new();
    let mut manager = KeyInputManager::new(filter_table, blast_table, transport.clone());
    manager.update_sources(sources);

    assert_eq!(
        transport.cicode_notifications(),
        vec![vec!["0x1A".to_string(), "0x2B".to_string()]]
    );

    assert!(manager.process_key_event(&KeyEvent::pressed(KeyOrigin::Rf, KeyId::CHANNEL_DOWN, 0)));
    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].code_set, "0x2B");
    assert_eq!(requests[0].action, BlastAction::ContinuousPress);

    assert!(manager.is_intent_ignored(Intent::Custom(CustomIntent::MuteToggle)));
    assert_eq!(
        manager.intent_outcome("VOLUME_RAMP_UP"),
        FilterOutcome::Translate(Intent::Common(CommonIntent::VolumeUp))
    );
}

#[test]
fn test_power_macro_persistence_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path());

    let settings = Settings::from_file(dir.path().join("settings.toml")).unwrap();
    let sources = parse_sources_path(settings.sources_path().unwrap()).unwrap();
    let store = PowerMacroStore::new(settings.power_macro_path().unwrap());

    // Nothing stored yet
    assert_eq!(store.load(), PowerMacro::default());

    let power_macro = PowerMacro {
        enabled: true,
        power_on_tv: true,
        power_on_device: Some(ProductSourceSlot::Slot1),
    };
    store.update(&power_macro, &sources).unwrap();
    assert_eq!(store.load(), power_macro);

    let rejected = PowerMacro {
        power_on_device: Some(ProductSourceSlot::Slot0),
        ..power_macro
    };
    let err = store.update(&rejected, &sources).unwrap_err();
    assert_eq!(err.to_string(), "Requested source is not configured!");
    assert_eq!(store.load(), power_macro);

    let transport = RecordingTransport::new();
    let mut manager =
        KeyInputManager::new(FilterTable::new(), BlastedKeyTable::new(), transport.clone());
    manager.update_sources(sources);
    manager.execute_power_macro(&store.load(), PowerKey::On);
    manager.power_macro_acknowledged();

    let code_sets: Vec<String> = transport
        .requests()
        .into_iter()
        .map(|request| request.code_set)
        .collect();
    assert_eq!(code_sets, vec!["0x1A", "0x2B"]);
}

#[test]
fn test_bad_configuration_is_rejected() {
    let dir = tempfile::tempdir().unwrap();

    let missing = FilterTable::from_json_path(dir.path().join("absent.json"));
    assert!(matches!(missing, Err(ConfigError::Io(_))));

    let path = dir.path().join("bad_regex.json");
    fs::write(
        &path,
        r#"{ "keytable": [ { "action": "MUTE_TOGGLE",
            "filter": { "sources": [ { "sourceName": "*PRODUCT", "sourceAccountName": ".*" } ] } } ] }"#,
    )
    .unwrap();
    let err = FilterTable::from_json_path(&path).unwrap_err();
    assert!(err.to_string().contains("*PRODUCT"));

    let path = dir.path().join("bad_blast.json");
    fs::write(&path, r#"{ "blastTable": [ { "key": "NOPE", "devices": [] } ] }"#).unwrap();
    assert!(matches!(
        BlastedKeyTable::from_json_path(&path),
        Err(ConfigError::InvalidKey(_))
    ));
}

#[test]
fn test_reload_is_atomic_for_readers() {
    let shared = SharedFilterTable::new(FilterTable::from_json(KEY_TABLE_JSON).unwrap());
    let engine = SourceFilterEngine::with_shared(shared.clone());

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let engine = engine.clone();
            thread::spawn(move || {
                for _ in 0..500 {
                    // Either table drops MUTE_TOGGLE on bluetooth; a mix would pass it
                    let outcome = engine.evaluate("MUTE_TOGGLE", "BLUETOOTH", "");
                    assert_eq!(outcome, FilterOutcome::Drop);
                }
            })
        })
        .collect();

    for _ in 0..100 {
        shared.replace(
            FilterTable::from_json(
                r#"{ "keytable": [ { "action": "MUTE_TOGGLE", "filter": { "sources": [
                    { "sourceName": "BLUETOOTH", "sourceAccountName": "" } ] } } ] }"#,
            )
            .unwrap(),
        );
        shared.replace(FilterTable::from_json(KEY_TABLE_JSON).unwrap());
    }

    for reader in readers {
        reader.join().unwrap();
    }
}
