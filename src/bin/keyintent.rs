// Keyintent CLI
// Loads the key configuration and replays a key-event script through it

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;

use keyintent_core::{
    BlastedKeyTable, ContentItem, FilterTable, KeyEvent, KeyId, KeyInputManager, KeyOrigin,
    KeyState, PowerKey, PowerMacro, PowerMacroStore, RecordingTransport, Settings, SourceInfo,
};

/// Key-event filtering replay tool
#[derive(Parser, Debug)]
#[command(name = "keyintent")]
#[command(version)]
#[command(about = "Replay key events through the key filtering layer", long_about = None)]
struct Args {
    /// Settings file (default: ~/.config/keyintent/settings.toml)
    #[arg(short, long, value_name = "SETTINGS")]
    settings: Option<PathBuf>,

    /// Key filter table (overrides settings)
    #[arg(short, long, value_name = "JSON")]
    keys: Option<PathBuf>,

    /// Blasted key table (overrides settings)
    #[arg(short, long, value_name = "JSON")]
    blast: Option<PathBuf>,

    /// Source snapshot (overrides settings)
    #[arg(long, value_name = "JSON")]
    sources: Option<PathBuf>,

    /// Key-event script (default: stdin)
    #[arg(long, value_name = "SCRIPT")]
    script: Option<PathBuf>,

    /// Validate configuration and exit
    #[arg(long)]
    check_config: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Script errors, reported with their 1-based line number
#[derive(Debug, thiserror::Error)]
enum ReplayError {
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("line {line}: unknown command '{command}'")]
    UnknownCommand { line: usize, command: String },
}

/// One parsed script line
#[derive(Debug, Clone, PartialEq)]
enum Command {
    Key(KeyEvent),
    Macro(PowerKey),
    Ack,
    Intent(String),
    Select(Option<ContentItem>),
}

fn parse_line(line_no: usize, line: &str) -> Result<Option<Command>, ReplayError> {
    let line = line.split('#').next().unwrap_or_default().trim();
    if line.is_empty() {
        return Ok(None);
    }

    let syntax = |message: String| ReplayError::Syntax {
        line: line_no,
        message,
    };
    let fields: Vec<&str> = line.split_whitespace().collect();

    let command = match fields.as_slice() {
        ["ack"] => Command::Ack,
        ["macro", "on"] => Command::Macro(PowerKey::On),
        ["macro", "off"] => Command::Macro(PowerKey::Off),
        ["macro", other] => return Err(syntax(format!("expected 'on' or 'off', got '{}'", other))),
        ["intent", name] => Command::Intent(name.to_string()),
        ["select"] => Command::Select(None),
        ["select", source] => Command::Select(Some(ContentItem::new(*source, ""))),
        ["select", source, account] => Command::Select(Some(ContentItem::new(*source, *account))),
        [timestamp, origin, state, key] if timestamp.parse::<i64>().is_ok() => {
            let timestamp_ms = timestamp.parse::<i64>().map_err(|e| syntax(e.to_string()))?;
            let origin = origin.parse::<KeyOrigin>().map_err(syntax)?;
            let state = state.parse::<KeyState>().map_err(syntax)?;
            let key_id = key.parse::<KeyId>().map_err(syntax)?;
            Command::Key(KeyEvent::new(origin, key_id, state, timestamp_ms))
        }
        [command, ..] => {
            return Err(ReplayError::UnknownCommand {
                line: line_no,
                command: command.to_string(),
            })
        }
        [] => return Ok(None),
    };
    Ok(Some(command))
}

fn parse_script(content: &str) -> Result<Vec<Command>, ReplayError> {
    let mut commands = Vec::new();
    for (index, line) in content.lines().enumerate() {
        if let Some(command) = parse_line(index + 1, line)? {
            commands.push(command);
        }
    }
    Ok(commands)
}

/// Everything loaded from the configuration files
struct Loaded {
    filter_table: FilterTable,
    blast_table: BlastedKeyTable,
    sources: SourceInfo,
    power_macro: PowerMacro,
}

fn load_settings(args: &Args) -> Result<Settings> {
    let mut settings = match &args.settings {
        Some(path) => Settings::from_file(path)
            .with_context(|| format!("loading settings {}", path.display()))?,
        None => Settings::load_default().context("loading default settings")?,
    };
    if let Some(path) = &args.keys {
        settings.set_keys_path(path);
    }
    if let Some(path) = &args.blast {
        settings.set_blast_path(path);
    }
    if let Some(path) = &args.sources {
        settings.set_sources_path(path);
    }
    Ok(settings)
}

fn load(settings: &Settings) -> Result<Loaded> {
    let Some(keys) = settings.keys_path() else {
        bail!("no key filter table configured (use --keys or [paths] keys)");
    };
    let filter_table = FilterTable::from_json_path(keys)
        .with_context(|| format!("loading key filter table {}", keys.display()))?;

    let blast_table = match settings.blast_path() {
        Some(path) => BlastedKeyTable::from_json_path(path)
            .with_context(|| format!("loading blast table {}", path.display()))?,
        None => BlastedKeyTable::new(),
    };

    let sources = match settings.sources_path() {
        Some(path) => keyintent_core::config::parse_sources_path(path)
            .with_context(|| format!("loading sources {}", path.display()))?,
        None => SourceInfo::new(),
    };

    let power_macro = settings
        .power_macro_path()
        .map(|path| PowerMacroStore::new(path).load())
        .unwrap_or_default();

    Ok(Loaded {
        filter_table,
        blast_table,
        sources,
        power_macro,
    })
}

fn read_script(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("reading script {}", path.display()))
        }
        None => {
            let mut content = String::new();
            io::stdin()
                .read_to_string(&mut content)
                .context("reading script from stdin")?;
            Ok(content)
        }
    }
}

fn print_requests(transport: &RecordingTransport) {
    for request in transport.take_requests() {
        println!("    blast {}", request);
    }
}

fn replay(loaded: Loaded, commands: &[Command]) {
    let transport = RecordingTransport::new();
    let mut manager =
        KeyInputManager::new(loaded.filter_table, loaded.blast_table, transport.clone());
    manager.update_sources(loaded.sources);

    for command in commands {
        match command {
            Command::Key(event) => {
                let verdict = manager.process(event);
                println!("{} -> {}", event, verdict);
            }
            Command::Macro(key) => {
                let progress = manager.execute_power_macro(&loaded.power_macro, *key);
                println!("macro {:?} -> {}", key, progress);
            }
            Command::Ack => {
                let progress = manager.power_macro_acknowledged();
                println!("ack -> {}", progress);
            }
            Command::Intent(name) => {
                println!("intent {} -> {}", name, manager.intent_outcome(name));
            }
            Command::Select(item) => {
                let mut sources = manager.sources().clone();
                sources.select(item.clone());
                manager.update_sources(sources);
                match item {
                    Some(item) => println!("select {}/{}", item.source, item.source_account),
                    None => println!("select none"),
                }
            }
        }
        print_requests(&transport);
    }

    if manager.outstanding_presses() > 0 {
        log::warn!("{} press(es) without a release", manager.outstanding_presses());
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let settings = load_settings(&args)?;
    let loaded = load(&settings)?;

    if args.check_config {
        println!(
            "Configuration is valid: {} key table entries, {} blasted key/device pairs, {} sources",
            loaded.filter_table.len(),
            loaded.blast_table.len(),
            loaded.sources.sources.len()
        );
        return Ok(());
    }

    let script = read_script(args.script.as_deref())?;
    let commands = parse_script(&script)?;
    replay(loaded, &commands);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parsing() {
        let args = Args::parse_from(["keyintent", "--keys", "/tmp/keys.json", "--check-config"]);

        assert_eq!(args.keys, Some(PathBuf::from("/tmp/keys.json")));
        assert!(args.check_config);
        assert!(!args.verbose);
        assert!(args.settings.is_none());
        assert!(args.script.is_none());
    }

    #[test]
    fn test_parse_key_line() {
        let command = parse_line(1, "105 cec pressed MUTE").unwrap();
        assert_eq!(
            command,
            Some(Command::Key(KeyEvent::pressed(KeyOrigin::Cec, KeyId::MUTE, 105)))
        );

        let command = parse_line(2, "200 KEY_ORIGIN_IR released 0x8  # tv input").unwrap();
        assert_eq!(
            command,
            Some(Command::Key(KeyEvent::released(KeyOrigin::Ir, KeyId::TV_INPUT, 200)))
        );
    }

    #[test]
    fn test_parse_other_commands() {
        assert_eq!(parse_line(1, "  # comment").unwrap(), None);
        assert_eq!(parse_line(1, "").unwrap(), None);
        assert_eq!(parse_line(1, "ack").unwrap(), Some(Command::Ack));
        assert_eq!(parse_line(1, "macro off").unwrap(), Some(Command::Macro(PowerKey::Off)));
        assert_eq!(
            parse_line(1, "select PRODUCT TV").unwrap(),
            Some(Command::Select(Some(ContentItem::new("PRODUCT", "TV"))))
        );
        assert_eq!(
            parse_line(1, "intent VOLUME_UP").unwrap(),
            Some(Command::Intent("VOLUME_UP".to_string()))
        );
    }

    #[test]
    fn test_script_errors_report_line() {
        let err = parse_script("ack\n\n10 ir pressed WARP_DRIVE\n").unwrap_err();
        assert!(matches!(err, ReplayError::Syntax { line: 3, .. }));

        let err = parse_script("# header\nfrobnicate\n").unwrap_err();
        assert!(matches!(err, ReplayError::UnknownCommand { line: 2, .. }));

        let err = parse_script("macro maybe").unwrap_err();
        assert_eq!(err.to_string(), "line 1: expected 'on' or 'off', got 'maybe'");
    }
}
