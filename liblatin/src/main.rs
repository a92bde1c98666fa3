use clap::{Parser, Subcommand};
use libcompose_core::{KeyboardLayout, SuggestionOracle, WordBuffer};
use liblatin::{
    create_composer, open_dictionary, Composer, Document, EditorInfo, LatinConfig, LatinLayout,
    LayoutKind, MemoryDocument, ShiftState, Suggest, WordList,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// `<name>` or `<name:N>` commands, or a single character.
static TOKEN: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r"(?s)<(bs|enter|space|revert|delword|shift|caps)>|<(pick|move):(\d+)>|(.)").ok()
});

#[derive(Parser)]
#[command(name = "liblatin")]
#[command(about = "Predictive word composition for Latin keyboards")]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Word list (.fst or text); the built-in demo list when omitted
    #[arg(short, long, global = true)]
    words: Option<PathBuf>,

    /// Keyboard layout, overrides the config file
    #[arg(long, value_enum, global = true)]
    layout: Option<LayoutKind>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,

    /// Keystroke script to replay, e.g. "teh <bs>"
    input: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a keystroke script and print the resulting text
    Type {
        /// Characters plus <bs>, <enter>, <space>, <revert>, <delword>,
        /// <shift>, <caps>, <pick:N> and <move:N>
        script: String,
    },
    /// Print the suggestions for a word
    Suggest {
        word: String,
    },
    /// Replay one keystroke script per line in a shared text field
    Repl,
    /// Print the effective configuration as TOML
    Config,
    /// Compile a text word list into an .fst file
    Compile {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Action {
    Key(char),
    Backspace,
    Revert,
    DeleteWord,
    Shift,
    CapsLock,
    Pick(usize),
    Move(usize),
}

fn parse_script(script: &str) -> Vec<Action> {
    let Some(token) = TOKEN.as_ref() else {
        return script.chars().map(Action::Key).collect();
    };
    token
        .captures_iter(script)
        .filter_map(|caps| {
            if let Some(name) = caps.get(1) {
                return Some(match name.as_str() {
                    "bs" => Action::Backspace,
                    "enter" => Action::Key('\n'),
                    "space" => Action::Key(' '),
                    "revert" => Action::Revert,
                    "delword" => Action::DeleteWord,
                    "shift" => Action::Shift,
                    _ => Action::CapsLock,
                });
            }
            if let (Some(name), Some(n)) = (caps.get(2), caps.get(3)) {
                let n = n.as_str().parse().ok()?;
                return Some(match name.as_str() {
                    "pick" => Action::Pick(n),
                    _ => Action::Move(n),
                });
            }
            caps.get(4).and_then(|m| m.as_str().chars().next()).map(Action::Key)
        })
        .collect()
}

#[derive(Debug, Serialize)]
struct Report {
    text: String,
    cursor: usize,
    composing: Option<String>,
    phase: String,
    suggestions: Vec<String>,
}

impl Report {
    fn of(composer: &Composer<MemoryDocument>) -> Self {
        let (text, cursor) = composer
            .document()
            .map(|doc| (doc.text(), doc.cursor_position()))
            .unwrap_or_default();
        Self {
            text,
            cursor,
            composing: composer.composing_text(),
            phase: format!("{:?}", composer.correction_phase()),
            suggestions: composer.suggestions().candidates().to_vec(),
        }
    }

    fn print(&self, json: bool) -> anyhow::Result<()> {
        if json {
            println!("{}", serde_json::to_string(self)?);
            return Ok(());
        }
        println!("text: {:?}", self.text);
        println!("cursor: {}", self.cursor);
        if let Some(word) = &self.composing {
            println!("composing: {:?}", word);
        }
        println!("phase: {}", self.phase);
        for (i, s) in self.suggestions.iter().enumerate() {
            println!("  {}. {}", i, s);
        }
        Ok(())
    }
}

/// Replay `actions`, letting debounced work run after every step.
fn replay(composer: &mut Composer<MemoryDocument>, actions: &[Action], shift: &mut ShiftState) {
    for action in actions {
        match *action {
            Action::Key(ch) => {
                let nearby = composer.layout().nearby_keys(ch);
                composer.on_key(ch, *shift, &nearby);
                if *shift == ShiftState::Shifted {
                    *shift = ShiftState::Off;
                }
            }
            Action::Backspace => composer.on_backspace(),
            Action::Revert => {
                composer.on_revert_last_word();
            }
            Action::DeleteWord => composer.on_delete_word(),
            Action::Shift => *shift = ShiftState::Shifted,
            Action::CapsLock => {
                *shift = if shift.is_caps_lock() {
                    ShiftState::Off
                } else {
                    ShiftState::Locked
                };
            }
            Action::Pick(index) => {
                if let Some(word) = composer.suggestions().get(index).map(str::to_string) {
                    composer.on_pick_suggestion(index, &word);
                }
            }
            Action::Move(position) => {
                let (old_start, old_end) = composer
                    .document()
                    .map(|doc| doc.selection())
                    .unwrap_or_default();
                if let Some(doc) = composer.document_mut() {
                    doc.set_cursor(position, position);
                }
                let new = composer.document().map(|doc| doc.cursor_position()).unwrap_or(0);
                composer.on_cursor_moved(old_start, old_end, new, new);
            }
        }
        composer.flush_pending();
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<LatinConfig> {
    let mut config = match &cli.config {
        Some(path) => LatinConfig::load_toml(path)?,
        None => LatinConfig::default(),
    };
    if let Some(layout) = cli.layout {
        config.layout = layout;
    }
    Ok(config)
}

fn load_words(cli: &Cli) -> anyhow::Result<Arc<WordList>> {
    match &cli.words {
        Some(path) => Ok(Arc::new(WordList::load(path)?)),
        None => Ok(WordList::demo()),
    }
}

fn run_type(cli: &Cli, script: &str) -> anyhow::Result<()> {
    let config = load_config(cli)?;
    let words = load_words(cli)?;
    let dictionary = open_dictionary(&config)?;
    let mut composer = create_composer(&config, words, dictionary);
    composer.on_session_start(MemoryDocument::new(), EditorInfo::default());

    let mut shift = ShiftState::Off;
    replay(&mut composer, &parse_script(script), &mut shift);
    Report::of(&composer).print(cli.json)
}

fn run_suggest(cli: &Cli, word: &str) -> anyhow::Result<()> {
    let config = load_config(cli)?;
    let words = load_words(cli)?;
    let layout = LatinLayout::new(config.layout);
    let mut oracle = Suggest::from_config(words, &config);

    let mut buffer = WordBuffer::new();
    for ch in word.chars() {
        buffer.add(ch, &layout.nearby_keys(ch));
    }
    let suggestions = oracle.suggestions(&buffer);
    if cli.json {
        let out = serde_json::json!({
            "word": word,
            "valid": oracle.is_valid_word(word),
            "auto_correct": oracle.has_minimal_correction(),
            "suggestions": suggestions,
        });
        println!("{}", serde_json::to_string(&out)?);
    } else {
        println!("word: {:?} (valid: {})", word, oracle.is_valid_word(word));
        for (i, s) in suggestions.iter().enumerate() {
            println!("  {}. {}", i, s);
        }
        if oracle.has_minimal_correction() {
            println!("auto-correct: {:?}", suggestions.get(1));
        }
    }
    Ok(())
}

fn run_repl(cli: &Cli) -> anyhow::Result<()> {
    let config = load_config(cli)?;
    let words = load_words(cli)?;
    let dictionary = open_dictionary(&config)?;
    let mut composer = create_composer(&config, words, dictionary);
    composer.on_session_start(MemoryDocument::new(), EditorInfo::default());
    let mut shift = ShiftState::Off;

    if !cli.json {
        println!("liblatin demo: type keystrokes and press Enter, e.g. \"teh <bs>\"");
        println!("Ctrl-D to exit.");
    }
    for line in io::stdin().lock().lines() {
        let line = line?;
        replay(&mut composer, &parse_script(&line), &mut shift);
        Report::of(&composer).print(cli.json)?;
    }
    if let Some(doc) = composer.on_session_end() {
        if !cli.json {
            println!("final: {:?}", doc.text());
        }
    }
    Ok(())
}

fn run_compile(input: &Path, output: &Path) -> anyhow::Result<()> {
    let words = WordList::load(input)?;
    words.save_fst(output)?;
    println!("compiled {} words into {}", words.len(), output.display());
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Type { script }) => run_type(&cli, script),
        Some(Commands::Suggest { word }) => run_suggest(&cli, word),
        Some(Commands::Repl) => run_repl(&cli),
        Some(Commands::Config) => {
            print!("{}", load_config(&cli)?.to_toml_string()?);
            Ok(())
        }
        Some(Commands::Compile { input, output }) => run_compile(input, output),
        None => match cli.input.clone() {
            Some(script) => run_type(&cli, &script),
            None => run_repl(&cli),
        },
    }
}
