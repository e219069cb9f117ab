//! Purpose: `resmode` CLI entry point and command dispatch.
//! Role: Binary crate root; parses args, resolves the active mode, prints it.
//! Invariants: Success output on stdout is a bare field, `WxH`, or one JSON object per line.
//! Invariants: Non-interactive errors are emitted as JSON on stderr.
//! Invariants: Process exit code is derived from `api::to_exit_code`.
#![allow(clippy::result_large_err)]
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser, Subcommand, ValueEnum, error::ErrorKind as ClapErrorKind};
use clap_complete::aot::Shell;
use serde_json::{Map, Value, json};

use resmode::api::{Config, Error, ErrorKind, Mode, to_exit_code};

#[derive(Copy, Clone, Debug)]
struct RunOutcome {
    exit_code: i32,
}

impl RunOutcome {
    fn ok() -> Self {
        Self { exit_code: 0 }
    }

    fn with_code(exit_code: i32) -> Self {
        Self { exit_code }
    }
}

fn main() {
    let exit_code = match run() {
        Ok(outcome) => outcome.exit_code,
        Err((err, color_mode)) => {
            emit_error(&err, color_mode);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn run() -> Result<RunOutcome, (Error, ColorMode)> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion => {
                err.print().map_err(|io_err| {
                    (
                        Error::new(ErrorKind::Io)
                            .with_message("failed to write help")
                            .with_source(io_err),
                        ColorMode::Auto,
                    )
                })?;
                return Ok(RunOutcome::ok());
            }
            _ => {
                return Err((
                    Error::new(ErrorKind::Usage)
                        .with_message(clap_error_summary(&err))
                        .with_hint("Try `resmode --help`."),
                    ColorMode::Auto,
                ));
            }
        },
    };

    let color_mode = cli.color;
    let result = match cli.command {
        Some(Command::Completion { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::aot::generate(shell, &mut cmd, "resmode", &mut io::stdout());
            return Ok(RunOutcome::ok());
        }
        Some(Command::List) => run_list(&cli.file),
        None => run_resolve(&cli.file, cli.field, cli.json),
    };

    result
        .map(|()| RunOutcome::ok())
        .map_err(add_io_hint)
        .map_err(|err| (err, color_mode))
}

#[derive(Parser)]
#[command(
    name = "resmode",
    version,
    about = "Resolve the active display resolution from a JSON mode table",
    after_help = r#"EXAMPLES
  $ resmode
  720
  $ resmode --field both
  1280x720
  $ resmode --file /etc/kiosk/resolution.json --json
  {"name":"720p","width":1280,"height":720}"#
)]
struct Cli {
    #[arg(
        long,
        global = true,
        value_name = "PATH",
        default_value = "resolution.json",
        help = "Mode table to read"
    )]
    file: PathBuf,

    #[arg(
        long,
        value_enum,
        default_value = "height",
        help = "Dimension to print: height|width|both"
    )]
    field: FieldCli,

    #[arg(long, help = "Emit the resolved mode as a JSON object")]
    json: bool,

    #[arg(
        long,
        global = true,
        default_value = "auto",
        value_enum,
        help = "Colorize stderr diagnostics: auto|always|never"
    )]
    color: ColorMode,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ColorMode {
    Auto,
    Always,
    Never,
}

impl ColorMode {
    fn use_color(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum FieldCli {
    Height,
    Width,
    Both,
}

#[derive(Subcommand)]
enum Command {
    #[command(
        about = "List every mode entry as JSON lines",
        long_about = r#"List every named entry in the table, one JSON object per line.

The entry named by the reserved `default` key carries `"default": true`."#
    )]
    List,

    #[command(
        about = "Generate shell completions",
        long_about = r#"Generate shell completion scripts.

Prints a completion script for the given shell to stdout.
Install the generated file in your shell's completion directory (or source it)
to enable tab completion."#
    )]
    Completion {
        #[arg(help = "Shell to generate completions for")]
        shell: Shell,
    },
}

fn run_resolve(path: &Path, field: FieldCli, as_json: bool) -> Result<(), Error> {
    let config = Config::from_path(path)?;
    let name = config.default_name()?;
    let entry = config.entry(name)?;
    let mode = Mode {
        width: entry.width()?,
        height: entry.height()?,
    };

    if as_json {
        println!("{}", encode_line(mode_json(name, mode, false)));
        return Ok(());
    }
    match field {
        FieldCli::Height => println!("{}", mode.height),
        FieldCli::Width => println!("{}", mode.width),
        FieldCli::Both => println!("{}x{}", mode.width, mode.height),
    }
    Ok(())
}

fn run_list(path: &Path) -> Result<(), Error> {
    let config = Config::from_path(path)?;
    // A table without a usable default still lists; the marker is best-effort.
    let default_name = config.default_name().ok();
    for name in config.names() {
        let entry = config.entry(name)?;
        let mode = Mode {
            width: entry.width()?,
            height: entry.height()?,
        };
        let is_default = default_name == Some(name);
        println!("{}", encode_line(mode_json(name, mode, is_default)));
    }
    Ok(())
}

fn mode_json(name: &str, mode: Mode, is_default: bool) -> Value {
    let mut obj = Map::new();
    obj.insert("name".to_string(), json!(name));
    obj.insert("width".to_string(), json!(mode.width));
    obj.insert("height".to_string(), json!(mode.height));
    if is_default {
        obj.insert("default".to_string(), json!(true));
    }
    Value::Object(obj)
}

fn encode_line(value: Value) -> String {
    serde_json::to_string(&value).unwrap_or_else(|_| "{\"error\":\"json encode failed\"}".to_string())
}

fn add_io_hint(err: Error) -> Error {
    if err.kind() != ErrorKind::Io || err.hint().is_some() {
        return err;
    }
    err.with_hint("Pass --file to point at a mode table outside the current directory.")
}

fn clap_error_summary(err: &clap::Error) -> String {
    for line in err.to_string().lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix("error:") {
            return rest.trim().to_string();
        }
        return trimmed.to_string();
    }
    "invalid arguments".to_string()
}

#[derive(Copy, Clone, Debug)]
enum AnsiColor {
    Red,
    Yellow,
}

fn colorize_label(label: &str, enabled: bool, color: AnsiColor) -> String {
    if !enabled {
        return label.to_string();
    }
    let code = match color {
        AnsiColor::Red => "31",
        AnsiColor::Yellow => "33",
    };
    format!("\u{1b}[{code}m{label}\u{1b}[0m")
}

fn emit_error(err: &Error, color_mode: ColorMode) {
    let is_tty = io::stderr().is_terminal();
    if is_tty {
        eprintln!("{}", error_text(err, color_mode.use_color(is_tty)));
        return;
    }

    let value = error_json(err);
    let json = serde_json::to_string(&value).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn error_message(err: &Error) -> String {
    if let Some(message) = err.message() {
        return message.to_string();
    }
    match err.kind() {
        ErrorKind::Internal => "internal error".to_string(),
        ErrorKind::Usage => "usage error".to_string(),
        ErrorKind::MissingKey => "missing key".to_string(),
        ErrorKind::TypeMismatch => "type mismatch".to_string(),
        ErrorKind::Parse => "malformed JSON".to_string(),
        ErrorKind::Io => "i/o error".to_string(),
    }
}

fn error_causes(err: &Error) -> Vec<String> {
    use std::error::Error as StdError;
    let mut causes = Vec::new();
    let mut cur = err.source();
    while let Some(source) = cur {
        causes.push(source.to_string());
        cur = source.source();
    }
    causes
}

fn error_json(err: &Error) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(format!("{:?}", err.kind())));
    inner.insert("message".to_string(), json!(error_message(err)));
    if let Some(hint) = err.hint() {
        inner.insert("hint".to_string(), json!(hint));
    }
    if let Some(key) = err.key() {
        inner.insert("key".to_string(), json!(key));
    }
    if let Some(path) = err.path() {
        inner.insert("path".to_string(), json!(path.display().to_string()));
    }
    let causes = error_causes(err);
    if !causes.is_empty() {
        inner.insert("causes".to_string(), json!(causes));
    }

    let mut outer = Map::new();
    outer.insert("error".to_string(), Value::Object(inner));
    Value::Object(outer)
}

fn error_text(err: &Error, use_color: bool) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "{} {}",
        colorize_label("error:", use_color, AnsiColor::Red),
        error_message(err)
    ));

    if let Some(hint) = err.hint() {
        lines.push(format!(
            "{} {hint}",
            colorize_label("hint:", use_color, AnsiColor::Yellow)
        ));
    }
    if let Some(key) = err.key() {
        lines.push(format!(
            "{} {key}",
            colorize_label("key:", use_color, AnsiColor::Yellow)
        ));
    }
    if let Some(path) = err.path() {
        lines.push(format!(
            "{} {}",
            colorize_label("path:", use_color, AnsiColor::Yellow),
            path.display()
        ));
    }
    for cause in error_causes(err) {
        lines.push(format!(
            "{} {cause}",
            colorize_label("cause:", use_color, AnsiColor::Yellow)
        ));
    }
    lines.join("\n")
}
