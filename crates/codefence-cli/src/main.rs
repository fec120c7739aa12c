use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::Parser;
use codefence::{CodeInput, Config, Descriptor, LanguageSpec, Renderer, WrapMode};
use miette::{Context, IntoDiagnostic, Result};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// codefence - render source code to syntax-highlighted HTML
#[derive(Debug, Parser)]
#[command(name = "codefence", version)]
struct Args {
    /// Input: code string, filename, or '-' for stdin
    ///
    /// If a file path is provided, reads from that file.
    /// If '-' or nothing is provided, reads from stdin.
    /// Otherwise, treats the argument as raw code to highlight.
    input: Option<String>,

    /// Language to highlight (e.g., rust, json, toml)
    ///
    /// If omitted, the language is detected from the file extension.
    #[arg(short, long)]
    lang: Option<String>,

    /// Grammar file (JSON or TOML) to highlight with instead of a named language
    #[arg(short, long, conflicts_with = "lang")]
    grammar: Option<PathBuf>,

    /// Theme name (github-dark, github-light, css-variables)
    #[arg(short, long, default_value = codefence::DEFAULT_THEME)]
    theme: String,

    /// Line wrapping: nowrap, wrap or unstyled
    #[arg(short, long, default_value_t = WrapMode::NoWrap)]
    wrap: WrapMode,

    /// Render as a single inline `code` element
    #[arg(long)]
    inline: bool,

    /// Configuration file (codefence.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load(path).into_diagnostic()?,
        None => Config::default(),
    };

    let (code, filename) = read_input(args.input.as_deref())?;
    let language = language_for(&args, filename.as_deref())?;
    tracing::debug!(language = language.effective_name(), "rendering");

    let input = CodeInput::new(code)
        .language(language)
        .theme(args.theme.as_str())
        .wrap(args.wrap)
        .inline(args.inline);

    let html = Renderer::with_config(config)
        .render(&input)
        .await
        .into_diagnostic()?;
    println!("{html}");
    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .init();
}

/// Read the code to render. Returns the filename when it came from a file.
fn read_input(input: Option<&str>) -> Result<(String, Option<String>)> {
    match input {
        None | Some("-") => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .into_diagnostic()
                .context("failed to read stdin")?;
            Ok((buffer, None))
        }
        Some(input) => {
            let path = Path::new(input);
            if path.is_file() {
                let content = std::fs::read_to_string(path)
                    .into_diagnostic()
                    .with_context(|| format!("failed to read file '{input}'"))?;
                Ok((content, Some(input.to_string())))
            } else {
                Ok((input.to_string(), None))
            }
        }
    }
}

fn language_for(args: &Args, filename: Option<&str>) -> Result<LanguageSpec> {
    if let Some(grammar) = &args.grammar {
        // Absolute, so the configured grammar directory does not apply
        let path = std::path::absolute(grammar)
            .into_diagnostic()
            .with_context(|| format!("invalid grammar path '{}'", grammar.display()))?;
        let mut descriptor = Descriptor::new();
        descriptor.insert("path", path.to_string_lossy().into_owned());
        return Ok(LanguageSpec::Raw(descriptor));
    }

    if let Some(lang) = &args.lang {
        return Ok(LanguageSpec::from(lang.as_str()));
    }

    Ok(filename
        .and_then(detect_language)
        .map(LanguageSpec::from)
        .unwrap_or_default())
}

/// Detect a built-in language from a file name.
fn detect_language(filename: &str) -> Option<&'static str> {
    let ext = Path::new(filename).extension()?.to_str()?;
    match ext.to_ascii_lowercase().as_str() {
        "rs" => Some("rust"),
        "json" | "jsonc" => Some("json"),
        "toml" => Some("toml"),
        "txt" | "text" => Some("plaintext"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_language() {
        assert_eq!(detect_language("src/main.rs"), Some("rust"));
        assert_eq!(detect_language("Cargo.TOML"), Some("toml"));
        assert_eq!(detect_language("notes.md"), None);
        assert_eq!(detect_language("Makefile"), None);
    }

    #[test]
    fn test_args() {
        let args = Args::try_parse_from([
            "codefence", "x.rs", "--wrap", "wrap", "--inline", "--theme", "github-light",
        ])
        .unwrap();
        assert_eq!(args.wrap, WrapMode::Wrap);
        assert!(args.inline);
        assert_eq!(args.theme, "github-light");
        assert_eq!(
            language_for(&args, Some("x.rs")).unwrap(),
            LanguageSpec::Named("rust".to_string())
        );

        assert!(Args::try_parse_from(["codefence", "--lang", "rust", "--grammar", "g.json"]).is_err());
        assert!(Args::try_parse_from(["codefence", "--wrap", "sometimes"]).is_err());
    }

    #[test]
    fn test_grammar_path_is_absolute() {
        let args = Args::try_parse_from(["codefence", "--grammar", "g.json"]).unwrap();
        let LanguageSpec::Raw(descriptor) = language_for(&args, None).unwrap() else {
            panic!("expected a raw descriptor");
        };
        let path = descriptor.get("path").and_then(|p| p.as_str()).unwrap();
        assert!(Path::new(path).is_absolute());
    }

    #[test]
    fn test_unknown_extension_falls_back_to_plain_text() {
        let args = Args::try_parse_from(["codefence"]).unwrap();
        assert_eq!(language_for(&args, Some("a.xyz")).unwrap(), LanguageSpec::PlainText);
    }
}
