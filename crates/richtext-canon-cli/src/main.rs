// richtext-canon — canonicalize constrained rich-text markup.
//
// Reads an HTML fragment from a file or stdin and runs one of the engine's
// passes over it:
//
//   default       semantify: presentational markup -> canonical vocabulary
//   --paste       paste pipeline: whitelist, collapse, denormalize
//   --strip       canonicalize, then print plain text only
//   --direction   print the dominant text direction (ltr/rtl/neutral)

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use richtext_canon_engine::{Direction, Fragment, classify, sanitize_paste, semantify};
use std::fs;
use std::io::Read;
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Treat input as pasted markup: whitelist and denormalize instead of
    /// canonicalizing
    #[arg(long, action = ArgAction::SetTrue)]
    paste: bool,

    /// Canonicalize, then strip markup and print plain text
    #[arg(long, action = ArgAction::SetTrue)]
    strip: bool,

    /// Print the dominant text direction of the input and exit
    #[arg(long, action = ArgAction::SetTrue)]
    direction: bool,

    /// Font stack identifying inline code
    #[arg(long, default_value = "Monaco, Consolas, \"Lucida Console\", monospace")]
    code_font: String,

    /// Input file (stdin if omitted)
    input: Option<PathBuf>,

    /// Output file (stdout if omitted)
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let src = match &cli.input {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?
        }
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading stdin")?;
            buf
        }
    };

    let mut out = transform(&cli, &src);
    out.push('\n');

    match &cli.output {
        Some(path) => {
            fs::write(path, out).with_context(|| format!("writing {}", path.display()))?
        }
        None => print!("{out}"),
    }
    Ok(())
}

fn transform(cli: &Cli, src: &str) -> String {
    if cli.direction {
        let verdict = classify(&Fragment::parse(src).text(), true);
        return match verdict {
            Direction::Ltr => "ltr",
            Direction::Rtl => "rtl",
            Direction::Neutral => "neutral",
        }
        .to_string();
    }
    if cli.paste {
        return sanitize_paste(src, &cli.code_font, false).unwrap_or_default();
    }
    let canonical = semantify(&Fragment::parse(src));
    if cli.strip {
        canonical.text()
    } else {
        canonical.to_html()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("richtext-canon").chain(args.iter().copied()))
    }

    #[test]
    fn default_mode_canonicalizes() {
        assert_eq!(
            transform(&cli(&[]), "<div>a <b>b</b></div>"),
            "<p>a <strong>b</strong></p>"
        );
    }

    #[test]
    fn strip_mode_prints_plain_text() {
        assert_eq!(transform(&cli(&["--strip"]), "<div>a <b>b</b></div>"), "a b");
    }

    #[test]
    fn paste_mode_sanitizes() {
        assert_eq!(
            transform(&cli(&["--paste"]), "<p>a<script>x</script></p>"),
            "<p>a</p>"
        );
    }

    #[test]
    fn direction_mode_classifies() {
        assert_eq!(transform(&cli(&["--direction"]), "<p>שלום עולם</p>"), "rtl");
        assert_eq!(transform(&cli(&["--direction"]), "<p>hello</p>"), "ltr");
        assert_eq!(transform(&cli(&["--direction"]), "<p>123</p>"), "neutral");
    }
}
