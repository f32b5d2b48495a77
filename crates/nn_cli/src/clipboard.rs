use std::io::Write;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use nn_client::Clipboard;
use nn_core::Result;

/// Sets the terminal's system clipboard with an OSC 52 escape sequence.
/// Terminals that do not support it ignore the sequence.
#[derive(Debug, Default)]
pub struct Osc52Clipboard;

pub fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", STANDARD.encode(text))
}

impl Clipboard for Osc52Clipboard {
    fn write_text(&self, text: &str) -> Result<()> {
        let mut out = std::io::stdout().lock();
        out.write_all(osc52_sequence(text).as_bytes())?;
        out.flush()?;
        Ok(())
    }
}

/// Writes the copied text to stdout, for piping into a clipboard tool.
#[derive(Debug, Default)]
pub struct StdoutClipboard;

impl Clipboard for StdoutClipboard {
    fn write_text(&self, text: &str) -> Result<()> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "{}", text)?;
        out.flush()?;
        Ok(())
    }
}
