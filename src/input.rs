use anyhow::{Context, Result};
use std::io::Read;
use std::path::PathBuf;

/// Where a piece of text came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextSource {
    Inline(String),
    File(PathBuf),
    Stdin,
}

/// Text ready for scoring, labelled with its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputText {
    pub label: String,
    pub text: String,
}

/// Work out what to read from the command line.
///
/// Positional words form one inline text (joined with single spaces); every
/// file is a separate input. With neither, stdin is read.
pub fn collect_sources(words: &[String], files: &[PathBuf]) -> Vec<TextSource> {
    let mut sources = Vec::new();
    if !words.is_empty() {
        sources.push(TextSource::Inline(words.join(" ")));
    }
    sources.extend(files.iter().cloned().map(TextSource::File));
    if sources.is_empty() {
        sources.push(TextSource::Stdin);
    }
    sources
}

pub fn read_source(source: &TextSource) -> Result<InputText> {
    match source {
        TextSource::Inline(text) => Ok(InputText {
            label: "<text>".to_string(),
            text: text.clone(),
        }),
        TextSource::File(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Ok(InputText {
                label: path.display().to_string(),
                text,
            })
        }
        TextSource::Stdin => {
            let mut text = String::new();
            std::io::stdin()
                .lock()
                .read_to_string(&mut text)
                .context("Failed to read text from stdin")?;
            Ok(InputText {
                label: "<stdin>".to_string(),
                text,
            })
        }
    }
}
