use std::{ops::Range, path::Path};

pub mod compiler;
pub mod globals;
pub mod keycodes;

#[derive(Debug)]
pub struct ConfigError {
    pub message: String,
    pub span: Option<Range<usize>>,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.span {
            Some(span) => write!(f, "{}\n    at: ({:?})", &self.message, span),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        Self {
            message: err.to_string(),
            span: None,
        }
    }
}

impl From<&str> for ConfigError {
    fn from(err: &str) -> Self {
        Self {
            message: err.to_string(),
            span: None,
        }
    }
}

impl ConfigError {
    pub fn new(message: String, span: Range<usize>) -> Self {
        Self {
            message,
            span: Some(span),
        }
    }

    /// Convert the byte span into a char span; ariadne counts chars.
    fn char_span(&self, source: &str) -> Option<Range<usize>> {
        let span = self.span.clone()?;
        let start = source.get(..span.start)?.chars().count();
        let len = source.get(span.start..span.end)?.chars().count();
        Some(start..start + len.max(1))
    }

    /// Line and column (1 based line, 0 based column) of the start of the span.
    pub fn line_col(&self, source: &str) -> Option<(usize, usize)> {
        let start = self.span.as_ref()?.start;
        let before = source.get(..start)?;
        let line = before.matches('\n').count() + 1;
        let col = before.rsplit('\n').next().map_or(0, |l| l.chars().count());
        Some((line, col))
    }
}

/// Compile `src`, printing any error to stderr as an annotated source excerpt.
pub fn pretty_compile(file: &Path, src: &str) -> Result<compiler::SettingsConfig, ConfigError> {
    match compiler::compile(src) {
        Ok(config) => Ok(config),
        Err(err) => {
            use ariadne::{ColorGenerator, Label, Report, ReportKind, Source};
            let filename = file.to_str().unwrap_or("<unknown>");
            let mut colors = ColorGenerator::new();

            let a = colors.next();
            if let Some(span) = err.char_span(src) {
                let _ = Report::build(ReportKind::Error, (filename, span.clone()))
                    .with_message("Invalid config".to_string())
                    .with_label(
                        Label::new((filename, span))
                            .with_message(&err.message)
                            .with_color(a),
                    )
                    .finish()
                    .eprint((filename, Source::from(src)));
            }
            Err(err)
        }
    }
}

/// Compile settings text into the image `Settings::load` accepts.
pub fn text_to_binary(source: &str) -> Result<Vec<u16>, ConfigError> {
    let file = Path::new("<unknown>");
    let config = pretty_compile(file, source)?;
    Ok(config.serialize())
}

/// Little endian bytes of a compiled image, as stored in flash.
pub fn binary_to_bytes(data: &[u16]) -> Vec<u8> {
    data.iter().flat_map(|w| w.to_le_bytes()).collect()
}

pub fn bytes_to_binary(bytes: &[u8]) -> Result<Vec<u16>, ConfigError> {
    if bytes.len() % 2 != 0 {
        return Err("Settings image has an odd number of bytes".into());
    }
    Ok(bytes
        .chunks_exact(2)
        .map(|c| u16::from_le_bytes([c[0], c[1]]))
        .collect())
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod test;
