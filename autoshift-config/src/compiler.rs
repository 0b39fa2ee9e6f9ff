use std::ops::Range;

use autoshift_common::{
    globals::{self, GLOBALS_COUNT},
    PROTOCOL_VERSION,
};

use crate::{
    globals::{
        names,
        spec::{GlobalProp, GlobalType},
    },
    ConfigError,
};

type Result<T> = core::result::Result<T, ConfigError>;
type NameRange = Range<usize>;

const TOO_MANY_RHS: &str = "Only one value may be assigned";
const MISSING_EQ: &str = "Missing =";
const MISSING_RHS: &str = "Missing RHS";
const OUTSIDE_SECTION: &str = "expected '['";

/// Compiled settings: every global's value and whether the source assigned it.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsConfig {
    values: [u16; GLOBALS_COUNT],
    assigned: [bool; GLOBALS_COUNT],
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            values: globals::DEFAULTS,
            assigned: [false; GLOBALS_COUNT],
        }
    }
}

impl SettingsConfig {
    pub fn value(&self, index: u16) -> u16 {
        self.values[index as usize]
    }

    pub fn is_assigned(&self, index: u16) -> bool {
        self.assigned[index as usize]
    }

    pub fn set(&mut self, prop: GlobalProp) {
        prop.apply(&mut self.values);
        self.assigned[prop.index as usize] = true;
    }

    /// Current value of a named setting, rendered as it would be written in a settings file.
    pub fn global(&self, name: &str) -> Option<String> {
        let prop = GlobalProp::new_default(name).ok()?;
        let value = self.value(prop.index);
        Some(match prop.spec {
            GlobalType::Timeout { .. } => value.to_string(),
            GlobalType::Flag { bit, .. } => (value & bit != 0).to_string(),
        })
    }

    /// `(name, value)` of every setting, assigned or not.
    pub fn describe(&self) -> Vec<(&'static str, String)> {
        names()
            .filter_map(|n| self.global(n).map(|v| (n, v)))
            .collect()
    }

    /// The image format is protocol version, pair count, then the assigned globals as
    /// `(index, value)` pairs in index order.
    pub fn serialize(&self) -> Vec<u16> {
        let pairs = (0..GLOBALS_COUNT as u16)
            .filter(|i| self.is_assigned(*i))
            .flat_map(|i| [i, self.value(i)])
            .collect::<Vec<_>>();
        let mut out = Vec::with_capacity(pairs.len() + 2);
        out.push(PROTOCOL_VERSION);
        out.push((pairs.len() / 2) as u16);
        out.extend(pairs);
        out
    }

    pub fn deserialize(data: &[u16]) -> Result<Self> {
        let mut config = Self::default();
        let (version, rest) = data.split_first().ok_or("Empty settings image")?;
        if *version != PROTOCOL_VERSION {
            return Err(ConfigError {
                message: format!(
                    "Settings image version {} is not {}",
                    version, PROTOCOL_VERSION
                ),
                span: None,
            });
        }
        let (count, pairs) = rest.split_first().ok_or("Settings image truncated")?;
        if pairs.len() != *count as usize * 2 {
            return Err("Settings image length does not match its pair count".into());
        }
        for pair in pairs.chunks_exact(2) {
            let index = pair[0] as usize;
            if index >= GLOBALS_COUNT {
                return Err(ConfigError {
                    message: format!("Unknown global index {}", index),
                    span: None,
                });
            }
            config.values[index] = pair[1];
            config.assigned[index] = true;
        }
        Ok(config)
    }
}

#[derive(PartialEq)]
enum Section {
    None,
    Global,
}

struct Parser<'source> {
    source: &'source str,
    config: SettingsConfig,
    section: Section,
}

impl<'source> Parser<'source> {
    fn new(source: &'source str) -> Self {
        Self {
            source,
            config: SettingsConfig::default(),
            section: Section::None,
        }
    }

    fn parse_lines(&mut self) -> Result<()> {
        let mut offset = 0;
        for line in self.source.split_inclusive('\n') {
            let start = offset;
            offset += line.len();
            let line = line.split_once('#').map_or(line, |(code, _)| code);
            let text = line.trim();
            if text.is_empty() {
                continue;
            }
            let text_start = start + (line.len() - line.trim_start().len());
            let range = text_start..text_start + text.len();
            if text.starts_with('[') {
                self.parse_section(range)?;
            } else {
                self.parse_assignment(range)?;
            }
        }
        Ok(())
    }

    fn parse_section(&mut self, range: NameRange) -> Result<()> {
        let text = self.name(&range);
        let Some(name) = text.strip_prefix('[').and_then(|t| t.strip_suffix(']')) else {
            return Err(error_span("missing ']'", range.start..range.start + 1));
        };
        match name.trim() {
            "global" => {
                self.section = Section::Global;
                Ok(())
            }
            other => Err(error_span(
                format!("Unknown section '{}'", other),
                range.start + 1..range.end - 1,
            )),
        }
    }

    fn parse_assignment(&mut self, range: NameRange) -> Result<()> {
        if self.section == Section::None {
            return Err(error_span(OUTSIDE_SECTION, range));
        }
        let text = self.name(&range);
        let Some(eq) = text.find('=') else {
            return Err(error_span(MISSING_EQ, range));
        };
        let left = trimmed_range(text, 0..eq, range.start);
        let right = trimmed_range(text, eq + 1..text.len(), range.start);
        if left.is_empty() {
            return Err(error_span("Missing name", range.start..range.start + eq + 1));
        }
        if right.is_empty() {
            return Err(error_span(MISSING_RHS, range));
        }
        let value = self.name(&right);
        if let Some(ws) = value.find(char::is_whitespace) {
            return Err(error_span(TOO_MANY_RHS, right.start + ws..right.end));
        }
        self.assign_global(&left, &right)
    }

    fn assign_global(&mut self, name_range: &NameRange, value_range: &NameRange) -> Result<()> {
        let name = self.name(name_range);
        let mut prop = GlobalProp::new_default(name)
            .map_err(|err| error_span(err, name_range.clone()))?;
        prop.set_value(self.name(value_range))
            .map_err(|err| error_span(err, value_range.clone()))?;
        log::debug!("{} = {}", name, self.name(value_range));
        self.config.set(prop);
        Ok(())
    }

    fn name(&self, name_range: &NameRange) -> &'source str {
        &self.source[name_range.start..name_range.end]
    }

    fn build_config(self) -> SettingsConfig {
        self.config
    }
}

/// The non-blank part of `text[range]`, as an absolute range offset by `base`.
fn trimmed_range(text: &str, range: Range<usize>, base: usize) -> NameRange {
    let part = &text[range.clone()];
    let lead = part.len() - part.trim_start().len();
    let start = base + range.start + lead;
    start..start + part.trim().len()
}

fn error_span(message: impl Into<String>, range: NameRange) -> ConfigError {
    ConfigError::new(message.into(), range)
}

pub fn compile(source: &str) -> Result<SettingsConfig> {
    let mut parser = Parser::new(source);

    parser.parse_lines()?;
    Ok(parser.build_config())
}

#[cfg(test)]
#[path = "compiler_test.rs"]
mod test;
