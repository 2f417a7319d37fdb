//! SPICE subcircuit reader.
//!
//! Only the window between a `.subckt` header and its `.ends` terminator is
//! read. Device lines are whitespace tokenized:
//!
//! ```text
//! <inst> <drain> <gate> <source> <body> <library>__<model> w=<W> l=<L> [key=value ...]
//! ```

use thiserror::Error;

use crate::config::ConvertOptions;
use crate::parser::schema::{Subcircuit, Transistor, TransistorId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("No .subckt definition found in the SPICE input")]
    MissingSubcircuit,
    #[error("Malformed .subckt header at line {line}: expected a name and at least one port, found {tokens} token(s)")]
    MalformedHeader { line: usize, tokens: usize },
    #[error("Subcircuit starting at line {header_line} has no matching .ends")]
    MissingEnds { header_line: usize },
    #[error("Malformed device at line {line}: {reason}")]
    MalformedDevice { line: usize, reason: String },
}

/// Minimum positional fields on a device line (instance, 4 terminals, model)
const DEVICE_FIELDS: usize = 6;

/// Reader for one subcircuit window
pub struct SpiceParser<'a> {
    options: &'a ConvertOptions,
}

impl<'a> SpiceParser<'a> {
    pub fn new(options: &'a ConvertOptions) -> Self {
        Self { options }
    }

    /// Parse the subcircuit window of `source`.
    pub fn parse(&self, source: &str) -> Result<Subcircuit, FormatError> {
        let lines: Vec<&str> = source.lines().collect();
        let (header_idx, ends_idx) = Self::find_window(&lines)?;

        let header = lines[header_idx].trim();
        let tokens: Vec<&str> = header.split_whitespace().collect();
        if tokens.len() < 3 {
            return Err(FormatError::MalformedHeader {
                line: header_idx + 1,
                tokens: tokens.len(),
            });
        }

        let body = Self::logical_lines(&lines, header_idx + 1, ends_idx)?;
        let mut transistors = Vec::with_capacity(body.len());
        for (id, (line_number, text)) in body.iter().enumerate() {
            transistors.push(self.parse_device(text, *line_number, id)?);
        }

        tracing::debug!(
            "Parsed subcircuit {} with {} ports and {} transistors",
            tokens[1],
            tokens.len() - 2,
            transistors.len()
        );

        Ok(Subcircuit {
            name: tokens[1].to_string(),
            ports: tokens[2..].iter().map(|s| s.to_string()).collect(),
            transistors,
            header_line: header_idx + 1,
        })
    }

    /// Locate the header and terminator (0-based line indices).
    ///
    /// A later `.subckt` seen before any `.ends` restarts the window.
    fn find_window(lines: &[&str]) -> Result<(usize, usize), FormatError> {
        let mut header: Option<usize> = None;

        for (idx, raw) in lines.iter().enumerate() {
            let lower = raw.trim().to_ascii_lowercase();
            if lower.starts_with(".subckt") {
                if let Some(previous) = header {
                    tracing::warn!(
                        "Ignoring unterminated .subckt at line {}; using the header at line {}",
                        previous + 1,
                        idx + 1
                    );
                }
                header = Some(idx);
            } else if lower.starts_with(".ends") {
                if let Some(start) = header {
                    return Ok((start, idx));
                }
            }
        }

        match header {
            Some(start) => Err(FormatError::MissingEnds {
                header_line: start + 1,
            }),
            None => Err(FormatError::MissingSubcircuit),
        }
    }

    /// Join continuation lines and drop comments, blanks and directives.
    /// Returns `(1-based line number, text)` per device.
    fn logical_lines(lines: &[&str], start: usize, end: usize) -> Result<Vec<(usize, String)>, FormatError> {
        let mut logical: Vec<(usize, String)> = Vec::new();
        // What a `+` line would continue: None before the first statement,
        // Some(true) after a device line, Some(false) after an ignored directive
        let mut continues_device: Option<bool> = None;

        for (idx, raw) in lines.iter().enumerate().take(end).skip(start) {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('*') {
                continue;
            }

            if let Some(rest) = line.strip_prefix('+') {
                match continues_device {
                    Some(true) => {
                        if let Some((_, text)) = logical.last_mut() {
                            text.push(' ');
                            text.push_str(rest.trim());
                        }
                    }
                    Some(false) => {}
                    None => {
                        return Err(FormatError::MalformedDevice {
                            line: idx + 1,
                            reason: "continuation line without a preceding device line".to_string(),
                        });
                    }
                }
                continue;
            }

            if line.starts_with('.') {
                tracing::debug!("Ignoring directive at line {}: {}", idx + 1, line);
                continues_device = Some(false);
                continue;
            }

            logical.push((idx + 1, line.to_string()));
            continues_device = Some(true);
        }

        Ok(logical)
    }

    fn parse_device(&self, text: &str, line: usize, id: TransistorId) -> Result<Transistor, FormatError> {
        let malformed = |reason: String| FormatError::MalformedDevice { line, reason };

        let tokens: Vec<&str> = text.split_whitespace().collect();
        if tokens.len() < DEVICE_FIELDS {
            return Err(malformed(format!(
                "expected at least {} fields, found {}",
                DEVICE_FIELDS,
                tokens.len()
            )));
        }

        let naming = &self.options.naming;
        let (library, model) = naming.split_model(tokens[5]).ok_or_else(|| {
            malformed(format!(
                "model `{}` is not of the form <library>{}<model>",
                tokens[5], naming.separator
            ))
        })?;

        let mut width = None;
        let mut length = None;
        for token in &tokens[DEVICE_FIELDS..] {
            let Some((key, value)) = token.split_once('=') else {
                continue;
            };
            match key.to_ascii_lowercase().as_str() {
                "w" => width = Some(value),
                "l" => length = Some(value),
                _ => {}
            }
        }

        let width = width
            .filter(|w| !w.is_empty())
            .ok_or_else(|| malformed("missing w= parameter".to_string()))?;
        let length = length
            .filter(|l| !l.is_empty())
            .ok_or_else(|| malformed("missing l= parameter".to_string()))?;

        let transistor = Transistor {
            id,
            instance: tokens[0].to_string(),
            drain: tokens[1].to_string(),
            gate: tokens[2].to_string(),
            source: tokens[3].to_string(),
            body: tokens[4].to_string(),
            polarity: naming.polarity(model),
            width: width.to_string(),
            length: length.to_string(),
            model: model.to_string(),
            library: library.to_string(),
        };

        let nets = &self.options.nets;
        if nets.orient_terminals {
            Ok(transistor.oriented(&nets.supply, &nets.ground))
        } else {
            Ok(transistor)
        }
    }
}

/// Parse the subcircuit window of a netlist with the given options.
pub fn parse_subcircuit(source: &str, options: &ConvertOptions) -> Result<Subcircuit, FormatError> {
    SpiceParser::new(options).parse(source)
}
