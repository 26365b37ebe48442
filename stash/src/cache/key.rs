use shared::{Error, Result};
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// Cache key pattern such as `user:id:{id}`.
///
/// Rendering is deterministic: equal parameters always produce the same key.
/// Keeping distinct resources apart is up to whoever writes the template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl KeyTemplate {
    pub fn parse(template: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = template.chars();

        while let Some(c) = chars.next() {
            match c {
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for c in chars.by_ref() {
                        match c {
                            '}' => {
                                closed = true;
                                break;
                            }
                            '{' => {
                                return Err(invalid(template, "nested '{' in placeholder"));
                            }
                            c => name.push(c),
                        }
                    }
                    if !closed {
                        return Err(invalid(template, "unterminated placeholder"));
                    }
                    let name = name.trim();
                    if name.is_empty() {
                        return Err(invalid(template, "empty placeholder name"));
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Param(name.to_string()));
                }
                '}' => return Err(invalid(template, "unmatched '}'")),
                c => literal.push(c),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }
        if segments.is_empty() {
            return Err(invalid(template, "template is empty"));
        }

        Ok(Self {
            source: template.to_string(),
            segments,
        })
    }

    /// Names of the placeholders, in order of appearance.
    pub fn params(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    pub fn render(&self, params: &[(&str, &str)]) -> Result<String> {
        let mut key = String::with_capacity(self.source.len() + 16);
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => key.push_str(text),
                Segment::Param(name) => {
                    let value = params
                        .iter()
                        .find(|(k, _)| *k == name.as_str())
                        .map(|(_, v)| *v)
                        .ok_or_else(|| {
                            Error::InvalidKey(format!(
                                "missing parameter '{}' for template '{}'",
                                name, self.source
                            ))
                        })?;
                    key.push_str(value);
                }
            }
        }

        if key.is_empty() {
            return Err(Error::InvalidKey(format!(
                "template '{}' rendered an empty key",
                self.source
            )));
        }
        Ok(key)
    }
}

impl fmt::Display for KeyTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn invalid(template: &str, reason: &str) -> Error {
    Error::InvalidKey(format!("{reason} in template '{template}'"))
}
