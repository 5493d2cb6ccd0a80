// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! ARFF reader.
//!
//! Supports dense and sparse (`{index value, ...}`) data rows, quoted names
//! and values, `?` for missing values and `%` comments. The label column is
//! only taken from the final attribute.

use std::io::BufRead;
use std::path::{Path, PathBuf};

use super::{Reader, ReaderOptions, source_name};
use crate::error::{PredictError, Result};
use crate::features::{Example, FeatureMap, FeatureSet, Label, insert_cell};

/// Reader for Weka ARFF files.
#[derive(Debug, Clone)]
pub struct ArffReader {
    path: PathBuf,
    options: ReaderOptions,
}

impl ArffReader {
    /// Create a new reader.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, options: ReaderOptions) -> Self {
        Self {
            path: path.into(),
            options,
        }
    }
}

#[derive(Debug, Clone)]
struct Attribute {
    name: String,
    nominal: Option<Vec<String>>,
}

impl Attribute {
    /// Value of an attribute left out of a sparse row.
    fn implicit_value(&self) -> &str {
        self.nominal
            .as_ref()
            .and_then(|values| values.first())
            .map_or("0", String::as_str)
    }
}

/// Column roles resolved once the header is complete.
#[derive(Debug, Clone, Copy)]
struct Layout {
    label: Option<usize>,
    id: Option<usize>,
}

impl Reader for ArffReader {
    fn path(&self) -> &Path {
        &self.path
    }

    fn options(&self) -> &ReaderOptions {
        &self.options
    }

    fn read_from(&self, input: &mut dyn BufRead) -> Result<FeatureSet> {
        let name = source_name(&self.path);
        let mut feature_set = FeatureSet::new(&name);
        let mut attributes: Vec<Attribute> = Vec::new();
        let mut layout: Option<Layout> = None;

        for (line_no, line) in input.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('%') {
                continue;
            }
            let err = |msg: String| PredictError::read_at(&name, line_no + 1, msg);

            let Some(layout) = layout else {
                let lower = line.to_lowercase();
                if lower.starts_with("@relation") {
                    continue;
                } else if lower.starts_with("@attribute") {
                    attributes.push(parse_attribute(&line["@attribute".len()..]).map_err(err)?);
                } else if lower.starts_with("@data") {
                    layout = Some(self.layout(&attributes));
                } else {
                    return Err(err(format!("unexpected header line '{line}'")));
                }
                continue;
            };

            let values = if let Some(inner) = line.strip_prefix('{') {
                let inner = inner
                    .strip_suffix('}')
                    .ok_or_else(|| err("unterminated sparse row".to_string()))?;
                sparse_values(inner, &attributes).map_err(err)?
            } else {
                let values = split_fields(line);
                if values.len() != attributes.len() {
                    return Err(err(format!(
                        "expected {} values, found {}",
                        attributes.len(),
                        values.len()
                    )));
                }
                values.into_iter().map(Some).collect()
            };

            let mut id = None;
            let mut label = None;
            let mut features = FeatureMap::new();
            for (col, (attribute, value)) in attributes.iter().zip(&values).enumerate() {
                let Some(value) = value.as_deref() else {
                    continue;
                };
                if Some(col) == layout.id {
                    id = Some(value.to_string()).filter(|v| v != "?");
                } else if Some(col) == layout.label {
                    label = Some(value).filter(|v| *v != "?").map(Label::parse);
                } else {
                    insert_cell(&mut features, &attribute.name, value);
                }
            }

            let id = id.unwrap_or_else(|| Example::default_id(feature_set.len()));
            feature_set.push(Example::new(id, label, features));
        }

        if layout.is_none() && !attributes.is_empty() {
            return Err(PredictError::ReadError(format!("{name}: missing @data section")));
        }
        Ok(feature_set)
    }
}

impl ArffReader {
    fn layout(&self, attributes: &[Attribute]) -> Layout {
        let label = attributes
            .len()
            .checked_sub(1)
            .filter(|&last| attributes[last].name == self.options.label_col);
        let id = attributes
            .iter()
            .position(|a| a.name == self.options.id_col);
        Layout { label, id }
    }
}

/// Parse the remainder of an `@attribute` line: a name and a type.
fn parse_attribute(rest: &str) -> std::result::Result<Attribute, String> {
    let rest = rest.trim_start();
    let (name, kind) = match rest.chars().next() {
        Some(quote @ ('\'' | '"')) => {
            let body = &rest[1..];
            let end = body
                .find(quote)
                .ok_or_else(|| format!("unterminated attribute name in '{rest}'"))?;
            (body[..end].to_string(), body[end + 1..].trim())
        }
        Some(_) => {
            let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
            (rest[..end].to_string(), rest[end..].trim())
        }
        None => return Err("attribute without a name".to_string()),
    };

    let nominal = kind
        .strip_prefix('{')
        .and_then(|k| k.strip_suffix('}'))
        .map(split_fields);
    Ok(Attribute { name, nominal })
}

/// Expand a sparse row body (`0 1.5, 3 red`) into one slot per attribute.
///
/// Attributes left out of the row take their implicit value.
fn sparse_values(
    inner: &str,
    attributes: &[Attribute],
) -> std::result::Result<Vec<Option<String>>, String> {
    let mut values: Vec<Option<String>> = attributes
        .iter()
        .map(|a| Some(a.implicit_value().to_string()))
        .collect();
    for entry in split_fields(inner) {
        if entry.is_empty() {
            continue;
        }
        let (idx, value) = entry
            .split_once(char::is_whitespace)
            .ok_or_else(|| format!("malformed sparse entry '{entry}'"))?;
        let idx: usize = idx
            .parse()
            .map_err(|_| format!("invalid sparse index '{idx}'"))?;
        let slot = values
            .get_mut(idx)
            .ok_or_else(|| format!("sparse index {idx} out of range"))?;
        *slot = Some(unquote(value.trim()));
    }
    Ok(values)
}

/// Split on commas outside quotes, unquoting each field.
fn split_fields(text: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(_), '\\') => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '\'' | '"') => quote = Some(c),
            (None, ',') => fields.push(std::mem::take(&mut current).trim().to_string()),
            (None, c) => current.push(c),
        }
    }
    fields.push(current.trim().to_string());
    fields
}

fn unquote(value: &str) -> String {
    split_fields(value).into_iter().next().unwrap_or_default()
}
