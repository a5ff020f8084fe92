/// parse task document with structure like " title1 key1: value1, value2 key2: value2 title2 key3:value3, value4" which has titles and
/// pairs key-vector of values. Unlike a map, sections keep their pairs in the order they were written and a key may repeat,
/// so a list of curves can be written as
///```text
/// canvas
/// width: 600
/// height: 350
/// curves
/// y: x^2
/// y: 4
/// output
/// png: domain.png
///```
/// Values end at a comma, a semicolon or whitespace, so equations are written without spaces.
use crate::Utils::canvas::CanvasConfig;
use crate::Utils::plots::SamplerSettings;
use crate::numerical::boundary_solver::CurveRow;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{alpha1, alphanumeric1, multispace0, space0},
    combinator::{map, map_res, recognize},
    multi::{many0, many1, separated_list0},
    sequence::{delimited, pair, separated_pair, terminated},
};
use std::fmt::Display;
use std::fs;

/// enum to represent different value types:
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Float(f64),
    Integer(i64),
    Boolean(bool),
}

impl Value {
    /// integers are accepted as floats too
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        if let Value::Integer(i) = self { Some(*i) } else { None }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        if let Value::Boolean(b) = self { Some(*b) } else { None }
    }

    // Try to convert to string representation
    pub fn to_string_value(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Float(f) => f.to_string(),
            Value::Integer(i) => i.to_string(),
            Value::Boolean(b) => b.to_string(),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_string_value())
    }
}

/// section title plus its pairs in document order
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub title: String,
    pub pairs: Vec<(String, Vec<Value>)>,
}

impl Section {
    /// values of the first pair with this key
    pub fn get(&self, key: &str) -> Option<&Vec<Value>> {
        self.pairs.iter().find(|(k, _)| k == key).map(|(_, values)| values)
    }
}

fn parse_identifier(input: &str) -> IResult<&str, String> {
    let parser = recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ));
    let mut parser = map(parser, String::from);
    parser.parse(input)
}

/// Parses a title (word characters without spaces)
pub(crate) fn parse_title(input: &str) -> IResult<&str, String> {
    let (input, result) = parse_identifier(input)?;
    // Ignore trailing whitespace and newline characters
    Ok((input.trim(), result))
}

/// Parses a key (word characters without spaces)
pub(crate) fn parse_key(input: &str) -> IResult<&str, String> {
    parse_identifier(input)
}

pub(crate) fn parse_value(input: &str) -> IResult<&str, Value> {
    // Parse a single value - excluding commas, whitespace, newlines, and semicolons
    let value_parser = take_while1(|c: char| !matches!(c, ',' | ' ' | '\t' | '\n' | '\r' | ';'));
    let mut value_parser = map_res(value_parser, |s: &str| -> Result<Value, String> {
        // Try parsing as different types in order
        if let Ok(val) = s.parse::<i64>() {
            Ok(Value::Integer(val))
        } else if let Ok(val) = s.parse::<f64>() {
            Ok(Value::Float(val))
        } else if let Ok(val) = s.parse::<bool>() {
            Ok(Value::Boolean(val))
        } else {
            Ok(Value::String(s.to_string()))
        }
    });
    value_parser.parse(input)
}

pub(crate) fn parse_value_list(input: &str) -> IResult<&str, Vec<Value>> {
    // values stay on the line of their key, an empty list is allowed
    let (input, _) = space0(input)?;
    let separator_coma = delimited(space0, tag(","), space0);
    let mut value_parser = separated_list0(separator_coma, parse_value);
    value_parser.parse(input)
}

/// Parses a key-value pair where value is a list
pub(crate) fn parse_key_value_pair(input: &str) -> IResult<&str, (String, Vec<Value>)> {
    let colon_separator = delimited(space0, tag(":"), space0);
    let mut parser = separated_pair(parse_key, colon_separator, parse_value_list);
    let (input, result) = parser.parse(input)?;
    Ok((input.trim(), result))
}

/// Parses a section with a title and multiple key-value pairs
pub(crate) fn parse_section(input: &str) -> IResult<&str, Section> {
    let (input, _) = space0(input)?;
    let (input, title) = parse_title(input)?;
    let (input, _) = multispace0(input)?;
    let mut parser = many1(terminated(parse_key_value_pair, space0));
    let (input, pairs) = parser.parse(input)?;
    Ok((input, Section { title, pairs }))
}

/// Filters out comment lines (starting with //, #, %) and empty lines
pub(crate) fn filter_comments(input: &str) -> String {
    input
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("//")
                && !trimmed.starts_with('#')
                && !trimmed.starts_with('%')
                && !trimmed.is_empty()
        })
        .collect::<Vec<&str>>()
        .join("\n")
}

/// Parses the entire document into its sections
pub fn parse_document(input: &str) -> Result<Vec<Section>, String> {
    let filtered_input = filter_comments(input);
    let mut parser = many1(delimited(space0, parse_section, multispace0));
    match parser.parse(filtered_input.as_str()) {
        Ok((remaining, sections)) => {
            if !remaining.trim().is_empty() {
                return Err(format!(
                    "Failed to parse entire document. Remaining: '{}'",
                    remaining
                ));
            }
            Ok(sections)
        }
        Err(e) => Err(format!("Parsing error: {:?}", e)),
    }
}

/// where and how the results of a task are saved
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OutputConfig {
    pub png: Option<String>,
    pub svg: Option<String>,
    pub csv: Option<String>,
    pub loglevel: Option<String>,
    pub log_file: bool,
}

/// everything a task document describes; missing keys keep their defaults
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TaskConfig {
    pub canvas: CanvasConfig,
    pub sampling: SamplerSettings,
    pub rows: Vec<CurveRow>,
    pub output: OutputConfig,
}

fn single_value<'a>(title: &str, key: &str, values: &'a [Value]) -> Result<&'a Value, String> {
    match values {
        [value] => Ok(value),
        _ => Err(format!(
            "{}: key '{}' needs exactly one value, got {}",
            title,
            key,
            values.len()
        )),
    }
}

fn float_value(title: &str, key: &str, values: &[Value]) -> Result<f64, String> {
    let value = single_value(title, key, values)?;
    value
        .as_float()
        .ok_or_else(|| format!("{}: key '{}' must be a number, got '{}'", title, key, value))
}

fn pixel_value(title: &str, key: &str, values: &[Value]) -> Result<u32, String> {
    let value = single_value(title, key, values)?;
    value
        .as_integer()
        .and_then(|i| u32::try_from(i).ok())
        .ok_or_else(|| format!("{}: key '{}' must be a pixel count, got '{}'", title, key, value))
}

fn unknown_key(title: &str, key: &str) -> String {
    format!("{}: unknown key '{}'", title, key)
}

impl TaskConfig {
    pub fn from_sections(sections: &[Section]) -> Result<Self, String> {
        let mut task = TaskConfig::default();
        for section in sections {
            let title = section.title.as_str();
            for (key, values) in &section.pairs {
                match (title, key.as_str()) {
                    ("canvas", "width") => task.canvas.width = pixel_value(title, key, values)?,
                    ("canvas", "height") => task.canvas.height = pixel_value(title, key, values)?,
                    ("canvas", "scale_x") => task.canvas.scale_x = float_value(title, key, values)?,
                    ("canvas", "scale_y") => task.canvas.scale_y = float_value(title, key, values)?,
                    ("canvas", _) => return Err(unknown_key(title, key)),
                    ("sampling", "step") => task.sampling.step = float_value(title, key, values)?,
                    ("sampling", "smoothness") => {
                        task.sampling.smoothness = float_value(title, key, values)?
                    }
                    ("sampling", _) => return Err(unknown_key(title, key)),
                    // every value of a curves key is one row
                    ("curves", _) if values.is_empty() => task.rows.push(CurveRow::new(key, "")),
                    ("curves", _) => task.rows.extend(
                        values
                            .iter()
                            .map(|value| CurveRow::new(key, &value.to_string_value())),
                    ),
                    ("output", "png") => {
                        task.output.png = Some(single_value(title, key, values)?.to_string_value())
                    }
                    ("output", "svg") => {
                        task.output.svg = Some(single_value(title, key, values)?.to_string_value())
                    }
                    ("output", "csv") => {
                        task.output.csv = Some(single_value(title, key, values)?.to_string_value())
                    }
                    ("output", "loglevel") => {
                        task.output.loglevel =
                            Some(single_value(title, key, values)?.to_string_value())
                    }
                    ("output", "log_file") => {
                        task.output.log_file = single_value(title, key, values)?
                            .as_boolean()
                            .ok_or_else(|| format!("{}: key '{}' must be true or false", title, key))?
                    }
                    ("output", _) => return Err(unknown_key(title, key)),
                    _ => return Err(format!("unknown section '{}'", title)),
                }
            }
        }
        task.canvas.validate()?;
        task.sampling.validate()?;
        Ok(task)
    }

    pub fn parse(input: &str) -> Result<Self, String> {
        Self::from_sections(&parse_document(input)?)
    }

    pub fn from_file(path: &str) -> Result<Self, String> {
        let content =
            fs::read_to_string(path).map_err(|e| format!("can not read task file {}: {}", path, e))?;
        Self::parse(&content)
    }
}
