use std::path::PathBuf;

use thiserror::Error;

use crate::types::GapId;

/// Which size bound of a specifier is at fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Width,
    Height,
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dimension::Width => f.write_str("width"),
            Dimension::Height => f.write_str("height"),
        }
    }
}

/// Failure to load a template. Lines and columns are 1-based and point at
/// the opening delimiter of the offending specifier in the template source.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("line {line}, column {column}: gap specifier is never closed")]
    Unterminated { line: usize, column: usize },
    #[error("line {line}, column {column}: malformed gap specifier `{body}`")]
    Malformed {
        line: usize,
        column: usize,
        body: String,
    },
    #[error("line {line}, column {column}: minimum {dimension} {min} exceeds maximum {max}")]
    InvertedBounds {
        line: usize,
        column: usize,
        dimension: Dimension,
        min: u32,
        max: u32,
    },
    #[error("line {line}, column {column}: {dimension} {value} exceeds the limit of {limit}")]
    TooLarge {
        line: usize,
        column: usize,
        dimension: Dimension,
        value: u32,
        limit: u32,
    },
    #[error("line {line}, column {column}: gap height must be at least 1")]
    ZeroHeight { line: usize, column: usize },
    #[error("line {line}, column {column}: a multi-line gap must be the only gap on its line")]
    SharedMultiLine { line: usize, column: usize },
}

/// A hand-built gap layout the registry cannot keep consistent.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("{gap}: {dimension} {value} exceeds the limit of {limit}")]
    TooLarge {
        gap: GapId,
        dimension: Dimension,
        value: u32,
        limit: u32,
    },
    #[error("{gap}: minimum {dimension} {min} exceeds maximum {max}")]
    InvertedBounds {
        gap: GapId,
        dimension: Dimension,
        min: u32,
        max: u32,
    },
    #[error("{gap}: gap height must be at least 1")]
    ZeroHeight { gap: GapId },
    #[error("{first} overlaps {second}")]
    Overlap { first: GapId, second: GapId },
    #[error("{gap} is multi-line and shares a row with {other}")]
    SharedRows { gap: GapId, other: GapId },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

/// Reported by a [`DecorationSink`](crate::traits::DecorationSink). Never
/// undoes the edit that triggered the refresh.
#[derive(Debug, Error)]
#[error("decoration failed: {0}")]
pub struct DecorationError(pub String);
