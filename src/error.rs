#![allow(unused_assignments)]

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum TreesmithError {
    #[error("Config not found at {path}")]
    #[diagnostic(help("Pass --config with the path to a treesmith.toml file"))]
    ConfigNotFound { path: PathBuf },

    #[error("Failed to parse {path}")]
    #[diagnostic(help("Check the TOML syntax in your treesmith.toml file"))]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid handler #{index}: {reason}")]
    InvalidHandler { index: usize, reason: String },

    #[error("Input directory not found: {path}")]
    #[diagnostic(help("Set [build] input in treesmith.toml or pass --input"))]
    InputDirectoryMissing { path: PathBuf },

    #[error("Front matter required but not found in {path}: {reason}")]
    #[diagnostic(help("Add a front matter block at the top of the file"))]
    FrontMatterRequired { path: String, reason: String },

    #[error("Invalid front matter field '{key}' in {document}: {reason}")]
    InvalidFrontMatterField {
        document: String,
        key: String,
        reason: String,
    },

    #[error("Document registered twice: {path}")]
    DuplicateDocument { path: String },

    #[error("Unknown renderer '{name}' requested by {document}")]
    #[diagnostic(help("Built-in renderers: markdown"))]
    UnknownRenderer { name: String, document: String },

    #[error("Failed to load templates")]
    #[diagnostic(help("Check your Tera template syntax"))]
    TemplateLoad {
        #[source]
        source: tera::Error,
    },

    #[error("Template '{template}' not found for {document}")]
    #[diagnostic(help("Templates are looked up by name plus the template suffix (e.g. page.tera)"))]
    TemplateNotFound { template: String, document: String },

    #[error("Template rendering failed for {document}")]
    #[diagnostic(help("Check your Tera template syntax and the variables it uses"))]
    RenderError {
        document: String,
        #[source]
        source: tera::Error,
    },

    #[error("Output path already exists: {} (from {document})", path.display())]
    #[diagnostic(help(
        "Two inputs map to the same output, or the output directory is not clean"
    ))]
    OutputCollision { path: PathBuf, document: String },

    #[error("Output path escapes the output directory: {path}")]
    UnsafeOutputPath { path: String },

    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Glob pattern error: {pattern}")]
    GlobPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

pub type Result<T> = std::result::Result<T, TreesmithError>;
