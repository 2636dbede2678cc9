//! Arguments and results of export entry points.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Every export entry point that can be guarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntryPoint {
    /// Generic free export function.
    Export,
    /// Format-generic export in the top-level namespace.
    CqExport,
    ShapeStl,
    ShapeStep,
    ShapeBin,
    ShapeBrep,
    AssemblyExport,
    AssemblySave,
}

impl EntryPoint {
    pub const ALL: [EntryPoint; 8] = [
        EntryPoint::Export,
        EntryPoint::CqExport,
        EntryPoint::ShapeStl,
        EntryPoint::ShapeStep,
        EntryPoint::ShapeBin,
        EntryPoint::ShapeBrep,
        EntryPoint::AssemblyExport,
        EntryPoint::AssemblySave,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntryPoint::Export => "export",
            EntryPoint::CqExport => "cq_export",
            EntryPoint::ShapeStl => "export_stl",
            EntryPoint::ShapeStep => "export_step",
            EntryPoint::ShapeBin => "export_bin",
            EntryPoint::ShapeBrep => "export_brep",
            EntryPoint::AssemblyExport => "assembly_export",
            EntryPoint::AssemblySave => "assembly_save",
        }
    }
}

impl fmt::Display for EntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A positional or keyword argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Str(String),
    Path(PathBuf),
    Bool(bool),
    Int(i64),
    Float(f64),
}

impl ArgValue {
    /// The value as a filesystem path, when it is a string or path.
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            ArgValue::Str(s) => Some(Path::new(s)),
            ArgValue::Path(p) => Some(p.as_path()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgValue::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ArgValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ArgValue::Float(v) => Some(*v),
            ArgValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }
}

impl From<&str> for ArgValue {
    fn from(s: &str) -> Self {
        ArgValue::Str(s.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(s: String) -> Self {
        ArgValue::Str(s)
    }
}

impl From<PathBuf> for ArgValue {
    fn from(p: PathBuf) -> Self {
        ArgValue::Path(p)
    }
}

impl From<&Path> for ArgValue {
    fn from(p: &Path) -> Self {
        ArgValue::Path(p.to_path_buf())
    }
}

impl From<bool> for ArgValue {
    fn from(b: bool) -> Self {
        ArgValue::Bool(b)
    }
}

impl From<i64> for ArgValue {
    fn from(v: i64) -> Self {
        ArgValue::Int(v)
    }
}

impl From<f64> for ArgValue {
    fn from(v: f64) -> Self {
        ArgValue::Float(v)
    }
}

/// Positional and keyword arguments forwarded unchanged to the backend.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportArgs {
    pub positional: Vec<ArgValue>,
    pub keywords: BTreeMap<String, ArgValue>,
}

impl ExportArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arguments whose first positional is the destination path.
    pub fn to(path: impl AsRef<Path>) -> Self {
        Self::new().arg(path.as_ref())
    }

    pub fn arg(mut self, value: impl Into<ArgValue>) -> Self {
        self.positional.push(value.into());
        self
    }

    pub fn kwarg(mut self, name: &str, value: impl Into<ArgValue>) -> Self {
        self.keywords.insert(name.to_string(), value.into());
        self
    }

    pub fn keyword(&self, name: &str) -> Option<&ArgValue> {
        self.keywords.get(name)
    }

    pub fn bool_kwarg(&self, name: &str) -> Option<bool> {
        self.keyword(name).and_then(ArgValue::as_bool)
    }

    pub fn f64_kwarg(&self, name: &str) -> Option<f64> {
        self.keyword(name).and_then(ArgValue::as_f64)
    }

    pub fn str_kwarg(&self, name: &str) -> Option<&str> {
        self.keyword(name).and_then(ArgValue::as_str)
    }

    /// Destination path: keyword `fileName`, then `fname`, then the first
    /// positional argument.
    pub fn destination(&self) -> Option<&Path> {
        ["fileName", "fname"]
            .iter()
            .find_map(|k| self.keyword(k))
            .or_else(|| self.positional.first())
            .and_then(ArgValue::as_path)
    }
}

/// Lower-cased extension without the dot; empty when there is none.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
        .unwrap_or_default()
}

/// What an export produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportOutput {
    /// An artifact was written to disk.
    Written(PathBuf),
    /// The artifact was returned in memory.
    Bytes(Vec<u8>),
    /// The backend produced nothing observable.
    Done,
}
