//! Emission collaborators: serializing units and storing the bytes.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::error::{CompilerError, CompilerResult};
use crate::generation::unit::GeneratedUnit;
use crate::types::ObjectType;

/// Serializes one generated unit into the target artifact format.
pub trait EmissionBackend {
    fn emit(&self, unit: &GeneratedUnit) -> CompilerResult<Vec<u8>>;
}

/// Emits units as JSON documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBackend {
    pretty: bool,
}

impl JsonBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl EmissionBackend for JsonBackend {
    fn emit(&self, unit: &GeneratedUnit) -> CompilerResult<Vec<u8>> {
        let result = if self.pretty {
            serde_json::to_vec_pretty(unit)
        } else {
            serde_json::to_vec(unit)
        };
        result.map_err(|error| CompilerError::Emission {
            ty: unit.ty().clone(),
            message: error.to_string(),
        })
    }
}

/// Destination of emitted artifacts.
///
/// Written artifacts become visible only once [`flush`](ArtifactSink::flush)
/// commits them.
pub trait ArtifactSink {
    fn write(&mut self, ty: &ObjectType, content: Vec<u8>) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()>;
}

/// Keeps artifacts in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    pending: IndexMap<ObjectType, Vec<u8>>,
    committed: IndexMap<ObjectType, Vec<u8>>,
    flushes: usize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Committed artifacts in write order.
    pub fn artifacts(&self) -> &IndexMap<ObjectType, Vec<u8>> {
        &self.committed
    }

    pub fn artifact(&self, ty: &ObjectType) -> Option<&[u8]> {
        self.committed.get(ty).map(Vec::as_slice)
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn flushes(&self) -> usize {
        self.flushes
    }
}

impl ArtifactSink for MemorySink {
    fn write(&mut self, ty: &ObjectType, content: Vec<u8>) -> io::Result<()> {
        self.pending.insert(ty.clone(), content);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.committed.extend(self.pending.drain(..));
        self.flushes += 1;
        Ok(())
    }
}

/// Writes each artifact to `{root}/{internal name}.{extension}` on flush.
#[derive(Debug)]
pub struct DirectorySink {
    root: PathBuf,
    extension: String,
    pending: Vec<(PathBuf, Vec<u8>)>,
}

impl DirectorySink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: "json".to_string(),
            pending: Vec::new(),
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_of(&self, ty: &ObjectType) -> PathBuf {
        let mut path = self.root.clone();
        let mut segments = ty.internal_name().split('/').peekable();
        while let Some(segment) = segments.next() {
            if segments.peek().is_some() {
                path.push(segment);
            } else {
                path.push(format!("{segment}.{}", self.extension));
            }
        }
        path
    }
}

impl ArtifactSink for DirectorySink {
    fn write(&mut self, ty: &ObjectType, content: Vec<u8>) -> io::Result<()> {
        let path = self.path_of(ty);
        self.pending.push((path, content));
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        for (path, content) in self.pending.drain(..) {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, content)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_sink_commits_on_flush() {
        let mut sink = MemorySink::new();
        let ty = ObjectType::new("app/X$ConstructorProvider0$main");
        sink.write(&ty, b"{}".to_vec()).unwrap();

        assert!(sink.artifact(&ty).is_none());
        sink.flush().unwrap();
        assert_eq!(sink.artifact(&ty), Some(&b"{}"[..]));
        assert_eq!(sink.pending(), 0);
    }

    #[test]
    fn directory_sink_maps_internal_names_to_paths() {
        let sink = DirectorySink::new("/out");
        let path = sink.path_of(&ObjectType::new("app/X$ConstructorProvider0$main"));
        assert_eq!(path, PathBuf::from("/out/app/X$ConstructorProvider0$main.json"));
    }
}
