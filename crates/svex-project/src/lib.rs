//! Project resolver: registered source files and module lookup.
//!
//! Files are registered in a fixed order. Module lookup searches the
//! requesting file first, then the other files in registration order;
//! within a file the first declaration wins. Duplicate names produce
//! no diagnostics; later declarations are silently shadowed.

use svex_source::FileId;
use svex_surface::{Instance, ModuleSurface, scan_source};

/// A registered file: its text and the scanned module surfaces.
#[derive(Debug, Clone)]
pub struct ProjectFile {
    pub id: FileId,
    pub text: String,
    pub modules: Vec<ModuleSurface>,
}

/// An immutable snapshot of all registered files.
///
/// The engine treats the project as frozen for the duration of one
/// expansion call; the outer adapter rebuilds or updates it between
/// calls.
#[derive(Debug, Clone, Default)]
pub struct Project {
    files: Vec<ProjectFile>,
}

impl Project {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file. Returns its id (the registration index).
    pub fn add_file(&mut self, text: impl Into<String>) -> FileId {
        let id = FileId(self.files.len() as u32);
        let text = text.into();
        let modules = scan_source(&text);
        self.files.push(ProjectFile { id, text, modules });
        id
    }

    /// Replace a registered file's text and rescan it.
    pub fn update_file(&mut self, id: FileId, text: impl Into<String>) {
        let Some(file) = self.files.get_mut(id.0 as usize) else {
            return;
        };
        file.text = text.into();
        file.modules = scan_source(&file.text);
    }

    pub fn file(&self, id: FileId) -> Option<&ProjectFile> {
        self.files.get(id.0 as usize)
    }

    /// Registered files in registration order.
    pub fn files(&self) -> impl Iterator<Item = &ProjectFile> {
        self.files.iter()
    }

    /// Modules declared in one file, in source order.
    pub fn modules_in_file(&self, id: FileId) -> &[ModuleSurface] {
        self.file(id).map(|f| f.modules.as_slice()).unwrap_or(&[])
    }

    /// Resolve a module name as seen from `from`: the requesting file
    /// is searched first, then the others in registration order. The
    /// first declaration encountered wins.
    pub fn resolve(&self, from: FileId, name: &str) -> Option<&ModuleSurface> {
        if let Some(m) = self
            .file(from)
            .and_then(|f| f.modules.iter().find(|m| m.name == name))
        {
            return Some(m);
        }
        self.files
            .iter()
            .filter(|f| f.id != from)
            .flat_map(|f| f.modules.iter())
            .find(|m| m.name == name)
    }

    /// All instantiations of a named module across the project:
    /// `(file, enclosing module, instance)` triples in registration
    /// and source order.
    pub fn instantiations_of<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = (FileId, &'a ModuleSurface, &'a Instance)> {
        self.files.iter().flat_map(move |f| {
            f.modules.iter().flat_map(move |m| {
                m.instances
                    .iter()
                    .filter(move |i| i.module_name == name)
                    .map(move |i| (f.id, m, i))
            })
        })
    }

}
