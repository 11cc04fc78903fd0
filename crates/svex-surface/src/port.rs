use smallvec::SmallVec;
use smol_str::SmolStr;

/// Port direction extracted from the source keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortDir {
    Input,
    Output,
    Inout,
}

/// Where a port record came from.
///
/// Declared ports carry `Declared`; the expansion engine clones ports
/// into candidate sets tagged with the instance they were pulled
/// through, which is what the provenance comments are rendered from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortOrigin {
    Declared,
    Instance { instance: SmolStr, module: SmolStr },
}

/// A port of a module: name, direction, and the two dimension groups.
///
/// Dimension entries are the bracketed source text (`"[7:0]"`), in
/// source order. Packed dims precede the name at the declaring site,
/// unpacked dims follow it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Port {
    pub name: SmolStr,
    pub dir: PortDir,
    pub packed: SmallVec<[SmolStr; 1]>,
    pub unpacked: SmallVec<[SmolStr; 1]>,
    pub origin: PortOrigin,
    /// True when the declaration sits inside a previously generated
    /// sentinel block. Such ports are visible to other modules but do
    /// not count as user declarations for re-expansion filtering.
    pub generated: bool,
}

impl Port {
    pub fn new(name: SmolStr, dir: PortDir) -> Self {
        Self {
            name,
            dir,
            packed: SmallVec::new(),
            unpacked: SmallVec::new(),
            origin: PortOrigin::Declared,
            generated: false,
        }
    }

    pub fn has_dims(&self) -> bool {
        !self.packed.is_empty() || !self.unpacked.is_empty()
    }
}
