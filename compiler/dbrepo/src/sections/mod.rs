//! Output sections, referenced source files, and the per-section file
//! numbering used by line-number tables.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use dbrepo_ir::{Address, Name};
use rustc_hash::FxHashMap;

/// Numbering identity of one file within one section's line table.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct FileNumber(u32);

impl FileNumber {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for FileNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileNumber({})", self.0)
    }
}

/// Boundaries of one output section of the unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompilationSection {
    pub name: Name,
    pub start: Address,
    /// Fixed by an explicit end event or by file enumeration.
    pub end: Option<Address>,
}

#[derive(Default)]
pub struct SectionTable {
    /// Sections in registration order.
    sections: Vec<CompilationSection>,
    index: FxHashMap<Name, usize>,
    files: BTreeSet<Name>,
    file_numbers: BTreeMap<(Name, Name), FileNumber>,
}

impl SectionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.sections.clear();
        self.index.clear();
        self.files.clear();
        self.file_numbers.clear();
    }

    // -- Sections --

    /// Register a section, or move its start if it is already registered.
    pub fn add_section_start(&mut self, name: Name, start: Address) {
        if let Some(&i) = self.index.get(&name) {
            self.sections[i].start = start;
            return;
        }
        self.index.insert(name, self.sections.len());
        self.sections.push(CompilationSection {
            name,
            start,
            end: None,
        });
    }

    /// Record the end of a registered section. Unknown sections are ignored.
    pub fn add_section_end(&mut self, name: Name, end: Address) {
        match self.index.get(&name) {
            Some(&i) => self.sections[i].end = Some(end),
            None => tracing::trace!(section = name.raw(), "end of unknown section ignored"),
        }
    }

    pub fn exists(&self, name: Name) -> bool {
        self.index.contains_key(&name)
    }

    pub fn get(&self, name: Name) -> Option<&CompilationSection> {
        self.index.get(&name).map(|&i| &self.sections[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompilationSection> {
        self.sections.iter()
    }

    // -- Files --

    pub fn add_file(&mut self, file: Name) {
        self.files.insert(file);
    }

    pub fn files(&self) -> impl Iterator<Item = Name> + '_ {
        self.files.iter().copied()
    }

    pub fn for_each_file(&self, mut f: impl FnMut(Name)) {
        for &file in &self.files {
            f(file);
        }
    }

    // -- Finalization --

    /// Fix every section's end and number every `(section, file)` pair.
    ///
    /// For each registered section, in registration order: `end_label`
    /// yields the section's end address, `entry_label` is called once per
    /// referenced file to obtain its number, then `on_close` finalizes the
    /// section's line table.
    pub fn compute_file_enum(
        &mut self,
        mut end_label: impl FnMut(Name) -> Address,
        mut entry_label: impl FnMut(Name, Name) -> FileNumber,
        mut on_close: impl FnMut(Name),
    ) {
        for section in &mut self.sections {
            section.end = Some(end_label(section.name));
            for &file in &self.files {
                let number = entry_label(section.name, file);
                self.file_numbers.insert((section.name, file), number);
            }
            on_close(section.name);
        }
        tracing::debug!(
            sections = self.sections.len(),
            files = self.files.len(),
            "file enumeration computed"
        );
    }

    pub fn file_number(&self, section: Name, file: Name) -> Option<FileNumber> {
        self.file_numbers.get(&(section, file)).copied()
    }
}
