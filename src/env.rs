use std::collections::BTreeMap;

/// Lookup that accessors and the loader read variables from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvSource {
    kind: EnvSourceKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum EnvSourceKind {
    /// Read the current process environment.
    ///
    /// Every lookup goes through [`std::env::var_os`]; nothing is cached.
    Process,
    /// Read an in-memory map.
    Memory(BTreeMap<String, String>),
}

impl Default for EnvSource {
    fn default() -> Self {
        Self::process()
    }
}

impl EnvSource {
    /// Create a source backed by the live process environment.
    pub fn process() -> Self {
        Self {
            kind: EnvSourceKind::Process,
        }
    }

    /// Create an empty in-memory source.
    ///
    /// Use this to avoid depending on the process environment.
    pub fn memory() -> Self {
        Self::from_memory(BTreeMap::new())
    }

    /// Create an in-memory source from an existing map.
    pub fn from_memory(map: BTreeMap<String, String>) -> Self {
        Self {
            kind: EnvSourceKind::Memory(map),
        }
    }

    /// Add a variable to an in-memory source. No effect on a process source.
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let EnvSourceKind::Memory(map) = &mut self.kind {
            map.insert(key.into(), value.into());
        }
        self
    }

    pub fn is_process(&self) -> bool {
        matches!(self.kind, EnvSourceKind::Process)
    }

    pub fn as_memory(&self) -> Option<&BTreeMap<String, String>> {
        match &self.kind {
            EnvSourceKind::Memory(map) => Some(map),
            EnvSourceKind::Process => None,
        }
    }

    pub fn as_memory_mut(&mut self) -> Option<&mut BTreeMap<String, String>> {
        match &mut self.kind {
            EnvSourceKind::Memory(map) => Some(map),
            EnvSourceKind::Process => None,
        }
    }

    /// Fetch the raw text for `key`.
    ///
    /// Unset and empty variables both come back as `None`. Non-UTF-8 process
    /// values are converted lossily.
    pub fn lookup(&self, key: &str) -> Option<String> {
        let value = match &self.kind {
            EnvSourceKind::Process => {
                std::env::var_os(key).map(|value| value.to_string_lossy().into_owned())
            }
            EnvSourceKind::Memory(map) => map.get(key).cloned(),
        };
        value.filter(|value| !value.is_empty())
    }
}
