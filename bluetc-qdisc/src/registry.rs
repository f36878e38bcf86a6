use std::fmt;
use std::sync::LazyLock;

use rustc_hash::FxHashMap;

use crate::blue::BlueCsc573;
use crate::fifo::Fifo;
use crate::{QdiscError, QdiscUtil};

static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::with_builtin);

/// The process-wide registry holding every built-in qdisc module.
pub fn registry() -> &'static Registry {
    &REGISTRY
}

/// Qdisc modules indexed by identifier.
#[derive(Default)]
pub struct Registry {
    utils: FxHashMap<&'static str, Box<dyn QdiscUtil>>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.ids()).finish()
    }
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with `blue_csc573`, `pfifo` and `bfifo`.
    pub fn with_builtin() -> Self {
        let mut this = Self::new();
        this.register(BlueCsc573);
        this.register(Fifo::PFIFO);
        this.register(Fifo::BFIFO);
        this
    }

    /// Adds a module, replacing any module previously registered under the same id.
    pub fn register<U: QdiscUtil>(&mut self, util: U) {
        let id = util.id();
        if self.utils.insert(id, Box::new(util)).is_some() {
            tracing::warn!(id, "replaced registered qdisc module");
        }
    }

    /// The module registered under `id`, if any.
    pub fn get(&self, id: &str) -> Option<&dyn QdiscUtil> {
        self.utils.get(id).map(|util| util.as_ref())
    }

    /// Like [`get`](Self::get), but an unknown id is an error.
    pub fn lookup(&self, id: &str) -> Result<&dyn QdiscUtil, QdiscError> {
        self.get(id).ok_or_else(|| QdiscError::UnknownQdisc(id.to_owned()))
    }

    /// Registered identifiers, sorted.
    pub fn ids(&self) -> Vec<&'static str> {
        let mut ids: Vec<_> = self.utils.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}
