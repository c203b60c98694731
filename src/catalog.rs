//! The fixed catalog of controllables and the policy that picks the active one
//!
//! The catalog is known at compile time. Only the alive/dead flag of each
//! entry changes at runtime, and those flags live in [`ControlStates`].

/// A named toggle exposed to the visualization host as an actionable control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controllable {
    /// Unique, stable identifier
    pub id: &'static str,

    /// Human-readable label
    pub human: &'static str,

    /// Icon reference understood by the host UI (font-awesome names)
    pub icon: &'static str,

    /// Static display rank
    pub rank: i32,

    /// Dead flag the process starts with
    pub initially_dead: bool,
}

/// Controllables in catalog order
pub const CATALOG: &[Controllable] = &[
    Controllable {
        id: "control-a",
        human: "Control A",
        icon: "fa-bomb",
        rank: 1,
        initially_dead: true,
    },
    Controllable {
        id: "control-b",
        human: "Control B",
        icon: "fa-adjust",
        rank: 2,
        initially_dead: false,
    },
];

/// Current dead flags of a catalog, index-aligned with it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlStates {
    catalog: &'static [Controllable],
    dead: Vec<bool>,
}

impl ControlStates {
    /// States as they are when the process starts.
    pub fn initial(catalog: &'static [Controllable]) -> Self {
        Self {
            catalog,
            dead: catalog.iter().map(|c| c.initially_dead).collect(),
        }
    }

    /// States with explicit dead flags.
    ///
    /// Returns `None` when the number of flags does not match the catalog.
    pub fn with_dead_flags(catalog: &'static [Controllable], dead: Vec<bool>) -> Option<Self> {
        (dead.len() == catalog.len()).then_some(Self { catalog, dead })
    }

    pub fn catalog(&self) -> &'static [Controllable] {
        self.catalog
    }

    /// Catalog entries paired with their current dead flag, in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static Controllable, bool)> + '_ {
        self.catalog.iter().zip(self.dead.iter().copied())
    }

    /// Dead flag of the controllable with `id`, if it is in the catalog.
    pub fn is_dead(&self, id: &str) -> Option<bool> {
        self.iter()
            .find(|(control, _)| control.id == id)
            .map(|(_, dead)| dead)
    }

    pub fn dead_flags(&self) -> &[bool] {
        &self.dead
    }

    /// Flip every controllable at once.
    pub(crate) fn toggle_all(&mut self) {
        for dead in &mut self.dead {
            *dead = !*dead;
        }
    }
}

/// The control currently valid for invocation: the first entry in catalog
/// order that is not dead. `None` when every entry is dead.
pub fn active_control(states: &ControlStates) -> Option<&'static Controllable> {
    states
        .iter()
        .find(|(_, dead)| !dead)
        .map(|(control, _)| control)
}
