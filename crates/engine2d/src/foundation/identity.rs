//! Object identity shared by scenes, entities and behaviors
//!
//! Every engine object carries an [`Identity`]: a process-unique instance id
//! assigned at construction, a display name, and a local active flag. The
//! active flag is never combined with ancestor state.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

/// First id handed out by the counter; zero is never a valid instance id
const FIRST_INSTANCE_ID: u32 = 1;

static NEXT_INSTANCE_ID: AtomicU32 = AtomicU32::new(FIRST_INSTANCE_ID);

/// Process-unique, monotonically increasing object id
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InstanceId(u32);

impl InstanceId {
    fn next() -> Self {
        Self(NEXT_INSTANCE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value
    pub fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Base identity of an engine object
///
/// Not `Clone`: instance ids are never shared between objects.
#[derive(Debug)]
pub struct Identity {
    instance_id: InstanceId,
    name: String,
    active: bool,
}

impl Identity {
    /// Create an identity with a fresh instance id
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            instance_id: InstanceId::next(),
            name: name.into(),
            active: true,
        }
    }

    /// Immutable instance id
    pub fn instance_id(&self) -> InstanceId {
        self.instance_id
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the object
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Local active flag
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Set the local active flag
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}

impl Default for Identity {
    fn default() -> Self {
        Self::new("Object")
    }
}
