//! Mutable global binding surface
//!
//! Models the parts of a page's global object and prototypes the hub
//! patches: a table of members keyed by owner and name, each carrying
//! `writable` / `configurable` flags with `Object.defineProperty`
//! semantics.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::value::{JsFunction, JsValue};
use crate::JsError;

/// Owner of a surface member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Capability {
    /// `window`
    Window,
    /// `window.history`
    History,
    /// `HTMLFormElement.prototype`
    HtmlFormElement,
    /// `Element.prototype`
    Element,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Window => "Window",
            Self::History => "History",
            Self::HtmlFormElement => "HTMLFormElement.prototype",
            Self::Element => "Element.prototype",
        })
    }
}

/// Property descriptor for [`Surface::define_property`]
#[derive(Debug, Clone, Default)]
pub struct PropertyDescriptor {
    pub value: Option<JsValue>,
    pub writable: Option<bool>,
    pub configurable: Option<bool>,
}

impl PropertyDescriptor {
    /// `{ writable: false, configurable: false }`
    pub fn read_only() -> Self {
        Self {
            value: None,
            writable: Some(false),
            configurable: Some(false),
        }
    }
}

#[derive(Debug, Clone)]
struct Binding {
    value: JsValue,
    writable: bool,
    configurable: bool,
}

#[derive(Debug, Default)]
struct BindingTable {
    members: HashMap<(Capability, String), Binding>,
    markers: HashSet<String>,
}

/// Shared handle to the binding table.
///
/// Clones refer to the same table. The table lock is only held while a
/// binding is read or written, never while a function runs.
#[derive(Debug, Clone, Default)]
pub struct Surface {
    table: Arc<Mutex<BindingTable>>,
}

impl Surface {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self) -> MutexGuard<'_, BindingTable> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Assignment: `owner.member = value`.
    ///
    /// New members are created writable and configurable. Assigning to a
    /// non-writable member is a TypeError (strict-mode semantics).
    pub fn define(&self, owner: Capability, member: &str, value: JsValue) -> Result<(), JsError> {
        let mut table = self.table();
        match table.members.get_mut(&(owner, member.to_string())) {
            Some(binding) if !binding.writable => Err(JsError::TypeError(format!(
                "Cannot assign to read only property '{member}' of {owner}"
            ))),
            Some(binding) => {
                binding.value = value;
                Ok(())
            }
            None => {
                table.members.insert(
                    (owner, member.to_string()),
                    Binding {
                        value,
                        writable: true,
                        configurable: true,
                    },
                );
                Ok(())
            }
        }
    }

    /// `Object.defineProperty(owner, member, descriptor)`.
    ///
    /// A non-configurable member only accepts descriptors that change
    /// nothing; anything else is a TypeError.
    pub fn define_property(
        &self,
        owner: Capability,
        member: &str,
        descriptor: PropertyDescriptor,
    ) -> Result<(), JsError> {
        let mut table = self.table();
        let key = (owner, member.to_string());

        let binding = match table.members.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(Binding {
                    value: descriptor.value.unwrap_or(JsValue::Undefined),
                    writable: descriptor.writable.unwrap_or(false),
                    configurable: descriptor.configurable.unwrap_or(false),
                });
                return Ok(());
            }
            Entry::Occupied(slot) => slot.into_mut(),
        };

        if !binding.configurable {
            let loosens = descriptor.configurable == Some(true)
                || (!binding.writable && descriptor.writable == Some(true));
            let value_changes = !binding.writable
                && descriptor.value.as_ref().is_some_and(|v| *v != binding.value);
            if loosens || value_changes {
                return Err(JsError::TypeError(format!("Cannot redefine property: {member}")));
            }
        }

        if let Some(value) = descriptor.value {
            binding.value = value;
        }
        if let Some(writable) = descriptor.writable {
            binding.writable = writable;
        }
        if let Some(configurable) = descriptor.configurable {
            binding.configurable = configurable;
        }
        Ok(())
    }

    /// Make a member non-writable and non-configurable
    pub fn lock(&self, owner: Capability, member: &str) -> Result<(), JsError> {
        self.define_property(owner, member, PropertyDescriptor::read_only())
    }

    pub fn get(&self, owner: Capability, member: &str) -> Option<JsValue> {
        self.table()
            .members
            .get(&(owner, member.to_string()))
            .map(|b| b.value.clone())
    }

    pub fn has(&self, owner: Capability, member: &str) -> bool {
        self.table().members.contains_key(&(owner, member.to_string()))
    }

    /// The function currently bound to `owner.member`
    pub fn function(&self, owner: Capability, member: &str) -> Result<JsFunction, JsError> {
        match self.get(owner, member) {
            Some(JsValue::Function(f)) => Ok(f),
            Some(_) => Err(JsError::TypeError(format!("{owner}.{member} is not a function"))),
            None => Err(JsError::ReferenceError(format!("{owner}.{member} is not defined"))),
        }
    }

    /// Call `owner.member` with `this` and `args`
    pub fn call(
        &self,
        owner: Capability,
        member: &str,
        this: &JsValue,
        args: &[JsValue],
    ) -> Result<JsValue, JsError> {
        // The table lock is released before the call
        let func = self.function(owner, member)?;
        func.call(this, args)
    }

    pub fn is_locked(&self, owner: Capability, member: &str) -> bool {
        self.table()
            .members
            .get(&(owner, member.to_string()))
            .is_some_and(|b| !b.writable && !b.configurable)
    }

    /// Set a marker; false when it was already present.
    pub fn mark(&self, marker: &str) -> bool {
        self.table().markers.insert(marker.to_string())
    }

    pub fn has_marker(&self, marker: &str) -> bool {
        self.table().markers.contains(marker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant(n: f64) -> JsValue {
        JsValue::Function(JsFunction::native("f", move |_, _| Ok(JsValue::Number(n))))
    }

    #[test]
    fn test_define_and_call() {
        let surface = Surface::new();
        surface.define(Capability::Window, "f", constant(1.0)).unwrap();
        let result = surface
            .call(Capability::Window, "f", &JsValue::Undefined, &[])
            .unwrap();
        assert_eq!(result, JsValue::Number(1.0));

        // Reassignment is allowed until locked
        surface.define(Capability::Window, "f", constant(2.0)).unwrap();
        let result = surface
            .call(Capability::Window, "f", &JsValue::Undefined, &[])
            .unwrap();
        assert_eq!(result, JsValue::Number(2.0));
    }

    #[test]
    fn test_locked_member_rejects_changes() {
        let surface = Surface::new();
        surface.define(Capability::Window, "close", constant(1.0)).unwrap();
        surface.lock(Capability::Window, "close").unwrap();
        assert!(surface.is_locked(Capability::Window, "close"));

        let err = surface
            .define(Capability::Window, "close", constant(2.0))
            .unwrap_err();
        assert!(matches!(err, JsError::TypeError(_)));

        let err = surface
            .define_property(
                Capability::Window,
                "close",
                PropertyDescriptor {
                    configurable: Some(true),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, JsError::TypeError(_)));

        // Re-locking is a no-op
        surface.lock(Capability::Window, "close").unwrap();
    }

    #[test]
    fn test_missing_and_non_function() {
        let surface = Surface::new();
        surface
            .define(Capability::Window, "name", JsValue::from("x"))
            .unwrap();

        assert!(matches!(
            surface.function(Capability::Window, "nope"),
            Err(JsError::ReferenceError(_))
        ));
        assert!(matches!(
            surface.call(Capability::Window, "name", &JsValue::Undefined, &[]),
            Err(JsError::TypeError(_))
        ));
        assert!(!surface.has(Capability::History, "name"));
    }

    #[test]
    fn test_markers() {
        let surface = Surface::new();
        assert!(surface.mark("x"));
        assert!(!surface.mark("x"));
        assert!(surface.has_marker("x"));
    }

    #[test]
    fn test_call_releases_table_lock() {
        let surface = Surface::new();
        let inner = surface.clone();
        let reentrant = JsFunction::native("outer", move |_, _| {
            inner.define(Capability::Window, "side", JsValue::Bool(true))?;
            Ok(JsValue::Undefined)
        });
        surface
            .define(Capability::Window, "outer", JsValue::Function(reentrant))
            .unwrap();
        surface
            .call(Capability::Window, "outer", &JsValue::Undefined, &[])
            .unwrap();
        assert_eq!(surface.get(Capability::Window, "side"), Some(JsValue::Bool(true)));
    }
}
