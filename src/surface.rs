use std::collections::HashMap;
use std::sync::{Mutex, RwLock};

/// The kind of form control a field is. Selects get `Changed` notifications
/// on programmatic writes; text-like controls get `Input`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Select,
    TextArea,
}

/// Synthetic notification dispatched after a programmatic field write so
/// that host-side listeners observe the update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldEvent {
    Input,
    Changed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Indicator {
    Loading,
    Error,
    Success,
}

/// A field as seen by the controller: a unique handle, the form `name`
/// attribute (possibly empty), and the control kind.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub id: String,
    pub name: String,
    pub kind: FieldKind,
}

/// How the controller locates the destination field.
#[derive(Debug, Clone)]
pub enum Binding {
    /// A fixed field handle, known at embed time.
    Explicit { destination: String },
    /// Scan the surface's fields for a name matching one of the patterns.
    ByNamePattern { patterns: Vec<String> },
}

impl Binding {
    pub fn by_default_patterns() -> Self {
        Binding::ByNamePattern {
            patterns: crate::resolve::DEST_NAME_PATTERNS
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

/// Seam between the controller and whatever renders the form. Implementors
/// must dispatch the appropriate `FieldEvent` when a write mutates a field.
pub trait FormSurface: Send + Sync {
    /// All form controls in document order.
    fn fields(&self) -> Vec<FieldDescriptor>;

    fn value(&self, id: &str) -> Option<String>;

    fn set_value(&self, id: &str, value: &str);

    fn clear_field(&self, id: &str);

    fn set_indicator(&self, indicator: Indicator, visible: bool);
}

struct FieldState {
    descriptor: FieldDescriptor,
    value: String,
}

/// In-memory form for tests and standalone use. Records every dispatched
/// synthetic event so tests can assert on what listeners would have seen.
pub struct MemoryForm {
    fields: RwLock<Vec<FieldState>>,
    indicators: Mutex<HashMap<Indicator, bool>>,
    events: Mutex<Vec<(String, FieldEvent)>>,
}

impl Default for MemoryForm {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryForm {
    pub fn new() -> Self {
        Self {
            fields: RwLock::new(Vec::new()),
            indicators: Mutex::new(HashMap::new()),
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn with_field(self, id: &str, name: &str, kind: FieldKind) -> Self {
        self.fields.write().unwrap().push(FieldState {
            descriptor: FieldDescriptor {
                id: id.to_string(),
                name: name.to_string(),
                kind,
            },
            value: String::new(),
        });
        self
    }

    /// Set a field directly, as a user typing would. No synthetic event is
    /// recorded; those are reserved for programmatic writes.
    pub fn type_into(&self, id: &str, value: &str) {
        let mut fields = self.fields.write().unwrap();
        if let Some(field) = fields.iter_mut().find(|f| f.descriptor.id == id) {
            field.value = value.to_string();
        }
    }

    pub fn indicator(&self, indicator: Indicator) -> bool {
        *self
            .indicators
            .lock()
            .unwrap()
            .get(&indicator)
            .unwrap_or(&false)
    }

    pub fn events(&self) -> Vec<(String, FieldEvent)> {
        self.events.lock().unwrap().clone()
    }

    fn dispatch(&self, id: &str, kind: FieldKind, clearing: bool) {
        // Clears always notify as a change; writes notify per control kind.
        let event = if clearing {
            FieldEvent::Changed
        } else {
            match kind {
                FieldKind::Select => FieldEvent::Changed,
                FieldKind::Text | FieldKind::TextArea => FieldEvent::Input,
            }
        };
        self.events.lock().unwrap().push((id.to_string(), event));
    }
}

impl FormSurface for MemoryForm {
    fn fields(&self) -> Vec<FieldDescriptor> {
        self.fields
            .read()
            .unwrap()
            .iter()
            .map(|f| f.descriptor.clone())
            .collect()
    }

    fn value(&self, id: &str) -> Option<String> {
        self.fields
            .read()
            .unwrap()
            .iter()
            .find(|f| f.descriptor.id == id)
            .map(|f| f.value.clone())
    }

    fn set_value(&self, id: &str, value: &str) {
        let kind = {
            let mut fields = self.fields.write().unwrap();
            match fields.iter_mut().find(|f| f.descriptor.id == id) {
                Some(field) => {
                    field.value = value.to_string();
                    field.descriptor.kind
                }
                None => {
                    log::warn!("set_value on unknown field {id}");
                    return;
                }
            }
        };
        self.dispatch(id, kind, false);
    }

    fn clear_field(&self, id: &str) {
        let kind = {
            let mut fields = self.fields.write().unwrap();
            match fields.iter_mut().find(|f| f.descriptor.id == id) {
                Some(field) => {
                    field.value.clear();
                    field.descriptor.kind
                }
                None => return,
            }
        };
        self.dispatch(id, kind, true);
    }

    fn set_indicator(&self, indicator: Indicator, visible: bool) {
        self.indicators.lock().unwrap().insert(indicator, visible);
    }
}
