//! Minimal document model standing in for the host page's DOM.
//!
//! Only what the assistant touches is modelled: editable fields, the text
//! blocks it reads, annotation spans nested in those blocks, and the
//! value-change listeners a host framework registers on its inputs.

use std::collections::HashMap;
use std::fmt;

/// Opaque handle to an element of a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    TextArea,
    /// `<input type="text">`.
    TextInput,
    /// Any other `<input>` type (checkbox, date, ...).
    OtherInput,
    /// A rich editable region (`contenteditable`).
    Editable,
    /// A read-only container such as a `<div>`.
    Block,
}

impl ElementKind {
    /// Whether a context-menu click on this element targets it.
    pub fn is_eligible_target(self) -> bool {
        matches!(
            self,
            ElementKind::TextArea | ElementKind::TextInput | ElementKind::Editable
        )
    }

    /// Plain-value fields whose writes must notify the host framework.
    pub fn is_form_control(self) -> bool {
        matches!(
            self,
            ElementKind::TextArea | ElementKind::TextInput | ElementKind::OtherInput
        )
    }
}

/// Events dispatched to host listeners after a value write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldEvent {
    Input,
    Change,
}

/// Called with the field's new value.
pub type Listener = Box<dyn Fn(&str) + Send + Sync>;

#[derive(Debug, Clone)]
pub struct Element {
    pub id: Option<String>,
    pub kind: ElementKind,
    text: String,
    /// Title/tooltip text of annotation spans nested in this element.
    annotations: Vec<String>,
}

impl Element {
    fn new(kind: ElementKind, id: Option<&str>) -> Self {
        Self {
            id: id.map(str::to_string),
            kind,
            text: String::new(),
            annotations: Vec::new(),
        }
    }

    pub fn textarea(id: &str) -> Self {
        Self::new(ElementKind::TextArea, Some(id))
    }

    pub fn text_input(id: &str) -> Self {
        Self::new(ElementKind::TextInput, Some(id))
    }

    pub fn other_input(id: &str) -> Self {
        Self::new(ElementKind::OtherInput, Some(id))
    }

    pub fn editable(id: &str) -> Self {
        Self::new(ElementKind::Editable, Some(id))
    }

    pub fn block(id: &str) -> Self {
        Self::new(ElementKind::Block, Some(id))
    }

    pub fn anonymous(kind: ElementKind) -> Self {
        Self::new(kind, None)
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_annotation(mut self, title: impl Into<String>) -> Self {
        self.annotations.push(title.into());
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn annotations(&self) -> &[String] {
        &self.annotations
    }
}

#[derive(Default)]
pub struct Document {
    elements: Vec<Element>,
    by_id: HashMap<String, NodeHandle>,
    listeners: HashMap<(NodeHandle, FieldEvent), Vec<Listener>>,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("elements", &self.elements)
            .field("listeners", &self.listeners.values().map(Vec::len).sum::<usize>())
            .finish()
    }
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, element: Element) -> NodeHandle {
        let handle = NodeHandle(self.elements.len());
        if let Some(id) = &element.id {
            self.by_id.entry(id.clone()).or_insert(handle);
        }
        self.elements.push(element);
        handle
    }

    /// First element with the given id, like `getElementById`.
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeHandle> {
        self.by_id.get(id).copied()
    }

    pub fn element(&self, handle: NodeHandle) -> Option<&Element> {
        self.elements.get(handle.0)
    }

    /// Rendered text of an element: the value of a form control, the inner
    /// text of anything else.
    pub fn text_of(&self, handle: NodeHandle) -> Option<&str> {
        self.element(handle).map(Element::text)
    }

    /// Register `listener` for one event type on one element, like
    /// `addEventListener`.
    pub fn add_listener(&mut self, handle: NodeHandle, event: FieldEvent, listener: Listener) {
        self.listeners.entry((handle, event)).or_default().push(listener);
    }

    fn dispatch(&self, handle: NodeHandle, event: FieldEvent, value: &str) {
        if let Some(listeners) = self.listeners.get(&(handle, event)) {
            for listener in listeners {
                listener(value);
            }
        }
    }

    /// Write a value the way the host framework expects to observe it.
    ///
    /// Form controls get the value assigned and then exactly one `input` and
    /// one `change` event. Rich editable regions and blocks have their text
    /// content replaced directly, with no events.
    pub fn write_value(&mut self, handle: NodeHandle, value: &str) -> bool {
        let Some(element) = self.elements.get_mut(handle.0) else {
            return false;
        };
        element.text = value.to_string();

        if element.kind.is_form_control() {
            self.dispatch(handle, FieldEvent::Input, value);
            self.dispatch(handle, FieldEvent::Change, value);
        }
        true
    }

    /// Operator typing. Listeners fire as they would for a keystroke.
    pub fn type_text(&mut self, handle: NodeHandle, value: &str) -> bool {
        let Some(element) = self.elements.get_mut(handle.0) else {
            return false;
        };
        element.text = value.to_string();
        self.dispatch(handle, FieldEvent::Input, value);
        true
    }
}
