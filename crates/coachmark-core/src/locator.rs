//! Resolving stable element identifiers to live boxes.
//!
//! The engine never walks the host's element tree itself. A host exposes its
//! interactive elements through [`TargetLocator`], keyed by the stable
//! identifier attribute each element carries. [`Layout`] is an in-memory
//! registry implementing the trait, used by the terminal host and tests.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::geometry::{Rect, Size};

/// A located element.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Located {
    /// Bounding box of the element itself
    pub rect: Rect,
    /// Box of the floating container (dialog, drawer) the element lives in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<Rect>,
}

/// Host-side view of the page.
///
/// Implementations are polled at a high rate, so they must be cheap. An
/// element that is not mounted yet is reported as `None`, never as an error.
pub trait TargetLocator {
    /// Current box of the element, and of its floating container if it has
    /// one.
    fn locate(&self, element_id: &str) -> Option<Located>;

    /// Current value of a form field.
    fn field_value(&self, element_id: &str) -> Option<String>;

    /// Size of the visible viewport.
    fn viewport(&self) -> Size;
}

/// One registered element.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LayoutElement {
    pub rect: Rect,
    /// Identifier of the container the element is mounted in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
    /// Field value, for inputs and selects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Static, mutable registry of element boxes.
///
/// Elements inside a container are only visible while that container is
/// open, which models content that mounts when a dialog opens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Layout {
    pub viewport: Size,
    #[serde(default)]
    pub elements: BTreeMap<String, LayoutElement>,
    #[serde(default)]
    pub containers: BTreeMap<String, Rect>,
}

impl Layout {
    pub fn new(viewport: Size) -> Self {
        Self {
            viewport,
            elements: BTreeMap::new(),
            containers: BTreeMap::new(),
        }
    }

    /// Mounts (or moves) an element in the page body.
    pub fn mount(&mut self, element_id: impl Into<String>, rect: Rect) -> &mut Self {
        let entry = self
            .elements
            .entry(element_id.into())
            .or_insert(LayoutElement {
                rect,
                container: None,
                value: None,
            });
        entry.rect = rect;
        entry.container = None;
        self
    }

    /// Mounts (or moves) an element inside a container.
    pub fn mount_in(
        &mut self,
        element_id: impl Into<String>,
        rect: Rect,
        container_id: impl Into<String>,
    ) -> &mut Self {
        let container_id = container_id.into();
        let entry = self
            .elements
            .entry(element_id.into())
            .or_insert(LayoutElement {
                rect,
                container: None,
                value: None,
            });
        entry.rect = rect;
        entry.container = Some(container_id);
        self
    }

    pub fn unmount(&mut self, element_id: &str) -> &mut Self {
        self.elements.remove(element_id);
        self
    }

    pub fn open_container(&mut self, container_id: impl Into<String>, rect: Rect) -> &mut Self {
        self.containers.insert(container_id.into(), rect);
        self
    }

    pub fn close_container(&mut self, container_id: &str) -> &mut Self {
        self.containers.remove(container_id);
        self
    }

    /// Sets a field value. Unknown elements are ignored.
    pub fn set_value(&mut self, element_id: &str, value: impl Into<String>) -> &mut Self {
        if let Some(element) = self.elements.get_mut(element_id) {
            element.value = Some(value.into());
        }
        self
    }

    pub fn resize(&mut self, viewport: Size) -> &mut Self {
        self.viewport = viewport;
        self
    }

    /// Moves every element and container, as scrolling the page would.
    pub fn scroll_by(&mut self, dx: f64, dy: f64) -> &mut Self {
        for element in self.elements.values_mut() {
            element.rect.left -= dx;
            element.rect.top -= dy;
        }
        for rect in self.containers.values_mut() {
            rect.left -= dx;
            rect.top -= dy;
        }
        self
    }
}

impl TargetLocator for Layout {
    fn locate(&self, element_id: &str) -> Option<Located> {
        let element = self.elements.get(element_id)?;
        if element.rect.is_empty() {
            return None;
        }
        let container = match &element.container {
            Some(container_id) => Some(*self.containers.get(container_id)?),
            None => None,
        };
        Some(Located {
            rect: element.rect,
            container,
        })
    }

    fn field_value(&self, element_id: &str) -> Option<String> {
        self.locate(element_id)?;
        self.elements.get(element_id)?.value.clone()
    }

    fn viewport(&self) -> Size {
        self.viewport
    }
}
