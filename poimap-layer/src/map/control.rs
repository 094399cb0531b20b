//! Custom controls injected into the map chrome.
//!
//! A control is plain data plus two callbacks: one producing its view and an
//! optional one run when the user activates it. The map stores descriptors
//! by [`ControlId`](super::ControlId) and never inspects what they do.

use std::fmt;

use poimap_core::PointSet;

use crate::export::Download;

/// Corner of the map the control is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlPosition {
    /// Upper left corner, where zoom buttons usually sit.
    TopLeft,
    /// Upper right corner.
    TopRight,
    /// Lower left corner.
    BottomLeft,
    /// Lower right corner, next to the attribution.
    BottomRight,
}

/// What a control shows in the chrome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlView {
    /// Space-separated style classes.
    pub class: String,
    /// Visible text, or placeholder text for input controls.
    pub content: String,
}

/// Data available to a control when it is activated.
#[derive(Debug, Clone, Copy)]
pub struct ControlContext<'a> {
    /// Full dataset currently handed to the map, not just visible points.
    pub points: &'a PointSet,
}

/// Result of activating a control.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlOutput {
    /// The control acted on the map only.
    Nothing,
    /// The control produced a file for the user to save.
    Download(Download),
    /// The control could not complete; the map is unchanged.
    Failed {
        /// Name of the control.
        control: &'static str,
        /// What went wrong.
        message: String,
    },
}

type RenderFn = Box<dyn Fn() -> ControlView>;
type ActivateFn = Box<dyn FnMut(&ControlContext<'_>) -> ControlOutput>;

/// A control ready to be added to a [`MapInstance`](super::MapInstance).
///
/// # Examples
/// ```
/// use poimap_layer::{ControlDescriptor, ControlOutput, ControlPosition, ControlView};
///
/// let control = ControlDescriptor::new("ping", ControlPosition::TopLeft, || ControlView {
///     class: "leaflet-bar".into(),
///     content: "Ping".into(),
/// })
/// .on_activate(|_| ControlOutput::Nothing);
///
/// assert_eq!(control.name(), "ping");
/// assert!(control.is_interactive());
/// ```
pub struct ControlDescriptor {
    name: &'static str,
    position: ControlPosition,
    render: RenderFn,
    activate: Option<ActivateFn>,
}

impl ControlDescriptor {
    /// Describe a control that only renders.
    pub fn new(
        name: &'static str,
        position: ControlPosition,
        render: impl Fn() -> ControlView + 'static,
    ) -> Self {
        Self {
            name,
            position,
            render: Box::new(render),
            activate: None,
        }
    }

    /// Attach the callback run when the control is activated.
    #[must_use]
    pub fn on_activate(
        mut self,
        activate: impl FnMut(&ControlContext<'_>) -> ControlOutput + 'static,
    ) -> Self {
        self.activate = Some(Box::new(activate));
        self
    }

    /// Name used in logs and errors.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Corner the control is pinned to.
    #[must_use]
    pub const fn position(&self) -> ControlPosition {
        self.position
    }

    /// Whether activating the control does anything.
    pub fn is_interactive(&self) -> bool {
        self.activate.is_some()
    }

    /// Produce the control's current view.
    #[must_use]
    pub fn render(&self) -> ControlView {
        (self.render)()
    }

    /// Run the activation callback, if any.
    pub fn activate(&mut self, context: &ControlContext<'_>) -> Option<ControlOutput> {
        self.activate.as_mut().map(|activate| activate(context))
    }
}

impl fmt::Debug for ControlDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControlDescriptor")
            .field("name", &self.name)
            .field("position", &self.position)
            .field("interactive", &self.is_interactive())
            .finish_non_exhaustive()
    }
}
