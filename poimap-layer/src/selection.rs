//! The selected point and the detail panel bound to it.

use std::cell::RefCell;
use std::rc::Rc;

use poimap_core::Point;

/// Single-slot handle to the currently inspected point.
///
/// Clones share the slot, so the cluster layer's click callback and the
/// panel always observe the same selection.
///
/// # Examples
/// ```
/// use poimap_core::Point;
/// use poimap_layer::Selection;
///
/// let selection = Selection::new();
/// let select = selection.callback();
///
/// select(&Point::from_lat_lon(1, "Rumtek", 27.3, 88.6));
/// select(&Point::from_lat_lon(2, "Enchey", 27.3, 88.6));
/// assert_eq!(selection.current().map(|p| p.id), Some(2));
///
/// selection.clear();
/// assert!(selection.current().is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Selection {
    slot: Rc<RefCell<Option<Point>>>,
}

impl Selection {
    /// An empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection with `point`.
    pub fn select(&self, point: &Point) {
        self.slot.replace(Some(point.clone()));
    }

    /// The dismiss action.
    pub fn clear(&self) {
        self.slot.replace(None);
    }

    /// Copy of the selected point.
    #[must_use]
    pub fn current(&self) -> Option<Point> {
        self.slot.borrow().clone()
    }

    /// Whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slot.borrow().is_none()
    }

    /// The "select point" callback handed to marker click handlers.
    pub fn callback(&self) -> impl Fn(&Point) + 'static {
        let selection = self.clone();
        move |point: &Point| selection.select(point)
    }
}

/// Fields rendered by the detail panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelView {
    /// Id of the selected point.
    pub point_id: u64,
    /// Heading.
    pub name: String,
    /// Town line under the heading.
    pub town: String,
    /// Long description.
    pub description: String,
    /// Opening hours text.
    pub visiting_hours: String,
    /// External link, empty when absent.
    pub link: String,
    /// Image URL or path, empty when absent.
    pub image: String,
    /// Coordinate badge, `"<lat>, <lon>"`.
    pub coordinates: String,
    /// Label of the dismiss control.
    pub dismiss_label: &'static str,
}

impl PanelView {
    fn for_point(point: &Point) -> Self {
        Self {
            point_id: point.id,
            name: point.name.clone(),
            town: point.town().to_owned(),
            description: point.description().to_owned(),
            visiting_hours: point.visiting_hours().to_owned(),
            link: point.link().to_owned(),
            image: point.image().to_owned(),
            coordinates: format!("{}, {}", point.lat(), point.lon()),
            dismiss_label: SelectionPanel::DISMISS_LABEL,
        }
    }
}

/// Detail surface bound to a [`Selection`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectionPanel;

impl SelectionPanel {
    /// Text of the dismiss control.
    pub const DISMISS_LABEL: &'static str = "✕";

    /// `None` while nothing is selected.
    #[must_use]
    pub fn render(selection: &Selection) -> Option<PanelView> {
        selection.slot.borrow().as_ref().map(PanelView::for_point)
    }

    /// Clear the selection, hiding the panel.
    pub fn dismiss(selection: &Selection) {
        selection.clear();
    }
}
