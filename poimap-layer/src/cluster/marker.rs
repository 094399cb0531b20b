use std::collections::BTreeMap;
use std::fmt;

use poimap_core::Point;

/// Pointer interactions a marker reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Interaction {
    /// Pointer moved onto the marker.
    HoverEnter,
    /// Pointer left the marker.
    HoverLeave,
    /// Marker was clicked or tapped.
    Click,
}

/// What a marker does in response to an [`Interaction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerAction {
    /// Open this marker's tooltip, replacing any other.
    ShowTooltip,
    /// Close this marker's tooltip if it is the open one.
    HideTooltip,
    /// Make the marker's point the current selection.
    Select,
}

/// Content of a marker's hover tooltip.
///
/// The text form lists the name, then the image reference as
/// `[image: <src>]`, then description, visiting hours and town. Empty
/// fields are left out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TooltipContent {
    /// Point name, shown first.
    pub name: String,
    /// Image URL or path, empty when the point has none.
    pub image: String,
    /// Short description.
    pub description: String,
    /// Opening hours text.
    pub visiting_hours: String,
    /// Nearest town.
    pub town: String,
}

impl TooltipContent {
    /// Tooltips open above the marker.
    pub const DIRECTION: &'static str = "top";
    /// Pixel offset from the marker anchor.
    pub const OFFSET: (i32, i32) = (0, -10);

    /// Collect the tooltip fields of `point`.
    pub fn for_point(point: &Point) -> Self {
        Self {
            name: point.name.clone(),
            image: point.image().to_owned(),
            description: point.description().to_owned(),
            visiting_hours: point.visiting_hours().to_owned(),
            town: point.town().to_owned(),
        }
    }
}

impl fmt::Display for TooltipContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.image.is_empty() {
            write!(f, "\n[image: {}]", self.image)?;
        }
        for line in [&self.description, &self.visiting_hours, &self.town] {
            if !line.is_empty() {
                write!(f, "\n{line}")?;
            }
        }
        Ok(())
    }
}

/// On-map representation of one valid point.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    point: Point,
    tooltip: TooltipContent,
    handlers: BTreeMap<Interaction, MarkerAction>,
}

impl Marker {
    /// Build a marker with the standard handler table.
    pub(crate) fn new(point: Point) -> Self {
        let tooltip = TooltipContent::for_point(&point);
        let handlers = BTreeMap::from([
            (Interaction::HoverEnter, MarkerAction::ShowTooltip),
            (Interaction::HoverLeave, MarkerAction::HideTooltip),
            (Interaction::Click, MarkerAction::Select),
        ]);
        Self {
            point,
            tooltip,
            handlers,
        }
    }

    /// The point this marker stands for.
    #[must_use]
    pub const fn point(&self) -> &Point {
        &self.point
    }

    /// Content shown while hovering.
    #[must_use]
    pub const fn tooltip(&self) -> &TooltipContent {
        &self.tooltip
    }

    /// Action registered for `interaction`, if any.
    pub fn handler(&self, interaction: Interaction) -> Option<MarkerAction> {
        self.handlers.get(&interaction).copied()
    }
}
