//! Fitting the map viewport to points or to an exact region.

use poimap_core::{BoundingRegion, BoundsError, MapSettings, Point, Viewport};

use crate::map::MapInstance;

/// Which branch a fit took.
#[derive(Debug, Clone, PartialEq)]
pub enum FitOutcome {
    /// The viewport now shows `region`.
    Fitted {
        /// Region that was fitted.
        region: BoundingRegion,
        /// Resulting viewport.
        viewport: Viewport,
    },
    /// Nothing fittable; the default viewport was applied instead.
    Fallback {
        /// Why no region could be fitted.
        reason: BoundsError,
        /// The default viewport now shown.
        viewport: Viewport,
    },
}

impl FitOutcome {
    /// Viewport after the fit.
    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        match self {
            Self::Fitted { viewport, .. } | Self::Fallback { viewport, .. } => *viewport,
        }
    }

    /// Fitted region, `None` on fallback.
    #[must_use]
    pub const fn region(&self) -> Option<&BoundingRegion> {
        match self {
            Self::Fitted { region, .. } => Some(region),
            Self::Fallback { .. } => None,
        }
    }

    /// Whether the default viewport was used.
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

/// Commands the map viewport to cover a set of points.
///
/// # Examples
/// ```
/// use poimap_core::{MapSettings, Point};
/// use poimap_layer::{MapInstance, ViewportController};
///
/// let settings = MapSettings::default();
/// let controller = ViewportController::from_settings(&settings);
/// let mut map = MapInstance::new(settings.clone());
///
/// let outcome = controller.fit(&mut map, std::iter::empty::<&Point>());
/// assert!(outcome.is_fallback());
/// assert_eq!(map.viewport(), settings.default_view);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportController {
    padding: f64,
    default_view: Viewport,
}

impl ViewportController {
    /// Controller padding fits by `padding` and falling back to
    /// `default_view`.
    #[must_use]
    pub const fn new(padding: f64, default_view: Viewport) -> Self {
        Self {
            padding,
            default_view,
        }
    }

    /// Controller using the padding and default view from `settings`.
    #[must_use]
    pub const fn from_settings(settings: &MapSettings) -> Self {
        Self::new(settings.padding, settings.default_view)
    }

    /// Fraction added to each side of a fitted region.
    #[must_use]
    pub const fn padding(&self) -> f64 {
        self.padding
    }

    /// Viewport used when nothing can be fitted.
    #[must_use]
    pub const fn default_view(&self) -> Viewport {
        self.default_view
    }

    /// Padded region covering the valid points.
    pub fn region_for<'a, I>(&self, points: I) -> Result<BoundingRegion, BoundsError>
    where
        I: IntoIterator<Item = &'a Point>,
    {
        let region = BoundingRegion::from_coords(
            points
                .into_iter()
                .filter(|point| point.has_valid_location())
                .map(|point| point.location),
        )?;
        Ok(region.pad(self.padding))
    }

    /// Fit the viewport to `points`, falling back to the default view when
    /// there is nothing with area to show.
    pub fn fit<'a, I>(&self, map: &mut MapInstance, points: I) -> FitOutcome
    where
        I: IntoIterator<Item = &'a Point>,
    {
        match self.region_for(points) {
            Ok(region) => self.apply(map, region),
            Err(reason) => self.fall_back(map, reason),
        }
    }

    /// Fit the viewport to exactly `region`, without padding.
    pub fn fit_region(&self, map: &mut MapInstance, region: &BoundingRegion) -> FitOutcome {
        if region.is_degenerate() {
            return self.fall_back(
                map,
                BoundsError::Degenerate {
                    center: region.center(),
                },
            );
        }
        self.apply(map, *region)
    }

    fn apply(&self, map: &mut MapInstance, region: BoundingRegion) -> FitOutcome {
        let viewport = map.fit_bounds(&region);
        FitOutcome::Fitted { region, viewport }
    }

    fn fall_back(&self, map: &mut MapInstance, reason: BoundsError) -> FitOutcome {
        log::debug!("using default viewport: {reason}");
        let viewport = map.set_view(self.default_view.center, self.default_view.zoom);
        FitOutcome::Fallback { reason, viewport }
    }
}
