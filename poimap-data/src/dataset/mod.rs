//! Loading point-of-interest datasets from JSON.
//!
//! A dataset file is either an object with a `name` and a `points` array or
//! a bare array of points, in which case the file stem names the dataset.
//! Each point carries `id`, `name` and `coordinates` as `[lat, lon]`; every
//! other string-valued key becomes a display field and keys holding numbers,
//! booleans or nested values are ignored. The short keys `desc` and `img` are
//! accepted for `description` and `image`.
//!
//! Records whose `coordinates` are missing, `null` or not a pair of numbers
//! are dropped with a warning. Out-of-range pairs load normally and are
//! dropped by the map layer at render time.

mod builtin;

pub use builtin::{BUILTIN_NAME, monasteries};

use std::collections::{HashMap, HashSet};

use camino::{Utf8Path, Utf8PathBuf};
use poimap_core::{Fields, Point, PointSet, field};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Errors raised while loading a dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read dataset {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse dataset {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("dataset {origin} contains point id {id} more than once")]
    DuplicateId { origin: String, id: u64 },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DatasetFile {
    Named {
        name: Option<String>,
        points: Vec<PointRecord>,
    },
    Bare(Vec<PointRecord>),
}

#[derive(Debug, Deserialize)]
struct PointRecord {
    id: u64,
    name: String,
    #[serde(default)]
    coordinates: Option<Value>,
    #[serde(flatten)]
    extra: HashMap<String, Value>,
}

impl PointRecord {
    /// Convert into a [`Point`], or `None` when there is no usable
    /// `[lat, lon]` pair.
    fn into_point(self) -> Option<Point> {
        let (lat, lon) = self.coordinates.and_then(coordinate_pair)?;
        let fields: Fields = self
            .extra
            .into_iter()
            .filter_map(|(key, value)| match value {
                Value::String(text) => Some((canonical_key(&key).to_owned(), text)),
                _ => None,
            })
            .collect();
        Some(Point::new(
            self.id,
            self.name,
            geo::Coord { x: lon, y: lat },
            fields,
        ))
    }
}

fn coordinate_pair(value: Value) -> Option<(f64, f64)> {
    serde_json::from_value(value).ok()
}

fn canonical_key(key: &str) -> &str {
    match key {
        "desc" => field::DESCRIPTION,
        "img" => field::IMAGE,
        other => other,
    }
}

/// Parse a dataset from JSON text.
///
/// `default_name` is used when the document does not name itself.
///
/// # Examples
/// ```
/// use poimap_data::dataset::parse_dataset;
///
/// let json = r#"[{"id": 1, "name": "Rumtek", "coordinates": [27.3258, 88.6012], "desc": "Seat of the Karmapa"}]"#;
/// let set = parse_dataset(json, "monasteries")?;
///
/// assert_eq!(set.name(), "monasteries");
/// assert_eq!(set.points()[0].description(), "Seat of the Karmapa");
/// # Ok::<(), poimap_data::dataset::DatasetError>(())
/// ```
pub fn parse_dataset(json: &str, default_name: &str) -> Result<PointSet, DatasetError> {
    let file: DatasetFile = serde_json::from_str(json).map_err(|source| DatasetError::Parse {
        origin: default_name.to_owned(),
        source,
    })?;
    let (name, records) = match file {
        DatasetFile::Named { name, points } => {
            (name.unwrap_or_else(|| default_name.to_owned()), points)
        }
        DatasetFile::Bare(points) => (default_name.to_owned(), points),
    };

    let mut seen = HashSet::with_capacity(records.len());
    for record in &records {
        if !seen.insert(record.id) {
            return Err(DatasetError::DuplicateId {
                origin: name,
                id: record.id,
            });
        }
    }

    let total = records.len();
    let points: Vec<Point> = records
        .into_iter()
        .filter_map(PointRecord::into_point)
        .collect();
    let dropped = total - points.len();
    if dropped > 0 {
        log::warn!("dataset {name} dropped {dropped} point(s) without coordinates");
    }
    let invalid = points.iter().filter(|p| !p.has_valid_location()).count();
    if invalid > 0 {
        log::warn!("dataset {name} has {invalid} point(s) with invalid coordinates");
    }
    Ok(PointSet::new(name, points))
}

/// Read and parse the dataset at `path`.
pub fn load_dataset(path: &Utf8Path) -> Result<PointSet, DatasetError> {
    let json = poimap_fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let stem = path.file_stem().unwrap_or(BUILTIN_NAME);
    let set = parse_dataset(&json, stem)?;
    log::info!("loaded {} point(s) from {path}", set.len());
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn named_document_keeps_its_name() {
        let json = r#"{"name": "Gompas", "points": [
            {"id": 1, "name": "Rumtek", "coordinates": [27.3258, 88.6012], "town": "Gangtok"}
        ]}"#;
        let set = parse_dataset(json, "fallback").expect("valid dataset");
        assert_eq!(set.name(), "Gompas");
        let point = &set.points()[0];
        assert_eq!(point.lat(), 27.3258);
        assert_eq!(point.lon(), 88.6012);
        assert_eq!(point.town(), "Gangtok");
    }

    #[rstest]
    fn short_keys_are_canonicalised() {
        let json = r#"[{"id": 2, "name": "Enchey", "coordinates": [27.3381, 88.6132],
            "desc": "Murals", "img": "/enchey.jpg", "visiting": "9-6"}]"#;
        let set = parse_dataset(json, "x").expect("valid dataset");
        let point = &set.points()[0];
        assert_eq!(point.description(), "Murals");
        assert_eq!(point.image(), "/enchey.jpg");
        assert_eq!(point.visiting_hours(), "9-6");
    }

    #[rstest]
    fn invalid_coordinates_are_kept_for_the_map_to_drop() {
        let json = r#"[{"id": 1, "name": "Nowhere", "coordinates": [95.0, 0.0]}]"#;
        let set = parse_dataset(json, "x").expect("valid dataset");
        assert_eq!(set.len(), 1);
        assert_eq!(set.valid_points().count(), 0);
    }

    #[rstest]
    fn duplicate_ids_are_rejected() {
        let json = r#"[
            {"id": 1, "name": "A", "coordinates": [27.0, 88.0]},
            {"id": 1, "name": "B", "coordinates": [27.1, 88.1]}
        ]"#;
        let err = parse_dataset(json, "dupes").expect_err("duplicate id");
        assert!(matches!(err, DatasetError::DuplicateId { id: 1, .. }));
    }

    #[rstest]
    #[case::missing(r#"{"id": 2, "name": "NoCoords"}"#)]
    #[case::null(r#"{"id": 2, "name": "NoCoords", "coordinates": null}"#)]
    #[case::text(r#"{"id": 2, "name": "NoCoords", "coordinates": ["north", "east"]}"#)]
    #[case::single(r#"{"id": 2, "name": "NoCoords", "coordinates": [27.0]}"#)]
    fn points_without_coordinates_are_dropped(#[case] broken: &str) {
        let json = format!(
            r#"[{{"id": 1, "name": "Rumtek", "coordinates": [27.3258, 88.6012]}}, {broken}]"#
        );
        let set = parse_dataset(&json, "m").expect("siblings still load");
        assert_eq!(set.len(), 1);
        assert_eq!(set.points()[0].id, 1);
    }

    #[rstest]
    fn non_string_fields_are_ignored() {
        let json = r#"[{"id": 1, "name": "Rumtek", "coordinates": [27.3, 88.6],
            "rating": 4, "open": true, "tags": ["gompa"], "town": "Gangtok"}]"#;
        let set = parse_dataset(json, "m").expect("valid dataset");
        let point = &set.points()[0];
        assert_eq!(point.town(), "Gangtok");
        assert!(point.fields.get("rating").is_none());
        assert!(point.fields.get("open").is_none());
    }

    #[rstest]
    #[case("not json")]
    #[case(r#"[{"name": "A", "coordinates": [27.0, 88.0]}]"#)]
    #[case(r#"{"name": "Gompas"}"#)]
    fn malformed_documents_are_rejected(#[case] json: &str) {
        assert!(matches!(
            parse_dataset(json, "bad"),
            Err(DatasetError::Parse { .. })
        ));
    }
}
