//! Décodage d'une FeatureCollection GeoJSON en parcelles
//!
//! Le décodage est tolérant: les attributs manquants prennent leurs valeurs
//! par défaut (surface 0, pas de culture), les membres `type` sont facultatifs
//! et une géométrie illisible laisse la parcelle sans géométrie. Seule une
//! collection sans `features` exploitables est rejetée.

use geo::{MultiPolygon, Polygon};
use geojson::PolygonType;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::types::Parcel;
use crate::ParcellaireError;

/// Résultat du décodage d'une collection
#[derive(Debug)]
pub struct ParsedCollection {
    /// Parcelles dans l'ordre du document
    pub parcels: Vec<Parcel>,

    /// Erreurs non fatales rencontrées (features ignorées, géométries invalides)
    pub errors: Vec<ParcellaireError>,
}

#[derive(Debug, Deserialize)]
struct RawFeature {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    properties: Option<RawProperties>,
    #[serde(default)]
    geometry: Option<RawGeometry>,
}

#[derive(Debug, Default, Deserialize)]
struct RawProperties {
    #[serde(default)]
    fid: Option<Value>,
    #[serde(default)]
    code_cultu: Option<Value>,
    #[serde(default)]
    surf_parc: Option<Value>,
    #[serde(default)]
    culture_d1: Option<Value>,
    #[serde(default)]
    culture_d2: Option<Value>,
    #[serde(default)]
    code_group: Option<Value>,
    #[serde(default)]
    cat_cult_p: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct RawGeometry {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    coordinates: Option<Value>,
}

/// Décode un document JSON brut
pub fn parse(bytes: &[u8]) -> Result<ParsedCollection, ParcellaireError> {
    let value: Value = serde_json::from_slice(bytes)?;
    from_value(value)
}

/// Décode un document JSON déjà lu
pub fn from_value(value: Value) -> Result<ParsedCollection, ParcellaireError> {
    let Value::Object(mut root) = value else {
        return Err(ParcellaireError::malformed("root is not a JSON object"));
    };

    let features = match root.remove("features") {
        Some(Value::Array(features)) => features,
        Some(Value::Null) | None => {
            return Err(ParcellaireError::malformed("missing `features` array"))
        }
        Some(_) => return Err(ParcellaireError::malformed("`features` is not an array")),
    };

    if features.is_empty() {
        return Err(ParcellaireError::malformed("empty `features` array"));
    }

    let total = features.len();
    let mut parcels = Vec::with_capacity(total);
    let mut errors = Vec::new();

    for (index, feature) in features.into_iter().enumerate() {
        let raw: RawFeature = match serde_json::from_value(feature) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(index, error = %e, "Skipping unreadable feature");
                errors.push(ParcellaireError::SkippedFeature {
                    index,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        let (parcel, geometry_error) = decode_feature(index, raw);
        if let Some(e) = geometry_error {
            errors.push(e);
        }
        parcels.push(parcel);
    }

    if parcels.is_empty() {
        return Err(ParcellaireError::malformed(format!(
            "none of the {} features could be decoded",
            total
        )));
    }

    debug!(
        parcels = parcels.len(),
        errors = errors.len(),
        "Decoded feature collection"
    );

    Ok(ParsedCollection { parcels, errors })
}

fn decode_feature(index: usize, raw: RawFeature) -> (Parcel, Option<ParcellaireError>) {
    let props = raw.properties.unwrap_or_default();

    // fid, puis id de la feature, puis position dans le document
    let id = props
        .fid
        .as_ref()
        .and_then(as_id)
        .or_else(|| raw.id.as_ref().and_then(as_id))
        .unwrap_or_else(|| {
            debug!(index, "Missing fid, using feature position");
            index as i64
        });

    let surface_ha = props.surf_parc.as_ref().and_then(as_number).unwrap_or_else(|| {
        debug!(fid = id, "Missing surf_parc, defaulting to 0");
        0.0
    });

    let crop_code = props.code_cultu.as_ref().and_then(as_text);
    if crop_code.is_none() {
        debug!(fid = id, "Missing code_cultu, parcel is uncategorized");
    }

    let (geometry, geometry_error) = match raw.geometry.map(decode_geometry) {
        Some(Ok(geometry)) => (geometry, None),
        Some(Err(reason)) => {
            warn!(fid = id, reason = %reason, "Invalid geometry, parcel kept without geometry");
            (
                MultiPolygon::new(vec![]),
                Some(ParcellaireError::invalid_geometry(id, reason)),
            )
        }
        None => (MultiPolygon::new(vec![]), None),
    };

    let parcel = Parcel {
        id,
        crop_code,
        surface_ha,
        secondary_crop_1: props.culture_d1.as_ref().and_then(as_text),
        secondary_crop_2: props.culture_d2.as_ref().and_then(as_text),
        group_code: props.code_group.as_ref().and_then(as_text),
        category: props.cat_cult_p.as_ref().and_then(as_text),
        geometry,
    };

    (parcel, geometry_error)
}

fn decode_geometry(raw: RawGeometry) -> Result<MultiPolygon<f64>, String> {
    let Some(coordinates) = raw.coordinates else {
        return Ok(MultiPolygon::new(vec![]));
    };

    let kind = match raw.kind {
        Some(kind) => kind,
        None => match nesting_depth(&coordinates) {
            4 => "MultiPolygon".to_string(),
            3 => "Polygon".to_string(),
            depth => return Err(format!("cannot infer geometry type (depth {})", depth)),
        },
    };

    match kind.as_str() {
        "MultiPolygon" => {
            let polygons: Vec<PolygonType> =
                serde_json::from_value(coordinates).map_err(|e| e.to_string())?;
            check_positions(polygons.iter())?;
            MultiPolygon::try_from(geojson::Value::MultiPolygon(polygons))
                .map_err(|e| e.to_string())
        }
        "Polygon" => {
            let polygon: PolygonType =
                serde_json::from_value(coordinates).map_err(|e| e.to_string())?;
            check_positions(std::iter::once(&polygon))?;
            let polygon = Polygon::try_from(geojson::Value::Polygon(polygon))
                .map_err(|e| e.to_string())?;
            Ok(MultiPolygon::new(vec![polygon]))
        }
        other => Err(format!("unsupported geometry type: {}", other)),
    }
}

/// Vérifie que chaque position porte au moins x et y
fn check_positions<'a>(polygons: impl Iterator<Item = &'a PolygonType>) -> Result<(), String> {
    for polygon in polygons {
        for ring in polygon {
            if let Some(position) = ring.iter().find(|p| p.len() < 2) {
                return Err(format!("position with {} value(s)", position.len()));
            }
        }
    }
    Ok(())
}

fn nesting_depth(value: &Value) -> usize {
    match value {
        Value::Array(items) => 1 + items.first().map_or(0, nesting_depth),
        _ => 0,
    }
}

fn as_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.is_finite())
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|f| f.is_finite())
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
