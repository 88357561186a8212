//! Jeu de données de démonstration
//!
//! Substitué aux données réelles quand aucune source n'est joignable: le
//! tableau de bord ne reste jamais vide.

use geo::{LineString, MultiPolygon, Polygon};

use crate::types::Parcel;

/// Libellé de source utilisé dans les exports et notifications
pub const DEMO_SOURCE: &str = "demo";

struct DemoParcel {
    fid: i64,
    code: &'static str,
    group: &'static str,
    surface: f64,
    ring: [(f64, f64); 4],
}

const DEMO: [DemoParcel; 4] = [
    DemoParcel {
        fid: 261,
        code: "AFG",
        group: "16",
        surface: 0.66,
        ring: [
            (-2.098221, 48.083437),
            (-2.098086, 48.083442),
            (-2.098072, 48.083443),
            (-2.098029, 48.083443),
        ],
    },
    DemoParcel {
        fid: 2672,
        code: "AVH",
        group: "4",
        surface: 0.04,
        ring: [
            (-2.029376, 48.184125),
            (-2.029416, 48.184064),
            (-2.030142, 48.184306),
            (-2.030112, 48.184365),
        ],
    },
    DemoParcel {
        fid: 2681,
        code: "AVH",
        group: "4",
        surface: 0.07,
        ring: [
            (-2.029371, 48.184122),
            (-2.029310, 48.184220),
            (-2.028872, 48.184086),
            (-2.028943, 48.183982),
        ],
    },
    DemoParcel {
        fid: 2683,
        code: "AVH",
        group: "4",
        surface: 0.08,
        ring: [
            (-2.029313, 48.184222),
            (-2.029376, 48.184125),
            (-2.030112, 48.184365),
            (-2.030060, 48.184477),
        ],
    },
];

/// Les 4 parcelles de démonstration
pub fn parcels() -> Vec<Parcel> {
    DEMO.iter()
        .map(|d| {
            let mut parcel = Parcel::new(d.fid, Some(d.code), d.surface)
                .with_group(d.group)
                .with_geometry(MultiPolygon::new(vec![Polygon::new(
                    LineString::from(d.ring.to_vec()),
                    vec![],
                )]));
            parcel.category = Some("TA".to_string());
            parcel
        })
        .collect()
}
