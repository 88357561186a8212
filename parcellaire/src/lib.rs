//! # parcellaire
//!
//! Agrégation et vues synchronisées pour un jeu de parcelles agricoles
//! (GeoJSON du registre parcellaire: `fid`, `code_cultu`, `surf_parc`...).
//!
//! ## Features
//!
//! - Décodage tolérant d'une FeatureCollection (valeurs par défaut, géométries
//!   `Polygon`/`MultiPolygon`, membres `type` facultatifs)
//! - Agrégations pures: répartition par culture, statistiques, tranches de
//!   surface, indicateurs clés
//! - `ViewSync`: styles de carte, légende, graphiques et tableau cohérents
//!   sous filtrage, survol et focus
//! - Recherche par identifiant et export JSON de synthèse
//!
//! ## Usage
//!
//! ```rust,ignore
//! use parcellaire::{parse, FeatureStore, ViewSync, CropFilter};
//!
//! let parsed = parse(&bytes)?;
//! let mut store = FeatureStore::new();
//! store.load(parsed.parcels);
//!
//! let mut view = ViewSync::new();
//! view.rebuild(&store);
//! view.apply_filter(&store, CropFilter::Crop("AVH".into()));
//!
//! for row in view.table_rows(&store) {
//!     println!("{:?}", row.cells());
//! }
//! ```

pub mod aggregate;
pub mod crops;
pub mod demo;
pub mod error;
pub mod export;
pub mod parser;
pub mod search;
pub mod store;
pub mod types;
pub mod view;

pub use aggregate::{CropStatistic, Kpis, SurfaceBand, SurfaceBandCount, SURFACE_BANDS};
pub use crops::CropInfo;
pub use error::ParcellaireError;
pub use export::ExportDocument;
pub use parser::{parse, ParsedCollection};
pub use search::{SearchHit, SearchIndex, SearchOutcome};
pub use store::FeatureStore;
pub use types::Parcel;
pub use view::{CropFilter, FitBounds, Focus, MapStyle, StyleUpdate, ViewSync};
