//! Extracted record types.
//!
//! Field names stay as the API spells them (camelCase for stores, the
//! portal's snake_case for price observations) so the CSV headers match
//! the published dataset and the consolidation/merge steps downstream.

use serde::{Deserialize, Serialize};

/// One physical retail location, as returned by the `sucursales` listing.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoreRecord {
    pub id: String,
    #[serde(rename = "comercioId")]
    pub comercio_id: i64,
    #[serde(rename = "banderaId")]
    pub bandera_id: i64,
    #[serde(rename = "banderaDescripcion", default)]
    pub bandera_descripcion: String,
    #[serde(rename = "comercioRazonSocial", default)]
    pub comercio_razon_social: String,
    #[serde(default)]
    pub provincia: String,
    #[serde(default)]
    pub localidad: String,
    #[serde(default)]
    pub direccion: String,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(rename = "sucursalNombre", default)]
    pub sucursal_nombre: String,
    #[serde(rename = "sucursalTipo", default)]
    pub sucursal_tipo: String,
}

impl StoreRecord {
    /// Value of a quota grouping criterion field, by its API name.
    /// Unknown criteria resolve to the empty string.
    pub fn criterion_value(&self, field: &str) -> &str {
        match field {
            "provincia" => &self.provincia,
            "localidad" => &self.localidad,
            "sucursalTipo" => &self.sucursal_tipo,
            "banderaDescripcion" => &self.bandera_descripcion,
            _ => "",
        }
    }
}

/// A product as listed in a store's nested page. Prices ride along and are
/// split off into a [`PriceObservation`].
#[derive(Clone, Debug, Deserialize)]
pub struct ApiProduct {
    pub id: String,
    #[serde(default)]
    pub marca: String,
    #[serde(default)]
    pub nombre: String,
    #[serde(default)]
    pub presentacion: String,
    #[serde(default)]
    pub precio: Option<f64>,
    #[serde(rename = "precioMax", default)]
    pub precio_max: Option<f64>,
    #[serde(rename = "precioMin", default)]
    pub precio_min: Option<f64>,
}

impl ApiProduct {
    pub fn product(&self) -> ProductRecord {
        ProductRecord {
            id: self.id.clone(),
            marca: self.marca.clone(),
            nombre: self.nombre.clone(),
            presentacion: self.presentacion.clone(),
        }
    }

    pub fn price_observation(&self, store_id: &str) -> PriceObservation {
        PriceObservation {
            sucursal_id: store_id.to_string(),
            producto_id: self.id.clone(),
            precio: self.precio,
            precio_max: self.precio_max,
            precio_min: self.precio_min,
            fecha_relevamiento: now_utc(),
        }
    }
}

/// Catalog entry, deduplicated per run by id.
#[derive(Clone, Debug, Serialize)]
pub struct ProductRecord {
    pub id: String,
    pub marca: String,
    pub nombre: String,
    pub presentacion: String,
}

/// Catalog entry enriched with the three-level category hierarchy.
#[derive(Clone, Debug, Serialize)]
pub struct CategorizedProduct {
    pub id: String,
    pub marca: String,
    pub nombre: String,
    pub presentacion: String,
    pub categoria1: String,
    pub categoria2: String,
    pub categoria3: String,
}

/// One (store, product, time) price point. Never deduplicated: repeated
/// observations of the same pair across time are all meaningful.
#[derive(Clone, Debug, Serialize)]
pub struct PriceObservation {
    pub sucursal_id: String,
    pub producto_id: String,
    pub precio: Option<f64>,
    pub precio_max: Option<f64>,
    pub precio_min: Option<f64>,
    pub fecha_relevamiento: String,
}

fn now_utc() -> String {
    chrono::Utc::now()
        .format("%Y-%m-%d %H:%M:%S%.6f")
        .to_string()
}

/// Record type tag, used to route items to their per-type sink.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Store,
    Product,
    CategorizedProduct,
    Price,
}

impl ItemKind {
    /// Filename prefix for output files
    pub fn file_prefix(self) -> &'static str {
        match self {
            Self::Store => "sucursal",
            Self::Product => "producto",
            Self::CategorizedProduct => "producto-categorizado",
            Self::Price => "precio",
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.file_prefix())
    }
}

/// Any extracted record, ready for routing.
#[derive(Clone, Debug)]
pub enum Item {
    Store(StoreRecord),
    Product(ProductRecord),
    CategorizedProduct(CategorizedProduct),
    Price(PriceObservation),
}

impl Item {
    pub fn kind(&self) -> ItemKind {
        match self {
            Self::Store(_) => ItemKind::Store,
            Self::Product(_) => ItemKind::Product,
            Self::CategorizedProduct(_) => ItemKind::CategorizedProduct,
            Self::Price(_) => ItemKind::Price,
        }
    }

    /// Identifier used for per-run deduplication.
    /// Price observations are keyed by time, not id — they return `None`.
    pub fn dedup_id(&self) -> Option<&str> {
        match self {
            Self::Store(s) => Some(&s.id),
            Self::Product(p) => Some(&p.id),
            Self::CategorizedProduct(p) => Some(&p.id),
            Self::Price(_) => None,
        }
    }
}
