use serde::{Deserialize, Serialize};

use super::wire::{deserialize_opt_count, deserialize_opt_id, pick_id};
use crate::domain::{stock_level, StockLevel, StockThresholds};

/// Responsable used when the form leaves it blank.
pub const DEFAULT_RESPONSABLE: &str = "Bodega";

/// An inventory item as read from `GET /items`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawItem")]
pub struct Item {
    pub id: String,
    pub descripcion: String,
    pub categoria: String,
    pub cantidad: u32,
    /// Per-item low-stock threshold; `None` uses the global one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimo: Option<u32>,
    /// Per-item critical threshold; `None` uses the global one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub critico: Option<u32>,
    pub responsable: String,
    pub observacion: String,
}

impl Item {
    /// Thresholds for this item, falling back to `defaults` per field.
    pub fn thresholds(&self, defaults: StockThresholds) -> StockThresholds {
        StockThresholds::new(
            self.minimo.unwrap_or(defaults.bajo),
            self.critico.unwrap_or(defaults.critico),
        )
    }

    pub fn stock_level(&self, defaults: StockThresholds) -> StockLevel {
        stock_level(self.cantidad, self.thresholds(defaults))
    }
}

#[derive(Deserialize)]
struct RawItem {
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    id: Option<String>,
    #[serde(default, rename = "_id", deserialize_with = "deserialize_opt_id")]
    mongo_id: Option<String>,
    #[serde(default)]
    descripcion: Option<String>,
    #[serde(default)]
    categoria: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_count")]
    cantidad: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_opt_count")]
    minimo: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_opt_count")]
    critico: Option<u32>,
    #[serde(default)]
    responsable: Option<String>,
    #[serde(default)]
    observacion: Option<String>,
}

impl From<RawItem> for Item {
    fn from(raw: RawItem) -> Self {
        Self {
            id: pick_id(raw.id, raw.mongo_id),
            descripcion: raw.descripcion.unwrap_or_default(),
            categoria: raw.categoria.unwrap_or_default(),
            cantidad: raw.cantidad.unwrap_or(0),
            minimo: raw.minimo,
            critico: raw.critico,
            responsable: raw.responsable.unwrap_or_default(),
            observacion: raw.observacion.unwrap_or_default(),
        }
    }
}

/// Body of `POST /items` and `PUT /items/:id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemPayload {
    pub descripcion: String,
    pub categoria: String,
    pub cantidad: u32,
    pub minimo: u32,
    pub critico: u32,
    pub responsable: String,
    pub observacion: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_mongo_shape() {
        let item: Item = serde_json::from_value(json!({
            "_id": "65ab",
            "descripcion": "Multímetro",
            "categoria": "Laboratorio",
            "cantidad": "5",
            "responsable": "Bodega"
        }))
        .unwrap();
        assert_eq!(item.id, "65ab");
        assert_eq!(item.cantidad, 5);
        assert_eq!(item.minimo, None);
        assert_eq!(item.observacion, "");
    }

    #[test]
    fn test_both_id_fields_present() {
        let item: Item = serde_json::from_value(json!({"id": 3, "_id": "x"})).unwrap();
        assert_eq!(item.id, "3");
    }

    #[test]
    fn test_stock_level_uses_item_thresholds() {
        let item: Item = serde_json::from_value(json!({
            "id": 1, "descripcion": "Cable", "cantidad": 5, "minimo": 3, "critico": 1
        }))
        .unwrap();
        let defaults = StockThresholds::new(10, 6);
        assert_eq!(item.stock_level(defaults), StockLevel::Ok);

        let mut low = item.clone();
        low.cantidad = 2;
        assert_eq!(low.stock_level(defaults), StockLevel::Bajo);
        low.cantidad = 1;
        assert_eq!(low.stock_level(defaults), StockLevel::Critico);
    }

    #[test]
    fn test_stock_level_falls_back_to_defaults() {
        let item: Item =
            serde_json::from_value(json!({"id": 1, "descripcion": "Cable", "cantidad": 2}))
                .unwrap();
        assert_eq!(item.stock_level(StockThresholds::default()), StockLevel::Bajo);
        assert_eq!(
            item.stock_level(StockThresholds::new(1, 0)),
            StockLevel::Ok
        );
    }

    #[test]
    fn test_negative_quantity_reads_as_zero() {
        let item: Item = serde_json::from_value(json!({"id": 1, "cantidad": -4})).unwrap();
        assert_eq!(item.cantidad, 0);
    }
}
