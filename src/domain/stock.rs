//! Stock-level classification.

use std::fmt;

/// Low-stock and critical thresholds, both inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockThresholds {
    /// Quantities at or below this are BAJO.
    pub bajo: u32,
    /// Quantities at or below this are CRITICO.
    pub critico: u32,
}

impl StockThresholds {
    pub const fn new(bajo: u32, critico: u32) -> Self {
        Self { bajo, critico }
    }
}

impl Default for StockThresholds {
    fn default() -> Self {
        Self::new(3, 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StockLevel {
    Ok,
    Bajo,
    Critico,
}

impl StockLevel {
    pub fn label(&self) -> &'static str {
        match self {
            StockLevel::Ok => "OK",
            StockLevel::Bajo => "BAJO",
            StockLevel::Critico => "CRÍTICO",
        }
    }

    pub fn is_alert(&self) -> bool {
        !matches!(self, StockLevel::Ok)
    }
}

impl fmt::Display for StockLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify a quantity. The critical threshold is checked first, so it
/// wins when thresholds are inverted.
pub fn stock_level(cantidad: u32, thresholds: StockThresholds) -> StockLevel {
    if cantidad <= thresholds.critico {
        StockLevel::Critico
    } else if cantidad <= thresholds.bajo {
        StockLevel::Bajo
    } else {
        StockLevel::Ok
    }
}

/// True when any level is not OK.
pub fn has_alerts<I>(levels: I) -> bool
where
    I: IntoIterator<Item = StockLevel>,
{
    levels.into_iter().any(|l| l.is_alert())
}
