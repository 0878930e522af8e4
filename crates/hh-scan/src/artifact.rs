//! Heatmap artifact: numbers-first input for the renderer.

use std::time::{SystemTime, UNIX_EPOCH};

use hh_core::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::grid::ScanGrids;
use crate::records::Quantity;

pub const HEATMAP_SCHEMA: &str = "hh_fom_heatmap_v0";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeatmapArtifact {
    pub schema_version: String,
    pub meta: HeatmapMeta,
    pub quantity: Quantity,
    pub title: String,
    pub colorbar_label: String,
    pub x_label: String,
    pub y_label: String,
    /// BDT cut values, one column per value.
    pub x_values: Vec<f64>,
    /// Xbb cut values, one row per value.
    pub y_values: Vec<f64>,
    /// `z[i_x][i_y]`; `None` marks cells without a qualifying record.
    pub z: Vec<Vec<Option<f64>>>,
    /// Cells to outline, as `[i_x, i_y]`.
    #[serde(default)]
    pub highlight: Vec<[usize; 2]>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeatmapMeta {
    pub tool: String,
    pub tool_version: String,
    pub created_unix_ms: u128,
}

fn now_unix_ms() -> Result<u128> {
    let d = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| Error::Computation(format!("system time error: {}", e)))?;
    Ok(d.as_millis())
}

impl HeatmapArtifact {
    /// Snapshot one quantity of `grids`, BDT on x and Xbb on y.
    pub fn from_grids(
        grids: &ScanGrids,
        quantity: Quantity,
        title: &str,
        highlight: &[(usize, usize)],
    ) -> Result<Self> {
        Ok(Self {
            schema_version: HEATMAP_SCHEMA.to_string(),
            meta: HeatmapMeta {
                tool: "hhscan".to_string(),
                tool_version: hh_core::VERSION.to_string(),
                created_unix_ms: now_unix_ms()?,
            },
            quantity,
            title: title.to_string(),
            colorbar_label: quantity.label().to_string(),
            x_label: "BDT Cut".to_string(),
            y_label: "Xbb Cut".to_string(),
            x_values: grids.axes.bdt.values().to_vec(),
            y_values: grids.axes.xbb.values().to_vec(),
            z: grids.quantity(quantity).to_rows(),
            highlight: highlight.iter().map(|&(i, j)| [i, j]).collect(),
        })
    }

    /// Check shape consistency after deserializing from an untrusted file.
    pub fn validate(&self) -> Result<()> {
        if self.z.len() != self.x_values.len() {
            return Err(Error::Validation(format!(
                "z has {} columns, expected {}",
                self.z.len(),
                self.x_values.len()
            )));
        }
        if let Some(bad) = self.z.iter().position(|col| col.len() != self.y_values.len()) {
            return Err(Error::Validation(format!(
                "z column {bad} has {} cells, expected {}",
                self.z[bad].len(),
                self.y_values.len()
            )));
        }
        let (n_x, n_y) = (self.x_values.len(), self.y_values.len());
        if let Some(h) = self.highlight.iter().find(|h| h[0] >= n_x || h[1] >= n_y) {
            return Err(Error::Validation(format!("highlight cell {h:?} out of range")));
        }
        Ok(())
    }
}
