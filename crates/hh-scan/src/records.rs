use hh_core::{CutPoint, Error, Result};
use serde::{Deserialize, Serialize};

/// Co-indexed record arrays: entry `i` of every column describes the
/// selection `(bdt_cuts[i], xbb_cuts[i])`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FomRecords {
    pub fom: Vec<f64>,
    pub signal: Vec<f64>,
    pub background: Vec<f64>,
    pub background_unc: Vec<f64>,
    pub sideband_events: Vec<f64>,
    pub bdt_cuts: Vec<f64>,
    pub xbb_cuts: Vec<f64>,
}

impl FomRecords {
    /// Build from columns, requiring equal lengths.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        fom: Vec<f64>,
        signal: Vec<f64>,
        background: Vec<f64>,
        background_unc: Vec<f64>,
        sideband_events: Vec<f64>,
        bdt_cuts: Vec<f64>,
        xbb_cuts: Vec<f64>,
    ) -> Result<Self> {
        let records = Self {
            fom,
            signal,
            background,
            background_unc,
            sideband_events,
            bdt_cuts,
            xbb_cuts,
        };
        records.validate()?;
        Ok(records)
    }

    /// Check that every column has the length of `fom`.
    pub fn validate(&self) -> Result<()> {
        let n = self.fom.len();
        let columns = [
            ("all_s", self.signal.len()),
            ("all_b", self.background.len()),
            ("all_b_unc", self.background_unc.len()),
            ("all_sideband_events", self.sideband_events.len()),
            ("all_bdt_cuts", self.bdt_cuts.len()),
            ("all_xbb_cuts", self.xbb_cuts.len()),
        ];
        for (name, len) in columns {
            if len != n {
                return Err(Error::Validation(format!(
                    "array length mismatch: all_fom={n} {name}={len}"
                )));
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.fom.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fom.is_empty()
    }

    /// Row view of record `idx`. Panics if out of range.
    pub fn record(&self, idx: usize) -> Record {
        Record {
            cut: CutPoint::new(self.bdt_cuts[idx], self.xbb_cuts[idx]),
            fom: self.fom[idx],
            signal: self.signal[idx],
            background: self.background[idx],
            background_unc: self.background_unc[idx],
            sideband_events: self.sideband_events[idx],
        }
    }
}

/// One evaluated working point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Record {
    pub cut: CutPoint,
    pub fom: f64,
    pub signal: f64,
    pub background: f64,
    pub background_unc: f64,
    pub sideband_events: f64,
}

/// Minimum-statistics requirements a record must meet to enter the grid.
///
/// A record passes when `signal > min_signal`, `background >= min_background`
/// and `sideband_events >= min_sideband`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidityThresholds {
    pub min_signal: f64,
    pub min_background: f64,
    pub min_sideband: f64,
}

impl Default for ValidityThresholds {
    fn default() -> Self {
        Self { min_signal: 0.5, min_background: 2.0, min_sideband: 12.0 }
    }
}

impl ValidityThresholds {
    pub fn passes(&self, record: &Record) -> bool {
        record.signal > self.min_signal
            && record.background >= self.min_background
            && record.sideband_events >= self.min_sideband
    }
}

/// Per-cell quantity that can be mapped over the cut grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quantity {
    Fom,
    Signal,
    Background,
    BackgroundUnc,
    SidebandEvents,
}

impl Quantity {
    pub const ALL: [Quantity; 5] = [
        Quantity::Fom,
        Quantity::Signal,
        Quantity::Background,
        Quantity::BackgroundUnc,
        Quantity::SidebandEvents,
    ];

    /// Short key used in file names and config files.
    pub fn key(self) -> &'static str {
        match self {
            Quantity::Fom => "fom",
            Quantity::Signal => "s",
            Quantity::Background => "b",
            Quantity::BackgroundUnc => "b_unc",
            Quantity::SidebandEvents => "sideband_events",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "fom" => Ok(Quantity::Fom),
            "s" | "signal" => Ok(Quantity::Signal),
            "b" | "background" => Ok(Quantity::Background),
            "b_unc" | "background_unc" => Ok(Quantity::BackgroundUnc),
            "sideband" | "sideband_events" => Ok(Quantity::SidebandEvents),
            other => Err(Error::Validation(format!("unknown quantity: {other}"))),
        }
    }

    /// Default colour-bar label.
    pub fn label(self) -> &'static str {
        match self {
            Quantity::Fom => "FoM",
            Quantity::Signal => "Expected signal S",
            Quantity::Background => "Estimated background B",
            Quantity::BackgroundUnc => "Background uncertainty \u{03C3}(B)",
            Quantity::SidebandEvents => "Sideband events",
        }
    }

    pub fn value(self, record: &Record) -> f64 {
        match self {
            Quantity::Fom => record.fom,
            Quantity::Signal => record.signal,
            Quantity::Background => record.background,
            Quantity::BackgroundUnc => record.background_unc,
            Quantity::SidebandEvents => record.sideband_events,
        }
    }
}
