use std::fs::File;
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};

use hh_core::{Error, Result};
use ndarray::{Array1, Ix1, OwnedRepr};
use ndarray_npy::{NpzReader, NpzWriter, ReadNpzError};

use crate::records::FomRecords;

pub const ARRAY_FOM: &str = "all_fom";
pub const ARRAY_SIGNAL: &str = "all_s";
pub const ARRAY_BACKGROUND: &str = "all_b";
pub const ARRAY_BACKGROUND_UNC: &str = "all_b_unc";
pub const ARRAY_SIDEBAND: &str = "all_sideband_events";
pub const ARRAY_BDT_CUTS: &str = "all_bdt_cuts";
pub const ARRAY_XBB_CUTS: &str = "all_xbb_cuts";

/// Default mass window tag embedded in archive names.
pub const DEFAULT_MASS_WINDOW: &str = "115-160";

/// `<plot_dir>/fom_<category>_abcd_mass<window>_fom_arrays.npz`
pub fn fom_arrays_path(plot_dir: &Path, category: &str, mass_window: &str) -> PathBuf {
    plot_dir.join(format!("fom_{category}_abcd_mass{mass_window}_fom_arrays.npz"))
}

/// Read the seven record arrays from an `.npz` archive.
///
/// Entries may be stored with or without the `.npy` suffix and as `f64`,
/// `f32`, `i64` or `i32`; values are widened to `f64`.
pub fn load_fom_arrays(path: &Path) -> Result<FomRecords> {
    let file = File::open(path)?;
    let mut npz = NpzReader::new(file)
        .map_err(|e| Error::Npz(format!("parse {}: {e}", path.display())))?;
    let names = npz.names().map_err(|e| Error::Npz(format!("list {}: {e}", path.display())))?;

    let mut column = |key: &str| -> Result<Vec<f64>> {
        let entry = resolve_entry(&names, key).ok_or_else(|| {
            Error::Npz(format!("array '{key}' not found in {} (have: {names:?})", path.display()))
        })?;
        read_column(&mut npz, &entry)
            .map_err(|e| Error::Npz(format!("read '{key}' from {}: {e}", path.display())))
    };

    let records = FomRecords::new(
        column(ARRAY_FOM)?,
        column(ARRAY_SIGNAL)?,
        column(ARRAY_BACKGROUND)?,
        column(ARRAY_BACKGROUND_UNC)?,
        column(ARRAY_SIDEBAND)?,
        column(ARRAY_BDT_CUTS)?,
        column(ARRAY_XBB_CUTS)?,
    )?;
    tracing::info!(path = %path.display(), records = records.len(), "loaded FoM arrays");
    Ok(records)
}

/// Write records in the layout [`load_fom_arrays`] reads.
pub fn write_fom_arrays(path: &Path, records: &FomRecords) -> Result<()> {
    records.validate()?;
    let file = File::create(path)?;
    let mut npz = NpzWriter::new(file);
    let columns: [(&str, &Vec<f64>); 7] = [
        (ARRAY_FOM, &records.fom),
        (ARRAY_SIGNAL, &records.signal),
        (ARRAY_BACKGROUND, &records.background),
        (ARRAY_BACKGROUND_UNC, &records.background_unc),
        (ARRAY_SIDEBAND, &records.sideband_events),
        (ARRAY_BDT_CUTS, &records.bdt_cuts),
        (ARRAY_XBB_CUTS, &records.xbb_cuts),
    ];
    for (name, values) in columns {
        let arr = Array1::from(values.clone());
        npz.add_array(name, &arr).map_err(|e| Error::Npz(format!("write '{name}': {e}")))?;
    }
    npz.finish().map_err(|e| Error::Npz(format!("finish {}: {e}", path.display())))?;
    Ok(())
}

fn resolve_entry(names: &[String], key: &str) -> Option<String> {
    let with_ext = format!("{key}.npy");
    if let Some(n) = names.iter().find(|n| **n == with_ext || n.as_str() == key) {
        return Some(n.clone());
    }
    // nested paths inside the archive
    names
        .iter()
        .find(|n| {
            let base = n.rsplit('/').next().unwrap_or(n);
            base.strip_suffix(".npy").unwrap_or(base) == key
        })
        .cloned()
}

fn read_column<R: Read + Seek>(
    npz: &mut NpzReader<R>,
    entry: &str,
) -> std::result::Result<Vec<f64>, ReadNpzError> {
    // The f64 error is the one reported when no dtype matches.
    let first = match npz.by_name::<OwnedRepr<f64>, Ix1>(entry) {
        Ok(a) => return Ok(a.to_vec()),
        Err(e) => e,
    };
    if let Ok(a) = npz.by_name::<OwnedRepr<f32>, Ix1>(entry) {
        return Ok(a.iter().map(|&v| f64::from(v)).collect());
    }
    if let Ok(a) = npz.by_name::<OwnedRepr<i64>, Ix1>(entry) {
        return Ok(a.iter().map(|&v| v as f64).collect());
    }
    if let Ok(a) = npz.by_name::<OwnedRepr<i32>, Ix1>(entry) {
        return Ok(a.iter().map(|&v| f64::from(v)).collect());
    }
    if let Ok(a) = npz.by_name::<OwnedRepr<u64>, Ix1>(entry) {
        return Ok(a.iter().map(|&v| v as f64).collect());
    }
    if let Ok(a) = npz.by_name::<OwnedRepr<u32>, Ix1>(entry) {
        return Ok(a.iter().map(|&v| f64::from(v)).collect());
    }
    Err(first)
}
