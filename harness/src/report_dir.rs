//! Report directory persistence: write, read and verify a run's report.
//!
//! # Directory layout
//!
//! ```text
//! <dir>/
//!   construction_report.json   canonical JSON of the report
//!   report_digest.txt          ASCII digest string ("sha256:...")
//! ```
//!
//! Reading is fail-closed: a missing file, non-canonical JSON, or a digest
//! that does not match the bytes is an error.

use std::path::Path;

use thiserror::Error;

use hsdiag_kernel::proof::canon::canonical_json_bytes;
use hsdiag_kernel::proof::hash::{canonical_hash, ContentHash, HashDomain};

use crate::runner::RunOutcome;

pub const REPORT_FILENAME: &str = "construction_report.json";
pub const DIGEST_FILENAME: &str = "report_digest.txt";

#[derive(Debug, Error)]
pub enum ReportDirError {
    #[error("I/O error: {detail}")]
    Io { detail: String },
    #[error("missing file: {filename}")]
    Missing { filename: String },
    #[error("report is not valid JSON: {detail}")]
    Parse { detail: String },
    #[error("report bytes are not canonical")]
    NonCanonical,
    #[error("malformed digest: {found}")]
    MalformedDigest { found: String },
    #[error("digest mismatch: stored={stored}, recomputed={recomputed}")]
    DigestMismatch { stored: String, recomputed: String },
}

/// A report read back from disk.
#[derive(Debug, Clone)]
pub struct StoredReport {
    pub report: serde_json::Value,
    pub bytes: Vec<u8>,
    pub digest: ContentHash,
}

/// Write the report and its digest into `dir`, creating it if needed.
///
/// # Errors
///
/// [`ReportDirError::Io`] on any filesystem failure.
pub fn write_report_dir(outcome: &RunOutcome, dir: &Path) -> Result<(), ReportDirError> {
    std::fs::create_dir_all(dir).map_err(|e| ReportDirError::Io {
        detail: format!("create_dir_all {}: {e}", dir.display()),
    })?;
    write_atomic(&dir.join(REPORT_FILENAME), &outcome.report_bytes)?;
    write_atomic(&dir.join(DIGEST_FILENAME), outcome.digest.as_str().as_bytes())?;
    Ok(())
}

/// Read a report directory and verify it.
///
/// # Errors
///
/// See [`ReportDirError`].
pub fn read_report_dir(dir: &Path) -> Result<StoredReport, ReportDirError> {
    let bytes = read_required(dir, REPORT_FILENAME)?;
    let stored = read_required(dir, DIGEST_FILENAME)?;
    let stored = String::from_utf8_lossy(&stored).trim().to_string();
    let digest = ContentHash::parse(&stored)
        .ok_or(ReportDirError::MalformedDigest { found: stored.clone() })?;

    let report: serde_json::Value =
        serde_json::from_slice(&bytes).map_err(|e| ReportDirError::Parse {
            detail: e.to_string(),
        })?;
    let canonical = canonical_json_bytes(&report).map_err(|e| ReportDirError::Parse {
        detail: e.to_string(),
    })?;
    if canonical != bytes {
        return Err(ReportDirError::NonCanonical);
    }

    let recomputed = canonical_hash(HashDomain::ConstructionReport, &bytes);
    if recomputed != digest {
        return Err(ReportDirError::DigestMismatch {
            stored,
            recomputed: recomputed.as_str().to_string(),
        });
    }
    Ok(StoredReport {
        report,
        bytes,
        digest,
    })
}

fn write_atomic(path: &Path, content: &[u8]) -> Result<(), ReportDirError> {
    let dir = path.parent().ok_or_else(|| ReportDirError::Io {
        detail: "no parent directory".into(),
    })?;
    let temp_name = format!(
        ".tmp_{}",
        path.file_name().unwrap_or_default().to_string_lossy()
    );
    let temp_path = dir.join(temp_name);
    std::fs::write(&temp_path, content).map_err(|e| ReportDirError::Io {
        detail: format!("write {}: {e}", temp_path.display()),
    })?;
    std::fs::rename(&temp_path, path).map_err(|e| ReportDirError::Io {
        detail: format!("rename {} to {}: {e}", temp_path.display(), path.display()),
    })?;
    Ok(())
}

fn read_required(dir: &Path, filename: &str) -> Result<Vec<u8>, ReportDirError> {
    std::fs::read(dir.join(filename)).map_err(|_| ReportDirError::Missing {
        filename: filename.to_string(),
    })
}
