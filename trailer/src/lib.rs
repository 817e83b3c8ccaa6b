//! Repairs the "Total Number of Disks" field in the ZIP64 End of Central
//! Directory Locator of single-volume archives. Some vendor tools
//! (OneDrive/Windows) write 0 there instead of 1 for archives larger than
//! 4GiB, which strict unzip implementations reject.
//!
//! The repair is a guarded in-place write of exactly 4 bytes; the archive is
//! never re-encoded, renamed or truncated.

pub mod types;

use std::fs::OpenOptions;
use std::io::{self, ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::Path;

use anyhow::Result;

use crate::types::{
    EOCD, EOCD_SIZE, LOCAL_FILE_HEADER_SIGNATURE, MAX_COMMENT_SIZE, TOTAL_DISKS_OFFSET,
    ZIP64_LOCATOR_SIGNATURE, ZIP64_LOCATOR_SIZE, ZIP64_OFFSET_SENTINEL, Zip64Locator,
};

/// One of the structural invariants an archive must satisfy before the
/// disk-count field is touched.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    #[error("wrong signature at start")]
    WrongStartSignature,

    #[error("missing EOCD signature")]
    MissingEocdSignature,

    #[error("bad central-directory offset")]
    BadCentralDirectoryOffset,

    #[error("missing ZIP64 signature")]
    MissingZip64Signature,

    #[error("unknown disk-count value")]
    UnknownDiskCount,
}

/// Per-file result of [`fix`]. Every failure mode is reported here rather
/// than raised, so one bad file never aborts a batch.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The path does not resolve to a readable file.
    NotFound,
    /// An open, seek, read or write call failed.
    IoError(String),
    /// One of the structural invariants does not hold; the file is untouched.
    Invalid(InvalidReason),
    /// The defect is present but dry-run suppressed the write.
    WouldFix,
    /// The defect was present and has been corrected in place.
    Fixed,
    /// The disk-count field already holds 1.
    AlreadyCorrect,
}

/// Validates the trailer of the archive at `path` and, unless `dry_run` is
/// set, rewrites a zeroed "Total Number of Disks" field to 1.
///
/// All reads happen before the decision to write, at most 4 bytes are ever
/// written, and only after every structural check has passed. Running it
/// again on a repaired archive reports [`Outcome::AlreadyCorrect`] without
/// writing.
pub fn fix(path: &Path, dry_run: bool) -> Outcome {
    match try_fix(path, dry_run) {
        Ok(outcome) => outcome,
        Err(err) => match err.downcast_ref::<io::Error>() {
            Some(io_err) if io_err.kind() == ErrorKind::NotFound => Outcome::NotFound,
            _ => Outcome::IoError(err.to_string()),
        },
    }
}

fn try_fix(path: &Path, dry_run: bool) -> Result<Outcome> {
    let mut file = OpenOptions::new().read(true).write(true).open(path)?;

    let mut start = [0u8; 4];
    file.read_exact(&mut start)?;
    if u32::from_le_bytes(start) != LOCAL_FILE_HEADER_SIGNATURE {
        return Ok(Outcome::Invalid(InvalidReason::WrongStartSignature));
    }

    // The EOCD sits at most one maximal comment away from the end of the
    // file, with the locator directly before it.
    let len = file.metadata()?.len();
    let window = ((ZIP64_LOCATOR_SIZE + EOCD_SIZE + MAX_COMMENT_SIZE) as u64).min(len);
    let tail_start = len - window;

    file.seek(SeekFrom::Start(tail_start))?;
    let mut tail = vec![0u8; window as usize];
    file.read_exact(&mut tail)?;

    let Some((eocd_pos, eocd)) = EOCD::find_in_tail(&tail) else {
        return Ok(Outcome::Invalid(InvalidReason::MissingEocdSignature));
    };

    if eocd.central_dir_offset != ZIP64_OFFSET_SENTINEL {
        return Ok(Outcome::Invalid(InvalidReason::BadCentralDirectoryOffset));
    }

    if eocd_pos < ZIP64_LOCATOR_SIZE {
        return Ok(Outcome::Invalid(InvalidReason::MissingZip64Signature));
    }
    let locator_pos = eocd_pos - ZIP64_LOCATOR_SIZE;
    let locator = Zip64Locator::try_from(&tail[locator_pos..eocd_pos])?;
    if locator.signature != ZIP64_LOCATOR_SIGNATURE {
        return Ok(Outcome::Invalid(InvalidReason::MissingZip64Signature));
    }

    match locator.total_disks {
        0 => {
            if dry_run {
                return Ok(Outcome::WouldFix);
            }
            let field_offset = tail_start + (locator_pos + TOTAL_DISKS_OFFSET) as u64;
            file.seek(SeekFrom::Start(field_offset))?;
            file.write_all(&1u32.to_le_bytes())?;
            Ok(Outcome::Fixed)
        }
        1 => Ok(Outcome::AlreadyCorrect),
        _ => Ok(Outcome::Invalid(InvalidReason::UnknownDiskCount)),
    }
}
