use anyhow::{Error, bail};

pub const LOCAL_FILE_HEADER_SIGNATURE: u32 = 0x04034b50;
pub const EOCD_SIGNATURE: u32 = 0x06054b50;
pub const ZIP64_LOCATOR_SIGNATURE: u32 = 0x07064b50;

/// Value of the EOCD central directory offset when the real offset lives in
/// the ZIP64 structures.
pub const ZIP64_OFFSET_SENTINEL: u32 = 0xffff_ffff;

pub const EOCD_SIZE: usize = 22;
pub const ZIP64_LOCATOR_SIZE: usize = 20;
pub const MAX_COMMENT_SIZE: usize = u16::MAX as usize;

/// Byte offset of the "Total Number of Disks" field inside the locator.
pub const TOTAL_DISKS_OFFSET: usize = 16;

#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Default)]
pub struct EOCD {
    /// end of central directory signature (0x06054b50 (LE))
    pub signature: u32,

    /// number of this disk
    pub disk_number: u16,

    /// number of the disk with the start of the central directory
    pub central_dir_start_disk: u16,

    /// total number of entries in the central dir on this disk
    pub central_dir_entries_disk: u16,

    /// total number of entries in the central dir
    pub central_dir_entries_total: u16,

    /// size of the central directory
    pub central_dir_size: u32,

    /// offset of start of central directory with respect to the starting disk
    /// number, 0xffffffff for ZIP64 archives
    pub central_dir_offset: u32,

    /// zipfile comment length
    pub comment_length: u16,
}

impl EOCD {
    /// Scans `tail` backward for the EOCD record, nearest to the end first.
    /// A candidate only counts when its comment length spans exactly the
    /// remaining bytes, so signature look-alikes inside the comment are
    /// skipped. `tail` must end at the end of the file.
    pub fn find_in_tail(tail: &[u8]) -> Option<(usize, Self)> {
        let signature = EOCD_SIGNATURE.to_le_bytes();

        tail.windows(4)
            .enumerate()
            .rev()
            .filter(|(_, window)| *window == signature)
            .find_map(|(pos, _)| {
                let eocd = EOCD::try_from(&tail[pos..]).ok()?;
                let end = pos + EOCD_SIZE + eocd.comment_length as usize;
                (end == tail.len()).then_some((pos, eocd))
            })
    }
}

impl TryFrom<&[u8]> for EOCD {
    type Error = Error;
    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        if value.len() < EOCD_SIZE {
            bail!("truncated EOCD record");
        }

        let signature = u32::from_le_bytes(value[0..4].try_into()?);
        if signature != EOCD_SIGNATURE {
            bail!("invalid EOCD signature");
        }

        let disk_number = u16::from_le_bytes(value[4..6].try_into()?);
        let central_dir_start_disk = u16::from_le_bytes(value[6..8].try_into()?);
        let central_dir_entries_disk = u16::from_le_bytes(value[8..10].try_into()?);
        let central_dir_entries_total = u16::from_le_bytes(value[10..12].try_into()?);
        let central_dir_size = u32::from_le_bytes(value[12..16].try_into()?);
        let central_dir_offset = u32::from_le_bytes(value[16..20].try_into()?);
        let comment_length = u16::from_le_bytes(value[20..22].try_into()?);

        Ok(Self {
            signature,
            disk_number,
            central_dir_start_disk,
            central_dir_entries_disk,
            central_dir_entries_total,
            central_dir_size,
            central_dir_offset,
            comment_length,
        })
    }
}

#[derive(Debug, Default)]
pub struct Zip64Locator {
    /// zip64 end of central directory locator signature (0x07064b50 (LE))
    pub signature: u32,

    /// number of the disk with the start of the zip64 end of central directory
    pub eocd64_start_disk: u32,

    /// relative offset of the zip64 end of central directory record
    pub eocd64_offset: u64,

    /// total number of disks, 1 for single-volume archives
    pub total_disks: u32,
}

impl TryFrom<&[u8]> for Zip64Locator {
    type Error = Error;
    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        if value.len() < ZIP64_LOCATOR_SIZE {
            bail!("truncated ZIP64 locator record");
        }

        let signature = u32::from_le_bytes(value[0..4].try_into()?);
        let eocd64_start_disk = u32::from_le_bytes(value[4..8].try_into()?);
        let eocd64_offset = u64::from_le_bytes(value[8..16].try_into()?);
        let total_disks = u32::from_le_bytes(value[16..20].try_into()?);

        Ok(Self {
            signature,
            eocd64_start_disk,
            eocd64_offset,
            total_disks,
        })
    }
}
