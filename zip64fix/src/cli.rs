use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "zip64fix",
    version,
    about = "Fix the 'Total Number of Disks' field of ZIP64 archives",
    long_about = "Fix ZIP files larger than 4GiB that have an invalid 'Total Number of \
                  Disks' field in the 'ZIP64 End of Central Directory Locator'. The value \
                  in this field should be 1, but OneDrive/Windows sets it to 0, which makes \
                  it difficult to work with these files using standard unzip utilities."
)]
pub struct Cli {
    #[arg(long, help = "perform a trial run with no changes made")]
    pub dry_run: bool,

    #[arg(
        required = true,
        value_name = "ZIP_PATH",
        help = "Paths of the ZIP files",
        long_help = "Set the paths of the ZIP archives to inspect and repair"
    )]
    pub files: Vec<PathBuf>,
}
