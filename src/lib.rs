//! Decode the BIOS info record of ASUS `.CAP` capsules
//!
//! ASUS BIOS updates ship as a ZIP holding a capsule whose download name
//! differs from the name the board's flashback feature looks for. That name,
//! along with the board, brand, build date and build number, is stored in a
//! fixed record right after a `$BOOTEFI$` marker somewhere in the capsule.

pub mod descriptor;
pub mod display;
pub mod error;
pub mod file_types;
pub mod parser;
pub mod processor;
pub mod zip_utils;

pub use descriptor::FirmwareDescriptor;
pub use error::{Error, Result};
pub use parser::{decode, DecodeError};
pub use zip_utils::{extract_cap, UnwrapError};
