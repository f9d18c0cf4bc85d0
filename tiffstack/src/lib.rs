//! Reader for multi-frame TIFF6 image stacks
//!
//! [`Reader`] parses the whole directory chain of a file up front and decodes
//! the strips of single frames, or of all frames at once, into caller buffers
//! of any [`Sample`] type.
//!
//! Only files in the byte order of the host are supported. Strips may be
//! uncompressed or DEFLATE compressed.
//!
//! ```no_run
//! let mut reader = tiffstack::Reader::open("stack.tif")?;
//! let mut frame = vec![0_u16; reader.n_samples(0)?];
//! reader.read_frame(0, &mut frame)?;
//! # Ok::<(), tiffstack::Error>(())
//! ```

mod byte_order;
mod debug;
pub mod decode;
pub mod deflate;
mod error;
pub mod field_type;
pub mod header;
pub mod ifd;
mod reader;
pub mod tag;

pub use byte_order::ByteOrder;
pub use decode::{Element, Sample};
pub use error::{Error, Result};
pub use field_type::FieldType;
pub use ifd::Directory;
pub use reader::Reader;
