//! Bounded byte-level reader and writer for the msgscope codec.
//!
//! This crate provides [`ByteReader`] and [`ByteWriter`] for the fixed-width
//! little- and big-endian primitives that template messages are built from.
//!
//! # Design Principles
//!
//! - **No unsafe code** - Safety is paramount.
//! - **Bounded operations** - Reads never run past the input, writes never grow past the limit.
//! - **No domain knowledge** - This crate knows nothing about templates, blocks, or flags.
//! - **Explicit errors** - All failures return structured errors, never panic.
//!
//! # Example
//!
//! ```
//! use bytestream::{ByteReader, ByteWriter};
//!
//! let mut writer = ByteWriter::new();
//! writer.write_u16_le(0x1234).unwrap();
//! writer.write_u32_be(7).unwrap();
//!
//! let bytes = writer.finish();
//! assert_eq!(bytes, [0x34, 0x12, 0, 0, 0, 7]);
//!
//! let mut reader = ByteReader::new(&bytes);
//! assert_eq!(reader.read_u16_le().unwrap(), 0x1234);
//! assert_eq!(reader.read_u32_be().unwrap(), 7);
//! assert!(reader.is_empty());
//! ```

mod error;
mod reader;
mod writer;

pub use error::{ByteError, ByteResult};
pub use reader::ByteReader;
pub use writer::ByteWriter;
