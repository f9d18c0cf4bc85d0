use std::fmt::Write;

use crate::{Directory, Reader};

impl<R> Reader<R> {
    /// Human readable listing of all parsed metadata
    ///
    /// Meant for debugging, the format is not stable.
    pub fn debug_dump(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "host_byte_order: {:?}", self.host_byte_order());
        let _ = writeln!(out, "file_byte_order: {:?}", self.file_byte_order());
        let _ = writeln!(out, "n_frames: {}", self.n_frames());
        let _ = writeln!(out, "max_strip_size: {}", self.max_strip_size());

        for (frame, ifd) in self.directories().iter().enumerate() {
            let _ = writeln!(out, "frame {frame}:");
            out.push_str(&debug_dump_directory(ifd));
        }

        out
    }
}

fn debug_dump_directory(ifd: &Directory) -> String {
    fn show(value: Option<u32>) -> String {
        value.map_or_else(|| String::from("unset"), |x| x.to_string())
    }

    let mut out = String::new();
    let _ = writeln!(out, "  byte_offset: {}", ifd.byte_offset);
    let _ = writeln!(out, "  height: {}", show(ifd.height));
    let _ = writeln!(out, "  width: {}", show(ifd.width));
    let _ = writeln!(out, "  bits_per_sample: {}", show(ifd.bits_per_sample));
    let _ = writeln!(out, "  samples_per_pixel: {}", show(ifd.samples_per_pixel));
    let _ = writeln!(out, "  rows_per_strip: {}", show(ifd.rows_per_strip));
    let _ = writeln!(
        out,
        "  compression: {} ({:?})",
        show(ifd.compression),
        ifd.compression_scheme()
    );
    let _ = writeln!(
        out,
        "  photometric_interpretation: {}",
        show(ifd.photometric_interpretation)
    );
    let _ = writeln!(out, "  strips: {}", ifd.n_strips());
    out
}
