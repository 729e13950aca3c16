//! Reversible byte-to-byte preprocessors.
//!
//! Every transform here rewrites a byte stream into another byte stream
//! that exposes more redundancy to the entropy coders, and every one has an
//! exact inverse. None of them is a compressor on its own; the hybrid
//! driver composes them in front of a PPM order or the CM codec and keeps
//! whichever pipeline wins.
//!
//! | Transform | Good for |
//! |---|---|
//! | [`rle`] | long same-byte runs |
//! | [`delta`] | gradual value ramps (audio, images) |
//! | [`sparse`] | zero-padded binaries, TAR |
//! | [`record`] | fixed-size record layouts |
//! | [`word`] | English text, HTML, source code |
//! | [`lz77`] | general repetition, 64 KB reach |
//! | [`lzopt`] | small inputs worth an optimal parse, 1 MB reach |
//! | [`lzx`] | small inputs with far-apart repetition, 64 MB reach |
//! | [`lzma`] | text/code, dense tag space, 1 MB reach |
//! | [`bwt`] | anything PPM handles badly in original order |
//! | [`dict`] | small text/markup files |
//!
//! Decoders are total: structurally invalid input truncates the output
//! rather than failing (back-references past the start of the output stop
//! the decode).

pub mod bwt;
pub mod delta;
pub mod dict;
pub mod lz77;
pub mod lzma;
pub mod lzopt;
pub mod lzx;
pub mod record;
pub mod rle;
pub mod sparse;
mod suffix;
pub mod word;
