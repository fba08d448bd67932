//! # Pitchcap Codec
//!
//! ## Purpose
//!
//! The "rules" layer between the raw datagram and the rest of the pipeline:
//!
//! - Unit-header decoding with the validation heuristics the capture loop
//!   applies before accepting a datagram ([`decoder`])
//! - The total packet classifier ([`classifier`])
//! - The bounded inner-message walk used by the offline reader ([`inner`])
//! - Binary log record framing shared by writer and reader ([`record`])
//!
//! ## Architecture Role
//!
//! ```text
//! pitchcap-types → [pitchcap-codec] → services/capture, services/reader
//!     ↑                 ↓                    ↓
//! Pure Data        Protocol Rules        Sockets, queues,
//! Structures       Validation/Framing    files, CLI
//! ```
//!
//! ## What This Crate Does NOT Contain
//!
//! - Sequence tracking state (lives with the capture service; it is
//!   stateful and single-threaded by design)
//! - Any I/O
//!
//! Decoding is zero-copy and allocation-free; only record *encoding*
//! allocates, once per record, to hand the writer a single contiguous
//! buffer.

pub mod classifier;
pub mod decoder;
pub mod error;
pub mod inner;
pub mod record;

pub use classifier::classify_packet;
pub use decoder::decode_unit_header;
pub use error::{CodecError, CodecResult};
pub use inner::{InnerMessage, InnerMessageIter};
pub use record::{decode_record, encode_record};
