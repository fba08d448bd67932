//! Feed and logging constants.
//!
//! Defaults for the capture pipeline; `CaptureConfig` in `services/capture`
//! starts from these and lets a TOML file or CLI switches override them.

/// Multicast group both feed sockets join.
pub const MULTICAST_GROUP: &str = "233.218.133.80";

/// First feed port.
pub const PORT1: u16 = 30501;

/// Second feed port.
pub const PORT2: u16 = 30502;

/// Receive buffer size and the largest declared unit length accepted.
pub const MAX_BUF: usize = 2048;

/// Tolerance between a unit header's declared length and the bytes actually
/// delivered by the kernel. The on-wire length may include bytes the
/// receiver elected not to deliver, so this is a sanity bound, not equality.
pub const LENGTH_TOLERANCE: usize = 100;

/// Bytes of each datagram copied into the log after the record header.
pub const MAX_STORED_PAYLOAD: usize = 256;

/// Size at which the current log segment rotates.
pub const LOG_FILE_SIZE: u64 = 500 * 1024 * 1024;

/// Maximum number of segments retained, current segment included.
pub const LOG_FILE_COUNT: usize = 50;

/// Base name of the current segment; rotated segments insert an index
/// before the extension (`packets_binary.1.log`, `packets_binary.2.log`, ...).
pub const LOG_BASE_NAME: &str = "packets_binary.log";

/// Capacity of the bounded writer queue. A full queue blocks the capture
/// thread; records are never dropped.
pub const ASYNC_QUEUE_SIZE: usize = 1024 * 1024;

/// Background writer threads draining the queue.
pub const WRITER_THREADS: usize = 4;

/// Write attempts per record before the writer declares itself failed.
pub const WRITE_RETRY_LIMIT: u32 = 3;

/// Capture thread emits a performance report every this many packets.
pub const STATS_INTERVAL: u64 = 100_000;

/// Capture thread requests a writer flush every this many packets.
pub const FLUSH_INTERVAL: u64 = 1_000_000;

/// Requested kernel receive buffer per socket.
pub const SOCKET_RECV_BUFFER: usize = 64 * 1024 * 1024;

/// Poll timeout; bounds how late the shutdown flag is observed.
pub const POLL_TIMEOUT_MS: u64 = 100;

/// Hard cap on inner messages walked per payload.
pub const INNER_MESSAGE_CAP: usize = 100;
