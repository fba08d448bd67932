//! Multicast socket setup and the capture loop.
//!
//! Both feed sockets are owned by the single capture thread. The loop is
//! synchronous: a readiness poll with a 100 ms timeout (so the shutdown
//! flag is observed promptly), then each ready socket is drained to
//! `WouldBlock`. Datagram processing happens inline; the writer queue is
//! the only place the thread can block.

use std::io::ErrorKind;
use std::net::{IpAddr, Ipv4Addr, SocketAddrV4};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use mio::net::UdpSocket;
use mio::{Events, Interest, Poll, Token};
use pitchcap_types::config::MAX_BUF;
use socket2::{Domain, Protocol, Socket, Type};
use tracing::{error, info, warn};

use crate::config::CaptureConfig;
use crate::error::{CaptureError, CaptureResult};
use crate::processor::PacketProcessor;

pub struct NetworkHandler {
    poll: Poll,
    events: Events,
    sockets: Vec<(UdpSocket, u16)>,
    shutdown: Arc<AtomicBool>,
    poll_timeout: Duration,
}

impl NetworkHandler {
    /// Create, configure and register one socket per feed port.
    pub fn bind(config: &CaptureConfig, shutdown: Arc<AtomicBool>) -> CaptureResult<Self> {
        let poll = Poll::new().map_err(|e| CaptureError::io("creating poller", e))?;
        let mut sockets = Vec::with_capacity(config.ports.len());

        for (index, &port) in config.ports.iter().enumerate() {
            let socket = create_multicast_socket(config.group, port, config.socket_recv_buffer)
                .map_err(|e| CaptureError::io(format!("binding feed socket on port {port}"), e))?;
            let mut socket = UdpSocket::from_std(socket);
            poll.registry()
                .register(&mut socket, Token(index), Interest::READABLE)
                .map_err(|e| CaptureError::io("registering feed socket", e))?;
            info!(port, group = %config.group, "joined multicast group");
            sockets.push((socket, port));
        }

        Ok(Self {
            poll,
            events: Events::with_capacity(64),
            sockets,
            shutdown,
            poll_timeout: Duration::from_millis(config.poll_timeout_ms),
        })
    }

    /// Run the capture loop until the shutdown flag flips or the writer
    /// fails. Datagrams already readable when the flag flips are still
    /// drained and enqueued before returning.
    pub fn run(&mut self, processor: &mut PacketProcessor) -> CaptureResult<()> {
        let mut buf = [0u8; MAX_BUF];
        let mut packet_id: u32 = 0;

        info!("packet capture started, waiting for datagrams");
        'capture: while !self.shutdown.load(Ordering::Relaxed) {
            if let Err(e) = self.poll.poll(&mut self.events, Some(self.poll_timeout)) {
                if e.kind() == ErrorKind::Interrupted {
                    continue;
                }
                return Err(CaptureError::io("polling feed sockets", e));
            }

            for event in self.events.iter() {
                let Token(index) = event.token();
                let Some((socket, port)) = self.sockets.get(index) else {
                    continue;
                };
                if event.is_error() {
                    error!(port = *port, "socket error on feed socket, stopping capture");
                    break 'capture;
                }
                loop {
                    match socket.recv_from(&mut buf) {
                        Ok((len, src)) => {
                            packet_id += 1;
                            let src_ip = match src.ip() {
                                IpAddr::V4(ip) => ip,
                                IpAddr::V6(_) => Ipv4Addr::UNSPECIFIED,
                            };
                            processor.process_packet(packet_id, *port, &buf[..len], src_ip)?;
                        }
                        Err(e) if e.kind() == ErrorKind::WouldBlock => break,
                        Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                        Err(e) => {
                            error!(port, error = %e, "recv failed on feed socket");
                            break;
                        }
                    }
                }
            }
        }

        info!(packets = packet_id, "capture loop stopped");
        Ok(())
    }
}

/// Plain std socket with the feed options applied: SO_REUSEADDR, a large
/// kernel receive buffer, bind to the port, join the group, nonblocking.
fn create_multicast_socket(
    group: Ipv4Addr,
    port: u16,
    recv_buffer: usize,
) -> std::io::Result<std::net::UdpSocket> {
    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;
    if let Err(e) = socket.set_reuse_address(true) {
        warn!(port, error = %e, "could not set SO_REUSEADDR");
    }
    if let Err(e) = socket.set_recv_buffer_size(recv_buffer) {
        // Not fatal: the kernel clamps to its configured maximum anyway.
        warn!(port, requested = recv_buffer, error = %e, "could not size receive buffer");
    }
    socket.bind(&SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, port).into())?;
    socket.join_multicast_v4(&group, &Ipv4Addr::UNSPECIFIED)?;
    socket.set_nonblocking(true)?;
    Ok(socket.into())
}
