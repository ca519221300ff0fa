//! UDP send/receive with deadline-bounded multi-reply collection.
//!
//! Every call binds its own socket, so concurrent callers never contend
//! on one. A unicast query normally yields 0 or 1 replies; a broadcast
//! yields one reply per responding device within the deadline window.

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::UdpSocket;
use tokio::time::timeout;
use tracing::{debug, trace};

use crate::error::{CoreError, Result};
use crate::protocol::Envelope;

/// Default window to wait for each reply datagram.
pub const DEFAULT_READ_DEADLINE: Duration = Duration::from_secs(1);

/// Largest datagram a device is known to send.
const MAX_DATAGRAM: usize = 2048;

/// UDP transport configuration shared by all protocol operations.
#[derive(Debug, Clone)]
pub struct Transport {
    /// Local address to bind. `None` binds `0.0.0.0:0` for an ephemeral port.
    pub local: Option<SocketAddr>,

    /// Per-read deadline; its expiry ends reply collection normally.
    pub read_deadline: Duration,
}

impl Default for Transport {
    fn default() -> Self {
        Self {
            local: None,
            read_deadline: DEFAULT_READ_DEADLINE,
        }
    }
}

impl Transport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_local(mut self, local: Option<SocketAddr>) -> Self {
        self.local = local;
        self
    }

    pub fn with_read_deadline(mut self, deadline: Duration) -> Self {
        self.read_deadline = deadline;
        self
    }

    /// Create a broadcast-capable UDP socket bound to the configured
    /// local address.
    fn bind_socket(&self) -> Result<UdpSocket> {
        let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;
        socket.set_broadcast(true)?;

        let local = self
            .local
            .unwrap_or_else(|| SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0)));
        socket.bind(&local.into())?;
        socket.set_nonblocking(true)?;

        UdpSocket::from_std(socket.into()).map_err(CoreError::Io)
    }

    /// Encode and send one message to `remote`, which may be a unicast or
    /// broadcast address. When `expect_response` is set, collect every
    /// reply that arrives before the read deadline expires.
    pub async fn send(
        &self,
        message: &Envelope,
        remote: SocketAddr,
        expect_response: bool,
    ) -> Result<Vec<Envelope>> {
        let datagram = message.encode()?;
        let socket = self.bind_socket()?;
        socket.send_to(&datagram, remote).await?;
        debug!(%remote, bytes = datagram.len(), "sent datagram");

        if !expect_response {
            return Ok(Vec::new());
        }
        self.receive(&socket).await
    }

    /// Collect decodable replies until a read deadline expires. Expiry is
    /// the normal end of the discovery window, not an error; any other
    /// socket error aborts the call.
    async fn receive(&self, socket: &UdpSocket) -> Result<Vec<Envelope>> {
        let mut replies = Vec::new();
        let mut buf = [0u8; MAX_DATAGRAM];

        loop {
            let (len, peer) = match timeout(self.read_deadline, socket.recv_from(&mut buf)).await {
                Err(_) => {
                    debug!(replies = replies.len(), "discovery window closed");
                    return Ok(replies);
                }
                Ok(Ok(received)) => received,
                Ok(Err(e)) => return Err(CoreError::Io(e)),
            };

            match Envelope::decode(&buf[..len]) {
                Ok(mut reply) => {
                    reply.peer = Some(peer);
                    replies.push(reply);
                }
                // Unrelated traffic on the broadcast domain; skip it.
                Err(err) => trace!(%peer, %err, "dropping undecodable datagram"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    const TEST_DEADLINE: Duration = Duration::from_millis(200);

    fn test_transport() -> Transport {
        Transport::new().with_read_deadline(TEST_DEADLINE)
    }

    /// Bind a loopback socket standing in for a device. For each received
    /// datagram it sends back every prepared raw reply.
    async fn fake_device(replies: Vec<Vec<u8>>) -> SocketAddr {
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = socket.local_addr().unwrap();
        tokio::spawn(async move {
            let mut buf = [0u8; MAX_DATAGRAM];
            loop {
                let Ok((_, peer)) = socket.recv_from(&mut buf).await else {
                    return;
                };
                for reply in &replies {
                    socket.send_to(reply, peer).await.unwrap();
                }
            }
        });
        addr
    }

    #[tokio::test]
    async fn test_single_reply_tagged_with_peer() {
        let reply = Envelope::sysinfo_request().encode().unwrap();
        let addr = fake_device(vec![reply]).await;

        let replies = test_transport()
            .send(&Envelope::sysinfo_request(), addr, true)
            .await
            .unwrap();

        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].peer, Some(addr));
        assert!(replies[0].module("get_sysinfo").is_some());
    }

    #[tokio::test]
    async fn test_undecodable_datagrams_dropped_and_order_kept() {
        let mut first = Envelope::default();
        first
            .system
            .insert("a".to_string(), serde_json::Value::from(1));
        let mut second = Envelope::default();
        second
            .system
            .insert("b".to_string(), serde_json::Value::from(2));

        let addr = fake_device(vec![
            first.encode().unwrap(),
            b"garbage that does not decipher".to_vec(),
            second.encode().unwrap(),
        ])
        .await;

        let replies = test_transport()
            .send(&Envelope::sysinfo_request(), addr, true)
            .await
            .unwrap();

        assert_eq!(replies.len(), 2);
        assert!(replies[0].module("a").is_some());
        assert!(replies[1].module("b").is_some());
    }

    #[tokio::test]
    async fn test_silent_target_returns_empty_within_deadline() {
        // Bound but never reads, so nothing ever answers.
        let silent = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = silent.local_addr().unwrap();

        let started = Instant::now();
        let replies = test_transport()
            .send(&Envelope::sysinfo_request(), addr, true)
            .await
            .unwrap();
        let elapsed = started.elapsed();

        assert!(replies.is_empty());
        assert!(elapsed >= TEST_DEADLINE);
        assert!(elapsed < TEST_DEADLINE * 4, "took {elapsed:?}");
    }

    #[tokio::test]
    async fn test_fire_and_forget_returns_immediately() {
        // Nobody is listening on this port; the write alone is success.
        let probe = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = probe.local_addr().unwrap();
        drop(probe);

        let started = Instant::now();
        let replies = test_transport()
            .send(&Envelope::relay_request(true), addr, false)
            .await
            .unwrap();

        assert!(replies.is_empty());
        assert!(started.elapsed() < TEST_DEADLINE);
    }
}
