//! Background gesture polling loop
//!
//! The loop runs on a dedicated blocking thread. Cancellation is cooperative:
//! the stop flag is checked once per iteration, so shutdown waits for the
//! poll in flight to complete. There is no reconnect; any client error ends
//! the loop for good.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use evdev::Key;
use gesture_mapper_client::{Connector, GestureClient};
use tracing::{debug, info, warn};

use crate::dispatch::{Action, Dispatcher};

/// Destination for synthesized key taps
pub trait KeySink {
    /// Press and release `key`
    fn tap(&mut self, key: Key) -> Result<()>;
}

/// Shared flag asking the poll loop to stop
#[derive(Debug, Clone, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Connect, then poll and dispatch until stopped or the session fails
///
/// Returns `Ok(())` when stopped through `stop`, and an error if the
/// connection cannot be established or a poll fails.
pub fn run<C, S>(
    client: &mut GestureClient<C>,
    dispatcher: &Dispatcher,
    sink: &mut S,
    stop: &StopFlag,
    interval: Duration,
) -> Result<()>
where
    C: Connector,
    S: KeySink,
{
    client
        .connect()
        .with_context(|| format!("Cannot connect to gesture service at {}", client.endpoint()))?;
    info!(endpoint = %client.endpoint(), "Connected to gesture service");

    while !stop.is_stopped() {
        let flags = client.poll().context("Internal gesture API error")?;

        match dispatcher.resolve(flags) {
            Action::Idle => {}
            Action::Tap { motion, key } => {
                info!(%motion, ?key, "Gesture detected");
                if let Err(e) = sink.tap(key) {
                    warn!(?key, "Failed to inject key: {:#}", e);
                }
            }
            Action::Unbound(flags) => {
                debug!("Unbound gesture {:#04x} ({})", flags.bits(), flags);
            }
        }

        if !interval.is_zero() {
            std::thread::sleep(interval);
        }
    }

    info!("Gesture polling stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gesture_mapper_client::{Channel, ChannelError, ErrorCode};
    use gesture_mapper_config::default_bindings;
    use std::collections::VecDeque;
    use std::io;
    use std::sync::Mutex;

    /// Fake service: answers the handshake, then replays gesture codes
    #[derive(Clone, Default)]
    struct FakeService {
        codes: Arc<Mutex<VecDeque<u8>>>,
        sent: Arc<Mutex<Vec<Vec<u8>>>>,
        refuse: bool,
    }

    impl FakeService {
        fn with_codes(codes: &[u8]) -> Self {
            let service = Self::default();
            service.codes.lock().unwrap().extend(codes.iter().copied());
            service
        }

        fn sent(&self) -> Vec<Vec<u8>> {
            self.sent.lock().unwrap().clone()
        }
    }

    struct FakeChannel {
        service: FakeService,
        pending: Option<Vec<u8>>,
    }

    impl Connector for FakeService {
        type Channel = FakeChannel;

        fn open(&self) -> io::Result<FakeChannel> {
            if self.refuse {
                return Err(io::ErrorKind::ConnectionRefused.into());
            }
            Ok(FakeChannel {
                service: self.clone(),
                pending: None,
            })
        }

        fn endpoint(&self) -> String {
            "fake".to_string()
        }
    }

    impl Channel for FakeChannel {
        fn set_message_mode(&mut self) -> io::Result<()> {
            Ok(())
        }

        fn send(&mut self, message: &[u8]) -> io::Result<()> {
            self.service.sent.lock().unwrap().push(message.to_vec());
            self.pending = match message {
                b"imuapi1.0\0" => Some(b"imuapi1.0\0".to_vec()),
                b"apidetect\0" => self.service.codes.lock().unwrap().pop_front().map(|c| vec![c]),
                _ => None,
            };
            Ok(())
        }

        fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let reply = self
                .pending
                .take()
                .ok_or_else(|| io::Error::from(io::ErrorKind::UnexpectedEof))?;
            buf[..reply.len()].copy_from_slice(&reply);
            Ok(reply.len())
        }
    }

    /// Records taps; optionally raises the stop flag after a number of taps
    #[derive(Default)]
    struct RecordingSink {
        taps: Vec<Key>,
        stop_after: Option<(usize, StopFlag)>,
        fail: bool,
    }

    impl KeySink for RecordingSink {
        fn tap(&mut self, key: Key) -> Result<()> {
            self.taps.push(key);
            if let Some((count, stop)) = &self.stop_after {
                if self.taps.len() >= *count {
                    stop.stop();
                }
            }
            if self.fail {
                anyhow::bail!("uinput unavailable");
            }
            Ok(())
        }
    }

    fn dispatcher() -> Dispatcher {
        Dispatcher::from_bindings(&default_bindings()).unwrap()
    }

    #[test]
    fn test_gestures_become_key_taps_until_service_fails() {
        let service = FakeService::with_codes(&[0x40, 0x00, 0x08, 0x13, 0x04, 0x80]);
        let mut client = GestureClient::with_connector(service.clone());
        let mut sink = RecordingSink::default();

        let err = run(
            &mut client,
            &dispatcher(),
            &mut sink,
            &StopFlag::new(),
            Duration::ZERO,
        )
        .unwrap_err();

        assert_eq!(
            sink.taps,
            vec![Key::KEY_UP, Key::KEY_LEFT, Key::KEY_RIGHT, Key::KEY_UP]
        );
        // The seventh poll finds no reply: the loop ends without reconnecting.
        assert!(err.to_string().contains("Internal gesture API error"));
        let cause = err.downcast_ref::<ChannelError>().expect("client error");
        assert_eq!(cause.code(), ErrorCode::TransactionFailed);
        assert!(!client.is_active());
        assert_eq!(service.sent().len(), 1 + 7);
    }

    #[test]
    fn test_stop_flag_checked_between_polls() {
        let service = FakeService::with_codes(&[0x08, 0x04, 0x04]);
        let mut client = GestureClient::with_connector(service.clone());
        let stop = StopFlag::new();
        let mut sink = RecordingSink {
            stop_after: Some((1, stop.clone())),
            ..Default::default()
        };

        run(&mut client, &dispatcher(), &mut sink, &stop, Duration::ZERO).unwrap();

        assert_eq!(sink.taps, vec![Key::KEY_LEFT]);
        assert!(client.is_active());
        assert_eq!(
            service.sent(),
            vec![b"imuapi1.0\0".to_vec(), b"apidetect\0".to_vec()]
        );

        drop(client);
        assert_eq!(service.sent().last().unwrap(), b"apiexit\0");
    }

    #[test]
    fn test_already_stopped_only_connects() {
        let service = FakeService::with_codes(&[0x08]);
        let mut client = GestureClient::with_connector(service.clone());
        let stop = StopFlag::new();
        stop.stop();

        run(
            &mut client,
            &dispatcher(),
            &mut RecordingSink::default(),
            &stop,
            Duration::ZERO,
        )
        .unwrap();

        assert!(client.is_active());
        assert_eq!(service.sent(), vec![b"imuapi1.0\0".to_vec()]);
    }

    #[test]
    fn test_connect_failure_ends_worker() {
        let service = FakeService {
            refuse: true,
            ..Default::default()
        };
        let mut client = GestureClient::with_connector(service.clone());

        let err = run(
            &mut client,
            &dispatcher(),
            &mut RecordingSink::default(),
            &StopFlag::new(),
            Duration::ZERO,
        )
        .unwrap_err();

        assert!(err.to_string().contains("Cannot connect"));
        assert_eq!(client.last_error(), Some(ErrorCode::PipeOpenFailed));
        assert!(service.sent().is_empty());
    }

    #[test]
    fn test_injection_failure_keeps_polling() {
        let service = FakeService::with_codes(&[0x08, 0x04]);
        let mut client = GestureClient::with_connector(service.clone());
        let mut sink = RecordingSink {
            fail: true,
            ..Default::default()
        };

        let _ = run(
            &mut client,
            &dispatcher(),
            &mut sink,
            &StopFlag::new(),
            Duration::ZERO,
        );

        assert_eq!(sink.taps, vec![Key::KEY_LEFT, Key::KEY_RIGHT]);
    }

    #[test]
    fn test_stop_flag_shared_between_clones() {
        let stop = StopFlag::new();
        let other = stop.clone();
        assert!(!other.is_stopped());
        stop.stop();
        assert!(other.is_stopped());
    }
}
