//! Session Tests
//!
//! Runs sessions against an in-process mock RCON server.

use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use rconkit::protocol::{
    decode_packet, write_packet, Packet, PacketType, SequentialIds, BAD_AUTH_ID,
};
use rconkit::{ClientConfig, RconError, Session};

const PASSWORD: &str = "secret";

/// Reply body for a command, or `None` to answer with the bad-auth id
type Handler = Arc<dyn Fn(&str) -> Option<Vec<u8>> + Send + Sync>;

/// Per-connection misbehaviour, keyed by accept order (0 = first connection)
#[derive(Clone, Default)]
struct Script {
    drop_after_auth: Vec<usize>,
    reject_auth: Vec<usize>,
}

struct MockServer {
    addr: SocketAddr,
    connections: Arc<AtomicUsize>,
    seen_ids: Arc<Mutex<Vec<i32>>>,
}

impl MockServer {
    fn start(handler: Handler) -> Self {
        Self::start_scripted(handler, Script::default())
    }

    fn start_scripted(handler: Handler, script: Script) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let connections = Arc::new(AtomicUsize::new(0));
        let seen_ids = Arc::new(Mutex::new(Vec::new()));

        let counter = Arc::clone(&connections);
        let ids = Arc::clone(&seen_ids);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { return };
                let index = counter.fetch_add(1, Ordering::SeqCst);
                let handler = Arc::clone(&handler);
                let script = script.clone();
                let ids = Arc::clone(&ids);
                thread::spawn(move || serve(stream, index, handler, script, ids));
            }
        });

        Self {
            addr,
            connections,
            seen_ids,
        }
    }

    fn port(&self) -> u16 {
        self.addr.port()
    }

    fn config(&self, password: &str) -> ClientConfig {
        ClientConfig::new("127.0.0.1", self.port(), password)
    }

    fn connection_count(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }
}

fn serve(
    mut stream: TcpStream,
    index: usize,
    handler: Handler,
    script: Script,
    seen_ids: Arc<Mutex<Vec<i32>>>,
) {
    let mut authenticated = false;

    while let Ok(request) = decode_packet(&mut stream) {
        seen_ids.lock().unwrap().push(request.id);

        let reply = if request.packet_type == PacketType::Auth.as_i32() {
            let accepted = request.payload() == PASSWORD.as_bytes()
                && !script.reject_auth.contains(&index);
            authenticated = accepted;
            let id = if accepted { request.id } else { BAD_AUTH_ID };
            Packet {
                id,
                packet_type: PacketType::AUTH_RESPONSE,
                body: Vec::new(),
            }
        } else {
            let command = String::from_utf8_lossy(request.payload()).into_owned();
            match handler(&command) {
                Some(body) if authenticated => {
                    Packet::new(request.id, PacketType::ResponseValue, body)
                }
                _ => Packet::new(BAD_AUTH_ID, PacketType::ResponseValue, Vec::new()),
            }
        };

        if write_packet(&mut stream, &reply).is_err() {
            return;
        }

        let is_auth = request.packet_type == PacketType::Auth.as_i32();
        if is_auth && script.drop_after_auth.contains(&index) {
            return;
        }
    }
}

fn echo_handler() -> Handler {
    Arc::new(|command: &str| match command {
        "list" => Some(b"There are 0 of a max of 20 players online:".to_vec()),
        "padded" => Some(b"hello\0\0".to_vec()),
        "spaced" => Some(b"  \n hello world \t\n".to_vec()),
        "silent" => Some(Vec::new()),
        "revoked" => None,
        "hang" => {
            thread::sleep(Duration::from_secs(2));
            Some(Vec::new())
        }
        other => Some(format!("Unknown command: {}", other).into_bytes()),
    })
}

// =============================================================================
// Connect Tests
// =============================================================================

#[test]
fn test_connect_and_send_command() {
    let server = MockServer::start(echo_handler());

    let mut session = Session::connect("127.0.0.1", server.port(), PASSWORD).unwrap();
    let response = session.send_command("list").unwrap();

    assert_eq!(response, "There are 0 of a max of 20 players online:");
    assert_eq!(session.peer_addr(), server.addr);
}

#[test]
fn test_connect_wrong_password() {
    let server = MockServer::start(echo_handler());

    let result = Session::connect("127.0.0.1", server.port(), "wrong");
    assert!(matches!(result, Err(RconError::AuthFailed)));
}

#[test]
fn test_connect_refused() {
    // Grab a free port, then close it again
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let result = Session::connect("127.0.0.1", port, PASSWORD);
    match result {
        Err(RconError::Dial { addr, .. }) => assert!(addr.ends_with(&format!(":{}", port))),
        Err(other) => panic!("Expected Dial error, got {:?}", other),
        Ok(_) => panic!("Expected Dial error, got a session"),
    }
}

#[test]
fn test_connect_rejects_invalid_config() {
    let result = Session::connect("127.0.0.1", 0, PASSWORD);
    assert!(matches!(result, Err(RconError::Config(_))));

    let result = Session::connect("", 25575, PASSWORD);
    assert!(matches!(result, Err(RconError::Config(_))));
}

#[test]
fn test_connect_uses_given_ids() {
    let server = MockServer::start(echo_handler());

    let ids = Box::new(SequentialIds::starting_at(100));
    let mut session = Session::connect_with_ids(server.config(PASSWORD), ids).unwrap();
    session.send_command("list").unwrap();

    assert_eq!(*server.seen_ids.lock().unwrap(), vec![100, 101]);
}

// =============================================================================
// Command Tests
// =============================================================================

#[test]
fn test_response_padding_stripped() {
    let server = MockServer::start(echo_handler());
    let mut session = Session::connect_with(server.config(PASSWORD)).unwrap();

    assert_eq!(session.send_command("padded").unwrap(), "hello");
}

#[test]
fn test_response_whitespace_trimmed() {
    let server = MockServer::start(echo_handler());
    let mut session = Session::connect_with(server.config(PASSWORD)).unwrap();

    assert_eq!(session.send_command("spaced").unwrap(), "hello world");
}

#[test]
fn test_empty_response_is_ok() {
    let server = MockServer::start(echo_handler());
    let mut session = Session::connect_with(server.config(PASSWORD)).unwrap();

    assert_eq!(session.send_command("silent").unwrap(), "");
}

#[test]
fn test_multiple_commands_on_one_connection() {
    let server = MockServer::start(echo_handler());
    let mut session = Session::connect_with(server.config(PASSWORD)).unwrap();

    assert_eq!(session.send_command("padded").unwrap(), "hello");
    assert_eq!(session.send_command("foo").unwrap(), "Unknown command: foo");
    assert_eq!(session.send_command("silent").unwrap(), "");
    assert_eq!(server.connection_count(), 1);
}

#[test]
fn test_command_bad_auth_sentinel() {
    let server = MockServer::start(echo_handler());
    let mut session = Session::connect_with(server.config(PASSWORD)).unwrap();

    let result = session.send_command("revoked");
    assert!(matches!(result, Err(RconError::AuthFailed)));
}

#[test]
fn test_oversized_command_not_sent() {
    let server = MockServer::start(echo_handler());
    let mut session = Session::connect_with(server.config(PASSWORD)).unwrap();

    let command = "say ".to_string() + &"x".repeat(2000);
    let result = session.send_command(&command);
    assert!(matches!(result, Err(RconError::PayloadTooLarge { .. })));

    // Nothing reached the wire, so the connection is still in sync
    assert_eq!(session.send_command("padded").unwrap(), "hello");
}

#[test]
fn test_read_timeout() {
    let server = MockServer::start(echo_handler());
    let config = ClientConfig::builder()
        .host("127.0.0.1")
        .port(server.port())
        .password(PASSWORD)
        .read_timeout(Some(Duration::from_millis(100)))
        .build();
    let mut session = Session::connect_with(config).unwrap();

    let err = session.send_command("hang").unwrap_err();
    assert!(err.is_connection_lost());
    assert!(!session.is_connected());
}

#[test]
fn test_no_stale_reply_after_timeout() {
    let server = MockServer::start(echo_handler());
    let config = ClientConfig::builder()
        .host("127.0.0.1")
        .port(server.port())
        .password(PASSWORD)
        .read_timeout(Some(Duration::from_millis(100)))
        .build();
    let mut session = Session::connect_with(config).unwrap();

    assert!(session.send_command("hang").is_err());

    // Let the late reply to "hang" arrive on the old socket
    thread::sleep(Duration::from_millis(2500));

    let err = session.send_command("list").unwrap_err();
    assert!(err.is_connection_lost(), "unexpected error: {:?}", err);
    assert!(matches!(session.authenticate(PASSWORD), Err(e) if e.is_connection_lost()));

    session.reconnect().unwrap();
    assert!(session.is_connected());
    assert_eq!(
        session.send_command("list").unwrap(),
        "There are 0 of a max of 20 players online:"
    );
}

// =============================================================================
// Reauthentication Tests
// =============================================================================

#[test]
fn test_authenticate_wrong_password_keeps_stored() {
    let server = MockServer::start(echo_handler());
    let mut session = Session::connect_with(server.config(PASSWORD)).unwrap();

    let result = session.authenticate("wrong");
    assert!(matches!(result, Err(RconError::AuthFailed)));
    assert_eq!(session.config().password, PASSWORD);
}

#[test]
fn test_authenticate_again() {
    let server = MockServer::start(echo_handler());
    let mut session = Session::connect_with(server.config(PASSWORD)).unwrap();

    session.authenticate(PASSWORD).unwrap();
    assert_eq!(session.send_command("padded").unwrap(), "hello");
}

// =============================================================================
// Reconnect Tests
// =============================================================================

#[test]
fn test_reconnect_after_drop() {
    let script = Script {
        drop_after_auth: vec![0],
        ..Script::default()
    };
    let server = MockServer::start_scripted(echo_handler(), script);
    let mut session = Session::connect_with(server.config(PASSWORD)).unwrap();

    let err = session.send_command("list").unwrap_err();
    assert!(err.is_connection_lost(), "unexpected error: {:?}", err);

    session.reconnect().unwrap();
    assert_eq!(session.send_command("padded").unwrap(), "hello");
    assert_eq!(server.connection_count(), 2);
}

#[test]
fn test_failed_reconnect_can_be_retried() {
    let script = Script {
        drop_after_auth: vec![0],
        reject_auth: vec![1],
    };
    let server = MockServer::start_scripted(echo_handler(), script);
    let mut session = Session::connect_with(server.config(PASSWORD)).unwrap();

    assert!(session.send_command("list").is_err());

    let result = session.reconnect();
    assert!(matches!(result, Err(RconError::AuthFailed)));
    assert_eq!(session.peer_addr(), server.addr);

    session.reconnect().unwrap();
    assert_eq!(session.send_command("padded").unwrap(), "hello");
    assert_eq!(server.connection_count(), 3);
}
