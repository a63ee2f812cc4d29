use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use layerchess::{EngineBridge, EngineConfig, EngineError, EngineState};
use tokio::io::{duplex, AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream, Lines};

/// Lines the fake engine received, in order.
type Seen = Arc<Mutex<Vec<String>>>;

fn test_config() -> EngineConfig {
    EngineConfig::new("fake").with_search_timeout(Some(Duration::from_secs(5)))
}

/// Session over in-memory pipes. Returns the engine's view: its stdin as
/// lines and its stdout.
fn raw_session(config: &EngineConfig) -> (EngineBridge, Lines<BufReader<DuplexStream>>, DuplexStream) {
    let (bridge_in, engine_in) = duplex(4096);
    let (engine_out, bridge_out) = duplex(4096);
    let bridge = EngineBridge::with_io(bridge_in, bridge_out, config);
    (bridge, BufReader::new(engine_in).lines(), engine_out)
}

/// Session with a fake engine that records every command and, on each
/// `go`, replies with the next scripted output (nothing once exhausted).
/// A `stop` is answered with `on_stop` when given.
fn scripted_session(
    config: &EngineConfig,
    replies: Vec<&'static str>,
    on_stop: Option<&'static str>,
) -> (EngineBridge, Seen) {
    let (bridge, mut commands, mut stdout) = raw_session(config);
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));
    let log = seen.clone();
    let mut replies: VecDeque<&'static str> = replies.into();
    tokio::spawn(async move {
        while let Ok(Some(line)) = commands.next_line().await {
            log.lock().unwrap().push(line.clone());
            let answer = if line.starts_with("go") {
                replies.pop_front()
            } else if line == "stop" {
                on_stop
            } else if line == "quit" {
                break;
            } else {
                None
            };
            if let Some(answer) = answer {
                if stdout.write_all(format!("{}\n", answer).as_bytes()).await.is_err() {
                    break;
                }
            }
        }
    });
    (bridge, seen)
}

async fn wait_for_state(bridge: &EngineBridge, want: EngineState) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while bridge.state() != want {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("engine state never reached");
}

#[tokio::test]
async fn test_handshake_then_search() {
    let (bridge, mut commands, mut stdout) = raw_session(&test_config());
    assert_eq!(bridge.ready().await, EngineState::Ready);

    let expected = [
        "setoption name Threads value 1",
        "setoption name VerboseMoveStats value false",
        "setoption name Ponder value false",
        "setoption name UCI_ShowWDL value false",
    ];
    for want in expected {
        assert_eq!(commands.next_line().await.unwrap().unwrap(), want);
    }

    let search = bridge.search();
    assert_eq!(commands.next_line().await.unwrap().unwrap(), "position startpos");
    assert_eq!(commands.next_line().await.unwrap().unwrap(), "go nodes 1000");
    assert_eq!(bridge.state(), EngineState::AwaitingBestMove);

    stdout
        .write_all(b"info depth 1 nodes 12\nbestmove a7ua6u ponder a2la3l\n")
        .await
        .unwrap();
    let best = search.await.unwrap();
    assert_eq!(best.mv, "a7ua6u");
    assert_eq!(best.ponder.as_deref(), Some("a2la3l"));
    assert_eq!(bridge.state(), EngineState::Ready);
}

#[tokio::test]
async fn test_bestmove_split_across_reads() {
    let (bridge, mut commands, mut stdout) = raw_session(&test_config());
    bridge.ready().await;
    let search = bridge.search();
    for _ in 0..6 {
        commands.next_line().await.unwrap().unwrap();
    }
    for part in [&b"best"[..], b"move a7", b"ua6u\r", b"\n"] {
        stdout.write_all(part).await.unwrap();
        stdout.flush().await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    let best = search.await.unwrap();
    assert_eq!(best.mv, "a7ua6u");
    assert!(best.is_final());
}

#[tokio::test]
async fn test_searches_resolve_in_call_order() {
    let (mut bridge, seen) =
        scripted_session(&test_config(), vec!["bestmove a7ua6u", "bestmove b7ub6u"], None);
    bridge.record_move("a2la3l");
    let first = bridge.search();
    bridge.record_move("b2lb3l");
    let second = bridge.search();

    let (first, second) = tokio::join!(first, second);
    assert_eq!(first.unwrap().mv, "a7ua6u");
    assert_eq!(second.unwrap().mv, "b7ub6u");

    let positions: Vec<String> = seen
        .lock()
        .unwrap()
        .iter()
        .filter(|l| l.starts_with("position"))
        .cloned()
        .collect();
    assert_eq!(
        positions,
        vec![
            "position startpos moves a2la3l".to_string(),
            "position startpos moves a2la3l b2lb3l".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_second_search_waits_for_first_answer() {
    let (mut bridge, mut commands, mut stdout) = raw_session(&test_config());
    bridge.record_move("a2la3l");
    let first = bridge.search();
    bridge.record_move("b2lb3l");
    let second = bridge.search();

    for _ in 0..4 {
        commands.next_line().await.unwrap().unwrap();
    }
    assert_eq!(
        commands.next_line().await.unwrap().unwrap(),
        "position startpos moves a2la3l"
    );
    assert_eq!(commands.next_line().await.unwrap().unwrap(), "go nodes 1000");

    // The engine is still thinking: nothing else may reach its stdin.
    let early = tokio::time::timeout(Duration::from_millis(200), commands.next_line()).await;
    assert!(early.is_err(), "second search sent before the first answer");

    stdout.write_all(b"bestmove a7ua6u\n").await.unwrap();
    assert_eq!(
        commands.next_line().await.unwrap().unwrap(),
        "position startpos moves a2la3l b2lb3l"
    );
    assert_eq!(commands.next_line().await.unwrap().unwrap(), "go nodes 1000");
    stdout.write_all(b"bestmove b7ub6u\n").await.unwrap();

    assert_eq!(first.await.unwrap().mv, "a7ua6u");
    assert_eq!(second.await.unwrap().mv, "b7ub6u");
}

#[tokio::test]
async fn test_stray_bestmove_is_discarded() {
    let (bridge, mut commands, mut stdout) = raw_session(&test_config());
    bridge.ready().await;
    stdout.write_all(b"bestmove h7uh6u\n").await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    let search = bridge.search();
    for _ in 0..6 {
        commands.next_line().await.unwrap().unwrap();
    }
    stdout.write_all(b"bestmove a7ua6u\n").await.unwrap();
    assert_eq!(search.await.unwrap().mv, "a7ua6u");
}

#[tokio::test]
async fn test_engine_exit_terminates_session() {
    let (bridge, _commands, stdout) = raw_session(&test_config());
    bridge.ready().await;
    drop(stdout);

    let err = bridge.search().await.unwrap_err();
    assert!(matches!(err, EngineError::Terminated { .. }));
    assert!(err.is_unavailable());
    wait_for_state(&bridge, EngineState::Terminated).await;

    let again = bridge.search().await.unwrap_err();
    assert!(matches!(again, EngineError::Terminated { .. }));
}

#[tokio::test]
async fn test_timeout_recovers_when_engine_honours_stop() {
    let config = test_config()
        .with_search_timeout(Some(Duration::from_millis(100)))
        .with_stop_grace(Duration::from_secs(2));
    let (bridge, seen) = scripted_session(
        &config,
        vec!["info depth 1", "bestmove a7ua6u"],
        Some("bestmove b7ub6u"),
    );

    let err = bridge.search().await.unwrap_err();
    assert!(matches!(err, EngineError::Timeout { .. }));
    assert!(err.is_unavailable());
    assert_eq!(bridge.state(), EngineState::Ready);
    assert!(seen.lock().unwrap().iter().any(|l| l == "stop"));

    // The answer to the stop must not leak into the next search.
    assert_eq!(bridge.search().await.unwrap().mv, "a7ua6u");
}

#[tokio::test]
async fn test_timeout_without_answer_to_stop_is_fatal() {
    let config = test_config()
        .with_search_timeout(Some(Duration::from_millis(50)))
        .with_stop_grace(Duration::from_millis(50));
    let (bridge, _seen) = scripted_session(&config, vec![], None);

    let err = bridge.search().await.unwrap_err();
    assert!(matches!(err, EngineError::Timeout { .. }));
    wait_for_state(&bridge, EngineState::Terminated).await;
}

#[tokio::test]
async fn test_malformed_bestmove_keeps_session() {
    let (bridge, _seen) =
        scripted_session(&test_config(), vec!["bestmove", "bestmove a7ua6u"], None);

    let err = bridge.search().await.unwrap_err();
    assert!(matches!(err, EngineError::MalformedResponse { .. }));
    assert!(!err.is_unavailable());
    assert_eq!(bridge.state(), EngineState::Ready);
    assert_eq!(bridge.search().await.unwrap().mv, "a7ua6u");
}

#[tokio::test]
async fn test_new_game_clears_history() {
    let (mut bridge, seen) = scripted_session(&test_config(), vec!["bestmove a7ua6u"], None);
    bridge.record_move("a2la3l");
    bridge.new_game().await.unwrap();
    assert!(bridge.history().is_empty());

    bridge.search().await.unwrap();
    let seen = seen.lock().unwrap().clone();
    let newgame = seen.iter().position(|l| l == "ucinewgame").unwrap();
    let position = seen.iter().position(|l| l == "position startpos").unwrap();
    assert!(newgame < position);
}

#[tokio::test]
async fn test_shutdown_sends_quit() {
    let (bridge, seen) = scripted_session(&test_config(), vec![], None);
    bridge.ready().await;
    bridge.shutdown().await;
    tokio::time::timeout(Duration::from_secs(2), async {
        while seen.lock().unwrap().last().map(String::as_str) != Some("quit") {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("engine never saw quit");
}

#[tokio::test]
async fn test_missing_program_is_spawn_error() {
    let config = EngineConfig::new("/nonexistent/layerchess-engine");
    match EngineBridge::spawn(&config) {
        Err(e @ EngineError::Spawn { .. }) => assert!(e.is_unavailable()),
        Err(e) => panic!("unexpected error {}", e),
        Ok(_) => panic!("spawned a missing program"),
    }
}

#[cfg(unix)]
#[tokio::test]
async fn test_real_process_round_trip() {
    let script = r#"while read line; do
        case "$line" in
            go*) echo "info depth 1"; echo "bestmove a7ua6u ponder a2la3l" ;;
            quit) exit 0 ;;
        esac
    done"#;
    let config = EngineConfig::new("sh").with_args(["-c", script]);
    let mut bridge = EngineBridge::spawn(&config).unwrap();
    assert_eq!(bridge.ready().await, EngineState::Ready);

    bridge.record_move("a2la3l");
    let best = bridge.search().await.unwrap();
    assert_eq!(best.mv, "a7ua6u");
    assert_eq!(best.ponder.as_deref(), Some("a2la3l"));
    bridge.shutdown().await;
}
