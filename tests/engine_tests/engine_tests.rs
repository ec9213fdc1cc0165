//! Tests for the Execution Engine
//!
//! These tests verify:
//! - The exact WAL of a worked scenario
//! - Before-images in WRITE records
//! - One snapshot per START/WRITE/COMMIT, none for OUTPUT
//! - Fatal errors keep the WAL emitted so far
//! - Streaming the WAL to a file

use std::fs;

use redolog::config::{Config, WalSyncStrategy};
use redolog::engine::Engine;
use redolog::program::parse_program;
use redolog::wal::WalEntry;
use redolog::{Program, RedoError};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

const WORKED_PROGRAM: &str = "A 10 B 20

T1 3
READ(A,R1)
R1 := R1 + 5
WRITE(A,R1)
";

/// T1 doubles A and outputs it; T2 reads and outputs B
const TWO_TX_PROGRAM: &str = "A 8 B 8

T1 4
READ(A,t)
t := t * 2
WRITE(A,t)
OUTPUT(A)

T2 2
READ(B,s)
OUTPUT(B)
";

fn program(text: &str) -> Program {
    parse_program(text).unwrap()
}

fn run(text: &str, quantum: usize) -> Engine {
    let mut engine = Engine::new(quantum).unwrap();
    engine.run(&program(text)).unwrap();
    engine
}

fn markers(engine: &Engine) -> Vec<String> {
    engine.wal().entries().map(|e| e.to_string()).collect()
}

// =============================================================================
// Worked Scenario
// =============================================================================

#[test]
fn test_worked_scenario_wal() {
    let engine = run(WORKED_PROGRAM, 1);

    let expected = "<START T1>\n\nA 10 B 20\n\
                    <T1, A, 10>\nA 15\nA 10 B 20\n\
                    <COMMIT T1>\nA 15\nA 10 B 20\n";
    assert_eq!(engine.wal().render(), expected);
}

#[test]
fn test_worked_scenario_final_state() {
    let engine = run(WORKED_PROGRAM, 1);

    assert_eq!(engine.context().register("R1"), Some(15));
    assert_eq!(engine.context().memory().get("A"), Some(&15));
    // Never output: disk is untouched
    assert_eq!(engine.context().disk().get("A"), Some(&10));
}

// =============================================================================
// Scheduling
// =============================================================================

#[test]
fn test_interleaved_marker_order() {
    let engine = run(TWO_TX_PROGRAM, 2);
    assert_eq!(
        markers(&engine),
        vec![
            "<START T1>",
            "<START T2>",
            "<COMMIT T2>",
            "<T1, A, 8>",
            "<COMMIT T1>",
        ]
    );
}

#[test]
fn test_large_quantum_runs_serially() {
    let engine = run(TWO_TX_PROGRAM, 4);
    assert_eq!(
        markers(&engine),
        vec![
            "<START T1>",
            "<T1, A, 8>",
            "<COMMIT T1>",
            "<START T2>",
            "<COMMIT T2>",
        ]
    );
}

#[test]
fn test_commands_executed_equals_declared_sizes() {
    for quantum in 1..=5 {
        let mut engine = Engine::new(quantum).unwrap();
        let p = program(TWO_TX_PROGRAM);
        let report = engine.run(&p).unwrap();

        assert_eq!(report.commands_executed, p.total_commands() as u64);
        assert_eq!(report.transactions, 2);
        assert_eq!(report.wal_records, engine.wal().len());
    }
}

#[test]
fn test_output_moves_memory_to_disk() {
    let engine = run(TWO_TX_PROGRAM, 1);
    let disk = engine.context().disk();
    assert_eq!(disk.get("A"), Some(&16));
    assert_eq!(disk.get("B"), Some(&8));
}

#[test]
fn test_zero_size_transaction_emits_nothing() {
    let text = "A 1\n\nT0 0\n\nT1 1\nOUTPUT(A)\n";
    let engine = run(text, 1);

    assert!(engine.wal().entries().all(|e| e.tx() != "T0"));
    assert_eq!(markers(&engine), vec!["<START T1>", "<COMMIT T1>"]);
}

#[test]
fn test_empty_program_emits_nothing() {
    let engine = run("A 1\n", 3);
    assert!(engine.wal().is_empty());
    assert_eq!(engine.wal().render(), "");
}

#[test]
fn test_run_resets_previous_state() {
    let mut engine = Engine::new(1).unwrap();
    engine.run(&program(TWO_TX_PROGRAM)).unwrap();
    engine.run(&program(WORKED_PROGRAM)).unwrap();

    assert_eq!(engine.wal().len(), 3);
    assert_eq!(engine.context().register("t"), None);
}

// =============================================================================
// WAL Properties
// =============================================================================

#[test]
fn test_write_records_before_image() {
    let text = "A 1

T1 6
READ(A,x)
x := x + 10
WRITE(A,x)
x := x * 3
WRITE(A,x)
WRITE(A,x)
";
    let engine = run(text, 2);
    let records = engine.wal().records();

    let mut previous_memory = None;
    let mut befores = Vec::new();
    for record in records {
        if let WalEntry::Write { address, before, .. } = &record.entry {
            assert!(record.snapshot.memory.contains_key(address));
            if let Some(prev) = previous_memory {
                assert_eq!(*before, prev);
            }
            befores.push(*before);
        }
        previous_memory = record.snapshot.memory.get("A").copied();
    }

    // 1 -> 11 -> 33 -> 33
    assert_eq!(befores, vec![1, 11, 33]);
}

#[test]
fn test_write_faults_in_unread_address() {
    let text = "A 1 B 5

T1 3
READ(A,x)
WRITE(B,x)
OUTPUT(B)
";
    let engine = run(text, 3);

    assert!(markers(&engine).contains(&"<T1, B, 5>".to_string()));
    assert_eq!(engine.context().disk().get("B"), Some(&1));
}

#[test]
fn test_one_snapshot_per_logged_event() {
    let engine = run(TWO_TX_PROGRAM, 1);

    // 2 START + 1 WRITE + 2 COMMIT; the two OUTPUTs log nothing
    assert_eq!(engine.wal().len(), 5);
    assert_eq!(engine.wal().render().lines().count(), 15);
}

#[test]
fn test_snapshot_keys_strictly_ascending() {
    let text = "c 3 a 1 B 2

T1 3
READ(c,r)
READ(a,r)
READ(B,r)
";
    let engine = run(text, 1);

    for record in engine.wal().records() {
        for line in record.snapshot.lines() {
            let keys: Vec<&str> = line.split_whitespace().step_by(2).collect();
            assert!(keys.windows(2).all(|w| w[0] < w[1]), "{}", line);
        }
    }

    let last = engine.wal().records().last().unwrap();
    assert_eq!(last.snapshot.lines()[0], "B 2 a 1 c 3");
}

#[test]
fn test_integer_division_truncates() {
    let text = "A 7

T1 3
READ(A,x)
x := x / 2
WRITE(A,x)
";
    let engine = run(text, 1);
    assert_eq!(engine.context().register("x"), Some(3));
}

// =============================================================================
// Fatal Errors
// =============================================================================

const DIVIDE_BY_ZERO: &str = "A 5

T1 4
READ(A,x)
WRITE(A,x)
x := x / 0
OUTPUT(A)

T2 1
OUTPUT(A)
";

#[test]
fn test_division_by_zero_is_fatal() {
    let mut engine = Engine::new(3).unwrap();
    let err = engine.run(&program(DIVIDE_BY_ZERO)).unwrap_err();

    assert!(matches!(err, RedoError::DivisionByZero { ref tx, .. } if tx == "T1"));
    assert!(err.is_crash());
}

#[test]
fn test_division_by_zero_keeps_partial_wal() {
    let mut engine = Engine::new(3).unwrap();
    let _ = engine.run(&program(DIVIDE_BY_ZERO));

    assert_eq!(markers(&engine), vec!["<START T1>", "<T1, A, 5>"]);
    assert_eq!(engine.commands_executed(), 2);
}

#[test]
fn test_unknown_register_is_fatal() {
    let text = "A 5\n\nT1 1\nWRITE(A,nope)\n";
    let mut engine = Engine::new(1).unwrap();
    let err = engine.run(&program(text)).unwrap_err();

    assert!(matches!(err, RedoError::UnknownRegister { ref register, .. } if register == "nope"));
    assert_eq!(markers(&engine), vec!["<START T1>"]);
}

#[test]
fn test_failed_write_leaves_memory_untouched() {
    let text = "A 5

T1 1
WRITE(A,nope)
";
    let mut engine = Engine::new(1).unwrap();
    assert!(engine.run(&program(text)).is_err());

    assert!(engine.context().memory().is_empty());
    assert_eq!(engine.context().disk().get("A"), Some(&5));
}

#[test]
fn test_unknown_address_is_fatal() {
    let text = "A 5\n\nT1 1\nREAD(Z,x)\n";
    let mut engine = Engine::new(1).unwrap();
    let err = engine.run(&program(text)).unwrap_err();

    assert!(matches!(err, RedoError::UnknownAddress { ref address, .. } if address == "Z"));
}

#[test]
fn test_overflow_is_fatal() {
    let text = format!("A {}\n\nT1 2\nREAD(A,x)\nx := x + 1\n", i64::MAX);
    let mut engine = Engine::new(1).unwrap();
    let err = engine.run(&program(&text)).unwrap_err();

    assert!(matches!(err, RedoError::ArithmeticOverflow { .. }));
}

#[test]
fn test_zero_quantum_rejected() {
    assert!(matches!(Engine::new(0), Err(RedoError::Config(_))));
}

// =============================================================================
// WAL File Streaming
// =============================================================================

fn file_config(temp: &TempDir, quantum: usize, strategy: WalSyncStrategy) -> Config {
    Config::builder()
        .quantum(quantum)
        .wal_path(temp.path().join("execution.log"))
        .wal_sync_strategy(strategy)
        .build()
        .unwrap()
}

#[test]
fn test_engine_streams_wal_to_file() {
    let temp = TempDir::new().unwrap();
    let config = file_config(&temp, 1, WalSyncStrategy::EveryWrite);

    let mut engine = Engine::open(&config).unwrap();
    engine.run(&program(TWO_TX_PROGRAM)).unwrap();

    let on_disk = fs::read_to_string(&config.wal_path).unwrap();
    assert_eq!(on_disk, engine.wal().render());
    assert!(on_disk.ends_with('\n'));
}

#[test]
fn test_second_run_truncates_wal_file() {
    let temp = TempDir::new().unwrap();
    let config = file_config(&temp, 1, WalSyncStrategy::EveryWrite);

    let mut engine = Engine::open(&config).unwrap();
    engine.run(&program(TWO_TX_PROGRAM)).unwrap();
    engine.run(&program(WORKED_PROGRAM)).unwrap();

    let on_disk = fs::read_to_string(&config.wal_path).unwrap();
    assert_eq!(on_disk, engine.wal().render());
    assert_eq!(on_disk.lines().count(), engine.wal().len() * 3);
    assert!(on_disk.starts_with("<START T1>\n\nA 10 B 20\n"));
}

#[test]
fn test_crashed_run_leaves_partial_wal_file() {
    let temp = TempDir::new().unwrap();
    let config = file_config(&temp, 3, WalSyncStrategy::EveryNEntries { count: 100 });

    let mut engine = Engine::open(&config).unwrap();
    let err = engine.run(&program(DIVIDE_BY_ZERO)).unwrap_err();
    assert!(matches!(err, RedoError::DivisionByZero { .. }));

    let on_disk = fs::read_to_string(&config.wal_path).unwrap();
    assert_eq!(on_disk, "<START T1>\n\nA 5\n<T1, A, 5>\nA 5\nA 5\n");
}
