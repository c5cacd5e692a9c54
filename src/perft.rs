//! Perft: exhaustive move-path enumeration against known node counts.
//!
//! The driver walks every legal move sequence to a fixed depth and counts
//! the leaves. The counts for the canonical positions are long settled
//! (https://www.chessprogramming.org/Perft_Results), so a single wrong bit
//! anywhere in generation, legality or make/unmake shows up as a count
//! mismatch. Each run also checks integrity: the FEN emitted after the
//! whole recursion must equal the FEN emitted before it.

use std::time::{Duration, Instant};

use once_cell::sync::Lazy;

use crate::board::{Board, STARTING_POSITION_FEN};
use crate::movelist::MoveList;

/// Counts the leaf positions of the legal move tree at `depth` plies.
pub fn perft(board: &mut Board, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut moves = MoveList::new();
    board.generate_pseudo_legal(&mut moves);

    let mut nodes = 0;
    for m in moves.iter() {
        if board.make_move(&m) {
            nodes += perft(board, depth - 1);
            board.unmake_move();
        }
    }
    nodes
}

/// One row of the reference table.
#[derive(Debug, Clone, Copy)]
pub struct PerftTest {
    pub name: &'static str,
    pub fen: &'static str,
    pub depth: u32,
    pub expected_nodes: u64,
}

const KIWIPETE_FEN: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq -";
const POSITION_3_FEN: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - -";
const POSITION_4_FEN: &str = "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1";
const POSITION_4_MIRRORED_FEN: &str =
    "r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 0 1";
const POSITION_5_FEN: &str = "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8";
const POSITION_6_FEN: &str =
    "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10";

/// The built-in battery: the standard perft positions at every depth with
/// a settled reference count, plus a depth-1 smoke test.
pub static PERFT_TESTS: Lazy<Vec<PerftTest>> = Lazy::new(|| {
    let mut tests = Vec::new();

    add_position(
        &mut tests,
        "Smoke Test",
        "rnbq1k1r/pp1P1ppp/2p5/8/1bB5/7P/PPP1NnP1/RNBQK2R w KQ - 1 2",
        &[8],
    );
    add_position(
        &mut tests,
        "Initial Position",
        STARTING_POSITION_FEN,
        &[20, 400, 8_902, 197_281, 4_865_609, 119_060_324],
    );
    add_position(
        &mut tests,
        "Position 2 [Kiwipete]",
        KIWIPETE_FEN,
        &[48, 2_039, 97_862, 4_085_603, 193_690_690],
    );
    add_position(
        &mut tests,
        "Position 3",
        POSITION_3_FEN,
        &[14, 191, 2_812, 43_238, 674_624, 11_030_083, 178_633_661],
    );
    add_position(
        &mut tests,
        "Position 4",
        POSITION_4_FEN,
        &[6, 264, 9_467, 422_333, 15_833_292, 706_045_033],
    );
    add_position(
        &mut tests,
        "Position 4 [Mirrored]",
        POSITION_4_MIRRORED_FEN,
        &[6, 264, 9_467, 422_333, 15_833_292, 706_045_033],
    );
    add_position(
        &mut tests,
        "Position 5",
        POSITION_5_FEN,
        &[44, 1_486, 62_379, 2_103_487, 89_941_194],
    );
    add_position(
        &mut tests,
        "Position 6",
        POSITION_6_FEN,
        &[46, 2_079, 89_890, 3_894_594, 164_075_551],
    );

    tests
});

/// Adds one row per depth; `expected[i]` is the count at depth `i + 1`.
fn add_position(
    tests: &mut Vec<PerftTest>,
    name: &'static str,
    fen: &'static str,
    expected: &[u64],
) {
    for (i, &expected_nodes) in expected.iter().enumerate() {
        tests.push(PerftTest {
            name,
            fen,
            depth: i as u32 + 1,
            expected_nodes,
        });
    }
}

/// Outcome of one table row.
#[derive(Debug, Clone)]
pub struct PerftResult {
    pub name: &'static str,
    pub fen: &'static str,
    pub depth: u32,
    pub expected_nodes: u64,
    pub actual_nodes: u64,
    /// False when the FEN refused to parse.
    pub setup_passed: bool,
    /// FEN emitted after the recursion equals the FEN emitted before it.
    pub integrity_passed: bool,
    pub elapsed: Duration,
}

impl PerftResult {
    pub fn passed(&self) -> bool {
        self.setup_passed && self.integrity_passed && self.actual_nodes == self.expected_nodes
    }

    /// Wall time as "1.234 second(s)".
    pub fn time_taken(&self) -> String {
        format!("{:.3} second(s)", self.elapsed.as_secs_f64())
    }

    /// Throughput as "12,345,678 NPS", or "N/A" when the run was too short
    /// to measure meaningfully.
    pub fn nodes_per_second(&self) -> String {
        let seconds = self.elapsed.as_secs_f64();
        if seconds < 0.1 {
            return "N/A".to_string();
        }
        let nps = (self.actual_nodes as f64 / seconds) as u64;
        format!("{} NPS", group_thousands(nps))
    }

    /// Mean time for one node, in ns, us or ms as appropriate. "N/A" when
    /// nothing was counted.
    pub fn time_per_node(&self) -> String {
        if self.actual_nodes == 0 {
            return "N/A".to_string();
        }
        let node_seconds = self.elapsed.as_secs_f64() / self.actual_nodes as f64;

        let nanos = node_seconds * 1e9;
        if nanos < 1_000.0 {
            return format!("{} ns", nanos as u64);
        }
        let micros = node_seconds * 1e6;
        if micros < 1_000.0 {
            return format!("{} us", micros as u64);
        }
        format!("{} ms", (node_seconds * 1e3) as u64)
    }
}

/// Runs the table. `max_depth` of 0 runs every row; a positive value skips
/// rows deeper than it. With `stop_on_first_failure`, the run ends at the
/// first failing row.
pub fn run_all_tests(max_depth: u32, stop_on_first_failure: bool) -> Vec<PerftResult> {
    let mut results = Vec::new();

    for test in PERFT_TESTS.iter() {
        if max_depth > 0 && test.depth > max_depth {
            continue;
        }
        let result = run_test(test);
        let failed = !result.passed();
        results.push(result);
        if stop_on_first_failure && failed {
            break;
        }
    }

    results
}

/// Runs one table row: set up from FEN, count, and verify the position came
/// back bit-exact (via its FEN image).
pub fn run_test(test: &PerftTest) -> PerftResult {
    let mut board = Board::new();
    if board.set_from_fen(test.fen).is_err() {
        return PerftResult {
            name: test.name,
            fen: test.fen,
            depth: test.depth,
            expected_nodes: test.expected_nodes,
            actual_nodes: 0,
            setup_passed: false,
            integrity_passed: false,
            elapsed: Duration::ZERO,
        };
    }

    let initial_position = board.to_fen();

    let start = Instant::now();
    let actual_nodes = perft(&mut board, test.depth);
    let elapsed = start.elapsed();

    let final_position = board.to_fen();

    PerftResult {
        name: test.name,
        fen: test.fen,
        depth: test.depth,
        expected_nodes: test.expected_nodes,
        actual_nodes,
        setup_passed: true,
        integrity_passed: initial_position == final_position,
        elapsed,
    }
}

/// 1234567 -> "1,234,567".
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn perft_from_fen(fen: &str, depth: u32) -> u64 {
        let mut board = Board::from_fen(fen).unwrap();
        perft(&mut board, depth)
    }

    #[test]
    fn test_perft_depth_zero_is_one_leaf() {
        let mut board = Board::new();
        assert_eq!(perft(&mut board, 0), 1);
    }

    #[test]
    fn test_perft_initial_position() {
        for (depth, expected) in [(1, 20), (2, 400), (3, 8_902), (4, 197_281)] {
            assert_eq!(perft_from_fen(STARTING_POSITION_FEN, depth), expected);
        }
    }

    #[test]
    fn test_perft_smoke_position() {
        assert_eq!(
            perft_from_fen(
                "rnbq1k1r/pp1P1ppp/2p5/8/1bB5/7P/PPP1NnP1/RNBQK2R w KQ - 1 2",
                1
            ),
            8
        );
    }

    #[test]
    fn test_perft_kiwipete() {
        for (depth, expected) in [(1, 48), (2, 2_039), (3, 97_862)] {
            assert_eq!(perft_from_fen(KIWIPETE_FEN, depth), expected);
        }
    }

    #[test]
    fn test_perft_position_3() {
        for (depth, expected) in [(1, 14), (2, 191), (3, 2_812), (4, 43_238), (5, 674_624)] {
            assert_eq!(perft_from_fen(POSITION_3_FEN, depth), expected);
        }
    }

    #[test]
    fn test_perft_position_4_both_orientations() {
        for (depth, expected) in [(1, 6), (2, 264), (3, 9_467)] {
            assert_eq!(perft_from_fen(POSITION_4_FEN, depth), expected);
            assert_eq!(perft_from_fen(POSITION_4_MIRRORED_FEN, depth), expected);
        }
    }

    #[test]
    fn test_perft_position_5() {
        for (depth, expected) in [(1, 44), (2, 1_486), (3, 62_379)] {
            assert_eq!(perft_from_fen(POSITION_5_FEN, depth), expected);
        }
    }

    #[test]
    fn test_perft_position_6() {
        for (depth, expected) in [(1, 46), (2, 2_079), (3, 89_890)] {
            assert_eq!(perft_from_fen(POSITION_6_FEN, depth), expected);
        }
    }

    #[test]
    fn test_run_all_tests_shallow() {
        let results = run_all_tests(3, false);
        assert!(!results.is_empty());
        for result in &results {
            assert!(result.setup_passed, "{} failed setup", result.name);
            assert!(result.integrity_passed, "{} failed integrity", result.name);
            assert!(
                result.passed(),
                "{} depth {}: expected {}, got {}",
                result.name,
                result.depth,
                result.expected_nodes,
                result.actual_nodes
            );
        }
    }

    #[test]
    fn test_max_depth_filters_rows() {
        let shallow = run_all_tests(1, false);
        assert!(shallow.iter().all(|r| r.depth == 1));
        assert_eq!(
            shallow.len(),
            PERFT_TESTS.iter().filter(|t| t.depth == 1).count()
        );
        assert!(shallow.len() < PERFT_TESTS.len());
    }

    #[test]
    fn test_failed_setup_is_reported() {
        // A row that cannot pass: its FEN has no kings.
        let bad = PerftTest {
            name: "Broken",
            fen: "8/8/8/8/8/8/8/8 w - - 0 1",
            depth: 1,
            expected_nodes: 1,
        };
        let result = run_test(&bad);
        assert!(!result.setup_passed);
        assert!(!result.passed());
        assert_eq!(result.actual_nodes, 0);
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_000), "1,000");
        assert_eq!(group_thousands(119_060_324), "119,060,324");
    }

    /// The full battery at the reference depths. Slow; run explicitly with
    /// `cargo test --release -- --ignored`.
    #[test]
    #[ignore]
    fn test_full_battery() {
        for test in PERFT_TESTS.iter() {
            let result = run_test(test);
            assert!(
                result.passed(),
                "{} depth {}: expected {}, got {} (setup {}, integrity {})",
                result.name,
                result.depth,
                result.expected_nodes,
                result.actual_nodes,
                result.setup_passed,
                result.integrity_passed
            );
        }
    }
}
