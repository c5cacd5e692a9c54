//! Pseudo-legal move generation.
//!
//! Pseudo-legal means the moves obey piece movement, blocking and capture
//! rules but may still leave the mover's own king attacked; `make_move`
//! rejects those after the fact. Castling is emitted whenever the right is
//! held and the path is clear, with the check tests likewise deferred.

use crate::board::{
    Board, BLACK_KING_HOME, BLACK_ROOK_KINGSIDE, BLACK_ROOK_QUEENSIDE, WHITE_KING_HOME,
    WHITE_ROOK_KINGSIDE, WHITE_ROOK_QUEENSIDE,
};
use crate::movelist::MoveList;
use crate::square::{
    is_valid, on_board, rank_of, Square, DIAGONAL_DIRS, DIR_DOWN, DIR_DOWN_LEFT, DIR_DOWN_RIGHT,
    DIR_UP, DIR_UP_LEFT, DIR_UP_RIGHT, ALL_DIRS, KNIGHT_JUMPS, LAST_SQUARE, STRAIGHT_DIRS,
};
use crate::types::{Color, Move, PieceType, PROMOTION_PIECES};

impl Board {
    /// Writes every pseudo-legal move for the side to move into `moves`.
    /// The buffer is cleared first; it never overflows for a position that
    /// satisfies the board invariants.
    pub fn generate_pseudo_legal(&self, moves: &mut MoveList) {
        moves.clear();

        for from in 0..=LAST_SQUARE {
            if !is_valid(from) {
                continue;
            }
            let Some(piece) = self.squares[from] else {
                continue;
            };
            if piece.color != self.side_to_move {
                continue;
            }

            match piece.piece_type {
                PieceType::Rook => self.add_slider_moves(from, &STRAIGHT_DIRS, moves),
                PieceType::Bishop => self.add_slider_moves(from, &DIAGONAL_DIRS, moves),
                PieceType::Queen => self.add_slider_moves(from, &ALL_DIRS, moves),
                PieceType::Knight => self.add_step_moves(from, &KNIGHT_JUMPS, moves),
                PieceType::King => {
                    self.add_step_moves(from, &ALL_DIRS, moves);
                    self.add_castling_moves(moves);
                }
                PieceType::Pawn => self.add_pawn_moves(from, moves),
            }
        }
    }

    /// Resolves a long-algebraic move string (`e2e4`, `e7e8q`, castling as
    /// the king's move) against the current position. Returns `None` when
    /// no pseudo-legal move matches.
    pub fn parse_move(&self, text: &str) -> Option<Move> {
        let mut moves = MoveList::new();
        self.generate_pseudo_legal(&mut moves);
        moves.iter().find(|m| m.to_text() == text)
    }

    /// Ray moves for rook, bishop and queen: empty squares extend the ray,
    /// an enemy piece is captured and ends it, an own piece ends it.
    fn add_slider_moves(&self, from: Square, dirs: &[i32], moves: &mut MoveList) {
        for &dir in dirs {
            let mut target = from as i32 + dir;
            while on_board(target) {
                let to = target as usize;
                match self.squares[to] {
                    None => {
                        moves.push(Move::new(from, to));
                        target += dir;
                    }
                    Some(piece) if piece.color != self.side_to_move => {
                        moves.push(Move::new(from, to));
                        break;
                    }
                    Some(_) => break,
                }
            }
        }
    }

    /// Single-step moves for knight and king.
    fn add_step_moves(&self, from: Square, dirs: &[i32], moves: &mut MoveList) {
        for &dir in dirs {
            let target = from as i32 + dir;
            if !on_board(target) {
                continue;
            }
            let to = target as usize;
            match self.squares[to] {
                None => moves.push(Move::new(from, to)),
                Some(piece) if piece.color != self.side_to_move => {
                    moves.push(Move::new(from, to))
                }
                Some(_) => {}
            }
        }
    }

    /// Castling needs the right to be held and the squares between king
    /// and rook to be empty. A held right guarantees king and rook are on
    /// their home squares.
    fn add_castling_moves(&self, moves: &mut MoveList) {
        match self.side_to_move {
            Color::White => {
                if self.castle_kingside_white
                    && self.squares[0x05].is_none() // f1
                    && self.squares[0x06].is_none() // g1
                {
                    moves.push(Move::castle(WHITE_KING_HOME, 0x06, WHITE_ROOK_KINGSIDE, 0x05));
                }
                if self.castle_queenside_white
                    && self.squares[0x03].is_none() // d1
                    && self.squares[0x02].is_none() // c1
                    && self.squares[0x01].is_none() // b1
                {
                    moves.push(Move::castle(
                        WHITE_KING_HOME,
                        0x02,
                        WHITE_ROOK_QUEENSIDE,
                        0x03,
                    ));
                }
            }
            Color::Black => {
                if self.castle_kingside_black
                    && self.squares[0x75].is_none() // f8
                    && self.squares[0x76].is_none() // g8
                {
                    moves.push(Move::castle(BLACK_KING_HOME, 0x76, BLACK_ROOK_KINGSIDE, 0x75));
                }
                if self.castle_queenside_black
                    && self.squares[0x73].is_none() // d8
                    && self.squares[0x72].is_none() // c8
                    && self.squares[0x71].is_none() // b8
                {
                    moves.push(Move::castle(
                        BLACK_KING_HOME,
                        0x72,
                        BLACK_ROOK_QUEENSIDE,
                        0x73,
                    ));
                }
            }
        }
    }

    fn add_pawn_moves(&self, from: Square, moves: &mut MoveList) {
        let (advance, captures, promotion_rank, home_rank) = match self.side_to_move {
            Color::White => (DIR_UP, [DIR_UP_LEFT, DIR_UP_RIGHT], 7, 1),
            Color::Black => (DIR_DOWN, [DIR_DOWN_LEFT, DIR_DOWN_RIGHT], 0, 6),
        };

        // Single advance, and the double from the home rank when both
        // squares ahead are empty. The double advance carries nothing
        // special in the move; make detects the two-rank distance.
        let target = from as i32 + advance;
        if on_board(target) && self.squares[target as usize].is_none() {
            push_pawn_move(from, target as usize, promotion_rank, moves);
            if rank_of(from) == home_rank {
                let target = target + advance;
                if on_board(target) && self.squares[target as usize].is_none() {
                    push_pawn_move(from, target as usize, promotion_rank, moves);
                }
            }
        }

        for dir in captures {
            let target = from as i32 + dir;
            if !on_board(target) {
                continue;
            }
            let to = target as usize;

            if let Some(piece) = self.squares[to] {
                if piece.color != self.side_to_move {
                    push_pawn_move(from, to, promotion_rank, moves);
                }
            }

            // En-passant: the diagonal target is the position's e.p.
            // square and the captured pawn sits one rank behind it.
            if to == self.en_passant_target {
                let victim = (to as i32 - advance) as usize;
                moves.push(Move::en_passant(from, to, victim));
            }
        }
    }
}

/// Fans a pawn arrival on the promotion rank out into the four promotion
/// moves; emits a single quiet/capture move otherwise.
fn push_pawn_move(from: Square, to: Square, promotion_rank: usize, moves: &mut MoveList) {
    if rank_of(to) == promotion_rank {
        for promote_to in PROMOTION_PIECES {
            moves.push(Move::promotion(from, to, promote_to));
        }
    } else {
        moves.push(Move::new(from, to));
    }
}
