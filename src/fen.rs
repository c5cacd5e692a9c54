//! FEN (Forsyth-Edwards Notation) parsing and emission.
//!
//! Parsing accepts the four mandatory fields with the two clock fields
//! optional, validates the resulting position, and silently normalises
//! inconsistent extras: a spurious en-passant target or a castling right
//! whose king or rook has left home is cleared rather than rejected. Any
//! structural or validation failure reverts the board to the starting
//! position.

use thiserror::Error;

use crate::board::{
    Board, BLACK_KING_HOME, BLACK_ROOK_KINGSIDE, BLACK_ROOK_QUEENSIDE, WHITE_KING_HOME,
    WHITE_ROOK_KINGSIDE, WHITE_ROOK_QUEENSIDE,
};
use crate::square::{self, NULL_SQUARE};
use crate::types::{Color, Piece, PieceType};

#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum FenError {
    #[error("missing {0} field")]
    MissingField(&'static str),
    #[error("malformed piece placement")]
    BadPlacement,
    #[error("side to move must be 'w' or 'b'")]
    BadSideToMove,
    #[error("castling field must be '-' or a subset of KQkq")]
    BadCastling,
    #[error("en passant field must be '-' or a square")]
    BadEnPassant,
    #[error("malformed clock field")]
    BadClock,
    #[error("position must have exactly one king per side")]
    KingCount,
    #[error("pawn on a back rank")]
    PawnOnBackRank,
    #[error("side not to move is in check")]
    OpponentInCheck,
}

impl Board {
    /// Builds a board from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Board, FenError> {
        parse_fen(fen)
    }

    /// Replaces this position with the one in `fen`. On any failure the
    /// board is reverted to the standard starting position and the error
    /// is returned.
    pub fn set_from_fen(&mut self, fen: &str) -> Result<(), FenError> {
        match parse_fen(fen) {
            Ok(board) => {
                *self = board;
                Ok(())
            }
            Err(error) => {
                *self = Board::new();
                Err(error)
            }
        }
    }

    /// The position as a six-field FEN string.
    pub fn to_fen(&self) -> String {
        let mut fen = String::new();

        for rank in (0..8).rev() {
            if rank < 7 {
                fen.push('/');
            }
            let mut empty_run = 0;
            for file in 0..8 {
                match self.squares[square::from_file_rank(file, rank)] {
                    None => empty_run += 1,
                    Some(piece) => {
                        if empty_run > 0 {
                            fen.push_str(&empty_run.to_string());
                            empty_run = 0;
                        }
                        fen.push(piece.to_fen_char());
                    }
                }
            }
            if empty_run > 0 {
                fen.push_str(&empty_run.to_string());
            }
        }

        fen.push(' ');
        fen.push(match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        });

        fen.push(' ');
        if !self.castle_kingside_white
            && !self.castle_queenside_white
            && !self.castle_kingside_black
            && !self.castle_queenside_black
        {
            fen.push('-');
        } else {
            if self.castle_kingside_white {
                fen.push('K');
            }
            if self.castle_queenside_white {
                fen.push('Q');
            }
            if self.castle_kingside_black {
                fen.push('k');
            }
            if self.castle_queenside_black {
                fen.push('q');
            }
        }

        fen.push(' ');
        if self.en_passant_target == NULL_SQUARE {
            fen.push('-');
        } else {
            fen.push_str(&square::to_algebraic(self.en_passant_target));
        }

        fen.push_str(&format!(" {} {}", self.halfmove_clock, self.fullmove_number));
        fen
    }
}

fn parse_fen(fen: &str) -> Result<Board, FenError> {
    let mut fields = fen.split_whitespace();
    let placement = fields
        .next()
        .ok_or(FenError::MissingField("piece placement"))?;
    let side = fields.next().ok_or(FenError::MissingField("side to move"))?;
    let castling = fields.next().ok_or(FenError::MissingField("castling"))?;
    let en_passant = fields.next().ok_or(FenError::MissingField("en passant"))?;
    let halfmove = fields.next();
    let fullmove = fields.next();

    let mut board = Board::empty();
    parse_placement(&mut board, placement)?;

    board.side_to_move = match side {
        "w" => Color::White,
        "b" => Color::Black,
        _ => return Err(FenError::BadSideToMove),
    };

    if castling != "-" {
        for c in castling.chars() {
            match c {
                'K' => board.castle_kingside_white = true,
                'Q' => board.castle_queenside_white = true,
                'k' => board.castle_kingside_black = true,
                'q' => board.castle_queenside_black = true,
                _ => return Err(FenError::BadCastling),
            }
        }
    }

    if en_passant != "-" {
        board.en_passant_target =
            square::from_algebraic(en_passant).ok_or(FenError::BadEnPassant)?;
    }

    if let Some(text) = halfmove {
        board.halfmove_clock = text.parse().map_err(|_| FenError::BadClock)?;
    }
    if let Some(text) = fullmove {
        board.fullmove_number = text.parse().map_err(|_| FenError::BadClock)?;
        if board.fullmove_number < 1 {
            return Err(FenError::BadClock);
        }
    }

    validate(&mut board)?;
    Ok(board)
}

/// Parses the board field rank-by-rank, 8 down to 1. Digits 1-8 skip that
/// many files; each rank must account for exactly 8 files.
fn parse_placement(board: &mut Board, placement: &str) -> Result<(), FenError> {
    let mut rank = 7i32;

    for row in placement.split('/') {
        if rank < 0 {
            return Err(FenError::BadPlacement);
        }
        let mut file = 0usize;

        for c in row.chars() {
            if let Some(skip) = c.to_digit(10) {
                if !(1..=8).contains(&skip) {
                    return Err(FenError::BadPlacement);
                }
                file += skip as usize;
            } else {
                if file > 7 {
                    return Err(FenError::BadPlacement);
                }
                let piece = Piece::from_fen_char(c).ok_or(FenError::BadPlacement)?;
                let sq = square::from_file_rank(file, rank as usize);
                board.squares[sq] = Some(piece);
                if piece.piece_type == PieceType::King {
                    match piece.color {
                        Color::White => board.white_king = sq,
                        Color::Black => board.black_king = sq,
                    }
                }
                file += 1;
            }
        }

        if file != 8 {
            return Err(FenError::BadPlacement);
        }
        rank -= 1;
    }

    if rank != -1 {
        return Err(FenError::BadPlacement);
    }
    Ok(())
}

/// Structural position checks, then silent normalisation of the en-passant
/// target and castling rights.
fn validate(board: &mut Board) -> Result<(), FenError> {
    let mut white_kings = 0;
    let mut black_kings = 0;

    for rank in 0..8 {
        for file in 0..8 {
            let Some(piece) = board.squares[square::from_file_rank(file, rank)] else {
                continue;
            };
            match piece.piece_type {
                PieceType::King => match piece.color {
                    Color::White => white_kings += 1,
                    Color::Black => black_kings += 1,
                },
                PieceType::Pawn if rank == 0 || rank == 7 => {
                    return Err(FenError::PawnOnBackRank)
                }
                _ => {}
            }
        }
    }

    if white_kings != 1 || black_kings != 1 {
        return Err(FenError::KingCount);
    }

    if board.is_in_check(board.side_to_move.other()) {
        return Err(FenError::OpponentInCheck);
    }

    normalise_en_passant(board);
    normalise_castling_rights(board);
    Ok(())
}

/// An en-passant target only makes sense on rank 3 with black to move, or
/// rank 6 with white to move, and only while the pawn that created it is
/// still in front of it. Anything else is silently cleared.
fn normalise_en_passant(board: &mut Board) {
    let target = board.en_passant_target;
    if target == NULL_SQUARE {
        return;
    }

    let keep = match (square::rank_of(target), board.side_to_move) {
        (2, Color::Black) => {
            board.squares[target + 16] == Some(Piece::new(Color::White, PieceType::Pawn))
        }
        (5, Color::White) => {
            board.squares[target - 16] == Some(Piece::new(Color::Black, PieceType::Pawn))
        }
        _ => false,
    };

    if !keep {
        board.en_passant_target = NULL_SQUARE;
    }
}

/// A castling right is kept only while the king and the matching rook are
/// both on their home squares.
fn normalise_castling_rights(board: &mut Board) {
    let white_king_home =
        board.squares[WHITE_KING_HOME] == Some(Piece::new(Color::White, PieceType::King));
    let black_king_home =
        board.squares[BLACK_KING_HOME] == Some(Piece::new(Color::Black, PieceType::King));
    let white_rook = Some(Piece::new(Color::White, PieceType::Rook));
    let black_rook = Some(Piece::new(Color::Black, PieceType::Rook));

    board.castle_kingside_white &=
        white_king_home && board.squares[WHITE_ROOK_KINGSIDE] == white_rook;
    board.castle_queenside_white &=
        white_king_home && board.squares[WHITE_ROOK_QUEENSIDE] == white_rook;
    board.castle_kingside_black &=
        black_king_home && board.squares[BLACK_ROOK_KINGSIDE] == black_rook;
    board.castle_queenside_black &=
        black_king_home && board.squares[BLACK_ROOK_QUEENSIDE] == black_rook;
}
