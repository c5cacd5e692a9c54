use crate::square::{self, Square, NULL_SQUARE};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn other(&self) -> Color {
        if *self == Color::White {
            Color::Black
        } else {
            Color::White
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PieceType {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

/// Promotion targets in the order the generator emits them.
pub const PROMOTION_PIECES: [PieceType; 4] = [
    PieceType::Queen,
    PieceType::Rook,
    PieceType::Bishop,
    PieceType::Knight,
];

/// One occupied board cell. An empty cell is `None` at the board level, so
/// equality over cells stays total.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Piece {
    pub color: Color,
    pub piece_type: PieceType,
}

impl Piece {
    pub fn new(color: Color, piece_type: PieceType) -> Piece {
        Piece { color, piece_type }
    }

    /// Piece from its FEN letter; case selects the colour.
    pub fn from_fen_char(c: char) -> Option<Piece> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let piece_type = match c.to_ascii_lowercase() {
            'k' => PieceType::King,
            'q' => PieceType::Queen,
            'r' => PieceType::Rook,
            'b' => PieceType::Bishop,
            'n' => PieceType::Knight,
            'p' => PieceType::Pawn,
            _ => return None,
        };
        Some(Piece { color, piece_type })
    }

    pub fn to_fen_char(&self) -> char {
        let c = match self.piece_type {
            PieceType::King => 'k',
            PieceType::Queen => 'q',
            PieceType::Rook => 'r',
            PieceType::Bishop => 'b',
            PieceType::Knight => 'n',
            PieceType::Pawn => 'p',
        };
        match self.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }
}

/// A move carries everything needed to apply it with no further lookups:
/// the primary piece motion, an optional promotion, an extra square to
/// empty (the en-passant victim), and an optional secondary motion (the
/// rook when castling). The square fields default to `NULL_SQUARE`, which
/// make/unmake may write through harmlessly.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub promote_to: Option<PieceType>,
    /// Extra square emptied on apply, or `NULL_SQUARE`.
    pub ep_clear: Square,
    /// Secondary motion start (the castling rook), or `NULL_SQUARE`.
    pub rook_from: Square,
    /// Secondary motion destination, or `NULL_SQUARE`.
    pub rook_to: Square,
}

impl Move {
    pub const NULL: Move = Move {
        from: NULL_SQUARE,
        to: NULL_SQUARE,
        promote_to: None,
        ep_clear: NULL_SQUARE,
        rook_from: NULL_SQUARE,
        rook_to: NULL_SQUARE,
    };

    pub fn new(from: Square, to: Square) -> Move {
        Move {
            from,
            to,
            ..Move::NULL
        }
    }

    pub fn promotion(from: Square, to: Square, promote_to: PieceType) -> Move {
        Move {
            from,
            to,
            promote_to: Some(promote_to),
            ..Move::NULL
        }
    }

    pub fn en_passant(from: Square, to: Square, victim: Square) -> Move {
        Move {
            from,
            to,
            ep_clear: victim,
            ..Move::NULL
        }
    }

    pub fn castle(from: Square, to: Square, rook_from: Square, rook_to: Square) -> Move {
        Move {
            from,
            to,
            rook_from,
            rook_to,
            ..Move::NULL
        }
    }

    /// The move in XBoard long-algebraic form: `e2e4`, `e7e8q`, castling as
    /// the king's move (`e1g1`). Empty string if any field is invalid.
    pub fn to_text(&self) -> String {
        if !square::is_valid(self.from) || !square::is_valid(self.to) {
            return String::new();
        }

        let mut text = String::with_capacity(5);
        text.push_str(&square::to_algebraic(self.from));
        text.push_str(&square::to_algebraic(self.to));

        if let Some(promote_to) = self.promote_to {
            match promote_to {
                PieceType::Queen => text.push('q'),
                PieceType::Rook => text.push('r'),
                PieceType::Bishop => text.push('b'),
                PieceType::Knight => text.push('n'),
                _ => return String::new(),
            }
        }

        text
    }
}

/// Snapshot taken by `make_move`, sufficient to reverse it exactly.
///
/// The rook cells are not stored: unmake restores the rook by copying back
/// from `rook_to` and clearing it, which is exact because the rook's path
/// was empty when the castle was made.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Undo {
    pub from: Square,
    pub to: Square,
    pub rook_from: Square,
    pub rook_to: Square,
    pub ep_square: Square,
    pub from_cell: Option<Piece>,
    pub to_cell: Option<Piece>,
    pub ep_cell: Option<Piece>,

    pub side_to_move: Color,
    pub castle_kingside_white: bool,
    pub castle_queenside_white: bool,
    pub castle_kingside_black: bool,
    pub castle_queenside_black: bool,
    pub en_passant_target: Square,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
    pub white_king: Square,
    pub black_king: Square,
}
