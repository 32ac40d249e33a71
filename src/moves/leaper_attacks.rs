//! Precomputed attack sets for pieces that jump to fixed offsets.

use crate::game_state::chess_types::{Bitboard, Color, Square};

const KNIGHT_OFFSETS: [(i32, i32); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const KING_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

const WHITE_PAWN_OFFSETS: [(i32, i32); 2] = [(-1, 1), (1, 1)];
const BLACK_PAWN_OFFSETS: [(i32, i32); 2] = [(-1, -1), (1, -1)];

pub const KNIGHT_ATTACKS: [Bitboard; 64] = build_table(&KNIGHT_OFFSETS);
pub const KING_ATTACKS: [Bitboard; 64] = build_table(&KING_OFFSETS);
pub const WHITE_PAWN_ATTACKS: [Bitboard; 64] = build_table(&WHITE_PAWN_OFFSETS);
pub const BLACK_PAWN_ATTACKS: [Bitboard; 64] = build_table(&BLACK_PAWN_OFFSETS);

#[inline]
pub const fn knight_attacks(square: Square) -> Bitboard {
    KNIGHT_ATTACKS[square as usize]
}

#[inline]
pub const fn king_attacks(square: Square) -> Bitboard {
    KING_ATTACKS[square as usize]
}

/// Squares a pawn of `color` on `square` captures on.
#[inline]
pub const fn pawn_attacks(color: Color, square: Square) -> Bitboard {
    match color {
        Color::White => WHITE_PAWN_ATTACKS[square as usize],
        Color::Black => BLACK_PAWN_ATTACKS[square as usize],
    }
}

const fn build_table(offsets: &[(i32, i32)]) -> [Bitboard; 64] {
    let mut table = [0u64; 64];
    let mut sq = 0usize;

    while sq < 64 {
        let file = (sq % 8) as i32;
        let rank = (sq / 8) as i32;
        let mut i = 0usize;
        while i < offsets.len() {
            let f = file + offsets[i].0;
            let r = rank + offsets[i].1;
            if f >= 0 && f < 8 && r >= 0 && r < 8 {
                table[sq] |= 1u64 << (r * 8 + f);
            }
            i += 1;
        }
        sq += 1;
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knight_in_centre_has_eight_targets_and_in_corner_two() {
        assert_eq!(knight_attacks(27).count_ones(), 8);
        assert_eq!(knight_attacks(0).count_ones(), 2);
    }

    #[test]
    fn king_on_a1_has_three_targets() {
        assert_eq!(king_attacks(0), (1 << 1) | (1 << 8) | (1 << 9));
    }

    #[test]
    fn pawn_attacks_point_towards_the_enemy() {
        let e2 = 12;
        assert_eq!(pawn_attacks(Color::White, e2), (1 << 19) | (1 << 21));
        let e7 = 52;
        assert_eq!(pawn_attacks(Color::Black, e7), (1 << 43) | (1 << 45));
        let a2 = 8;
        assert_eq!(pawn_attacks(Color::White, a2), 1 << 17);
    }
}
