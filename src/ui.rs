#![cfg(feature = "std")]

use std::fmt::Write;

use crate::core::{
    board::Board,
    config::{FILES, RANKS},
    Coordinate, Layer,
};

/// Text view of all three layers side by side, upper layer first, rank 8
/// at the top. White pieces are uppercase, black lowercase.
pub fn render_board(board: &Board) -> String {
    let layers = [Layer::Upper, Layer::Middle, Layer::Lower];
    let mut out = String::new();

    for layer in layers {
        let _ = write!(out, "   {:<17}", format!("{:?} ({})", layer, layer.letter()));
    }
    out.push('\n');
    for _ in layers {
        out.push_str("   ");
        for f in 0..FILES {
            let _ = write!(out, "{} ", (b'a' + f) as char);
        }
        out.push(' ');
    }
    out.push('\n');

    for rank in (0..RANKS).rev() {
        for layer in layers {
            let _ = write!(out, "{:>2} ", rank + 1);
            for file in 0..FILES {
                let ch = Coordinate::new(file, rank, layer.index())
                    .ok()
                    .and_then(|c| board.piece_at(c))
                    .map(|p| p.symbol())
                    .unwrap_or('.');
                let _ = write!(out, "{} ", ch);
            }
            out.push(' ');
        }
        out.push('\n');
    }

    let score = board.score();
    let _ = writeln!(
        out,
        "{} to move   material: white {} black {}",
        board.side_to_move(),
        score.white,
        score.black
    );
    out
}

pub fn print_board(board: &Board) {
    std::print!("{}", render_board(board));
}
