use layerchess::{
    apply_move, check_move, legal_destinations, legal_moves, path_between, Board, Color,
    Coordinate, MoveError, MoveRequest, Piece, PieceKind,
};

fn c(file: u8, rank: u8, layer: u8) -> Coordinate {
    Coordinate::new(file, rank, layer).unwrap()
}

/// Kings tucked away in the corners plus the given pieces.
fn board_with(pieces: Vec<Piece>, white_to_move: bool) -> Board {
    let mut all = vec![
        Piece::new("wk", PieceKind::King, Color::White, c(7, 0, 0)),
        Piece::new("bk", PieceKind::King, Color::Black, c(7, 7, 2)),
    ];
    all.extend(pieces);
    Board::from_pieces(all, white_to_move).unwrap()
}

#[test]
fn test_pawn_step_is_applied_and_recorded() {
    let mut board = Board::new();
    let outcome = apply_move(&mut board, "wp1", c(0, 2, 0)).unwrap();

    assert_eq!(outcome.record.piece_id, "wp1");
    assert_eq!(outcome.record.notation, "a2la3l");
    assert_eq!(outcome.record.captured, None);
    assert!(!outcome.checkmate);
    assert!(!outcome.white_to_move);
    assert_eq!(board.history().len(), 1);
    assert_eq!(board.piece("wp1").unwrap().coord, c(0, 2, 0));
    assert!(!board.white_to_move());
}

#[test]
fn test_rook_blocked_by_own_pawn() {
    let mut board = Board::new();
    let err = apply_move(&mut board, "wkr", c(0, 5, 0)).unwrap_err();
    assert_eq!(err, MoveError::BlockedPath { at: c(0, 1, 0) });
    assert!(board.history().is_empty());
    assert!(board.white_to_move());
}

#[test]
fn test_knight_jumps_over_pieces() {
    let mut board = Board::new();
    apply_move(&mut board, "wkk", c(2, 2, 0)).unwrap();
    assert_eq!(board.piece("wkk").unwrap().coord, c(2, 2, 0));
}

#[test]
fn test_knight_destinations_from_start() {
    let board = Board::new();
    let mut dests = legal_destinations(&board, "wkk").unwrap();
    dests.sort();
    let mut expected = vec![
        c(0, 2, 0),
        c(2, 2, 0),
        c(0, 0, 2),
        c(2, 0, 2),
        c(1, 1, 2),
        c(1, 2, 1),
        c(3, 0, 1),
    ];
    expected.sort();
    assert_eq!(dests, expected);
}

#[test]
fn test_capturing_king_is_checkmate() {
    let mut board = Board::from_pieces(
        [
            Piece::new("wq", PieceKind::Queen, Color::White, c(0, 0, 0)),
            Piece::new("wk", PieceKind::King, Color::White, c(7, 0, 0)),
            Piece::new("bk", PieceKind::King, Color::Black, c(0, 4, 0)),
        ],
        true,
    )
    .unwrap();

    let outcome = apply_move(&mut board, "wq", c(0, 4, 0)).unwrap();
    assert!(outcome.checkmate);
    assert_eq!(outcome.record.captured.as_deref(), Some("bk"));
    assert_eq!(board.winner(), Some(Color::White));

    let err = apply_move(&mut board, "wk", c(7, 1, 0)).unwrap_err();
    assert_eq!(err, MoveError::GameOver);
    assert!(legal_moves(&board).is_empty());
}

#[test]
fn test_game_over_reported_before_piece_checks() {
    let board = Board::from_pieces(
        [Piece::new("wk", PieceKind::King, Color::White, c(7, 0, 0))],
        true,
    )
    .unwrap();
    // Same verdict from both entry points, whatever the piece id.
    for id in ["wk", "bk", "nobody"] {
        assert_eq!(legal_destinations(&board, id), Err(MoveError::GameOver));
        assert_eq!(check_move(&board, id, c(7, 1, 0)), Err(MoveError::GameOver));
    }
}

#[test]
fn test_rejections() {
    let mut board = Board::new();
    assert!(matches!(
        apply_move(&mut board, "wkr", c(0, 1, 0)),
        Err(MoveError::OwnCapture { occupant, .. }) if occupant == "wp1"
    ));
    assert_eq!(
        apply_move(&mut board, "wp1", c(0, 1, 0)),
        Err(MoveError::NoOpMove)
    );
    assert!(matches!(
        apply_move(&mut board, "bp1", c(0, 5, 2)),
        Err(MoveError::WrongTurn { color: Color::Black, .. })
    ));
    assert_eq!(
        apply_move(&mut board, "wp9", c(0, 2, 0)),
        Err(MoveError::NoSuchPiece("wp9".into()))
    );
    assert!(matches!(
        apply_move(&mut board, "wp1", c(1, 2, 0)),
        Err(MoveError::IllegalShape { kind: PieceKind::Pawn, .. })
    ));
    assert!(board.history().is_empty());
}

#[test]
fn test_out_of_range_request() {
    let request = MoveRequest::new("wp1", 0, 8, 0);
    assert!(matches!(request.destination(), Err(MoveError::OutOfRange(_))));
    let request = MoveRequest::new("wp1", -1, 2, 0);
    assert!(request.destination().is_err());
    let request = MoveRequest::new("wp1", 0, 2, 3);
    assert!(request.destination().is_err());
}

#[test]
fn test_pawn_double_step_only_first_move() {
    let mut board = Board::new();
    apply_move(&mut board, "wp2", c(1, 3, 0)).unwrap();
    apply_move(&mut board, "bp1", c(0, 5, 2)).unwrap();
    let err = apply_move(&mut board, "wp2", c(1, 5, 0)).unwrap_err();
    assert!(matches!(err, MoveError::IllegalShape { .. }));
    apply_move(&mut board, "wp2", c(1, 4, 1)).unwrap();
}

#[test]
fn test_black_pawn_moves_down_the_ranks() {
    let mut board = Board::new();
    apply_move(&mut board, "wp1", c(0, 2, 0)).unwrap();
    apply_move(&mut board, "bp3", c(2, 4, 1)).unwrap();
    assert_eq!(board.history()[1].notation, "c7uc5m");
}

#[test]
fn test_pawn_captures_diagonally_across_layers() {
    let mut board = board_with(
        vec![
            Piece::new("wp1", PieceKind::Pawn, Color::White, c(3, 3, 1)),
            Piece::new("bp1", PieceKind::Pawn, Color::Black, c(4, 4, 2)),
            Piece::new("bp2", PieceKind::Pawn, Color::Black, c(3, 4, 1)),
        ],
        true,
    );
    // Straight ahead is occupied and a pawn cannot capture forward.
    assert!(check_move(&board, "wp1", c(3, 4, 1)).is_err());
    let outcome = apply_move(&mut board, "wp1", c(4, 4, 2)).unwrap();
    assert_eq!(outcome.record.captured.as_deref(), Some("bp1"));
    assert_eq!(outcome.score.black, 1);
    assert!(board.piece("bp1").is_none());
}

#[test]
fn test_bishop_geometry() {
    let board = board_with(
        vec![Piece::new("wb", PieceKind::Bishop, Color::White, c(2, 2, 1))],
        true,
    );
    assert!(check_move(&board, "wb", c(4, 4, 1)).is_ok());
    assert!(check_move(&board, "wb", c(3, 3, 2)).is_ok());
    assert!(check_move(&board, "wb", c(1, 1, 0)).is_ok());
    assert!(check_move(&board, "wb", c(4, 4, 2)).is_err());
    assert!(check_move(&board, "wb", c(2, 4, 1)).is_err());
}

#[test]
fn test_rook_and_queen_geometry() {
    let board = board_with(
        vec![
            Piece::new("wr", PieceKind::Rook, Color::White, c(0, 0, 0)),
            Piece::new("wq", PieceKind::Queen, Color::White, c(3, 3, 1)),
        ],
        true,
    );
    assert!(check_move(&board, "wr", c(0, 0, 2)).is_ok());
    assert!(check_move(&board, "wr", c(0, 6, 0)).is_ok());
    assert!(check_move(&board, "wr", c(1, 1, 0)).is_err());

    assert!(check_move(&board, "wq", c(3, 3, 0)).is_ok());
    assert!(check_move(&board, "wq", c(5, 5, 1)).is_ok());
    assert!(check_move(&board, "wq", c(3, 5, 2)).is_err());
    assert!(check_move(&board, "wq", c(4, 4, 2)).is_ok());
    assert!(check_move(&board, "wq", c(5, 4, 1)).is_err());
}

#[test]
fn test_king_single_step_in_any_direction() {
    let board = board_with(Vec::new(), true);
    assert!(check_move(&board, "wk", c(6, 1, 1)).is_ok());
    assert!(check_move(&board, "wk", c(7, 0, 1)).is_ok());
    assert!(check_move(&board, "wk", c(5, 0, 0)).is_err());
    assert!(check_move(&board, "wk", c(7, 0, 2)).is_err());
}

#[test]
fn test_blocker_on_another_layer() {
    let board = board_with(
        vec![
            Piece::new("wb", PieceKind::Bishop, Color::White, c(2, 2, 0)),
            Piece::new("bp1", PieceKind::Pawn, Color::Black, c(3, 3, 1)),
        ],
        true,
    );
    assert_eq!(
        check_move(&board, "wb", c(4, 4, 2)),
        Err(MoveError::BlockedPath { at: c(3, 3, 1) })
    );
}

#[test]
fn test_path_between_excludes_endpoints() {
    assert_eq!(
        path_between(c(0, 0, 0), c(0, 4, 0)),
        vec![c(0, 1, 0), c(0, 2, 0), c(0, 3, 0)]
    );
    assert_eq!(path_between(c(2, 2, 0), c(4, 4, 2)), vec![c(3, 3, 1)]);
    assert_eq!(path_between(c(5, 5, 2), c(3, 3, 2)), vec![c(4, 4, 2)]);
    assert!(path_between(c(0, 0, 0), c(0, 1, 0)).is_empty());
}

#[test]
fn test_legal_moves_all_belong_to_side_to_move() {
    let board = Board::new();
    let moves = legal_moves(&board);
    assert!(!moves.is_empty());
    for (id, to) in &moves {
        assert!(id.starts_with('w'));
        assert!(check_move(&board, id, *to).is_ok());
    }
    assert!(matches!(
        legal_destinations(&board, "bp1"),
        Err(MoveError::WrongTurn { .. })
    ));
}
