//! Integration tests for resolution precedence and toggles.

use hostmatrix::hostname::{broaden, WILDCARD};
use hostmatrix::{CellState, Matrix, RequestType, SharedMatrix};

#[test]
fn test_example_com_scenario() {
    let mut matrix = Matrix::new();
    matrix.set_cell("example.com", "*", RequestType::Image, CellState::Allow);

    let r = matrix.resolve("sub.example.com", "ad.example.com", RequestType::Image);
    assert_eq!(r.state, CellState::Allow);
    assert_eq!(r.src, "example.com");
    assert_eq!(r.des, "*");

    matrix.set_cell("sub.example.com", "ad.example.com", RequestType::Image, CellState::Block);
    let r = matrix.resolve("sub.example.com", "ad.example.com", RequestType::Image);
    assert_eq!(r.state, CellState::Block);
    assert_eq!((r.src, r.des), ("sub.example.com", "ad.example.com"));

    // Blocking what is already blocked changes nothing
    assert!(!matrix.block_cell("sub.example.com", "ad.example.com", RequestType::Image));

    // Allowing drops the override: inheritance already says allow
    assert!(matrix.allow_cell("sub.example.com", "ad.example.com", RequestType::Image));
    assert!(matrix.cells("sub.example.com", "ad.example.com").is_none());

    let r = matrix.resolve("sub.example.com", "ad.example.com", RequestType::Image);
    assert_eq!(r.state, CellState::Allow);
    assert_eq!((r.src, r.des), ("example.com", "*"));
}

#[test]
fn test_block_then_allow_roundtrip() {
    let mut matrix = Matrix::new();
    matrix.set_cell("*", "*", RequestType::ThirdPartyScript, CellState::Allow);
    let original = matrix.clone();

    assert!(matrix.block_cell("news.org", "tracker.net", RequestType::ThirdPartyScript));
    assert!(matrix.must_block("news.org", "tracker.net", RequestType::ThirdPartyScript));
    assert!(!matrix.block_cell("news.org", "tracker.net", RequestType::ThirdPartyScript));

    assert!(matrix.allow_cell("news.org", "tracker.net", RequestType::ThirdPartyScript));
    assert_eq!(matrix, original);
}

#[test]
fn test_precedence_layers() {
    let mut matrix = Matrix::new();
    let ty = RequestType::ThirdPartyFrame;

    matrix.set_cell("*", "*", ty, CellState::Block);
    matrix.set_cell("shop.com", "*", ty, CellState::Allow);
    matrix.set_cell("*", "ads.net", ty, CellState::Block);
    matrix.set_cell("shop.com", "pay.ads.net", ty, CellState::Noop);

    let cases = [
        // (src, des, state, matched src, matched des)
        ("blog.org", "video.com", CellState::Block, "*", "*"),
        ("www.shop.com", "video.com", CellState::Allow, "shop.com", "*"),
        ("www.shop.com", "x.ads.net", CellState::Block, "*", "ads.net"),
        ("www.shop.com", "pay.ads.net", CellState::Noop, "shop.com", "pay.ads.net"),
        ("blog.org", "pay.ads.net", CellState::Block, "*", "ads.net"),
    ];

    for (src, des, state, msrc, mdes) in cases {
        let r = matrix.resolve(src, des, ty);
        assert_eq!((r.state, r.src, r.des), (state, msrc, mdes), "{} -> {}", src, des);
    }
}

#[test]
fn test_exact_rule_beats_everything() {
    let mut matrix = Matrix::new();
    let ty = RequestType::InlineScript;
    for src in ["*", "com", "a.com"] {
        for des in ["*", "com", "b.com"] {
            matrix.set_cell(src, des, ty, CellState::Block);
        }
    }
    matrix.set_cell("x.a.com", "y.b.com", ty, CellState::Allow);

    let r = matrix.resolve("x.a.com", "y.b.com", ty);
    assert_eq!((r.state, r.src, r.des), (CellState::Allow, "x.a.com", "y.b.com"));
}

#[test]
fn test_address_literals_are_atomic() {
    assert_eq!(broaden("10.0.0.1"), WILDCARD);
    assert_eq!(broaden("[2001:db8::1]"), WILDCARD);

    let mut matrix = Matrix::new();
    matrix.set_cell("0.0.1", "*", RequestType::Any, CellState::Block);
    assert_eq!(matrix.resolve("10.0.0.1", "a.com", RequestType::Any).state, CellState::Unset);

    matrix.set_cell("10.0.0.1", "*", RequestType::Any, CellState::Allow);
    assert_eq!(matrix.resolve("10.0.0.1", "a.com", RequestType::Any).state, CellState::Allow);
}

#[test]
fn test_shared_matrix_explain() {
    let shared = SharedMatrix::new();
    shared.set_cell("*", "*", RequestType::InlineScript, CellState::Block);
    shared.allow("trusted.org", "*", RequestType::InlineScript);

    let r = shared.resolve("www.trusted.org", "trusted.org", RequestType::InlineScript);
    assert_eq!(r.explain(), "da:trusted.org * inline-script allow");

    let r = shared.resolve("evil.net", "evil.net", RequestType::InlineScript);
    assert_eq!(r.explain(), "db:* * inline-script block");
}
