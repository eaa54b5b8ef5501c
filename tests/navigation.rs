use gap_fill::{
    Config, EditIntent, EditKind, Interpreter, Motion, Outcome, Position, Range, TemplateConfig,
};

mod support;
use support::Session;

fn session(template: &str) -> Session {
    let config = Config {
        template: TemplateConfig {
            filler: '_',
            ..TemplateConfig::default()
        },
        ..Config::default()
    };
    Session::load_with(template, config)
}

#[test]
fn right_at_end_of_text_skips_the_unfilled_cells() {
    let mut s = session("x = {[5]} + y");
    s.at(0, 4);
    s.type_str("ab");
    assert_eq!(s.caret(), Position::new(0, 6));

    assert_eq!(s.send(EditKind::Navigate(Motion::Right)), Outcome::Handled);
    assert_eq!(s.caret(), Position::new(0, 10));
    assert_eq!(s.text(), "x = ab___ + y");
}

#[test]
fn right_skip_is_clamped_to_the_line() {
    let mut s = session("x = {[3]}");
    s.at(0, 4);
    assert_eq!(s.send(EditKind::Navigate(Motion::Right)), Outcome::Handled);
    assert_eq!(s.caret(), Position::new(0, 7));
}

#[test]
fn right_inside_text_is_left_to_the_host() {
    let mut s = session("x = {[5]}");
    s.at(0, 4);
    s.type_str("abc");
    s.at(0, 5);
    assert_eq!(s.send(EditKind::Navigate(Motion::Right)), Outcome::PassThrough);
    assert_eq!(s.caret(), Position::new(0, 5));
}

#[test]
fn other_motions_pass_through() {
    let mut s = session("x = {[5]}");
    s.at(0, 4);
    for motion in [
        Motion::Left,
        Motion::Up,
        Motion::Down,
        Motion::LineStart,
        Motion::LineEnd,
        Motion::Other,
    ] {
        assert_eq!(s.send(EditKind::Navigate(motion)), Outcome::PassThrough);
    }
    s.at(0, 0);
    assert_eq!(s.send(EditKind::Navigate(Motion::Right)), Outcome::PassThrough);
}

#[test]
fn right_with_selection_passes_through() {
    let mut s = session("x = {[5]}");
    s.select((0, 4), (0, 4));
    // An empty selection is just a caret.
    assert_eq!(s.send(EditKind::Navigate(Motion::Right)), Outcome::Handled);

    s.select((0, 2), (0, 4));
    assert_eq!(s.send(EditKind::Navigate(Motion::Right)), Outcome::PassThrough);
}

#[test]
fn next_gap_cycles_in_template_order() {
    let mut s = session("a = {[2]}, {[3]}\nb = {[1]}");
    s.at(0, 8);
    s.type_str("xy");
    s.at(0, 0);

    let mut visited = Vec::new();
    for _ in 0..4 {
        assert_eq!(s.send(EditKind::Navigate(Motion::NextGap)), Outcome::Handled);
        visited.push(s.caret());
    }
    assert_eq!(
        visited,
        vec![
            Position::new(0, 4),
            // Lands after the text already typed.
            Position::new(0, 10),
            Position::new(1, 4),
            Position::new(0, 4),
        ]
    );
}

#[test]
fn next_gap_without_gaps_passes_through() {
    let mut s = session("no gaps here");
    assert_eq!(s.send(EditKind::Navigate(Motion::NextGap)), Outcome::PassThrough);
}

#[test]
fn settle_caret_pulls_back_into_the_text() {
    let mut s = session("x = {[5]};");
    s.at(0, 4);
    s.type_str("ab");
    assert_eq!(s.interp.settle_caret(Position::new(0, 8)), Some(Position::new(0, 6)));
    assert_eq!(s.interp.settle_caret(Position::new(0, 9)), Some(Position::new(0, 6)));
    assert_eq!(s.interp.settle_caret(Position::new(0, 6)), None);
    assert_eq!(s.interp.settle_caret(Position::new(0, 5)), None);
    assert_eq!(s.interp.settle_caret(Position::new(0, 2)), None);
}

#[test]
fn intent_built_by_the_host() {
    let mut s = session("k = {[3-]}");
    let intent = EditIntent::new(EditKind::InsertChar('a'), Position::new(0, 4));
    let outcome = s.interp.handle_event(&mut s.doc, &mut s.clipboard, intent);
    assert_eq!(outcome, Outcome::Handled);
    assert_eq!(s.text(), "k = a__");

    // Hosts report selections anchor first.
    let selection = Range::new(Position::new(0, 5), Position::new(0, 4));
    let intent = EditIntent::new(EditKind::Cut, Position::new(0, 4)).with_selection(selection);
    let outcome = s.interp.handle_event(&mut s.doc, &mut s.clipboard, intent);
    assert_eq!(outcome, Outcome::Handled);
    assert_eq!(s.text(), "k = ___");
    assert_eq!(s.clipboard.content(), Some("a"));
}

#[test]
fn empty_interpreter_passes_everything_through() {
    let mut s = session("plain text");
    s.interp = Interpreter::new();
    assert_eq!(s.interp.config(), &Config::default());
    assert!(s.interp.registry().is_empty());
    for kind in [
        EditKind::InsertChar('x'),
        EditKind::Backspace,
        EditKind::Navigate(Motion::Right),
    ] {
        assert_eq!(s.send(kind), Outcome::PassThrough);
    }
    assert_eq!(s.text(), "plain text");
}

#[test]
fn touching_gaps_route_keys_to_the_gap_the_caret_entered() {
    let mut s = session("{[2]}{[2]}");
    s.at(0, 0);
    assert_eq!(s.send(EditKind::Navigate(Motion::NextGap)), Outcome::Handled);
    assert_eq!(s.caret(), Position::new(0, 2));

    s.type_str("xy");
    assert_eq!(s.text(), "__xy");
    assert_eq!(s.occupancy(0), vec![0]);
    assert_eq!(s.occupancy(1), vec![2]);

    // A selection starting on the shared column stays with the right gap.
    s.select((0, 2), (0, 4));
    assert_eq!(s.send(EditKind::Cut), Outcome::Handled);
    assert_eq!(s.clipboard.content(), Some("xy"));
    assert_eq!(s.text(), "____");

    s.at(0, 0);
    s.type_str("ab");
    assert_eq!(s.text(), "ab__");
    assert_eq!(s.occupancy(0), vec![2]);
    assert_eq!(s.occupancy(1), vec![0]);
}
