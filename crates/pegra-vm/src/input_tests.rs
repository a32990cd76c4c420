use crate::Input;

#[test]
fn positions_are_character_indices() {
    let input = Input::new("héllo");
    assert_eq!(input.len(), 5);
    assert_eq!(input.char_at(1), Some('é'));
    assert_eq!(input.char_at(4), Some('o'));
    assert_eq!(input.char_at(5), None);
}

#[test]
fn sentinel_sits_one_past_the_last_character() {
    let input = Input::new("ab");
    assert!(!input.at_sentinel(1));
    assert!(input.at_sentinel(2));
    assert!(!input.at_sentinel(3));
}

#[test]
fn empty_input_starts_at_the_sentinel() {
    let input = Input::new("");
    assert!(input.is_empty());
    assert!(input.at_sentinel(0));
    assert_eq!(input.char_at(0), None);
}

#[test]
fn slice_clamps_to_real_characters() {
    let input = Input::new("abc");
    assert_eq!(input.slice(0, 2), "ab");
    assert_eq!(input.slice(1, 10), "bc");
    assert_eq!(input.slice(5, 7), "");
}
