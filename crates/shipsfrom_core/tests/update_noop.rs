use shipsfrom_core::{update, FilterState, Msg};

#[test]
fn update_is_noop() {
    let state = FilterState::new();
    let (next, effects) = update(state.clone(), Msg::NoOp);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}
