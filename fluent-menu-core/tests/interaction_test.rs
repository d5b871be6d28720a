use std::rc::Rc;

use fluent_menu_core::menu::constants::MIN_WIDTH;
use fluent_menu_core::menu::interaction::{
    Effect, InteractionController, MenuKey, NavContext, PopupInput, RowInfo, Selection,
};
use fluent_menu_core::menu::item::{ItemModel, NewItem};
use fluent_menu_core::menu::render::build_draw_spec;
use fluent_menu_core::platform::EstimatedTextMeasure;
use fluent_menu_theme::Theme;

fn rows_for(model: &ItemModel<()>) -> Vec<RowInfo> {
    let spec = build_draw_spec(
        &model.snapshots(),
        &Rc::new(Theme::light()),
        &EstimatedTextMeasure,
        MIN_WIDTH,
    );
    RowInfo::from_layout(&spec.layout)
}

#[test]
fn test_down_down_enter_triggers_copy() {
    let mut model: ItemModel<()> = ItemModel::new();
    model.push("Cut");
    model.push("Copy");
    model.push(NewItem::new("Paste").with_enabled(false));
    let rows = rows_for(&model);

    let mut controller = InteractionController::new();
    let mut triggered = Vec::new();
    for key in [MenuKey::Down, MenuKey::Down, MenuKey::Enter] {
        for effect in controller.handle(PopupInput::Key(key), &rows, NavContext::default()) {
            if let Effect::Trigger(row) = effect {
                triggered.push(model.at_row(row).map(|item| item.text.clone()));
            }
        }
    }
    assert_eq!(triggered, vec![Some("Copy".to_string())]);
}

#[test]
fn test_wrap_around_in_both_directions() {
    let mut model: ItemModel<()> = ItemModel::new();
    model.push(NewItem::new("Header").with_enabled(false));
    model.push("First");
    model.push_separator();
    model.push("Last");
    model.push(NewItem::new("Footer").with_enabled(false));
    let rows = rows_for(&model);
    let ctx = NavContext::default();

    let mut controller = InteractionController::new();
    controller.handle(PopupInput::Key(MenuKey::Up), &rows, ctx);
    assert_eq!(controller.selection(), Selection::Keyboard(3));
    controller.handle(PopupInput::Key(MenuKey::Down), &rows, ctx);
    assert_eq!(controller.selection(), Selection::Keyboard(1));
    controller.handle(PopupInput::Key(MenuKey::Up), &rows, ctx);
    assert_eq!(controller.selection(), Selection::Keyboard(3));
}

#[test]
fn test_paste_never_triggers() {
    let mut model: ItemModel<()> = ItemModel::new();
    model.push("Cut");
    model.push("Copy");
    model.push(NewItem::new("Paste").with_enabled(false));
    let rows = rows_for(&model);
    let ctx = NavContext::default();

    let mut controller = InteractionController::new();
    let mut effects = Vec::new();
    effects.extend(controller.handle(PopupInput::PointerMoved(Some(2)), &rows, ctx));
    effects.extend(controller.handle(PopupInput::PointerPressed(Some(2)), &rows, ctx));
    effects.extend(controller.handle(PopupInput::PointerReleased(Some(2)), &rows, ctx));
    for _ in 0..6 {
        effects.extend(controller.handle(PopupInput::Key(MenuKey::Down), &rows, ctx));
        assert_ne!(controller.selection().row(), Some(2));
    }
    assert!(!effects.contains(&Effect::Trigger(2)));
}
