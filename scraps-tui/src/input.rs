use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, Field, Focus, Page};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    None,
    Quit,
    /// Run [`App::submit_entry`] on the log form.
    SubmitEntry,
}

pub(crate) fn handle_key_event(key: KeyEvent, app: &mut App) -> Action {
    use KeyCode::{BackTab, Backspace, Char, Down, Enter, Esc, Left, Right, Tab, Up};

    // Global quit shortcut
    if key.code == Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }

    let mut action = Action::None;

    match app.focus {
        Focus::Menu => match key.code {
            Char('q') if key.modifiers.is_empty() => action = Action::Quit,
            Up | Char('k') => app.select_page(app.page.previous()),
            Down | Char('j') => app.select_page(app.page.next()),
            Char(digit @ '1'..='5') => {
                let position = digit.to_digit(10).map_or(0, |number| number as usize - 1);
                if let Some(page) = Page::ALL.get(position) {
                    app.select_page(*page);
                }
            }
            Enter | Right | Tab => app.enter_page(),
            _ => {}
        },

        Focus::Form => match key.code {
            Esc => app.focus = Focus::Menu,
            Enter => action = Action::SubmitEntry,
            Tab | Down => app.form.field = app.form.field.next(),
            BackTab | Up => app.form.field = app.form.field.previous(),
            Left if app.form.field == Field::Category => app.form.cycle_category(false),
            Right if app.form.field == Field::Category => app.form.cycle_category(true),
            Char(' ') if app.form.field == Field::Category => app.form.cycle_category(true),
            Char(character)
                if !key.modifiers.contains(KeyModifiers::CONTROL)
                    && !key.modifiers.contains(KeyModifiers::ALT) =>
            {
                match app.form.field {
                    Field::FoodItem => app.form.food_item.push(character),
                    Field::Amount if character.is_ascii_digit() => app.form.amount.push(character),
                    Field::Amount | Field::Category => {}
                }
            }
            Backspace => match app.form.field {
                Field::FoodItem => {
                    app.form.food_item.pop();
                }
                Field::Amount => {
                    app.form.amount.pop();
                }
                Field::Category => {}
            },
            _ => {}
        },
    }
    action
}
