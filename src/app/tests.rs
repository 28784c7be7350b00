use std::path::PathBuf;

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use super::*;
use crate::debounce::Debouncer;
use crate::dom::parse_html;
use crate::page::Page;
use crate::stats::Category;

const FIXTURE: &str = include_str!("../../tests/fixtures/reference.html");

fn create_test_model() -> Model {
    let page = Page::attach(parse_html(FIXTURE).unwrap());
    Model::new(PathBuf::from("reference.html"), page, (100, 40))
}

fn send(model: Model, messages: impl IntoIterator<Item = Message>) -> Model {
    messages.into_iter().fold(model, update)
}

fn type_query(model: Model, query: &str) -> Model {
    let model = update(model, Message::FocusSearch);
    send(model, query.chars().map(Message::SearchInsert))
}

fn flow_text(model: &Model) -> String {
    model.flow.plain_text()
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

#[test]
fn test_initial_model_shows_intro_and_stats() {
    let model = create_test_model();
    assert_eq!(model.view, ViewState::Default);
    assert_eq!(model.stats.total(), 12);
    assert_eq!(model.stats.count(Category::Basic), 2);
    assert_eq!(model.stats.other(), 1);

    let text = flow_text(&model);
    assert!(text.contains("YouTube API client"));
    assert!(text.contains("Total: 12 implemented methods"));
    assert!(text.contains("Playlist management: 2 methods"));
    assert!(text.contains("Other: 1 methods"));
    assert!(!text.contains("get_video_info"));
    assert!(!text.contains("pending"));
}

#[test]
fn test_nav_select_shows_only_that_category() {
    let model = send(
        create_test_model(),
        [Message::NavDown, Message::NavSelect],
    );
    assert_eq!(model.view, ViewState::Category("info".to_string()));
    assert!(model.page.is_nav_active(1));

    let text = flow_text(&model);
    assert!(text.contains("get_video_info"));
    assert!(text.contains("get_channel_info"));
    assert!(!text.contains("YouTube API client"));
    assert!(!text.contains("search_videos"));
}

#[test]
fn test_nav_cursor_stays_in_range() {
    let mut model = create_test_model();
    model = update(model, Message::NavUp);
    assert_eq!(model.nav_cursor, 0);
    model = send(model, std::iter::repeat_n(Message::NavDown, 20));
    assert_eq!(model.nav_cursor, model.nav_len() - 1);
}

#[test]
fn test_nav_click_out_of_range_is_ignored() {
    let model = update(create_test_model(), Message::NavClick(42));
    assert_eq!(model.view, ViewState::Default);
    assert!(flow_text(&model).contains("YouTube API client"));
}

#[test]
fn test_nav_click_scrolls_revealed_section_into_view() {
    let page = Page::attach(parse_html(FIXTURE).unwrap());
    let mut model = Model::new(PathBuf::from("reference.html"), page, (60, 8));
    model = update(model, Message::NavClick(7));

    let section = model.page.dom().by_id("playlist").unwrap();
    let line = model.flow.line_of(section).unwrap();
    assert!(model.viewport.visible_range().contains(&line));
}

#[test]
fn test_typing_waits_for_commit() {
    let model = type_query(create_test_model(), "playlist");
    assert_eq!(model.page.search_value(), "playlist");
    assert_eq!(model.view, ViewState::Default);
    assert!(model.last_outcome.is_none());

    let model = update(model, Message::SearchCommit);
    assert_eq!(
        model.view,
        ViewState::Search {
            query: "playlist".to_string(),
            matches: 3,
        }
    );
    let text = flow_text(&model);
    assert!(text.contains("create_Playlist"));
    assert!(text.contains("list_playlist_items"));
    assert!(!text.contains("search_videos"));
    assert!(model.flow.lines().iter().any(|line| line.framed));
}

#[test]
fn test_commit_uses_normalized_query() {
    let model = type_query(create_test_model(), "  VIDEO ");
    let model = update(model, Message::SearchCommit);
    assert_eq!(
        model.view,
        ViewState::Search {
            query: "video".to_string(),
            matches: 4,
        }
    );
}

#[test]
fn test_zero_matches_enters_no_results() {
    let model = type_query(create_test_model(), "zzz-no-match");
    let model = update(model, Message::SearchCommit);
    assert_eq!(
        model.view,
        ViewState::NoResults {
            query: "zzz-no-match".to_string()
        }
    );
    let text = flow_text(&model);
    assert!(text.contains("No results found for \u{201c}zzz-no-match\u{201d}"));
    assert!(!text.contains("YouTube API client"));
}

#[test]
fn test_escape_in_search_field_resets_page() {
    let model = type_query(create_test_model(), "playlist");
    let model = send(model, [Message::SearchCommit, Message::Escape]);
    assert_eq!(model.view, ViewState::Default);
    assert_eq!(model.page.search_value(), "");
    assert!(model.last_outcome.is_none());
    assert!(model.page.search_focused());

    let text = flow_text(&model);
    assert!(text.contains("YouTube API client"));
    assert!(!text.contains("create_Playlist"));
    assert!(model.flow.lines().iter().all(|line| !line.framed));
}

#[test]
fn test_escape_outside_search_field_does_nothing() {
    let model = type_query(create_test_model(), "video");
    let model = send(model, [Message::SearchCommit, Message::BlurSearch, Message::Escape]);
    assert!(matches!(model.view, ViewState::Search { .. }));
    assert_eq!(model.page.search_value(), "video");
}

#[test]
fn test_focus_search_selects_existing_query() {
    let model = type_query(create_test_model(), "video");
    let model = send(model, [Message::BlurSearch, Message::FocusSearch]);
    assert!(model.page.search_selected());

    let model = update(model, Message::SearchInsert('x'));
    assert_eq!(model.page.search_value(), "x");
}

#[test]
fn test_nav_click_keeps_search_text() {
    let model = type_query(create_test_model(), "video");
    let model = send(model, [Message::SearchCommit, Message::NavClick(0)]);
    assert_eq!(model.view, ViewState::Category("basic".to_string()));
    assert_eq!(model.page.search_value(), "video");
}

#[test]
fn test_switch_focus_toggles_pane() {
    let model = update(create_test_model(), Message::SwitchFocus);
    assert_eq!(model.pane, Pane::Nav);
    let model = update(model, Message::SwitchFocus);
    assert_eq!(model.pane, Pane::Content);

    let hidden = create_test_model().with_nav_visible(false);
    let hidden = update(hidden, Message::SwitchFocus);
    assert_eq!(hidden.pane, Pane::Content);
}

#[test]
fn test_resize_reflows_to_new_width() {
    let model = create_test_model();
    let wide_lines = model.flow.line_count();
    let model = update(model, Message::Resize(40, 20));
    assert_eq!(model.viewport.width(), 40);
    assert_eq!(model.viewport.height(), crate::ui::content_height(20));
    assert!(model.flow.line_count() >= wide_lines);
}

#[test]
fn test_quit_sets_flag() {
    let model = update(create_test_model(), Message::Quit);
    assert!(model.should_quit);
}

#[test]
fn test_ctrl_and_cmd_k_focus_search() {
    let model = create_test_model();
    let ctrl = KeyEvent::new(KeyCode::Char('k'), KeyModifiers::CONTROL);
    let cmd = KeyEvent::new(KeyCode::Char('k'), KeyModifiers::SUPER);
    assert_eq!(App::handle_key(ctrl, &model), Some(Message::FocusSearch));
    assert_eq!(App::handle_key(cmd, &model), Some(Message::FocusSearch));

    let focused = update(model, Message::FocusSearch);
    assert_eq!(App::handle_key(ctrl, &focused), Some(Message::FocusSearch));
}

#[test]
fn test_keys_inside_search_field_edit_text() {
    let model = update(create_test_model(), Message::FocusSearch);
    assert_eq!(
        App::handle_key(key(KeyCode::Char('q')), &model),
        Some(Message::SearchInsert('q'))
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Char('/')), &model),
        Some(Message::SearchInsert('/'))
    );
    assert_eq!(App::handle_key(key(KeyCode::Esc), &model), Some(Message::Escape));
    assert_eq!(
        App::handle_key(key(KeyCode::Enter), &model),
        Some(Message::SearchCommit)
    );
    assert_eq!(App::handle_key(key(KeyCode::Tab), &model), Some(Message::BlurSearch));
    assert_eq!(
        App::handle_key(key(KeyCode::Backspace), &model),
        Some(Message::SearchBackspace)
    );
}

#[test]
fn test_keys_outside_search_field() {
    let model = create_test_model();
    assert_eq!(App::handle_key(key(KeyCode::Char('q')), &model), Some(Message::Quit));
    assert_eq!(
        App::handle_key(key(KeyCode::Char('/')), &model),
        Some(Message::FocusSearch)
    );
    assert_eq!(App::handle_key(key(KeyCode::Esc), &model), None);
    assert_eq!(
        App::handle_key(key(KeyCode::Char('j')), &model),
        Some(Message::ScrollDown(1))
    );

    let nav = update(model, Message::SwitchFocus);
    assert_eq!(App::handle_key(key(KeyCode::Char('j')), &nav), Some(Message::NavDown));
    assert_eq!(App::handle_key(key(KeyCode::Enter), &nav), Some(Message::NavSelect));
    let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
    assert_eq!(App::handle_key(ctrl_c, &nav), Some(Message::Quit));
}

#[test]
fn test_click_in_nav_activates_entry() {
    let model = create_test_model();
    // 100x40: search bar rows 0..3, nav border at row 3, first entry at row 4.
    let click = MouseEvent {
        kind: MouseEventKind::Up(MouseButton::Left),
        column: 5,
        row: 5,
        modifiers: KeyModifiers::NONE,
    };
    assert_eq!(App::handle_mouse(click, &model), Some(Message::NavClick(1)));

    let on_border = MouseEvent { row: 3, ..click };
    assert_eq!(App::handle_mouse(on_border, &model), None);

    let on_search = MouseEvent { row: 1, ..click };
    assert_eq!(App::handle_mouse(on_search, &model), Some(Message::ClickSearch));
}

#[test]
fn test_click_in_search_focuses_without_selecting() {
    let model = type_query(create_test_model(), "video");
    let model = send(model, [Message::BlurSearch, Message::ClickSearch]);
    assert!(model.page.search_focused());
    assert!(!model.page.search_selected());

    let model = update(model, Message::SearchInsert('s'));
    assert_eq!(model.page.search_value(), "videos");
}

#[test]
fn test_follow_anchor_scrolls_to_target() {
    let page = Page::attach(parse_html(FIXTURE).unwrap());
    let model = Model::new(PathBuf::from("reference.html"), page, (60, 8));
    assert_eq!(model.viewport.visible_range().start, 0);

    let model = update(model, Message::FollowAnchor("usage-notes".to_string()));
    let target = model.page.dom().by_id("usage-notes").unwrap();
    let line = model.flow.line_of(target).unwrap();
    assert!(line > 0);
    assert!(model.viewport.visible_range().contains(&line));
    assert!(model.flow.lines()[line..]
        .iter()
        .find(|line| !line.is_blank())
        .is_some_and(|line| line.text() == "Usage notes"));
}

#[test]
fn test_follow_anchor_to_missing_or_hidden_target_does_nothing() {
    let page = Page::attach(parse_html(FIXTURE).unwrap());
    let model = Model::new(PathBuf::from("reference.html"), page, (60, 8));
    let model = update(model, Message::ScrollDown(2));
    let offset = model.viewport.visible_range().start;

    let model = update(model, Message::FollowAnchor("nowhere".to_string()));
    assert_eq!(model.viewport.visible_range().start, offset);

    // Sections other than the intro are hidden in the default view.
    let model = update(model, Message::FollowAnchor("playlist".to_string()));
    assert_eq!(model.viewport.visible_range().start, offset);
    assert_eq!(model.view, ViewState::Default);
}

#[test]
fn test_link_keys_select_and_follow() {
    let page = Page::attach(parse_html(FIXTURE).unwrap());
    let model = Model::new(PathBuf::from("reference.html"), page, (60, 8));
    assert_eq!(App::handle_key(key(KeyCode::Char(']')), &model), Some(Message::NextLink));
    assert_eq!(App::handle_key(key(KeyCode::Char('[')), &model), Some(Message::PrevLink));
    assert_eq!(App::handle_key(key(KeyCode::Enter), &model), Some(Message::FollowLink));

    let model = update(model, Message::FollowLink);
    assert_eq!(model.viewport.visible_range().start, 0, "nothing selected yet");

    let model = update(model, Message::NextLink);
    let link = model.selected_link().unwrap();
    assert_eq!(model.page.dom().attr(link, "href"), Some("#usage-notes"));

    let model = update(model, Message::FollowLink);
    let target = model.page.dom().by_id("usage-notes").unwrap();
    let line = model.flow.line_of(target).unwrap();
    assert!(model.viewport.visible_range().contains(&line));
}

#[test]
fn test_link_cursor_wraps_and_resets_on_relayout() {
    let model = create_test_model();
    let count = model.flow.links().len();
    assert_eq!(count, 1);

    let model = send(model, [Message::PrevLink]);
    assert_eq!(model.link_cursor, Some(count - 1));
    let model = send(model, [Message::NextLink]);
    assert_eq!(model.link_cursor, Some(0));

    let model = update(model, Message::NavClick(0));
    assert_eq!(model.link_cursor, None);
    assert!(model.flow.links().is_empty());
    let model = update(model, Message::NextLink);
    assert_eq!(model.link_cursor, None);
}

#[test]
fn test_click_on_content_link_follows_it() {
    let model = create_test_model();
    let layout = crate::ui::screen_layout(crate::ui::screen_area(&model), model.nav_visible);
    let link = model.flow.links()[0];
    let line = &model.flow.lines()[link.line];
    let before: usize = line
        .spans
        .iter()
        .take_while(|span| span.link != Some(link.anchor))
        .map(|span| span.text.len())
        .sum();
    let column = layout.content.x
        + crate::ui::DOCUMENT_LEFT_PADDING
        + line.indent
        + u16::try_from(before).unwrap();
    let row = layout.content.y + u16::try_from(link.line).unwrap();

    let click = MouseEvent {
        kind: MouseEventKind::Up(MouseButton::Left),
        column,
        row,
        modifiers: KeyModifiers::NONE,
    };
    assert_eq!(
        App::handle_mouse(click, &model),
        Some(Message::FollowAnchor("usage-notes".to_string()))
    );

    let plain = MouseEvent {
        column: layout.content.x + crate::ui::DOCUMENT_LEFT_PADDING,
        ..click
    };
    assert_eq!(App::handle_mouse(plain, &model), None);
}

#[test]
fn test_resize_event_is_debounced() {
    let model = create_test_model();
    let mut resize: Debouncer<(u16, u16)> = Debouncer::new(100);
    let msg = App::handle_event(&Event::Resize(120, 50), &model, 10, &mut resize);
    assert_eq!(msg, None);
    assert_eq!(resize.take_ready(50), None);
    assert_eq!(resize.take_ready(110), Some((120, 50)));
}

#[test]
fn test_debounced_search_fires_after_quiet_period() {
    let mut model = update(create_test_model(), Message::FocusSearch);
    let mut search: Debouncer<()> = Debouncer::new(300);

    App::dispatch(&mut model, &mut search, Message::SearchInsert('v'), 0);
    App::dispatch(&mut model, &mut search, Message::SearchInsert('i'), 200);
    assert!(!App::fire_ready_search(&mut model, &mut search, 400));
    assert_eq!(model.view, ViewState::Default);

    assert!(App::fire_ready_search(&mut model, &mut search, 500));
    assert!(matches!(model.view, ViewState::Search { ref query, .. } if query == "vi"));
    assert!(!search.is_pending());
}

#[test]
fn test_enter_flushes_and_escape_cancels_debounce() {
    let mut model = update(create_test_model(), Message::FocusSearch);
    let mut search: Debouncer<()> = Debouncer::new(300);

    App::dispatch(&mut model, &mut search, Message::SearchInsert('v'), 0);
    App::dispatch(&mut model, &mut search, Message::SearchCommit, 10);
    assert!(!search.is_pending());
    assert!(matches!(model.view, ViewState::Search { .. }));

    App::dispatch(&mut model, &mut search, Message::SearchInsert('x'), 20);
    App::dispatch(&mut model, &mut search, Message::Escape, 30);
    assert!(!search.is_pending());
    assert!(!App::fire_ready_search(&mut model, &mut search, 1_000));
    assert_eq!(model.view, ViewState::Default);
}

#[test]
fn test_prepare_model_applies_category_then_search() {
    let page = Page::attach(parse_html(FIXTURE).unwrap());
    let app = App::new(PathBuf::from("reference.html")).with_category(Some("helper".to_string()));
    let model = app.prepare_model(page, (80, 24));
    assert_eq!(model.view, ViewState::Category("helper".to_string()));
    assert_eq!(model.nav_cursor, 6);

    let page = Page::attach(parse_html(FIXTURE).unwrap());
    let app = App::new(PathBuf::from("reference.html"))
        .with_category(Some("helper".to_string()))
        .with_search(Some("duration".to_string()));
    let model = app.prepare_model(page, (80, 24));
    assert_eq!(
        model.view,
        ViewState::Search {
            query: "duration".to_string(),
            matches: 1,
        }
    );
}

#[test]
fn test_prepare_model_ignores_unknown_category() {
    let page = Page::attach(parse_html(FIXTURE).unwrap());
    let app = App::new(PathBuf::from("reference.html")).with_category(Some("nope".to_string()));
    let model = app.prepare_model(page, (80, 24));
    assert_eq!(model.view, ViewState::Default);
}

#[test]
fn test_load_model_reports_missing_file() {
    let app = App::new(PathBuf::from("/definitely/not/here.html"));
    let err = app.load_model((80, 24)).unwrap_err();
    assert!(err.to_string().contains("Failed to read"));
}

#[test]
fn test_view_state_labels() {
    assert_eq!(ViewState::Default.label(), "Overview");
    assert_eq!(
        ViewState::Search {
            query: "video".to_string(),
            matches: 1
        }
        .label(),
        "\u{201c}video\u{201d}: 1 method"
    );
}
