// Test the rich text controller against the fixed-advance layout
//
// With the default font (size 16), MonoLayout advances 8 units per char and
// lines are 20 units tall.

use kas_text_overlay::layout::MonoLayout;
use kas_text_overlay::util::replace_range;
use kas_text_overlay::{
    Color, DisplayState, EditDecision, HighlightKind, HighlightKinds, NotConfigured, Range,
    RichText, Size, TapTarget, Vec2,
};
use std::sync::{Arc, Mutex};

/// Records callback invocations
#[derive(Clone, Debug, Default)]
struct Log(Arc<Mutex<Vec<String>>>);

impl Log {
    fn push(&self, event: impl Into<String>) {
        self.0.lock().unwrap().push(event.into());
    }

    fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }
}

fn recorded(rt: &mut RichText) -> Log {
    let log = Log::default();
    let l = log.clone();
    rt.on_composing_started(move || l.push("started"));
    let l = log.clone();
    rt.on_composing_progress(move |s| l.push(format!("progress:{s}")));
    let l = log.clone();
    rt.on_composing_finished(move |s| l.push(format!("finished:{s}")));
    let l = log.clone();
    rt.on_tap_highlight(move |s| l.push(format!("tap:{s}")));
    let l = log.clone();
    rt.on_tap_normal_text(move || l.push("tap-normal"));
    let l = log.clone();
    rt.on_wrap(move || l.push("wrap"));
    let l = log.clone();
    rt.on_unwrap(move || l.push("unwrap"));
    let l = log.clone();
    rt.on_mention_requested(move || l.push("mention"));
    let l = log.clone();
    rt.on_return(move || l.push("return"));
    let l = log.clone();
    rt.on_reached_character_limit(move || l.push("char-limit"));
    let l = log.clone();
    rt.on_reached_line_limit(move || l.push("line-limit"));
    log
}

/// Apply any pending rendering, as a host would
fn apply(rt: &mut RichText) {
    if rt.take_render().is_some() {
        rt.render_applied();
    }
}

/// Type `s` char by char at the caret
fn type_str(rt: &mut RichText, s: &str) {
    for c in s.chars() {
        let caret = rt.selection().start();
        let range = Range::new(caret, caret);
        let replacement = c.to_string();
        if rt.text_will_change(range, &replacement) == EditDecision::Allow {
            let text = replace_range(rt.text(), range, &replacement);
            let caret = caret + c.len_utf16();
            rt.text_did_change(text, Range::new(caret, caret));
        }
        apply(rt);
    }
}

fn editor(kinds: HighlightKinds) -> RichText {
    let mut rt = RichText::editor(MonoLayout::default());
    rt.set_highlight_kinds(kinds);
    apply(&mut rt);
    rt
}

fn color_at(rt: &RichText, index: usize) -> Option<Color> {
    rt.rendered().style_at(index).and_then(|style| style.color)
}

#[test]
fn mention_is_highlighted() {
    let mut rt = RichText::label(MonoLayout::default());
    rt.set_highlight_kinds(HighlightKinds::ALL);
    rt.set_text("hi @bob how");

    let matches = rt.highlighted_matches();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].range, Range::new(3, 7));
    assert_eq!(rt.highlighted_texts(), vec!["@bob".to_string()]);

    assert_eq!(color_at(&rt, 2), Some(Color::BLACK));
    assert_eq!(color_at(&rt, 3), Some(Color::BLUE));
    assert_eq!(color_at(&rt, 6), Some(Color::BLUE));
    assert_eq!(color_at(&rt, 7), Some(Color::BLACK));

    let render = rt.take_render().unwrap();
    assert_eq!(render.text.as_str(), "hi @bob how");
    assert_eq!(render.selection, Range::new(11, 11));
    assert!(rt.is_updating());
    rt.render_applied();
    assert!(!rt.is_updating());
}

#[test]
fn composing_a_topic() {
    let mut rt = editor(HighlightKind::Topic.into());
    let log = recorded(&mut rt);
    let changed = Log::default();
    let c = changed.clone();
    rt.on_text_changed(move |s| c.push(s));

    type_str(&mut rt, "#swift ");
    assert_eq!(
        log.take(),
        [
            "started",
            "progress:s",
            "progress:sw",
            "progress:swi",
            "progress:swif",
            "progress:swift",
            "finished:swift",
        ]
    );
    assert!(!rt.is_composing());
    assert_eq!(rt.text(), "#swift ");
    assert_eq!(rt.highlighted_texts(), vec!["#swift".to_string()]);
    assert_eq!(changed.take().last().map(String::as_str), Some("#swift "));
}

#[test]
fn replace_composing_token() {
    let mut rt = editor(HighlightKind::Topic.into());
    let log = recorded(&mut rt);
    type_str(&mut rt, "hey #sw");
    assert!(rt.is_composing());
    log.take();

    rt.replace_composing_token("swift");
    apply(&mut rt);
    assert_eq!(rt.text(), "hey #swift ");
    assert_eq!(rt.selection(), Range::new(11, 11));
    assert_eq!(log.take(), ["finished:swift"]);
    assert!(!rt.is_composing());
}

#[test]
fn moving_caret_before_anchor_finishes() {
    let mut rt = editor(HighlightKind::Topic.into());
    let log = recorded(&mut rt);
    type_str(&mut rt, "a #b");
    log.take();

    rt.selection_did_change(Range::new(1, 1));
    assert_eq!(log.take(), ["finished:"]);
    assert!(!rt.is_composing());
}

#[test]
fn truncation_and_markers() {
    let mut rt = RichText::label(MonoLayout::default());
    let log = recorded(&mut rt);
    rt.update_env(|env| {
        env.set_auto_wrap_line_count(2);
        env.set_tap_enabled(true);
    });
    rt.set_size(Size::new(160.0, 100.0));

    // three lines at width 160
    let text = "aaaa bbbb cccc dddd eeee ffff gggg hhhh iiii jjjj";
    rt.set_text(text);
    apply(&mut rt);
    assert_eq!(rt.display_state(), DisplayState::Truncated);
    assert_eq!(rt.text(), "aaaa bbbb cccc dddd eeee ffff g... More");
    assert_eq!(rt.source(), text);
    assert_eq!(color_at(&rt, 36), Some(Color::BLUE));

    // text height is 40; the label centres it at y = 30
    // char 36 ('o' of "More") is at x = 128..136 on the second line
    assert_eq!(rt.tap(Vec2(132.0, 60.0)), Some(TapTarget::Unwrap));
    assert_eq!(log.take(), ["unwrap"]);
    assert_eq!(rt.display_state(), DisplayState::Expanded);
    assert_eq!(rt.text(), format!("{text} Hide"));
    apply(&mut rt);

    // " Hide" is at 49..54; its label at 50..54
    assert_eq!(rt.tap_offset(51), TapTarget::Wrap);
    assert_eq!(log.take(), ["wrap"]);
    assert_eq!(rt.display_state(), DisplayState::Truncated);
    assert_eq!(rt.text(), "aaaa bbbb cccc dddd eeee ffff g... More");

    // the "... " prefix is not tappable
    assert_eq!(rt.tap_offset(32), TapTarget::Normal);
    assert_eq!(log.take(), ["tap-normal"]);
}

#[test]
fn unknown_width_never_truncates() {
    let mut rt = RichText::label(MonoLayout::default());
    rt.update_env(|env| env.set_auto_wrap_line_count(1));
    rt.set_text("aaaa bbbb cccc dddd eeee ffff gggg hhhh iiii jjjj");
    assert_eq!(rt.display_state(), DisplayState::Normal);
    assert_eq!(rt.text(), rt.source());
}

#[test]
fn short_text_is_not_clamped() {
    let mut rt = RichText::label(MonoLayout::default());
    rt.update_env(|env| env.set_auto_wrap_line_count(2));
    rt.set_size(Size::new(160.0, 100.0));
    rt.set_text("short");
    assert_eq!(rt.display_state(), DisplayState::Normal);
    assert_eq!(rt.text(), "short");

    rt.unwrap();
    assert_eq!(rt.display_state(), DisplayState::Normal);
    rt.wrap();
    assert_eq!(rt.display_state(), DisplayState::Normal);
}

#[test]
fn resize_rerenders() {
    let mut rt = RichText::label(MonoLayout::default());
    rt.update_env(|env| env.set_auto_wrap_line_count(1));
    rt.set_text("aaaa bbbb cccc dddd");
    assert_eq!(rt.display_state(), DisplayState::Normal);

    rt.set_size(Size::new(80.0, 40.0));
    assert_eq!(rt.display_state(), DisplayState::Truncated);
    assert!(rt.text().ends_with("... More"));

    rt.set_size(Size::new(400.0, 40.0));
    assert_eq!(rt.display_state(), DisplayState::Normal);
    assert_eq!(rt.text(), "aaaa bbbb cccc dddd");
}

#[test]
fn extra_ranges() {
    let mut rt = RichText::label(MonoLayout::default());
    let log = recorded(&mut rt);
    rt.update_env(|env| env.set_tap_enabled(true));
    rt.set_text("hi there");
    rt.set_extra_ranges(vec![Range::new(0, 2), Range::new(6, 40)]);

    assert_eq!(rt.highlighted_texts(), vec!["hi".to_string(), "re".to_string()]);
    assert_eq!(color_at(&rt, 1), Some(Color::BLUE));
    assert_eq!(color_at(&rt, 2), Some(Color::BLACK));

    assert_eq!(rt.tap_offset(1), TapTarget::Highlight("hi".into()));
    assert_eq!(rt.tap_offset(2), TapTarget::Normal);
    assert_eq!(log.take(), ["tap:hi", "tap-normal"]);
}

#[test]
fn extra_pattern() {
    let mut rt = RichText::label(MonoLayout::default());
    rt.set_extra_pattern(r"\d+").unwrap();
    rt.set_text("call 555 now");
    assert_eq!(rt.highlighted_texts(), vec!["555".to_string()]);

    let rendered = rt.rendered().clone();
    assert!(rt.set_extra_pattern("(").is_err());
    assert_eq!(rt.extra_pattern(), r"\d+");
    assert_eq!(rt.highlighted_texts(), vec!["555".to_string()]);
    assert_eq!(rt.rendered(), &rendered);
}

#[test]
fn render_is_idempotent() {
    let mut rt = RichText::label(MonoLayout::default());
    assert_eq!(rt.render().err(), Some(NotConfigured));

    rt.set_highlight_kinds(HighlightKinds::ALL);
    rt.update_env(|env| env.set_auto_wrap_line_count(2));
    rt.set_size(Size::new(120.0, 60.0));
    rt.set_text("see https://example.com and #rust for @ann and more words here");
    let first = rt.render().unwrap().clone();
    let state = rt.display_state();
    let second = rt.render().unwrap().clone();
    assert_eq!(first, second);
    assert_eq!(state, rt.display_state());
}

#[test]
fn disabling_highlight_strips_styles() {
    let mut rt = RichText::label(MonoLayout::default());
    rt.set_highlight_kinds(HighlightKinds::ALL);
    rt.set_text("hi @bob");
    apply(&mut rt);
    assert_eq!(color_at(&rt, 4), Some(Color::BLUE));

    rt.set_highlight_kinds(HighlightKinds::NONE);
    let render = rt.take_render().unwrap();
    assert_eq!(render.text.as_str(), "hi @bob");
    assert_eq!(color_at(&rt, 4), Some(Color::BLACK));
}

#[test]
fn deletion_removes_whole_mention() {
    let mut rt = editor(HighlightKinds::ALL);
    let changed = Log::default();
    let c = changed.clone();
    rt.on_text_changed(move |s| c.push(s));
    rt.set_text("hi @bob how");
    apply(&mut rt);
    changed.take();

    assert_eq!(
        rt.text_will_change(Range::new(5, 6), ""),
        EditDecision::Handled
    );
    assert_eq!(rt.text(), "hi  how");
    assert_eq!(rt.selection(), Range::new(3, 3));
    assert_eq!(changed.take(), ["hi  how"]);
    apply(&mut rt);

    // plain text deletes normally
    assert_eq!(rt.text_will_change(Range::new(0, 1), ""), EditDecision::Allow);
}

#[test]
fn caret_snaps_out_of_mention() {
    let mut rt = editor(HighlightKinds::ALL);
    rt.set_text("hi @bob how");
    apply(&mut rt);
    assert_eq!(rt.selection_did_change(Range::new(5, 5)), Range::new(8, 8));
    assert_eq!(rt.selection_did_change(Range::new(3, 3)), Range::new(3, 3));
    assert_eq!(rt.selection_did_change(Range::new(4, 6)), Range::new(4, 6));
}

#[test]
fn edit_rules() {
    let mut rt = editor(HighlightKinds::ALL);
    let log = recorded(&mut rt);

    assert_eq!(rt.text_will_change(Range::new(0, 0), "@"), EditDecision::Deny);
    assert_eq!(log.take(), ["mention"]);

    assert_eq!(rt.text_will_change(Range::new(0, 0), "\n"), EditDecision::Allow);
    rt.update_env(|env| env.set_allow_newline(false));
    assert_eq!(rt.text_will_change(Range::new(0, 0), "\n"), EditDecision::Deny);
    assert_eq!(log.take(), ["return", "return"]);

    rt.on_should_change_text(|_, replacement| replacement != "x");
    assert_eq!(rt.text_will_change(Range::new(0, 0), "x"), EditDecision::Deny);
    assert_eq!(rt.text_will_change(Range::new(0, 0), "y"), EditDecision::Allow);

    rt.on_should_begin_editing(|| false);
    assert!(!rt.should_begin_editing());
}

#[test]
fn limits() {
    let mut rt = RichText::editor(MonoLayout::default());
    let log = recorded(&mut rt);
    rt.update_env(|env| {
        env.set_text_limit_count(5);
        env.set_text_limit_line(1);
    });
    rt.set_size(Size::new(80.0, 100.0));

    rt.text_did_change("abcdefg", Range::new(7, 7));
    assert_eq!(rt.text(), "abcde");
    assert_eq!(rt.selection(), Range::new(5, 5));
    assert_eq!(log.take(), ["char-limit"]);

    // a trailing line break counts as a line
    assert_eq!(rt.text_will_change(Range::new(5, 5), "\n"), EditDecision::Deny);
    assert_eq!(log.take(), ["return", "line-limit"]);
}

#[test]
fn marked_text_passes_through() {
    let mut rt = editor(HighlightKinds::ALL);
    let log = recorded(&mut rt);
    rt.set_marked_text(true);
    assert_eq!(rt.text_will_change(Range::new(0, 0), "@"), EditDecision::Allow);
    rt.text_did_change("@", Range::new(1, 1));
    assert!(rt.take_render().is_none());
    assert!(log.take().is_empty());
    rt.set_marked_text(false);
}

#[test]
fn disabled_taps() {
    let mut label = RichText::label(MonoLayout::default());
    let log = recorded(&mut label);
    label.set_highlight_kinds(HighlightKinds::ALL);
    label.set_text("@bob");
    assert_eq!(label.tap(Vec2(4.0, 10.0)), Some(TapTarget::Normal));
    assert_eq!(log.take(), ["tap-normal"]);

    let mut view = editor(HighlightKinds::ALL);
    view.set_text("@bob");
    assert_eq!(view.tap(Vec2(4.0, 10.0)), None);
}

#[test]
fn editor_tap_includes_end() {
    let mut rt = editor(HighlightKinds::ALL);
    let log = recorded(&mut rt);
    rt.update_env(|env| env.set_tap_enabled(true));
    rt.set_size(Size::new(200.0, 100.0));
    rt.set_text("hi @bob how");
    apply(&mut rt);

    // nearest caret to x = 57 is 7, the end of "@bob"
    assert_eq!(rt.tap(Vec2(57.0, 10.0)), Some(TapTarget::Highlight("@bob".into())));
    assert_eq!(rt.tap(Vec2(84.0, 10.0)), Some(TapTarget::Normal));
    // far below the text
    assert_eq!(rt.tap(Vec2(30.0, 90.0)), Some(TapTarget::Normal));
    assert_eq!(log.take(), ["tap:@bob", "tap-normal", "tap-normal"]);
}

#[test]
fn edits_while_clamped_keep_the_source() {
    let mut rt = RichText::editor(MonoLayout::default());
    rt.update_env(|env| env.set_auto_wrap_line_count(1));
    rt.set_size(Size::new(160.0, 100.0));
    let text = "aaaa bbbb cccc dddd eeee ffff";
    rt.set_text(text);
    apply(&mut rt);
    assert_eq!(rt.display_state(), DisplayState::Truncated);
    assert_eq!(rt.text(), "aaaa bbbb c... More");

    // typing before the cut edits the source; the hidden tail survives
    rt.selection_did_change(Range::new(0, 0));
    type_str(&mut rt, "x");
    let text = "xaaaa bbbb cccc dddd eeee ffff";
    assert_eq!(rt.source(), text);
    assert_eq!(rt.selection(), Range::new(1, 1));
    assert_eq!(rt.display_state(), DisplayState::Truncated);
    assert!(rt.text().ends_with("... More"));
    assert_eq!(rt.text().matches("... More").count(), 1);

    // deleting part of the marker leaves the source alone
    let len = rt.rendered().len();
    let range = Range::new(len - 4, len);
    assert_eq!(rt.text_will_change(range, ""), EditDecision::Allow);
    let chopped = replace_range(rt.text(), range, "");
    rt.text_did_change(chopped, Range::new(len - 4, len - 4));
    apply(&mut rt);
    assert_eq!(rt.source(), text);
    assert!(rt.text().ends_with("... More"));

    rt.set_size(Size::new(1000.0, 100.0));
    apply(&mut rt);
    assert_eq!(rt.display_state(), DisplayState::Normal);
    assert_eq!(rt.text(), text);

    // typing at the end of the source while expanded
    rt.set_size(Size::new(160.0, 100.0));
    apply(&mut rt);
    rt.unwrap();
    apply(&mut rt);
    assert_eq!(rt.text(), format!("{text} Hide"));
    rt.selection_did_change(Range::new(30, 30));
    type_str(&mut rt, "z");
    assert_eq!(rt.source(), "xaaaa bbbb cccc dddd eeee ffffz");
    assert_eq!(rt.selection(), Range::new(31, 31));

    // text typed after the marker lands at the end of the source
    rt.unwrap();
    apply(&mut rt);
    let end = rt.rendered().len();
    rt.selection_did_change(Range::new(end, end));
    type_str(&mut rt, "!");
    assert_eq!(rt.source(), "xaaaa bbbb cccc dddd eeee ffffz!");
    assert!(!rt.source().contains("Hide"));
}

#[test]
fn insert_while_truncated_keeps_the_tail() {
    let mut rt = RichText::editor(MonoLayout::default());
    rt.update_env(|env| env.set_auto_wrap_line_count(1));
    rt.set_size(Size::new(160.0, 100.0));
    rt.set_text("aaaa bbbb cccc dddd eeee ffff");
    apply(&mut rt);
    assert_eq!(rt.display_state(), DisplayState::Truncated);

    rt.selection_did_change(Range::new(5, 5));
    rt.insert_text("yy ");
    assert_eq!(rt.source(), "aaaa yy bbbb cccc dddd eeee ffff");
    assert_eq!(rt.selection(), Range::new(8, 8));
}

#[test]
fn hidden_highlights_are_not_tappable() {
    let mut rt = RichText::label(MonoLayout::default());
    let log = recorded(&mut rt);
    rt.set_highlight_kinds(HighlightKinds::ALL);
    rt.update_env(|env| {
        env.set_auto_wrap_line_count(1);
        env.set_tap_enabled(true);
    });
    rt.set_size(Size::new(160.0, 100.0));
    rt.set_text("@al bbbb cc @bob eeee ffff");
    apply(&mut rt);
    assert_eq!(rt.display_state(), DisplayState::Truncated);
    assert!(rt.text().ends_with("... More"));
    log.take();

    // "@bob" starts at 12 in the source, behind the "... " of the marker
    assert_eq!(rt.tap_offset(12), TapTarget::Normal);
    assert_eq!(rt.tap_offset(1), TapTarget::Highlight("@al".into()));
    assert_eq!(log.take(), ["tap-normal", "tap:@al"]);
}

#[test]
fn unwrap_needs_clamping() {
    let mut rt = RichText::label(MonoLayout::default());
    rt.set_highlight_kinds(HighlightKinds::ALL);
    rt.set_text("aaaa bbbb cccc dddd eeee ffff");
    apply(&mut rt);

    rt.unwrap();
    assert_eq!(rt.display_state(), DisplayState::Normal);
    apply(&mut rt);

    rt.update_env(|env| env.set_auto_wrap_line_count(1));
    rt.set_size(Size::new(1000.0, 100.0));
    apply(&mut rt);
    assert_eq!(rt.display_state(), DisplayState::Normal);
    assert_eq!(rt.text(), "aaaa bbbb cccc dddd eeee ffff");
}

#[test]
fn astral_chars_before_a_mention() {
    let mut rt = editor(HighlightKinds::ALL);
    let log = recorded(&mut rt);
    rt.update_env(|env| env.set_tap_enabled(true));
    // U+1F600 takes two UTF-16 units: "@bob" is at 3..7
    rt.set_text("😀 @bob x");
    apply(&mut rt);
    let matches = rt.highlighted_matches();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].range, Range::new(3, 7));
    assert_eq!(color_at(&rt, 3), Some(Color::BLUE));
    assert_eq!(color_at(&rt, 2), Some(Color::BLACK));

    assert_eq!(rt.tap_offset(4), TapTarget::Highlight("@bob".into()));
    assert_eq!(rt.tap_offset(7), TapTarget::Highlight("@bob".into()));
    assert_eq!(rt.tap_offset(1), TapTarget::Normal);
    assert_eq!(log.take(), ["tap:@bob", "tap:@bob", "tap-normal"]);

    assert_eq!(rt.selection_did_change(Range::new(5, 5)), Range::new(8, 8));

    assert_eq!(
        rt.text_will_change(Range::new(5, 6), ""),
        EditDecision::Handled
    );
    assert_eq!(rt.text(), "😀  x");
    assert_eq!(rt.selection(), Range::new(3, 3));
}

#[test]
fn deleting_the_marker_spares_a_mention_before_it() {
    let mut rt = RichText::editor(MonoLayout::default());
    rt.set_highlight_kinds(HighlightKinds::ALL);
    rt.update_env(|env| env.set_auto_wrap_line_count(1));
    rt.set_size(Size::new(160.0, 100.0));
    let text = "aaaa bb @cc dddd eeee ffff gggg";
    rt.set_text(text);
    apply(&mut rt);
    assert_eq!(rt.text(), "aaaa bb @cc... More");

    let range = Range::new(15, 19);
    assert_eq!(rt.text_will_change(range, ""), EditDecision::Allow);
    let chopped = replace_range(rt.text(), range, "");
    rt.text_did_change(chopped, Range::new(15, 15));
    apply(&mut rt);
    assert_eq!(rt.source(), text);
    assert_eq!(rt.text(), "aaaa bb @cc... More");
}
