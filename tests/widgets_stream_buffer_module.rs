use loopwright::widgets::StreamBuffer;

const SAMPLE: &str = "alpha\r\nbeta\n\ngamma\r\ndelta";

fn split_at_every_boundary(text: &str) -> Vec<(String, String)> {
    text.char_indices()
        .map(|(idx, _)| idx)
        .chain(std::iter::once(text.len()))
        .map(|idx| (text[..idx].to_string(), text[idx..].to_string()))
        .collect()
}

#[test]
fn chunk_boundaries_do_not_change_the_lines() {
    let mut whole = StreamBuffer::new();
    whole.append_text(SAMPLE);
    assert_eq!(whole.lines(), &["alpha", "beta", "", "gamma", "delta"]);
    assert!(whole.last_line_open());

    for (head, tail) in split_at_every_boundary(SAMPLE) {
        let mut split = StreamBuffer::new();
        split.append_text(&head);
        split.append_text(&tail);
        assert_eq!(split.lines(), whole.lines(), "split after {head:?}");
        assert_eq!(split.last_line_open(), whole.last_line_open());
    }
}

#[test]
fn materialize_matches_set_content() {
    let mut streamed = StreamBuffer::new();
    for chunk in ["one\ntw", "o\nthr", "ee\n"] {
        streamed.append_text(chunk);
    }
    let mut replaced = StreamBuffer::new();
    replaced.set_content("one\ntwo\nthree\n");
    assert_eq!(streamed.materialize(), "one\ntwo\nthree");
    assert_eq!(replaced.materialize(), streamed.materialize());
    assert!(!streamed.last_line_open());
    assert!(!streamed.is_dirty());
}

#[test]
fn follow_tracks_new_output_until_the_user_scrolls() {
    let mut buffer = StreamBuffer::new();
    buffer.set_height(3);
    for idx in 0..10 {
        buffer.append_line(&format!("line {idx}"));
    }
    buffer.materialize();
    assert_eq!(buffer.offset(), 7);
    assert_eq!(buffer.visible_lines(), &["line 7", "line 8", "line 9"]);

    buffer.scroll_up(2);
    assert!(!buffer.auto_follow());
    buffer.append_line("line 10");
    buffer.materialize();
    assert_eq!(buffer.offset(), 5);

    buffer.page_down();
    assert_eq!(buffer.offset(), 8);
    assert!(buffer.auto_follow());
    buffer.append_line("line 11");
    buffer.materialize();
    assert_eq!(buffer.offset(), 9);
    assert_eq!(buffer.scroll_percent(), 100);
}

#[test]
fn goto_top_and_clear_reset_follow_state() {
    let mut buffer = StreamBuffer::new();
    buffer.set_height(2);
    buffer.append_text("a\nb\nc\nd\n");
    buffer.goto_top();
    assert_eq!(buffer.offset(), 0);
    assert!(!buffer.auto_follow());
    assert_eq!(buffer.scroll_percent(), 0);

    buffer.clear();
    assert!(buffer.auto_follow());
    assert_eq!(buffer.line_count(), 0);
    assert_eq!(buffer.materialize(), "");
    assert!(buffer.visible_lines().is_empty());
}
