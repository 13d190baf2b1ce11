//! Page-frame maintenance across scrolling, wrapping and mouse placement.

use core_model::EditorModel;
use core_render::RenderEngine;
use core_state::EditorState;
use core_text::Buffer;
use proptest::prelude::*;

fn numbered_lines(n: usize) -> String {
    (0..n).map(|i| format!("line {i}\n")).collect()
}

fn model(text: &str, cols: u16, text_rows: u16) -> EditorModel {
    let mut st = EditorState::new(Buffer::from_str("test", text).unwrap());
    // text rows + mode line + message line
    st.resize(cols, text_rows + 2);
    EditorModel::new(st)
}

fn assert_frame_holds_point(m: &EditorModel) {
    let b = m.state().current_buffer();
    assert!(
        b.page_start <= b.point() && b.point() <= b.page_end,
        "page_start={} point={} page_end={}",
        b.page_start,
        b.point(),
        b.page_end
    );
}

#[test]
fn jump_to_middle_of_long_buffer() {
    let mut m = model(&numbered_lines(100), 80, 10);
    let mut engine = RenderEngine::new();
    engine.compose(&mut m);
    let p50 = m.state().current_buffer().point_for_line(50);
    m.state_mut().current_buffer_mut().set_point(p50);
    let frame = engine.compose(&mut m);
    let b = m.state().current_buffer();
    assert!(b.page_start <= p50);
    assert_eq!(b.page_start, b.point_for_line(41));
    assert!(b.page_end < b.point_for_line(51));
    let (_, row) = frame.cursor.unwrap();
    assert!(row < 10);
    assert_eq!(row, 9);
    assert_frame_holds_point(&m);
}

#[test]
fn click_maps_into_rendered_window() {
    let mut m = model(&numbered_lines(20), 80, 10);
    let mut engine = RenderEngine::new();
    let p5 = m.state().current_buffer().point_for_line(5);
    {
        let b = m.state_mut().current_buffer_mut();
        b.set_point(p5);
        b.page_start = p5;
        b.page_end = b.point_for_line(15) - 1;
    }
    engine.compose(&mut m);
    assert_eq!(m.state().current_buffer().page_start, p5);
    m.set_point_for_mouse(3, 2);
    let b = m.state().current_buffer();
    assert_eq!(b.point(), b.point_for_line(7) + 3);
    let frame = engine.compose(&mut m);
    assert_eq!(frame.cursor, Some((3, 2)));
}

#[test]
fn page_motions_keep_point_visible() {
    let mut m = model(&numbered_lines(60), 20, 8);
    let mut engine = RenderEngine::new();
    engine.compose(&mut m);
    let metrics = m.row_metrics();
    for _ in 0..5 {
        core_text::motion::page_down(m.state_mut().current_buffer_mut(), metrics);
        engine.compose(&mut m);
        assert_frame_holds_point(&m);
    }
    for _ in 0..5 {
        core_text::motion::page_up(m.state_mut().current_buffer_mut(), 8, metrics);
        engine.compose(&mut m);
        assert_frame_holds_point(&m);
    }
    assert_eq!(m.state().current_buffer().page_start, 0);
}

proptest! {
    // Any point in any wrapped text ends up on screen after one display pass.
    #[test]
    fn any_point_is_framed(
        text in "[a-z \t\n]{0,300}",
        cols in 3u16..20,
        rows in 1u16..8,
        point_frac in 0.0f64..=1.0,
        start_frac in 0.0f64..=1.0,
    ) {
        let mut m = model(&text, cols, rows);
        {
            let b = m.state_mut().current_buffer_mut();
            let len = b.len();
            b.page_start = (len as f64 * start_frac) as usize;
            b.set_point((len as f64 * point_frac) as usize);
        }
        let frame = RenderEngine::new().compose(&mut m);
        let b = m.state().current_buffer();
        prop_assert!(b.page_start <= b.point() && b.point() <= b.page_end);
        let (_, row) = frame.cursor.unwrap();
        prop_assert!(row < rows);
    }
}
