use super::*;

fn cfg() -> TextConfig {
    TextConfig {
        font_size: 16.0,
        line_height: 20,
        margin_x: 10,
        bullet_indent: 24,
        bullet_size: 16,
        title_font_size: 24.0,
        title_line_height: 30,
        ..TextConfig::default()
    }
}

fn wrapped(raw: &str) -> TextLine {
    let mut line = TextLine::parse(raw);
    line.wrap(10_000.0, |s| crate::fonts::builtin::measure(s, 16.0));
    line
}

fn is_white(p: &image::Rgba<u8>) -> bool {
    p.0 == [255, 255, 255, 255]
}

#[test]
fn every_segment_advances_one_line() {
    let cfg = cfg();
    let body = GlyphSource::builtin(cfg.font_size);
    let title = GlyphSource::builtin(cfg.title_font_size);
    let block = TextBlock {
        cfg: &cfg,
        body: &body,
        title: &title,
        bottom_margin: 20,
    };
    let mut canvas = WorkingCanvas::new(400, 300, Rgba8::WHITE).unwrap();
    let mut ts = Typesetter::for_source(&body);
    let mut cursor = RenderCursor::new(10);
    let lines = vec![wrapped("√ hello"), wrapped("plain text"), wrapped("√")];

    let report = block.draw(&mut canvas, &mut ts, None, &lines, &mut cursor);
    assert_eq!(
        report,
        TextBlockReport {
            lines_drawn: 3,
            segments_drawn: 3,
            truncated: false
        }
    );
    assert_eq!(cursor.y(), 10 + 3 * 20);

    let img = canvas.trim(cursor.y(), 0).unwrap();
    let gutter_inked = (10..26u32).any(|x| (10..30u32).any(|y| !is_white(img.get_pixel(x, y))));
    assert!(gutter_inked, "first bullet mark missing");
    let plain_gutter_inked =
        (10..26u32).any(|x| (30..50u32).any(|y| !is_white(img.get_pixel(x, y))));
    assert!(plain_gutter_inked, "plain line text starts at the margin");
    let empty_bullet_inked = (10..26u32).any(|x| (50..70u32).any(|y| !is_white(img.get_pixel(x, y))));
    assert!(empty_bullet_inked, "empty bullet line still gets its mark");
}

#[test]
fn title_uses_its_own_line_height() {
    let cfg = cfg();
    let body = GlyphSource::builtin(cfg.font_size);
    let title_src = GlyphSource::builtin(cfg.title_font_size);
    let block = TextBlock {
        cfg: &cfg,
        body: &body,
        title: &title_src,
        bottom_margin: 0,
    };
    let mut canvas = WorkingCanvas::new(400, 300, Rgba8::WHITE).unwrap();
    let mut ts = Typesetter::for_source(&body);
    let mut cursor = RenderCursor::new(0);
    let title = wrapped("Featured");

    let report = block.draw(&mut canvas, &mut ts, Some(&title), &[wrapped("one")], &mut cursor);
    assert_eq!(report.lines_drawn, 2);
    assert_eq!(cursor.y(), 30 + 20);
}

#[test]
fn stops_when_the_working_canvas_is_full() {
    let cfg = cfg();
    let body = GlyphSource::builtin(cfg.font_size);
    let block = TextBlock {
        cfg: &cfg,
        body: &body,
        title: &body,
        bottom_margin: 20,
    };
    let mut canvas = WorkingCanvas::new(200, 100, Rgba8::WHITE).unwrap();
    let mut ts = Typesetter::for_source(&body);
    let mut cursor = RenderCursor::new(10);
    let lines: Vec<TextLine> = (0..5).map(|i| wrapped(&format!("line {i}"))).collect();

    let report = block.draw(&mut canvas, &mut ts, None, &lines, &mut cursor);
    assert!(report.truncated);
    assert_eq!(report.lines_drawn, 3);
    assert_eq!(cursor.y(), 70);
}
