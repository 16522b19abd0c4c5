//! Rasterizer properties checked against the per-pixel primitives.

use monoframe_core::{Bitmap, Canvas, Font, Ink, Pixel, XyBitmap, HEIGHT, WIDTH};

const INKS: [Ink; 3] = [Ink::Set, Ink::Clear, Ink::Invert];

/// A canvas with a diagonal stripe pattern so every ink has something to do.
fn patterned() -> Canvas {
    let mut canvas = Canvas::new();
    for y in 0..HEIGHT as i32 {
        for x in 0..WIDTH as i32 {
            if (x + 2 * y) % 5 < 2 {
                canvas.set_pixel(x, y, Ink::Set);
            }
        }
    }
    canvas
}

fn lit(canvas: &Canvas) -> Vec<(i32, i32)> {
    let mut pixels = Vec::new();
    for y in 0..HEIGHT as i32 {
        for x in 0..WIDTH as i32 {
            if canvas.get_pixel(x, y).is_on() {
                pixels.push((x, y));
            }
        }
    }
    pixels
}

#[test]
fn set_then_get_returns_written_state() {
    let mut canvas = patterned();
    for (x, y) in [(0, 0), (127, 0), (0, 63), (127, 63), (77, 31), (8, 8)] {
        canvas.set_pixel(x, y, Ink::Set);
        assert_eq!(canvas.get_pixel(x, y), Pixel::On);
        canvas.set_pixel(x, y, Ink::Clear);
        assert_eq!(canvas.get_pixel(x, y), Pixel::Off);
    }
}

#[test]
fn clear_turns_everything_off() {
    let mut canvas = patterned();
    canvas.clear();
    assert!(canvas.buffer().iter().all(|&b| b == 0));
}

#[test]
fn fast_hline_matches_pixel_loop() {
    let runs = [(0, 0, 128), (10, 7, 1), (3, 8, 40), (100, 63, 28), (50, 33, 0)];
    for ink in INKS {
        for (x, y, w) in runs {
            let mut fast = patterned();
            let mut slow = patterned();
            fast.draw_fast_hline(x, y, w, ink);
            for i in 0..w {
                slow.set_pixel(x + i, y, ink);
            }
            assert_eq!(fast.buffer(), slow.buffer(), "hline {x},{y},{w} {ink:?}");
        }
    }
}

#[test]
fn fast_vline_matches_pixel_loop() {
    let runs = [(0, 0, 64), (5, 3, 2), (9, 6, 11), (127, 1, 7), (64, 8, 8), (20, 17, 0)];
    for ink in INKS {
        for (x, y, h) in runs {
            let mut fast = patterned();
            let mut slow = patterned();
            fast.draw_fast_vline(x, y, h, ink);
            for j in 0..h {
                slow.set_pixel(x, y + j, ink);
            }
            assert_eq!(fast.buffer(), slow.buffer(), "vline {x},{y},{h} {ink:?}");
        }
    }
}

#[cfg(feature = "pixel-safe-mode")]
#[test]
fn fast_lines_clip_like_pixel_loop() {
    for ink in INKS {
        for (x, y, len) in [(-10, 5, 30), (120, 40, 30), (-200, -3, 500), (60, -5, 20)] {
            let mut fast = patterned();
            let mut slow = patterned();
            fast.draw_fast_hline(x, y, len, ink);
            fast.draw_fast_vline(y, x, len, ink);
            for i in 0..len {
                slow.set_pixel(x + i, y, ink);
            }
            for i in 0..len {
                slow.set_pixel(y, x + i, ink);
            }
            assert_eq!(fast.buffer(), slow.buffer(), "clip {x},{y},{len} {ink:?}");
        }
    }
}

#[test]
fn lines_are_undirected() {
    let segments = [
        (0, 0, 127, 63),
        (3, 50, 90, 2),
        (10, 10, 11, 40),
        (64, 32, 64, 32),
        (5, 20, 100, 20),
        (40, 0, 40, 63),
        (0, 0, 20, 20),
        (-30, 70, 150, -10),
    ];
    for (x0, y0, x1, y1) in segments {
        let mut forward = Canvas::new();
        let mut backward = Canvas::new();
        forward.draw_line(x0, y0, x1, y1, Ink::Set);
        backward.draw_line(x1, y1, x0, y0, Ink::Set);
        assert_eq!(lit(&forward), lit(&backward), "{x0},{y0} -> {x1},{y1}");
    }
}

/// Textbook Bresenham walking every step, keeping on-screen points.
fn reference_line(x0: i32, y0: i32, x1: i32, y1: i32) -> Vec<(i32, i32)> {
    let (mut x0, mut y0, mut x1, mut y1) = (x0, y0, x1, y1);
    let steep = (y1 - y0).abs() > (x1 - x0).abs();
    if steep {
        std::mem::swap(&mut x0, &mut y0);
        std::mem::swap(&mut x1, &mut y1);
    }
    if x0 > x1 {
        std::mem::swap(&mut x0, &mut x1);
        std::mem::swap(&mut y0, &mut y1);
    }
    let (dx, dy) = (x1 - x0, (y1 - y0).abs());
    let ystep = if y0 < y1 { 1 } else { -1 };
    let mut err = dx / 2;
    let mut y = y0;
    let mut points = Vec::new();
    for x in x0..=x1 {
        let (px, py) = if steep { (y, x) } else { (x, y) };
        if (0..WIDTH as i32).contains(&px) && (0..HEIGHT as i32).contains(&py) {
            points.push((px, py));
        }
        err -= dy;
        if err < 0 {
            y += ystep;
            err += dx;
        }
    }
    points.sort_by_key(|&(x, y)| (y, x));
    points
}

#[test]
fn clipped_lines_match_full_walk() {
    let segments = [
        (-50, 3, 200, 60),
        (-300, -20, 140, 50),
        (10, -90, 40, 200),
        (130, 70, -7, -1),
        (-1000, 31, 1000, 33),
        (64, -500, 60, 500),
    ];
    for (x0, y0, x1, y1) in segments {
        let mut canvas = Canvas::new();
        canvas.draw_line(x0, y0, x1, y1, Ink::Set);
        assert_eq!(
            lit(&canvas),
            reference_line(x0, y0, x1, y1),
            "{x0},{y0} -> {x1},{y1}"
        );
    }
}

#[test]
fn extreme_lines_cross_the_whole_screen() {
    let mut canvas = Canvas::new();
    canvas.draw_line(i32::MIN, 5, i32::MAX, 40, Ink::Set);
    let pixels = lit(&canvas);
    assert_eq!(pixels.len(), WIDTH);
    for x in 0..WIDTH as i32 {
        assert_eq!(pixels.iter().filter(|p| p.0 == x).count(), 1, "column {x}");
    }

    let mut canvas = Canvas::new();
    canvas.draw_line(7, i32::MIN, 7, i32::MAX, Ink::Set);
    let expected: Vec<(i32, i32)> = (0..HEIGHT as i32).map(|y| (7, y)).collect();
    assert_eq!(lit(&canvas), expected);
}

#[test]
fn extreme_coordinates_are_clipped() {
    let (min, max) = (i32::MIN, i32::MAX);
    let ball = [0xFFu8; 8];
    let bitmap = Bitmap::new(&ball, 8, 8).unwrap();
    let row = [0xFFu8; 8];
    let xy = XyBitmap::new(&row, 8, 8).unwrap();

    let mut canvas = Canvas::new();
    canvas.draw_line(min, min, min, max, Ink::Set);
    canvas.draw_circle(max, max, 5, Ink::Set);
    canvas.fill_circle(min, min, 5, Ink::Set);
    canvas.draw_circle_helper(max, min, 3, 0xF, Ink::Set);
    canvas.fill_circle_helper(min, max, 3, 0x3, max, Ink::Set);
    canvas.draw_rect(max, max, max, max, Ink::Set);
    canvas.fill_rect(min, 0, max, 10, Ink::Set);
    canvas.draw_round_rect(max - 3, 0, 50, 50, 10, Ink::Set);
    canvas.fill_round_rect(max - 3, max - 3, 40, 40, 8, Ink::Set);
    canvas.draw_fast_hline(min, 0, max, Ink::Set);
    canvas.draw_fast_vline(0, max, max, Ink::Set);
    canvas.draw_triangle(min, min, max, min, min, min, Ink::Set);
    canvas.fill_triangle(min, min, max, min, max, -1, Ink::Set);
    canvas.draw_bitmap(max, min, &bitmap, Ink::Set);
    canvas.draw_bitmap(min, max, &bitmap, Ink::Set);
    canvas.draw_slow_xy_bitmap(max, max, &xy, Ink::Set);
    canvas.draw_char(max, max, b'A', Ink::Set, Ink::Clear, 255);
    canvas.draw_char(min, min, b'A', Ink::Set, Ink::Clear, 255);
    canvas.set_text_wrap(false);
    canvas.set_cursor(max - 2, max - 2);
    canvas.print("overflow");
    assert!(lit(&canvas).is_empty());

    // a huge triangle covering the screen fills all of it
    canvas.fill_triangle(min, min, max, min, 0, max, Ink::Set);
    assert_eq!(lit(&canvas).len(), WIDTH * HEIGHT);
}

#[test]
fn filled_triangle_stays_in_bounding_box() {
    let triangles = [
        [(10, 5), (60, 40), (20, 60)],
        [(100, 10), (100, 50), (70, 30)],
        [(5, 5), (40, 5), (20, 30)],
        [(64, 2), (10, 50), (120, 50)],
    ];
    for tri in triangles {
        let mut canvas = Canvas::new();
        let [(x0, y0), (x1, y1), (x2, y2)] = tri;
        canvas.fill_triangle(x0, y0, x1, y1, x2, y2, Ink::Set);

        let min_x = x0.min(x1).min(x2);
        let max_x = x0.max(x1).max(x2);
        let min_y = y0.min(y1).min(y2);
        let max_y = y0.max(y1).max(y2);
        let pixels = lit(&canvas);
        assert!(!pixels.is_empty());
        for &(x, y) in &pixels {
            assert!((min_x..=max_x).contains(&x) && (min_y..=max_y).contains(&y));
        }

        for (x, y) in tri {
            assert!(canvas.get_pixel(x, y).is_on(), "vertex {x},{y} of {tri:?}");
        }

        // one span per row, every row covered
        for y in min_y..=max_y {
            let row: Vec<i32> = pixels.iter().filter(|p| p.1 == y).map(|p| p.0).collect();
            assert!(!row.is_empty(), "row {y} of {tri:?}");
            let span = row[row.len() - 1] - row[0] + 1;
            assert_eq!(span as usize, row.len(), "row {y} of {tri:?}");
        }
    }
}

/// Signed distance of (px, py) from edge a-b, positive on the side of `c`.
fn edge_distance(a: (i32, i32), b: (i32, i32), c: (i32, i32), px: i32, py: i32) -> f64 {
    let edge = |x: i32, y: i32| {
        ((b.0 - a.0) as f64) * ((y - a.1) as f64) - ((b.1 - a.1) as f64) * ((x - a.0) as f64)
    };
    let side = edge(c.0, c.1).signum();
    let len = (((b.0 - a.0) as f64).powi(2) + ((b.1 - a.1) as f64).powi(2)).sqrt();
    side * edge(px, py) / len
}

#[test]
fn filled_triangle_stays_in_hull() {
    let triangles = [
        [(10, 5), (60, 40), (20, 60)],
        [(100, 10), (100, 50), (70, 30)],
        [(64, 2), (10, 50), (120, 50)],
        [(3, 60), (120, 45), (90, 1)],
        // clipped by the screen edges
        [(-20, -10), (150, 30), (40, 90)],
        [(-40, 20), (30, -30), (60, 70)],
        [(100, -5), (200, 70), (80, 63)],
    ];
    for tri in triangles {
        let mut canvas = Canvas::new();
        let [a, b, c] = tri;
        canvas.fill_triangle(a.0, a.1, b.0, b.1, c.0, c.1, Ink::Set);

        let pixels = lit(&canvas);
        assert!(!pixels.is_empty(), "{tri:?}");
        for &(x, y) in &pixels {
            for (p, q, r) in [(a, b, c), (b, c, a), (c, a, b)] {
                let d = edge_distance(p, q, r, x, y);
                assert!(d >= -1.0, "{x},{y} is {d:.2} outside edge {p:?}-{q:?} of {tri:?}");
            }
        }
    }
}

#[test]
fn filled_triangle_with_equal_y_is_one_span() {
    let mut canvas = Canvas::new();
    canvas.fill_triangle(30, 20, 10, 20, 50, 20, Ink::Set);
    let expected: Vec<(i32, i32)> = (10..=50).map(|x| (x, 20)).collect();
    assert_eq!(lit(&canvas), expected);
}

#[test]
fn filled_triangle_invert_hits_each_pixel_once() {
    for [(x0, y0), (x1, y1), (x2, y2)] in [
        [(10, 5), (60, 30), (20, 50)],
        [(64, 2), (10, 50), (120, 50)],
        [(5, 5), (40, 5), (20, 30)],
    ] {
        let mut inverted = Canvas::new();
        let mut set = Canvas::new();
        inverted.fill_triangle(x0, y0, x1, y1, x2, y2, Ink::Invert);
        set.fill_triangle(x0, y0, x1, y1, x2, y2, Ink::Set);
        assert_eq!(inverted.buffer(), set.buffer());
    }
}

/// Builds the same 13x11 test pattern in both bitmap layouts.
fn pattern_bitmaps() -> (Vec<u8>, Vec<u8>, u16, u16) {
    let (w, h) = (13u16, 11u16);
    let on = |x: u16, y: u16| (x * 3 + y * 7) % 4 == 0 || x == 0 || y == h - 1;

    let mut packed = vec![0u8; Bitmap::packed_len(w, h)];
    let stride = (w as usize).div_ceil(8);
    let mut xy = vec![0u8; stride * h as usize];
    for y in 0..h {
        for x in 0..w {
            if on(x, y) {
                packed[(y / 8) as usize * w as usize + x as usize] |= 1 << (y % 8);
                xy[y as usize * stride + x as usize / 8] |= 0x80 >> (x % 8);
            }
        }
    }
    (packed, xy, w, h)
}

fn assert_bitmaps_agree(origins: &[(i32, i32)]) {
    let (packed, xy, w, h) = pattern_bitmaps();
    let packed = Bitmap::new(&packed, w, h).unwrap();
    let xy = XyBitmap::new(&xy, w, h).unwrap();

    for ink in INKS {
        for &(x, y) in origins {
            let mut fast = patterned();
            let mut slow = patterned();
            fast.draw_bitmap(x, y, &packed, ink);
            slow.draw_slow_xy_bitmap(x, y, &xy, ink);
            assert_eq!(fast.buffer(), slow.buffer(), "bitmap at {x},{y} {ink:?}");
        }
    }
}

#[test]
fn packed_bitmap_matches_slow_xy_bitmap() {
    assert_bitmaps_agree(&[(0, 0), (5, 8), (0, 16), (7, 3), (100, 45), (33, 13)]);
}

#[cfg(feature = "pixel-safe-mode")]
#[test]
fn packed_bitmap_clips_like_slow_xy_bitmap() {
    assert_bitmaps_agree(&[(120, 58), (-4, -5), (-12, 61), (30, -10), (126, 0)]);
}

#[test]
fn unaligned_bitmap_straddles_two_bands() {
    let data = [0xFF, 0x81];
    let bitmap = Bitmap::new(&data, 2, 8).unwrap();
    let mut canvas = Canvas::new();
    canvas.draw_bitmap(4, 3, &bitmap, Ink::Set);

    let buffer = canvas.buffer();
    assert_eq!(buffer[4], 0xF8);
    assert_eq!(buffer[WIDTH + 4], 0x07);
    assert_eq!(buffer[5], 0x08);
    assert_eq!(buffer[WIDTH + 5], 0x04);
    assert_eq!(lit(&canvas).len(), 10);
}

#[test]
fn draw_char_reproduces_font_bits() {
    let font = Font::builtin();
    for code in [b'A', b'g', b'#', b'~'] {
        let mut canvas = Canvas::new();
        canvas.fill(Ink::Set);
        canvas.draw_char(20, 9, code, Ink::Set, Ink::Clear, 1);

        let glyph = font.glyph(code);
        for col in 0..6 {
            let bits = glyph.get(col as usize).copied().unwrap_or(0);
            for row in 0..8 {
                let expected = Pixel::from(bits & (1 << row) != 0);
                assert_eq!(canvas.get_pixel(20 + col, 9 + row), expected);
            }
        }
        // outside the cell the fill survives
        assert!(canvas.get_pixel(19, 9).is_on());
        assert!(canvas.get_pixel(26, 9).is_on());
        assert!(canvas.get_pixel(20, 17).is_on());
    }
}

#[test]
fn draw_char_inverse_video() {
    let font = Font::builtin();
    let mut canvas = Canvas::new();
    canvas.draw_char(0, 0, b'M', Ink::Clear, Ink::Set, 1);
    let glyph = font.glyph(b'M');
    for col in 0..5 {
        for row in 0..8 {
            let glyph_bit = glyph[col as usize] & (1 << row) != 0;
            assert_eq!(canvas.get_pixel(col, row).is_on(), !glyph_bit);
        }
    }
    for row in 0..8 {
        assert!(canvas.get_pixel(5, row).is_on());
    }
}

#[test]
fn draw_char_transparent_background() {
    let mut base = patterned();
    let mut drawn = patterned();
    drawn.draw_char(40, 20, b'X', Ink::Set, Ink::Set, 2);

    let glyph = Font::builtin().glyph(b'X');
    for y in 0..HEIGHT as i32 {
        for x in 0..WIDTH as i32 {
            let (col, row) = ((x - 40) / 2, (y - 20) / 2);
            let in_glyph = x >= 40
                && y >= 20
                && col < 5
                && row < 8
                && glyph[col as usize] & (1 << row) != 0;
            if in_glyph {
                base.set_pixel(x, y, Ink::Set);
            }
        }
    }
    assert_eq!(base.buffer(), drawn.buffer());
}
